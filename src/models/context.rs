//! Evaluation context shared by the interval algebra
//!
//! Holds the reference frequency, the up and lift units and the pitch of C4.
//! Values whose formatting depends on the up or lift unit are stamped with
//! the context epoch when created; changing either unit starts a new epoch
//! and every older stamp becomes stale.

use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};
use crate::models::literal::inflection_prefix;
use crate::models::monzo::TimeMonzo;

/// Cents tolerance when decomposing an offset into ups and lifts
const ALIGNMENT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootContext {
    pub unison_frequency: Option<TimeMonzo>,
    pub c4: TimeMonzo,
    up: TimeMonzo,
    lift: TimeMonzo,
    epoch: u64,
}

impl Default for RootContext {
    fn default() -> Self {
        RootContext {
            unison_frequency: None,
            c4: TimeMonzo::unity(),
            up: TimeMonzo::from_cents(1.0),
            lift: TimeMonzo::from_cents(5.0),
            epoch: 0,
        }
    }
}

impl RootContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with a reference frequency for the unison, e.g. 440 Hz
    pub fn with_unison_frequency(mut self, frequency: TimeMonzo) -> Self {
        self.unison_frequency = Some(frequency);
        self
    }

    pub fn up(&self) -> &TimeMonzo {
        &self.up
    }

    pub fn lift(&self) -> &TimeMonzo {
        &self.lift
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn set_up(&mut self, up: TimeMonzo) {
        self.up = up;
        self.epoch += 1;
        log::debug!("Up changed to {}; fragile literals before epoch {} are stale", self.up, self.epoch);
    }

    pub fn set_lift(&mut self, lift: TimeMonzo) {
        self.lift = lift;
        self.epoch += 1;
        log::debug!("Lift changed to {}; fragile literals before epoch {} are stale", self.lift, self.epoch);
    }

    /// Whether a fragile stamp was issued before the current up and lift
    pub fn is_stale(&self, stamp: u64) -> bool {
        stamp != self.epoch
    }

    pub fn unison_frequency(&self, conversion: &'static str) -> Result<&TimeMonzo> {
        self.unison_frequency
            .as_ref()
            .ok_or(IntervalError::MissingReference(conversion))
    }

    /// Spell a cents offset as lifts followed by ups, e.g. `/^^`
    ///
    /// `None` when the units are not plain cents or the offset is not a whole
    /// combination of them.
    pub fn ups_and_lifts_prefix(&self, cents: f64) -> Option<String> {
        if !self.up.is_real_cents() || !self.lift.is_real_cents() {
            return None;
        }
        let (ups, lifts) = count_ups_and_lifts(cents, self.up.cents, self.lift.cents)?;
        Some(inflection_prefix(ups, lifts))
    }
}

/// Decompose `cents` into `(ups, lifts)`, lifts first
pub fn count_ups_and_lifts(cents: f64, up: f64, lift: f64) -> Option<(i64, i64)> {
    if up == 0.0 || lift == 0.0 || !cents.is_finite() {
        return None;
    }
    let lifts = (cents / lift).round();
    let rest = cents - lifts * lift;
    let ups = (rest / up).round();
    if (rest - ups * up).abs() > ALIGNMENT_TOLERANCE {
        return None;
    }
    Some((ups as i64, lifts as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let context = RootContext::new();
        assert!(context.up().is_real_cents());
        assert_eq!(context.up().cents, 1.0);
        assert_eq!(context.lift().cents, 5.0);
        assert!(context.c4.is_unity());
        assert!(matches!(
            context.unison_frequency("relative -> absolute"),
            Err(IntervalError::MissingReference(_))
        ));
    }

    #[test]
    fn test_epoch_stamps() {
        let mut context = RootContext::new();
        let stamp = context.epoch();
        assert!(!context.is_stale(stamp));
        context.set_up(TimeMonzo::from_cents(2.0));
        assert!(context.is_stale(stamp));
        assert!(!context.is_stale(context.epoch()));
    }

    #[test]
    fn test_count_ups_and_lifts() {
        assert_eq!(count_ups_and_lifts(7.0, 1.0, 5.0), Some((2, 1)));
        assert_eq!(count_ups_and_lifts(-1.0, 1.0, 5.0), Some((-1, 0)));
        assert_eq!(count_ups_and_lifts(0.5, 1.0, 5.0), None);
        let context = RootContext::new();
        assert_eq!(context.ups_and_lifts_prefix(11.0).unwrap(), "//^");
    }
}
