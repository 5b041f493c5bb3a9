//! Comma discovery for the Functional Just System
//!
//! Each prime gets a comma that moves a Pythagorean interval onto it. The
//! comma is found by walking the chain of fifths until a fifth lands within a
//! radius of tolerance of the prime (mod the octave), then octave-reducing the
//! difference into ±600 cents.
//!
//! Discovered commas are memoized in process-wide append-only caches.
//! Flavors that come from published tables are supplied by the host through
//! [`register_comma_table`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use lazy_static::lazy_static;
use num_traits::{One, Zero};
use once_cell::sync::Lazy;

use crate::error::{IntervalError, Result};
use crate::models::monzo::TimeMonzo;
use crate::notation::fjs::FjsFlavor;
use crate::utils::primes::{prime, PRIMES, PRIME_CENTS};
use crate::utils::rational::{circle_distance, ratio_to_f64, value_to_cents, Exponent};

/// Classic radius of tolerance
pub static RADIUS_OF_TOLERANCE: Lazy<f64> = Lazy::new(|| value_to_cents(65.0 / 63.0));

/// Half an apotome plus epsilon closes the gap between minor and major
pub static SEMIAPOTOME_RADIUS: Lazy<f64> =
    Lazy::new(|| 0.5 * value_to_cents(2187.0 / 2048.0) + 1e-6);

/// As large as possible without disrupting the classic neutral commas
pub const BRIDGING_RADIUS: f64 = 92.1;

static FIFTH: Lazy<f64> = Lazy::new(|| PRIME_CENTS[1] - PRIME_CENTS[0]);

const OCTAVE: f64 = 1200.0;

/// Search strategy for the number of fifths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Master {
    Formal,
    FloraC,
    Neutral,
}

impl Master {
    fn fifths(self, prime_cents: f64) -> Exponent {
        match self {
            Master::Formal => master_algorithm(prime_cents, *RADIUS_OF_TOLERANCE),
            Master::FloraC => master_algorithm(prime_cents, *SEMIAPOTOME_RADIUS),
            Master::Neutral => neutral_master(prime_cents),
        }
    }
}

/// Alternate up and down the chain of fifths from unison
fn master_algorithm(prime_cents: f64, radius: f64) -> Exponent {
    let mut pythagoras = 0.0;
    let mut k = 0i64;
    if circle_distance(prime_cents, pythagoras, OCTAVE) < radius {
        return Exponent::from_integer(k);
    }
    loop {
        pythagoras += *FIFTH;
        k += 1;
        if circle_distance(prime_cents, pythagoras, OCTAVE) < radius {
            return Exponent::from_integer(k);
        }
        if circle_distance(prime_cents, -pythagoras, OCTAVE) < radius {
            return Exponent::from_integer(-k);
        }
    }
}

/// Walk half-integer fifth counts starting from the half-fifth
fn neutral_master(prime_cents: f64) -> Exponent {
    let mut pythagoras = 0.5 * *FIFTH;
    let mut k = Exponent::new(1, 2);
    loop {
        if circle_distance(prime_cents, pythagoras, OCTAVE) < BRIDGING_RADIUS {
            return k;
        }
        if circle_distance(prime_cents, -pythagoras, OCTAVE) < BRIDGING_RADIUS {
            return -k;
        }
        pythagoras += *FIFTH;
        k += Exponent::one();
    }
}

fn discover_comma(index: usize, master: Master) -> Result<TimeMonzo> {
    let p = prime(index)?;
    let prime_cents = PRIME_CENTS[index];
    let threes = -master.fifths(prime_cents);
    let mut twos = threes;
    let mut comma_cents =
        prime_cents + ratio_to_f64(&twos) * PRIME_CENTS[0] + ratio_to_f64(&threes) * PRIME_CENTS[1];
    while comma_cents > 600.0 {
        comma_cents -= PRIME_CENTS[0];
        twos -= Exponent::one();
    }
    while comma_cents < -600.0 {
        comma_cents += PRIME_CENTS[0];
        twos += Exponent::one();
    }
    let pythagorean = TimeMonzo::new(Exponent::zero(), vec![twos, threes], Exponent::one());
    let comma = pythagorean.mul(&TimeMonzo::from_integer(p));
    log::debug!(
        "Discovered {:?} comma for prime {}: {} fifths, {}",
        master,
        p,
        -threes,
        comma
    );
    Ok(comma)
}

fn seed() -> Vec<TimeMonzo> {
    vec![TimeMonzo::unity(), TimeMonzo::unity()]
}

lazy_static! {
    static ref FORMAL_COMMAS: Mutex<Vec<TimeMonzo>> = Mutex::new(seed());
    static ref FLORA_COMMAS: Mutex<Vec<TimeMonzo>> = Mutex::new(seed());
    static ref NEUTRAL_COMMAS: Mutex<Vec<TimeMonzo>> = Mutex::new(seed());
    static ref COMMA_TABLES: RwLock<HashMap<FjsFlavor, Arc<dyn CommaTable>>> =
        RwLock::new(HashMap::new());
}

fn lock(cache: &Mutex<Vec<TimeMonzo>>) -> MutexGuard<'_, Vec<TimeMonzo>> {
    // The caches only ever grow by complete entries
    cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn cached_comma(cache: &Mutex<Vec<TimeMonzo>>, index: usize, master: Master) -> Result<TimeMonzo> {
    if index >= PRIMES.len() {
        return Err(IntervalError::OutOfPrimes {
            index,
            size: PRIMES.len(),
        });
    }
    let mut commas = lock(cache);
    while commas.len() <= index {
        let next = commas.len();
        let comma = discover_comma(next, master)?;
        commas.push(comma);
    }
    Ok(commas[index].clone())
}

/// Classic FJS comma for the prime at `index`
pub fn formal_comma(index: usize) -> Result<TimeMonzo> {
    cached_comma(&FORMAL_COMMAS, index, Master::Formal)
}

/// FloraC's variant with a half-apotome radius
pub fn flora_comma(index: usize) -> Result<TimeMonzo> {
    cached_comma(&FLORA_COMMAS, index, Master::FloraC)
}

/// Neutral/bridging comma, possibly a half-integer power of three
pub fn neutral_comma(index: usize) -> Result<TimeMonzo> {
    cached_comma(&NEUTRAL_COMMAS, index, Master::Neutral)
}

/// An externally supplied table of commas for a notation family
pub trait CommaTable: Send + Sync {
    /// Prime-basis tables are keyed by prime index; others by the inflection
    /// number itself.
    fn prime_basis(&self) -> bool;

    fn comma(&self, key: u64) -> Result<TimeMonzo>;

    /// Whether the prime at `index` is written with its comma inverted
    fn swapped(&self, _index: usize) -> bool {
        false
    }
}

/// Install the comma table for a non-native flavor
pub fn register_comma_table(flavor: FjsFlavor, table: Arc<dyn CommaTable>) {
    let mut tables = COMMA_TABLES
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    log::debug!("Registered comma table for flavor '{}'", flavor);
    tables.insert(flavor, table);
}

pub fn unregister_comma_table(flavor: FjsFlavor) {
    let mut tables = COMMA_TABLES
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    tables.remove(&flavor);
}

pub(crate) fn comma_table(flavor: FjsFlavor) -> Result<Arc<dyn CommaTable>> {
    let tables = COMMA_TABLES
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    tables
        .get(&flavor)
        .cloned()
        .ok_or(IntervalError::MissingCommaTable(flavor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::primes::prime_index;

    fn formal(p: i64) -> Exponent {
        formal_comma(prime_index(p).unwrap()).unwrap().to_fraction().unwrap()
    }

    #[test]
    fn test_formal_commas_for_small_primes() {
        assert_eq!(formal(5), Exponent::new(80, 81));
        assert_eq!(formal(7), Exponent::new(63, 64));
        assert_eq!(formal(11), Exponent::new(33, 32));
        assert_eq!(formal(13), Exponent::new(1053, 1024));
    }

    #[test]
    fn test_two_and_three_have_no_comma() {
        assert!(formal_comma(0).unwrap().is_unity());
        assert!(neutral_comma(1).unwrap().is_unity());
    }

    #[test]
    fn test_flora_differs_at_31() {
        let index = prime_index(31).unwrap();
        assert_eq!(flora_comma(index).unwrap().to_fraction().unwrap(), Exponent::new(31, 32));
        assert_eq!(formal_comma(index).unwrap().to_fraction().unwrap(), Exponent::new(248, 243));
    }

    #[test]
    fn test_neutral_comma_is_half_integer() {
        let index = prime_index(11).unwrap();
        let comma = neutral_comma(index).unwrap();
        assert!(!comma.is_fractional());
        let square = comma.pow_fraction(&Exponent::from_integer(2)).unwrap();
        assert_eq!(square.to_fraction().unwrap(), Exponent::new(242, 243));
    }

    #[test]
    fn test_out_of_primes() {
        assert!(matches!(
            formal_comma(PRIMES.len()),
            Err(IntervalError::OutOfPrimes { .. })
        ));
    }

    #[test]
    fn test_missing_table() {
        assert!(matches!(
            comma_table(FjsFlavor::Lumi),
            Err(IntervalError::MissingCommaTable(FjsFlavor::Lumi))
        ));
    }
}
