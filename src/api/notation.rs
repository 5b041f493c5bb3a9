//! Notation conversions
//!
//! Each conversion moves the interval into the domain its notation lives in
//! and regenerates the formatting node. When no exact spelling exists the
//! value is approximated with the tolerances from [`ApproximationSettings`].

use num_traits::One;

use crate::config::ApproximationSettings;
use crate::error::{IntervalError, Result};
use crate::models::context::{count_ups_and_lifts, RootContext};
use crate::models::interval::{Domain, Interval};
use crate::models::literal::{time_monzo_as, IntervalLiteral};
use crate::models::monzo::TimeMonzo;
use crate::notation::fjs::{as_absolute_fjs, as_fjs, FjsFlavor};
use crate::utils::rational::{float_as_integer, Exponent};

use super::domain::{
    to_absolute_logarithmic, to_relative_linear, to_relative_logarithmic,
};

fn scale(digits: u32) -> Result<i64> {
    10i64
        .checked_pow(digits)
        .ok_or_else(|| IntervalError::representation(format!("Too many fraction digits: {}", digits)))
}

fn rounded_to_scale(value: f64, denominator: i64) -> Result<Exponent> {
    let numerator = float_as_integer((value * denominator as f64).round())
        .ok_or_else(|| IntervalError::representation("Rounded value does not fit an integer"))?;
    Ok(Exponent::new(numerator, denominator))
}

/// Split the real cents of a fragile value into whole ups and lifts
fn split_ups_and_lifts(interval: &Interval, monzo: &TimeMonzo, context: &RootContext) -> (TimeMonzo, i64, i64) {
    if !interval.is_fragile()
        || monzo.cents == 0.0
        || !context.up().is_real_cents()
        || !context.lift().is_real_cents()
    {
        return (monzo.clone(), 0, 0);
    }
    match count_ups_and_lifts(monzo.cents, context.up().cents, context.lift().cents) {
        Some((ups, lifts)) => {
            let mut stripped = monzo.clone();
            stripped.cents = 0.0;
            (stripped, ups, lifts)
        }
        None => (monzo.clone(), 0, 0),
    }
}

fn stamp_if_inflected(interval: Interval, ups: i64, lifts: i64, context: &RootContext) -> Interval {
    if ups != 0 || lifts != 0 {
        interval.stamped(context.epoch())
    } else {
        interval
    }
}

// ============================================================================
// Linear notations
// ============================================================================

/// Decimal rendering, optionally rounded to `fraction_digits`
pub fn to_decimal(interval: &Interval, fraction_digits: Option<u32>, context: &RootContext) -> Result<Interval> {
    let mut converted = to_relative_linear(interval, context)?;
    if let Some(digits) = fraction_digits {
        let value = rounded_to_scale(converted.value_of(), scale(digits)?)?;
        converted.value = TimeMonzo::from_fraction(value);
    }
    converted.node = converted.value.as_decimal_literal();
    Ok(converted)
}

/// Exact fraction, or the simplest fraction within `epsilon`
///
/// Without an explicit epsilon exact values keep their value and inexact
/// ones use the configured fraction epsilon.
pub fn to_fraction(
    interval: &Interval,
    epsilon: Option<f64>,
    context: &RootContext,
    settings: &ApproximationSettings,
) -> Result<Interval> {
    let mut converted = to_relative_linear(interval, context)?;
    if epsilon.is_none() && converted.value.is_fractional() {
        converted.node = converted.value.as_fraction_literal(None);
        return Ok(converted);
    }
    let epsilon = epsilon.unwrap_or(settings.fraction_epsilon);
    let value = converted.value.approximate_fraction(epsilon)?;
    log::trace!("Approximated {} as {} within {}", converted.value, value, epsilon);
    let node = value.as_fraction_literal(None);
    Ok(interval.derive(value, Domain::Linear, node))
}

/// Radical such as `2^7/12`, approximating inexact values
pub fn to_radical(
    interval: &Interval,
    max_index: Option<u32>,
    max_height: Option<i64>,
    context: &RootContext,
    settings: &ApproximationSettings,
) -> Result<Interval> {
    let mut converted = to_relative_linear(interval, context)?;
    if converted.value.is_equal_temperament() {
        converted.node = converted
            .value
            .as_radical_literal()
            .or_else(|| converted.value.as_fraction_literal(None));
        return Ok(converted);
    }
    let max_index = max_index.unwrap_or(settings.max_radical_index);
    let max_height = max_height.unwrap_or(settings.max_radical_height);
    let (radicand, index) = converted
        .value
        .approximate_radical(max_index, max_height)
        .ok_or_else(|| IntervalError::representation("Unable to approximate value as a radical"))?;
    let value = TimeMonzo::from_fraction(radicand).pow_fraction(&Exponent::new(1, i64::from(index)))?;
    let node = value
        .as_radical_literal()
        .or_else(|| value.as_fraction_literal(None));
    Ok(interval.derive(value, Domain::Linear, node))
}

// ============================================================================
// Logarithmic notations
// ============================================================================

/// Cents rendering, optionally rounded to `fraction_digits`
pub fn to_cents(interval: &Interval, fraction_digits: Option<u32>, context: &RootContext) -> Result<Interval> {
    let mut converted = to_relative_logarithmic(interval, context)?;
    if let Some(digits) = fraction_digits {
        let cents = rounded_to_scale(converted.total_cents(), scale(digits)?)?;
        converted.value = TimeMonzo::from_fractional_cents(cents);
    }
    converted.node = converted.value.as_cents_literal();
    Ok(converted)
}

/// Prime exponent vector with whole cents carried as ups
///
/// Cents are rounded and any residual factor beyond the prime table is
/// dropped.
pub fn to_monzo(interval: &Interval, context: &RootContext) -> Result<Interval> {
    let mut converted = to_relative_logarithmic(interval, context)?;
    converted.value.cents = converted.value.cents.round();
    converted.value.residual = Exponent::one();
    converted.node = converted.value.as_monzo_literal();
    let ups = converted.value.cents as i64;
    Ok(stamp_if_inflected(converted, ups, 0, context))
}

/// Functional Just System spelling, in the configured flavor unless one is given
pub fn to_fjs(
    interval: &Interval,
    flavor: Option<FjsFlavor>,
    context: &RootContext,
    settings: &ApproximationSettings,
) -> Result<Interval> {
    let monzo = to_relative_logarithmic(interval, context)?.value;
    let flavor = flavor.unwrap_or(settings.default_flavor);
    let (stripped, ups, lifts) = split_ups_and_lifts(interval, &monzo, context);
    if let Some(mut literal) = as_fjs(&stripped, flavor)? {
        literal.ups = ups;
        literal.lifts = lifts;
        let result = interval.derive(monzo, Domain::Logarithmic, Some(IntervalLiteral::Fjs(literal)));
        return Ok(stamp_if_inflected(result, ups, lifts, context));
    }
    log::trace!(
        "No FJS spelling for {}; approximating within {} cents",
        monzo,
        settings.simple_tolerance
    );
    let approximation = monzo.approximate_simple(settings.simple_tolerance)?;
    let node = as_fjs(&approximation, flavor)?.map(IntervalLiteral::Fjs);
    Ok(interval.derive(approximation, Domain::Logarithmic, node))
}

/// Absolute pitch spelling relative to the context's C4
pub fn to_absolute_fjs(
    interval: &Interval,
    flavor: Option<FjsFlavor>,
    context: &RootContext,
    settings: &ApproximationSettings,
) -> Result<Interval> {
    let monzo = if context.c4.is_scalar() {
        to_relative_logarithmic(interval, context)?.value
    } else {
        to_absolute_logarithmic(interval, context)?.value
    };
    let flavor = flavor.unwrap_or(settings.default_flavor);
    let relative = monzo.div(&context.c4)?;
    let (stripped, ups, lifts) = split_ups_and_lifts(interval, &relative, context);
    if let Some(mut literal) = as_absolute_fjs(&stripped, flavor)? {
        literal.ups = ups;
        literal.lifts = lifts;
        let result = interval.derive(
            monzo,
            Domain::Logarithmic,
            Some(IntervalLiteral::AbsoluteFjs(literal)),
        );
        return Ok(stamp_if_inflected(result, ups, lifts, context));
    }
    log::trace!(
        "No absolute FJS spelling for {}; approximating within {} cents",
        relative,
        settings.simple_tolerance
    );
    let approximation = relative.approximate_simple(settings.simple_tolerance)?;
    let node = as_absolute_fjs(&approximation, flavor)?.map(IntervalLiteral::AbsoluteFjs);
    Ok(interval.derive(context.c4.mul(&approximation), Domain::Logarithmic, node))
}

/// Trade the whole cents of `interval` for powers of `comma`
///
/// An up of `^M3` becomes one syntonic comma with `ups_as(_, 81/80)`.
pub fn ups_as(interval: &Interval, comma: &Interval) -> Result<Interval> {
    let ups = float_as_integer(interval.value.cents.round())
        .ok_or_else(|| IntervalError::representation("Too many ups to convert"))?;
    let mut value = interval
        .value
        .mul(&comma.value.pow_fraction(&Exponent::from_integer(ups))?);
    value.cents = 0.0;
    let node = time_monzo_as(&value, interval.node.as_ref(), false);
    Ok(interval.derive(value, interval.domain, node))
}
