//! Domain conversions and formatting helpers
//!
//! Converting between relative and absolute values goes through the
//! context's unison frequency. Every conversion drops the formatting node
//! and keeps the annotation.

use crate::error::{IntervalError, Result};
use crate::models::context::RootContext;
use crate::models::interval::{Domain, Interval};
use crate::utils::rational::float_as_integer;

/// Same value in the linear domain
pub fn to_linear(interval: &Interval) -> Interval {
    interval.derive(interval.value.clone(), Domain::Linear, None)
}

/// Same value in the logarithmic domain
pub fn to_logarithmic(interval: &Interval) -> Interval {
    interval.derive(interval.value.clone(), Domain::Logarithmic, None)
}

/// Absolute frequency, normalized to a time exponent of -1
pub fn to_absolute_linear(interval: &Interval, context: &RootContext) -> Result<Interval> {
    if interval.is_absolute() {
        let exponent = -interval.value.time_exponent.recip();
        let value = interval.value.pow_fraction(&exponent)?;
        return Ok(interval.derive(value, Domain::Linear, None));
    }
    let frequency = context.unison_frequency("relative -> absolute")?;
    Ok(interval.derive(interval.value.mul(frequency), Domain::Linear, None))
}

/// Dimensionless ratio, dividing absolute values by the unison frequency
pub fn to_relative_linear(interval: &Interval, context: &RootContext) -> Result<Interval> {
    if interval.is_relative() {
        return Ok(interval.derive(interval.value.clone(), Domain::Linear, None));
    }
    let frequency = context.unison_frequency("absolute -> relative")?;
    let absolute = to_absolute_linear(interval, context)?;
    Ok(interval.derive(absolute.value.div(frequency)?, Domain::Linear, None))
}

pub fn to_absolute_logarithmic(interval: &Interval, context: &RootContext) -> Result<Interval> {
    let mut converted = to_absolute_linear(interval, context)?;
    converted.domain = Domain::Logarithmic;
    Ok(converted)
}

pub fn to_relative_logarithmic(interval: &Interval, context: &RootContext) -> Result<Interval> {
    let mut converted = to_relative_linear(interval, context)?;
    converted.domain = Domain::Logarithmic;
    Ok(converted)
}

/// Drop the formatting node
pub fn simplify(interval: &Interval) -> Interval {
    interval.derive(interval.value.clone(), interval.domain, None)
}

/// Drop the color
pub fn bleach(interval: &Interval) -> Interval {
    let mut result = interval.clone();
    result.annotation.color = None;
    result
}

/// Drop the label
pub fn unlabel(interval: &Interval) -> Interval {
    let mut result = interval.clone();
    result.annotation.label.clear();
    result
}

fn rounded(interval: &Interval, context: &RootContext, round: impl Fn(f64) -> f64) -> Result<Interval> {
    let converted = to_relative_linear(interval, context)?;
    let n = match converted.value.to_fraction() {
        Ok(fraction) if fraction.is_integer() => fraction.to_integer(),
        _ => float_as_integer(round(converted.value_of())).ok_or_else(|| {
            IntervalError::representation("Rounded value does not fit an integer")
        })?,
    };
    Ok(Interval::from_integer(n).with_annotation(interval.annotation.clone()))
}

pub fn floor(interval: &Interval, context: &RootContext) -> Result<Interval> {
    rounded(interval, context, f64::floor)
}

/// Round half away from zero
pub fn round(interval: &Interval, context: &RootContext) -> Result<Interval> {
    rounded(interval, context, f64::round)
}

pub fn trunc(interval: &Interval, context: &RootContext) -> Result<Interval> {
    rounded(interval, context, f64::trunc)
}

pub fn ceil(interval: &Interval, context: &RootContext) -> Result<Interval> {
    rounded(interval, context, f64::ceil)
}
