//! Rational and logarithmic helpers
//!
//! Small numeric utilities used across the value type, the notation mappers
//! and the literal renderer.

use num_integer::Integer;
use num_rational::Ratio;
use num_traits::{CheckedMul, One, Signed, ToPrimitive, Zero};

/// Exact rational used for exponents and residuals
pub type Exponent = Ratio<i64>;

/// Floored modulo for floats (result has the sign of the modulus)
pub fn mmod(a: f64, b: f64) -> f64 {
    ((a % b) + b) % b
}

/// Floored modulo for rationals
pub fn ratio_mmod(a: &Exponent, b: &Exponent) -> Exponent {
    a - b * (a / b).floor()
}

/// Distance between two positions on a circle of circumference `equave`
pub fn circle_distance(a: f64, b: f64, equave: f64) -> f64 {
    (mmod(a - b + 0.5 * equave, equave) - 0.5 * equave).abs()
}

pub fn value_to_cents(value: f64) -> f64 {
    1200.0 * value.log2()
}

pub fn cents_to_value(cents: f64) -> f64 {
    (cents / 1200.0).exp2()
}

pub fn ratio_to_f64(value: &Exponent) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Raise a fraction to an integer power, `None` on overflow or 0^negative
pub fn checked_pow(base: &Exponent, exponent: i64) -> Option<Exponent> {
    if exponent < 0 {
        if base.is_zero() {
            return None;
        }
        return checked_pow(&base.recip(), exponent.checked_neg()?);
    }
    let mut result = Exponent::one();
    let mut square = *base;
    let mut e = exponent;
    while e > 0 {
        if e & 1 == 1 {
            result = result.checked_mul(&square)?;
        }
        e >>= 1;
        if e > 0 {
            square = square.checked_mul(&square)?;
        }
    }
    Some(result)
}

fn integer_root(n: i64, index: u32) -> Option<i64> {
    let estimate = (n as f64).powf(1.0 / index as f64).round() as i64;
    (estimate.saturating_sub(1)..=estimate.saturating_add(1))
        .filter(|r| *r >= 0)
        .find(|r| r.checked_pow(index) == Some(n))
}

/// Exact `index`-th root of a positive fraction, if it has one
pub fn checked_root(value: &Exponent, index: i64) -> Option<Exponent> {
    if !value.is_positive() || index < 1 {
        return None;
    }
    let index = u32::try_from(index).ok()?;
    Some(Exponent::new(
        integer_root(*value.numer(), index)?,
        integer_root(*value.denom(), index)?,
    ))
}

/// Exact conversion of a float that holds an integer value
pub fn float_as_integer(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
        Some(value as i64)
    } else {
        None
    }
}

/// Continued-fraction convergents of `value`, stopping before overflow
pub fn convergents(value: f64, max_terms: usize) -> Vec<Exponent> {
    let mut result = Vec::new();
    if !value.is_finite() {
        return result;
    }
    let (mut h0, mut h1) = (1i64, value.floor() as i64);
    let (mut k0, mut k1) = (0i64, 1i64);
    let mut remainder = value - value.floor();
    result.push(Exponent::new(h1, k1));
    while result.len() < max_terms && remainder.abs() > 1e-12 {
        let inverse = 1.0 / remainder;
        let term = inverse.floor();
        if term > 1.0e9 {
            break;
        }
        let a = term as i64;
        let h2 = match a.checked_mul(h1).and_then(|x| x.checked_add(h0)) {
            Some(h) => h,
            None => break,
        };
        let k2 = match a.checked_mul(k1).and_then(|x| x.checked_add(k0)) {
            Some(k) => k,
            None => break,
        };
        result.push(Exponent::new(h2, k2));
        h0 = h1;
        h1 = h2;
        k0 = k1;
        k1 = k2;
        remainder = inverse - term;
    }
    result
}

/// Simplest convergent within `epsilon` of `value`
pub fn simplest_within(value: f64, epsilon: f64) -> Option<Exponent> {
    let candidates = convergents(value, 64);
    candidates
        .iter()
        .find(|c| (ratio_to_f64(c) - value).abs() < epsilon)
        .or(candidates.last())
        .copied()
}

/// Best convergent of `value` whose numerator and denominator stay below `max_height`
pub fn best_with_height(value: f64, max_height: i64) -> Option<Exponent> {
    convergents(value, 64)
        .into_iter()
        .take_while(|c| c.numer().unsigned_abs() <= max_height.unsigned_abs() && *c.denom() <= max_height)
        .last()
}

/// Least common multiple of the denominators of a set of fractions
pub fn denominator_lcm<'a>(values: impl IntoIterator<Item = &'a Exponent>) -> i64 {
    values
        .into_iter()
        .fold(1i64, |acc, value| acc.lcm(value.denom()))
}

pub fn format_ratio(value: &Exponent) -> String {
    if value.is_integer() {
        format!("{}", value.numer())
    } else {
        format!("{}/{}", value.numer(), value.denom())
    }
}

/// Render a fraction as a terminating decimal, `None` if it does not terminate
pub fn terminating_decimal(value: &Exponent) -> Option<String> {
    let mut denominator = *value.denom();
    let mut twos = 0u32;
    let mut fives = 0u32;
    while denominator % 2 == 0 {
        denominator /= 2;
        twos += 1;
    }
    while denominator % 5 == 0 {
        denominator /= 5;
        fives += 1;
    }
    if denominator != 1 {
        return None;
    }
    let digits = twos.max(fives);
    let scale = 10i64.checked_pow(digits)?;
    let scaled = value.checked_mul(&Exponent::from_integer(scale))?.to_integer();
    let sign = if value.is_negative() { "-" } else { "" };
    let magnitude = scaled.abs();
    let whole = magnitude / scale;
    let fractional = magnitude % scale;
    if digits == 0 {
        return Some(format!("{}{}", sign, whole));
    }
    Some(format!(
        "{}{}.{:0width$}",
        sign,
        whole,
        fractional,
        width = digits as usize
    ))
}
