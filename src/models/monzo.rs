//! Exact interval values
//!
//! `TimeMonzo` stores a quantity as rational exponents of the first
//! `NUMBER_OF_COMPONENTS` primes, a rational residual holding everything
//! else (larger primes, the sign and zero) and a real offset in cents.
//! A nonzero time exponent makes the value absolute: `-1` is a frequency,
//! `+1` a duration.
//!
//! Operations stay exact while they can. Irrational results fold into
//! `cents` and `i64` overflow degrades to cents with a warning.

use std::cmp::Ordering;
use std::fmt;

use num_integer::Integer;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};
use crate::utils::primes::{factor_magnitude, factor_over, NUMBER_OF_COMPONENTS, PRIMES, PRIME_CENTS};
use crate::utils::rational::{
    best_with_height, cents_to_value, checked_pow, checked_root, convergents, denominator_lcm,
    float_as_integer, format_ratio, ratio_to_f64, simplest_within, value_to_cents, Exponent,
};

/// Largest denominator tried when verifying an exact logarithm
const MAX_LOG_DENOMINATOR: i64 = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeMonzo {
    pub time_exponent: Exponent,
    pub prime_exponents: Vec<Exponent>,
    pub residual: Exponent,
    pub cents: f64,
}

impl Default for TimeMonzo {
    fn default() -> Self {
        TimeMonzo::unity()
    }
}

/// Combine two exponent vectors element-wise, padding the shorter with zeros
fn zip_exponents(
    a: &[Exponent],
    b: &[Exponent],
    op: impl Fn(&Exponent, &Exponent) -> Option<Exponent>,
) -> Option<Vec<Exponent>> {
    let zero = Exponent::zero();
    let length = a.len().max(b.len());
    let mut result = Vec::with_capacity(length);
    for i in 0..length {
        let x = a.get(i).unwrap_or(&zero);
        let y = b.get(i).unwrap_or(&zero);
        result.push(op(x, y)?);
    }
    Some(trimmed(result))
}

fn trimmed(mut exponents: Vec<Exponent>) -> Vec<Exponent> {
    while exponents.last().map_or(false, |e| e.is_zero()) {
        exponents.pop();
    }
    exponents
}

impl TimeMonzo {
    /// Build a value and restore the canonical form.
    ///
    /// Small-prime factors found in the residual move into the exponents.
    pub fn new(time_exponent: Exponent, prime_exponents: Vec<Exponent>, residual: Exponent) -> Self {
        Self::with_cents(time_exponent, prime_exponents, residual, 0.0)
    }

    pub fn with_cents(
        time_exponent: Exponent,
        prime_exponents: Vec<Exponent>,
        residual: Exponent,
        cents: f64,
    ) -> Self {
        if residual.is_zero() {
            return TimeMonzo {
                time_exponent,
                prime_exponents: Vec::new(),
                residual,
                cents: 0.0,
            };
        }
        let factored = Self::from_fraction(residual);
        let mut exponents = prime_exponents;
        if exponents.len() < factored.prime_exponents.len() {
            exponents.resize(factored.prime_exponents.len(), Exponent::zero());
        }
        for (e, f) in exponents.iter_mut().zip(factored.prime_exponents.iter()) {
            *e += f;
        }
        TimeMonzo {
            time_exponent,
            prime_exponents: trimmed(exponents),
            residual: factored.residual,
            cents,
        }
    }

    pub fn unity() -> Self {
        TimeMonzo {
            time_exponent: Exponent::zero(),
            prime_exponents: Vec::new(),
            residual: Exponent::one(),
            cents: 0.0,
        }
    }

    pub fn zero() -> Self {
        TimeMonzo {
            time_exponent: Exponent::zero(),
            prime_exponents: Vec::new(),
            residual: Exponent::zero(),
            cents: 0.0,
        }
    }

    pub fn from_integer(value: i64) -> Self {
        Self::from_fraction(Exponent::from_integer(value))
    }

    pub fn from_fraction(value: Exponent) -> Self {
        if value.is_zero() {
            return Self::zero();
        }
        let (numerator, numerator_rest) = factor_magnitude(*value.numer(), NUMBER_OF_COMPONENTS);
        let (denominator, denominator_rest) = factor_over(*value.denom(), NUMBER_OF_COMPONENTS);
        let as_exponents = |v: Vec<i64>| v.into_iter().map(Exponent::from_integer).collect::<Vec<_>>();
        let prime_exponents = zip_exponents(&as_exponents(numerator), &as_exponents(denominator), |a, b| {
            Some(a - b)
        })
        .unwrap_or_default();
        TimeMonzo {
            time_exponent: Exponent::zero(),
            prime_exponents,
            residual: Exponent::new(numerator_rest * value.numer().signum(), denominator_rest),
            cents: 0.0,
        }
    }

    /// Pure real cents with no exact part
    pub fn from_cents(cents: f64) -> Self {
        TimeMonzo {
            cents,
            ..Self::unity()
        }
    }

    /// Exact cents: stored as a rational power of two
    pub fn from_fractional_cents(cents: Exponent) -> Self {
        TimeMonzo {
            prime_exponents: trimmed(vec![cents / Exponent::from_integer(1200)]),
            ..Self::unity()
        }
    }

    /// Convert a float, staying exact for integer values
    pub fn from_real(value: f64) -> Self {
        if let Some(n) = float_as_integer(value) {
            return Self::from_integer(n);
        }
        if value < 0.0 {
            return TimeMonzo {
                residual: -Exponent::one(),
                ..Self::from_cents(value_to_cents(-value))
            };
        }
        Self::from_cents(value_to_cents(value))
    }

    /// `fraction_of_equave` steps of an equal division of `equave`
    pub fn from_equal_temperament(fraction_of_equave: Exponent, equave: Exponent) -> Result<Self> {
        Self::from_fraction(equave).pow_fraction(&fraction_of_equave)
    }

    pub fn with_time_exponent(mut self, time_exponent: Exponent) -> Self {
        self.time_exponent = time_exponent;
        self
    }

    /// Replacement for a result that no longer fits in `i64` exponents
    fn degraded(time_exponent: Exponent, negative: bool, cents: f64) -> Self {
        log::warn!("Exact arithmetic overflowed; falling back to {} real cents", cents);
        TimeMonzo {
            time_exponent,
            prime_exponents: Vec::new(),
            residual: if negative { -Exponent::one() } else { Exponent::one() },
            cents,
        }
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    pub fn is_zero(&self) -> bool {
        self.residual.is_zero()
    }

    pub fn is_unity(&self) -> bool {
        self.time_exponent.is_zero()
            && self.prime_exponents.is_empty()
            && self.residual.is_one()
            && self.cents == 0.0
    }

    pub fn is_scalar(&self) -> bool {
        self.time_exponent.is_zero()
    }

    pub fn is_fractional(&self) -> bool {
        self.cents == 0.0 && self.prime_exponents.iter().all(|e| e.is_integer())
    }

    pub fn is_integral(&self) -> bool {
        self.is_fractional()
            && self.residual.is_integer()
            && self.prime_exponents.iter().all(|e| !e.is_negative())
    }

    /// Exact value whose exponents may be fractional but which has no residual
    pub fn is_equal_temperament(&self) -> bool {
        self.cents == 0.0 && self.residual.is_one()
    }

    /// Nothing but a real offset in cents
    pub fn is_real_cents(&self) -> bool {
        self.time_exponent.is_zero()
            && self.prime_exponents.is_empty()
            && self.residual.is_one()
            && self.cents != 0.0
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    pub fn to_fraction(&self) -> Result<Exponent> {
        if !self.is_fractional() {
            return Err(IntervalError::representation(
                "Cannot convert an irrational value to a fraction",
            ));
        }
        let overflow = || IntervalError::representation("Fraction too large to represent");
        let mut result = self.residual;
        for (e, &p) in self.prime_exponents.iter().zip(PRIMES.iter()) {
            let factor = checked_pow(&Exponent::from_integer(p), e.to_integer()).ok_or_else(overflow)?;
            result = result.checked_mul(&factor).ok_or_else(overflow)?;
        }
        Ok(result)
    }

    pub fn to_integer(&self) -> Result<i64> {
        let fraction = self.to_fraction()?;
        if !fraction.is_integer() {
            return Err(IntervalError::representation(format!(
                "{} is not an integer",
                format_ratio(&fraction)
            )));
        }
        Ok(fraction.to_integer())
    }

    pub fn value_of(&self) -> f64 {
        if let Ok(fraction) = self.to_fraction() {
            return ratio_to_f64(&fraction);
        }
        if self.is_zero() {
            return 0.0;
        }
        let magnitude = cents_to_value(self.total_cents());
        if self.residual.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Size in cents, ignoring the sign
    pub fn total_cents(&self) -> f64 {
        let mut total = self.cents;
        for (e, c) in self.prime_exponents.iter().zip(PRIME_CENTS.iter()) {
            total += ratio_to_f64(e) * c;
        }
        if !self.residual.is_one() {
            total += value_to_cents(ratio_to_f64(&self.residual.abs()));
        }
        total
    }

    /// Base two logarithm
    pub fn octaves(&self) -> Result<TimeMonzo> {
        self.log(&TimeMonzo::from_integer(2))
    }

    /// Decompose into `(fraction_of_equave, equave)` with the equave above unison
    pub fn to_equal_temperament(&self) -> Result<(Exponent, Exponent)> {
        if !self.is_equal_temperament() || !self.is_scalar() {
            return Err(IntervalError::representation(
                "Value is not an equal-tempered interval",
            ));
        }
        if self.prime_exponents.is_empty() {
            return Ok((Exponent::zero(), Exponent::one()));
        }
        let denominator = denominator_lcm(self.prime_exponents.iter());
        let scaled: Vec<i64> = self
            .prime_exponents
            .iter()
            .map(|e| (e * Exponent::from_integer(denominator)).to_integer())
            .collect();
        let divisor = scaled.iter().fold(0i64, |acc, x| acc.gcd(x));
        let equave_monzo = TimeMonzo::new(
            Exponent::zero(),
            scaled
                .iter()
                .map(|x| Exponent::from_integer(x / divisor))
                .collect(),
            Exponent::one(),
        );
        let mut equave = equave_monzo.to_fraction()?;
        let mut fraction = Exponent::new(divisor, denominator);
        if equave < Exponent::one() {
            equave = equave.recip();
            fraction = -fraction;
        }
        Ok((fraction, equave))
    }

    /// Simplest continued-fraction convergent within `epsilon`
    pub fn approximate_fraction(&self, epsilon: f64) -> Result<TimeMonzo> {
        simplest_within(self.value_of(), epsilon)
            .map(|f| TimeMonzo::from_fraction(f).with_time_exponent(self.time_exponent))
            .ok_or_else(|| IntervalError::representation("Unable to approximate value as a fraction"))
    }

    /// Simplest fraction within `tolerance` cents, or the value itself when exact
    pub fn approximate_simple(&self, tolerance: f64) -> Result<TimeMonzo> {
        if self.is_fractional() {
            return Ok(self.clone());
        }
        let magnitude = self.value_of().abs();
        let target = self.total_cents();
        let candidate = convergents(magnitude, 64)
            .into_iter()
            .filter(|c| c.is_positive())
            .find(|c| (value_to_cents(ratio_to_f64(c)) - target).abs() < tolerance)
            .or_else(|| simplest_within(magnitude, 1e-9))
            .ok_or_else(|| IntervalError::representation("Unable to approximate value as a fraction"))?;
        let candidate = if self.residual.is_negative() { -candidate } else { candidate };
        Ok(TimeMonzo::from_fraction(candidate).with_time_exponent(self.time_exponent))
    }

    /// Best `(radicand, index)` such that `radicand^(1/index)` approximates the value
    pub fn approximate_radical(&self, max_index: u32, max_height: i64) -> Option<(Exponent, u32)> {
        let value = self.value_of();
        if !(value > 0.0) || !value.is_finite() {
            return None;
        }
        let target = value.ln();
        let mut best: Option<(Exponent, u32, f64)> = None;
        for index in 1..=max_index.max(1) {
            let Some(radicand) = best_with_height(value.powi(index as i32), max_height) else {
                continue;
            };
            if !radicand.is_positive() {
                continue;
            }
            let error = (ratio_to_f64(&radicand).ln() / index as f64 - target).abs();
            if best.as_ref().map_or(true, |(_, _, e)| error < *e) {
                best = Some((radicand, index, error));
            }
        }
        best.map(|(radicand, index, _)| (radicand, index))
    }

    // ========================================================================
    // Multiplicative group
    // ========================================================================

    fn exact_mul(&self, other: &TimeMonzo) -> Option<TimeMonzo> {
        Some(TimeMonzo {
            time_exponent: self.time_exponent.checked_add(&other.time_exponent)?,
            prime_exponents: zip_exponents(&self.prime_exponents, &other.prime_exponents, |a, b| {
                a.checked_add(b)
            })?,
            residual: self.residual.checked_mul(&other.residual)?,
            cents: self.cents + other.cents,
        })
    }

    pub fn mul(&self, other: &TimeMonzo) -> TimeMonzo {
        if self.is_zero() || other.is_zero() {
            return TimeMonzo::zero()
                .with_time_exponent(self.time_exponent + other.time_exponent);
        }
        self.exact_mul(other).unwrap_or_else(|| {
            Self::degraded(
                self.time_exponent + other.time_exponent,
                self.residual.is_negative() != other.residual.is_negative(),
                self.total_cents() + other.total_cents(),
            )
        })
    }

    pub fn inverse(&self) -> Result<TimeMonzo> {
        if self.is_zero() {
            return Err(IntervalError::DivisionByZero);
        }
        Ok(TimeMonzo {
            time_exponent: -self.time_exponent,
            prime_exponents: self.prime_exponents.iter().map(|e| -e).collect(),
            residual: self.residual.recip(),
            cents: -self.cents,
        })
    }

    pub fn div(&self, other: &TimeMonzo) -> Result<TimeMonzo> {
        Ok(self.mul(&other.inverse()?))
    }

    /// Raise to a rational power
    pub fn pow_fraction(&self, exponent: &Exponent) -> Result<TimeMonzo> {
        if exponent.is_zero() {
            return Ok(TimeMonzo::unity());
        }
        if self.is_zero() {
            if exponent.is_negative() {
                return Err(IntervalError::DivisionByZero);
            }
            return Ok(TimeMonzo::zero().with_time_exponent(self.time_exponent * exponent));
        }
        let scaled = self.time_exponent.checked_mul(exponent).and_then(|time_exponent| {
            let primes = self
                .prime_exponents
                .iter()
                .map(|e| e.checked_mul(exponent))
                .collect::<Option<Vec<_>>>()?;
            Some((time_exponent, trimmed(primes)))
        });
        let exponent_f64 = ratio_to_f64(exponent);
        let negative = self.residual.is_negative();
        let Some((time_exponent, prime_exponents)) = scaled else {
            return Ok(Self::degraded(
                self.time_exponent * exponent,
                negative && exponent.is_integer() && exponent.to_integer().is_odd(),
                self.total_cents() * exponent_f64,
            ));
        };
        let mut cents = self.cents * exponent_f64;
        let residual = if exponent.is_integer() {
            match checked_pow(&self.residual, exponent.to_integer()) {
                Some(residual) => residual,
                None => {
                    return Ok(Self::degraded(
                        time_exponent,
                        negative && exponent.to_integer().is_odd(),
                        self.total_cents() * exponent_f64,
                    ))
                }
            }
        } else if self.residual.is_one() {
            Exponent::one()
        } else if negative {
            return Err(IntervalError::representation(
                "Cannot raise a negative value to a fractional power",
            ));
        } else if let Some(power) = checked_root(&self.residual, *exponent.denom())
            .and_then(|root| checked_pow(&root, *exponent.numer()))
        {
            power
        } else {
            cents += value_to_cents(ratio_to_f64(&self.residual)) * exponent_f64;
            Exponent::one()
        };
        Ok(TimeMonzo {
            time_exponent,
            prime_exponents,
            residual,
            cents,
        })
    }

    /// Raise to a scalar power, collapsing to cents for irrational exponents
    pub fn pow(&self, exponent: &TimeMonzo) -> Result<TimeMonzo> {
        if !exponent.is_scalar() {
            return Err(IntervalError::representation("Only scalar exponentiation implemented"));
        }
        if let Ok(fraction) = exponent.to_fraction() {
            return self.pow_fraction(&fraction);
        }
        if !self.is_scalar() {
            return Err(IntervalError::representation(
                "Cannot raise an absolute value to an irrational power",
            ));
        }
        if self.residual.is_negative() {
            return Err(IntervalError::representation(
                "Cannot raise a negative value to an irrational power",
            ));
        }
        if self.is_zero() {
            return Ok(TimeMonzo::zero());
        }
        Ok(TimeMonzo::from_cents(self.total_cents() * exponent.value_of()))
    }

    /// Vector whose inner product with `self` is one
    pub fn geometric_inverse(&self) -> Result<TimeMonzo> {
        if !self.residual.is_one() {
            return Err(IntervalError::representation(
                "Geometric inverse only implemented for values without residual",
            ));
        }
        let magnitude = self.dot(self)?;
        if magnitude.is_zero() {
            return Err(IntervalError::representation("No geometric inverse exists"));
        }
        self.pow_fraction(&magnitude.recip())
    }

    /// Exact inner product over time, prime and cents coordinates
    pub fn dot(&self, other: &TimeMonzo) -> Result<Exponent> {
        let overflow = || IntervalError::representation("Overflow in dot product");
        let mut result = self
            .time_exponent
            .checked_mul(&other.time_exponent)
            .ok_or_else(overflow)?;
        for (a, b) in self.prime_exponents.iter().zip(other.prime_exponents.iter()) {
            let product = a.checked_mul(b).ok_or_else(overflow)?;
            result = result.checked_add(&product).ok_or_else(overflow)?;
        }
        if self.cents != 0.0 && other.cents != 0.0 {
            let a = Exponent::approximate_float(self.cents).ok_or_else(overflow)?;
            let b = Exponent::approximate_float(other.cents).ok_or_else(overflow)?;
            let product = a.checked_mul(&b).ok_or_else(overflow)?;
            result = result.checked_add(&product).ok_or_else(overflow)?;
        }
        Ok(result)
    }

    // ========================================================================
    // Additive operations
    // ========================================================================

    fn check_time(&self, other: &TimeMonzo, operation: &str) -> Result<()> {
        if self.time_exponent != other.time_exponent {
            return Err(IntervalError::representation(format!(
                "Time exponents must match in {}",
                operation
            )));
        }
        Ok(())
    }

    fn linear_op(
        &self,
        other: &TimeMonzo,
        exact: impl Fn(&Exponent, &Exponent) -> Option<Exponent>,
        real: impl Fn(f64, f64) -> f64,
    ) -> TimeMonzo {
        if let (Ok(a), Ok(b)) = (self.to_fraction(), other.to_fraction()) {
            if let Some(result) = exact(&a, &b) {
                return TimeMonzo::from_fraction(result).with_time_exponent(self.time_exponent);
            }
            log::warn!("Exact linear arithmetic overflowed; falling back to floating point");
        }
        TimeMonzo::from_real(real(self.value_of(), other.value_of()))
            .with_time_exponent(self.time_exponent)
    }

    pub fn add(&self, other: &TimeMonzo) -> Result<TimeMonzo> {
        self.check_time(other, "addition")?;
        if self.is_zero() {
            return Ok(other.clone());
        }
        if other.is_zero() {
            return Ok(self.clone());
        }
        Ok(self.linear_op(other, |a, b| a.checked_add(b), |a, b| a + b))
    }

    pub fn sub(&self, other: &TimeMonzo) -> Result<TimeMonzo> {
        self.check_time(other, "subtraction")?;
        if other.is_zero() {
            return Ok(self.clone());
        }
        Ok(self.linear_op(other, |a, b| a.checked_sub(b), |a, b| a - b))
    }

    pub fn neg(&self) -> TimeMonzo {
        TimeMonzo {
            residual: -self.residual,
            ..self.clone()
        }
    }

    pub fn abs(&self) -> TimeMonzo {
        TimeMonzo {
            residual: self.residual.abs(),
            ..self.clone()
        }
    }

    /// Absolute value in pitch space: never below unison
    pub fn pitch_abs(&self) -> Result<TimeMonzo> {
        let magnitude = self.abs();
        if magnitude.total_cents() < 0.0 {
            return magnitude.inverse();
        }
        Ok(magnitude)
    }

    /// Harmonic sum `1 / (1/a + 1/b)`
    pub fn lens_add(&self, other: &TimeMonzo) -> Result<TimeMonzo> {
        if self.is_zero() || other.is_zero() {
            return Ok(TimeMonzo::zero().with_time_exponent(self.time_exponent));
        }
        self.inverse()?.add(&other.inverse()?)?.inverse()
    }

    /// Harmonic difference `1 / (1/a - 1/b)`
    pub fn lens_sub(&self, other: &TimeMonzo) -> Result<TimeMonzo> {
        if self.is_zero() || other.is_zero() {
            return Ok(TimeMonzo::zero().with_time_exponent(self.time_exponent));
        }
        self.inverse()?.sub(&other.inverse()?)?.inverse()
    }

    // ========================================================================
    // Logarithms and rounding
    // ========================================================================

    /// Ratio of two proportional exponent vectors
    fn exponent_ratio(&self, base: &TimeMonzo) -> Option<Exponent> {
        let zero = Exponent::zero();
        let length = self.prime_exponents.len().max(base.prime_exponents.len());
        let pairs = std::iter::once((&self.time_exponent, &base.time_exponent)).chain(
            (0..length).map(|i| {
                (
                    self.prime_exponents.get(i).unwrap_or(&zero),
                    base.prime_exponents.get(i).unwrap_or(&zero),
                )
            }),
        );
        let mut ratio: Option<Exponent> = None;
        for (a, b) in pairs {
            if b.is_zero() {
                if !a.is_zero() {
                    return None;
                }
                continue;
            }
            let r = a.checked_div(b)?;
            match ratio {
                Some(existing) if existing != r => return None,
                _ => ratio = Some(r),
            }
        }
        ratio
    }

    fn log_magnitude(&self, base: &TimeMonzo) -> Result<TimeMonzo> {
        if self.is_zero() || base.is_zero() {
            return Err(IntervalError::representation("Logarithm of zero"));
        }
        if base.total_cents() == 0.0 {
            return Err(IntervalError::representation("Logarithm base must not be unity"));
        }
        if self.cents == 0.0 && base.cents == 0.0 {
            if self.residual.is_one() && base.residual.is_one() {
                if let Some(ratio) = self.exponent_ratio(base) {
                    return Ok(TimeMonzo::from_fraction(ratio));
                }
            }
            let estimate = self.total_cents() / base.total_cents();
            if let Some(candidate) = simplest_within(estimate, 1e-9) {
                if *candidate.denom() <= MAX_LOG_DENOMINATOR
                    && base.pow_fraction(&candidate).map_or(false, |power| power == *self)
                {
                    return Ok(TimeMonzo::from_fraction(candidate));
                }
            }
        }
        Ok(TimeMonzo::from_real(self.total_cents() / base.total_cents()))
    }

    /// Logarithm of `self` in the given base
    ///
    /// Negative operands follow sign rules: two negatives take the logarithm
    /// of the magnitudes, a negative base needs an integer result whose parity
    /// matches the sign of the argument, and a negative argument with a
    /// positive base is NaN.
    pub fn log(&self, base: &TimeMonzo) -> Result<TimeMonzo> {
        let magnitude = self.abs().log_magnitude(&base.abs())?;
        match (self.residual.is_negative(), base.residual.is_negative()) {
            (false, false) | (true, true) => Ok(magnitude),
            (true, false) => Ok(TimeMonzo::from_real(f64::NAN)),
            (false, true) => match magnitude.to_integer() {
                Ok(n) if n.is_even() => Ok(magnitude),
                _ => Ok(TimeMonzo::from_real(f64::NAN)),
            },
        }
    }

    fn integer_count(count: &TimeMonzo, round: impl Fn(&Exponent) -> Exponent, round_f64: impl Fn(f64) -> f64) -> Result<i64> {
        if let Ok(fraction) = count.to_fraction() {
            return Ok(round(&fraction).to_integer());
        }
        let value = round_f64(count.value_of());
        if !value.is_finite() {
            return Err(IntervalError::representation("Rounding produced a non-finite count"));
        }
        value
            .to_i64()
            .ok_or_else(|| IntervalError::representation("Rounding count out of range"))
    }

    /// Reduce multiplicatively into `[1, modulus)`, or `(1, modulus]` with `ceiling`
    pub fn reduce(&self, modulus: &TimeMonzo, ceiling: bool) -> Result<TimeMonzo> {
        let multiplier = self.log(modulus)?;
        let count = if ceiling {
            Self::integer_count(&multiplier, |f| f.ceil() - Exponent::one(), |v| v.ceil() - 1.0)?
        } else {
            Self::integer_count(&multiplier, |f| f.floor(), f64::floor)?
        };
        self.div(&modulus.pow_fraction(&Exponent::from_integer(count))?)
    }

    /// Floored modulo, or ceiling modulo that maps multiples to `modulus`
    pub fn mmod(&self, modulus: &TimeMonzo, ceiling: bool) -> Result<TimeMonzo> {
        self.check_time(modulus, "modulo")?;
        if modulus.is_zero() {
            return Err(IntervalError::DivisionByZero);
        }
        let result = self.linear_op(
            modulus,
            |a, m| {
                let quotient = a.checked_div(m)?.floor();
                a.checked_sub(&m.checked_mul(&quotient)?)
            },
            |a, m| ((a % m) + m) % m,
        );
        if ceiling && result.is_zero() {
            return Ok(modulus.clone());
        }
        Ok(result)
    }

    /// Round to the nearest multiple of `other`
    pub fn round_to(&self, other: &TimeMonzo) -> Result<TimeMonzo> {
        self.check_time(other, "rounding")?;
        if other.is_zero() {
            return Err(IntervalError::DivisionByZero);
        }
        Ok(self.linear_op(
            other,
            |a, m| m.checked_mul(&a.checked_div(m)?.round()),
            |a, m| (a / m).round() * m,
        ))
    }

    /// Round to the nearest integer power of `other`
    pub fn pitch_round_to(&self, other: &TimeMonzo) -> Result<TimeMonzo> {
        let multiplier = self.log(other)?;
        let count = Self::integer_count(&multiplier, |f| f.round(), f64::round)?;
        other.pow_fraction(&Exponent::from_integer(count))
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    pub fn compare(&self, other: &TimeMonzo) -> Ordering {
        if let (Ok(a), Ok(b)) = (self.to_fraction(), other.to_fraction()) {
            return a.cmp(&b);
        }
        self.value_of()
            .partial_cmp(&other.value_of())
            .unwrap_or(Ordering::Equal)
    }

    /// Equality of conceptual values
    pub fn equals(&self, other: &TimeMonzo) -> bool {
        if self.time_exponent != other.time_exponent {
            return false;
        }
        if self.cents == 0.0 && other.cents == 0.0 {
            return self.prime_exponents == other.prime_exponents && self.residual == other.residual;
        }
        self.value_of() == other.value_of()
    }

    /// Field-by-field equality
    pub fn strict_equals(&self, other: &TimeMonzo) -> bool {
        self == other
    }

    // ========================================================================
    // Canonical rendering
    // ========================================================================

    fn scalar_string(&self) -> String {
        match self.to_fraction() {
            Ok(fraction) => format_ratio(&fraction),
            Err(_) => format!("{}", self.value_of()),
        }
    }

    /// Rendering in the linear domain
    pub fn linear_string(&self) -> String {
        if !self.is_scalar() {
            let unitless = TimeMonzo {
                time_exponent: Exponent::zero(),
                ..self.clone()
            };
            let magnitude = unitless.scalar_string();
            if self.time_exponent == -Exponent::one() {
                return format!("{} Hz", magnitude);
            }
            if self.time_exponent.is_one() {
                return format!("{} s", magnitude);
            }
            return format!("{} * 1s^{}", magnitude, format_ratio(&self.time_exponent));
        }
        if let Ok(fraction) = self.to_fraction() {
            return format_ratio(&fraction);
        }
        if let Ok((fraction, equave)) = self.to_equal_temperament() {
            return format!("{}^{}", format_ratio(&equave), format_ratio(&fraction));
        }
        format!("{}r", self.value_of())
    }

    /// Rendering in the logarithmic domain
    pub fn logarithmic_string(&self) -> String {
        if !self.is_scalar() {
            return format!("logarithmic({})", self.linear_string());
        }
        if self.is_equal_temperament() {
            if self.prime_exponents.iter().all(|e| e.is_integer()) {
                return format!("[{}>", self.components_string());
            }
            if let Ok((fraction, equave)) = self.to_equal_temperament() {
                let steps = format!("{}\\{}", fraction.numer(), fraction.denom());
                if equave == Exponent::from_integer(2) {
                    return steps;
                }
                return format!("{}<{}>", steps, format_ratio(&equave));
            }
        }
        format!("{}rc", self.total_cents())
    }

    /// Rendering as a tuning map
    pub fn cologarithmic_string(&self) -> String {
        format!("<{}]", self.components_string())
    }

    fn components_string(&self) -> String {
        self.prime_exponents
            .iter()
            .map(format_ratio)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for TimeMonzo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.linear_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> TimeMonzo {
        TimeMonzo::from_fraction(Exponent::new(n, d))
    }

    #[test]
    fn test_from_fraction_splits_residual() {
        let value = frac(-202, 3);
        assert_eq!(
            value.prime_exponents,
            vec![Exponent::from_integer(1), Exponent::from_integer(-1)]
        );
        assert_eq!(value.residual, Exponent::from_integer(-101));
        assert_eq!(value.to_fraction().unwrap(), Exponent::new(-202, 3));
    }

    #[test]
    fn test_new_moves_small_primes_out_of_residual() {
        let value = TimeMonzo::new(Exponent::zero(), vec![], Exponent::new(10, 3));
        assert_eq!(value, frac(10, 3));
    }

    #[test]
    fn test_integer_pow_stays_exact() {
        let value = frac(3, 2).pow_fraction(&Exponent::from_integer(5)).unwrap();
        assert_eq!(value.to_fraction().unwrap(), Exponent::new(243, 32));
        let value = TimeMonzo::from_integer(101).pow_fraction(&Exponent::from_integer(-2)).unwrap();
        assert_eq!(value.to_fraction().unwrap(), Exponent::new(1, 10201));
    }

    #[test]
    fn test_fractional_pow_folds_residual_into_cents() {
        let value = TimeMonzo::from_integer(101).pow_fraction(&Exponent::new(1, 2)).unwrap();
        assert!(value.residual.is_one());
        assert!((value.value_of() - 101f64.sqrt()).abs() < 1e-9);
        assert!(TimeMonzo::from_integer(-4).pow_fraction(&Exponent::new(1, 2)).is_err());
    }

    #[test]
    fn test_add_is_exact_for_fractions() {
        let sum = frac(1, 2).add(&frac(1, 3)).unwrap();
        assert_eq!(sum.to_fraction().unwrap(), Exponent::new(5, 6));
        let zero = TimeMonzo::zero();
        assert_eq!(zero.add(&frac(5, 4)).unwrap(), frac(5, 4));
    }

    #[test]
    fn test_add_reaching_most_negative_integer() {
        let half = TimeMonzo::from_integer(-(1i64 << 62));
        let sum = half.add(&half).unwrap();
        assert_eq!(sum.prime_exponents, vec![Exponent::from_integer(63)]);
        assert_eq!(sum.residual, -Exponent::one());
        assert!((sum.value_of() / -(2f64.powi(63)) - 1.0).abs() < 1e-12);
        let difference = half.sub(&TimeMonzo::from_integer(1i64 << 62)).unwrap();
        assert_eq!(difference, sum);
    }

    #[test]
    fn test_add_requires_matching_time() {
        let hertz = TimeMonzo::from_integer(440).with_time_exponent(-Exponent::one());
        assert!(hertz.add(&TimeMonzo::from_integer(1)).is_err());
        let sum = hertz.add(&hertz).unwrap();
        assert_eq!(sum.linear_string(), "880 Hz");
    }

    #[test]
    fn test_add_irrational_goes_through_floats() {
        let root = TimeMonzo::from_integer(2).pow_fraction(&Exponent::new(1, 2)).unwrap();
        let sum = root.add(&TimeMonzo::from_integer(1)).unwrap();
        assert!((sum.value_of() - (2f64.sqrt() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_log_exact_and_real() {
        let nine = TimeMonzo::from_integer(9);
        let three = TimeMonzo::from_integer(3);
        assert_eq!(nine.log(&three).unwrap().to_fraction().unwrap(), Exponent::from_integer(2));

        let big = TimeMonzo::from_integer(101 * 101 * 101);
        let base = TimeMonzo::from_integer(101 * 101);
        assert_eq!(big.log(&base).unwrap().to_fraction().unwrap(), Exponent::new(3, 2));

        let real = TimeMonzo::from_integer(3).log(&TimeMonzo::from_integer(2)).unwrap();
        assert!((real.value_of() - 3f64.log2()).abs() < 1e-12);
    }

    #[test]
    fn test_log_base_unity() {
        let three = TimeMonzo::from_integer(3);
        assert!(matches!(
            three.log(&TimeMonzo::unity()),
            Err(IntervalError::Representation(_))
        ));
        assert!(three.log(&TimeMonzo::from_integer(-1)).is_err());
        assert!(three.reduce(&TimeMonzo::unity(), false).is_err());
    }

    #[test]
    fn test_log_sign_rules() {
        let minus_eight = TimeMonzo::from_integer(-8);
        let minus_two = TimeMonzo::from_integer(-2);
        assert_eq!(minus_eight.log(&minus_two).unwrap().to_integer().unwrap(), 3);
        let four = TimeMonzo::from_integer(4);
        assert_eq!(four.log(&minus_two).unwrap().to_integer().unwrap(), 2);
        assert!(TimeMonzo::from_integer(8).log(&minus_two).unwrap().value_of().is_nan());
        assert!(minus_eight.log(&TimeMonzo::from_integer(2)).unwrap().value_of().is_nan());
    }

    #[test]
    fn test_reduce() {
        let two = TimeMonzo::from_integer(2);
        assert_eq!(frac(9, 1).reduce(&two, false).unwrap(), frac(9, 8));
        assert_eq!(frac(4, 1).reduce(&two, false).unwrap(), TimeMonzo::unity());
        assert_eq!(frac(4, 1).reduce(&two, true).unwrap(), two);
    }

    #[test]
    fn test_mmod_and_round_to() {
        let seven = TimeMonzo::from_integer(7);
        assert_eq!(TimeMonzo::from_integer(-1).mmod(&seven, false).unwrap(), TimeMonzo::from_integer(6));
        assert_eq!(TimeMonzo::from_integer(14).mmod(&seven, true).unwrap(), seven);
        assert_eq!(frac(17, 2).round_to(&TimeMonzo::from_integer(3)).unwrap(), TimeMonzo::from_integer(9));
    }

    #[test]
    fn test_pitch_round_to() {
        let rounded = frac(3, 2).pitch_round_to(&TimeMonzo::from_integer(2)).unwrap();
        assert_eq!(rounded, TimeMonzo::from_integer(2));
    }

    #[test]
    fn test_equal_temperament() {
        let fifth = frac(3, 2).pow_fraction(&Exponent::new(1, 3)).unwrap();
        let (fraction, equave) = fifth.to_equal_temperament().unwrap();
        assert_eq!(fraction, Exponent::new(1, 3));
        assert_eq!(equave, Exponent::new(3, 2));

        let down = frac(2, 3).pow_fraction(&Exponent::new(1, 3)).unwrap();
        let (fraction, equave) = down.to_equal_temperament().unwrap();
        assert_eq!(fraction, Exponent::new(-1, 3));
        assert_eq!(equave, Exponent::new(3, 2));
    }

    #[test]
    fn test_dot_and_geometric_inverse() {
        let val = TimeMonzo::new(
            Exponent::zero(),
            vec![Exponent::from_integer(12), Exponent::from_integer(19), Exponent::from_integer(28)],
            Exponent::one(),
        );
        assert_eq!(val.dot(&frac(3, 2)).unwrap(), Exponent::from_integer(7));

        let fifth = frac(3, 2);
        let inverse = fifth.geometric_inverse().unwrap();
        assert_eq!(inverse.dot(&fifth).unwrap(), Exponent::one());
    }

    #[test]
    fn test_equals_compares_values() {
        let a = TimeMonzo::from_integer(2).pow_fraction(&Exponent::new(1, 2)).unwrap();
        assert!(a.equals(&a.clone()));
        assert!(!frac(3, 2).equals(&frac(4, 3)));
        assert_eq!(frac(3, 2).compare(&frac(4, 3)), Ordering::Greater);
    }

    #[test]
    fn test_overflow_degrades_to_cents() {
        let big = TimeMonzo::from_integer(1_000_000_007);
        let product = big.mul(&big).mul(&big);
        assert!(product.cents > 0.0);
        assert!((product.total_cents() - 3.0 * value_to_cents(1_000_000_007.0)).abs() < 1e-6);
    }

    #[test]
    fn test_canonical_strings() {
        assert_eq!(frac(5, 4).linear_string(), "5/4");
        let semitone = TimeMonzo::from_integer(2).pow_fraction(&Exponent::new(1, 12)).unwrap();
        assert_eq!(semitone.linear_string(), "2^1/12");
        assert_eq!(semitone.logarithmic_string(), "1\\12");
        assert_eq!(frac(81, 80).logarithmic_string(), "[-4 4 -1>");
        assert_eq!(TimeMonzo::from_cents(1.5).logarithmic_string(), "1.5rc");
    }

    #[test]
    fn test_approximations() {
        let pi = TimeMonzo::from_real(std::f64::consts::PI);
        assert_eq!(pi.approximate_fraction(1e-4).unwrap().to_fraction().unwrap(), Exponent::new(333, 106));
        let root = TimeMonzo::from_real(2f64.sqrt());
        assert_eq!(root.approximate_radical(5, 50000), Some((Exponent::from_integer(2), 2)));
        let near_fifth = TimeMonzo::from_cents(701.0);
        assert_eq!(near_fifth.approximate_simple(3.5).unwrap(), frac(3, 2));
    }
}
