//! Functional Just System inflections
//!
//! An FJS spelling is a Pythagorean interval (or absolute pitch) corrected by
//! a list of superscript and subscript inflections. Each inflection names a
//! prime or composite together with a flavor that selects the comma table.

use std::fmt;
use std::str::FromStr;

use num_traits::{One, Signed};
use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};
use crate::models::literal::{AbsoluteFjsLiteral, FjsLiteral};
use crate::models::monzo::TimeMonzo;
use crate::notation::absolute::absolute_to_node;
use crate::notation::commas::{comma_table, flora_comma, formal_comma, neutral_comma};
use crate::notation::pythagorean::monzo_to_node;
use crate::utils::primes::{factor_over, to_monzo, PRIMES};
use crate::utils::rational::Exponent;

/// Comma family selected by an inflection suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FjsFlavor {
    /// No suffix
    #[default]
    Formal,
    /// `c`, an explicit alias of the formal commas
    Classic,
    /// `f`
    FloraC,
    /// `n`, neutral/bridging commas
    Neutral,
    /// `h`, Helmholtz-Ellis (external table)
    HelmholtzEllis,
    /// `m`, HEWM53 (external table)
    Hewm53,
    /// `l`, Lumi (external table, non-prime basis)
    Lumi,
    /// `s`, syntonic-rastmic (external table, non-prime basis)
    SyntonicRastmic,
}

impl FjsFlavor {
    pub const ALL: [FjsFlavor; 8] = [
        FjsFlavor::Formal,
        FjsFlavor::Classic,
        FjsFlavor::FloraC,
        FjsFlavor::Neutral,
        FjsFlavor::HelmholtzEllis,
        FjsFlavor::Hewm53,
        FjsFlavor::Lumi,
        FjsFlavor::SyntonicRastmic,
    ];

    /// Suffix written after the inflection number
    pub fn as_str(&self) -> &'static str {
        match self {
            FjsFlavor::Formal => "",
            FjsFlavor::Classic => "c",
            FjsFlavor::FloraC => "f",
            FjsFlavor::Neutral => "n",
            FjsFlavor::HelmholtzEllis => "h",
            FjsFlavor::Hewm53 => "m",
            FjsFlavor::Lumi => "l",
            FjsFlavor::SyntonicRastmic => "s",
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == suffix)
    }

    /// Flavors whose commas are discovered rather than looked up
    pub fn is_native(&self) -> bool {
        matches!(
            self,
            FjsFlavor::Formal | FjsFlavor::Classic | FjsFlavor::FloraC | FjsFlavor::Neutral
        )
    }
}

impl fmt::Display for FjsFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FjsFlavor {
    type Err = IntervalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_suffix(s)
            .ok_or_else(|| IntervalError::representation(format!("Unrecognized FJS flavor '{}'", s)))
    }
}

/// A single inflection such as `5`, `11n` or `25`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FjsInflection {
    pub number: u64,
    pub flavor: FjsFlavor,
}

impl FjsInflection {
    pub fn new(number: u64, flavor: FjsFlavor) -> Self {
        FjsInflection { number, flavor }
    }
}

impl fmt::Display for FjsInflection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.flavor)
    }
}

/// Comma of the prime at `index` in a prime-basis flavor
fn prime_comma(index: usize, flavor: FjsFlavor) -> Result<TimeMonzo> {
    match flavor {
        FjsFlavor::Formal | FjsFlavor::Classic => formal_comma(index),
        FjsFlavor::FloraC => flora_comma(index),
        FjsFlavor::Neutral => neutral_comma(index),
        _ => comma_table(flavor)?.comma(index as u64),
    }
}

fn inflection_comma(inflection: &FjsInflection) -> Result<TimeMonzo> {
    if !inflection.flavor.is_native() {
        let table = comma_table(inflection.flavor)?;
        if !table.prime_basis() {
            return table.comma(inflection.number);
        }
    }
    let number = i64::try_from(inflection.number)
        .map_err(|_| IntervalError::representation("Inflection number too large"))?;
    let monzo = to_monzo(number)?;
    let mut result = TimeMonzo::unity();
    for (index, &e) in monzo.iter().enumerate() {
        if e == 0 {
            continue;
        }
        let comma = prime_comma(index, inflection.flavor)?;
        result = result.mul(&comma.pow_fraction(&Exponent::from_integer(e))?);
    }
    Ok(result)
}

/// Combined correction factor of superscript and subscript inflections
pub fn get_inflection(
    superscripts: &[FjsInflection],
    subscripts: &[FjsInflection],
) -> Result<TimeMonzo> {
    let mut result = TimeMonzo::unity();
    for inflection in superscripts {
        result = result.mul(&inflection_comma(inflection)?);
    }
    for inflection in subscripts {
        result = result.div(&inflection_comma(inflection)?)?;
    }
    Ok(result)
}

/// Apply inflections to a Pythagorean value
pub fn inflect(
    pythagorean: &TimeMonzo,
    superscripts: &[FjsInflection],
    subscripts: &[FjsInflection],
) -> Result<TimeMonzo> {
    Ok(get_inflection(superscripts, subscripts)?.mul(pythagorean))
}

/// Result of splitting a value into its Pythagorean part and inflections
#[derive(Debug, Clone, PartialEq)]
pub struct Uninflected {
    pub pythagorean: TimeMonzo,
    pub superscripts: Vec<FjsInflection>,
    pub subscripts: Vec<FjsInflection>,
}

/// Push `count` copies of `p`, merged into the fewest composites that fit
fn push_collapsed(target: &mut Vec<FjsInflection>, p: i64, count: u32, flavor: FjsFlavor) {
    if count == 0 {
        return;
    }
    let base = p as u64;
    if let Some(composite) = base.checked_pow(count) {
        target.push(FjsInflection::new(composite, flavor));
        return;
    }
    let mut chunk = base;
    let mut width = 1;
    while let Some(next) = chunk.checked_mul(base) {
        chunk = next;
        width += 1;
    }
    target.extend((0..count / width).map(|_| FjsInflection::new(chunk, flavor)));
    let rest = count % width;
    if rest > 0 {
        target.push(FjsInflection::new(base.pow(rest), flavor));
    }
}

/// Decompose the exponents of primes beyond 3 into inflections
pub fn uninflect(monzo: &TimeMonzo, flavor: FjsFlavor) -> Result<Uninflected> {
    let table = if flavor.is_native() {
        None
    } else {
        let table = comma_table(flavor)?;
        if !table.prime_basis() {
            return Err(IntervalError::representation(
                "Uninflection not implemented in non-prime basis",
            ));
        }
        Some(table)
    };
    let swapped = |index: usize| table.as_ref().map_or(false, |t| t.swapped(index));

    let mut superscripts = Vec::new();
    let mut subscripts = Vec::new();
    let mut distribute = |index: usize, count: i64| {
        let p = PRIMES[index];
        let (upper, lower) = if swapped(index) {
            (&mut subscripts, &mut superscripts)
        } else {
            (&mut superscripts, &mut subscripts)
        };
        let magnitude = u32::try_from(count.unsigned_abs()).unwrap_or(u32::MAX);
        if count > 0 {
            push_collapsed(upper, p, magnitude, flavor);
        } else {
            push_collapsed(lower, p, magnitude, flavor);
        }
    };

    for (index, e) in monzo.prime_exponents.iter().enumerate().skip(2) {
        if !e.is_integer() {
            return Err(IntervalError::representation(format!(
                "Cannot uninflect fractional exponent {} of prime {}",
                e, PRIMES[index]
            )));
        }
        distribute(index, e.to_integer());
    }

    if !monzo.residual.is_one() && monzo.residual.is_positive() {
        let (numerator, numerator_rest) = factor_over(*monzo.residual.numer(), PRIMES.len());
        let (denominator, denominator_rest) = factor_over(*monzo.residual.denom(), PRIMES.len());
        if numerator_rest == 1 && denominator_rest == 1 {
            let length = numerator.len().max(denominator.len());
            for index in 2..length {
                let count = numerator.get(index).copied().unwrap_or(0)
                    - denominator.get(index).copied().unwrap_or(0);
                distribute(index, count);
            }
        } else {
            log::trace!("Residual {} does not factor over the prime table", monzo.residual);
        }
    }

    let pythagorean = monzo.div(&get_inflection(&superscripts, &subscripts)?)?;
    Ok(Uninflected {
        pythagorean,
        superscripts,
        subscripts,
    })
}

/// Exponents that can be spelled with inflections at all
fn inflectable(monzo: &TimeMonzo) -> bool {
    if monzo.cents != 0.0 {
        log::trace!("No FJS spelling for a value with real cents");
        return false;
    }
    if !monzo.residual.is_positive() {
        log::trace!("No FJS spelling for a non-positive value");
        return false;
    }
    if monzo.prime_exponents.iter().skip(2).any(|e| !e.is_integer()) {
        log::trace!("No FJS spelling for fractional exponents beyond the 3-limit");
        return false;
    }
    true
}

fn leftover_residual(uninflected: &Uninflected) -> bool {
    if !uninflected.pythagorean.residual.is_one() {
        log::trace!(
            "Residual {} left over after uninflection",
            uninflected.pythagorean.residual
        );
        return true;
    }
    false
}

/// Spell a relative value in FJS, `None` if it has no spelling
pub fn as_fjs(monzo: &TimeMonzo, flavor: FjsFlavor) -> Result<Option<FjsLiteral>> {
    if !monzo.is_scalar() || !inflectable(monzo) {
        return Ok(None);
    }
    let uninflected = uninflect(monzo, flavor)?;
    if leftover_residual(&uninflected) {
        return Ok(None);
    }
    let Some(pythagorean) = monzo_to_node(&uninflected.pythagorean) else {
        log::trace!("Pythagorean part {} has no name", uninflected.pythagorean);
        return Ok(None);
    };
    Ok(Some(FjsLiteral {
        ups: 0,
        lifts: 0,
        pythagorean,
        superscripts: uninflected.superscripts,
        subscripts: uninflected.subscripts,
    }))
}

/// Spell a value relative to C4 as an absolute pitch, `None` if it has no spelling
pub fn as_absolute_fjs(monzo: &TimeMonzo, flavor: FjsFlavor) -> Result<Option<AbsoluteFjsLiteral>> {
    if !monzo.is_scalar() || !inflectable(monzo) {
        return Ok(None);
    }
    let uninflected = uninflect(monzo, flavor)?;
    if leftover_residual(&uninflected) {
        return Ok(None);
    }
    let Some(pitch) = absolute_to_node(&uninflected.pythagorean) else {
        log::trace!("Pythagorean part {} has no pitch spelling", uninflected.pythagorean);
        return Ok(None);
    };
    Ok(Some(AbsoluteFjsLiteral {
        ups: 0,
        lifts: 0,
        pitch,
        superscripts: uninflected.superscripts,
        subscripts: uninflected.subscripts,
    }))
}
