//! Literal nodes to values
//!
//! Every literal kind has a fixed domain: plain numbers, fractions, radicals
//! and frequencies are linear; cents, nedji, monzos and FJS are logarithmic;
//! vals are cologarithmic.

use std::fmt;

use num_traits::{One, Zero};

use crate::error::{IntervalError, Result};
use crate::models::context::RootContext;
use crate::models::interval::{Domain, Interval};
use crate::models::literal::IntervalLiteral;
use crate::models::monzo::TimeMonzo;
use crate::models::val::Val;
use crate::notation::absolute::absolute_monzo;
use crate::notation::fjs::inflect;
use crate::notation::pythagorean::pythagorean_monzo;
use crate::parse::grammar::{parse_literal, ParsedLiteral};
use crate::utils::rational::Exponent;

/// Result of reading a literal: an interval or a val
#[derive(Debug, Clone, PartialEq)]
pub enum Notated {
    Interval(Interval),
    Val(Val),
}

impl Notated {
    pub fn into_interval(self) -> Result<Interval> {
        match self {
            Notated::Interval(interval) => Ok(interval),
            Notated::Val(_) => Err(IntervalError::representation("Expected an interval, got a val")),
        }
    }

    pub fn into_val(self) -> Result<Val> {
        match self {
            Notated::Val(val) => Ok(val),
            Notated::Interval(_) => Err(IntervalError::representation("Expected a val, got an interval")),
        }
    }

    pub fn str(&self, context: Option<&RootContext>) -> String {
        match self {
            Notated::Interval(interval) => interval.to_string_with(context),
            Notated::Val(val) => val.str(context),
        }
    }
}

impl fmt::Display for Notated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.str(None))
    }
}

/// Read a literal and evaluate it in `context`
pub fn from_notation(text: &str, context: &RootContext) -> Result<Notated> {
    let parsed = parse_literal(text)?;
    literal_value(parsed, context)
}

fn ratio(numerator: i64, denominator: i64) -> Result<Exponent> {
    if denominator == 0 {
        return Err(IntervalError::DivisionByZero);
    }
    Ok(Exponent::new(numerator, denominator))
}

/// Multiply in the context's up and lift units
fn with_ups_and_lifts(value: TimeMonzo, ups: i64, lifts: i64, context: &RootContext) -> Result<TimeMonzo> {
    let up = context.up().pow_fraction(&Exponent::from_integer(ups))?;
    let lift = context.lift().pow_fraction(&Exponent::from_integer(lifts))?;
    Ok(value.mul(&up).mul(&lift))
}

fn prime_vector(components: &[Exponent]) -> TimeMonzo {
    TimeMonzo::new(Exponent::zero(), components.to_vec(), Exponent::one())
}

/// Evaluate a parsed literal
pub fn literal_value(parsed: ParsedLiteral, context: &RootContext) -> Result<Notated> {
    let ParsedLiteral { node, unit } = parsed;
    if let Some(unit) = unit {
        let magnitude = match &node {
            IntervalLiteral::Integer { value } => TimeMonzo::from_integer(*value),
            IntervalLiteral::Fraction {
                numerator,
                denominator,
            } => TimeMonzo::from_fraction(ratio(*numerator, *denominator)?),
            IntervalLiteral::Decimal { value } => TimeMonzo::from_fraction(*value),
            IntervalLiteral::RealDecimal { value } => TimeMonzo::from_real(*value),
            _ => return Err(IntervalError::representation("Only scalars can carry a frequency unit")),
        };
        let hertz = TimeMonzo::unity().with_time_exponent(-Exponent::one());
        let value = magnitude
            .mul(&TimeMonzo::from_fraction(unit.scale()))
            .mul(&hertz);
        return Ok(Notated::Interval(Interval::linear(value)));
    }

    let (value, domain) = match &node {
        IntervalLiteral::Integer { value } => (TimeMonzo::from_integer(*value), Domain::Linear),
        IntervalLiteral::Fraction {
            numerator,
            denominator,
        } => (
            TimeMonzo::from_fraction(ratio(*numerator, *denominator)?),
            Domain::Linear,
        ),
        IntervalLiteral::Decimal { value } => (TimeMonzo::from_fraction(*value), Domain::Linear),
        IntervalLiteral::RealDecimal { value } => (TimeMonzo::from_real(*value), Domain::Linear),
        IntervalLiteral::Cents { value } => (
            TimeMonzo::from_fractional_cents(*value),
            Domain::Logarithmic,
        ),
        IntervalLiteral::RealCents { value } => (TimeMonzo::from_cents(*value), Domain::Logarithmic),
        IntervalLiteral::Nedji {
            numerator,
            denominator,
            equave,
        } => (
            TimeMonzo::from_equal_temperament(
                ratio(*numerator, *denominator)?,
                equave.unwrap_or_else(|| Exponent::from_integer(2)),
            )?,
            Domain::Logarithmic,
        ),
        IntervalLiteral::Radical { argument, exponent } => (
            TimeMonzo::from_fraction(*argument).pow_fraction(exponent)?,
            Domain::Linear,
        ),
        IntervalLiteral::Monzo {
            components,
            ups,
            lifts,
        } => (
            with_ups_and_lifts(prime_vector(components), *ups, *lifts, context)?,
            Domain::Logarithmic,
        ),
        IntervalLiteral::Val {
            components,
            ups,
            lifts,
        } => {
            let value = with_ups_and_lifts(prime_vector(components), *ups, *lifts, context)?;
            let inflected = *ups != 0 || *lifts != 0;
            let val = Val::new(value, TimeMonzo::from_integer(2), Some(node.clone()))?;
            return Ok(Notated::Val(if inflected {
                val.stamped(context.epoch())
            } else {
                val
            }));
        }
        IntervalLiteral::Fjs(literal) => {
            let pythagorean = pythagorean_monzo(&literal.pythagorean)?;
            let value = inflect(&pythagorean, &literal.superscripts, &literal.subscripts)?;
            (
                with_ups_and_lifts(value, literal.ups, literal.lifts, context)?,
                Domain::Logarithmic,
            )
        }
        IntervalLiteral::AbsoluteFjs(literal) => {
            let pitch = context.c4.mul(&absolute_monzo(&literal.pitch)?);
            let value = inflect(&pitch, &literal.superscripts, &literal.subscripts)?;
            (
                with_ups_and_lifts(value, literal.ups, literal.lifts, context)?,
                Domain::Logarithmic,
            )
        }
        IntervalLiteral::AspiringFjs { .. } | IntervalLiteral::AspiringAbsoluteFjs { .. } => {
            return Err(IntervalError::representation(
                "Aspiring FJS has no value of its own",
            ));
        }
    };
    let inflected = match &node {
        IntervalLiteral::Monzo { ups, lifts, .. } => *ups != 0 || *lifts != 0,
        IntervalLiteral::Fjs(literal) => literal.ups != 0 || literal.lifts != 0,
        IntervalLiteral::AbsoluteFjs(literal) => literal.ups != 0 || literal.lifts != 0,
        _ => false,
    };
    let interval = Interval::new(value, domain, Some(node));
    Ok(Notated::Interval(if inflected {
        interval.stamped(context.epoch())
    } else {
        interval
    }))
}
