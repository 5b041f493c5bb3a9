//! Formatting nodes
//!
//! A value remembers the literal it was written as so that it can be printed
//! back the same way. Nodes never take part in arithmetic on the value
//! itself; binary operations combine them separately and drop them when no
//! sensible combined literal exists.

use std::fmt;
use std::mem::discriminant;

use num_integer::Integer;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub, One, Zero};
use serde::{Deserialize, Serialize};

use crate::models::monzo::TimeMonzo;
use crate::notation::absolute::AbsolutePitch;
use crate::notation::fjs::{FjsFlavor, FjsInflection};
use crate::notation::pythagorean::Pythagorean;
use crate::utils::rational::{format_ratio, ratio_to_f64, terminating_decimal, Exponent};

/// A relative FJS spelling such as `M3^5` or `^n6_11n`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FjsLiteral {
    pub ups: i64,
    pub lifts: i64,
    pub pythagorean: Pythagorean,
    pub superscripts: Vec<FjsInflection>,
    pub subscripts: Vec<FjsInflection>,
}

/// An absolute FJS spelling such as `E♭4^5`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsoluteFjsLiteral {
    pub ups: i64,
    pub lifts: i64,
    pub pitch: AbsolutePitch,
    pub superscripts: Vec<FjsInflection>,
    pub subscripts: Vec<FjsInflection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IntervalLiteral {
    Integer {
        value: i64,
    },
    /// Kept unreduced so that `6/4` prints as written
    Fraction {
        numerator: i64,
        denominator: i64,
    },
    /// Exact decimal such as `1.2e` or `1,2`
    Decimal {
        value: Exponent,
    },
    /// Real ("hard") decimal such as `3.14r`
    RealDecimal {
        value: f64,
    },
    Cents {
        value: Exponent,
    },
    RealCents {
        value: f64,
    },
    /// `numerator\denominator` steps of `equave`, the octave when `None`
    Nedji {
        numerator: i64,
        denominator: i64,
        equave: Option<Exponent>,
    },
    /// `argument^exponent` with a fractional exponent
    Radical {
        argument: Exponent,
        exponent: Exponent,
    },
    Monzo {
        components: Vec<Exponent>,
        ups: i64,
        lifts: i64,
    },
    Val {
        components: Vec<Exponent>,
        ups: i64,
        lifts: i64,
    },
    Fjs(FjsLiteral),
    AbsoluteFjs(AbsoluteFjsLiteral),
    /// FJS to be re-derived from the value at render time
    AspiringFjs {
        flavor: FjsFlavor,
    },
    AspiringAbsoluteFjs {
        flavor: FjsFlavor,
    },
}

impl IntervalLiteral {
    pub fn is_same_kind(&self, other: &IntervalLiteral) -> bool {
        discriminant(self) == discriminant(other)
    }

    /// Nodes that carry up and lift counters
    pub fn is_inflectable(&self) -> bool {
        matches!(
            self,
            IntervalLiteral::Fjs(_)
                | IntervalLiteral::AbsoluteFjs(_)
                | IntervalLiteral::Monzo { .. }
                | IntervalLiteral::Val { .. }
        )
    }

    pub fn is_fjs_kind(&self) -> bool {
        matches!(self, IntervalLiteral::Fjs(_) | IntervalLiteral::AspiringFjs { .. })
    }

    pub fn is_absolute_fjs_kind(&self) -> bool {
        matches!(
            self,
            IntervalLiteral::AbsoluteFjs(_) | IntervalLiteral::AspiringAbsoluteFjs { .. }
        )
    }

    /// Real decimals scale sizes linearly instead of exponentiating exactly
    pub fn is_hard_decimal(&self) -> bool {
        matches!(self, IntervalLiteral::RealDecimal { .. })
    }

    /// Shift the up and lift counters, `None` for nodes without counters
    pub fn with_inflection(&self, delta_ups: i64, delta_lifts: i64) -> Option<IntervalLiteral> {
        let mut node = self.clone();
        let (ups, lifts) = match &mut node {
            IntervalLiteral::Fjs(fjs) => (&mut fjs.ups, &mut fjs.lifts),
            IntervalLiteral::AbsoluteFjs(fjs) => (&mut fjs.ups, &mut fjs.lifts),
            IntervalLiteral::Monzo { ups, lifts, .. } => (ups, lifts),
            IntervalLiteral::Val { ups, lifts, .. } => (ups, lifts),
            _ => return None,
        };
        *ups += delta_ups;
        *lifts += delta_lifts;
        Some(node)
    }

    /// Replacement after the context's up or lift changed, `None` drops the node
    pub fn broken(&self) -> Option<IntervalLiteral> {
        match self {
            IntervalLiteral::Fjs(_) => Some(IntervalLiteral::AspiringFjs {
                flavor: fjs_flavor(self),
            }),
            IntervalLiteral::AbsoluteFjs(_) => Some(IntervalLiteral::AspiringAbsoluteFjs {
                flavor: fjs_flavor(self),
            }),
            IntervalLiteral::Monzo { .. } | IntervalLiteral::Val { .. } => None,
            other => Some(other.clone()),
        }
    }
}

// ============================================================================
// Node arithmetic
// ============================================================================

fn rational_parts(node: &IntervalLiteral) -> Option<(i64, i64)> {
    match node {
        IntervalLiteral::Integer { value } => Some((*value, 1)),
        IntervalLiteral::Fraction {
            numerator,
            denominator,
        } => Some((*numerator, *denominator)),
        _ => None,
    }
}

fn fraction_node(numerator: i64, denominator: i64) -> Option<IntervalLiteral> {
    if denominator == 0 {
        return None;
    }
    let (numerator, denominator) = if denominator < 0 {
        (numerator.checked_neg()?, denominator.checked_neg()?)
    } else {
        (numerator, denominator)
    };
    Some(IntervalLiteral::Fraction {
        numerator,
        denominator,
    })
}

fn octave_equave(equave: &Option<Exponent>) -> Exponent {
    equave.unwrap_or_else(|| Exponent::from_integer(2))
}

fn same_equave(a: &Option<Exponent>, b: &Option<Exponent>) -> bool {
    octave_equave(a) == octave_equave(b)
}

/// Add or subtract fractions over a common denominator
fn rational_linear(
    (n1, d1): (i64, i64),
    (n2, d2): (i64, i64),
    op: impl Fn(i64, i64) -> Option<i64>,
) -> Option<(i64, i64)> {
    if d1 == d2 {
        return Some((op(n1, n2)?, d1));
    }
    let denominator = d1.lcm(&d2);
    let a = n1.checked_mul(denominator / d1)?;
    let b = n2.checked_mul(denominator / d2)?;
    Some((op(a, b)?, denominator))
}

fn components_op(
    a: &[Exponent],
    b: &[Exponent],
    op: impl Fn(&Exponent, &Exponent) -> Option<Exponent>,
) -> Option<Vec<Exponent>> {
    let zero = Exponent::zero();
    let length = a.len().max(b.len());
    (0..length)
        .map(|i| op(a.get(i).unwrap_or(&zero), b.get(i).unwrap_or(&zero)))
        .collect()
}

fn linear_nodes(
    a: &IntervalLiteral,
    b: &IntervalLiteral,
    op: impl Fn(i64, i64) -> Option<i64> + Copy,
    exact: impl Fn(&Exponent, &Exponent) -> Option<Exponent> + Copy,
) -> Option<IntervalLiteral> {
    use IntervalLiteral::*;
    match (a, b) {
        (Integer { value: x }, Integer { value: y }) => Some(Integer { value: op(*x, *y)? }),
        (Integer { .. } | Fraction { .. }, Integer { .. } | Fraction { .. }) => {
            let (n, d) = rational_linear(rational_parts(a)?, rational_parts(b)?, op)?;
            fraction_node(n, d)
        }
        (Decimal { value: x }, Decimal { value: y }) => Some(Decimal { value: exact(x, y)? }),
        (Cents { value: x }, Cents { value: y }) => Some(Cents { value: exact(x, y)? }),
        (
            Nedji {
                numerator: n1,
                denominator: d1,
                equave: e1,
            },
            Nedji {
                numerator: n2,
                denominator: d2,
                equave: e2,
            },
        ) if same_equave(e1, e2) => {
            let (numerator, denominator) = rational_linear((*n1, *d1), (*n2, *d2), op)?;
            Some(Nedji {
                numerator,
                denominator,
                equave: *e1,
            })
        }
        (
            Monzo {
                components: c1,
                ups: u1,
                lifts: l1,
            },
            Monzo {
                components: c2,
                ups: u2,
                lifts: l2,
            },
        ) => Some(Monzo {
            components: components_op(c1, c2, exact)?,
            ups: op(*u1, *u2)?,
            lifts: op(*l1, *l2)?,
        }),
        (
            Val {
                components: c1,
                ups: u1,
                lifts: l1,
            },
            Val {
                components: c2,
                ups: u2,
                lifts: l2,
            },
        ) => Some(Val {
            components: components_op(c1, c2, exact)?,
            ups: op(*u1, *u2)?,
            lifts: op(*l1, *l2)?,
        }),
        _ => None,
    }
}

pub fn add_nodes(a: Option<&IntervalLiteral>, b: Option<&IntervalLiteral>) -> Option<IntervalLiteral> {
    linear_nodes(a?, b?, |x, y| x.checked_add(y), |x, y| x.checked_add(y))
}

pub fn sub_nodes(a: Option<&IntervalLiteral>, b: Option<&IntervalLiteral>) -> Option<IntervalLiteral> {
    linear_nodes(a?, b?, |x, y| x.checked_sub(y), |x, y| x.checked_sub(y))
}

/// Scale a logarithmic node by an integer
fn scale_node(node: &IntervalLiteral, factor: i64) -> Option<IntervalLiteral> {
    use IntervalLiteral::*;
    let exact_factor = Exponent::from_integer(factor);
    match node {
        Nedji {
            numerator,
            denominator,
            equave,
        } => Some(Nedji {
            numerator: (*numerator).checked_mul(factor)?,
            denominator: *denominator,
            equave: *equave,
        }),
        Cents { value } => Some(Cents {
            value: value.checked_mul(&exact_factor)?,
        }),
        Monzo {
            components,
            ups,
            lifts,
        } => Some(Monzo {
            components: components
                .iter()
                .map(|c| c.checked_mul(&exact_factor))
                .collect::<Option<Vec<_>>>()?,
            ups: (*ups).checked_mul(factor)?,
            lifts: (*lifts).checked_mul(factor)?,
        }),
        Val {
            components,
            ups,
            lifts,
        } => Some(Val {
            components: components
                .iter()
                .map(|c| c.checked_mul(&exact_factor))
                .collect::<Option<Vec<_>>>()?,
            ups: (*ups).checked_mul(factor)?,
            lifts: (*lifts).checked_mul(factor)?,
        }),
        _ => None,
    }
}

pub fn mul_nodes(a: Option<&IntervalLiteral>, b: Option<&IntervalLiteral>) -> Option<IntervalLiteral> {
    use IntervalLiteral::*;
    let (a, b) = (a?, b?);
    match (a, b) {
        (Integer { value: x }, Integer { value: y }) => Some(Integer {
            value: (*x).checked_mul(*y)?,
        }),
        (Integer { .. } | Fraction { .. }, Integer { .. } | Fraction { .. }) => {
            let (n1, d1) = rational_parts(a)?;
            let (n2, d2) = rational_parts(b)?;
            fraction_node(n1.checked_mul(n2)?, d1.checked_mul(d2)?)
        }
        (Decimal { value: x }, Decimal { value: y }) => Some(Decimal {
            value: x.checked_mul(y)?,
        }),
        (Integer { value }, node) | (node, Integer { value }) => scale_node(node, *value),
        _ => None,
    }
}

pub fn div_nodes(a: Option<&IntervalLiteral>, b: Option<&IntervalLiteral>) -> Option<IntervalLiteral> {
    use IntervalLiteral::*;
    let (a, b) = (a?, b?);
    match (a, b) {
        (Integer { .. } | Fraction { .. }, Integer { .. } | Fraction { .. }) => {
            let (n1, d1) = rational_parts(a)?;
            let (n2, d2) = rational_parts(b)?;
            fraction_node(n1.checked_mul(d2)?, d1.checked_mul(n2)?)
        }
        (Decimal { value: x }, Decimal { value: y }) if !y.is_zero() => Some(Decimal {
            value: x.checked_div(y)?,
        }),
        (
            Nedji {
                numerator,
                denominator,
                equave,
            },
            Integer { value },
        ) if *value != 0 => {
            let (numerator, denominator) = if *value < 0 {
                (numerator.checked_neg()?, (*denominator).checked_mul(value.checked_neg()?)?)
            } else {
                (*numerator, (*denominator).checked_mul(*value)?)
            };
            Some(Nedji {
                numerator,
                denominator,
                equave: *equave,
            })
        }
        (Cents { value }, Integer { value: divisor }) if *divisor != 0 => Some(Cents {
            value: value.checked_div(&Exponent::from_integer(*divisor))?,
        }),
        (
            Nedji {
                numerator: n1,
                denominator: d1,
                equave: e1,
            },
            Nedji {
                numerator: n2,
                denominator: d2,
                equave: e2,
            },
        ) if same_equave(e1, e2) => fraction_node((*n1).checked_mul(*d2)?, (*d1).checked_mul(*n2)?),
        _ => None,
    }
}

pub fn mod_nodes(a: Option<&IntervalLiteral>, b: Option<&IntervalLiteral>) -> Option<IntervalLiteral> {
    use IntervalLiteral::*;
    match (a?, b?) {
        (Integer { value: x }, Integer { value: y }) if *y != 0 => Some(Integer {
            value: x.mod_floor(y),
        }),
        (
            Nedji {
                numerator: n1,
                denominator: d1,
                equave: e1,
            },
            Nedji {
                numerator: n2,
                denominator: d2,
                equave: e2,
            },
        ) if d1 == d2 && *n2 != 0 && same_equave(e1, e2) => Some(Nedji {
            numerator: n1.mod_floor(n2),
            denominator: *d1,
            equave: *e1,
        }),
        _ => None,
    }
}

pub fn round_to_nodes(a: Option<&IntervalLiteral>, b: Option<&IntervalLiteral>) -> Option<IntervalLiteral> {
    use IntervalLiteral::*;
    match (a?, b?) {
        (Integer { value: x }, Integer { value: y }) if *y != 0 => Some(Integer {
            value: Exponent::new(*x, *y).round().to_integer().checked_mul(*y)?,
        }),
        (
            Nedji {
                numerator: n1,
                denominator: d1,
                equave: e1,
            },
            Nedji {
                numerator: n2,
                denominator: d2,
                equave: e2,
            },
        ) if d1 == d2 && *n2 != 0 && same_equave(e1, e2) => Some(Nedji {
            numerator: Exponent::new(*n1, *n2).round().to_integer().checked_mul(*n2)?,
            denominator: *d1,
            equave: *e1,
        }),
        _ => None,
    }
}

/// Steps of the octave re-read as steps of `base`
pub fn project_nodes(a: Option<&IntervalLiteral>, base: Option<&IntervalLiteral>) -> Option<IntervalLiteral> {
    match (a?, base?) {
        (
            IntervalLiteral::Nedji {
                numerator,
                denominator,
                equave: None,
            },
            base,
        ) => {
            let (n, d) = rational_parts(base)?;
            let equave = Exponent::new(n, d);
            Some(IntervalLiteral::Nedji {
                numerator: *numerator,
                denominator: *denominator,
                equave: (equave != Exponent::from_integer(2)).then_some(equave),
            })
        }
        _ => None,
    }
}

fn fjs_flavor(node: &IntervalLiteral) -> FjsFlavor {
    match node {
        IntervalLiteral::Fjs(FjsLiteral {
            superscripts,
            subscripts,
            ..
        })
        | IntervalLiteral::AbsoluteFjs(AbsoluteFjsLiteral {
            superscripts,
            subscripts,
            ..
        }) => superscripts
            .first()
            .or_else(|| subscripts.first())
            .map(|inflection| inflection.flavor)
            .unwrap_or_default(),
        IntervalLiteral::AspiringFjs { flavor } | IntervalLiteral::AspiringAbsoluteFjs { flavor } => {
            *flavor
        }
        _ => FjsFlavor::Formal,
    }
}

/// Aspiring FJS node that keeps the flavor of `node`
pub fn aspiring_fjs(node: Option<&IntervalLiteral>) -> IntervalLiteral {
    IntervalLiteral::AspiringFjs {
        flavor: node.map(fjs_flavor).unwrap_or_default(),
    }
}

/// Regenerate a literal of the same kind as `node` for a new value
pub fn time_monzo_as(
    monzo: &TimeMonzo,
    node: Option<&IntervalLiteral>,
    simplify: bool,
) -> Option<IntervalLiteral> {
    let node = node?;
    let hint = (!simplify).then_some(node);
    match node {
        IntervalLiteral::Integer { .. } => monzo.as_integer_literal(),
        IntervalLiteral::Fraction { .. } => monzo.as_fraction_literal(hint),
        IntervalLiteral::Nedji { .. } => monzo.as_nedji_literal(hint),
        IntervalLiteral::Cents { .. } => monzo.as_cents_literal(),
        IntervalLiteral::Monzo { .. } => monzo.as_monzo_literal(),
        IntervalLiteral::Fjs(_) | IntervalLiteral::AspiringFjs { .. } => {
            Some(IntervalLiteral::AspiringFjs {
                flavor: fjs_flavor(node),
            })
        }
        IntervalLiteral::AbsoluteFjs(_) | IntervalLiteral::AspiringAbsoluteFjs { .. } => {
            Some(IntervalLiteral::AspiringAbsoluteFjs {
                flavor: fjs_flavor(node),
            })
        }
        IntervalLiteral::Decimal { .. }
        | IntervalLiteral::RealDecimal { .. }
        | IntervalLiteral::RealCents { .. }
        | IntervalLiteral::Radical { .. }
        | IntervalLiteral::Val { .. } => None,
    }
}

// ============================================================================
// Literals from values
// ============================================================================

impl TimeMonzo {
    pub fn as_integer_literal(&self) -> Option<IntervalLiteral> {
        if !self.is_scalar() {
            return None;
        }
        self.to_integer()
            .ok()
            .map(|value| IntervalLiteral::Integer { value })
    }

    /// Fraction literal, keeping the hint's denominator when it still fits
    pub fn as_fraction_literal(&self, hint: Option<&IntervalLiteral>) -> Option<IntervalLiteral> {
        if !self.is_scalar() {
            return None;
        }
        let value = self.to_fraction().ok()?;
        if let Some(IntervalLiteral::Fraction { denominator, .. }) = hint {
            let scaled = value.checked_mul(&Exponent::from_integer(*denominator))?;
            if scaled.is_integer() {
                return fraction_node(scaled.to_integer(), *denominator);
            }
        }
        fraction_node(*value.numer(), *value.denom())
    }

    /// Steps of an equal division, keeping the hint's equave and denominator
    pub fn as_nedji_literal(&self, hint: Option<&IntervalLiteral>) -> Option<IntervalLiteral> {
        if !self.is_scalar() || !self.is_equal_temperament() {
            return None;
        }
        let (hint_denominator, equave) = match hint {
            Some(IntervalLiteral::Nedji {
                denominator,
                equave,
                ..
            }) => (Some(*denominator), *equave),
            _ => (None, None),
        };
        let base = TimeMonzo::from_fraction(octave_equave(&equave));
        let steps = self.log(&base).ok()?.to_fraction().ok()?;
        if let Some(denominator) = hint_denominator {
            let scaled = steps.checked_mul(&Exponent::from_integer(denominator))?;
            if scaled.is_integer() {
                return Some(IntervalLiteral::Nedji {
                    numerator: scaled.to_integer(),
                    denominator,
                    equave,
                });
            }
        }
        Some(IntervalLiteral::Nedji {
            numerator: *steps.numer(),
            denominator: *steps.denom(),
            equave,
        })
    }

    /// Exact cents when the size is a terminating decimal, real cents otherwise
    pub fn as_cents_literal(&self) -> Option<IntervalLiteral> {
        if !self.is_scalar() {
            return None;
        }
        if self.is_equal_temperament() {
            let octaves = self.octaves().ok()?;
            if let Ok(fraction) = octaves.to_fraction() {
                if let Some(value) = fraction.checked_mul(&Exponent::from_integer(1200)) {
                    if terminating_decimal(&value).is_some() {
                        return Some(IntervalLiteral::Cents { value });
                    }
                }
            }
        }
        Some(IntervalLiteral::RealCents {
            value: self.total_cents(),
        })
    }

    /// Monzo literal with whole cents carried as ups
    pub fn as_monzo_literal(&self) -> Option<IntervalLiteral> {
        if !self.is_scalar() || !self.residual.is_one() || self.cents.fract() != 0.0 {
            return None;
        }
        Some(IntervalLiteral::Monzo {
            components: self.prime_exponents.clone(),
            ups: self.cents as i64,
            lifts: 0,
        })
    }

    /// Val literal of a tuning map, `None` when it carries cents
    pub fn as_val_literal(&self) -> Option<IntervalLiteral> {
        if !self.is_scalar() || !self.residual.is_one() || self.cents.fract() != 0.0 {
            return None;
        }
        Some(IntervalLiteral::Val {
            components: self.prime_exponents.clone(),
            ups: self.cents as i64,
            lifts: 0,
        })
    }

    pub fn as_decimal_literal(&self) -> Option<IntervalLiteral> {
        if !self.is_scalar() {
            return None;
        }
        if let Ok(value) = self.to_fraction() {
            if terminating_decimal(&value).is_some() {
                return Some(IntervalLiteral::Decimal { value });
            }
        }
        Some(IntervalLiteral::RealDecimal {
            value: self.value_of(),
        })
    }

    /// `equave^fraction` for irrational equal-tempered values
    pub fn as_radical_literal(&self) -> Option<IntervalLiteral> {
        if !self.is_scalar() {
            return None;
        }
        let (exponent, argument) = self.to_equal_temperament().ok()?;
        if exponent.is_integer() {
            return None;
        }
        Some(IntervalLiteral::Radical { argument, exponent })
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Lift prefix followed by up prefix, e.g. `/^^` or `\v`
pub fn inflection_prefix(ups: i64, lifts: i64) -> String {
    let mut prefix = String::new();
    let lift = if lifts < 0 { '\\' } else { '/' };
    prefix.extend(std::iter::repeat(lift).take(lifts.unsigned_abs() as usize));
    let up = if ups < 0 { 'v' } else { '^' };
    prefix.extend(std::iter::repeat(up).take(ups.unsigned_abs() as usize));
    prefix
}

fn join_inflections(inflections: &[FjsInflection]) -> String {
    inflections
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn write_inflections(
    f: &mut fmt::Formatter<'_>,
    superscripts: &[FjsInflection],
    subscripts: &[FjsInflection],
) -> fmt::Result {
    if !superscripts.is_empty() {
        write!(f, "^{}", join_inflections(superscripts))?;
    }
    if !subscripts.is_empty() {
        write!(f, "_{}", join_inflections(subscripts))?;
    }
    Ok(())
}

fn join_components(components: &[Exponent]) -> String {
    components
        .iter()
        .map(format_ratio)
        .collect::<Vec<_>>()
        .join(" ")
}

fn decimal_digits(value: &Exponent) -> String {
    terminating_decimal(value).unwrap_or_else(|| format!("{}", ratio_to_f64(value)))
}

impl fmt::Display for FjsLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", inflection_prefix(self.ups, self.lifts), self.pythagorean)?;
        write_inflections(f, &self.superscripts, &self.subscripts)
    }
}

impl fmt::Display for AbsoluteFjsLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", inflection_prefix(self.ups, self.lifts), self.pitch)?;
        write_inflections(f, &self.superscripts, &self.subscripts)
    }
}

impl fmt::Display for IntervalLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalLiteral::Integer { value } => write!(f, "{}", value),
            IntervalLiteral::Fraction {
                numerator,
                denominator,
            } => write!(f, "{}/{}", numerator, denominator),
            IntervalLiteral::Decimal { value } => {
                let digits = decimal_digits(value);
                if digits.contains('.') {
                    write!(f, "{}e", digits)
                } else {
                    write!(f, "{}.0e", digits)
                }
            }
            IntervalLiteral::RealDecimal { value } => write!(f, "{}r", value),
            IntervalLiteral::Cents { value } => {
                let digits = decimal_digits(value);
                if digits.contains('.') {
                    write!(f, "{}", digits)
                } else {
                    write!(f, "{}.", digits)
                }
            }
            IntervalLiteral::RealCents { value } => write!(f, "{}rc", value),
            IntervalLiteral::Nedji {
                numerator,
                denominator,
                equave,
            } => {
                write!(f, "{}\\{}", numerator, denominator)?;
                if let Some(equave) = equave {
                    write!(f, "<{}>", format_ratio(equave))?;
                }
                Ok(())
            }
            IntervalLiteral::Radical { argument, exponent } => {
                if argument.is_integer() {
                    write!(f, "{}^{}", argument.numer(), format_ratio(exponent))
                } else {
                    write!(f, "({})^{}", format_ratio(argument), format_ratio(exponent))
                }
            }
            IntervalLiteral::Monzo {
                components,
                ups,
                lifts,
            } => write!(
                f,
                "{}[{}>",
                inflection_prefix(*ups, *lifts),
                join_components(components)
            ),
            IntervalLiteral::Val {
                components,
                ups,
                lifts,
            } => write!(
                f,
                "{}<{}]",
                inflection_prefix(*ups, *lifts),
                join_components(components)
            ),
            IntervalLiteral::Fjs(fjs) => write!(f, "{}", fjs),
            IntervalLiteral::AbsoluteFjs(fjs) => write!(f, "{}", fjs),
            IntervalLiteral::AspiringFjs { .. } => write!(f, "FJS"),
            IntervalLiteral::AspiringAbsoluteFjs { .. } => write!(f, "absoluteFJS"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nedji(numerator: i64, denominator: i64) -> IntervalLiteral {
        IntervalLiteral::Nedji {
            numerator,
            denominator,
            equave: None,
        }
    }

    fn frac(n: i64, d: i64) -> TimeMonzo {
        TimeMonzo::from_fraction(Exponent::new(n, d))
    }

    #[test]
    fn test_nedji_addition_keeps_denominator() {
        let sum = add_nodes(Some(&nedji(4, 12)), Some(&nedji(2, 12))).unwrap();
        assert_eq!(sum.to_string(), "6\\12");
        let mixed = add_nodes(Some(&nedji(1, 3)), Some(&nedji(1, 4))).unwrap();
        assert_eq!(mixed.to_string(), "7\\12");
    }

    #[test]
    fn test_nedji_equaves_must_match() {
        let tritave = IntervalLiteral::Nedji {
            numerator: 1,
            denominator: 13,
            equave: Some(Exponent::from_integer(3)),
        };
        assert!(add_nodes(Some(&nedji(1, 13)), Some(&tritave)).is_none());
    }

    #[test]
    fn test_integer_division_is_unreduced_fraction() {
        let six = IntervalLiteral::Integer { value: 6 };
        let four = IntervalLiteral::Integer { value: 4 };
        assert_eq!(div_nodes(Some(&six), Some(&four)).unwrap().to_string(), "6/4");
        assert_eq!(
            add_nodes(
                Some(&IntervalLiteral::Fraction {
                    numerator: 1,
                    denominator: 2
                }),
                Some(&IntervalLiteral::Fraction {
                    numerator: 1,
                    denominator: 3
                })
            )
            .unwrap()
            .to_string(),
            "5/6"
        );
    }

    #[test]
    fn test_scaling_logarithmic_nodes() {
        let three = IntervalLiteral::Integer { value: 3 };
        assert_eq!(mul_nodes(Some(&three), Some(&nedji(2, 12))).unwrap().to_string(), "6\\12");
        assert_eq!(div_nodes(Some(&nedji(7, 12)), Some(&IntervalLiteral::Integer { value: 2 })).unwrap().to_string(), "7\\24");
        let monzo = IntervalLiteral::Monzo {
            components: vec![Exponent::from_integer(-1), Exponent::from_integer(1)],
            ups: 1,
            lifts: 0,
        };
        assert_eq!(mul_nodes(Some(&monzo), Some(&three)).unwrap().to_string(), "^^^[-3 3>");
    }

    #[test]
    fn test_mod_and_round_nodes() {
        assert_eq!(mod_nodes(Some(&nedji(14, 12)), Some(&nedji(12, 12))).unwrap(), nedji(2, 12));
        let seven = IntervalLiteral::Integer { value: 7 };
        let three = IntervalLiteral::Integer { value: 3 };
        assert_eq!(round_to_nodes(Some(&seven), Some(&three)).unwrap(), IntervalLiteral::Integer { value: 6 });
    }

    #[test]
    fn test_project_nodes() {
        let projected = project_nodes(Some(&nedji(7, 5)), Some(&IntervalLiteral::Fraction { numerator: 4, denominator: 3 })).unwrap();
        assert_eq!(projected.to_string(), "7\\5<4/3>");
    }

    #[test]
    fn test_literals_from_values() {
        assert_eq!(frac(5, 4).as_fraction_literal(None).unwrap().to_string(), "5/4");
        let hint = IntervalLiteral::Fraction { numerator: 2, denominator: 4 };
        assert_eq!(frac(3, 2).as_fraction_literal(Some(&hint)).unwrap().to_string(), "6/4");
        let semitone = frac(2, 1).pow_fraction(&Exponent::new(1, 12)).unwrap();
        assert_eq!(semitone.as_nedji_literal(None).unwrap().to_string(), "1\\12");
        assert_eq!(semitone.as_cents_literal().unwrap().to_string(), "100.");
        assert_eq!(semitone.as_radical_literal().unwrap().to_string(), "2^1/12");
        assert_eq!(frac(6, 5).as_decimal_literal().unwrap().to_string(), "1.2e");
        assert!(matches!(frac(1, 3).as_decimal_literal().unwrap(), IntervalLiteral::RealDecimal { .. }));
        assert!(matches!(frac(3, 2).as_cents_literal().unwrap(), IntervalLiteral::RealCents { .. }));
    }

    #[test]
    fn test_time_monzo_as_fjs_becomes_aspiring() {
        let node = IntervalLiteral::AspiringFjs { flavor: FjsFlavor::Neutral };
        assert_eq!(
            time_monzo_as(&frac(3, 2), Some(&node), true).unwrap(),
            IntervalLiteral::AspiringFjs { flavor: FjsFlavor::Neutral }
        );
        let decimal = IntervalLiteral::Decimal { value: Exponent::new(6, 5) };
        assert!(time_monzo_as(&frac(3, 2), Some(&decimal), true).is_none());
    }

    #[test]
    fn test_prefix() {
        assert_eq!(inflection_prefix(2, -1), "\\^^");
        assert_eq!(inflection_prefix(-1, 1), "/v");
        assert_eq!(inflection_prefix(0, 0), "");
    }

    #[test]
    fn test_cents_rendering() {
        assert_eq!(IntervalLiteral::Cents { value: Exponent::from_integer(88) }.to_string(), "88.");
        assert_eq!(IntervalLiteral::Cents { value: Exponent::new(701955, 1000) }.to_string(), "701.955");
        assert_eq!(IntervalLiteral::RealCents { value: 1.5 }.to_string(), "1.5rc");
        assert_eq!(IntervalLiteral::RealDecimal { value: 1.5 }.to_string(), "1.5r");
    }
}
