//! Domain-tagged intervals
//!
//! An `Interval` pairs an exact value with the domain that decides what the
//! arithmetic operators mean. In the linear domain `+` adds ratios; in the
//! logarithmic domain `+` stacks intervals (multiplies the underlying
//! values). Multiplication and division need at least one linear operand
//! which then acts as a scalar.
//!
//! Every binary operation also combines the operands' formatting nodes and
//! annotations. Nodes are best effort: when no combined literal exists the
//! result prints from its canonical form.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};
use crate::models::context::RootContext;
use crate::models::literal::{
    add_nodes, aspiring_fjs, div_nodes, mod_nodes, mul_nodes, project_nodes, round_to_nodes,
    sub_nodes, time_monzo_as, IntervalLiteral,
};
use crate::models::monzo::TimeMonzo;
use crate::models::val::Val;
use crate::notation::fjs::{as_absolute_fjs, as_fjs};
use crate::utils::rational::Exponent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Domain {
    Linear,
    Logarithmic,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Linear => "linear",
            Domain::Logarithmic => "logarithmic",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A CSS-style color attached to a value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub String);

impl Color {
    pub fn new(value: impl Into<String>) -> Self {
        Color(value.into())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.replace('%', ""))
    }
}

/// Color and label carried along by arithmetic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub color: Option<Color>,
    pub label: String,
}

impl Annotation {
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.label.is_empty()
    }

    /// The left annotation wins; the right one fills its gaps
    pub fn infect(left: &Annotation, right: &Annotation) -> Annotation {
        Annotation {
            color: left.color.clone().or_else(|| right.color.clone()),
            label: if left.label.is_empty() {
                right.label.clone()
            } else {
                left.label.clone()
            },
        }
    }
}

/// Which operand's annotation an operator spelling prefers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preference {
    Left,
    Right,
    Neither,
}

impl Preference {
    pub fn resolve(self, left: &Annotation, right: &Annotation) -> Annotation {
        match self {
            Preference::Left => Annotation::infect(left, right),
            Preference::Right => Annotation::infect(right, left),
            Preference::Neither => Annotation::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub value: TimeMonzo,
    pub domain: Domain,
    pub node: Option<IntervalLiteral>,
    pub annotation: Annotation,
    /// Context epoch of a node that depends on the up or lift unit
    fragile: Option<u64>,
}

fn same_domain(a: &Interval, b: &Interval, operation: &str) -> Result<()> {
    if a.domain != b.domain {
        return Err(IntervalError::representation(format!(
            "Domains must match in {}",
            operation
        )));
    }
    Ok(())
}

fn both_linear(a: &Interval, b: &Interval, operation: &str) -> Result<()> {
    if a.domain == Domain::Logarithmic || b.domain == Domain::Logarithmic {
        return Err(IntervalError::representation(format!(
            "{} not implemented in logarithmic domain",
            operation
        )));
    }
    Ok(())
}

/// Integer or fraction result of an inner product
pub(crate) fn dot_result(product: Exponent, annotation: Annotation) -> Interval {
    let node = if product.is_integer() {
        IntervalLiteral::Integer {
            value: product.to_integer(),
        }
    } else {
        IntervalLiteral::Fraction {
            numerator: *product.numer(),
            denominator: *product.denom(),
        }
    };
    Interval::new(TimeMonzo::from_fraction(product), Domain::Linear, Some(node))
        .with_annotation(annotation)
}

impl Interval {
    pub fn new(value: TimeMonzo, domain: Domain, node: Option<IntervalLiteral>) -> Self {
        Interval {
            value,
            domain,
            node,
            annotation: Annotation::default(),
            fragile: None,
        }
    }

    pub fn linear(value: TimeMonzo) -> Self {
        Self::new(value, Domain::Linear, None)
    }

    pub fn logarithmic(value: TimeMonzo) -> Self {
        Self::new(value, Domain::Logarithmic, None)
    }

    pub fn from_integer(value: i64) -> Self {
        Self::new(
            TimeMonzo::from_integer(value),
            Domain::Linear,
            Some(IntervalLiteral::Integer { value }),
        )
    }

    pub fn from_fraction(value: Exponent) -> Self {
        Self::new(
            TimeMonzo::from_fraction(value),
            Domain::Linear,
            Some(IntervalLiteral::Fraction {
                numerator: *value.numer(),
                denominator: *value.denom(),
            }),
        )
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.annotation.label = label.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.annotation.color = Some(color);
        self
    }

    /// Same value and annotation under a new domain and node
    pub(crate) fn derive(&self, value: TimeMonzo, domain: Domain, node: Option<IntervalLiteral>) -> Self {
        Self::new(value, domain, node).with_annotation(self.annotation.clone())
    }

    pub fn is_relative(&self) -> bool {
        self.value.is_scalar()
    }

    pub fn is_absolute(&self) -> bool {
        !self.value.is_scalar()
    }

    pub fn is_fragile(&self) -> bool {
        self.fragile.is_some()
    }

    /// Mark the node as depending on the context's current up and lift
    pub(crate) fn stamped(mut self, epoch: u64) -> Self {
        self.fragile = Some(epoch);
        self
    }

    pub fn total_cents(&self) -> f64 {
        self.value.total_cents()
    }

    pub fn to_integer(&self) -> Result<i64> {
        self.value.to_integer()
    }

    pub fn value_of(&self) -> f64 {
        self.value.value_of()
    }

    // ========================================================================
    // Unary operations
    // ========================================================================

    pub fn neg(&self) -> Result<Interval> {
        let value = match self.domain {
            Domain::Linear => self.value.neg(),
            Domain::Logarithmic => self.value.inverse()?,
        };
        Ok(self.derive(value, self.domain, None))
    }

    /// Multiplicative inverse of a linear value
    pub fn inverse(&self) -> Result<Interval> {
        if self.domain != Domain::Linear {
            return Err(IntervalError::representation(
                "Use the geometric inverse in the logarithmic domain",
            ));
        }
        Ok(self.derive(self.value.inverse()?, self.domain, None))
    }

    /// The val whose product with this interval is one
    pub fn geometric_inverse(&self) -> Result<Val> {
        if self.domain != Domain::Logarithmic {
            return Err(IntervalError::representation(
                "Geometric inverse only defined in the logarithmic domain",
            ));
        }
        Val::new(self.value.geometric_inverse()?, self.value.clone(), None)
    }

    pub fn abs(&self) -> Result<Interval> {
        let value = match self.domain {
            Domain::Linear => self.value.abs(),
            Domain::Logarithmic => self.value.pitch_abs()?,
        };
        Ok(self.derive(value, self.domain, None))
    }

    // ========================================================================
    // Additive operations
    // ========================================================================

    pub fn add(&self, other: &Interval) -> Result<Interval> {
        same_domain(self, other, "addition")?;
        let value = match self.domain {
            Domain::Linear => self.value.add(&other.value)?,
            Domain::Logarithmic => self.value.mul(&other.value),
        };
        let node = add_nodes(self.node.as_ref(), other.node.as_ref())
            .or_else(|| self.regenerate(other, &value));
        Ok(Interval::new(value, self.domain, node)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    pub fn sub(&self, other: &Interval) -> Result<Interval> {
        same_domain(self, other, "subtraction")?;
        let value = match self.domain {
            Domain::Linear => self.value.sub(&other.value)?,
            Domain::Logarithmic => self.value.div(&other.value)?,
        };
        let node = sub_nodes(self.node.as_ref(), other.node.as_ref())
            .or_else(|| self.regenerate(other, &value));
        Ok(Interval::new(value, self.domain, node)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    /// Same-kind literal for the result of combining two same-kind nodes
    fn regenerate(&self, other: &Interval, value: &TimeMonzo) -> Option<IntervalLiteral> {
        match (&self.node, &other.node) {
            (Some(a), Some(b)) if a.is_same_kind(b) => time_monzo_as(value, Some(a), true),
            _ => None,
        }
    }

    /// `other - self` keeping this interval's annotation
    pub fn lsub(&self, other: &Interval) -> Result<Interval> {
        let result = other.sub(self)?;
        Ok(result.with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    pub fn lens_add(&self, other: &Interval) -> Result<Interval> {
        same_domain(self, other, "harmonic addition")?;
        let value = match self.domain {
            Domain::Linear => self.value.lens_add(&other.value)?,
            Domain::Logarithmic => self
                .value
                .geometric_inverse()?
                .mul(&other.value.geometric_inverse()?)
                .geometric_inverse()?,
        };
        Ok(Interval::new(value, self.domain, None)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    pub fn lens_sub(&self, other: &Interval) -> Result<Interval> {
        same_domain(self, other, "harmonic subtraction")?;
        let value = match self.domain {
            Domain::Linear => self.value.lens_sub(&other.value)?,
            Domain::Logarithmic => self
                .value
                .geometric_inverse()?
                .div(&other.value.geometric_inverse()?)?
                .geometric_inverse()?,
        };
        Ok(Interval::new(value, self.domain, None)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    // ========================================================================
    // Rounding
    // ========================================================================

    pub fn round_to(&self, other: &Interval) -> Result<Interval> {
        same_domain(self, other, "rounding")?;
        let value = match self.domain {
            Domain::Linear => self.value.round_to(&other.value)?,
            Domain::Logarithmic => self.value.pitch_round_to(&other.value)?,
        };
        let node = round_to_nodes(self.node.as_ref(), other.node.as_ref());
        Ok(Interval::new(value, self.domain, node)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    pub fn mmod(&self, other: &Interval, ceiling: bool) -> Result<Interval> {
        same_domain(self, other, "modulo")?;
        let value = match self.domain {
            Domain::Linear => self.value.mmod(&other.value, ceiling)?,
            Domain::Logarithmic => self.value.reduce(&other.value, ceiling)?,
        };
        let node = mod_nodes(self.node.as_ref(), other.node.as_ref());
        Ok(Interval::new(value, self.domain, node)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    pub fn pitch_round_to(&self, other: &Interval) -> Result<Interval> {
        both_linear(self, other, "Exponential rounding")?;
        if !other.value.is_scalar() {
            return Err(IntervalError::representation(
                "Only scalar exponential rounding implemented",
            ));
        }
        Ok(Interval::new(self.value.pitch_round_to(&other.value)?, self.domain, None)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    // ========================================================================
    // Multiplicative operations
    // ========================================================================

    /// Scale a logarithmic value by a linear scalar
    fn log_lin_mul(
        logarithmic: &Interval,
        linear: &Interval,
        node: Option<IntervalLiteral>,
        annotation: Annotation,
    ) -> Result<Interval> {
        if linear.node.as_ref().map_or(false, IntervalLiteral::is_hard_decimal) {
            let size = logarithmic.value.total_cents();
            let value = TimeMonzo::from_cents(size * linear.value.value_of());
            return Ok(Interval::new(value, logarithmic.domain, node).with_annotation(annotation));
        }
        let value = logarithmic.value.pow(&linear.value)?;
        let node = match &logarithmic.node {
            Some(n) if n.is_fjs_kind() => Some(aspiring_fjs(Some(n))),
            _ => node,
        };
        Ok(Interval::new(value, logarithmic.domain, node).with_annotation(annotation))
    }

    pub fn mul(&self, other: &Interval) -> Result<Interval> {
        if self.domain != Domain::Linear && other.domain != Domain::Linear {
            return Err(IntervalError::representation(
                "At least one domain must be linear in multiplication",
            ));
        }
        let node = mul_nodes(self.node.as_ref(), other.node.as_ref());
        let annotation = Annotation::infect(&self.annotation, &other.annotation);
        if other.domain == Domain::Logarithmic {
            return Self::log_lin_mul(other, self, node, annotation);
        }
        if self.domain == Domain::Logarithmic {
            return Self::log_lin_mul(self, other, node, annotation);
        }
        Ok(Interval::new(self.value.mul(&other.value), self.domain, node).with_annotation(annotation))
    }

    /// Scale a val by this scalar
    pub fn mul_val(&self, val: &Val) -> Result<Val> {
        val.mul(self)
    }

    pub fn div(&self, other: &Interval) -> Result<Interval> {
        let node = div_nodes(self.node.as_ref(), other.node.as_ref());
        let annotation = Annotation::infect(&self.annotation, &other.annotation);
        if other.domain == Domain::Logarithmic {
            if self.domain != Domain::Logarithmic {
                return Err(IntervalError::representation(
                    "Domains must match in non-scalar division",
                ));
            }
            let value = self.value.log(&other.value)?;
            return Ok(Interval::new(value, Domain::Linear, node).with_annotation(annotation));
        }
        if self.domain == Domain::Logarithmic {
            let value = self.value.pow(&other.value.inverse()?)?;
            let node = match &self.node {
                Some(n) if n.is_fjs_kind() => Some(aspiring_fjs(Some(n))),
                _ => node,
            };
            return Ok(Interval::new(value, self.domain, node).with_annotation(annotation));
        }
        Ok(Interval::new(self.value.div(&other.value)?, self.domain, node).with_annotation(annotation))
    }

    /// `other / self` keeping this interval's annotation
    pub fn ldiv(&self, other: &Interval) -> Result<Interval> {
        let result = other.div(self)?;
        Ok(result.with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    /// Inner product of the exponent vectors
    pub fn dot(&self, other: &Interval) -> Result<Interval> {
        let product = self.value.dot(&other.value)?;
        Ok(dot_result(
            product,
            Annotation::infect(&self.annotation, &other.annotation),
        ))
    }

    /// Steps of `val` spanned by this interval, one extra step per up
    pub fn dot_val(&self, val: &Val) -> Result<Interval> {
        let mut rigged = val.value.clone();
        rigged.cents += 1.0;
        let product = self.value.dot(&rigged)?;
        Ok(dot_result(product, self.annotation.clone()))
    }

    pub fn pow(&self, other: &Interval) -> Result<Interval> {
        both_linear(self, other, "Exponentiation")?;
        if !other.value.is_scalar() {
            return Err(IntervalError::representation("Only scalar exponentiation implemented"));
        }
        Ok(Interval::new(self.value.pow(&other.value)?, self.domain, None)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    /// Inverse exponentiation: the `other`-th root
    pub fn ipow(&self, other: &Interval) -> Result<Interval> {
        both_linear(self, other, "Inverse exponentiation")?;
        if !other.value.is_scalar() {
            return Err(IntervalError::representation(
                "Only scalar inverse exponentiation implemented",
            ));
        }
        Ok(Interval::new(self.value.pow(&other.value.inverse()?)?, self.domain, None)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    pub fn log(&self, other: &Interval) -> Result<Interval> {
        both_linear(self, other, "Logarithm")?;
        Ok(Interval::new(self.value.log(&other.value)?, self.domain, None)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    pub fn reduce(&self, other: &Interval, ceiling: bool) -> Result<Interval> {
        both_linear(self, other, "Reduction")?;
        Ok(Interval::new(self.value.reduce(&other.value, ceiling)?, self.domain, None)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    /// `self\other`: steps of an equal division of the octave
    pub fn backslash(&self, other: &Interval) -> Result<Interval> {
        if !self.value.is_scalar() || !other.value.is_scalar() {
            return Err(IntervalError::representation("Only scalars can be backslashed"));
        }
        if self.domain != Domain::Linear || other.domain != Domain::Linear {
            return Err(IntervalError::representation("Only linear backslashing implemented"));
        }
        let value = TimeMonzo::from_integer(2).pow(&self.value.div(&other.value)?)?;
        let node = if self.value.is_integral() && other.value.is_integral() {
            Some(IntervalLiteral::Nedji {
                numerator: self.value.to_integer()?,
                denominator: other.value.to_integer()?,
                equave: None,
            })
        } else {
            None
        };
        Ok(Interval::new(value, Domain::Logarithmic, node)
            .with_annotation(Annotation::infect(&self.annotation, &other.annotation)))
    }

    /// Octave-steps of this interval re-read as steps of `base`
    pub fn project(&self, base: &Interval) -> Result<Interval> {
        let node = project_nodes(self.node.as_ref(), base.node.as_ref());
        let value = base.value.pow(&self.value.octaves()?)?;
        Ok(Interval::new(value, Domain::Logarithmic, node)
            .with_annotation(Annotation::infect(&self.annotation, &base.annotation)))
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    pub fn compare(&self, other: &Interval) -> Ordering {
        self.value.compare(&other.value)
    }

    pub fn equals(&self, other: &Interval) -> bool {
        self.value.equals(&other.value)
    }

    pub fn strict_equals(&self, other: &Interval) -> bool {
        self.domain == other.domain && self.value.strict_equals(&other.value)
    }

    // ========================================================================
    // Ups and lifts
    // ========================================================================

    fn inflected(&self, value: TimeMonzo, ups: i64, lifts: i64, context: &RootContext) -> Interval {
        let mut result = self.derive(value, self.domain, None);
        match &self.node {
            Some(node) if node.is_inflectable() => {
                result.node = node.with_inflection(ups, lifts);
                result.fragile = Some(context.epoch());
            }
            // Re-derived from the value at render time
            Some(
                node @ (IntervalLiteral::AspiringFjs { .. }
                | IntervalLiteral::AspiringAbsoluteFjs { .. }),
            ) => result.node = Some(node.clone()),
            _ => {}
        }
        result
    }

    pub fn up(&self, context: &RootContext) -> Interval {
        self.inflected(self.value.mul(context.up()), 1, 0, context)
    }

    pub fn down(&self, context: &RootContext) -> Result<Interval> {
        Ok(self.inflected(self.value.div(context.up())?, -1, 0, context))
    }

    pub fn lift(&self, context: &RootContext) -> Interval {
        self.inflected(self.value.mul(context.lift()), 0, 1, context)
    }

    pub fn drop(&self, context: &RootContext) -> Result<Interval> {
        Ok(self.inflected(self.value.div(context.lift())?, 0, -1, context))
    }

    /// Replace a fragile node with its context-independent form
    pub fn break_node(&mut self) {
        self.node = self.node.as_ref().and_then(IntervalLiteral::broken);
        self.fragile = None;
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn canonical_string(&self) -> String {
        match self.domain {
            Domain::Linear => self.value.linear_string(),
            Domain::Logarithmic => self.value.logarithmic_string(),
        }
    }

    /// Split real cents into an ups-and-lifts prefix, clearing them on success
    fn strip_ups_and_lifts(value: &mut TimeMonzo, context: &RootContext) -> String {
        if value.cents == 0.0 {
            return String::new();
        }
        match context.ups_and_lifts_prefix(value.cents) {
            Some(prefix) => {
                value.cents = 0.0;
                prefix
            }
            None => String::new(),
        }
    }

    /// Render without the annotation
    pub fn str(&self, context: Option<&RootContext>) -> String {
        let node = match (&self.node, self.fragile, context) {
            (Some(node), Some(stamp), Some(context)) if context.is_stale(stamp) => node.broken(),
            (node, _, _) => node.clone(),
        };
        let Some(node) = node else {
            return self.canonical_string();
        };
        match node {
            IntervalLiteral::AspiringAbsoluteFjs { flavor } => {
                let Some(context) = context else {
                    return self.canonical_string();
                };
                let Ok(mut relative) = self.value.div(&context.c4) else {
                    return self.canonical_string();
                };
                let prefix = Self::strip_ups_and_lifts(&mut relative, context);
                match as_absolute_fjs(&relative, flavor) {
                    Ok(Some(literal)) => format!("{}{}", prefix, literal),
                    _ => self.canonical_string(),
                }
            }
            IntervalLiteral::AspiringFjs { flavor } => {
                let mut value = self.value.clone();
                let mut prefix = String::new();
                if value.cents != 0.0 {
                    let Some(context) = context else {
                        return self.canonical_string();
                    };
                    prefix = Self::strip_ups_and_lifts(&mut value, context);
                }
                match as_fjs(&value, flavor) {
                    Ok(Some(literal)) => format!("{}{}", prefix, literal),
                    _ => self.canonical_string(),
                }
            }
            other => other.to_string(),
        }
    }

    /// Render with the annotation, e.g. `(5/4 red "third")`
    pub fn to_string_with(&self, context: Option<&RootContext>) -> String {
        let base = self.str(context);
        if self.annotation.is_empty() {
            return base;
        }
        let mut result = format!("({}", base);
        if let Some(color) = &self.annotation.color {
            let color = color.to_string();
            if !color.is_empty() {
                result.push(' ');
                result.push_str(&color);
            }
        }
        if !self.annotation.label.is_empty() {
            let quoted = serde_json::to_string(&self.annotation.label)
                .unwrap_or_else(|_| format!("\"{}\"", self.annotation.label));
            result.push(' ');
            result.push_str(&quoted);
        }
        result.push(')');
        result
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_with(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> TimeMonzo {
        TimeMonzo::from_fraction(Exponent::new(n, d))
    }

    fn nedji(n: i64, d: i64) -> Interval {
        Interval::from_integer(n).backslash(&Interval::from_integer(d)).unwrap()
    }

    #[test]
    fn test_linear_addition_keeps_fraction_node() {
        let a = Interval::from_fraction(Exponent::new(1, 2));
        let b = Interval::from_fraction(Exponent::new(1, 3));
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.domain, Domain::Linear);
        assert_eq!(sum.to_string(), "5/6");
    }

    #[test]
    fn test_logarithmic_addition_stacks() {
        let sum = nedji(4, 12).add(&nedji(2, 12)).unwrap();
        assert_eq!(sum.domain, Domain::Logarithmic);
        assert_eq!(sum.to_string(), "6\\12");
        assert_eq!(sum.value, frac(2, 1).pow_fraction(&Exponent::new(1, 2)).unwrap());
    }

    #[test]
    fn test_cross_domain_addition_fails() {
        let a = Interval::from_integer(3);
        let b = Interval::logarithmic(frac(3, 2));
        assert!(a.add(&b).is_err());
        assert!(b.sub(&a).is_err());
    }

    #[test]
    fn test_logarithmic_needs_linear_scalar() {
        let fifth = Interval::logarithmic(frac(3, 2));
        assert!(fifth.mul(&fifth).is_err());
        let doubled = fifth.mul(&Interval::from_integer(2)).unwrap();
        assert_eq!(doubled.value, frac(9, 4));
        assert!(Interval::from_integer(2).div(&fifth).is_err());
    }

    #[test]
    fn test_logarithmic_division_is_logarithm() {
        let ratio = Interval::logarithmic(frac(9, 4))
            .div(&Interval::logarithmic(frac(3, 2)))
            .unwrap();
        assert_eq!(ratio.domain, Domain::Linear);
        assert_eq!(ratio.value.to_integer().unwrap(), 2);
    }

    #[test]
    fn test_hard_decimal_scales_cents() {
        let octave = Interval::logarithmic(frac(2, 1));
        let half = Interval::new(
            TimeMonzo::from_real(0.5),
            Domain::Linear,
            Some(IntervalLiteral::RealDecimal { value: 0.5 }),
        );
        let result = octave.mul(&half).unwrap();
        assert!(result.value.is_real_cents());
        assert!((result.total_cents() - 600.0).abs() < 1e-9);
    }

    #[test]
    fn test_annotation_infection() {
        let a = Interval::from_integer(3).with_label("three");
        let b = Interval::from_integer(2).with_color(Color::new("red"));
        let product = a.mul(&b).unwrap();
        assert_eq!(product.annotation.label, "three");
        assert_eq!(product.annotation.color, Some(Color::new("red")));
        assert_eq!(product.to_string(), "(6 red \"three\")");

        let difference = b.lsub(&a).unwrap();
        assert_eq!(difference.value.to_integer().unwrap(), 1);
        assert_eq!(difference.annotation.color, Some(Color::new("red")));

        let neither = Preference::Neither.resolve(&a.annotation, &b.annotation);
        assert!(neither.is_empty());
        let right = Preference::Right.resolve(&a.annotation, &b.annotation);
        assert_eq!(right.label, "three");
    }

    #[test]
    fn test_dot_is_linear_integer() {
        let a = Interval::logarithmic(frac(15, 8));
        let b = Interval::logarithmic(frac(3, 2));
        let product = a.dot(&b).unwrap();
        assert_eq!(product.domain, Domain::Linear);
        assert_eq!(product.to_string(), "4");
    }

    #[test]
    fn test_up_registers_fragile_node() {
        let mut context = RootContext::new();
        let monzo = Interval::new(
            frac(3, 2),
            Domain::Logarithmic,
            frac(3, 2).as_monzo_literal(),
        );
        let up = monzo.up(&context);
        assert!(up.is_fragile());
        assert_eq!(up.str(Some(&context)), "^[-1 1>");
        context.set_up(TimeMonzo::from_cents(2.0));
        assert_eq!(up.str(Some(&context)), up.value.logarithmic_string());
    }

    #[test]
    fn test_aspiring_fjs_renders_with_ups() {
        let context = RootContext::new();
        let third = Interval::new(frac(5, 4), Domain::Logarithmic, Some(IntervalLiteral::AspiringFjs {
            flavor: Default::default(),
        }));
        assert_eq!(third.str(None), "M3^5");
        let raised = third.lift(&context).up(&context);
        assert_eq!(raised.str(Some(&context)), "/^M3^5");
        assert_eq!(raised.str(None), raised.value.logarithmic_string());
    }

    #[test]
    fn test_scalar_multiple_of_fjs_is_aspiring() {
        let tone = Interval::new(
            frac(9, 8),
            Domain::Logarithmic,
            Some(IntervalLiteral::AspiringFjs { flavor: Default::default() }),
        );
        let doubled = tone.mul(&Interval::from_integer(2)).unwrap();
        assert_eq!(doubled.str(None), "M3");
    }

    #[test]
    fn test_backslash_and_project() {
        let step = nedji(7, 5);
        assert_eq!(step.to_string(), "7\\5");
        let projected = step
            .project(&Interval::from_fraction(Exponent::new(4, 3)))
            .unwrap();
        assert_eq!(projected.to_string(), "7\\5<4/3>");
        assert_eq!(
            projected.value,
            frac(4, 3).pow_fraction(&Exponent::new(7, 5)).unwrap()
        );
    }

    #[test]
    fn test_neg_and_abs() {
        let fifth = Interval::logarithmic(frac(3, 2));
        assert_eq!(fifth.neg().unwrap().value, frac(2, 3));
        assert_eq!(fifth.neg().unwrap().abs().unwrap().value, frac(3, 2));
        assert_eq!(Interval::from_integer(-3).abs().unwrap().value, frac(3, 1));
    }

    #[test]
    fn test_mmod_and_round() {
        let reduced = Interval::logarithmic(frac(9, 4))
            .mmod(&Interval::logarithmic(frac(2, 1)), false)
            .unwrap();
        assert_eq!(reduced.value, frac(9, 8));
        let rounded = Interval::from_integer(7).round_to(&Interval::from_integer(3)).unwrap();
        assert_eq!(rounded.to_string(), "6");
    }

    #[test]
    fn test_inverse_and_geometric_inverse() {
        assert_eq!(Interval::from_integer(4).inverse().unwrap().value, frac(1, 4));
        let val = Interval::logarithmic(frac(2, 1)).geometric_inverse().unwrap();
        let steps = Interval::logarithmic(frac(2, 1)).dot_val(&val).unwrap();
        assert_eq!(steps.value.to_integer().unwrap(), 1);
    }
}
