//! Vals: linear maps from intervals to steps
//!
//! A val is stored as a tuning-map-like monzo whose components are the number
//! of steps assigned to each prime. The equave records which interval the
//! val divides. Only relative vals are supported.

use std::fmt;

use num_traits::{CheckedMul, CheckedSub, One, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{IntervalError, Result};
use crate::models::context::RootContext;
use crate::models::interval::{dot_result, Annotation, Domain, Interval};
use crate::models::literal::{add_nodes, sub_nodes, IntervalLiteral};
use crate::models::monzo::TimeMonzo;
use crate::utils::primes::fraction_to_monzo;
use crate::utils::rational::Exponent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Val {
    pub value: TimeMonzo,
    pub equave: TimeMonzo,
    pub node: Option<IntervalLiteral>,
    fragile: Option<u64>,
}

fn octave() -> TimeMonzo {
    TimeMonzo::from_integer(2)
}

impl Val {
    pub fn new(value: TimeMonzo, equave: TimeMonzo, node: Option<IntervalLiteral>) -> Result<Self> {
        if !value.is_scalar() || !equave.is_scalar() {
            return Err(IntervalError::representation("Only relative vals implemented"));
        }
        Ok(Val {
            value,
            equave,
            node,
            fragile: None,
        })
    }

    /// Octave-equivalent val from prime step counts, e.g. `<12 19 28]`
    pub fn from_components(components: Vec<Exponent>) -> Self {
        let value = TimeMonzo::new(Exponent::zero(), components, Exponent::one());
        let node = value.as_val_literal();
        Val {
            value,
            equave: octave(),
            node,
            fragile: None,
        }
    }

    pub fn with_equave(mut self, equave: TimeMonzo) -> Result<Self> {
        if !equave.is_scalar() {
            return Err(IntervalError::representation("Only relative vals implemented"));
        }
        self.equave = equave;
        Ok(self)
    }

    /// Val over a subgroup basis such as `2.15.13`
    ///
    /// Solves for prime step counts that map each basis element to its
    /// entry in `mapping`. Primes outside the span of the basis get zero
    /// steps. The first basis element becomes the equave.
    pub fn from_subgroup(mapping: &[Exponent], basis: &[Exponent]) -> Result<Self> {
        if mapping.len() != basis.len() {
            return Err(IntervalError::representation(format!(
                "Val has {} components but the subgroup has {} generators",
                mapping.len(),
                basis.len()
            )));
        }
        let Some(equave) = basis.first() else {
            return Err(IntervalError::representation("Empty subgroup basis"));
        };
        let rows = basis
            .iter()
            .map(fraction_to_monzo)
            .collect::<Result<Vec<_>>>()?;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut matrix: Vec<Vec<Exponent>> = rows
            .iter()
            .zip(mapping.iter())
            .map(|(row, steps)| {
                let mut augmented: Vec<Exponent> =
                    row.iter().map(|e| Exponent::from_integer(*e)).collect();
                augmented.resize(width, Exponent::zero());
                augmented.push(*steps);
                augmented
            })
            .collect();
        let pivots = gauss_jordan(&mut matrix, width)?;
        let mut components = vec![Exponent::zero(); width];
        for (row, column) in pivots.iter().enumerate() {
            components[*column] = matrix[row][width];
        }
        log::debug!("Subgroup val solved over {} primes", width);
        let value = TimeMonzo::new(Exponent::zero(), components, Exponent::one());
        Ok(Val {
            value,
            equave: TimeMonzo::from_fraction(*equave),
            node: None,
            fragile: None,
        })
    }

    pub fn is_fragile(&self) -> bool {
        self.fragile.is_some()
    }

    pub(crate) fn stamped(mut self, epoch: u64) -> Self {
        self.fragile = Some(epoch);
        self
    }

    /// Steps assigned to the equave
    pub fn divisions(&self) -> Result<Exponent> {
        self.value.dot(&self.equave)
    }

    fn same_equave(&self, other: &Val, operation: &str) -> Result<()> {
        if !self.equave.strict_equals(&other.equave) {
            return Err(IntervalError::representation(format!(
                "Val equaves must match in {}",
                operation
            )));
        }
        Ok(())
    }

    fn derive(&self, value: TimeMonzo, node: Option<IntervalLiteral>) -> Val {
        Val {
            value,
            equave: self.equave.clone(),
            node,
            fragile: None,
        }
    }

    // ========================================================================
    // Arithmetic
    // ========================================================================

    pub fn neg(&self) -> Result<Val> {
        Ok(self.derive(self.value.inverse()?, None))
    }

    /// The interval whose product with this val is one
    pub fn geometric_inverse(&self) -> Result<Interval> {
        Ok(Interval::logarithmic(self.value.geometric_inverse()?))
    }

    pub fn abs(&self) -> Result<Val> {
        Ok(self.derive(self.value.pitch_abs()?, None))
    }

    pub fn add(&self, other: &Val) -> Result<Val> {
        self.same_equave(other, "addition")?;
        let node = add_nodes(self.node.as_ref(), other.node.as_ref());
        Ok(self.derive(self.value.mul(&other.value), node))
    }

    pub fn sub(&self, other: &Val) -> Result<Val> {
        self.same_equave(other, "subtraction")?;
        let node = sub_nodes(self.node.as_ref(), other.node.as_ref());
        Ok(self.derive(self.value.div(&other.value)?, node))
    }

    /// Scale by a linear scalar
    pub fn mul(&self, scalar: &Interval) -> Result<Val> {
        let factor = self.scalar_factor(scalar, "multiplication")?;
        Ok(self.derive(self.value.pow_fraction(&factor)?, None))
    }

    pub fn div(&self, scalar: &Interval) -> Result<Val> {
        let factor = self.scalar_factor(scalar, "division")?;
        if factor.is_zero() {
            return Err(IntervalError::DivisionByZero);
        }
        Ok(self.derive(self.value.pow_fraction(&factor.recip())?, None))
    }

    /// Exact factor of a scalar, approximating real decimals
    fn scalar_factor(&self, scalar: &Interval, operation: &str) -> Result<Exponent> {
        if scalar.domain != Domain::Linear || !scalar.value.is_scalar() {
            return Err(IntervalError::representation(format!(
                "Val {} is only defined for linear scalars",
                operation
            )));
        }
        if scalar.node.as_ref().map_or(false, IntervalLiteral::is_hard_decimal) {
            return Exponent::approximate_float(scalar.value_of())
                .ok_or_else(|| IntervalError::representation("Scalar too large for a val"));
        }
        scalar.value.to_fraction()
    }

    /// Steps this val assigns to `interval`
    pub fn dot(&self, interval: &Interval) -> Result<Interval> {
        interval.dot_val(self)
    }

    /// Inner product with another val
    pub fn dot_val(&self, other: &Val) -> Result<Interval> {
        Ok(dot_result(self.value.dot(&other.value)?, Annotation::default()))
    }

    // ========================================================================
    // Ups and lifts
    // ========================================================================

    fn inflected(&self, value: TimeMonzo, ups: i64, lifts: i64, context: &RootContext) -> Val {
        let mut result = self.derive(value, None);
        if let Some(node) = self.node.as_ref().and_then(|n| n.with_inflection(ups, lifts)) {
            result.node = Some(node);
            result.fragile = Some(context.epoch());
        }
        result
    }

    pub fn up(&self, context: &RootContext) -> Val {
        self.inflected(self.value.mul(context.up()), 1, 0, context)
    }

    pub fn down(&self, context: &RootContext) -> Result<Val> {
        Ok(self.inflected(self.value.div(context.up())?, -1, 0, context))
    }

    pub fn lift(&self, context: &RootContext) -> Val {
        self.inflected(self.value.mul(context.lift()), 0, 1, context)
    }

    pub fn drop(&self, context: &RootContext) -> Result<Val> {
        Ok(self.inflected(self.value.div(context.lift())?, 0, -1, context))
    }

    pub fn break_node(&mut self) {
        self.node = self.node.as_ref().and_then(IntervalLiteral::broken);
        self.fragile = None;
    }

    // ========================================================================
    // Comparison and rendering
    // ========================================================================

    pub fn equals(&self, other: &Val) -> bool {
        self.value.equals(&other.value) && self.equave.equals(&other.equave)
    }

    pub fn strict_equals(&self, other: &Val) -> bool {
        self.value.strict_equals(&other.value) && self.equave.strict_equals(&other.equave)
    }

    pub fn str(&self, context: Option<&RootContext>) -> String {
        let stale = matches!(
            (self.fragile, context),
            (Some(stamp), Some(context)) if context.is_stale(stamp)
        );
        let base = match (&self.node, stale) {
            (Some(node), false) => node.to_string(),
            _ => self.value.cologarithmic_string(),
        };
        if self.equave.strict_equals(&octave()) {
            return base;
        }
        format!("withEquave({}, {})", base, self.equave.linear_string())
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.str(None))
    }
}

/// Reduce `matrix` in place, returning the pivot column of each leading row
fn gauss_jordan(matrix: &mut [Vec<Exponent>], width: usize) -> Result<Vec<usize>> {
    let overflow = || IntervalError::representation("Overflow while solving subgroup val");
    let mut pivots = Vec::new();
    let mut row = 0;
    for column in 0..width {
        if row >= matrix.len() {
            break;
        }
        let Some(pivot) = (row..matrix.len()).find(|r| !matrix[*r][column].is_zero()) else {
            continue;
        };
        matrix.swap(row, pivot);
        let scale = matrix[row][column].recip();
        for entry in matrix[row].iter_mut() {
            *entry = entry.checked_mul(&scale).ok_or_else(overflow)?;
        }
        for other in 0..matrix.len() {
            if other == row || matrix[other][column].is_zero() {
                continue;
            }
            let factor = matrix[other][column];
            for k in 0..=width {
                let delta = matrix[row][k].checked_mul(&factor).ok_or_else(overflow)?;
                matrix[other][k] = matrix[other][k].checked_sub(&delta).ok_or_else(overflow)?;
            }
        }
        pivots.push(column);
        row += 1;
    }
    if row < matrix.len() {
        if matrix[row..].iter().any(|r| !r[width].is_zero()) {
            return Err(IntervalError::representation("Inconsistent subgroup val"));
        }
        return Err(IntervalError::representation("Subgroup basis is not independent"));
    }
    Ok(pivots)
}
