//! Top-level interval operations
//!
//! Entry points a host language calls on evaluated literals: domain
//! conversions, notation conversions and annotation helpers.
//!
//! # Module Structure
//!
//! - `domain`: Relative/absolute and linear/logarithmic conversions, rounding, simplify/bleach/unlabel
//! - `notation`: FJS, absolute FJS, monzo, cents, fraction, radical and decimal spellings

pub mod domain;
pub mod notation;

// Re-export all public functions from modules
pub use domain::{
    bleach, ceil, floor, round, simplify, to_absolute_linear, to_absolute_logarithmic, to_linear,
    to_logarithmic, to_relative_linear, to_relative_logarithmic, trunc, unlabel,
};
pub use notation::{
    to_absolute_fjs, to_cents, to_decimal, to_fjs, to_fraction, to_monzo, to_radical, ups_as,
};
pub use crate::parse::value::from_notation;
