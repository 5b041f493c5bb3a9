//! Models module for the interval algebra
//!
//! This module contains the exact value representation, formatting nodes,
//! the evaluation context and the domain-tagged interval and val types.

pub mod context;
pub mod interval;
pub mod literal;
pub mod monzo;
pub mod val;

// Re-export commonly used types
pub use context::{count_ups_and_lifts, RootContext};
pub use interval::{Annotation, Color, Domain, Interval, Preference};
pub use literal::{AbsoluteFjsLiteral, FjsLiteral, IntervalLiteral};
pub use monzo::TimeMonzo;
pub use val::Val;
