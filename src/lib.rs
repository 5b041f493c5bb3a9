//! Exact interval algebra for xenharmonic scale languages
//!
//! Intervals are stored as time monzos: rational exponents over the first
//! primes, a rational residual and a real cents offset. On top of the exact
//! value sit a domain tag (linear or logarithmic), an optional formatting node
//! that remembers how the value was written, and the Functional Just System
//! notation engine.
//!
//! The library never installs a logger; hosts pick one for the `log` facade.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod notation;
pub mod parse;
pub mod utils;

// Re-export commonly used types
pub use config::ApproximationSettings;
pub use error::{IntervalError, Result};
pub use models::{Annotation, Color, Domain, Interval, IntervalLiteral, RootContext, TimeMonzo, Val};
pub use notation::FjsFlavor;
pub use parse::{from_notation, Notated};
pub use utils::Exponent;
