//! Utility modules for the interval algebra
//!
//! Prime tables and exact rational helpers shared by the models.

pub mod primes;
pub mod rational;

pub use rational::Exponent;
