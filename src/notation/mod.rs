//! Notation module
//!
//! Pythagorean interval names, absolute pitch names and the Functional Just
//! System with its comma flavors.

pub mod absolute;
pub mod commas;
pub mod fjs;
pub mod pythagorean;

pub use absolute::{AbsolutePitch, Nominal};
pub use commas::{register_comma_table, unregister_comma_table, CommaTable};
pub use fjs::{as_absolute_fjs, as_fjs, inflect, uninflect, FjsFlavor, FjsInflection};
pub use pythagorean::{Degree, Pythagorean};
