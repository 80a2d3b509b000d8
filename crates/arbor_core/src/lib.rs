//! Foundational types shared by the Arbor crates.
//!
//! - [`ArborError`] / [`Result`]: structural errors raised by hierarchy mutation
//! - [`math`]: glam helpers with identity fallbacks for singular input

pub mod error;
pub mod math;

pub use error::{ArborError, Result};
