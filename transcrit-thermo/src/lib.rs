//! Enthalpy and heat-capacity property models for fluids near the critical
//! point, layered over the equation-of-state base types from
//! `transcrit-specie`.

mod error;

pub mod model;
pub mod units;

pub use error::{ParseModelError, PropertyError};
pub use model::{MolarProperties, delta};
