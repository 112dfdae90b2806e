//! Type aliases for quantities this crate names differently than `uom`.

use uom::si::f64::{MolarHeatCapacity, SpecificHeatCapacity};

/// Molar gas constant, J/(mol·K) in SI.
pub type MolarGasConstant = MolarHeatCapacity;

/// Specific gas constant, J/(kg·K) in SI.
pub type SpecificGasConstant = SpecificHeatCapacity;
