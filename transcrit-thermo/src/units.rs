//! Type aliases for molar quantities this crate names differently than `uom`.

use uom::si::f64::{MolarEnergy, MolarHeatCapacity};

/// Molar enthalpy, J/mol in SI.
pub type MolarEnthalpy = MolarEnergy;

/// Molar entropy, J/(mol·K) in SI.
pub type MolarEntropy = MolarHeatCapacity;
