//! Composition bookkeeping and equation-of-state base types for the
//! Transcrit property models.

mod equation_of_state;
mod perfect_gas;
mod specie;

pub mod units;

pub use equation_of_state::EquationOfState;
pub use perfect_gas::PerfectGas;
pub use specie::{ParseSpecieError, Specie, universal_gas_constant};
