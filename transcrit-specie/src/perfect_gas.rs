use std::{
    fmt,
    ops::{Add, AddAssign, Mul, Sub, SubAssign},
    str::FromStr,
};

use uom::si::f64::{AmountOfSubstance, MassDensity, Pressure, ThermodynamicTemperature};

use crate::{
    EquationOfState, ParseSpecieError, Specie, units::SpecificGasConstant,
    universal_gas_constant,
};

/// An equation-of-state base using ideal gas assumptions.
///
/// Wraps a [`Specie`] and relates pressure, temperature, and density through
/// `ρ = p·W/(R·T)`, with `W` the molar weight and `R` the molar gas
/// constant. Combination arithmetic and the text form delegate to the
/// underlying specie.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfectGas {
    specie: Specie,
}

impl PerfectGas {
    /// Creates a perfect gas state over the given specie.
    #[must_use]
    pub fn new(specie: Specie) -> Self {
        Self { specie }
    }

    /// Returns the underlying specie.
    pub fn specie(&self) -> &Specie {
        &self.specie
    }

    /// Returns the specific gas constant, `R/W`.
    pub fn specific_gas_constant(&self) -> SpecificGasConstant {
        universal_gas_constant() / self.specie.molar_weight()
    }

    /// Computes the density at the given pressure and temperature.
    pub fn density(
        &self,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> MassDensity {
        pressure * self.specie.molar_weight() / (universal_gas_constant() * temperature)
    }
}

impl EquationOfState for PerfectGas {
    fn amount(&self) -> AmountOfSubstance {
        self.specie.amount()
    }

    fn type_name() -> &'static str {
        "perfect-gas"
    }

    fn renamed(&self, name: &str) -> Self {
        Self {
            specie: self.specie.renamed(name),
        }
    }
}

impl AddAssign for PerfectGas {
    fn add_assign(&mut self, other: Self) {
        self.specie += other.specie;
    }
}

impl SubAssign for PerfectGas {
    fn sub_assign(&mut self, other: Self) {
        self.specie -= other.specie;
    }
}

impl Add for PerfectGas {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sub for PerfectGas {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self {
        self -= other;
        self
    }
}

impl Mul<f64> for PerfectGas {
    type Output = Self;

    fn mul(self, scale: f64) -> Self {
        Self {
            specie: self.specie * scale,
        }
    }
}

impl Mul<PerfectGas> for f64 {
    type Output = PerfectGas;

    fn mul(self, gas: PerfectGas) -> PerfectGas {
        gas * self
    }
}

impl fmt::Display for PerfectGas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.specie, f)
    }
}

impl FromStr for PerfectGas {
    type Err = ParseSpecieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self::new)
    }
}
