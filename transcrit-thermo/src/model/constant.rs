use std::{
    fmt,
    ops::{Add, AddAssign, Mul, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use transcrit_specie::EquationOfState;
use uom::si::{
    amount_of_substance::mole,
    f64::{MolarHeatCapacity, Pressure, ThermodynamicTemperature},
    molar_energy::joule_per_mole,
    molar_heat_capacity::joule_per_kelvin_mole,
    thermodynamic_temperature::kelvin,
};

use crate::{
    error::{ParseModelError, PropertyError},
    units::{MolarEnthalpy, MolarEntropy},
};

use super::{MolarProperties, parse_coeff};

/// Standard reference temperature for the entropy integral, K.
const T_STANDARD: f64 = 298.15;

/// Coefficients for the constant heat-capacity enthalpy model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConstantCoeffs {
    /// Constant molar heat capacity, J/(mol·K).
    pub cp: f64,

    /// Heat of formation, J/mol.
    pub heat_of_formation: f64,
}

impl ConstantCoeffs {
    /// Combines two coefficient sets with the given weights, field by field.
    fn weighted(w1: f64, a: &Self, w2: f64, b: &Self) -> Self {
        Self {
            cp: w1 * a.cp + w2 * b.cp,
            heat_of_formation: w1 * a.heat_of_formation + w2 * b.heat_of_formation,
        }
    }
}

/// An enthalpy model with constant heat capacity, layered over an
/// equation-of-state base.
///
/// The simplest occupant of the same slot as
/// [`SupercriticalEnthalpy`](super::supercritical::SupercriticalEnthalpy):
/// sensible enthalpy is `cp·T`, the chemical contribution is the heat of
/// formation, and entropy is `cp·ln(T/298.15 K)`. Mixing and scaling follow
/// the same mole-weighted rules. Pressure arguments are accepted but
/// unused.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantEnthalpy<E> {
    base: E,
    coeffs: ConstantCoeffs,
}

impl<E: EquationOfState> ConstantEnthalpy<E> {
    /// Creates a model over `base` with the given coefficients.
    ///
    /// There is nothing to validate; non-finite coefficients surface as
    /// [`PropertyError::Calculation`] at evaluation time.
    #[must_use]
    pub fn new(base: E, coeffs: ConstantCoeffs) -> Self {
        Self { base, coeffs }
    }

    /// Returns the underlying base state.
    pub fn base(&self) -> &E {
        &self.base
    }

    /// Returns the model coefficients.
    pub fn coeffs(&self) -> ConstantCoeffs {
        self.coeffs
    }

    /// Returns a copy of this model with the base state renamed.
    #[must_use]
    pub fn renamed(&self, name: &str) -> Self {
        Self {
            base: self.base.renamed(name),
            coeffs: self.coeffs,
        }
    }

    /// Returns a diagnostic name identifying this model and its base.
    #[must_use]
    pub fn model_name() -> String {
        format!("constant-enthalpy<{}>", E::type_name())
    }

    fn finite(value: f64, property: &'static str) -> Result<f64, PropertyError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(PropertyError::Calculation(format!(
                "`{property}` is non-finite; check the coefficients and mixing history"
            )))
        }
    }
}

impl<E: EquationOfState> MolarProperties for ConstantEnthalpy<E> {
    /// Returns the constant heat capacity.
    fn cp(
        &self,
        _pressure: Pressure,
        _temperature: ThermodynamicTemperature,
    ) -> Result<MolarHeatCapacity, PropertyError> {
        let cp = Self::finite(self.coeffs.cp, "cp")?;

        Ok(MolarHeatCapacity::new::<joule_per_kelvin_mole>(cp))
    }

    /// Computes `ha = cp·T + h_formation`.
    fn absolute_enthalpy(
        &self,
        _pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<MolarEnthalpy, PropertyError> {
        let t = temperature.get::<kelvin>();
        let h = Self::finite(
            self.coeffs.cp * t + self.coeffs.heat_of_formation,
            "absolute enthalpy",
        )?;

        Ok(MolarEnthalpy::new::<joule_per_mole>(h))
    }

    /// Computes `hs = cp·T`, the enthalpy without the formation term.
    fn sensible_enthalpy(
        &self,
        _pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<MolarEnthalpy, PropertyError> {
        let t = temperature.get::<kelvin>();
        let h = Self::finite(self.coeffs.cp * t, "sensible enthalpy")?;

        Ok(MolarEnthalpy::new::<joule_per_mole>(h))
    }

    /// Returns the heat of formation.
    fn chemical_enthalpy(&self) -> MolarEnthalpy {
        MolarEnthalpy::new::<joule_per_mole>(self.coeffs.heat_of_formation)
    }

    /// Computes `s = cp·ln(T/298.15 K)`.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::Calculation`] for temperatures at or below
    /// 0 K, where the logarithm is undefined.
    fn entropy(
        &self,
        _pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<MolarEntropy, PropertyError> {
        let t = temperature.get::<kelvin>();
        let s = Self::finite(self.coeffs.cp * (t / T_STANDARD).ln(), "entropy")?;

        Ok(MolarEntropy::new::<joule_per_kelvin_mole>(s))
    }
}

impl<E: EquationOfState> AddAssign for ConstantEnthalpy<E> {
    /// Combines `other` into `self` by mole-weighted averaging, base state
    /// first.
    fn add_assign(&mut self, other: Self) {
        let amount_before = self.base.amount().get::<mole>();
        let amount_other = other.base.amount().get::<mole>();

        self.base += other.base;

        let total = self.base.amount().get::<mole>();
        self.coeffs = ConstantCoeffs::weighted(
            amount_before / total,
            &self.coeffs,
            amount_other / total,
            &other.coeffs,
        );
    }
}

impl<E: EquationOfState> SubAssign for ConstantEnthalpy<E> {
    fn sub_assign(&mut self, other: Self) {
        let amount_before = self.base.amount().get::<mole>();
        let amount_other = other.base.amount().get::<mole>();

        self.base -= other.base;

        let total = self.base.amount().get::<mole>();
        self.coeffs = ConstantCoeffs::weighted(
            amount_before / total,
            &self.coeffs,
            -(amount_other / total),
            &other.coeffs,
        );
    }
}

impl<E: EquationOfState> Add for ConstantEnthalpy<E> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let amount_1 = self.base.amount().get::<mole>();
        let amount_2 = other.base.amount().get::<mole>();

        let base = self.base + other.base;
        let total = base.amount().get::<mole>();
        let coeffs = ConstantCoeffs::weighted(
            amount_1 / total,
            &self.coeffs,
            amount_2 / total,
            &other.coeffs,
        );

        Self { base, coeffs }
    }
}

impl<E: EquationOfState> Sub for ConstantEnthalpy<E> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        let amount_1 = self.base.amount().get::<mole>();
        let amount_2 = other.base.amount().get::<mole>();

        let base = self.base - other.base;
        let total = base.amount().get::<mole>();
        let coeffs = ConstantCoeffs::weighted(
            amount_1 / total,
            &self.coeffs,
            -(amount_2 / total),
            &other.coeffs,
        );

        Self { base, coeffs }
    }
}

impl<E: EquationOfState> Mul<f64> for ConstantEnthalpy<E> {
    type Output = Self;

    /// Scales the amount of substance in the base state; the coefficients
    /// are intensive and copy unchanged.
    fn mul(self, scale: f64) -> Self {
        Self {
            base: self.base * scale,
            coeffs: self.coeffs,
        }
    }
}

impl<E: EquationOfState> Mul<ConstantEnthalpy<E>> for f64 {
    type Output = ConstantEnthalpy<E>;

    fn mul(self, model: ConstantEnthalpy<E>) -> ConstantEnthalpy<E> {
        model * self
    }
}

impl<E: EquationOfState> fmt::Display for ConstantEnthalpy<E> {
    /// Writes `cp heat_of_formation` followed by the base state's own form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.coeffs.cp, self.coeffs.heat_of_formation, self.base,
        )
    }
}

impl<E> FromStr for ConstantEnthalpy<E>
where
    E: EquationOfState,
    <E as FromStr>::Err: fmt::Display,
{
    type Err = ParseModelError;

    /// Parses the layout produced by [`Display`]: two whitespace-separated
    /// coefficients followed by the base state.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();

        let cp = parse_coeff(&mut fields, "cp")?;
        let heat_of_formation = parse_coeff(&mut fields, "heat_of_formation")?;

        let rest = fields.collect::<Vec<_>>().join(" ");
        let base = rest
            .parse::<E>()
            .map_err(|e| ParseModelError::InvalidBase(e.to_string()))?;

        Ok(Self::new(
            base,
            ConstantCoeffs {
                cp,
                heat_of_formation,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use transcrit_specie::{PerfectGas, Specie};
    use uom::si::{
        f64::{AmountOfSubstance, MolarMass},
        molar_mass::gram_per_mole,
        pressure::pascal,
    };

    fn carbon_dioxide(amount: f64) -> PerfectGas {
        PerfectGas::new(Specie::new(
            "CO2",
            AmountOfSubstance::new::<mole>(amount),
            MolarMass::new::<gram_per_mole>(44.01),
        ))
    }

    fn co2_coeffs() -> ConstantCoeffs {
        ConstantCoeffs {
            cp: 37.135,
            heat_of_formation: -393_522.0,
        }
    }

    fn model(amount: f64) -> ConstantEnthalpy<PerfectGas> {
        ConstantEnthalpy::new(carbon_dioxide(amount), co2_coeffs())
    }

    fn atmospheric() -> Pressure {
        Pressure::new::<pascal>(101_325.0)
    }

    fn at(t: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<kelvin>(t)
    }

    #[test]
    fn enthalpy_splits_into_sensible_and_chemical_parts() -> Result<(), PropertyError> {
        let model = model(1.0);

        let ha = model.absolute_enthalpy(atmospheric(), at(300.0))?;
        let hs = model.sensible_enthalpy(atmospheric(), at(300.0))?;
        let hc = model.chemical_enthalpy();

        assert_relative_eq!(hs.get::<joule_per_mole>(), 37.135 * 300.0, max_relative = 1e-12);
        assert_relative_eq!(hc.get::<joule_per_mole>(), -393_522.0);
        assert_relative_eq!(
            ha.get::<joule_per_mole>(),
            (hs + hc).get::<joule_per_mole>(),
            max_relative = 1e-12,
        );

        Ok(())
    }

    #[test]
    fn entropy_vanishes_at_the_reference_temperature() -> Result<(), PropertyError> {
        let s = model(1.0).entropy(atmospheric(), at(298.15))?;
        assert_abs_diff_eq!(s.get::<joule_per_kelvin_mole>(), 0.0, epsilon = 1e-12);

        Ok(())
    }

    #[test]
    fn entropy_follows_the_logarithmic_integral() -> Result<(), PropertyError> {
        let s = model(1.0).entropy(atmospheric(), at(2.0 * 298.15))?;
        assert_relative_eq!(
            s.get::<joule_per_kelvin_mole>(),
            37.135 * std::f64::consts::LN_2,
            max_relative = 1e-12,
        );

        Ok(())
    }

    #[test]
    fn entropy_is_undefined_at_or_below_zero_kelvin() {
        for t in [0.0, -50.0] {
            assert!(matches!(
                model(1.0).entropy(atmospheric(), at(t)),
                Err(PropertyError::Calculation(_)),
            ));
        }
    }

    #[test]
    fn mixing_weights_use_the_combined_amount() {
        let other = ConstantEnthalpy::new(
            carbon_dioxide(3.0),
            ConstantCoeffs {
                cp: 29.1,
                heat_of_formation: 0.0,
            },
        );

        let mixed = model(1.0) + other;

        assert_eq!(
            mixed.coeffs(),
            ConstantCoeffs {
                cp: 0.25 * 37.135 + 0.75 * 29.1,
                heat_of_formation: 0.25 * -393_522.0,
            },
        );
        assert_relative_eq!(mixed.base().amount().get::<mole>(), 4.0);
    }

    #[test]
    fn subtraction_undoes_mixing() {
        let other = ConstantEnthalpy::new(
            carbon_dioxide(3.0),
            ConstantCoeffs {
                cp: 29.1,
                heat_of_formation: 0.0,
            },
        );

        let recovered = (model(1.0) + other.clone()) - other;

        assert_relative_eq!(recovered.coeffs().cp, 37.135, max_relative = 1e-12);
        assert_relative_eq!(
            recovered.coeffs().heat_of_formation,
            -393_522.0,
            max_relative = 1e-12,
        );
        assert_relative_eq!(recovered.base().amount().get::<mole>(), 1.0);
    }

    #[test]
    fn scaling_scales_the_base_only() -> Result<(), PropertyError> {
        let scaled = 2.0 * model(1.0);

        assert_eq!(scaled.coeffs(), co2_coeffs());
        assert_relative_eq!(scaled.base().amount().get::<mole>(), 2.0);
        assert_eq!(
            scaled.cp(atmospheric(), at(300.0))?,
            model(1.0).cp(atmospheric(), at(300.0))?,
        );

        Ok(())
    }

    #[test]
    fn limit_defaults_to_pass_through() {
        assert_eq!(model(1.0).limit(at(1e4)), at(1e4));
    }

    #[test]
    fn text_round_trip_is_exact() {
        let original = model(1.5);
        let parsed: ConstantEnthalpy<PerfectGas> = original.to_string().parse().unwrap();

        assert_eq!(parsed, original);
    }

    #[test]
    fn model_name_includes_the_base_type() {
        assert_eq!(
            ConstantEnthalpy::<PerfectGas>::model_name(),
            "constant-enthalpy<perfect-gas>",
        );
    }

    #[test]
    fn coeffs_round_trip_through_json() {
        let coeffs = co2_coeffs();
        let json = serde_json::to_string(&coeffs).unwrap();

        assert_eq!(serde_json::from_str::<ConstantCoeffs>(&json).unwrap(), coeffs);
    }
}
