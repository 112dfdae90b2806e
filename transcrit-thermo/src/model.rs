use std::ops::Sub;

use uom::si::f64::{MolarHeatCapacity, Pressure, ThermodynamicTemperature};

use crate::{
    PropertyError,
    error::ParseModelError,
    units::{MolarEnthalpy, MolarEntropy},
};

pub mod constant;
pub mod supercritical;

/// Trait for computing molar thermodynamic properties as functions of
/// pressure and temperature.
///
/// Implemented by enthalpy models that decorate an equation-of-state base
/// type. Models are interchangeable: a caller holds any `MolarProperties`
/// value and evaluates heat capacity and enthalpy without knowing which
/// correlation sits behind it.
pub trait MolarProperties {
    /// Limits a temperature to the model's valid range.
    ///
    /// The default implementation passes the temperature through unchanged.
    #[must_use]
    fn limit(&self, temperature: ThermodynamicTemperature) -> ThermodynamicTemperature {
        temperature
    }

    /// Returns the molar heat capacity at constant pressure.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if `cp` cannot be calculated.
    fn cp(
        &self,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<MolarHeatCapacity, PropertyError>;

    /// Returns the absolute molar enthalpy.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the enthalpy cannot be calculated.
    fn absolute_enthalpy(
        &self,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<MolarEnthalpy, PropertyError>;

    /// Returns the sensible molar enthalpy.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the enthalpy cannot be calculated.
    fn sensible_enthalpy(
        &self,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<MolarEnthalpy, PropertyError>;

    /// Returns the chemical (formation) contribution to the enthalpy.
    fn chemical_enthalpy(&self) -> MolarEnthalpy;

    /// Returns the molar entropy.
    ///
    /// # Errors
    ///
    /// Returns a [`PropertyError`] if the entropy cannot be calculated, or
    /// [`PropertyError::NotImplemented`] if the model has no entropy
    /// correlation.
    fn entropy(
        &self,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<MolarEntropy, PropertyError>;
}

/// Returns the difference `to - from` between two model states.
///
/// Mixture bookkeeping relaxes between compositions using differences of
/// whole model states (base state and coefficients together); this is that
/// operation under an explicit name. It is not an equality test.
#[must_use]
pub fn delta<M>(from: &M, to: &M) -> M
where
    M: Clone + Sub<Output = M>,
{
    to.clone() - from.clone()
}

/// Reads the next whitespace-separated coefficient from `fields`.
pub(crate) fn parse_coeff<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<f64, ParseModelError> {
    let raw = fields
        .next()
        .ok_or(ParseModelError::MissingCoefficient(field))?;

    raw.parse()
        .map_err(|source| ParseModelError::InvalidCoefficient { field, source })
}
