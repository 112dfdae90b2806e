use std::{
    fmt,
    ops::{Add, AddAssign, Mul, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use transcrit_specie::EquationOfState;
use uom::{
    ConstZero,
    si::{
        amount_of_substance::mole,
        f64::{MolarHeatCapacity, Pressure, ThermodynamicTemperature},
        molar_energy::joule_per_mole,
        molar_heat_capacity::joule_per_kelvin_mole,
        thermodynamic_temperature::kelvin,
    },
};

use crate::{
    error::{ParseModelError, PropertyError},
    units::{MolarEnthalpy, MolarEntropy},
};

use super::{MolarProperties, parse_coeff};

/// Correlation coefficients for the supercritical enthalpy model.
///
/// Coefficients are plain numbers in SI molar units so sets can be loaded
/// from serialized records; the model wraps evaluation results in `uom`
/// quantities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupercriticalCoeffs {
    /// Heat capacity asymptote on the liquid-like branch, J/(mol·K).
    pub cp_liquid: f64,

    /// Heat capacity asymptote on the gas-like branch, J/(mol·K).
    pub cp_gas: f64,

    /// Blend steepness coefficient (dimensionless).
    pub blend_steepness: f64,

    /// Peak magnitude of the critical-point spike, J/(mol·K).
    pub spike_height: f64,

    /// Spike width-scaling coefficient (dimensionless).
    pub spike_width: f64,

    /// Characteristic temperature scale normalizing the correlation, K.
    ///
    /// Must be non-zero; every term of the correlation divides by it.
    pub band_width: f64,
}

impl SupercriticalCoeffs {
    /// Combines two coefficient sets with the given weights, field by field.
    fn weighted(w1: f64, a: &Self, w2: f64, b: &Self) -> Self {
        Self {
            cp_liquid: w1 * a.cp_liquid + w2 * b.cp_liquid,
            cp_gas: w1 * a.cp_gas + w2 * b.cp_gas,
            blend_steepness: w1 * a.blend_steepness + w2 * b.blend_steepness,
            spike_height: w1 * a.spike_height + w2 * b.spike_height,
            spike_width: w1 * a.spike_width + w2 * b.spike_width,
            band_width: w1 * a.band_width + w2 * b.band_width,
        }
    }

    /// Evaluates `cp(T) = blend(T) + spike(T)` in J/(mol·K).
    ///
    /// The blend is the exponential ratio
    /// `[cpL·e^(−x) + cpG·e^(x)] / [e^(−x) + e^(x)]` with
    /// `x = blend_steepness·T/band_width`, evaluated through its `tanh`
    /// form so large `|x|` stays finite.
    fn cp_value(&self, t: f64) -> f64 {
        let x = self.blend_steepness * t / self.band_width;
        let blend =
            0.5 * (self.cp_liquid + self.cp_gas) + 0.5 * (self.cp_gas - self.cp_liquid) * x.tanh();
        let spike = self.spike_height / (1.0 + (self.spike_width * t / self.band_width).powi(2));

        blend + spike
    }

    /// Evaluates the integral of `cp` from 0 K to `T` in J/mol.
    ///
    /// The blend term integrates to `½(cpL+cpG)·T + ½(cpG−cpL)·ln cosh(cT)/c`
    /// with `c = blend_steepness/band_width`, and the spike term to
    /// `spike_height·atan(bT)/b` with `b = spike_width/band_width`, so the
    /// derivative reproduces `cp` and the integral vanishes at 0 K. The
    /// degenerate coefficients `c == 0` and `b == 0` take their analytic
    /// limits (constant blend and constant spike).
    fn enthalpy_value(&self, t: f64) -> f64 {
        let c = self.blend_steepness / self.band_width;
        let b = self.spike_width / self.band_width;

        let h_blend = if c == 0.0 {
            0.5 * (self.cp_liquid + self.cp_gas) * t
        } else {
            0.5 * (self.cp_liquid + self.cp_gas) * t
                + 0.5 * (self.cp_gas - self.cp_liquid) * ln_cosh(c * t) / c
        };
        let h_spike = if b == 0.0 {
            self.spike_height * t
        } else {
            self.spike_height * (b * t).atan() / b
        };

        h_blend + h_spike
    }
}

/// Numerically stable `ln(cosh(x))`, finite for all finite `x`.
fn ln_cosh(x: f64) -> f64 {
    x.abs() + (-2.0 * x.abs()).exp().ln_1p() - std::f64::consts::LN_2
}

/// An enthalpy and heat-capacity model for fluids near the critical point,
/// layered over an equation-of-state base.
///
/// Heat capacity is a smooth blend between a liquid-like and a gas-like
/// asymptote plus a Lorentzian spike centered at 0 K of the normalized
/// temperature scale, and enthalpy is the exact closed-form integral of the
/// heat capacity, so no numerical integration is performed. Pressure
/// arguments are accepted but unused; the correlation depends on
/// temperature alone.
///
/// Combining two models with `+`/`+=` combines the base states with their
/// own arithmetic and replaces the coefficients with mole-fraction-weighted
/// averages computed from the combined amount. The averaging can cancel
/// `band_width` to zero; every evaluation re-checks it and reports such a
/// coefficient set as [`PropertyError::Calculation`]. Scaling with
/// `k * model` scales only the base state; the coefficients are intensive
/// and copy unchanged.
///
/// # Example
///
/// ```
/// use transcrit_specie::{PerfectGas, Specie};
/// use transcrit_thermo::model::supercritical::{SupercriticalCoeffs, SupercriticalEnthalpy};
/// use transcrit_thermo::MolarProperties;
/// use uom::si::{
///     amount_of_substance::mole,
///     f64::{AmountOfSubstance, MolarMass, Pressure, ThermodynamicTemperature},
///     molar_mass::gram_per_mole,
///     pressure::pascal,
///     thermodynamic_temperature::kelvin,
/// };
///
/// let base = PerfectGas::new(Specie::new(
///     "CO2",
///     AmountOfSubstance::new::<mole>(1.0),
///     MolarMass::new::<gram_per_mole>(44.01),
/// ));
/// let coeffs = SupercriticalCoeffs {
///     cp_liquid: 30_000.0,
///     cp_gas: 45_000.0,
///     blend_steepness: 0.5,
///     spike_height: 200_000.0,
///     spike_width: 2.0,
///     band_width: 10.0,
/// };
///
/// let model = SupercriticalEnthalpy::new(base, coeffs)?;
/// let cp = model.cp(
///     Pressure::new::<pascal>(101_325.0),
///     ThermodynamicTemperature::new::<kelvin>(0.0),
/// )?;
///
/// // At the spike center the blend midpoint and the full spike add up.
/// assert_eq!(cp.value, 0.5 * (30_000.0 + 45_000.0) + 200_000.0);
/// # Ok::<(), transcrit_thermo::PropertyError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SupercriticalEnthalpy<E> {
    base: E,
    coeffs: SupercriticalCoeffs,
}

impl<E: EquationOfState> SupercriticalEnthalpy<E> {
    /// Creates a model over `base` with the given coefficients.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::InvalidInput`] if `band_width` is zero.
    /// No other coefficient is validated; non-finite values surface as
    /// [`PropertyError::Calculation`] at evaluation time.
    pub fn new(base: E, coeffs: SupercriticalCoeffs) -> Result<Self, PropertyError> {
        if coeffs.band_width == 0.0 {
            return Err(PropertyError::InvalidInput(
                "band_width must be non-zero".into(),
            ));
        }

        Ok(Self { base, coeffs })
    }

    /// Returns the underlying base state.
    pub fn base(&self) -> &E {
        &self.base
    }

    /// Returns the correlation coefficients.
    pub fn coeffs(&self) -> SupercriticalCoeffs {
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
        format!("supercritical-enthalpy<{}>", E::type_name())
    }

    /// Returns the coefficients, rejecting a zero `band_width`.
    ///
    /// [`new`](Self::new) refuses the value eagerly, but mixing recomputes
    /// the coefficients and can cancel it back to zero. The `tanh` form of
    /// the blend would turn the resulting infinite intermediate into a
    /// finite one-sided asymptote, so the check cannot be left to
    /// [`finite`](Self::finite).
    fn checked_coeffs(
        &self,
        property: &'static str,
    ) -> Result<SupercriticalCoeffs, PropertyError> {
        if self.coeffs.band_width == 0.0 {
            return Err(PropertyError::Calculation(format!(
                "`{property}` is undefined for a zero band width; check the mixing history"
            )));
        }

        Ok(self.coeffs)
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

impl<E: EquationOfState> MolarProperties for SupercriticalEnthalpy<E> {
    /// Passes the temperature through unchanged.
    ///
    /// This model applies no range clamp: `limit` exists for interface
    /// symmetry, not as a limiter, and narrowing it to the band would
    /// change downstream results.
    fn limit(&self, temperature: ThermodynamicTemperature) -> ThermodynamicTemperature {
        temperature
    }

    /// Computes `cp(T) = blend(T) + spike(T)`.
    fn cp(
        &self,
        _pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<MolarHeatCapacity, PropertyError> {
        let coeffs = self.checked_coeffs("cp")?;
        let t = temperature.get::<kelvin>();
        let cp = Self::finite(coeffs.cp_value(t), "cp")?;

        Ok(MolarHeatCapacity::new::<joule_per_kelvin_mole>(cp))
    }

    /// Computes the exact integral of `cp` from 0 K to `T`.
    fn absolute_enthalpy(
        &self,
        _pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<MolarEnthalpy, PropertyError> {
        let coeffs = self.checked_coeffs("absolute enthalpy")?;
        let t = temperature.get::<kelvin>();
        let h = Self::finite(coeffs.enthalpy_value(t), "absolute enthalpy")?;

        Ok(MolarEnthalpy::new::<joule_per_mole>(h))
    }

    /// Sensible and absolute enthalpy coincide for this correlation; no
    /// chemical reference is subtracted.
    fn sensible_enthalpy(
        &self,
        pressure: Pressure,
        temperature: ThermodynamicTemperature,
    ) -> Result<MolarEnthalpy, PropertyError> {
        self.absolute_enthalpy(pressure, temperature)
    }

    /// The chemical contribution is always zero.
    fn chemical_enthalpy(&self) -> MolarEnthalpy {
        MolarEnthalpy::ZERO
    }

    /// Entropy is not modeled by this correlation.
    fn entropy(
        &self,
        _pressure: Pressure,
        _temperature: ThermodynamicTemperature,
    ) -> Result<MolarEntropy, PropertyError> {
        Err(PropertyError::NotImplemented {
            property: "entropy",
            context: Some(format!("{} has no entropy correlation", Self::model_name())),
        })
    }
}

impl<E: EquationOfState> AddAssign for SupercriticalEnthalpy<E> {
    /// Combines `other` into `self` by mole-weighted averaging.
    ///
    /// The base states combine first; the coefficient weights are the
    /// operands' mole fractions of the combined amount.
    fn add_assign(&mut self, other: Self) {
        let amount_before = self.base.amount().get::<mole>();
        let amount_other = other.base.amount().get::<mole>();

        self.base += other.base;

        let total = self.base.amount().get::<mole>();
        self.coeffs = SupercriticalCoeffs::weighted(
            amount_before / total,
            &self.coeffs,
            amount_other / total,
            &other.coeffs,
        );
    }
}

impl<E: EquationOfState> SubAssign for SupercriticalEnthalpy<E> {
    /// Removes `other` from `self`, the subtractive form of `+=` with the
    /// same weight sequencing.
    fn sub_assign(&mut self, other: Self) {
        let amount_before = self.base.amount().get::<mole>();
        let amount_other = other.base.amount().get::<mole>();

        self.base -= other.base;

        let total = self.base.amount().get::<mole>();
        self.coeffs = SupercriticalCoeffs::weighted(
            amount_before / total,
            &self.coeffs,
            -(amount_other / total),
            &other.coeffs,
        );
    }
}

impl<E: EquationOfState> Add for SupercriticalEnthalpy<E> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        let amount_1 = self.base.amount().get::<mole>();
        let amount_2 = other.base.amount().get::<mole>();

        let base = self.base + other.base;
        let total = base.amount().get::<mole>();
        let coeffs = SupercriticalCoeffs::weighted(
            amount_1 / total,
            &self.coeffs,
            amount_2 / total,
            &other.coeffs,
        );

        Self { base, coeffs }
    }
}

impl<E: EquationOfState> Sub for SupercriticalEnthalpy<E> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        let amount_1 = self.base.amount().get::<mole>();
        let amount_2 = other.base.amount().get::<mole>();

        let base = self.base - other.base;
        let total = base.amount().get::<mole>();
        let coeffs = SupercriticalCoeffs::weighted(
            amount_1 / total,
            &self.coeffs,
            -(amount_2 / total),
            &other.coeffs,
        );

        Self { base, coeffs }
    }
}

impl<E: EquationOfState> Mul<f64> for SupercriticalEnthalpy<E> {
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

impl<E: EquationOfState> Mul<SupercriticalEnthalpy<E>> for f64 {
    type Output = SupercriticalEnthalpy<E>;

    fn mul(self, model: SupercriticalEnthalpy<E>) -> SupercriticalEnthalpy<E> {
        model * self
    }
}

impl<E: EquationOfState> fmt::Display for SupercriticalEnthalpy<E> {
    /// Writes the six coefficients in the fixed order `cp_liquid cp_gas
    /// blend_steepness spike_height spike_width band_width`, followed by
    /// the base state's own form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {} {}",
            self.coeffs.cp_liquid,
            self.coeffs.cp_gas,
            self.coeffs.blend_steepness,
            self.coeffs.spike_height,
            self.coeffs.spike_width,
            self.coeffs.band_width,
            self.base,
        )
    }
}

impl<E> FromStr for SupercriticalEnthalpy<E>
where
    E: EquationOfState,
    <E as FromStr>::Err: fmt::Display,
{
    type Err = ParseModelError;

    /// Parses the layout produced by [`Display`]: six whitespace-separated
    /// coefficients followed by the base state.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();

        let cp_liquid = parse_coeff(&mut fields, "cp_liquid")?;
        let cp_gas = parse_coeff(&mut fields, "cp_gas")?;
        let blend_steepness = parse_coeff(&mut fields, "blend_steepness")?;
        let spike_height = parse_coeff(&mut fields, "spike_height")?;
        let spike_width = parse_coeff(&mut fields, "spike_width")?;
        let band_width = parse_coeff(&mut fields, "band_width")?;

        let rest = fields.collect::<Vec<_>>().join(" ");
        let base = rest
            .parse::<E>()
            .map_err(|e| ParseModelError::InvalidBase(e.to_string()))?;

        Ok(Self::new(
            base,
            SupercriticalCoeffs {
                cp_liquid,
                cp_gas,
                blend_steepness,
                spike_height,
                spike_width,
                band_width,
            },
        )?)
    }
}


#[cfg(test)]
mod proptests {
    use approx::relative_eq;
    use proptest::prelude::*;
    use transcrit_specie::{PerfectGas, Specie};
    use uom::si::{
        f64::{AmountOfSubstance, MolarMass},
        molar_mass::gram_per_mole,
        pressure::pascal,
    };

    use super::*;

    fn base(amount: f64) -> PerfectGas {
        PerfectGas::new(Specie::new(
            "CO2",
            AmountOfSubstance::new::<mole>(amount),
            MolarMass::new::<gram_per_mole>(44.01),
        ))
    }

    fn coeffs_strategy() -> impl Strategy<Value = SupercriticalCoeffs> {
        (
            1.0e3..1.0e5_f64,
            1.0e3..1.0e5_f64,
            0.01..5.0_f64,
            0.0..1.0e6_f64,
            0.0..10.0_f64,
            0.5..100.0_f64,
        )
            .prop_map(
                |(cp_liquid, cp_gas, blend_steepness, spike_height, spike_width, band_width)| {
                    SupercriticalCoeffs {
                        cp_liquid,
                        cp_gas,
                        blend_steepness,
                        spike_height,
                        spike_width,
                        band_width,
                    }
                },
            )
    }

    proptest! {
        #[test]
        fn enthalpy_derivative_matches_cp(coeffs in coeffs_strategy(), t in -50.0..50.0_f64) {
            let model = SupercriticalEnthalpy::new(base(1.0), coeffs).unwrap();
            let p = Pressure::new::<pascal>(101_325.0);
            let dt = 1e-5;

            let above = model
                .absolute_enthalpy(p, ThermodynamicTemperature::new::<kelvin>(t + dt))
                .unwrap();
            let below = model
                .absolute_enthalpy(p, ThermodynamicTemperature::new::<kelvin>(t - dt))
                .unwrap();
            let slope = (above - below).get::<joule_per_mole>() / (2.0 * dt);

            let cp = model
                .cp(p, ThermodynamicTemperature::new::<kelvin>(t))
                .unwrap()
                .get::<joule_per_kelvin_mole>();

            prop_assert!(relative_eq!(slope, cp, max_relative = 1e-4));
        }

        #[test]
        fn mixing_stays_within_component_ranges(
            a in coeffs_strategy(),
            b in coeffs_strategy(),
            amount_a in 0.1..10.0_f64,
            amount_b in 0.1..10.0_f64,
        ) {
            let mixed = (SupercriticalEnthalpy::new(base(amount_a), a).unwrap()
                + SupercriticalEnthalpy::new(base(amount_b), b).unwrap())
                .coeffs();

            for (value, lo, hi) in [
                (mixed.cp_liquid, a.cp_liquid, b.cp_liquid),
                (mixed.cp_gas, a.cp_gas, b.cp_gas),
                (mixed.blend_steepness, a.blend_steepness, b.blend_steepness),
                (mixed.spike_height, a.spike_height, b.spike_height),
                (mixed.spike_width, a.spike_width, b.spike_width),
                (mixed.band_width, a.band_width, b.band_width),
            ] {
                let (min, max) = (lo.min(hi), lo.max(hi));
                let slack = 1e-12 * max.abs();
                prop_assert!(value >= min - slack && value <= max + slack);
            }
        }

        #[test]
        fn scaling_never_changes_cp(
            coeffs in coeffs_strategy(),
            scale in 0.01..100.0_f64,
            t in -50.0..50.0_f64,
        ) {
            let model = SupercriticalEnthalpy::new(base(1.0), coeffs).unwrap();
            let scaled = scale * model.clone();
            let p = Pressure::new::<pascal>(101_325.0);
            let temperature = ThermodynamicTemperature::new::<kelvin>(t);

            prop_assert_eq!(
                scaled.cp(p, temperature).unwrap(),
                model.cp(p, temperature).unwrap()
            );
        }

        #[test]
        fn text_round_trip_is_exact(coeffs in coeffs_strategy(), amount in 0.1..10.0_f64) {
            let model = SupercriticalEnthalpy::new(base(amount), coeffs).unwrap();
            let parsed: SupercriticalEnthalpy<PerfectGas> = model.to_string().parse().unwrap();

            prop_assert_eq!(parsed, model);
        }
    }
}
