use std::{
    fmt,
    num::ParseFloatError,
    ops::{Add, AddAssign, Mul, Sub, SubAssign},
    str::FromStr,
};

use thiserror::Error;
use uom::si::{
    amount_of_substance::mole,
    f64::{AmountOfSubstance, MolarMass},
    molar_heat_capacity::joule_per_kelvin_mole,
    molar_mass::kilogram_per_mole,
};

use crate::units::MolarGasConstant;

/// Floor applied to amount totals used as mole-weighting denominators.
const SMALL: f64 = 1e-15;

/// Returns the molar gas constant, 8.314462618 J/(mol·K).
#[must_use]
pub fn universal_gas_constant() -> MolarGasConstant {
    MolarGasConstant::new::<joule_per_kelvin_mole>(8.314_462_618)
}

/// A named quantity of substance with an associated molar weight.
///
/// `Specie` is the bookkeeping layer beneath every equation-of-state base
/// type: it records how much substance a state represents and the molar
/// weight of that substance, and it defines the mole-weighted arithmetic
/// used when states are combined.
///
/// # Example
///
/// ```
/// use transcrit_specie::Specie;
/// use uom::si::{
///     amount_of_substance::mole,
///     f64::{AmountOfSubstance, MolarMass},
///     molar_mass::gram_per_mole,
/// };
///
/// let co2 = Specie::new(
///     "CO2",
///     AmountOfSubstance::new::<mole>(1.0),
///     MolarMass::new::<gram_per_mole>(44.01),
/// );
/// assert_eq!(co2.name(), "CO2");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Specie {
    name: String,
    amount: AmountOfSubstance,
    molar_weight: MolarMass,
}

impl Specie {
    /// Creates a specie with the given name, amount, and molar weight.
    ///
    /// The name is a single whitespace-free token: the text form written
    /// by [`Display`](fmt::Display) separates fields with whitespace, so a
    /// name containing whitespace does not survive the [`FromStr`] round
    /// trip.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        amount: AmountOfSubstance,
        molar_weight: MolarMass,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            molar_weight,
        }
    }

    /// Returns a copy of this specie under a new name.
    ///
    /// The name follows the same single-token constraint as [`new`](Self::new).
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns the name of this specie.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the amount of substance this specie represents.
    pub fn amount(&self) -> AmountOfSubstance {
        self.amount
    }

    /// Returns the molar weight.
    pub fn molar_weight(&self) -> MolarMass {
        self.molar_weight
    }
}

impl AddAssign for Specie {
    /// Combines `other` into `self`, summing amounts and mole-weighting the
    /// molar weight by the combined amount. The combined specie keeps the
    /// receiver's name.
    fn add_assign(&mut self, other: Self) {
        let total = (self.amount + other.amount).get::<mole>().max(SMALL);
        let w1 = self.amount.get::<mole>() / total;
        let w2 = other.amount.get::<mole>() / total;

        self.molar_weight = w1 * self.molar_weight + w2 * other.molar_weight;
        self.amount += other.amount;
    }
}

impl SubAssign for Specie {
    /// Removes `other` from `self`, the subtractive form of `+=`. The amount
    /// difference used to weight the molar weight is floored at the same
    /// magnitude as the mole-weighting denominator in `+=`.
    fn sub_assign(&mut self, other: Self) {
        let mut diff = (self.amount - other.amount).get::<mole>();
        if diff.abs() < SMALL {
            diff = SMALL;
        }
        let w1 = self.amount.get::<mole>() / diff;
        let w2 = other.amount.get::<mole>() / diff;

        self.molar_weight = w1 * self.molar_weight - w2 * other.molar_weight;
        self.amount -= other.amount;
    }
}

impl Add for Specie {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl Sub for Specie {
    type Output = Self;

    fn sub(mut self, other: Self) -> Self {
        self -= other;
        self
    }
}

impl Mul<f64> for Specie {
    type Output = Self;

    /// Scales the amount of substance; the molar weight is intensive and
    /// copies unchanged.
    fn mul(self, scale: f64) -> Self {
        Self {
            amount: scale * self.amount,
            ..self
        }
    }
}

impl Mul<Specie> for f64 {
    type Output = Specie;

    fn mul(self, specie: Specie) -> Specie {
        specie * self
    }
}

impl fmt::Display for Specie {
    /// Writes `name amount molar_weight` with the numbers in SI base units
    /// (mol and kg/mol), the layout [`FromStr`] parses back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.name,
            self.amount.get::<mole>(),
            self.molar_weight.get::<kilogram_per_mole>(),
        )
    }
}

/// An error produced when parsing a [`Specie`] from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseSpecieError {
    /// The input ended before all fields were read.
    #[error("missing `{0}` field")]
    MissingField(&'static str),

    /// A numeric field failed to parse.
    #[error("invalid `{field}` value: {source}")]
    InvalidNumber {
        field: &'static str,
        source: ParseFloatError,
    },
}

impl FromStr for Specie {
    type Err = ParseSpecieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();

        let name = fields
            .next()
            .ok_or(ParseSpecieError::MissingField("name"))?;
        let amount = parse_field(&mut fields, "amount")?;
        let molar_weight = parse_field(&mut fields, "molar_weight")?;

        Ok(Self {
            name: name.to_owned(),
            amount: AmountOfSubstance::new::<mole>(amount),
            molar_weight: MolarMass::new::<kilogram_per_mole>(molar_weight),
        })
    }
}

fn parse_field<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<f64, ParseSpecieError> {
    let raw = fields.next().ok_or(ParseSpecieError::MissingField(field))?;

    raw.parse()
        .map_err(|source| ParseSpecieError::InvalidNumber { field, source })
}
