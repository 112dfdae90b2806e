use std::num::ParseFloatError;

use thiserror::Error;

/// Errors that may occur when evaluating thermodynamic properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The property is not supported by this model.
    ///
    /// Indicates that the model does not implement the property at all,
    /// regardless of the state. For example, entropy for a correlation
    /// fitted to heat capacity alone.
    #[error("property `{property}` is not implemented by this model")]
    NotImplemented {
        property: &'static str,
        context: Option<String>,
    },

    /// The input values are invalid or inconsistent.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The calculation produced an invalid result.
    ///
    /// For example, a non-finite value from degenerate mixing weights.
    #[error("calculation error: {0}")]
    Calculation(String),
}

/// An error produced when parsing a property model from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseModelError {
    /// The input ended before all coefficients were read.
    #[error("missing `{0}` coefficient")]
    MissingCoefficient(&'static str),

    /// A coefficient failed to parse as a number.
    #[error("invalid `{field}` coefficient: {source}")]
    InvalidCoefficient {
        field: &'static str,
        source: ParseFloatError,
    },

    /// The base state portion of the input failed to parse.
    #[error("invalid base state: {0}")]
    InvalidBase(String),

    /// The parsed coefficients fail model validation.
    #[error(transparent)]
    Invalid(#[from] PropertyError),
}
