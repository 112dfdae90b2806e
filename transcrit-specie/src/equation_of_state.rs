use std::{
    fmt::{Debug, Display},
    ops::{Add, AddAssign, Mul, Sub, SubAssign},
    str::FromStr,
};

use uom::si::f64::AmountOfSubstance;

/// Capability contract for equation-of-state base types.
///
/// Property models decorate a base state by value: they embed a copy of the
/// base, forward its combination arithmetic, and extend it with their own
/// correlation parameters. This trait lists what such a base must provide:
/// an amount of substance for mole-fraction weighting, additive and
/// scalar-multiplicative composition operators, a text form that round-trips
/// through [`FromStr`], and a diagnostic type name.
///
/// The combination operators are infallible; a degenerate combination (for
/// example a zero total amount) surfaces later as a non-finite property
/// value, which the property models report as a calculation error.
pub trait EquationOfState:
    Clone
    + Debug
    + Display
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + AddAssign
    + SubAssign
    + Mul<f64, Output = Self>
    + FromStr
{
    /// Returns the amount of substance this state represents.
    fn amount(&self) -> AmountOfSubstance;

    /// Returns a short identifier for the concrete state type.
    ///
    /// Used in diagnostics and error context only; no registry or dispatch
    /// hangs off this name.
    fn type_name() -> &'static str;

    /// Returns a copy of this state under a new name.
    ///
    /// Names are single whitespace-free tokens; the text form separates
    /// fields with whitespace and would mis-tokenize anything longer.
    #[must_use]
    fn renamed(&self, name: &str) -> Self;
}
