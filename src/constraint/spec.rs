//! Normalized parameter values.

use std::fmt;

/// One constraint on a parameter's values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintTerm {
    /// Value must be offered
    Equals(String),
    /// Some offered value must lie in `[low, high]`
    InRange { low: f64, high: f64 },
    /// Value must not be offered
    NotEquals(String),
    /// No offered value may lie in `[low, high]`
    NotInRange { low: f64, high: f64 },
}

impl ConstraintTerm {
    /// Check if this is a negated term.
    pub fn is_negated(&self) -> bool {
        matches!(self, Self::NotEquals(_) | Self::NotInRange { .. })
    }
}

impl fmt::Display for ConstraintTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(v) => write!(f, "={}", v),
            Self::InRange { low, high } => write!(f, "={}..{}", low, high),
            Self::NotEquals(v) => write!(f, "~{}", v),
            Self::NotInRange { low, high } => write!(f, "~{}..{}", low, high),
        }
    }
}

/// Candidate values and constraint terms for one parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueConstraintSpec {
    /// Raw candidate values, in declaration order
    pub values: Vec<String>,
    /// Constraint terms, in declaration order
    pub constraints: Vec<ConstraintTerm>,
}

impl ValueConstraintSpec {
    /// Create a spec holding plain values only.
    pub fn from_values<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            constraints: Vec::new(),
        }
    }

    /// Check if the spec has neither values nor constraints.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.constraints.is_empty()
    }

    /// Append another spec's values and constraints to this one.
    pub fn merge(&mut self, other: &ValueConstraintSpec) {
        self.values.extend(other.values.iter().cloned());
        self.constraints.extend(other.constraints.iter().cloned());
    }
}

impl fmt::Display for ValueConstraintSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for value in &self.values {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", value)?;
            first = false;
        }
        for term in &self.constraints {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", term)?;
            first = false;
        }
        Ok(())
    }
}
