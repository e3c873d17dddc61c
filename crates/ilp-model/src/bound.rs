use std::fmt;

use crate::backend::Backend;
use crate::entity::Entity;
use crate::error::IlpError;
use crate::problem::LinearProblem;

/// A lower/upper bound pair. `None` stands for an infinite bound.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bound {
    lower: Option<f64>,
    upper: Option<f64>,
}

impl Bound {
    /// The unbounded pair `(-inf, +inf)`.
    pub const FREE: Bound = Bound {
        lower: None,
        upper: None,
    };

    /// Bounds of a binary variable.
    pub const BINARY: Bound = Bound {
        lower: Some(0.0),
        upper: Some(1.0),
    };

    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Self {
        Self { lower, upper }
    }

    pub fn fixed(value: f64) -> Self {
        Self::new(Some(value), Some(value))
    }

    /// Capture the current bounds of a variable or constraint.
    pub fn capture<B: Backend, E: Entity>(lp: &LinearProblem<B>, entity: E) -> Result<Self, IlpError> {
        lp.bound(entity)
    }

    /// Re-apply this pair to a variable or constraint.
    pub fn restore<B: Backend, E: Entity>(&self, lp: &mut LinearProblem<B>, entity: E) -> Result<(), IlpError> {
        lp.set_bound(entity, *self)
    }

    pub fn lower(&self) -> Option<f64> {
        self.lower
    }

    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    pub fn with_lower(self, lower: Option<f64>) -> Self {
        Self { lower, ..self }
    }

    pub fn with_upper(self, upper: Option<f64>) -> Self {
        Self { upper, ..self }
    }

    /// Both bounds are finite and equal.
    pub fn is_fixed(&self) -> bool {
        matches!((self.lower, self.upper), (Some(l), Some(u)) if l == u)
    }

    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        self.lower.is_none_or(|l| l - tolerance <= value)
            && self.upper.is_none_or(|u| value <= u + tolerance)
    }

    pub(crate) fn validate(&self) -> Result<(), IlpError> {
        if self.lower.is_some_and(f64::is_nan) || self.upper.is_some_and(f64::is_nan) {
            return Err(IlpError::invalid("bound is NaN"));
        }
        Ok(())
    }
}

struct OptionalBound(Option<f64>);

impl fmt::Display for OptionalBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{}", v),
            None => f.write_str("null"),
        }
    }
}

pub(crate) fn display_bound(value: Option<f64>) -> impl fmt::Display {
    OptionalBound(value)
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bound:[{}..{}]",
            display_bound(self.lower),
            display_bound(self.upper)
        )
    }
}
