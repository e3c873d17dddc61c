use std::fmt;

use crate::error::IlpError;

/// Outcome classification reported by a solver.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// An optimal solution was found
    Optimal,
    /// A feasible solution was found, optimality not proven
    Feasible,
    /// The problem has no feasible solution
    Infeasible,
    /// The objective is unbounded
    Unbounded,
    /// Not solved, or solved and then modified
    #[default]
    Unknown,
}

impl Status {
    /// Whether primal values can be read.
    pub fn has_solution(self) -> bool {
        matches!(self, Status::Optimal | Status::Feasible)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Optimal => "OPTIMAL",
            Status::Feasible => "FEASIBLE",
            Status::Infeasible => "INFEASIBLE",
            Status::Unbounded => "UNBOUNDED",
            Status::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// Values a solver hands back to the problem it solved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionValues {
    /// Objective value
    pub objective: f64,
    /// Primal value of each column, in column order
    pub columns: Vec<f64>,
    /// Reduced cost of each column, when the solver computes them
    pub column_duals: Option<Vec<f64>>,
    /// Shadow price of each row, when the solver computes them
    pub row_duals: Option<Vec<f64>>,
}

impl SolutionValues {
    pub fn new(objective: f64, columns: Vec<f64>) -> Self {
        Self {
            objective,
            columns,
            column_duals: None,
            row_duals: None,
        }
    }

    pub fn with_duals(mut self, column_duals: Vec<f64>, row_duals: Vec<f64>) -> Self {
        self.column_duals = Some(column_duals);
        self.row_duals = Some(row_duals);
        self
    }

    pub(crate) fn validate(&self, columns: usize, rows: usize) -> Result<(), IlpError> {
        if self.columns.len() != columns {
            return Err(IlpError::invalid(format!(
                "expected {} column values, got {}",
                columns,
                self.columns.len()
            )));
        }
        if let Some(duals) = &self.column_duals {
            if duals.len() != columns {
                return Err(IlpError::invalid(format!(
                    "expected {} column duals, got {}",
                    columns,
                    duals.len()
                )));
            }
        }
        if let Some(duals) = &self.row_duals {
            if duals.len() != rows {
                return Err(IlpError::invalid(format!(
                    "expected {} row duals, got {}",
                    rows,
                    duals.len()
                )));
            }
        }
        Ok(())
    }

    /// Drop the entries of a disposed column so later columns keep their values.
    pub(crate) fn remove_column(&mut self, index: usize) {
        if index < self.columns.len() {
            self.columns.remove(index);
        }
        if let Some(duals) = self.column_duals.as_mut().filter(|d| index < d.len()) {
            duals.remove(index);
        }
    }

    pub(crate) fn remove_row(&mut self, index: usize) {
        if let Some(duals) = self.row_duals.as_mut().filter(|d| index < d.len()) {
            duals.remove(index);
        }
    }
}

/// Every `f64` at or above this magnitude is already integral.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Round to `scale` decimal digits, half to even.
///
/// Scales finer than `f64` precision leave the value untouched.
pub(crate) fn round_to_scale(value: f64, scale: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(scale).unwrap_or(i32::MAX));
    let scaled = value * factor;
    if !scaled.is_finite() || scaled.abs() >= EXACT_INTEGER_LIMIT {
        return value;
    }
    scaled.round_ties_even() / factor
}
