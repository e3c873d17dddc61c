//! Column/row storage contract of a native solver library.
//!
//! A backend stores one column per variable and one row per constraint,
//! addressed by dense zero-based indices. `LinearProblem` owns the mapping
//! from handles to those indices and keeps it gap-free; a backend only has
//! to honour the positional contract below.

use crate::bound::Bound;
use crate::problem::Direction;

/// Integrality of a backend column.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    #[default]
    Continuous,
    Integer,
}

/// A sparse row: `(column index, coefficient)` pairs.
pub type RowEntries = [(usize, f64)];

pub trait Backend {
    /// Append a free continuous column with a zero objective coefficient.
    /// Returns the new index, which must equal the previous column count.
    fn add_column(&mut self, name: &str) -> usize;

    /// Append a row with its coefficients and bounds in a single call.
    /// Returns the new index, which must equal the previous row count.
    fn add_row(&mut self, name: &str, entries: &RowEntries, bound: Bound) -> usize;

    /// Delete columns. Coefficients of deleted columns disappear from every
    /// row and the objective; surviving columns shift down to stay dense.
    fn delete_columns(&mut self, columns: &[usize]);

    /// Delete rows; surviving rows shift down to stay dense.
    fn delete_rows(&mut self, rows: &[usize]);

    fn column_count(&self) -> usize;

    fn row_count(&self) -> usize;

    fn column_name(&self, column: usize) -> &str;

    fn row_name(&self, row: usize) -> &str;

    fn column_bounds(&self, column: usize) -> Bound;

    fn set_column_bounds(&mut self, column: usize, bound: Bound);

    fn row_bounds(&self, row: usize) -> Bound;

    fn set_row_bounds(&mut self, row: usize, bound: Bound);

    fn column_kind(&self, column: usize) -> ColumnKind;

    fn set_column_kind(&mut self, column: usize, kind: ColumnKind);

    /// One coefficient per column, in column order.
    fn objective_coefficients(&self) -> Vec<f64>;

    /// Replace the whole objective vector. `coefficients.len()` equals the column count.
    fn set_objective_coefficients(&mut self, coefficients: &[f64]);

    fn objective_direction(&self) -> Direction;

    fn set_objective_direction(&mut self, direction: Direction);

    /// Non-zero coefficients of a row.
    fn matrix_row(&self, row: usize) -> Vec<(usize, f64)>;

    fn set_matrix_row(&mut self, row: usize, entries: &RowEntries);
}
