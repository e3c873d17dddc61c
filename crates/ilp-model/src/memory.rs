use crate::backend::{Backend, ColumnKind, RowEntries};
use crate::bound::Bound;
use crate::problem::Direction;

#[derive(Debug, Clone)]
struct Column {
    name: String,
    bound: Bound,
    kind: ColumnKind,
    objective: f64,
}

#[derive(Debug, Clone)]
struct Row {
    name: String,
    bound: Bound,
    entries: Vec<(usize, f64)>,
}

/// Plain in-process column/row storage.
///
/// Used as the default backend of [`LinearProblem::new`](crate::LinearProblem::new)
/// and by solvers that read the whole model before handing it to a native library.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    columns: Vec<Column>,
    rows: Vec<Row>,
    direction: Direction,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn normalize(entries: &RowEntries) -> Vec<(usize, f64)> {
    entries.iter().copied().filter(|&(_, coef)| coef != 0.0).collect()
}

impl Backend for MemoryBackend {
    fn add_column(&mut self, name: &str) -> usize {
        self.columns.push(Column {
            name: name.to_string(),
            bound: Bound::FREE,
            kind: ColumnKind::Continuous,
            objective: 0.0,
        });
        self.columns.len() - 1
    }

    fn add_row(&mut self, name: &str, entries: &RowEntries, bound: Bound) -> usize {
        self.rows.push(Row {
            name: name.to_string(),
            bound,
            entries: normalize(entries),
        });
        self.rows.len() - 1
    }

    fn delete_columns(&mut self, columns: &[usize]) {
        let mut sorted = columns.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        // Highest first so lower indices stay valid while removing.
        for &column in sorted.iter().rev() {
            self.columns.remove(column);
            for row in &mut self.rows {
                row.entries.retain(|&(c, _)| c != column);
                for entry in &mut row.entries {
                    if entry.0 > column {
                        entry.0 -= 1;
                    }
                }
            }
        }
    }

    fn delete_rows(&mut self, rows: &[usize]) {
        let mut sorted = rows.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &row in sorted.iter().rev() {
            self.rows.remove(row);
        }
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_name(&self, column: usize) -> &str {
        &self.columns[column].name
    }

    fn row_name(&self, row: usize) -> &str {
        &self.rows[row].name
    }

    fn column_bounds(&self, column: usize) -> Bound {
        self.columns[column].bound
    }

    fn set_column_bounds(&mut self, column: usize, bound: Bound) {
        self.columns[column].bound = bound;
    }

    fn row_bounds(&self, row: usize) -> Bound {
        self.rows[row].bound
    }

    fn set_row_bounds(&mut self, row: usize, bound: Bound) {
        self.rows[row].bound = bound;
    }

    fn column_kind(&self, column: usize) -> ColumnKind {
        self.columns[column].kind
    }

    fn set_column_kind(&mut self, column: usize, kind: ColumnKind) {
        self.columns[column].kind = kind;
    }

    fn objective_coefficients(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.objective).collect()
    }

    fn set_objective_coefficients(&mut self, coefficients: &[f64]) {
        for (column, &coef) in self.columns.iter_mut().zip(coefficients) {
            column.objective = coef;
        }
    }

    fn objective_direction(&self) -> Direction {
        self.direction
    }

    fn set_objective_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    fn matrix_row(&self, row: usize) -> Vec<(usize, f64)> {
        self.rows[row].entries.clone()
    }

    fn set_matrix_row(&mut self, row: usize, entries: &RowEntries) {
        self.rows[row].entries = normalize(entries);
    }
}
