use std::fmt;
use std::str::FromStr;

use crate::backend::{Backend, ColumnKind};
use crate::bound::{Bound, display_bound};
use crate::entity::{Constraint, Entity, ProblemId, VarType, Variable};
use crate::error::{EntityKind, IlpError};
use crate::linear::{Linear, Term};
use crate::memory::MemoryBackend;
use crate::solution::{SolutionValues, Status, round_to_scale};
use crate::table::EntityTable;

const MAX_NAME_LEN: usize = 255;

/// Decimal digits kept when reporting solution values.
pub const DEFAULT_VALUE_SCALE: u32 = 9;

/// Objective direction.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Minimize,
    Maximize,
}

impl FromStr for Direction {
    type Err = IlpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "min" | "minimize" => Ok(Direction::Minimize),
            "max" | "maximize" => Ok(Direction::Maximize),
            _ => Err(IlpError::invalid(format!("invalid objective direction: {}", s))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Minimize => f.write_str("MINIMIZE"),
            Direction::Maximize => f.write_str("MAXIMIZE"),
        }
    }
}

/// A linear (or mixed-integer) problem stored in a solver backend.
///
/// The problem owns every variable and constraint; [`Variable`] and
/// [`Constraint`] are plain handles into it. Any change to bounds, types,
/// rows or the objective resets the status to [`Status::Unknown`] and drops
/// the cached solution.
#[derive(Debug)]
pub struct LinearProblem<B: Backend = MemoryBackend> {
    id: ProblemId,
    backend: B,
    columns: EntityTable,
    rows: EntityTable,
    name: Option<String>,
    objective_name: Option<String>,
    status: Status,
    solution: Option<SolutionValues>,
    value_scale: u32,
}

impl LinearProblem<MemoryBackend> {
    pub fn new() -> Self {
        Self::with_backend(MemoryBackend::new())
    }
}

impl Default for LinearProblem<MemoryBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> LinearProblem<B> {
    /// Wrap an empty backend.
    ///
    /// # Panics
    ///
    /// Panics if the backend already holds columns or rows.
    pub fn with_backend(backend: B) -> Self {
        assert!(
            backend.column_count() == 0 && backend.row_count() == 0,
            "backend must be empty, found {} columns and {} rows",
            backend.column_count(),
            backend.row_count()
        );
        Self {
            id: ProblemId::next(),
            backend,
            columns: EntityTable::new(),
            rows: EntityTable::new(),
            name: None,
            objective_name: None,
            status: Status::Unknown,
            solution: None,
            value_scale: DEFAULT_VALUE_SCALE,
        }
    }

    /// Number of decimal digits kept by [`value`](Self::value) and
    /// [`objective_value`](Self::objective_value). Scales beyond `f64`
    /// precision report values unrounded.
    pub fn with_value_scale(mut self, digits: u32) -> Self {
        self.value_scale = digits;
        self
    }

    pub fn id(&self) -> ProblemId {
        self.id
    }

    /// Read access to the underlying column/row storage.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Release the backend. Handles of this problem become meaningless.
    pub fn dispose(self) {
        tracing::debug!(
            component = "problem",
            operation = "dispose",
            status = "success",
            variables = self.columns.len(),
            constraints = self.rows.len(),
            "Disposed linear problem"
        );
    }

    fn table(&self, kind: EntityKind) -> &EntityTable {
        match kind {
            EntityKind::Variable => &self.columns,
            EntityKind::Constraint => &self.rows,
        }
    }

    fn check_owner<E: Entity>(&self, entity: E) -> Result<(), IlpError> {
        if entity.problem() != self.id {
            return Err(IlpError::invalid(format!(
                "{} handle belongs to another problem",
                E::KIND
            )));
        }
        Ok(())
    }

    /// Current backend index of a live entity.
    pub fn index_of<E: Entity>(&self, entity: E) -> Result<usize, IlpError> {
        self.check_owner(entity)?;
        self.table(E::KIND)
            .index_of(entity.key())
            .ok_or(IlpError::ResourceDisposed)
    }

    /// True once the entity was disposed. Handles of another problem are
    /// never live here.
    pub fn is_disposed<E: Entity>(&self, entity: E) -> bool {
        entity.problem() != self.id || !self.table(E::KIND).contains(entity.key())
    }

    pub(crate) fn check_name(&self, kind: EntityKind, name: &str) -> Result<(), IlpError> {
        if !self.table(kind).is_name_available(name) {
            return Err(IlpError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
        check_name_length(name)
    }

    /// Resolve every term to its column. Disposed or foreign variables are rejected.
    fn resolve(&self, linear: &Linear) -> Result<Vec<(usize, f64)>, IlpError> {
        linear
            .iter()
            .map(|term| {
                if term.coefficient.is_nan() {
                    return Err(IlpError::invalid("coefficient is NaN"));
                }
                match self.index_of(term.variable) {
                    Ok(column) => Ok((column, term.coefficient)),
                    Err(IlpError::ResourceDisposed) => {
                        Err(IlpError::invalid("linear references a disposed variable"))
                    }
                    Err(e) => Err(e),
                }
            })
            .collect()
    }

    fn variable_at_column(&self, column: usize) -> Variable {
        match self.columns.key_at(column) {
            Some(key) => Variable::new(self.id, key),
            None => panic!("backend column {} has no variable", column),
        }
    }

    fn invalidate(&mut self) {
        if self.status != Status::Unknown || self.solution.is_some() {
            tracing::trace!(
                component = "problem",
                operation = "invalidate",
                previous = %self.status,
                "Dropped cached solution"
            );
        }
        self.status = Status::Unknown;
        self.solution = None;
    }

    /// Create a variable. Integer and real variables start free,
    /// binary variables start at `[0, 1]`.
    pub fn add_variable(&mut self, name: &str, var_type: VarType) -> Result<Variable, IlpError> {
        self.check_name(EntityKind::Variable, name)?;
        let column = self.backend.add_column(name);
        let key = self.columns.insert(name, column);
        self.apply_type(column, var_type);
        self.invalidate();
        tracing::debug!(
            component = "problem",
            operation = "add_variable",
            status = "success",
            entity = name,
            column,
            var_type = %var_type,
            "Added variable"
        );
        Ok(Variable::new(self.id, key))
    }

    pub fn add_binary_variable(&mut self, name: &str) -> Result<Variable, IlpError> {
        self.add_variable(name, VarType::Bool)
    }

    pub fn add_integer_variable(
        &mut self,
        name: &str,
        lower: Option<f64>,
        upper: Option<f64>,
    ) -> Result<Variable, IlpError> {
        let bound = Bound::new(lower, upper);
        bound.validate()?;
        let variable = self.add_variable(name, VarType::Integer)?;
        let column = self.index_of(variable)?;
        self.backend.set_column_bounds(column, bound);
        Ok(variable)
    }

    pub fn variables(&self) -> impl ExactSizeIterator<Item = Variable> + '_ {
        self.columns.keys().map(|key| Variable::new(self.id, key))
    }

    pub fn variable_count(&self) -> usize {
        self.columns.len()
    }

    /// The variable currently stored at `column`.
    pub fn variable_at(&self, column: usize) -> Option<Variable> {
        self.columns.key_at(column).map(|key| Variable::new(self.id, key))
    }

    /// Remove a variable and its column. Disposing twice is a no-op.
    ///
    /// Terms over the variable disappear from every row and from the
    /// objective. A cached solution stays readable for the other variables.
    pub fn dispose_variable(&mut self, variable: Variable) -> Result<(), IlpError> {
        self.check_owner(variable)?;
        let Some(column) = self.columns.index_of(variable.key()) else {
            return Ok(());
        };
        self.backend.delete_columns(&[column]);
        self.columns.remove(variable.key());
        if let Some(solution) = self.solution.as_mut() {
            solution.remove_column(column);
        }
        tracing::debug!(
            component = "problem",
            operation = "dispose_variable",
            status = "success",
            column,
            remaining = self.columns.len(),
            "Disposed variable"
        );
        Ok(())
    }

    /// `Bool` is reported for integer columns bounded by exactly `[0, 1]`.
    pub fn variable_type(&self, variable: Variable) -> Result<VarType, IlpError> {
        let column = self.index_of(variable)?;
        Ok(match self.backend.column_kind(column) {
            ColumnKind::Continuous => VarType::Real,
            ColumnKind::Integer if self.backend.column_bounds(column) == Bound::BINARY => VarType::Bool,
            ColumnKind::Integer => VarType::Integer,
        })
    }

    pub fn set_variable_type(&mut self, variable: Variable, var_type: VarType) -> Result<(), IlpError> {
        let column = self.index_of(variable)?;
        self.apply_type(column, var_type);
        self.invalidate();
        Ok(())
    }

    fn apply_type(&mut self, column: usize, var_type: VarType) {
        match var_type {
            VarType::Bool => {
                self.backend.set_column_kind(column, ColumnKind::Integer);
                self.backend.set_column_bounds(column, Bound::BINARY);
            }
            VarType::Integer => self.backend.set_column_kind(column, ColumnKind::Integer),
            VarType::Real => self.backend.set_column_kind(column, ColumnKind::Continuous),
        }
    }

    /// True when no variable is real-valued.
    pub fn is_mip(&self) -> bool {
        (0..self.columns.len()).all(|c| self.backend.column_kind(c) == ColumnKind::Integer)
    }

    /// Create an empty, unbounded constraint.
    pub fn add_constraint(&mut self, name: &str) -> Result<Constraint, IlpError> {
        self.add_constraint_with(name, None, None, None)
    }

    /// Create a constraint with its row and bounds pushed to the backend in one call.
    pub fn add_constraint_with(
        &mut self,
        name: &str,
        linear: Option<&Linear>,
        lower: Option<f64>,
        upper: Option<f64>,
    ) -> Result<Constraint, IlpError> {
        self.check_name(EntityKind::Constraint, name)?;
        let entries = match linear {
            Some(linear) => self.resolve(linear)?,
            None => Vec::new(),
        };
        let bound = Bound::new(lower, upper);
        bound.validate()?;

        let row = self.backend.add_row(name, &entries, bound);
        let key = self.rows.insert(name, row);
        self.invalidate();
        tracing::debug!(
            component = "problem",
            operation = "add_constraint",
            status = "success",
            entity = name,
            row,
            terms = entries.len(),
            "Added constraint"
        );
        Ok(Constraint::new(self.id, key))
    }

    pub fn constraints(&self) -> impl ExactSizeIterator<Item = Constraint> + '_ {
        self.rows.keys().map(|key| Constraint::new(self.id, key))
    }

    pub fn constraint_count(&self) -> usize {
        self.rows.len()
    }

    pub fn constraint_at(&self, row: usize) -> Option<Constraint> {
        self.rows.key_at(row).map(|key| Constraint::new(self.id, key))
    }

    /// Remove a constraint and its row. Disposing twice is a no-op.
    pub fn dispose_constraint(&mut self, constraint: Constraint) -> Result<(), IlpError> {
        self.check_owner(constraint)?;
        let Some(row) = self.rows.index_of(constraint.key()) else {
            return Ok(());
        };
        self.backend.delete_rows(&[row]);
        self.rows.remove(constraint.key());
        if let Some(solution) = self.solution.as_mut() {
            solution.remove_row(row);
        }
        tracing::debug!(
            component = "problem",
            operation = "dispose_constraint",
            status = "success",
            row,
            remaining = self.rows.len(),
            "Disposed constraint"
        );
        Ok(())
    }

    /// The row as a linear expression, `None` when the row is empty.
    pub fn linear(&self, constraint: Constraint) -> Result<Option<Linear>, IlpError> {
        let row = self.index_of(constraint)?;
        let entries = self.backend.matrix_row(row);
        if entries.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            entries
                .into_iter()
                .map(|(column, coef)| Term::new(coef, self.variable_at_column(column)))
                .collect(),
        ))
    }

    /// Replace the row. `None` or an empty expression clears it.
    pub fn set_linear(
        &mut self,
        constraint: Constraint,
        linear: Option<&Linear>,
    ) -> Result<(), IlpError> {
        let row = self.index_of(constraint)?;
        let entries = match linear {
            Some(linear) => self.resolve(linear)?,
            None => Vec::new(),
        };
        self.backend.set_matrix_row(row, &entries);
        self.invalidate();
        Ok(())
    }

    /// True when the row has no coefficient.
    pub fn is_empty(&self, constraint: Constraint) -> Result<bool, IlpError> {
        let row = self.index_of(constraint)?;
        Ok(self.backend.matrix_row(row).is_empty())
    }

    pub fn name<E: Entity>(&self, entity: E) -> Result<&str, IlpError> {
        let index = self.index_of(entity)?;
        let name = match E::KIND {
            EntityKind::Variable => self.backend.column_name(index),
            EntityKind::Constraint => self.backend.row_name(index),
        };
        debug_assert_eq!(self.table(E::KIND).name_of(entity.key()), Some(name));
        Ok(name)
    }

    pub fn bound<E: Entity>(&self, entity: E) -> Result<Bound, IlpError> {
        let index = self.index_of(entity)?;
        Ok(match E::KIND {
            EntityKind::Variable => self.backend.column_bounds(index),
            EntityKind::Constraint => self.backend.row_bounds(index),
        })
    }

    pub fn lower_bound<E: Entity>(&self, entity: E) -> Result<Option<f64>, IlpError> {
        Ok(self.bound(entity)?.lower())
    }

    pub fn upper_bound<E: Entity>(&self, entity: E) -> Result<Option<f64>, IlpError> {
        Ok(self.bound(entity)?.upper())
    }

    /// Set both bounds at once.
    pub fn set_bound<E: Entity>(&mut self, entity: E, bound: Bound) -> Result<(), IlpError> {
        let index = self.index_of(entity)?;
        bound.validate()?;
        match E::KIND {
            EntityKind::Variable => self.backend.set_column_bounds(index, bound),
            EntityKind::Constraint => self.backend.set_row_bounds(index, bound),
        }
        self.invalidate();
        Ok(())
    }

    pub fn set_lower_bound<E: Entity>(&mut self, entity: E, lower: Option<f64>) -> Result<(), IlpError> {
        let bound = self.bound(entity)?.with_lower(lower);
        self.set_bound(entity, bound)
    }

    pub fn set_upper_bound<E: Entity>(&mut self, entity: E, upper: Option<f64>) -> Result<(), IlpError> {
        let bound = self.bound(entity)?.with_upper(upper);
        self.set_bound(entity, bound)
    }

    /// Replace every objective coefficient. Variables absent from `linear`
    /// get a zero coefficient; `None` or an empty expression clears the objective.
    pub fn set_objective_linear(&mut self, linear: Option<&Linear>) -> Result<(), IlpError> {
        let entries = match linear {
            Some(linear) => self.resolve(linear)?,
            None => Vec::new(),
        };
        let mut coefficients = vec![0.0; self.columns.len()];
        for (column, coef) in &entries {
            coefficients[*column] = *coef;
        }
        self.backend.set_objective_coefficients(&coefficients);
        self.invalidate();
        tracing::debug!(
            component = "problem",
            operation = "set_objective_linear",
            status = "success",
            terms = entries.len(),
            "Replaced objective"
        );
        Ok(())
    }

    /// Non-zero objective coefficients, `None` when there is none.
    pub fn objective_linear(&self) -> Option<Linear> {
        let linear: Linear = self
            .backend
            .objective_coefficients()
            .into_iter()
            .enumerate()
            .filter(|&(_, coef)| coef != 0.0)
            .map(|(column, coef)| Term::new(coef, self.variable_at_column(column)))
            .collect();
        if linear.is_empty() { None } else { Some(linear) }
    }

    pub fn objective_direction(&self) -> Direction {
        self.backend.objective_direction()
    }

    pub fn set_objective_direction(&mut self, direction: Direction) {
        self.backend.set_objective_direction(direction);
        self.invalidate();
    }

    pub fn objective_name(&self) -> Option<&str> {
        self.objective_name.as_deref()
    }

    pub fn set_objective_name(&mut self, name: Option<&str>) -> Result<(), IlpError> {
        if let Some(name) = name {
            check_name_length(name)?;
        }
        self.objective_name = name.map(str::to_string);
        Ok(())
    }

    pub fn name_of_problem(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_problem_name(&mut self, name: Option<&str>) -> Result<(), IlpError> {
        if let Some(name) = name {
            check_name_length(name)?;
        }
        self.name = name.map(str::to_string);
        Ok(())
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Store the outcome of a solve. Called by solver implementations.
    ///
    /// Values are required when `status` carries a solution and ignored otherwise.
    pub fn record_solution(&mut self, status: Status, values: Option<SolutionValues>) -> Result<(), IlpError> {
        let values = if status.has_solution() {
            let values = values.ok_or_else(|| {
                IlpError::invalid(format!("status {} requires solution values", status))
            })?;
            values.validate(self.columns.len(), self.rows.len())?;
            Some(values)
        } else {
            None
        };
        self.status = status;
        self.solution = values;
        tracing::debug!(
            component = "problem",
            operation = "record_solution",
            status = %status,
            "Recorded solve outcome"
        );
        Ok(())
    }

    fn solution(&self) -> Result<&SolutionValues, IlpError> {
        match &self.solution {
            Some(solution) if self.status.has_solution() => Ok(solution),
            _ => Err(IlpError::SolutionNotAvailable(format!("status is {}", self.status))),
        }
    }

    pub fn objective_value(&self) -> Result<f64, IlpError> {
        Ok(round_to_scale(self.solution()?.objective, self.value_scale))
    }

    /// Primal value of a variable, or the activity of a constraint row.
    pub fn value<E: Entity>(&self, entity: E) -> Result<f64, IlpError> {
        let index = self.index_of(entity)?;
        let solution = self.solution()?;
        let value = match E::KIND {
            EntityKind::Variable => solution.columns[index],
            EntityKind::Constraint => self
                .backend
                .matrix_row(index)
                .iter()
                .map(|&(column, coef)| coef * solution.columns[column])
                .sum(),
        };
        Ok(round_to_scale(value, self.value_scale))
    }

    /// Reduced cost of a variable or shadow price of a constraint.
    pub fn dual<E: Entity>(&self, entity: E) -> Result<f64, IlpError> {
        let index = self.index_of(entity)?;
        let solution = self.solution()?;
        let duals = match E::KIND {
            EntityKind::Variable => solution.column_duals.as_ref(),
            EntityKind::Constraint => solution.row_duals.as_ref(),
        };
        duals
            .map(|d| d[index])
            .ok_or_else(|| IlpError::SolutionNotAvailable("dual values not available".to_string()))
    }

    /// Expression text using variable names, e.g. `[17 * x + 12 * y]`.
    pub fn format_linear(&self, linear: &Linear) -> String {
        let terms: Vec<String> = linear
            .iter()
            .map(|term| {
                let name = self.name(term.variable).unwrap_or("<disposed>");
                format!("{} * {}", term.coefficient, name)
            })
            .collect();
        format!("[{}]", terms.join(" + "))
    }
}

pub(crate) fn check_name_length(name: &str) -> Result<(), IlpError> {
    if name.len() > MAX_NAME_LEN {
        return Err(IlpError::invalid(format!("name longer than {} bytes", MAX_NAME_LEN)));
    }
    Ok(())
}

impl<B: Backend> fmt::Display for LinearProblem<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Ok(objective) = self.objective_value() {
            if let Some(linear) = self.objective_linear() {
                writeln!(f, "{}", self.format_linear(&linear))?;
            }
            writeln!(f, "{}={}", self.objective_name().unwrap_or("obj"), objective)?;
            for variable in self.variables() {
                let name = self.name(variable).map_err(|_| fmt::Error)?;
                let value = self.value(variable).map_err(|_| fmt::Error)?;
                writeln!(f, "{}={}", name, value)?;
            }
            for constraint in self.constraints() {
                let name = self.name(constraint).map_err(|_| fmt::Error)?;
                let value = self.value(constraint).map_err(|_| fmt::Error)?;
                writeln!(f, "Constraint[{}]={}", name, value)?;
            }
        } else {
            for variable in self.variables() {
                let name = self.name(variable).map_err(|_| fmt::Error)?;
                let bound = self.bound(variable).map_err(|_| fmt::Error)?;
                writeln!(
                    f,
                    "{}:{{{}..{}}}",
                    name,
                    display_bound(bound.lower()),
                    display_bound(bound.upper())
                )?;
            }
            for constraint in self.constraints() {
                let name = self.name(constraint).map_err(|_| fmt::Error)?;
                let bound = self.bound(constraint).map_err(|_| fmt::Error)?;
                writeln!(
                    f,
                    "Constraint[{}]:{{{}..{}}}",
                    name,
                    display_bound(bound.lower()),
                    display_bound(bound.upper())
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knapsack() -> (LinearProblem, Variable, Variable) {
        let mut lp = LinearProblem::new();
        let x = lp.add_integer_variable("x", Some(0.0), None).unwrap();
        let y = lp.add_integer_variable("y", Some(0.0), None).unwrap();
        lp.set_objective_linear(Some(&Linear::from_slices(&[17.0, 12.0], &[x, y]).unwrap()))
            .unwrap();
        lp.set_objective_direction(Direction::Maximize);
        lp.add_constraint_with(
            "10 x + 7 y <= 40",
            Some(&Linear::from_slices(&[10.0, 7.0], &[x, y]).unwrap()),
            None,
            Some(40.0),
        )
        .unwrap();
        lp.add_constraint_with(
            "x + y <= 5",
            Some(&Linear::from_slices(&[1.0, 1.0], &[x, y]).unwrap()),
            None,
            Some(5.0),
        )
        .unwrap();
        (lp, x, y)
    }

    fn solved_knapsack() -> (LinearProblem, Variable, Variable) {
        let (mut lp, x, y) = knapsack();
        lp.record_solution(Status::Optimal, Some(SolutionValues::new(60.0, vec![0.0, 5.0])))
            .unwrap();
        (lp, x, y)
    }

    #[test]
    fn test_add_binary_variable() {
        let mut lp = LinearProblem::new();
        let x = lp.add_binary_variable("x").unwrap();
        assert_eq!(lp.variable_type(x).unwrap(), VarType::Bool);
        assert_eq!(lp.lower_bound(x).unwrap(), Some(0.0));
        assert_eq!(lp.upper_bound(x).unwrap(), Some(1.0));
    }

    #[test]
    fn test_new_integer_variable_is_free() {
        let mut lp = LinearProblem::new();
        let x = lp.add_variable("my_var", VarType::Integer).unwrap();
        assert_eq!(lp.variable_type(x).unwrap(), VarType::Integer);
        assert_eq!(lp.bound(x).unwrap(), Bound::FREE);

        lp.set_lower_bound(x, Some(10.0)).unwrap();
        lp.set_upper_bound(x, Some(20.0)).unwrap();
        assert_eq!(lp.lower_bound(x).unwrap(), Some(10.0));
        assert_eq!(lp.upper_bound(x).unwrap(), Some(20.0));

        lp.set_lower_bound(x, None).unwrap();
        assert_eq!(lp.lower_bound(x).unwrap(), None);
        lp.set_upper_bound(x, None).unwrap();
        assert_eq!(lp.upper_bound(x).unwrap(), None);
    }

    #[test]
    fn test_fixed_binary_reports_integer() {
        let mut lp = LinearProblem::new();
        let x = lp.add_binary_variable("test").unwrap();
        lp.set_bound(x, Bound::fixed(1.0)).unwrap();
        assert_eq!(lp.variable_type(x).unwrap(), VarType::Integer);
        assert!(lp.bound(x).unwrap().is_fixed());
    }

    #[test]
    fn test_duplicate_variable_name() {
        let mut lp = LinearProblem::new();
        lp.add_binary_variable("test").unwrap();
        let err = lp.add_binary_variable("test").unwrap_err();
        assert!(matches!(
            err,
            IlpError::DuplicateName { kind: EntityKind::Variable, .. }
        ));
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut lp = LinearProblem::new();
        assert!(matches!(
            lp.add_binary_variable(""),
            Err(IlpError::DuplicateName { .. })
        ));
        assert!(matches!(
            lp.add_constraint(""),
            Err(IlpError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_namespaces_are_independent() {
        let mut lp = LinearProblem::new();
        lp.add_binary_variable("a").unwrap();
        assert!(lp.add_constraint("a").is_ok());
    }

    #[test]
    fn test_long_name_rejected() {
        let mut lp = LinearProblem::new();
        let name = "n".repeat(256);
        assert!(matches!(
            lp.add_binary_variable(&name),
            Err(IlpError::InvalidArgument(_))
        ));
        assert!(lp.add_binary_variable(&name[..255]).is_ok());
    }

    #[test]
    fn test_dispose_first_variable() {
        let mut lp = LinearProblem::new();
        let v1 = lp.add_binary_variable("dummy1").unwrap();
        let v2 = lp.add_binary_variable("dummy2").unwrap();
        assert_eq!(lp.variables().collect::<Vec<_>>(), vec![v1, v2]);

        lp.dispose_variable(v1).unwrap();

        assert!(lp.is_disposed(v1));
        assert_eq!(lp.variables().collect::<Vec<_>>(), vec![v2]);
        assert_eq!(lp.index_of(v2).unwrap(), 0);
        assert_eq!(lp.name(v2).unwrap(), "dummy2");
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let mut lp = LinearProblem::new();
        let x = lp.add_binary_variable("x").unwrap();
        let c = lp.add_constraint("c").unwrap();
        lp.dispose_variable(x).unwrap();
        lp.dispose_variable(x).unwrap();
        lp.dispose_constraint(c).unwrap();
        lp.dispose_constraint(c).unwrap();
        assert_eq!(lp.variable_count(), 0);
        assert_eq!(lp.constraint_count(), 0);
    }

    #[test]
    fn test_disposed_entity_rejects_operations() {
        let mut lp = LinearProblem::new();
        let x = lp.add_binary_variable("x").unwrap();
        let c = lp.add_constraint("c").unwrap();
        lp.dispose_variable(x).unwrap();
        lp.dispose_constraint(c).unwrap();

        assert!(matches!(lp.name(x), Err(IlpError::ResourceDisposed)));
        assert!(matches!(lp.set_lower_bound(x, Some(1.0)), Err(IlpError::ResourceDisposed)));
        assert!(matches!(lp.variable_type(x), Err(IlpError::ResourceDisposed)));
        assert!(matches!(lp.linear(c), Err(IlpError::ResourceDisposed)));
        assert!(matches!(lp.set_upper_bound(c, None), Err(IlpError::ResourceDisposed)));
    }

    #[test]
    fn test_foreign_handle_rejected() {
        let mut a = LinearProblem::new();
        let mut b = LinearProblem::new();
        let x = a.add_binary_variable("x").unwrap();
        b.add_binary_variable("x").unwrap();

        assert!(b.is_disposed(x));
        assert!(matches!(b.name(x), Err(IlpError::InvalidArgument(_))));
        assert!(matches!(b.dispose_variable(x), Err(IlpError::InvalidArgument(_))));
        assert!(matches!(
            b.set_objective_linear(Some(&Linear::single(1.0, x))),
            Err(IlpError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_dispose_variable_removes_its_terms() {
        let mut lp = LinearProblem::new();
        let x = lp.add_binary_variable("x").unwrap();
        let y = lp.add_binary_variable("y").unwrap();
        let c = lp
            .add_constraint_with("c", Some(&Linear::from_slices(&[1.0, 2.0], &[x, y]).unwrap()), None, Some(5.0))
            .unwrap();
        lp.set_objective_linear(Some(&Linear::from_slices(&[3.0, 4.0], &[x, y]).unwrap()))
            .unwrap();

        lp.dispose_variable(x).unwrap();

        assert_eq!(lp.linear(c).unwrap(), Some(Linear::single(2.0, y)));
        assert_eq!(lp.objective_linear(), Some(Linear::single(4.0, y)));
    }

    #[test]
    fn test_constraint_without_variables() {
        let mut lp = LinearProblem::new();
        let v1 = lp.add_binary_variable("dummy1").unwrap();
        let v2 = lp.add_binary_variable("dummy2").unwrap();
        let c1 = lp
            .add_constraint_with("const1", Some(&Linear::from_slices(&[1.0, 2.0], &[v1, v2]).unwrap()), None, Some(5.0))
            .unwrap();
        let c2 = lp
            .add_constraint_with("const2", Some(&Linear::from_slices(&[3.0, 4.0], &[v1, v2]).unwrap()), None, Some(5.0))
            .unwrap();

        lp.dispose_constraint(c1).unwrap();
        assert_eq!(lp.constraints().collect::<Vec<_>>(), vec![c2]);
        assert_eq!(lp.name(c2).unwrap(), "const2");

        lp.dispose_variable(v1).unwrap();
        lp.dispose_variable(v2).unwrap();
        assert_eq!(lp.variable_count(), 0);
        assert_eq!(lp.linear(c2).unwrap(), None);
        assert!(lp.is_empty(c2).unwrap());
    }

    #[test]
    fn test_recreate_constraint_with_same_name() {
        let mut lp = LinearProblem::new();
        let x = lp.add_binary_variable("x").unwrap();
        let linear = Linear::single(1.0, x);
        let c = lp.add_constraint_with("c1", Some(&linear), Some(1.0), None).unwrap();
        assert!(matches!(
            lp.add_constraint_with("c1", Some(&linear), Some(1.0), None),
            Err(IlpError::DuplicateName { kind: EntityKind::Constraint, .. })
        ));

        lp.dispose_constraint(c).unwrap();
        let again = lp.add_constraint_with("c1", Some(&linear), Some(1.0), None).unwrap();
        assert_ne!(again, c);
        assert_eq!(lp.name(again).unwrap(), "c1");
    }

    #[test]
    fn test_linear_roundtrip() {
        let mut lp = LinearProblem::new();
        let x = lp.add_binary_variable("x").unwrap();
        let y = lp.add_binary_variable("y").unwrap();
        let linear = Linear::from_slices(&[1.0, -3.0], &[x, y]).unwrap();
        let c = lp.add_constraint_with("test1", Some(&linear), Some(1.0), None).unwrap();
        assert_eq!(lp.linear(c).unwrap(), Some(linear));

        let other = Linear::single(2.0, y);
        lp.set_linear(c, Some(&other)).unwrap();
        assert_eq!(lp.linear(c).unwrap(), Some(other));

        lp.set_linear(c, None).unwrap();
        assert_eq!(lp.linear(c).unwrap(), None);
    }

    #[test]
    fn test_linear_with_disposed_variable_rejected() {
        let mut lp = LinearProblem::new();
        let x = lp.add_binary_variable("x").unwrap();
        let c = lp.add_constraint("c").unwrap();
        lp.dispose_variable(x).unwrap();

        let linear = Linear::single(1.0, x);
        assert!(matches!(lp.set_linear(c, Some(&linear)), Err(IlpError::InvalidArgument(_))));
        assert!(matches!(
            lp.set_objective_linear(Some(&linear)),
            Err(IlpError::InvalidArgument(_))
        ));
        assert!(matches!(
            lp.add_constraint_with("d", Some(&linear), None, None),
            Err(IlpError::InvalidArgument(_))
        ));
        // The failed add did not consume the name.
        assert!(lp.add_constraint("d").is_ok());
    }

    #[test]
    fn test_empty_objective_is_none() {
        let mut lp = LinearProblem::new();
        let dummy = lp.add_binary_variable("dummy").unwrap();
        lp.set_objective_linear(Some(&Linear::single(1.0, dummy))).unwrap();
        let objective = lp.objective_linear().unwrap();
        assert_eq!(objective.len(), 1);
        assert_eq!(objective.coefficient(dummy), Some(1.0));

        lp.set_objective_linear(Some(&Linear::new())).unwrap();
        assert_eq!(lp.objective_linear(), None);

        lp.set_objective_linear(Some(&Linear::single(1.0, dummy))).unwrap();
        lp.set_objective_linear(None).unwrap();
        assert_eq!(lp.objective_linear(), None);
    }

    #[test]
    fn test_objective_replaces_all_coefficients() {
        let mut lp = LinearProblem::new();
        let x = lp.add_binary_variable("x").unwrap();
        let y = lp.add_binary_variable("y").unwrap();
        lp.set_objective_linear(Some(&Linear::from_slices(&[1.0, 2.0], &[x, y]).unwrap()))
            .unwrap();
        lp.set_objective_linear(Some(&Linear::single(5.0, y))).unwrap();
        assert_eq!(lp.objective_linear(), Some(Linear::single(5.0, y)));
    }

    #[test]
    fn test_objective_direction() {
        let mut lp = LinearProblem::new();
        assert_eq!(lp.objective_direction(), Direction::Minimize);
        lp.set_objective_direction(Direction::Maximize);
        assert_eq!(lp.objective_direction(), Direction::Maximize);
        assert_eq!("MIN".parse::<Direction>().unwrap(), Direction::Minimize);
        assert!(matches!("2".parse::<Direction>(), Err(IlpError::InvalidArgument(_))));
    }

    #[test]
    fn test_solved_values() {
        let (lp, x, y) = solved_knapsack();
        assert_eq!(lp.status(), Status::Optimal);
        assert_eq!(lp.value(x).unwrap(), 0.0);
        assert_eq!(lp.value(y).unwrap(), 5.0);
        assert_eq!(lp.objective_value().unwrap(), 60.0);

        let rows: Vec<_> = lp.constraints().collect();
        assert_eq!(lp.value(rows[0]).unwrap(), 35.0);
        assert_eq!(lp.value(rows[1]).unwrap(), 5.0);
    }

    #[test]
    fn test_values_unavailable_before_solve() {
        let (lp, x, _) = knapsack();
        assert!(matches!(lp.value(x), Err(IlpError::SolutionNotAvailable(_))));
        assert!(matches!(lp.objective_value(), Err(IlpError::SolutionNotAvailable(_))));
    }

    #[test]
    fn test_infeasible_has_no_values() {
        let (mut lp, x, _) = knapsack();
        lp.record_solution(Status::Infeasible, None).unwrap();
        assert_eq!(lp.status(), Status::Infeasible);
        assert!(matches!(lp.value(x), Err(IlpError::SolutionNotAvailable(_))));
    }

    #[test]
    fn test_record_solution_validates() {
        let (mut lp, _, _) = knapsack();
        assert!(matches!(
            lp.record_solution(Status::Optimal, None),
            Err(IlpError::InvalidArgument(_))
        ));
        assert!(matches!(
            lp.record_solution(Status::Feasible, Some(SolutionValues::new(0.0, vec![1.0]))),
            Err(IlpError::InvalidArgument(_))
        ));
        assert_eq!(lp.status(), Status::Unknown);
    }

    #[test]
    fn test_every_mutation_invalidates() {
        let mutations: Vec<fn(&mut LinearProblem, Variable, Variable)> = vec![
            |lp, x, _| lp.set_lower_bound(x, None).unwrap(),
            |lp, x, _| lp.set_upper_bound(x, Some(3.0)).unwrap(),
            |lp, x, _| lp.set_variable_type(x, VarType::Real).unwrap(),
            |lp, x, _| lp.set_objective_linear(Some(&Linear::single(1.0, x))).unwrap(),
            |lp, _, _| lp.set_objective_direction(Direction::Minimize),
            |lp, _, y| {
                let c = lp.constraint_at(0).unwrap();
                lp.set_linear(c, Some(&Linear::single(1.0, y))).unwrap()
            },
            |lp, _, _| {
                let c = lp.constraint_at(1).unwrap();
                lp.set_bound(c, Bound::new(None, Some(4.0))).unwrap()
            },
            |lp, _, _| {
                lp.add_binary_variable("z").unwrap();
            },
            |lp, _, _| {
                lp.add_constraint("extra").unwrap();
            },
        ];
        for mutate in mutations {
            let (mut lp, x, y) = solved_knapsack();
            mutate(&mut lp, x, y);
            assert_eq!(lp.status(), Status::Unknown);
            assert!(lp.value(y).is_err());
        }
    }

    #[test]
    fn test_dispose_keeps_other_values() {
        let (mut lp, x, y) = solved_knapsack();
        let rows: Vec<_> = lp.constraints().collect();
        lp.dispose_variable(x).unwrap();
        lp.dispose_constraint(rows[0]).unwrap();
        lp.dispose_constraint(rows[1]).unwrap();

        assert_eq!(lp.status(), Status::Optimal);
        assert_eq!(lp.value(y).unwrap(), 5.0);
    }

    #[test]
    fn test_duals() {
        let (mut lp, x, _) = knapsack();
        let c = lp.constraint_at(1).unwrap();
        lp.record_solution(
            Status::Optimal,
            Some(SolutionValues::new(60.0, vec![0.0, 5.0]).with_duals(vec![-1.0, 0.0], vec![0.0, 12.0])),
        )
        .unwrap();
        assert_eq!(lp.dual(x).unwrap(), -1.0);
        assert_eq!(lp.dual(c).unwrap(), 12.0);

        lp.record_solution(Status::Optimal, Some(SolutionValues::new(60.0, vec![0.0, 5.0])))
            .unwrap();
        assert!(matches!(lp.dual(c), Err(IlpError::SolutionNotAvailable(_))));
    }

    #[test]
    fn test_dual_follows_row_after_dispose() {
        let (mut lp, _, _) = knapsack();
        let c0 = lp.constraint_at(0).unwrap();
        let c1 = lp.constraint_at(1).unwrap();
        lp.record_solution(
            Status::Optimal,
            Some(SolutionValues::new(60.0, vec![0.0, 5.0]).with_duals(vec![0.0, 0.0], vec![7.0, 12.0])),
        )
        .unwrap();

        lp.dispose_constraint(c0).unwrap();
        assert_eq!(lp.index_of(c1).unwrap(), 0);
        assert_eq!(lp.dual(c1).unwrap(), 12.0);
    }

    #[test]
    fn test_is_mip() {
        let mut lp = LinearProblem::new();
        assert!(lp.is_mip());
        let x = lp.add_binary_variable("x").unwrap();
        lp.add_integer_variable("y", None, None).unwrap();
        assert!(lp.is_mip());
        lp.set_variable_type(x, VarType::Real).unwrap();
        assert!(!lp.is_mip());
    }

    #[test]
    fn test_value_scale() {
        let mut lp = LinearProblem::new().with_value_scale(2);
        let x = lp.add_variable("x", VarType::Real).unwrap();
        lp.record_solution(Status::Feasible, Some(SolutionValues::new(1.23456, vec![0.129])))
            .unwrap();
        assert_eq!(lp.value(x).unwrap(), 0.13);
        assert_eq!(lp.objective_value().unwrap(), 1.23);
    }

    #[test]
    fn test_huge_value_scale_keeps_values() {
        let mut lp = LinearProblem::new().with_value_scale(u32::MAX);
        let x = lp.add_variable("x", VarType::Real).unwrap();
        lp.record_solution(Status::Optimal, Some(SolutionValues::new(3.0, vec![3.0])))
            .unwrap();
        assert_eq!(lp.value(x).unwrap(), 3.0);
        assert_eq!(lp.objective_value().unwrap(), 3.0);
    }

    #[test]
    #[should_panic(expected = "backend must be empty")]
    fn test_with_backend_rejects_populated_backend() {
        let mut backend = MemoryBackend::new();
        backend.add_column("x");
        let _ = LinearProblem::with_backend(backend);
    }

    #[test]
    fn test_display_bounds_view() {
        let (lp, _, _) = knapsack();
        let text = lp.to_string();
        assert_eq!(
            text,
            "x:{0..null}\ny:{0..null}\nConstraint[10 x + 7 y <= 40]:{null..40}\nConstraint[x + y <= 5]:{null..5}\n"
        );
    }

    #[test]
    fn test_display_solution_view() {
        let (lp, _, _) = solved_knapsack();
        let text = lp.to_string();
        assert!(text.starts_with("[17 * x + 12 * y]\nobj=60\n"));
        assert!(text.contains("y=5\n"));
        assert!(text.contains("Constraint[x + y <= 5]=5\n"));
    }

    #[test]
    fn test_names() {
        let mut lp = LinearProblem::new();
        assert_eq!(lp.name_of_problem(), None);
        lp.set_problem_name(Some("knapsack")).unwrap();
        lp.set_objective_name(Some("profit")).unwrap();
        assert_eq!(lp.name_of_problem(), Some("knapsack"));
        assert_eq!(lp.objective_name(), Some("profit"));
        assert!(lp.set_objective_name(Some("o".repeat(300).as_str())).is_err());
    }
}
