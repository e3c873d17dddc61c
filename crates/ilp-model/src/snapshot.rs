//! Point-in-time captures of bounds, constraint definitions and solved values.

use indexmap::IndexMap;

use crate::backend::Backend;
use crate::bound::Bound;
use crate::entity::{Constraint, Entity, Variable};
use crate::error::IlpError;
use crate::linear::{ImmutableLinear, Linear};
use crate::problem::LinearProblem;

/// Tolerance used by [`ValueSnapshot::is_satisfied`] unless overridden.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Bounds of a set of variables (or constraints), in capture order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundSnapshot<E: Entity = Variable> {
    bounds: IndexMap<E, Bound>,
}

impl<E: Entity> BoundSnapshot<E> {
    pub fn create<B: Backend>(
        lp: &LinearProblem<B>,
        entities: impl IntoIterator<Item = E>,
    ) -> Result<Self, IlpError> {
        let bounds = entities
            .into_iter()
            .map(|e| Ok((e, lp.bound(e)?)))
            .collect::<Result<_, IlpError>>()?;
        Ok(Self { bounds })
    }

    pub fn get(&self, entity: E) -> Option<Bound> {
        self.bounds.get(&entity).copied()
    }

    pub fn lower(&self, entity: E) -> Option<f64> {
        self.get(entity).and_then(|b| b.lower())
    }

    pub fn upper(&self, entity: E) -> Option<f64> {
        self.get(entity).and_then(|b| b.upper())
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (E, Bound)> + '_ {
        self.bounds.iter().map(|(&e, &b)| (e, b))
    }

    /// Re-apply every captured bound. Stops at the first entity that cannot
    /// take its bound back, e.g. because it was disposed.
    pub fn restore<B: Backend>(&self, lp: &mut LinearProblem<B>) -> Result<(), IlpError> {
        for (&entity, bound) in &self.bounds {
            bound.restore(lp, entity)?;
        }
        tracing::debug!(
            component = "snapshot",
            operation = "restore_bounds",
            status = "success",
            count = self.bounds.len(),
            "Restored bounds"
        );
        Ok(())
    }
}

/// The definition of one constraint: name, row and bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSnapshot {
    name: String,
    linear: Option<ImmutableLinear>,
    bound: Bound,
}

impl ConstraintSnapshot {
    pub fn create<B: Backend>(lp: &LinearProblem<B>, constraint: Constraint) -> Result<Self, IlpError> {
        Ok(Self {
            name: lp.name(constraint)?.to_string(),
            linear: lp.linear(constraint)?.map(Linear::freeze),
            bound: lp.bound(constraint)?,
        })
    }

    /// Capture the constraint, then dispose it.
    pub fn release<B: Backend>(lp: &mut LinearProblem<B>, constraint: Constraint) -> Result<Self, IlpError> {
        let snapshot = Self::create(lp, constraint)?;
        lp.dispose_constraint(constraint)?;
        tracing::debug!(
            component = "snapshot",
            operation = "release_constraint",
            status = "success",
            constraint = %snapshot.name,
            "Released constraint"
        );
        Ok(snapshot)
    }

    /// Add an equivalent constraint under a new handle.
    ///
    /// The row is pushed in one call. Every variable of the captured row must
    /// still be live in `lp`.
    pub fn restore<B: Backend>(&self, lp: &mut LinearProblem<B>) -> Result<Constraint, IlpError> {
        lp.add_constraint_with(
            &self.name,
            self.linear.as_deref(),
            self.bound.lower(),
            self.bound.upper(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn linear(&self) -> Option<&ImmutableLinear> {
        self.linear.as_ref()
    }

    pub fn bound(&self) -> Bound {
        self.bound
    }

    pub fn lower(&self) -> Option<f64> {
        self.bound.lower()
    }

    pub fn upper(&self) -> Option<f64> {
        self.bound.upper()
    }
}

/// Solved values of a set of variables, usable after the problem changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSnapshot {
    values: IndexMap<Variable, f64>,
    tolerance: f64,
}

impl ValueSnapshot {
    /// Fails with [`IlpError::SolutionNotAvailable`] unless the problem
    /// currently holds a feasible or optimal solution.
    pub fn create<B: Backend>(
        lp: &LinearProblem<B>,
        variables: impl IntoIterator<Item = Variable>,
    ) -> Result<Self, IlpError> {
        if !lp.status().has_solution() {
            return Err(IlpError::SolutionNotAvailable(format!("status is {}", lp.status())));
        }
        let values = variables
            .into_iter()
            .map(|v| Ok((v, lp.value(v)?)))
            .collect::<Result<_, IlpError>>()?;
        Ok(Self {
            values,
            tolerance: DEFAULT_TOLERANCE,
        })
    }

    /// Capture every live variable of the problem.
    pub fn all<B: Backend>(lp: &LinearProblem<B>) -> Result<Self, IlpError> {
        Self::create(lp, lp.variables())
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn get(&self, variable: Variable) -> Option<f64> {
        self.values.get(&variable).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `Σ coefficient × captured value`.
    pub fn evaluate(&self, linear: &Linear) -> Result<f64, IlpError> {
        linear.iter().try_fold(0.0, |sum, term| {
            let value = self
                .get(term.variable)
                .ok_or_else(|| IlpError::invalid("variable not in value snapshot"))?;
            Ok(sum + term.coefficient * value)
        })
    }

    /// Whether the captured values satisfy the constraint's current row and bounds.
    pub fn is_satisfied<B: Backend>(&self, lp: &LinearProblem<B>, constraint: Constraint) -> Result<bool, IlpError> {
        let activity = match lp.linear(constraint)? {
            Some(linear) => self.evaluate(&linear)?,
            None => 0.0,
        };
        Ok(lp.bound(constraint)?.contains(activity, self.tolerance))
    }
}
