use ilp_model::{Backend, LinearProblem};

use crate::capability::SolverOptions;
use crate::error::SolverError;

/// A solver library bound to one backend.
///
/// Dropping the solver releases whatever the library allocated.
pub trait Solver {
    type Backend: Backend;
    type Options: SolverOptions;

    /// An empty problem stored in this solver's backend.
    fn create_linear_problem(&self) -> LinearProblem<Self::Backend>;

    /// Options with the solver's defaults.
    fn create_solver_option(&self) -> Self::Options;

    /// Solve `lp` and record the outcome with [`LinearProblem::record_solution`].
    ///
    /// Returns `true` when a feasible solution was found, optimal or not.
    /// `false` does not prove infeasibility; check [`LinearProblem::status`].
    fn solve(&self, lp: &mut LinearProblem<Self::Backend>, options: &Self::Options) -> Result<bool, SolverError>;
}

pub trait SolverFactory {
    type Solver: Solver;

    fn create_solver(&self) -> Self::Solver;
}
