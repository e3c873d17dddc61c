use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use ilp_model::LinearProblem;

use crate::error::SolverError;
use crate::solver::Solver;

/// One lock for the whole process: non thread-safe libraries share global state
/// across every problem instance.
static SOLVE_LOCK: Mutex<()> = Mutex::new(());

/// Runs every `solve` of the wrapped solver under a process-wide lock.
///
/// Problem construction and option handling are not serialized.
#[derive(Debug, Clone, Default)]
pub struct Serialized<S> {
    inner: S,
}

impl<S: Solver> Serialized<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Solver> Solver for Serialized<S> {
    type Backend = S::Backend;
    type Options = S::Options;

    fn create_linear_problem(&self) -> LinearProblem<Self::Backend> {
        self.inner.create_linear_problem()
    }

    fn create_solver_option(&self) -> Self::Options {
        self.inner.create_solver_option()
    }

    fn solve(&self, lp: &mut LinearProblem<Self::Backend>, options: &Self::Options) -> Result<bool, SolverError> {
        let waiting = Instant::now();
        // A panic inside another solve leaves nothing to repair behind the lock.
        let _guard = SOLVE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        tracing::trace!(
            component = "solver",
            operation = "acquire_lock",
            waited_us = waiting.elapsed().as_micros() as u64,
            "Acquired solve lock"
        );

        let started = Instant::now();
        let result = self.inner.solve(lp, options);
        match &result {
            Ok(found) => tracing::debug!(
                component = "solver",
                operation = "solve",
                status = "success",
                feasible = *found,
                outcome = %lp.status(),
                duration_ms = started.elapsed().as_millis() as u64,
                "Solve finished"
            ),
            Err(e) => tracing::warn!(
                component = "solver",
                operation = "solve",
                status = "error",
                error = %e,
                "Solve failed"
            ),
        }
        result
    }
}
