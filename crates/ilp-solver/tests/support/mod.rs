#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use ilp_model::{LinearProblem, MemoryBackend, SolutionValues, Status};
use ilp_solver::{Capability, OptionSet, Solver, SolverError, SolverFactory, SolverOptions};

/// Reports a fixed outcome and records whether two solves ever overlapped.
#[derive(Debug, Clone)]
pub struct ScriptedSolver {
    pub status: Status,
    pub objective: f64,
    pub columns: Vec<f64>,
    pub delay: Duration,
    pub running: Arc<AtomicBool>,
    pub overlapped: Arc<AtomicBool>,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedSolver {
    pub fn new(status: Status, objective: f64, columns: &[f64]) -> Self {
        Self {
            status,
            objective,
            columns: columns.to_vec(),
            delay: Duration::ZERO,
            running: Arc::default(),
            overlapped: Arc::default(),
            calls: Arc::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Solver for ScriptedSolver {
    type Backend = MemoryBackend;
    type Options = OptionSet;

    fn create_linear_problem(&self) -> LinearProblem<MemoryBackend> {
        LinearProblem::new()
    }

    fn create_solver_option(&self) -> OptionSet {
        OptionSet::new()
            .with_capability(Capability::BranchingLast, false)
            .with_capability(Capability::IntegerFeasibilityCheck, false)
    }

    fn solve(&self, lp: &mut LinearProblem<MemoryBackend>, options: &OptionSet) -> Result<bool, SolverError> {
        if self.running.swap(true, Ordering::SeqCst) {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.delay);

        let mut status = self.status;
        if options.is_enabled(Capability::IntegerFeasibilityCheck)
            && lp.is_mip()
            && self.columns.iter().any(|v| v.fract() != 0.0)
        {
            status = Status::Infeasible;
        }
        let values = status
            .has_solution()
            .then(|| SolutionValues::new(self.objective, self.columns.clone()));
        let result = lp.record_solution(status, values);

        self.running.store(false, Ordering::SeqCst);
        result?;
        Ok(status.has_solution())
    }
}

pub struct ScriptedFactory {
    pub template: ScriptedSolver,
}

impl SolverFactory for ScriptedFactory {
    type Solver = ScriptedSolver;

    fn create_solver(&self) -> ScriptedSolver {
        self.template.clone()
    }
}
