mod capability;
mod error;
mod serialized;
mod solver;

pub use capability::{Capability, OptionSet, SolverOptions};
pub use error::SolverError;
pub use ilp_model::IlpError;
pub use serialized::Serialized;
pub use solver::{Solver, SolverFactory};
