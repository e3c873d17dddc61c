use ilp_model::IlpError;
use thiserror::Error;

use crate::capability::Capability;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error(transparent)]
    Model(#[from] IlpError),
    #[error("Unsupported solver capability: {0}")]
    UnsupportedCapability(Capability),
    #[error("Solver failed: {0}")]
    Failed(String),
}
