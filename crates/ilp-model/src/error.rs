use std::fmt;

use thiserror::Error;

/// The two independent entity namespaces of a problem.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Variable,
    Constraint,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Variable => f.write_str("variable"),
            EntityKind::Constraint => f.write_str("constraint"),
        }
    }
}

#[derive(Error, Debug)]
pub enum IlpError {
    #[error("Resource is disposed")]
    ResourceDisposed,
    /// The name is empty or already registered in the namespace of `kind`.
    #[error("Duplicate {kind} name: {name:?}")]
    DuplicateName { kind: EntityKind, name: String },
    #[error("Solution not available: {0}")]
    SolutionNotAvailable(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl IlpError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        IlpError::InvalidArgument(message.into())
    }
}
