mod backend;
mod bound;
mod entity;
mod error;
mod linear;
mod memory;
#[cfg(feature = "serde")]
mod persist;
mod problem;
mod snapshot;
mod solution;
mod table;

pub use backend::{Backend, ColumnKind, RowEntries};
pub use bound::Bound;
pub use entity::{Constraint, Entity, ProblemId, VarType, Variable};
pub use error::{EntityKind, IlpError};
pub use linear::{ImmutableLinear, Linear, Term};
pub use memory::MemoryBackend;
#[cfg(feature = "serde")]
pub use persist::{ConstraintRecord, ProblemDocument, VariableRecord};
pub use problem::{DEFAULT_VALUE_SCALE, Direction, LinearProblem};
pub use snapshot::{BoundSnapshot, ConstraintSnapshot, DEFAULT_TOLERANCE, ValueSnapshot};
pub use solution::{SolutionValues, Status};
