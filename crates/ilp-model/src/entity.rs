use std::fmt;
use std::hash::Hash;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::error::EntityKind;
use crate::table::EntityKey;

static NEXT_PROBLEM_ID: AtomicU32 = AtomicU32::new(0);

/// Identity of one `LinearProblem` instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProblemId(u32);

impl ProblemId {
    pub(crate) fn next() -> Self {
        Self(NEXT_PROBLEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name {
            problem: ProblemId,
            key: EntityKey,
        }

        impl $name {
            pub(crate) fn new(problem: ProblemId, key: EntityKey) -> Self {
                Self { problem, key }
            }

            /// The problem this handle was created by.
            pub fn problem(self) -> ProblemId {
                self.problem
            }
        }

        impl sealed::Sealed for $name {}

        impl Entity for $name {
            const KIND: EntityKind = $kind;

            fn problem(self) -> ProblemId {
                self.problem
            }

            fn key(self) -> EntityKey {
                self.key
            }
        }
    };
}

define_handle!(
    /// Handle to a column of a `LinearProblem`.
    Variable,
    EntityKind::Variable
);

define_handle!(
    /// Handle to a row of a `LinearProblem`.
    Constraint,
    EntityKind::Constraint
);

mod sealed {
    pub trait Sealed {}
}

/// Operations shared by variables and constraints (bounds, name, value).
pub trait Entity: Copy + Eq + Hash + fmt::Debug + sealed::Sealed {
    const KIND: EntityKind;

    fn problem(self) -> ProblemId;

    #[doc(hidden)]
    fn key(self) -> EntityKey;
}

/// Integrality of a variable. `Bool` is an integer restricted to `[0, 1]`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Bool,
    Integer,
    Real,
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarType::Bool => f.write_str("BOOL"),
            VarType::Integer => f.write_str("INT"),
            VarType::Real => f.write_str("REAL"),
        }
    }
}
