use std::fmt;

use crate::error::SolverError;

/// Optional solver features a backend may expose through its options.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Run the feasibility pump heuristic before branching
    FeasibilityPump,
    /// Branch on the last fractional variable
    BranchingLast,
    /// Branch on the last fractional variable, down branch first
    BranchingLastAlwaysDown,
    /// Reject incumbents that are not integer feasible
    IntegerFeasibilityCheck,
}

impl Capability {
    pub const COUNT: usize = 4;

    pub const ALL: [Capability; Capability::COUNT] = [
        Capability::FeasibilityPump,
        Capability::BranchingLast,
        Capability::BranchingLastAlwaysDown,
        Capability::IntegerFeasibilityCheck,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::FeasibilityPump => "feasibility pump",
            Capability::BranchingLast => "branching last",
            Capability::BranchingLastAlwaysDown => "branching last always down",
            Capability::IntegerFeasibilityCheck => "integer feasibility check",
        };
        f.write_str(s)
    }
}

/// Backend-specific option bag. Callers discover what it supports at runtime.
pub trait SolverOptions {
    fn supports(&self, capability: Capability) -> bool;

    /// Current setting, or `UnsupportedCapability`.
    fn capability(&self, capability: Capability) -> Result<bool, SolverError>;

    fn set_capability(&mut self, capability: Capability, enabled: bool) -> Result<(), SolverError>;

    /// Setting of a capability, `false` when unsupported.
    fn is_enabled(&self, capability: Capability) -> bool {
        self.capability(capability).unwrap_or(false)
    }
}

/// A plain capability table, usable as the option type of most solvers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionSet {
    settings: [Option<bool>; Capability::COUNT],
}

impl OptionSet {
    /// An option set that supports nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `capability` supported, initially set to `enabled`.
    pub fn with_capability(mut self, capability: Capability, enabled: bool) -> Self {
        self.settings[capability.slot()] = Some(enabled);
        self
    }

    pub fn supported(&self) -> impl Iterator<Item = Capability> + '_ {
        Capability::ALL
            .into_iter()
            .filter(|c| self.settings[c.slot()].is_some())
    }
}

impl SolverOptions for OptionSet {
    fn supports(&self, capability: Capability) -> bool {
        self.settings[capability.slot()].is_some()
    }

    fn capability(&self, capability: Capability) -> Result<bool, SolverError> {
        self.settings[capability.slot()].ok_or(SolverError::UnsupportedCapability(capability))
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) -> Result<(), SolverError> {
        match self.settings[capability.slot()].as_mut() {
            Some(setting) => {
                *setting = enabled;
                Ok(())
            }
            None => Err(SolverError::UnsupportedCapability(capability)),
        }
    }
}
