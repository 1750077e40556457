//! Pass statistics

use serde::{Deserialize, Serialize};

/// Counters collected during one alias pass
///
/// Recoverable anomalies never fail the pass; they end up here instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub allocations: u64,
    /// Null or zero-sized allocations that were not recorded
    pub rejected_allocations: u64,
    /// Global allocations seen after the first Enter
    pub late_globals: u64,
    pub frees: u64,
    /// Frees that matched no live allocation
    pub unmatched_frees: u64,

    pub pointer_definitions: u64,
    pub null_pointers: u64,
    /// Pointers into memory with no captured allocation
    pub unknown_version_pointers: u64,
    /// Pointers resolved to an invocation that already returned
    pub stale_definitions: u64,

    pub stores: u64,
    pub calls: u64,
    pub enters: u64,
    pub returns: u64,
    pub forks: u64,

    /// Definitions detached by a reallocation or free
    pub invalidated_definitions: u64,
    /// Definitions detached by bulk cleanup on return
    pub released_definitions: u64,
    /// Candidate pairs dropped because a side was outdated
    pub suppressed_pairs: u64,

    pub invocations: u64,
    pub max_version: u64,
}

impl EngineStats {
    /// Records that reached the engine
    pub fn records(&self) -> u64 {
        self.allocations
            + self.frees
            + self.pointer_definitions
            + self.stores
            + self.calls
            + self.enters
            + self.returns
            + self.forks
    }
}
