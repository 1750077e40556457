//! Versioned pointer identities and their targets

use crate::shared::models::{Address, InvocationId, ValueId, Version, GLOBAL_INVOCATION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One dynamic instance of a pointer-typed value
///
/// Two definitions of the same value in different invocations are different
/// pointers: a recursive function's local `x` in frame 3 never aliases the
/// same `x` in frame 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Definition {
    pub value: ValueId,
    pub invocation: InvocationId,
}

impl Definition {
    #[inline]
    pub fn new(value: ValueId, invocation: InvocationId) -> Self {
        Self { value, invocation }
    }

    /// Definition living in the global context
    #[inline]
    pub fn global(value: ValueId) -> Self {
        Self::new(value, GLOBAL_INVOCATION)
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        self.invocation == GLOBAL_INVOCATION
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.value, self.invocation)
    }
}

/// Target of a definition: an address inside one specific allocation
///
/// The version identifies the allocation, so equal locations mean "same
/// address of the same live object". Locations are plain keys; the
/// allocation's range lives in the version store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub address: Address,
    pub version: Version,
}

impl Location {
    #[inline]
    pub fn new(address: Address, version: Version) -> Self {
        Self { address, version }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}/v{}", self.address, self.version)
    }
}
