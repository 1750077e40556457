//! Primitive identifiers shared by the trace records and the engine
//!
//! Everything here is only meaningful within a single trace: addresses are raw
//! machine words of one process run, value ids come from the identifier
//! assignment of one instrumented module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable small integer identifying a source-level value
/// (pointer-typed instruction, argument, global or function)
pub type ValueId = u32;

/// Raw run-time memory address
pub type Address = u64;

/// Generation counter, incremented once per allocation event
pub type Version = u64;

/// One id per dynamic function entry
pub type InvocationId = u64;

/// Logical thread/stream tag carried by context records
pub type ThreadId = u32;

/// Context of module-level values and of records seen before any Enter
pub const GLOBAL_INVOCATION: InvocationId = 0;

/// Thread tag used when a record does not carry one
pub const MAIN_THREAD: ThreadId = 0;

/// Half-open byte range `[start, end)`
///
/// Never empty: the constructors reject zero sizes and ranges that would wrap
/// around the address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AddressRange {
    pub start: Address,
    pub end: Address,
}

impl AddressRange {
    /// Range starting at `start` covering `size` bytes
    #[inline]
    pub fn new(start: Address, size: u64) -> Option<Self> {
        if size == 0 {
            return None;
        }
        let end = start.checked_add(size)?;
        Some(Self { start, end })
    }

    /// Range from explicit bounds (`start < end` required)
    #[inline]
    pub fn from_bounds(start: Address, end: Address) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn contains(&self, address: Address) -> bool {
        self.start <= address && address < self.end
    }

    #[inline]
    pub fn overlaps(&self, other: &AddressRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Overlapping part of two ranges
    #[inline]
    pub fn intersection(&self, other: &AddressRange) -> Option<AddressRange> {
        Self::from_bounds(self.start.max(other.start), self.end.min(other.end))
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:#x}, {:#x})", self.start, self.end)
    }
}

/// Storage class of an allocation record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocKind {
    /// Global/static storage, recorded once before `main` runs
    Global,
    /// `alloca` frame slot
    Stack,
    /// `malloc`-family allocation
    Heap,
}

impl AllocKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Stack => "stack",
            Self::Heap => "heap",
        }
    }

    /// Parse from the text trace spelling
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "global" | "g" => Some(Self::Global),
            "stack" | "s" => Some(Self::Stack),
            "heap" | "h" => Some(Self::Heap),
            _ => None,
        }
    }
}
