//! Trace record model
//!
//! One variant per event the instrumented program emits. Layout on disk is
//! owned by the codecs in `infrastructure`; this is the decoded form.

use crate::shared::models::{Address, AllocKind, ThreadId, ValueId, MAIN_THREAD};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceRecord {
    /// Allocation of `size` bytes at `address` by allocator value `id`
    MemAlloc {
        id: ValueId,
        address: Address,
        size: u64,
        kind: AllocKind,
    },

    /// Explicit deallocation
    Free { address: Address, size: u64 },

    /// Pointer-typed `value` was defined holding `address`
    TopLevel {
        value: ValueId,
        address: Address,
        #[serde(default)]
        thread: ThreadId,
    },

    /// `value_address` was stored into memory at `pointer_address`
    Store {
        value: ValueId,
        pointer_address: Address,
        value_address: Address,
    },

    Enter {
        function: ValueId,
        #[serde(default)]
        thread: ThreadId,
    },

    Return {
        function: ValueId,
        #[serde(default)]
        thread: ThreadId,
    },

    /// Call-site hint; `callee` is unknown for indirect calls
    Call {
        #[serde(default)]
        callee: Option<ValueId>,
        #[serde(default)]
        thread: ThreadId,
    },

    /// The traced process forked
    Fork {
        #[serde(default)]
        thread: ThreadId,
    },
}

impl TraceRecord {
    /// Short kind name, matching the text keyword
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::MemAlloc { .. } => "alloc",
            Self::Free { .. } => "free",
            Self::TopLevel { .. } => "ptr",
            Self::Store { .. } => "store",
            Self::Enter { .. } => "enter",
            Self::Return { .. } => "ret",
            Self::Call { .. } => "call",
            Self::Fork { .. } => "fork",
        }
    }

    /// Thread tag, for records that carry one
    pub fn thread(&self) -> Option<ThreadId> {
        match self {
            Self::TopLevel { thread, .. }
            | Self::Enter { thread, .. }
            | Self::Return { thread, .. }
            | Self::Call { thread, .. }
            | Self::Fork { thread } => Some(*thread),
            Self::MemAlloc { .. } | Self::Free { .. } | Self::Store { .. } => None,
        }
    }
}

/// Text form, one line without trailing newline
impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MemAlloc {
                id,
                address,
                size,
                kind,
            } => write!(f, "alloc {} {:#x} {} {}", id, address, size, kind.as_str()),
            Self::Free { address, size } => write!(f, "free {:#x} {}", address, size),
            Self::TopLevel {
                value,
                address,
                thread,
            } => {
                write!(f, "ptr {} {:#x}", value, address)?;
                write_thread(f, thread)
            }
            Self::Store {
                value,
                pointer_address,
                value_address,
            } => write!(
                f,
                "store {} {:#x} {:#x}",
                value, pointer_address, value_address
            ),
            Self::Enter { function, thread } => {
                write!(f, "enter {}", function)?;
                write_thread(f, thread)
            }
            Self::Return { function, thread } => {
                write!(f, "ret {}", function)?;
                write_thread(f, thread)
            }
            Self::Call { callee, thread } => {
                match callee {
                    Some(callee) => write!(f, "call {}", callee)?,
                    None => write!(f, "call -")?,
                }
                write_thread(f, thread)
            }
            Self::Fork { thread } => {
                write!(f, "fork")?;
                write_thread(f, thread)
            }
        }
    }
}

fn write_thread(f: &mut fmt::Formatter<'_>, thread: ThreadId) -> fmt::Result {
    if thread == MAIN_THREAD {
        Ok(())
    } else {
        write!(f, " @{}", thread)
    }
}
