//! Shared models

mod memory;

pub use memory::{
    Address, AddressRange, AllocKind, InvocationId, ThreadId, ValueId, Version,
    GLOBAL_INVOCATION, MAIN_THREAD,
};
