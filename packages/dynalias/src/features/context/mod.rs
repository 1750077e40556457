//! Invocation context tracking
//!
//! Call stacks per thread, the global invocation counter, and the per
//! invocation bookkeeping needed to detach a function's pointers when it
//! returns.

pub mod error;
pub mod tracker;

pub use error::ContextError;
pub use tracker::{ContextTracker, Frame, RetiredInvocation};
