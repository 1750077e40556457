//! Structural trace errors

use crate::shared::models::{ThreadId, ValueId};
use thiserror::Error;

/// Broken Enter/Return nesting; always fatal for the pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("return from function #{function} on thread {thread} with no active invocation")]
    ReturnWithoutEnter { function: ValueId, thread: ThreadId },

    #[error("return from function #{found} on thread {thread}, expected #{expected} on top")]
    NestingMismatch {
        expected: ValueId,
        found: ValueId,
        thread: ThreadId,
    },

    #[error("call depth limit {limit} exceeded on thread {thread} entering function #{function}")]
    DepthLimitExceeded {
        function: ValueId,
        thread: ThreadId,
        limit: usize,
    },
}
