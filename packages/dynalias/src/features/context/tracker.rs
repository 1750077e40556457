//! Context Tracker
//!
//! State machine over invocation ids: an invocation is *pushed* on Enter and
//! *retired* on the matching Return. Invocation ids come from one global
//! counter shared by all threads, so definitions stay distinguishable across
//! threads and across recursive activations of the same function.

use super::error::ContextError;
use crate::shared::models::{InvocationId, ThreadId, ValueId, GLOBAL_INVOCATION};
use rustc_hash::{FxHashMap, FxHashSet};

/// One activation on a thread's call stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub function: ValueId,
    pub invocation: InvocationId,
}

/// Result of a Return transition, consumed by the bulk cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetiredInvocation {
    pub function: ValueId,
    pub invocation: InvocationId,
    /// Values defined while the invocation was active
    pub active_pointers: Vec<ValueId>,
}

/// Call stacks and per-invocation bookkeeping
#[derive(Debug, Default)]
pub struct ContextTracker {
    /// Global invocation counter (0 = never entered)
    num_invocations: InvocationId,

    /// Per-thread call stacks; threads with an empty stack are dropped
    call_stacks: FxHashMap<ThreadId, Vec<Frame>>,

    /// Values defined during each active invocation
    active_pointers: FxHashMap<InvocationId, FxHashSet<ValueId>>,

    /// Retired invocations per function
    outdated_contexts: FxHashMap<ValueId, FxHashSet<InvocationId>>,

    /// Invocation → function it activated
    owners: FxHashMap<InvocationId, ValueId>,

    /// Function → its most recent invocation
    latest: FxHashMap<ValueId, InvocationId>,

    /// Optional per-thread depth guard
    max_depth: Option<usize>,
}

impl ContextTracker {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// Enter transition: push a fresh invocation of `function` on `thread`
    pub fn enter(
        &mut self,
        function: ValueId,
        thread: ThreadId,
    ) -> Result<InvocationId, ContextError> {
        let stack = self.call_stacks.entry(thread).or_default();
        if let Some(limit) = self.max_depth {
            if stack.len() >= limit {
                return Err(ContextError::DepthLimitExceeded {
                    function,
                    thread,
                    limit,
                });
            }
        }

        self.num_invocations += 1;
        let invocation = self.num_invocations;
        stack.push(Frame {
            function,
            invocation,
        });
        self.active_pointers.insert(invocation, FxHashSet::default());
        self.owners.insert(invocation, function);
        self.latest.insert(function, invocation);
        Ok(invocation)
    }

    /// Return transition: pop `function`'s invocation off `thread`
    ///
    /// The popped frame must belong to `function`; anything else means the
    /// trace's nesting is corrupt. The invocation becomes outdated and its
    /// active-pointer bucket is handed back for bulk removal.
    pub fn leave(
        &mut self,
        function: ValueId,
        thread: ThreadId,
    ) -> Result<RetiredInvocation, ContextError> {
        let Some(stack) = self.call_stacks.get_mut(&thread) else {
            return Err(ContextError::ReturnWithoutEnter { function, thread });
        };
        let Some(&top) = stack.last() else {
            return Err(ContextError::ReturnWithoutEnter { function, thread });
        };
        if top.function != function {
            return Err(ContextError::NestingMismatch {
                expected: top.function,
                found: function,
                thread,
            });
        }

        stack.pop();
        if stack.is_empty() {
            self.call_stacks.remove(&thread);
        }

        let active_pointers = self
            .active_pointers
            .remove(&top.invocation)
            .map(|bucket| bucket.into_iter().collect())
            .unwrap_or_default();
        self.outdated_contexts
            .entry(function)
            .or_default()
            .insert(top.invocation);

        Ok(RetiredInvocation {
            function,
            invocation: top.invocation,
            active_pointers,
        })
    }

    /// Invocation on top of `thread`'s stack, or the global context
    #[inline]
    pub fn current(&self, thread: ThreadId) -> InvocationId {
        self.current_frame(thread)
            .map(|frame| frame.invocation)
            .unwrap_or(GLOBAL_INVOCATION)
    }

    pub fn current_frame(&self, thread: ThreadId) -> Option<Frame> {
        self.call_stacks
            .get(&thread)
            .and_then(|stack| stack.last().copied())
    }

    /// Invocation a value of `containing_function` belongs to right now
    ///
    /// Prefers the topmost activation of that function on `thread`. A function
    /// missing from `thread`'s stack whose most recent invocation has returned
    /// resolves to that retired invocation, so the caller can reject the stale
    /// reference. Everything else lands on top of `thread`; activations on
    /// other threads are never borrowed.
    pub fn resolve(&self, thread: ThreadId, containing_function: Option<ValueId>) -> InvocationId {
        if let Some(function) = containing_function {
            if let Some(frame) = self
                .call_stacks
                .get(&thread)
                .and_then(|stack| stack.iter().rev().find(|f| f.function == function))
            {
                return frame.invocation;
            }
            if let Some(&invocation) = self.latest.get(&function) {
                if !self.is_active(invocation) {
                    return invocation;
                }
            }
        }
        self.current(thread)
    }

    /// Remember that `value` was defined during `invocation`
    ///
    /// Returns false when the invocation is not active (global context or
    /// already retired).
    pub fn record_active(&mut self, invocation: InvocationId, value: ValueId) -> bool {
        match self.active_pointers.get_mut(&invocation) {
            Some(bucket) => {
                bucket.insert(value);
                true
            }
            None => false,
        }
    }

    /// Whether `invocation` is pushed and not yet retired
    #[inline]
    pub fn is_active(&self, invocation: InvocationId) -> bool {
        self.active_pointers.contains_key(&invocation)
    }

    /// Whether `invocation` has returned
    pub fn is_outdated(&self, invocation: InvocationId) -> bool {
        self.owners
            .get(&invocation)
            .and_then(|function| self.outdated_contexts.get(function))
            .is_some_and(|retired| retired.contains(&invocation))
    }

    /// Function an invocation activated
    #[inline]
    pub fn owner(&self, invocation: InvocationId) -> Option<ValueId> {
        self.owners.get(&invocation).copied()
    }

    /// Retired invocations of `function`
    pub fn outdated_contexts(&self, function: ValueId) -> Option<&FxHashSet<InvocationId>> {
        self.outdated_contexts.get(&function)
    }

    /// Stack depth of `thread`
    pub fn depth(&self, thread: ThreadId) -> usize {
        self.call_stacks.get(&thread).map_or(0, Vec::len)
    }

    /// Threads with at least one active frame
    pub fn active_threads(&self) -> usize {
        self.call_stacks.len()
    }

    /// Total invocations handed out so far
    #[inline]
    pub fn num_invocations(&self) -> InvocationId {
        self.num_invocations
    }
}
