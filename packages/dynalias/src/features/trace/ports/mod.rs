//! Ports for trace consumers
//!
//! Anything that wants to replay a trace implements [`TraceVisitor`]; the
//! dispatcher owns the loop, the numbering and the error wrapping.

use crate::features::context::ContextError;
use crate::features::trace::domain::TraceRecord;
use crate::shared::models::{Address, AllocKind, ThreadId, ValueId};

/// Per-record callbacks, all no-ops by default
///
/// Only structural problems may be reported; everything else is absorbed by
/// the visitor.
pub trait TraceVisitor {
    fn visit_mem_alloc(
        &mut self,
        _id: ValueId,
        _address: Address,
        _size: u64,
        _kind: AllocKind,
    ) -> Result<(), ContextError> {
        Ok(())
    }

    fn visit_free(&mut self, _address: Address, _size: u64) -> Result<(), ContextError> {
        Ok(())
    }

    fn visit_top_level(
        &mut self,
        _value: ValueId,
        _address: Address,
        _thread: ThreadId,
    ) -> Result<(), ContextError> {
        Ok(())
    }

    fn visit_store(
        &mut self,
        _value: ValueId,
        _pointer_address: Address,
        _value_address: Address,
    ) -> Result<(), ContextError> {
        Ok(())
    }

    fn visit_enter(&mut self, _function: ValueId, _thread: ThreadId) -> Result<(), ContextError> {
        Ok(())
    }

    fn visit_return(&mut self, _function: ValueId, _thread: ThreadId) -> Result<(), ContextError> {
        Ok(())
    }

    fn visit_call(
        &mut self,
        _callee: Option<ValueId>,
        _thread: ThreadId,
    ) -> Result<(), ContextError> {
        Ok(())
    }

    fn visit_fork(&mut self, _thread: ThreadId) -> Result<(), ContextError> {
        Ok(())
    }

    /// Route one record to its callback
    fn visit_record(&mut self, record: &TraceRecord) -> Result<(), ContextError> {
        match *record {
            TraceRecord::MemAlloc {
                id,
                address,
                size,
                kind,
            } => self.visit_mem_alloc(id, address, size, kind),
            TraceRecord::Free { address, size } => self.visit_free(address, size),
            TraceRecord::TopLevel {
                value,
                address,
                thread,
            } => self.visit_top_level(value, address, thread),
            TraceRecord::Store {
                value,
                pointer_address,
                value_address,
            } => self.visit_store(value, pointer_address, value_address),
            TraceRecord::Enter { function, thread } => self.visit_enter(function, thread),
            TraceRecord::Return { function, thread } => self.visit_return(function, thread),
            TraceRecord::Call { callee, thread } => self.visit_call(callee, thread),
            TraceRecord::Fork { thread } => self.visit_fork(thread),
        }
    }
}
