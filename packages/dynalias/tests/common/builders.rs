//! Test data builders
//!
//! [`TraceBuilder`] assembles a record stream fluently so scenarios read in
//! trace order.

use dynalias::features::trace::TextTraceWriter;
use dynalias::shared::models::MAIN_THREAD;
use dynalias::{
    Address, AliasEngine, AliasReport, AllocKind, EngineConfig, IdLookup, ThreadId, TraceRecord,
    ValueId,
};

/// Builder for record streams
#[derive(Debug, Default, Clone)]
pub struct TraceBuilder {
    records: Vec<TraceRecord>,
}

impl TraceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(mut self, id: ValueId, address: Address, size: u64, kind: AllocKind) -> Self {
        self.records.push(TraceRecord::MemAlloc {
            id,
            address,
            size,
            kind,
        });
        self
    }

    pub fn heap(self, id: ValueId, address: Address, size: u64) -> Self {
        self.alloc(id, address, size, AllocKind::Heap)
    }

    pub fn stack(self, id: ValueId, address: Address, size: u64) -> Self {
        self.alloc(id, address, size, AllocKind::Stack)
    }

    pub fn global(self, id: ValueId, address: Address, size: u64) -> Self {
        self.alloc(id, address, size, AllocKind::Global)
    }

    pub fn free(mut self, address: Address, size: u64) -> Self {
        self.records.push(TraceRecord::Free { address, size });
        self
    }

    pub fn ptr(self, value: ValueId, address: Address) -> Self {
        self.ptr_on(value, address, MAIN_THREAD)
    }

    pub fn ptr_on(mut self, value: ValueId, address: Address, thread: ThreadId) -> Self {
        self.records.push(TraceRecord::TopLevel {
            value,
            address,
            thread,
        });
        self
    }

    pub fn store(
        mut self,
        value: ValueId,
        pointer_address: Address,
        value_address: Address,
    ) -> Self {
        self.records.push(TraceRecord::Store {
            value,
            pointer_address,
            value_address,
        });
        self
    }

    pub fn enter(self, function: ValueId) -> Self {
        self.enter_on(function, MAIN_THREAD)
    }

    pub fn enter_on(mut self, function: ValueId, thread: ThreadId) -> Self {
        self.records.push(TraceRecord::Enter { function, thread });
        self
    }

    pub fn ret(self, function: ValueId) -> Self {
        self.ret_on(function, MAIN_THREAD)
    }

    pub fn ret_on(mut self, function: ValueId, thread: ThreadId) -> Self {
        self.records.push(TraceRecord::Return { function, thread });
        self
    }

    pub fn call(mut self, callee: Option<ValueId>) -> Self {
        self.records.push(TraceRecord::Call {
            callee,
            thread: MAIN_THREAD,
        });
        self
    }

    pub fn fork(mut self) -> Self {
        self.records.push(TraceRecord::Fork {
            thread: MAIN_THREAD,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn build(self) -> Vec<TraceRecord> {
        self.records
    }

    /// Records as the codecs yield them
    pub fn results(self) -> Vec<dynalias::Result<TraceRecord>> {
        self.records.into_iter().map(Ok).collect()
    }

    /// Render in the line-oriented text format
    pub fn to_text(&self) -> String {
        let mut writer = TextTraceWriter::new(Vec::new());
        for record in &self.records {
            writer.write(record).expect("write to memory");
        }
        String::from_utf8(writer.finish().expect("flush to memory")).expect("text traces are UTF-8")
    }
}

/// Replay with the default engine configuration
pub fn replay(trace: TraceBuilder) -> AliasReport {
    replay_with(EngineConfig::default(), trace)
}

pub fn replay_with(config: EngineConfig, trace: TraceBuilder) -> AliasReport {
    AliasEngine::new(config)
        .run(trace.results())
        .expect("trace replays cleanly")
}

pub fn replay_with_ids(
    config: EngineConfig,
    ids: &dyn IdLookup,
    trace: TraceBuilder,
) -> AliasReport {
    AliasEngine::new(config)
        .with_ids(ids)
        .run(trace.results())
        .expect("trace replays cleanly")
}
