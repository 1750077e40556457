//! Alias Engine
//!
//! Owns every piece of mutable state of one pass (versions, call stacks,
//! points-to maps, discovered pairs) and applies trace records to it in
//! order. Independent engines share nothing, so tests can run as many as
//! they like side by side.
//!
//! Per record:
//! - `MemAlloc`: bump the range's version, detach pointers into the
//!   superseded allocation
//! - `Free`: unmap the range, detach pointers into it
//! - `TopLevel`: resolve the definition's invocation, point it at the
//!   versioned location, pair it with every other holder
//! - `Enter` / `Return`: context transitions; Return detaches the
//!   invocation's definitions
//! - `Fork`: context reset
//! - `Call` / `Store`: counted only

use super::stats::EngineStats;
use crate::config::{EngineConfig, ForkPolicy};
use crate::errors::Result;
use crate::features::alias_report::{AliasPair, AliasReport, AliasReporter, UnknownVersions};
use crate::features::context::{ContextError, ContextTracker};
use crate::features::ids::IdLookup;
use crate::features::memory::{AddressVersionStore, Superseded};
use crate::features::points_to::domain::{Definition, Location};
use crate::features::points_to::infrastructure::PointsToStore;
use crate::features::trace::{TraceDispatcher, TraceRecord, TraceVisitor};
use crate::shared::models::{
    Address, AddressRange, AllocKind, ThreadId, ValueId, GLOBAL_INVOCATION,
};
use tracing::{debug, info};

pub struct AliasEngine<'a> {
    config: EngineConfig,
    versions: AddressVersionStore,
    contexts: ContextTracker,
    points_to: PointsToStore,
    reporter: AliasReporter,
    ids: Option<&'a dyn IdLookup>,
    stats: EngineStats,
}

impl<'a> AliasEngine<'a> {
    pub fn new(config: EngineConfig) -> Self {
        let contexts = ContextTracker::new(config.max_call_depth);
        Self {
            config,
            versions: AddressVersionStore::new(),
            contexts,
            points_to: PointsToStore::new(),
            reporter: AliasReporter::new(),
            ids: None,
            stats: EngineStats::default(),
        }
    }

    /// Resolve containing functions through `ids`
    pub fn with_ids(mut self, ids: &'a dyn IdLookup) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Replay a whole record stream and freeze the result
    pub fn run<I>(mut self, records: I) -> Result<AliasReport>
    where
        I: IntoIterator<Item = Result<TraceRecord>>,
    {
        TraceDispatcher::new(self.config.progress_interval).replay(records, &mut self)?;
        Ok(self.finish())
    }

    // ========================================================================
    // Memory records
    // ========================================================================

    pub fn process_mem_alloc(&mut self, id: ValueId, address: Address, size: u64, kind: AllocKind) {
        self.stats.allocations += 1;

        if address == 0 {
            self.stats.rejected_allocations += 1;
            debug!(id, "allocation returned null, not recorded");
            return;
        }
        let Some(range) = AddressRange::new(address, size) else {
            self.stats.rejected_allocations += 1;
            debug!(id, address, size, "empty or wrapping allocation, not recorded");
            return;
        };
        if kind == AllocKind::Global && self.contexts.num_invocations() > 0 {
            self.stats.late_globals += 1;
            debug!(id, %range, "global allocation after the first function entry");
        }

        let (_version, superseded) = self.versions.bump(range);
        self.invalidate(superseded);
    }

    /// Size 0 frees the whole allocation starting at `address`
    pub fn process_free(&mut self, address: Address, size: u64) {
        self.stats.frees += 1;

        let range = match AddressRange::new(address, size) {
            Some(range) => Some(range),
            None => self
                .versions
                .allocation_of(address)
                .filter(|(range, _)| range.start == address)
                .map(|(range, _)| range),
        };
        let released = match range {
            Some(range) => self.versions.release(range),
            None => Vec::new(),
        };
        if released.is_empty() {
            self.stats.unmatched_frees += 1;
            return;
        }
        self.invalidate(released);
    }

    fn invalidate(&mut self, superseded: Vec<Superseded>) {
        for (range, version) in superseded {
            let detached = self.points_to.invalidate_range(range, version);
            self.stats.invalidated_definitions += detached.len() as u64;
        }
    }

    // ========================================================================
    // Pointer records
    // ========================================================================

    pub fn process_top_level(&mut self, value: ValueId, address: Address, thread: ThreadId) {
        self.stats.pointer_definitions += 1;

        let Some(d) = self.definition_for(value, thread) else {
            self.stats.stale_definitions += 1;
            debug!(value, thread, "pointer resolved to a returned invocation, ignored");
            return;
        };

        if address == 0 {
            self.points_to.remove_points_to(d);
            self.stats.null_pointers += 1;
            return;
        }

        let Some(version) = self.versions.version_of(address) else {
            // Never assert an alias through memory we did not see allocated
            self.points_to.remove_points_to(d);
            self.versions.mark_unknown(address, value);
            self.stats.unknown_version_pointers += 1;
            return;
        };

        let others = self.points_to.define_pointer(d, Location::new(address, version));
        if !d.is_global() {
            self.contexts.record_active(d.invocation, value);
        }
        self.add_alias_pairs(d, &others);
    }

    /// Versioned identity for `value` observed on `thread`
    ///
    /// `None` when the value resolves to an invocation that already returned.
    fn definition_for(&self, value: ValueId, thread: ThreadId) -> Option<Definition> {
        if !self.config.context_sensitive {
            return Some(Definition::global(value));
        }

        let info = self.ids.and_then(|ids| ids.value_of(value));
        if info.is_some_and(|info| info.is_module_level()) {
            return Some(Definition::global(value));
        }

        let containing = self.ids.and_then(|ids| ids.containing_function(value));
        let invocation = self.contexts.resolve(thread, containing);
        if invocation != GLOBAL_INVOCATION && !self.contexts.is_active(invocation) {
            return None;
        }
        Some(Definition::new(value, invocation))
    }

    pub fn add_alias_pairs(&mut self, p: Definition, qs: &[Definition]) {
        for &q in qs {
            self.add_alias_pair(p, q);
        }
    }

    /// Record `p`/`q` if their contexts are compatible
    ///
    /// Returns true when the pair was new.
    pub fn add_alias_pair(&mut self, p: Definition, q: Definition) -> bool {
        if self.config.context_sensitive
            && (self.contexts.is_outdated(p.invocation) || self.contexts.is_outdated(q.invocation))
        {
            self.stats.suppressed_pairs += 1;
            return false;
        }
        if p.value == q.value {
            return false;
        }

        let functions = [self.function_of(p), self.function_of(q)];
        self.reporter.insert(AliasPair::new(p.value, q.value), functions)
    }

    fn function_of(&self, d: Definition) -> Option<ValueId> {
        self.ids
            .and_then(|ids| ids.containing_function(d.value))
            .or_else(|| self.contexts.owner(d.invocation))
    }

    // ========================================================================
    // Context records
    // ========================================================================

    pub fn process_enter(
        &mut self,
        function: ValueId,
        thread: ThreadId,
    ) -> std::result::Result<(), ContextError> {
        self.contexts.enter(function, thread)?;
        self.stats.enters += 1;
        Ok(())
    }

    pub fn process_return(
        &mut self,
        function: ValueId,
        thread: ThreadId,
    ) -> std::result::Result<(), ContextError> {
        let retired = self.contexts.leave(function, thread)?;
        self.stats.returns += 1;
        if self.config.context_sensitive {
            let released = self
                .points_to
                .remove_invocation(retired.invocation, &retired.active_pointers);
            self.stats.released_definitions += released as u64;
        }
        Ok(())
    }

    pub fn process_fork(&mut self, thread: ThreadId) {
        self.stats.forks += 1;
        match self.config.fork_policy {
            ForkPolicy::Ignore => {}
            ForkPolicy::Reset => {
                let detached = self.points_to.len();
                self.points_to.clear();
                let rebased = self.versions.rebase_all();
                info!(thread, detached, rebased, "fork: points-to state reset");
            }
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn versions(&self) -> &AddressVersionStore {
        &self.versions
    }

    pub fn contexts(&self) -> &ContextTracker {
        &self.contexts
    }

    pub fn points_to(&self) -> &PointsToStore {
        &self.points_to
    }

    pub fn reporter(&self) -> &AliasReporter {
        &self.reporter
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// End the pass and hand out the immutable report
    pub fn finish(mut self) -> AliasReport {
        self.stats.invocations = self.contexts.num_invocations();
        self.stats.max_version = self.versions.current_version();

        let mut pointers: Vec<ValueId> = self
            .versions
            .pointers_version_unknown()
            .iter()
            .copied()
            .collect();
        pointers.sort_unstable();
        let unknown = UnknownVersions {
            addresses: self.versions.addresses_version_unknown().len(),
            pointers,
        };

        info!(
            aliases = self.reporter.len(),
            invocations = self.stats.invocations,
            versions = self.stats.max_version,
            unknown_pointers = unknown.pointers.len(),
            "alias pass finished"
        );
        self.reporter.into_report(self.stats, unknown)
    }
}

impl TraceVisitor for AliasEngine<'_> {
    fn visit_mem_alloc(
        &mut self,
        id: ValueId,
        address: Address,
        size: u64,
        kind: AllocKind,
    ) -> std::result::Result<(), ContextError> {
        self.process_mem_alloc(id, address, size, kind);
        Ok(())
    }

    fn visit_free(&mut self, address: Address, size: u64) -> std::result::Result<(), ContextError> {
        self.process_free(address, size);
        Ok(())
    }

    fn visit_top_level(
        &mut self,
        value: ValueId,
        address: Address,
        thread: ThreadId,
    ) -> std::result::Result<(), ContextError> {
        self.process_top_level(value, address, thread);
        Ok(())
    }

    fn visit_store(
        &mut self,
        _value: ValueId,
        _pointer_address: Address,
        _value_address: Address,
    ) -> std::result::Result<(), ContextError> {
        self.stats.stores += 1;
        Ok(())
    }

    fn visit_enter(
        &mut self,
        function: ValueId,
        thread: ThreadId,
    ) -> std::result::Result<(), ContextError> {
        self.process_enter(function, thread)
    }

    fn visit_return(
        &mut self,
        function: ValueId,
        thread: ThreadId,
    ) -> std::result::Result<(), ContextError> {
        self.process_return(function, thread)
    }

    fn visit_call(
        &mut self,
        _callee: Option<ValueId>,
        _thread: ThreadId,
    ) -> std::result::Result<(), ContextError> {
        self.stats.calls += 1;
        Ok(())
    }

    fn visit_fork(&mut self, thread: ThreadId) -> std::result::Result<(), ContextError> {
        self.process_fork(thread);
        Ok(())
    }
}
