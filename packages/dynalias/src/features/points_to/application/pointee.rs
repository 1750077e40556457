//! Dynamic pointer analysis
//!
//! Coarser sibling of the alias engine: instead of versioned locations it
//! tracks *which allocator* produced the memory a pointer holds. Every
//! address maps to the value that allocated it; pointer definitions and
//! stores add allocator edges.

use crate::config::AnalysisKind;
use crate::features::context::ContextError;
use crate::features::memory::IntervalIndex;
use crate::features::points_to::ports::{AliasVerdict, DynamicAnalysis};
use crate::features::trace::TraceVisitor;
use crate::shared::models::{Address, AddressRange, AllocKind, ThreadId, ValueId};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct PointeeCollector {
    /// Live ranges → allocator value
    allocators: IntervalIndex<ValueId>,
    /// Pointer (or allocator, for stored-into memory) → allocators it held
    point_tos: FxHashMap<ValueId, FxHashSet<ValueId>>,
    /// Definitions and stores whose address had no known allocator
    unresolved: u64,
}

impl PointeeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocator_of(&self, address: Address) -> Option<ValueId> {
        self.allocators.query(address).copied()
    }

    pub fn unresolved(&self) -> u64 {
        self.unresolved
    }

    fn add_edge(&mut self, from: ValueId, to: ValueId) {
        self.point_tos.entry(from).or_default().insert(to);
    }

    /// Freeze into sorted pointee sets
    pub fn finish(self) -> PointeeAnalysis {
        let point_tos = self
            .point_tos
            .into_iter()
            .map(|(pointer, set)| {
                let mut pointees: Vec<ValueId> = set.into_iter().collect();
                pointees.sort_unstable();
                (pointer, pointees)
            })
            .collect();
        debug!(unresolved = self.unresolved, "pointee collection finished");
        PointeeAnalysis {
            point_tos,
            unresolved: self.unresolved,
        }
    }
}

impl TraceVisitor for PointeeCollector {
    fn visit_mem_alloc(
        &mut self,
        id: ValueId,
        address: Address,
        size: u64,
        _kind: AllocKind,
    ) -> Result<(), ContextError> {
        if address != 0 {
            if let Some(range) = AddressRange::new(address, size) {
                self.allocators.insert(range, id);
            }
        }
        Ok(())
    }

    /// Size 0 unmaps the whole allocation starting at `address`
    fn visit_free(&mut self, address: Address, size: u64) -> Result<(), ContextError> {
        let range = match AddressRange::new(address, size) {
            Some(range) => Some(range),
            None => self
                .allocators
                .query_range(address)
                .filter(|(range, _)| range.start == address)
                .map(|(range, _)| range),
        };
        if let Some(range) = range {
            self.allocators.remove(range);
        }
        Ok(())
    }

    fn visit_top_level(
        &mut self,
        value: ValueId,
        address: Address,
        _thread: ThreadId,
    ) -> Result<(), ContextError> {
        if address == 0 {
            return Ok(());
        }
        match self.allocator_of(address) {
            Some(allocator) => self.add_edge(value, allocator),
            None => self.unresolved += 1,
        }
        Ok(())
    }

    fn visit_store(
        &mut self,
        _value: ValueId,
        pointer_address: Address,
        value_address: Address,
    ) -> Result<(), ContextError> {
        if value_address == 0 {
            return Ok(());
        }
        match (self.allocator_of(pointer_address), self.allocator_of(value_address)) {
            (Some(destination), Some(source)) => self.add_edge(destination, source),
            _ => self.unresolved += 1,
        }
        Ok(())
    }
}

/// Finished allocator-level points-to sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointeeAnalysis {
    point_tos: BTreeMap<ValueId, Vec<ValueId>>,
    unresolved: u64,
}

impl PointeeAnalysis {
    pub fn pointees_of(&self, pointer: ValueId) -> Option<&[ValueId]> {
        self.point_tos.get(&pointer).map(Vec::as_slice)
    }

    pub fn pointers(&self) -> impl Iterator<Item = ValueId> + '_ {
        self.point_tos.keys().copied()
    }

    pub fn unresolved(&self) -> u64 {
        self.unresolved
    }
}

impl DynamicAnalysis for PointeeAnalysis {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::Pointer
    }

    fn alias(&self, a: ValueId, b: ValueId) -> AliasVerdict {
        let (Some(pa), Some(pb)) = (self.pointees_of(a), self.pointees_of(b)) else {
            return AliasVerdict::NoAlias;
        };
        // Both lists are sorted
        let (mut i, mut j) = (0, 0);
        while i < pa.len() && j < pb.len() {
            match pa[i].cmp(&pb[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return AliasVerdict::MayAlias,
            }
        }
        AliasVerdict::NoAlias
    }

    fn pointees(&self, pointer: ValueId) -> Option<Vec<ValueId>> {
        self.pointees_of(pointer).map(<[ValueId]>::to_vec)
    }
}
