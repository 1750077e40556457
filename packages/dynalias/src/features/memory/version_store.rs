//! Address Versioning Store
//!
//! Answers "which allocation currently owns address A" in the form of a
//! version number. Addresses are reused many times during a run; the version
//! is what distinguishes pointing at the same address from pointing at the
//! same live object.

use super::interval_index::IntervalIndex;
use crate::shared::models::{Address, AddressRange, ValueId, Version};
use rustc_hash::FxHashSet;

/// A range whose previous version was overwritten by a newer allocation
pub type Superseded = (AddressRange, Version);

/// Version bookkeeping for every captured allocation
#[derive(Debug, Default)]
pub struct AddressVersionStore {
    /// Live ranges → version of the allocation occupying them
    index: IntervalIndex<Version>,

    /// Last version handed out (0 = nothing allocated yet)
    current: Version,

    /// Addresses that were targeted but never captured by an allocation record
    addresses_version_unknown: FxHashSet<Address>,

    /// Pointers that were ever observed pointing into such an address
    pointers_version_unknown: FxHashSet<ValueId>,
}

impl AddressVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new allocation over `range`
    ///
    /// Returns the fresh version and the parts of older allocations it
    /// overwrote.
    pub fn bump(&mut self, range: AddressRange) -> (Version, Vec<Superseded>) {
        self.current += 1;
        let superseded = self.index.insert(range, self.current);
        (self.current, superseded)
    }

    /// Explicit deallocation of `range`
    pub fn release(&mut self, range: AddressRange) -> Vec<Superseded> {
        self.index.remove(range)
    }

    /// Current version of `address`, `None` if no captured allocation owns it
    #[inline]
    pub fn version_of(&self, address: Address) -> Option<Version> {
        self.index.query(address).copied()
    }

    /// Allocation range and version owning `address`
    pub fn allocation_of(&self, address: Address) -> Option<(AddressRange, Version)> {
        self.index
            .query_range(address)
            .map(|(range, version)| (range, *version))
    }

    /// Record that `pointer` targeted an address with no known version
    pub fn mark_unknown(&mut self, address: Address, pointer: ValueId) {
        self.addresses_version_unknown.insert(address);
        self.pointers_version_unknown.insert(pointer);
    }

    /// Give every live range a fresh version
    ///
    /// Nothing observed before the call can share a version with anything
    /// observed after it.
    pub fn rebase_all(&mut self) -> usize {
        let mut count = 0;
        for version in self.index.values_mut() {
            self.current += 1;
            *version = self.current;
            count += 1;
        }
        count
    }

    /// Last version handed out
    #[inline]
    pub fn current_version(&self) -> Version {
        self.current
    }

    /// Number of live ranges
    #[inline]
    pub fn live_ranges(&self) -> usize {
        self.index.len()
    }

    pub fn addresses_version_unknown(&self) -> &FxHashSet<Address> {
        &self.addresses_version_unknown
    }

    pub fn pointers_version_unknown(&self) -> &FxHashSet<ValueId> {
        &self.pointers_version_unknown
    }
}
