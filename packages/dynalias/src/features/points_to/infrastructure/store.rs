//! Points-To Store
//!
//! Two ownership-free index maps kept in lockstep:
//! - `points_to`: Definition → Location it currently holds
//! - `pointed_by`: Location → every Definition currently holding it
//!
//! A third index, version → addresses with holders, lets a reallocation find
//! the affected targets without scanning the whole store.
//!
//! # Invariants
//! - `d ∈ pointed_by[l]` ⇔ `points_to[d] == l`
//! - `pointed_by` never holds an empty set
//! - `targets_by_version[v]` contains `a` ⇔ `pointed_by` has key `(a, v)`

use crate::features::points_to::domain::{Definition, Location};
use crate::shared::models::{Address, AddressRange, InvocationId, ValueId, Version};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;

#[derive(Debug, Default)]
pub struct PointsToStore {
    points_to: FxHashMap<Definition, Location>,
    pointed_by: FxHashMap<Location, FxHashSet<Definition>>,
    targets_by_version: FxHashMap<Version, BTreeSet<Address>>,
}

impl PointsToStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point `d` at `loc`, detaching whatever it held before
    ///
    /// Returns the other definitions already pointing at `loc`, which are
    /// exactly the alias candidates of the new definition.
    pub fn define_pointer(&mut self, d: Definition, loc: Location) -> Vec<Definition> {
        self.remove_points_to(d);

        let holders = self.pointed_by.entry(loc).or_default();
        let others: Vec<Definition> = holders.iter().copied().collect();
        holders.insert(d);

        self.points_to.insert(d, loc);
        self.targets_by_version
            .entry(loc.version)
            .or_default()
            .insert(loc.address);
        others
    }

    /// Detach `d` from its current location, if any
    pub fn remove_points_to(&mut self, d: Definition) -> Option<Location> {
        let loc = self.points_to.remove(&d)?;
        self.unlink(d, loc);
        Some(loc)
    }

    /// Bulk form for a returning invocation
    ///
    /// Returns how many definitions were actually detached.
    pub fn remove_invocation(&mut self, invocation: InvocationId, values: &[ValueId]) -> usize {
        values
            .iter()
            .filter(|&&value| {
                self.remove_points_to(Definition::new(value, invocation))
                    .is_some()
            })
            .count()
    }

    /// Detach every definition targeting `range` in allocation `version`
    ///
    /// Called when that part of the allocation was reallocated or freed. The
    /// definitions themselves survive and may be redefined later.
    pub fn invalidate_range(&mut self, range: AddressRange, version: Version) -> Vec<Definition> {
        let hit: Vec<Address> = match self.targets_by_version.get_mut(&version) {
            Some(addresses) => {
                let hit: Vec<Address> = addresses.range(range.start..range.end).copied().collect();
                for address in &hit {
                    addresses.remove(address);
                }
                if addresses.is_empty() {
                    self.targets_by_version.remove(&version);
                }
                hit
            }
            None => return Vec::new(),
        };

        let mut detached = Vec::new();
        for address in hit {
            if let Some(holders) = self.pointed_by.remove(&Location::new(address, version)) {
                for d in holders {
                    self.points_to.remove(&d);
                    detached.push(d);
                }
            }
        }
        detached
    }

    /// Location `d` currently holds
    #[inline]
    pub fn points_to(&self, d: Definition) -> Option<Location> {
        self.points_to.get(&d).copied()
    }

    /// Definitions currently holding `loc`
    pub fn pointed_by(&self, loc: Location) -> Option<&FxHashSet<Definition>> {
        self.pointed_by.get(&loc)
    }

    /// Whether any definition of `invocation` is still installed
    pub fn has_invocation(&self, invocation: InvocationId) -> bool {
        self.points_to.keys().any(|d| d.invocation == invocation)
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&Definition, &Location)> + '_ {
        self.points_to.iter()
    }

    /// Number of installed definitions
    #[inline]
    pub fn len(&self) -> usize {
        self.points_to.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points_to.is_empty()
    }

    /// Number of distinct targeted locations
    pub fn location_count(&self) -> usize {
        self.pointed_by.len()
    }

    pub fn clear(&mut self) {
        self.points_to.clear();
        self.pointed_by.clear();
        self.targets_by_version.clear();
    }

    fn unlink(&mut self, d: Definition, loc: Location) {
        let Some(holders) = self.pointed_by.get_mut(&loc) else {
            return;
        };
        holders.remove(&d);
        if !holders.is_empty() {
            return;
        }
        self.pointed_by.remove(&loc);
        if let Some(addresses) = self.targets_by_version.get_mut(&loc.version) {
            addresses.remove(&loc.address);
            if addresses.is_empty() {
                self.targets_by_version.remove(&loc.version);
            }
        }
    }
}
