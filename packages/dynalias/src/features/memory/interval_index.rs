//! Interval Index
//!
//! Maps disjoint half-open address ranges to a payload.
//!
//! Inserting a range evicts whatever occupied it before: overlapped entries are
//! truncated (or split in two when the new range lands in their middle), so the
//! last writer always owns an address. Both `insert` and `remove` hand back the
//! evicted portions, which lets callers learn exactly which payloads were
//! superseded and where.
//!
//! # Complexity
//! - `query`: O(log n)
//! - `insert` / `remove`: O(log n + k), k = number of entries touched

use crate::shared::models::{Address, AddressRange};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Slot<T> {
    end: Address,
    value: T,
}

/// Disjoint range map keyed by range start
#[derive(Debug, Clone)]
pub struct IntervalIndex<T> {
    /// start → (end, payload); ranges never overlap
    entries: BTreeMap<Address, Slot<T>>,
}

impl<T> Default for IntervalIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> IntervalIndex<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Payload of the range containing `address`
    #[inline]
    pub fn query(&self, address: Address) -> Option<&T> {
        self.query_range(address).map(|(_, value)| value)
    }

    /// Range containing `address` together with its payload
    pub fn query_range(&self, address: Address) -> Option<(AddressRange, &T)> {
        let (&start, slot) = self.entries.range(..=address).next_back()?;
        if address < slot.end {
            Some((AddressRange { start, end: slot.end }, &slot.value))
        } else {
            None
        }
    }

    /// All entries intersecting `range`, in address order
    pub fn overlapping(&self, range: AddressRange) -> Vec<(AddressRange, &T)> {
        self.overlapping_starts(range)
            .into_iter()
            .filter_map(|start| {
                self.entries
                    .get(&start)
                    .map(|slot| (AddressRange { start, end: slot.end }, &slot.value))
            })
            .collect()
    }

    /// Iterate entries in address order
    pub fn iter(&self) -> impl Iterator<Item = (AddressRange, &T)> + '_ {
        self.entries
            .iter()
            .map(|(&start, slot)| (AddressRange { start, end: slot.end }, &slot.value))
    }

    /// Mutable access to every payload (ranges stay fixed)
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.entries.values_mut().map(|slot| &mut slot.value)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Starts of entries intersecting `range`
    ///
    /// Only the last entry starting before `range.start` can reach into it,
    /// since entries are disjoint.
    fn overlapping_starts(&self, range: AddressRange) -> Vec<Address> {
        let mut starts = Vec::new();
        if let Some((&start, slot)) = self.entries.range(..range.start).next_back() {
            if slot.end > range.start {
                starts.push(start);
            }
        }
        starts.extend(self.entries.range(range.start..range.end).map(|(&s, _)| s));
        starts
    }
}

impl<T: Clone> IntervalIndex<T> {
    /// Map `range` to `value`, evicting previous occupants
    ///
    /// Returns the evicted portions (clipped to `range`) with their payloads.
    pub fn insert(&mut self, range: AddressRange, value: T) -> Vec<(AddressRange, T)> {
        let evicted = self.remove(range);
        self.entries.insert(
            range.start,
            Slot {
                end: range.end,
                value,
            },
        );
        evicted
    }

    /// Unmap `range`
    ///
    /// Parts of overlapped entries outside `range` keep their payload.
    /// Returns the removed portions (clipped to `range`) with their payloads.
    pub fn remove(&mut self, range: AddressRange) -> Vec<(AddressRange, T)> {
        let mut removed = Vec::new();

        for start in self.overlapping_starts(range) {
            let Some(slot) = self.entries.remove(&start) else {
                continue;
            };
            let existing = AddressRange {
                start,
                end: slot.end,
            };

            // Keep the parts sticking out on either side
            if start < range.start {
                self.entries.insert(
                    start,
                    Slot {
                        end: range.start,
                        value: slot.value.clone(),
                    },
                );
            }
            if slot.end > range.end {
                self.entries.insert(
                    range.end,
                    Slot {
                        end: slot.end,
                        value: slot.value.clone(),
                    },
                );
            }

            if let Some(cut) = existing.intersection(&range) {
                removed.push((cut, slot.value));
            }
        }

        removed
    }
}
