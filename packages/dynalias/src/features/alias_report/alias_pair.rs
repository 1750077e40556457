//! Canonical alias pair

use crate::shared::models::ValueId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unordered pair of values observed aliasing
///
/// Always stored lower id first, so `(a, b)` and `(b, a)` are the same key.
/// Serialized as a two-element array and re-canonicalized on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(ValueId, ValueId)", into = "(ValueId, ValueId)")]
pub struct AliasPair {
    first: ValueId,
    second: ValueId,
}

impl AliasPair {
    #[inline]
    pub fn new(a: ValueId, b: ValueId) -> Self {
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    #[inline]
    pub fn first(&self) -> ValueId {
        self.first
    }

    #[inline]
    pub fn second(&self) -> ValueId {
        self.second
    }

    #[inline]
    pub fn contains(&self, value: ValueId) -> bool {
        self.first == value || self.second == value
    }

    /// Partner of `value` in this pair
    pub fn other(&self, value: ValueId) -> Option<ValueId> {
        if self.first == value {
            Some(self.second)
        } else if self.second == value {
            Some(self.first)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_reflexive(&self) -> bool {
        self.first == self.second
    }
}

impl From<(ValueId, ValueId)> for AliasPair {
    fn from((a, b): (ValueId, ValueId)) -> Self {
        Self::new(a, b)
    }
}

impl From<AliasPair> for (ValueId, ValueId) {
    fn from(pair: AliasPair) -> Self {
        (pair.first, pair.second)
    }
}

impl fmt::Display for AliasPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(#{}, #{})", self.first, self.second)
    }
}
