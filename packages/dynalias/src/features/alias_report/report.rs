//! Finished alias report
//!
//! Immutable snapshot produced once the pass completes. This is the only
//! thing external readers (the checker, the CLI) ever see of the engine.

use super::alias_pair::AliasPair;
use crate::errors::Result;
use crate::features::points_to::application::EngineStats;
use crate::shared::models::ValueId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Contents of the version-unknown escape sets at the end of the pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownVersions {
    /// Distinct addresses targeted without a captured allocation
    pub addresses: usize,
    /// Pointers ever observed targeting such an address (sorted)
    pub pointers: Vec<ValueId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliasReport {
    pairs: Vec<AliasPair>,
    by_function: BTreeMap<ValueId, Vec<AliasPair>>,
    unknown_versions: UnknownVersions,
    stats: EngineStats,
}

impl AliasReport {
    pub(crate) fn new(
        pairs: Vec<AliasPair>,
        by_function: BTreeMap<ValueId, Vec<AliasPair>>,
        stats: EngineStats,
        unknown_versions: UnknownVersions,
    ) -> Self {
        Self {
            pairs,
            by_function,
            unknown_versions,
            stats,
        }
    }

    /// All pairs, sorted
    #[inline]
    pub fn pairs(&self) -> &[AliasPair] {
        &self.pairs
    }

    /// Pairs with at least one side inside `function`, sorted
    pub fn pairs_involving_function(&self, function: ValueId) -> &[AliasPair] {
        self.by_function
            .get(&function)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Functions that have at least one indexed pair
    pub fn functions(&self) -> impl Iterator<Item = ValueId> + '_ {
        self.by_function.keys().copied()
    }

    pub fn contains(&self, a: ValueId, b: ValueId) -> bool {
        self.pairs.binary_search(&AliasPair::new(a, b)).is_ok()
    }

    /// Values observed aliasing `value`
    pub fn aliases_of(&self, value: ValueId) -> Vec<ValueId> {
        self.pairs.iter().filter_map(|pair| pair.other(value)).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn unknown_versions(&self) -> &UnknownVersions {
        &self.unknown_versions
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
