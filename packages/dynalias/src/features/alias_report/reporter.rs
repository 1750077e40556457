//! Alias Reporter
//!
//! Append-only set of observed alias pairs with a per-function index.
//! Nothing is ever removed: an observed alias stays observed.

use super::alias_pair::AliasPair;
use super::report::{AliasReport, UnknownVersions};
use crate::features::points_to::application::EngineStats;
use crate::shared::models::ValueId;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct AliasReporter {
    pairs: FxHashSet<AliasPair>,
    by_function: FxHashMap<ValueId, FxHashSet<AliasPair>>,
}

impl AliasReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `pair`, indexing it under each known containing function
    ///
    /// Returns true the first time the pair is seen. Reflexive pairs are
    /// rejected.
    pub fn insert(&mut self, pair: AliasPair, functions: [Option<ValueId>; 2]) -> bool {
        if pair.is_reflexive() {
            return false;
        }
        for function in functions.into_iter().flatten() {
            self.by_function.entry(function).or_default().insert(pair);
        }
        self.pairs.insert(pair)
    }

    pub fn all(&self) -> impl Iterator<Item = &AliasPair> + '_ {
        self.pairs.iter()
    }

    /// Pairs with at least one side inside `function`
    pub fn pairs_involving_function(
        &self,
        function: ValueId,
    ) -> impl Iterator<Item = &AliasPair> + '_ {
        self.by_function.get(&function).into_iter().flatten()
    }

    #[inline]
    pub fn contains(&self, a: ValueId, b: ValueId) -> bool {
        self.pairs.contains(&AliasPair::new(a, b))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Freeze into the immutable snapshot handed to consumers
    pub fn into_report(self, stats: EngineStats, unknown: UnknownVersions) -> AliasReport {
        let mut pairs: Vec<AliasPair> = self.pairs.into_iter().collect();
        pairs.sort_unstable();

        let by_function: BTreeMap<ValueId, Vec<AliasPair>> = self
            .by_function
            .into_iter()
            .map(|(function, set)| {
                let mut list: Vec<AliasPair> = set.into_iter().collect();
                list.sort_unstable();
                (function, list)
            })
            .collect();

        AliasReport::new(pairs, by_function, stats, unknown)
    }
}
