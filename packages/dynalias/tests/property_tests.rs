//! Property-based tests for the alias engine
//!
//! Tests invariants that should hold for ALL traces:
//! - Version monotonicity: reallocating an address always raises its version
//! - Non-overlap: the interval index never holds two overlapping ranges
//! - Canonicalization idempotence: (a, b) and (b, a) are one pair
//! - Bulk cleanup completeness: a returned invocation owns no definitions
//! - Model agreement: pairs match a naive slot/generation model

use dynalias::features::alias_report::AliasReporter;
use dynalias::features::memory::{AddressVersionStore, IntervalIndex};
use dynalias::{AddressRange, AliasEngine, AliasPair, AllocKind, EngineConfig, EngineStats};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

fn range_strategy() -> impl Strategy<Value = AddressRange> {
    (0u64..64, 1u64..16).prop_map(|(start, size)| {
        AddressRange::new(0x1000 + start * 4, size * 4).expect("non-empty range")
    })
}

// ============================================================================
// Memory
// ============================================================================

proptest! {
    #[test]
    fn prop_version_monotonic(ranges in prop::collection::vec(range_strategy(), 1..40)) {
        let mut store = AddressVersionStore::new();
        let mut seen = HashMap::new();

        for range in ranges {
            let (version, _) = store.bump(range);
            for address in [range.start, range.end - 1] {
                let current = store.version_of(address);
                prop_assert_eq!(current, Some(version));
                if let Some(previous) = seen.insert(address, version) {
                    prop_assert!(version > previous);
                }
            }
        }
    }

    #[test]
    fn prop_interval_index_never_overlaps(
        ops in prop::collection::vec((range_strategy(), any::<bool>()), 1..40)
    ) {
        let mut index = IntervalIndex::new();

        for (i, (range, insert)) in ops.into_iter().enumerate() {
            if insert {
                index.insert(range, i);
                prop_assert_eq!(index.query(range.start), Some(&i));
                prop_assert_eq!(index.query(range.end - 1), Some(&i));
            } else {
                index.remove(range);
                prop_assert!(index.overlapping(range).is_empty());
            }

            let ranges: Vec<AddressRange> = index.iter().map(|(r, _)| r).collect();
            for pair in ranges.windows(2) {
                prop_assert!(pair[0].end <= pair[1].start, "{} overlaps {}", pair[0], pair[1]);
            }
        }
    }
}

// ============================================================================
// Reporter
// ============================================================================

proptest! {
    #[test]
    fn prop_pair_canonicalization(a in 0u32..1000, b in 0u32..1000) {
        prop_assume!(a != b);
        let mut reporter = AliasReporter::new();

        prop_assert!(reporter.insert(AliasPair::new(a, b), [None, None]));
        prop_assert!(!reporter.insert(AliasPair::new(b, a), [None, None]));
        prop_assert_eq!(reporter.len(), 1);
        prop_assert_eq!(AliasPair::new(a, b), AliasPair::new(b, a));
        prop_assert!(AliasPair::new(a, b).first() < AliasPair::new(a, b).second());
    }
}

// ============================================================================
// Engine
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Enter(u32),
    Return,
    Ptr(u32, u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (10u32..13).prop_map(Op::Enter),
        Just(Op::Return),
        (1u32..6, 0u64..4).prop_map(|(value, slot)| Op::Ptr(value, 0x1000 + slot * 8)),
    ]
}

proptest! {
    #[test]
    fn prop_return_releases_invocation(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut engine = AliasEngine::new(EngineConfig::default());
        engine.process_mem_alloc(100, 0x1000, 32, AllocKind::Heap);
        let mut stack = Vec::new();

        for op in ops {
            match op {
                Op::Enter(function) => {
                    engine.process_enter(function, 0).unwrap();
                    stack.push(function);
                }
                Op::Return => {
                    // Unbalanced returns are fatal; the generator just skips them
                    let Some(function) = stack.pop() else { continue };
                    let invocation = engine.contexts().current(0);
                    engine.process_return(function, 0).unwrap();
                    prop_assert!(!engine.points_to().has_invocation(invocation));
                    prop_assert!(engine.contexts().is_outdated(invocation));
                }
                Op::Ptr(value, address) => engine.process_top_level(value, address, 0),
            }
        }
    }
}

#[derive(Debug, Clone)]
enum MemOp {
    Alloc(u64),
    Free(u64),
    Ptr(u32, u64),
}

const SLOT: u64 = 0x100;

fn mem_op_strategy() -> impl Strategy<Value = MemOp> {
    prop_oneof![
        (0u64..4).prop_map(MemOp::Alloc),
        (0u64..4).prop_map(MemOp::Free),
        (1u32..8, 0u64..4).prop_map(|(value, slot)| MemOp::Ptr(value, slot)),
        (1u32..8, 0u64..4).prop_map(|(value, slot)| MemOp::Ptr(value, slot)),
    ]
}

/// Each slot is one fixed-size object; a generation per slot stands in for the version
fn model_pairs(ops: &[MemOp]) -> BTreeSet<(u32, u32)> {
    let mut generation: HashMap<u64, u64> = HashMap::new();
    let mut next = 0;
    let mut points: HashMap<u32, (u64, u64)> = HashMap::new();
    let mut pairs = BTreeSet::new();

    for op in ops {
        match *op {
            MemOp::Alloc(slot) => {
                next += 1;
                generation.insert(slot, next);
            }
            MemOp::Free(slot) => {
                generation.remove(&slot);
            }
            MemOp::Ptr(value, slot) => match generation.get(&slot) {
                None => {
                    points.remove(&value);
                }
                Some(&g) => {
                    points.insert(value, (slot, g));
                    for (&other, &target) in &points {
                        if other != value && target == (slot, g) {
                            pairs.insert((value.min(other), value.max(other)));
                        }
                    }
                }
            },
        }
    }
    pairs
}

proptest! {
    #[test]
    fn prop_engine_matches_slot_model(ops in prop::collection::vec(mem_op_strategy(), 1..80)) {
        let mut engine = AliasEngine::new(EngineConfig::default());
        for op in &ops {
            match *op {
                MemOp::Alloc(slot) => {
                    engine.process_mem_alloc(100, 0x1000 + slot * SLOT, SLOT, AllocKind::Heap)
                }
                MemOp::Free(slot) => engine.process_free(0x1000 + slot * SLOT, SLOT),
                MemOp::Ptr(value, slot) => engine.process_top_level(value, 0x1000 + slot * SLOT, 0),
            }
        }
        let report = engine.finish();

        let actual: BTreeSet<(u32, u32)> = report.pairs().iter().map(|&pair| pair.into()).collect();
        prop_assert_eq!(actual, model_pairs(&ops));

        let stats: &EngineStats = report.stats();
        prop_assert_eq!(stats.records(), ops.len() as u64);
    }
}
