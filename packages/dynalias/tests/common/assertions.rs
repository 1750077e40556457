//! Custom assertions for alias reports

use dynalias::{AliasPair, AliasReport, ValueId};
use pretty_assertions::assert_eq;

/// Assert the report holds exactly `expected` (order and orientation free)
pub fn assert_aliases(report: &AliasReport, expected: &[(ValueId, ValueId)]) {
    let actual: Vec<(ValueId, ValueId)> = report.pairs().iter().map(|&pair| pair.into()).collect();
    let mut expected: Vec<(ValueId, ValueId)> = expected
        .iter()
        .map(|&(a, b)| AliasPair::new(a, b).into())
        .collect();
    expected.sort_unstable();
    expected.dedup();
    assert_eq!(actual, expected);
}

pub fn assert_alias(report: &AliasReport, a: ValueId, b: ValueId) {
    assert!(
        report.contains(a, b),
        "expected ({a}, {b}) to alias, report has {:?}",
        report.pairs()
    );
}

pub fn assert_no_alias(report: &AliasReport, a: ValueId, b: ValueId) {
    assert!(
        !report.contains(a, b),
        "expected ({a}, {b}) not to alias, report has {:?}",
        report.pairs()
    );
}
