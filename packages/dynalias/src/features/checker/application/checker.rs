//! Alias Checker
//!
//! Every dynamically observed alias is ground truth. A static analysis that
//! answers NoAlias for one of them is unsound for that pair, unless the
//! baseline analysis already rules the pair out too (then the query is one
//! neither analysis is expected to get right).

use crate::config::CheckerConfig;
use crate::features::alias_report::{AliasPair, AliasReport};
use crate::features::checker::domain::{CheckReport, MissingAlias};
use crate::features::checker::ports::StaticAliasOracle;
use crate::features::ids::IdLookup;
use crate::shared::models::ValueId;
use tracing::{info, warn};

pub struct AliasChecker<'a> {
    config: CheckerConfig,
    ids: Option<&'a dyn IdLookup>,
}

impl<'a> AliasChecker<'a> {
    pub fn new(config: CheckerConfig) -> Self {
        Self { config, ids: None }
    }

    pub fn with_ids(mut self, ids: &'a dyn IdLookup) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Compare `report` against `oracle`, optionally filtered by `baseline`
    pub fn check(
        &self,
        report: &AliasReport,
        oracle: &dyn StaticAliasOracle,
        baseline: Option<&dyn StaticAliasOracle>,
    ) -> CheckReport {
        let mut result = CheckReport {
            dynamic_aliases: report.len(),
            ..CheckReport::default()
        };

        for &pair in report.pairs() {
            let (a, b) = (pair.first(), pair.second());
            let functions = (self.function_of(a), self.function_of(b));
            let intra = is_intra(functions);
            if self.config.intra_proc && !intra {
                continue;
            }
            result.checked += 1;

            let baseline_allows =
                baseline.map_or(true, |baseline| !baseline.query(a, b).is_no_alias());
            if !baseline_allows || !oracle.query(a, b).is_no_alias() {
                continue;
            }

            if self.config.skip_casts_and_phis
                && (self.is_cast_or_phi(a) || self.is_cast_or_phi(b))
            {
                result.suppressed += 1;
                continue;
            }

            result.missing.push(MissingAlias {
                pair,
                functions,
                intra,
                dereferenced: self.is_dereferenced(a) && self.is_dereferenced(b),
            });
        }

        result
            .missing
            .sort_by_key(|finding| (finding.functions, finding.pair));
        result
    }

    /// Emit findings as warnings and the summary as info
    pub fn log(&self, report: &CheckReport) {
        for finding in &report.missing {
            let lines = finding.render(self.ids, self.config.print_values);
            warn!("{}", lines.join("\n  "));
        }
        if report.passed() {
            info!(checked = report.checked, "{}", report.summary());
        } else {
            warn!(
                missing = report.missing.len(),
                checked = report.checked,
                "{}",
                report.summary()
            );
        }
    }

    fn function_of(&self, value: ValueId) -> Option<ValueId> {
        self.ids.and_then(|ids| ids.containing_function(value))
    }

    fn is_cast_or_phi(&self, value: ValueId) -> bool {
        self.ids
            .and_then(|ids| ids.value_of(value))
            .is_some_and(|info| info.is_cast_or_phi())
    }

    fn is_dereferenced(&self, value: ValueId) -> bool {
        self.ids
            .and_then(|ids| ids.value_of(value))
            .is_some_and(|info| info.dereferenced)
    }
}

/// Module-level or unknown values are compatible with any function
fn is_intra(functions: (Option<ValueId>, Option<ValueId>)) -> bool {
    match functions {
        (Some(f), Some(g)) => f == g,
        _ => true,
    }
}

/// Dynamic aliases of `report` the oracle rules out, ignoring all filters
pub fn refuted_pairs(report: &AliasReport, oracle: &dyn StaticAliasOracle) -> Vec<AliasPair> {
    report
        .pairs()
        .iter()
        .copied()
        .filter(|pair| oracle.query(pair.first(), pair.second()).is_no_alias())
        .collect()
}
