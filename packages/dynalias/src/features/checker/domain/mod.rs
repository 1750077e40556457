//! Checker findings

use crate::features::alias_report::AliasPair;
use crate::features::ids::IdLookup;
use crate::shared::models::ValueId;
use serde::{Deserialize, Serialize};

/// A dynamically observed alias the checked analysis rules out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingAlias {
    pub pair: AliasPair,
    /// Containing functions of `pair.first()` and `pair.second()`
    pub functions: (Option<ValueId>, Option<ValueId>),
    /// Both sides live in the same function (or one is module-level)
    pub intra: bool,
    /// Both sides are used as load/store addresses
    pub dereferenced: bool,
}

impl MissingAlias {
    /// Header line plus one line per side
    pub fn render(&self, ids: Option<&dyn IdLookup>, print_values: bool) -> Vec<String> {
        let header = format!(
            "Missing alias: ({}) ({})",
            if self.intra { "intra" } else { "inter" },
            if self.dereferenced { "deref" } else { "non-deref" }
        );
        let side = |id: ValueId| match (ids, print_values) {
            (Some(ids), true) => match ids.value_of(id) {
                Some(info) => format!("[{}] {}", id, info),
                None => format!("[{}]", id),
            },
            _ => format!("[{}]", id),
        };
        vec![header, side(self.pair.first()), side(self.pair.second())]
    }
}

/// Outcome of checking one analysis against a dynamic alias report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Pairs in the dynamic report
    pub dynamic_aliases: usize,
    /// Pairs actually queried (after the intra-procedural filter)
    pub checked: usize,
    /// Findings dropped because a side is a cast or phi
    pub suppressed: usize,
    /// Sorted by containing-function pair
    pub missing: Vec<MissingAlias>,
}

impl CheckReport {
    /// No dynamic alias was ruled out
    pub fn passed(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.passed() {
            format!(
                "No missing aliases ({} dynamic aliases checked)",
                self.checked
            )
        } else {
            format!("Detected {} missing aliases", self.missing.len())
        }
    }
}
