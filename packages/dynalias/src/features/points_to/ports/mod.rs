//! Ports for dynamic analysis results
//!
//! Both finished analyses answer the same two questions, so consumers (the
//! checker, the CLI) work against [`DynamicAnalysis`] and never care which
//! variant configuration picked.

use crate::config::AnalysisKind;
use crate::features::alias_report::AliasReport;
use crate::shared::models::ValueId;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Verdicts
// ============================================================================

/// Answer to "may these two values alias?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasVerdict {
    NoAlias,
    MayAlias,
    PartialAlias,
    MustAlias,
}

impl AliasVerdict {
    #[inline]
    pub fn is_no_alias(&self) -> bool {
        matches!(self, Self::NoAlias)
    }
}

impl fmt::Display for AliasVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NoAlias => "NoAlias",
            Self::MayAlias => "MayAlias",
            Self::PartialAlias => "PartialAlias",
            Self::MustAlias => "MustAlias",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Capability
// ============================================================================

/// Capability shared by every finished dynamic analysis
pub trait DynamicAnalysis {
    fn kind(&self) -> AnalysisKind;

    /// Whether `a` and `b` were observed aliasing
    fn alias(&self, a: ValueId, b: ValueId) -> AliasVerdict;

    /// Values `pointer` was observed pointing to, if this analysis tracks them
    fn pointees(&self, pointer: ValueId) -> Option<Vec<ValueId>>;
}

/// [`DynamicAnalysis`] view over an alias report
#[derive(Debug, Clone)]
pub struct AliasAnalysisView {
    report: AliasReport,
}

impl AliasAnalysisView {
    pub fn new(report: AliasReport) -> Self {
        Self { report }
    }

    pub fn report(&self) -> &AliasReport {
        &self.report
    }

    pub fn into_report(self) -> AliasReport {
        self.report
    }
}

impl DynamicAnalysis for AliasAnalysisView {
    fn kind(&self) -> AnalysisKind {
        AnalysisKind::Alias
    }

    fn alias(&self, a: ValueId, b: ValueId) -> AliasVerdict {
        if a == b {
            AliasVerdict::MustAlias
        } else if self.report.contains(a, b) {
            AliasVerdict::MayAlias
        } else {
            AliasVerdict::NoAlias
        }
    }

    fn pointees(&self, _pointer: ValueId) -> Option<Vec<ValueId>> {
        None
    }
}
