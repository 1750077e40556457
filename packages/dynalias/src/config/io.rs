//! Configuration I/O (YAML schema)
//!
//! Defines YAML schema types. Loading and export live in `dynalias_config.rs`.

use super::engine_config::{AnalysisKind, CheckerConfig, EngineConfig};
use serde::{Deserialize, Serialize};

/// YAML Schema v1
///
/// ```yaml
/// version: 1
/// analysis: alias
/// engine:
///   context_sensitive: true
///   max_call_depth: 4096
/// checker:
///   intra_proc: true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1); optional only so that a missing
    /// field can be reported precisely
    pub version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisKind>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checker: Option<CheckerConfig>,
}

/// Supported schema versions
pub const SUPPORTED_VERSIONS: &[u32] = &[1];
