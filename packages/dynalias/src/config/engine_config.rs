//! Section configuration types
//!
//! One struct per concern, each with builder setters and validation.

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for `max_call_depth`
pub const MAX_CALL_DEPTH_LIMIT: usize = 1_000_000;

// ============================================================================
// Engine Configuration
// ============================================================================

/// How a `Fork` record is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForkPolicy {
    /// Detach every pointer and re-version every live range
    #[default]
    Reset,
    /// Treat the record as informational
    Ignore,
}

/// Alias engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Tag pointer definitions with their invocation id.
    /// When off, every definition lives in the global context and function
    /// returns do not detach anything.
    pub context_sensitive: bool,

    /// Abort when a thread's call stack grows past this depth (None = unlimited)
    pub max_call_depth: Option<usize>,

    /// Log progress every N records (0 = off)
    pub progress_interval: u64,

    /// Fork record handling
    pub fork_policy: ForkPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            context_sensitive: true,
            max_call_depth: None,
            progress_interval: 1_000_000,
            fork_policy: ForkPolicy::Reset,
        }
    }
}

impl EngineConfig {
    /// Builder: Set context_sensitive
    pub fn context_sensitive(mut self, v: bool) -> Self {
        self.context_sensitive = v;
        self
    }

    /// Builder: Set max_call_depth
    pub fn max_call_depth(mut self, v: Option<usize>) -> Self {
        self.max_call_depth = v;
        self
    }

    /// Builder: Set progress_interval
    pub fn progress_interval(mut self, v: u64) -> Self {
        self.progress_interval = v;
        self
    }

    /// Builder: Set fork_policy
    pub fn fork_policy(mut self, v: ForkPolicy) -> Self {
        self.fork_policy = v;
        self
    }
}

impl Validatable for EngineConfig {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(depth) = self.max_call_depth {
            if depth == 0 || depth > MAX_CALL_DEPTH_LIMIT {
                return Err(ConfigError::range_with_hint(
                    "max_call_depth",
                    depth,
                    1,
                    MAX_CALL_DEPTH_LIMIT,
                    "Use null for unlimited depth",
                ));
            }
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "EngineConfig"
    }
}

// ============================================================================
// Checker Configuration
// ============================================================================

/// Alias checker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckerConfig {
    /// The checked analysis answers intra-procedural queries only
    pub intra_proc: bool,

    /// Drop findings involving `bitcast` or `phi` values (typically redundant)
    pub skip_casts_and_phis: bool,

    /// Print value names next to ids in findings
    pub print_values: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            intra_proc: false,
            skip_casts_and_phis: true,
            print_values: true,
        }
    }
}

impl CheckerConfig {
    /// Builder: Set intra_proc
    pub fn intra_proc(mut self, v: bool) -> Self {
        self.intra_proc = v;
        self
    }

    /// Builder: Set skip_casts_and_phis
    pub fn skip_casts_and_phis(mut self, v: bool) -> Self {
        self.skip_casts_and_phis = v;
        self
    }

    /// Builder: Set print_values
    pub fn print_values(mut self, v: bool) -> Self {
        self.print_values = v;
        self
    }
}

impl Validatable for CheckerConfig {
    fn validate(&self) -> ConfigResult<()> {
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "CheckerConfig"
    }
}

// ============================================================================
// Analysis Selection
// ============================================================================

/// Which dynamic analysis answers capability queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Alias pairs observed by the engine
    #[default]
    Alias,
    /// Allocator-level points-to sets
    Pointer,
}

impl AnalysisKind {
    /// Parse analysis kind from string
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "alias" => Ok(Self::Alias),
            "pointer" => Ok(Self::Pointer),
            _ => Err(ConfigError::UnknownAnalysis(s.to_string())),
        }
    }
}

impl std::fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alias => write!(f, "alias"),
            Self::Pointer => write!(f, "pointer"),
        }
    }
}
