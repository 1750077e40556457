//! Configuration System
//!
//! Two levels:
//! - Level 1: Defaults + builder overrides in code
//! - Level 2: YAML file (schema v1) for the CLI
//!
//! # Examples
//!
//! ```rust,ignore
//! use dynalias::config::{DynAliasConfig, AnalysisKind};
//!
//! // Level 1: defaults with an override
//! let config = DynAliasConfig::default()
//!     .engine(|c| c.context_sensitive(false));
//!
//! // Level 2: YAML
//! let config = DynAliasConfig::from_yaml("dynalias.yaml")?;
//! ```

pub mod dynalias_config;
pub mod engine_config;
pub mod error;
pub mod io;
pub mod validation;

// Re-exports
pub use dynalias_config::DynAliasConfig;
pub use engine_config::{AnalysisKind, CheckerConfig, EngineConfig, ForkPolicy};
pub use error::{ConfigError, ConfigResult};
pub use io::ConfigExportV1;
pub use validation::Validatable;
