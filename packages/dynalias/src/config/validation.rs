//! Configuration validation
//!
//! Every configuration section implements [`Validatable`]; the top-level
//! [`DynAliasConfig`](super::DynAliasConfig) validates all of them before it is
//! handed to the engine.

use super::error::ConfigResult;

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// use dynalias::config::{EngineConfig, Validatable};
///
/// fn build_engine<C: Validatable>(config: C) -> Result<(), ConfigError> {
///     config.validate()?;
///     // ... build engine
/// }
/// ```
pub trait Validatable {
    /// Validate the configuration
    ///
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}
