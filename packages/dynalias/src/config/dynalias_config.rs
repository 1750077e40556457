//! Top-level configuration
//!
//! Bundles every section and owns YAML loading/export.

use super::engine_config::{AnalysisKind, CheckerConfig, EngineConfig};
use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigExportV1, SUPPORTED_VERSIONS};
use super::validation::Validatable;
use std::path::Path;

/// Complete dynalias configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynAliasConfig {
    pub analysis: AnalysisKind,
    pub engine: EngineConfig,
    pub checker: CheckerConfig,
}

impl DynAliasConfig {
    /// Stage override: adjust the engine section
    pub fn engine(mut self, f: impl FnOnce(EngineConfig) -> EngineConfig) -> Self {
        self.engine = f(self.engine);
        self
    }

    /// Stage override: adjust the checker section
    pub fn checker(mut self, f: impl FnOnce(CheckerConfig) -> CheckerConfig) -> Self {
        self.checker = f(self.checker);
        self
    }

    /// Builder: select the analysis variant
    pub fn analysis(mut self, kind: AnalysisKind) -> Self {
        self.analysis = kind;
        self
    }

    /// Load from a YAML file (schema v1) and validate
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse YAML text (schema v1) and validate
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        // Version check
        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let config = Self {
            analysis: export.analysis.unwrap_or_default(),
            engine: export.engine.unwrap_or_default(),
            checker: export.checker.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Export as YAML (schema v1)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let export = ConfigExportV1 {
            version: Some(1),
            analysis: Some(self.analysis),
            engine: Some(self.engine.clone()),
            checker: Some(self.checker.clone()),
        };
        serde_yaml::to_string(&export).map_err(ConfigError::Yaml)
    }
}

impl Validatable for DynAliasConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.engine.validate()?;
        self.checker.validate()?;
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "DynAliasConfig"
    }
}
