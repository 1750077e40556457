//! Static alias results loaded from JSON
//!
//! ```json
//! {
//!   "default": "may_alias",
//!   "pairs": [{"a": 1, "b": 2, "verdict": "no_alias"}]
//! }
//! ```

use crate::errors::{DynAliasError, Result};
use crate::features::alias_report::AliasPair;
use crate::features::checker::ports::StaticAliasOracle;
use crate::features::points_to::ports::AliasVerdict;
use crate::shared::models::ValueId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableEntry {
    a: ValueId,
    b: ValueId,
    verdict: AliasVerdict,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct AliasTableFile {
    #[serde(default = "default_verdict")]
    default: AliasVerdict,
    #[serde(default)]
    pairs: Vec<TableEntry>,
}

fn default_verdict() -> AliasVerdict {
    AliasVerdict::MayAlias
}

/// Explicit verdicts per pair, with a fallback for everything unlisted
#[derive(Debug, Clone)]
pub struct AliasTable {
    default: AliasVerdict,
    entries: FxHashMap<AliasPair, AliasVerdict>,
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::new(default_verdict())
    }
}

impl AliasTable {
    pub fn new(default: AliasVerdict) -> Self {
        Self {
            default,
            entries: FxHashMap::default(),
        }
    }

    /// Set the verdict for `(a, b)`; order does not matter
    pub fn set(&mut self, a: ValueId, b: ValueId, verdict: AliasVerdict) -> &mut Self {
        self.entries.insert(AliasPair::new(a, b), verdict);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: AliasTableFile = serde_json::from_str(json)?;
        let mut table = Self::new(file.default);
        for entry in file.pairs {
            table.set(entry.a, entry.b, entry.verdict);
        }
        Ok(table)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
            .map_err(|e| DynAliasError::Serialization(format!("{}: {}", path.display(), e)))
    }

    pub fn default_verdict(&self) -> AliasVerdict {
        self.default
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StaticAliasOracle for AliasTable {
    fn query(&self, a: ValueId, b: ValueId) -> AliasVerdict {
        self.entries
            .get(&AliasPair::new(a, b))
            .copied()
            .unwrap_or(self.default)
    }
}
