//! Identifier lookup
//!
//! Maps value ids handed out by the instrumentation step back to what they
//! stand for. Only the engine's context resolution and the checker's
//! filtering and pretty-printing need this.

use crate::errors::{DynAliasError, Result};
use crate::shared::models::ValueId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Instruction,
    Argument,
    Global,
    Function,
}

/// What a value id stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueInfo {
    pub id: ValueId,
    pub name: String,
    pub kind: ValueKind,
    /// Function containing an instruction or argument
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<ValueId>,
    /// Instruction opcode (`bitcast`, `phi`, `load`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opcode: Option<String>,
    /// Some load or store uses this value as its address
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dereferenced: bool,
}

impl ValueInfo {
    pub fn new(id: ValueId, name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            function: None,
            opcode: None,
            dereferenced: false,
        }
    }

    pub fn in_function(mut self, function: ValueId) -> Self {
        self.function = Some(function);
        self
    }

    pub fn with_opcode(mut self, opcode: impl Into<String>) -> Self {
        self.opcode = Some(opcode.into());
        self
    }

    pub fn mark_dereferenced(mut self) -> Self {
        self.dereferenced = true;
        self
    }

    /// Globals and functions live outside any invocation
    #[inline]
    pub fn is_module_level(&self) -> bool {
        matches!(self.kind, ValueKind::Global | ValueKind::Function)
    }

    pub fn is_cast_or_phi(&self) -> bool {
        matches!(self.opcode.as_deref(), Some("bitcast") | Some("phi"))
    }
}

impl fmt::Display for ValueInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValueKind::Global | ValueKind::Function => write!(f, "@{}", self.name),
            ValueKind::Instruction | ValueKind::Argument => write!(f, "%{}", self.name),
        }
    }
}

/// Bidirectional value lookup
pub trait IdLookup {
    fn value_of(&self, id: ValueId) -> Option<&ValueInfo>;

    fn id_of(&self, name: &str) -> Option<ValueId>;

    /// Function a value belongs to; functions contain themselves
    fn containing_function(&self, id: ValueId) -> Option<ValueId> {
        let info = self.value_of(id)?;
        match info.kind {
            ValueKind::Function => Some(info.id),
            ValueKind::Global => None,
            ValueKind::Instruction | ValueKind::Argument => info.function,
        }
    }

    /// `#id` plus the value's printed form when known
    fn describe(&self, id: ValueId) -> String {
        match self.value_of(id) {
            Some(info) => format!("#{} {}", id, info),
            None => format!("#{}", id),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IdTableFile {
    values: Vec<ValueInfo>,
}

/// In-memory [`IdLookup`] loaded from JSON
///
/// ```json
/// {"values": [{"id": 1, "name": "main", "kind": "function"},
///             {"id": 2, "name": "p", "kind": "instruction", "function": 1}]}
/// ```
#[derive(Debug, Default, Clone)]
pub struct IdTable {
    by_id: FxHashMap<ValueId, ValueInfo>,
    by_name: FxHashMap<String, ValueId>,
}

impl IdTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list of values; ids must be unique
    pub fn from_values(values: impl IntoIterator<Item = ValueInfo>) -> Result<Self> {
        let mut table = Self::new();
        for info in values {
            table.insert(info)?;
        }
        Ok(table)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: IdTableFile =
            serde_json::from_str(json).map_err(|e| DynAliasError::IdTable(e.to_string()))?;
        Self::from_values(file.values)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
            .map_err(|e| DynAliasError::IdTable(format!("{}: {}", path.display(), e)))
    }

    pub fn insert(&mut self, info: ValueInfo) -> Result<()> {
        if self.by_id.contains_key(&info.id) {
            return Err(DynAliasError::IdTable(format!("duplicate value id {}", info.id)));
        }
        // Names may repeat across functions; the first one wins for id_of
        self.by_name.entry(info.name.clone()).or_insert(info.id);
        self.by_id.insert(info.id, info);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValueInfo> + '_ {
        self.by_id.values()
    }
}

impl IdLookup for IdTable {
    fn value_of(&self, id: ValueId) -> Option<&ValueInfo> {
        self.by_id.get(&id)
    }

    fn id_of(&self, name: &str) -> Option<ValueId> {
        self.by_name.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{"values": [
        {"id": 1, "name": "main", "kind": "function"},
        {"id": 2, "name": "p", "kind": "instruction", "function": 1, "opcode": "alloca",
         "dereferenced": true},
        {"id": 3, "name": "q", "kind": "instruction", "function": 1, "opcode": "bitcast"},
        {"id": 4, "name": "argv", "kind": "argument", "function": 1},
        {"id": 5, "name": "table", "kind": "global"}
    ]}"#;

    #[test]
    fn test_load_and_lookup() {
        let table = IdTable::from_json_str(JSON).unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.id_of("argv"), Some(4));
        assert_eq!(table.value_of(2).map(|v| v.name.as_str()), Some("p"));
        assert_eq!(table.describe(5), "#5 @table");
        assert_eq!(table.describe(99), "#99");
    }

    #[test]
    fn test_containing_function() {
        let table = IdTable::from_json_str(JSON).unwrap();
        assert_eq!(table.containing_function(1), Some(1));
        assert_eq!(table.containing_function(2), Some(1));
        assert_eq!(table.containing_function(4), Some(1));
        assert_eq!(table.containing_function(5), None);
        assert_eq!(table.containing_function(42), None);
    }

    #[test]
    fn test_value_classification() {
        let table = IdTable::from_json_str(JSON).unwrap();
        assert!(table.value_of(3).unwrap().is_cast_or_phi());
        assert!(!table.value_of(2).unwrap().is_cast_or_phi());
        assert!(table.value_of(5).unwrap().is_module_level());
        assert!(!table.value_of(4).unwrap().is_module_level());
        assert!(table.value_of(2).unwrap().dereferenced);
        assert!(!table.value_of(3).unwrap().dereferenced);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = IdTable::from_values(vec![
            ValueInfo::new(1, "a", ValueKind::Global),
            ValueInfo::new(1, "b", ValueKind::Global),
        ]);
        assert!(matches!(result, Err(DynAliasError::IdTable(_))));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            IdTable::from_json_str("{\"values\": 3}"),
            Err(DynAliasError::IdTable(_))
        ));
    }
}
