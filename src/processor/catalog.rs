//! Trigger/action signature catalog.
//!
//! The catalog is read-only after loading. The transformer only sees it
//! through [`SignatureCatalog`], so tests can hand in a tiny fake.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Trigger,
    Action,
}

impl FunctionKind {
    pub fn table_name(self) -> &'static str {
        match self {
            FunctionKind::Trigger => "TRIGGER",
            FunctionKind::Action => "ACTION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Integer,
    String,
    Point,
    Object,
    Trigger,
    Action,
}

/// One formal parameter slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDescriptor {
    #[serde(rename = "type")]
    pub ty: ParamType,
    #[serde(default)]
    pub name: String,
    /// IDS table used to resolve symbolic integers. Empty when none.
    #[serde(default)]
    pub table: String,
}

impl ParamDescriptor {
    pub fn new(ty: ParamType, name: &str, table: &str) -> Self {
        Self {
            ty,
            name: name.to_string(),
            table: table.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
}

impl FunctionDescriptor {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    pub fn param(&self, index: usize) -> Option<&ParamDescriptor> {
        self.params.get(index)
    }
}

pub trait SignatureCatalog: Sync {
    /// Look up `name` in the trigger or action table. `exact` demands a
    /// byte-equal canonical name; otherwise matching is case-insensitive
    /// and tolerates an unambiguous prefix.
    fn lookup(&self, kind: FunctionKind, name: &str, exact: bool) -> Option<&FunctionDescriptor>;
}

/// In-memory catalog, usually deserialized from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Signatures {
    #[serde(default)]
    pub triggers: Vec<FunctionDescriptor>,
    #[serde(default)]
    pub actions: Vec<FunctionDescriptor>,
}

impl Signatures {
    fn table(&self, kind: FunctionKind) -> &[FunctionDescriptor] {
        match kind {
            FunctionKind::Trigger => &self.triggers,
            FunctionKind::Action => &self.actions,
        }
    }
}

impl SignatureCatalog for Signatures {
    fn lookup(&self, kind: FunctionKind, name: &str, exact: bool) -> Option<&FunctionDescriptor> {
        let table = self.table(kind);
        if exact {
            return table.iter().find(|f| f.name == name);
        }

        if let Some(f) = table.iter().find(|f| f.name.eq_ignore_ascii_case(name)) {
            return Some(f);
        }

        if name.is_empty() {
            return None;
        }
        let needle = name.to_ascii_lowercase();
        let mut candidates = table
            .iter()
            .filter(|f| f.name.to_ascii_lowercase().starts_with(&needle));
        match (candidates.next(), candidates.next()) {
            (Some(f), None) => Some(f),
            _ => None,
        }
    }
}
