//! IDS symbol tables.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub trait SymbolResolver: Sync {
    /// Resolve `symbol` in `table`. `None` when the table or the symbol is
    /// unknown; use [`SymbolResolver::has_table`] to tell the two apart.
    fn lookup(&self, table: &str, symbol: &str, exact: bool) -> Option<i64>;

    fn has_table(&self, table: &str) -> bool;

    /// Tables flagged case-sensitive always match exactly.
    fn is_case_sensitive(&self, table: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdsEntry {
    pub value: i64,
    pub symbol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdsTable {
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub entries: Vec<IdsEntry>,
}

impl IdsTable {
    pub fn from_pairs(pairs: &[(i64, &str)]) -> Self {
        Self {
            case_sensitive: false,
            entries: pairs
                .iter()
                .map(|&(value, symbol)| IdsEntry {
                    value,
                    symbol: symbol.to_string(),
                })
                .collect(),
        }
    }

    pub fn find(&self, symbol: &str, exact: bool) -> Option<i64> {
        if exact || self.case_sensitive {
            return self
                .entries
                .iter()
                .find(|e| e.symbol == symbol)
                .map(|e| e.value);
        }

        if let Some(e) = self
            .entries
            .iter()
            .find(|e| e.symbol.eq_ignore_ascii_case(symbol))
        {
            return Some(e.value);
        }

        // Entries like `Global(S:Name*,S:Area*,I:Value*)` match on the bare name.
        self.entries
            .iter()
            .find(|e| match e.symbol.split_once('(') {
                Some((head, _)) => head.trim().eq_ignore_ascii_case(symbol),
                None => false,
            })
            .map(|e| e.value)
    }
}

/// All loaded tables, keyed by upper-case table name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdsTables {
    tables: HashMap<String, IdsTable>,
}

impl IdsTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, table: IdsTable) {
        self.tables.insert(name.to_ascii_uppercase(), table);
    }

    pub fn get(&self, name: &str) -> Option<&IdsTable> {
        self.tables.get(&name.to_ascii_uppercase())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Re-key after deserialization so lookups stay case-insensitive.
    pub fn normalized(self) -> Self {
        let mut out = Self::new();
        for (name, table) in self.tables {
            out.insert(&name, table);
        }
        out
    }
}

impl SymbolResolver for IdsTables {
    fn lookup(&self, table: &str, symbol: &str, exact: bool) -> Option<i64> {
        self.get(table)?.find(symbol, exact)
    }

    fn has_table(&self, table: &str) -> bool {
        self.get(table).is_some()
    }

    fn is_case_sensitive(&self, table: &str) -> bool {
        self.get(table).is_some_and(|t| t.case_sensitive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> IdsTables {
        let mut t = IdsTables::new();
        t.insert(
            "ea",
            IdsTable::from_pairs(&[(2, "PC"), (255, "ENEMY"), (128, "NEUTRAL")]),
        );
        t.insert(
            "Trigger",
            IdsTable::from_pairs(&[(0x400F, "Global(S:Name*,S:Area*,I:Value*)")]),
        );
        let mut strict = IdsTable::from_pairs(&[(1, "Foo")]);
        strict.case_sensitive = true;
        t.insert("STRICT", strict);
        t
    }

    #[test]
    fn test_lookup() {
        let t = tables();
        let test_cases = vec![
            ("EA", "PC", false, Some(2)),
            ("ea", "enemy", false, Some(255)),
            ("EA", "enemy", true, None),
            ("EA", "ENEMY", true, Some(255)),
            ("TRIGGER", "global", false, Some(0x400F)),
            ("TRIGGER", "Global", true, None),
            ("STRICT", "foo", false, None),
            ("STRICT", "Foo", false, Some(1)),
            ("MISSING", "PC", false, None),
        ];

        for (table, symbol, exact, expected) in test_cases {
            assert_eq!(
                t.lookup(table, symbol, exact),
                expected,
                "{table}:{symbol} exact={exact}"
            );
        }
    }

    #[test]
    fn test_table_predicates() {
        let t = tables();
        assert!(t.has_table("Ea"));
        assert!(!t.has_table("RACE"));
        assert!(t.is_case_sensitive("strict"));
        assert!(!t.is_case_sensitive("EA"));
        assert!(!t.is_case_sensitive("RACE"));
    }

    #[test]
    fn test_deserialize_normalizes_names() {
        let json = r#"{ "gender": { "entries": [ { "value": 1, "symbol": "MALE" } ] } }"#;
        let t: IdsTables = serde_json::from_str(json).unwrap();
        let t = t.normalized();
        assert_eq!(t.len(), 1);
        assert_eq!(t.lookup("GENDER", "male", false), Some(1));
    }
}
