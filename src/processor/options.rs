//! Knobs for a transform run. Everything here is fixed for the lifetime of
//! a [`Transformer`](super::transform::Transformer).

use serde::{Deserialize, Serialize};

/// Positional IDS tables of an object target `[EA.GENERAL.RACE…]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetLayout {
    pub tables: Vec<String>,
    /// Table whose values are not range-checked against 0..=255.
    #[serde(default)]
    pub unranged: Option<String>,
}

impl TargetLayout {
    /// Baldur's Gate family (BG1, BG2, PST, IWD).
    pub fn bg() -> Self {
        Self::from_names(
            &["EA", "GENERAL", "RACE", "CLASS", "SPECIFIC", "GENDER", "ALIGN"],
            "ALIGN",
        )
    }

    /// Icewind Dale II, with its extra class and subrace columns.
    pub fn iwd2() -> Self {
        Self::from_names(
            &[
                "EA", "GENERAL", "RACE", "CLASS", "SPECIFIC", "GENDER", "ALIGN", "SUBRACE",
                "AVCLASS", "CLASSMSK",
            ],
            "CLASSMSK",
        )
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "bg" | "bg2" => Some(Self::bg()),
            "iwd2" => Some(Self::iwd2()),
            _ => None,
        }
    }

    fn from_names(tables: &[&str], unranged: &str) -> Self {
        Self {
            tables: tables.iter().map(|t| t.to_string()).collect(),
            unranged: Some(unranged.to_string()),
        }
    }

    pub fn is_ranged(&self, table: &str) -> bool {
        match &self.unranged {
            Some(t) => !t.eq_ignore_ascii_case(table),
            None => true,
        }
    }
}

impl Default for TargetLayout {
    fn default() -> Self {
        Self::bg()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Report suspicious but accepted values (long strings, non-ASCII
    /// text, out-of-range numbers).
    pub verbose: bool,
    /// Table for object identifiers such as `Myself` or `LastSeenBy`.
    pub object_table: String,
    pub target: TargetLayout,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            object_table: "OBJECT".to_string(),
            target: TargetLayout::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(TargetLayout::preset("BG2"), Some(TargetLayout::bg()));
        assert_eq!(TargetLayout::preset("iwd2").unwrap().tables.len(), 10);
        assert_eq!(TargetLayout::preset("pst"), None);
        assert!(!TargetLayout::bg().is_ranged("align"));
        assert!(TargetLayout::bg().is_ranged("EA"));
    }

    #[test]
    fn test_partial_config() {
        let opts: TransformOptions = serde_json::from_str(r#"{ "verbose": true }"#).unwrap();
        assert!(opts.verbose);
        assert_eq!(opts.object_table, "OBJECT");
        assert_eq!(opts.target, TargetLayout::bg());
    }
}
