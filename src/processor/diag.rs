use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

use super::ast::{RawNode, Token};

/// The only condition that aborts a transform outright.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("{line}:{column}: cannot transform a {kind} root; expected script, trigger or action sequence")]
    UnsupportedRoot {
        kind: &'static str,
        line: u32,
        column: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    StructuralMismatch,
    UnresolvedFunction,
    UnresolvedSymbol,
    InvalidLiteral,
    ArityOverflow,
    NestingOverflow,
    RangeWarning,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::StructuralMismatch => "structural-mismatch",
            DiagnosticCode::UnresolvedFunction => "unresolved-function",
            DiagnosticCode::UnresolvedSymbol => "unresolved-symbol",
            DiagnosticCode::InvalidLiteral => "invalid-literal",
            DiagnosticCode::ArityOverflow => "arity-overflow",
            DiagnosticCode::NestingOverflow => "nesting-overflow",
            DiagnosticCode::RangeWarning => "range-warning",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DiagnosticCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    pub first: Token,
    pub last: Token,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first.line == self.last.line && self.first.column == self.last.column {
            write!(
                f,
                "{}:{}: {} ({})",
                self.first.line,
                self.first.column,
                self.message,
                self.code
            )
        } else {
            write!(
                f,
                "{}:{}-{}:{}: {} ({})",
                self.first.line,
                self.first.column,
                self.last.line,
                self.last.column,
                self.message,
                self.code
            )
        }
    }
}

/// Append-only sink for everything a transform has to say.
///
/// Both lists keep insertion order, which is source order because the
/// traversal is left-to-right and depth-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, code: DiagnosticCode, message: impl Into<String>, at: &RawNode) {
        self.errors.push(Diagnostic {
            code,
            message: message.into(),
            first: at.first.clone(),
            last: at.last.clone(),
        });
    }

    pub fn warning(&mut self, code: DiagnosticCode, message: impl Into<String>, at: &RawNode) {
        self.warnings.push(Diagnostic {
            code,
            message: message.into(),
            first: at.first.clone(),
            last: at.last.clone(),
        });
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of errors and warnings carrying `code`.
    pub fn count(&self, code: DiagnosticCode) -> usize {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .filter(|d| d.code == code)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ast::RawKind;

    #[test]
    fn test_display_span() {
        let node = RawNode::new(RawKind::Point, vec![])
            .at(Token::new("[", 3, 10), Token::new("]", 3, 16));
        let mut diags = Diagnostics::new();
        diags.error(DiagnosticCode::InvalidLiteral, "invalid point", &node);

        let point = RawNode::literal("x").at(Token::new("x", 2, 4), Token::new("x", 2, 4));
        diags.warning(DiagnosticCode::RangeWarning, "out of range", &point);

        assert_eq!(
            diags.errors()[0].to_string(),
            "3:10-3:16: invalid point (invalid-literal)"
        );
        assert_eq!(
            diags.warnings()[0].to_string(),
            "2:4: out of range (range-warning)"
        );
        assert!(diags.has_errors());
        assert_eq!(diags.count(DiagnosticCode::RangeWarning), 1);
    }

    #[test]
    fn test_code_names_match_json() {
        let codes = [
            DiagnosticCode::StructuralMismatch,
            DiagnosticCode::UnresolvedFunction,
            DiagnosticCode::UnresolvedSymbol,
            DiagnosticCode::InvalidLiteral,
            DiagnosticCode::ArityOverflow,
            DiagnosticCode::NestingOverflow,
            DiagnosticCode::RangeWarning,
        ];
        for code in codes {
            let json = serde_json::to_value(code).unwrap();
            assert_eq!(json, serde_json::Value::from(code.to_string()));
        }
        assert_eq!(DiagnosticCode::ArityOverflow.to_string(), "arity-overflow");
    }
}
