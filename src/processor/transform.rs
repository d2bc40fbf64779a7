//! Lowers the raw syntax tree into the intermediate script tree.
//!
//! The pass is a plain recursive descent. Every step allocates its own
//! node, hangs it under the node its caller just created and then walks
//! its raw children. Problems are recorded in [`Diagnostics`] and the walk
//! moves on with the next sibling; only an unusable root aborts.

use tracing::{debug, trace};

use super::ast::{RawKind, RawNode};
use super::catalog::{FunctionKind, ParamDescriptor, ParamType, SignatureCatalog};
use super::diag::{DiagnosticCode, Diagnostics, TransformError};
use super::literal::{self, StringError};
use super::options::TransformOptions;
use super::symbols::SymbolResolver;
use crate::model::{DEFAULT_PROBABILITY, NodeId, NodeKind, Point, ScriptTree};

/// Traversal mode, copied down the recursion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mode {
    /// Leading-zero literals are octal. Only full scripts use this.
    pub octal_supported: bool,
    /// Function and symbol names must match exactly.
    pub exact_match: bool,
    /// Already inside a trigger/action passed as a parameter.
    nested: bool,
}

impl Mode {
    fn nested(self) -> Self {
        Self {
            nested: true,
            ..self
        }
    }
}

/// Result of a successful transform: the tree plus what was said about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub tree: ScriptTree,
    pub diagnostics: Diagnostics,
}

impl Transformed {
    /// A tree with errors must not be compiled to bytecode.
    pub fn is_emittable(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Working state of one traversal.
pub(super) struct Lowering {
    pub(super) tree: ScriptTree,
    pub(super) diags: Diagnostics,
}

impl Lowering {
    pub(super) fn mismatch(&mut self, expected: &str, found: &RawNode) {
        self.diags.error(
            DiagnosticCode::StructuralMismatch,
            format!("expected {expected}, found {}", found.kind.label()),
            found,
        );
    }
}

/// Holds only read-only collaborators, so one instance can serve any
/// number of transforms, also from several threads at once.
pub struct Transformer<'a> {
    catalog: &'a dyn SignatureCatalog,
    symbols: &'a dyn SymbolResolver,
    pub(super) options: TransformOptions,
}

impl<'a> Transformer<'a> {
    pub fn new(
        catalog: &'a dyn SignatureCatalog,
        symbols: &'a dyn SymbolResolver,
        options: TransformOptions,
    ) -> Self {
        Self {
            catalog,
            symbols,
            options,
        }
    }

    /// Transform with the default, case-insensitive name matching.
    pub fn transform(&self, root: &RawNode) -> Result<Transformed, TransformError> {
        self.transform_matching(root, false)
    }

    /// Transform with an explicit name matching mode.
    pub fn transform_matching(
        &self,
        root: &RawNode,
        exact_match: bool,
    ) -> Result<Transformed, TransformError> {
        let (kind, octal_supported) = match root.kind {
            RawKind::Script => (NodeKind::Script, true),
            RawKind::TriggerSequence => (NodeKind::TriggerSequence, false),
            RawKind::ActionSequence => (NodeKind::ActionSequence, false),
            ref other => {
                return Err(TransformError::UnsupportedRoot {
                    kind: other.label(),
                    line: root.first.line,
                    column: root.first.column,
                });
            }
        };
        let mode = Mode {
            octal_supported,
            exact_match,
            nested: false,
        };
        debug!(root = root.kind.label(), children = root.children.len(), "transforming");

        let mut out = Lowering {
            tree: ScriptTree::new(kind),
            diags: Diagnostics::new(),
        };
        let top = out.tree.root();
        for child in &root.children {
            match kind {
                NodeKind::Script => self.lower_condition_response(child, top, mode, &mut out),
                NodeKind::TriggerSequence => self.lower_trigger(child, top, mode, &mut out),
                _ => self.lower_action(child, top, mode, &mut out),
            }
        }

        debug!(
            nodes = out.tree.node_count(),
            errors = out.diags.errors().len(),
            warnings = out.diags.warnings().len(),
            "transform finished"
        );
        Ok(Transformed {
            tree: out.tree,
            diagnostics: out.diags,
        })
    }

    // ── Condition / response layer ────────────────────────────────────

    fn lower_condition_response(&self, raw: &RawNode, parent: NodeId, mode: Mode, out: &mut Lowering) {
        if raw.kind != RawKind::ConditionResponse {
            out.mismatch("condition-response block", raw);
            return;
        }
        let cr = out.tree.add_child(parent, NodeKind::ConditionResponse);
        for child in &raw.children {
            match child.kind {
                RawKind::Condition => {
                    let co = out.tree.add_child(cr, NodeKind::Condition);
                    for trigger in &child.children {
                        self.lower_trigger(trigger, co, mode, out);
                    }
                }
                RawKind::ResponseSet => {
                    let rs = out.tree.add_child(cr, NodeKind::ResponseSet);
                    for response in &child.children {
                        self.lower_response(response, rs, mode, out);
                    }
                }
                _ => out.mismatch("condition or response set", child),
            }
        }
    }

    fn lower_response(&self, raw: &RawNode, parent: NodeId, mode: Mode, out: &mut Lowering) {
        if raw.kind != RawKind::Response {
            out.mismatch("response", raw);
            return;
        }
        let re = out.tree.add_child(parent, NodeKind::ResponseEntry);
        out.tree.node_mut(re).code = DEFAULT_PROBABILITY;

        let mut actions = raw.children.as_slice();
        if let Some((first, rest)) = actions.split_first() {
            if let Some(text) = first.text() {
                actions = rest;
                // Probabilities are always decimal, even in octal scripts.
                let digits = text.trim().trim_start_matches('#');
                match literal::parse_number(digits, false) {
                    Some(p) if literal::fits_i32(p) => out.tree.node_mut(re).code = p as i32,
                    _ => out.diags.warning(
                        DiagnosticCode::InvalidLiteral,
                        format!("invalid probability {text:?}, using {DEFAULT_PROBABILITY}"),
                        first,
                    ),
                }
            }
        }
        for action in actions {
            self.lower_action(action, re, mode, out);
        }
    }

    // ── Triggers and actions ──────────────────────────────────────────

    fn lower_trigger(&self, raw: &RawNode, parent: NodeId, mode: Mode, out: &mut Lowering) {
        let RawKind::Trigger { name, negated } = &raw.kind else {
            out.mismatch("trigger", raw);
            return;
        };
        let id = out.tree.add_child(parent, NodeKind::Trigger);
        out.tree.node_mut(id).negated = *negated;
        self.lower_call(FunctionKind::Trigger, name, raw, id, mode, out);
    }

    fn lower_action(&self, raw: &RawNode, parent: NodeId, mode: Mode, out: &mut Lowering) {
        let RawKind::Action { name } = &raw.kind else {
            out.mismatch("action", raw);
            return;
        };
        let id = out.tree.add_child(parent, NodeKind::Action);
        self.lower_call(FunctionKind::Action, name, raw, id, mode, out);
    }

    /// Bind the function and attach its actual parameters to node `id`.
    fn lower_call(
        &self,
        kind: FunctionKind,
        name: &str,
        raw: &RawNode,
        id: NodeId,
        mode: Mode,
        out: &mut Lowering,
    ) {
        let Some(function) = self.catalog.lookup(kind, name, mode.exact_match) else {
            out.diags.error(
                DiagnosticCode::UnresolvedFunction,
                format!("{name} not found in {} table", kind.table_name()),
                raw,
            );
            return;
        };
        trace!(function = %function.name, id = function.id, "bound");
        {
            let node = out.tree.node_mut(id);
            node.code = function.id;
            node.function = Some(function.clone());
        }

        for param in &raw.children {
            let next = out.tree.node(id).param_index + 1;
            let Some(slot) = function.param(next as usize) else {
                out.diags.warning(
                    DiagnosticCode::ArityOverflow,
                    format!(
                        "too many parameters for {}: expected {}",
                        function.name,
                        function.arity()
                    ),
                    param,
                );
                break;
            };
            out.tree.node_mut(id).param_index = next;

            if param.kind != RawKind::Parameter {
                out.mismatch("parameter", param);
                continue;
            }
            let Some(value) = param.children.first() else {
                out.mismatch("parameter value", param);
                continue;
            };

            match (slot.ty, &value.kind) {
                (ParamType::Trigger, RawKind::Trigger { .. }) if !mode.nested => {
                    self.lower_trigger(value, id, mode.nested(), out)
                }
                (ParamType::Action, RawKind::Action { .. }) if !mode.nested => {
                    self.lower_action(value, id, mode.nested(), out)
                }
                _ => self.lower_parameter(param, slot, id, mode, out),
            }
        }
    }

    // ── Parameters ────────────────────────────────────────────────────

    fn lower_parameter(
        &self,
        param: &RawNode,
        slot: &ParamDescriptor,
        owner: NodeId,
        mode: Mode,
        out: &mut Lowering,
    ) {
        let value = &param.children[0];
        match slot.ty {
            ParamType::Integer => {
                if let Some(v) = self.integer_parameter(param, &slot.table, mode, out) {
                    out.tree.node_mut(owner).numbers.push(v);
                }
            }
            ParamType::String => {
                if let Some(s) = self.string_value(value, out) {
                    out.tree.node_mut(owner).strings.push(s);
                }
            }
            ParamType::Point => {
                if let Some(p) = self.point_value(value, &slot.table, mode, out) {
                    out.tree.node_mut(owner).point = p;
                }
            }
            ParamType::Object => self.lower_object(param, slot, owner, mode, out),
            // A call of the right kind only gets here when already nested.
            ParamType::Trigger => match value.kind {
                RawKind::Trigger { .. } => out.diags.error(
                    DiagnosticCode::NestingOverflow,
                    "too many nested triggers",
                    value,
                ),
                _ => out.mismatch("trigger", value),
            },
            ParamType::Action => match value.kind {
                RawKind::Action { .. } => out.diags.error(
                    DiagnosticCode::NestingOverflow,
                    "too many nested actions",
                    value,
                ),
                _ => out.mismatch("action", value),
            },
        }
    }

    /// Value plus any `| x` tails, truncated to 32 bits.
    fn integer_parameter(&self, param: &RawNode, table: &str, mode: Mode, out: &mut Lowering) -> Option<i32> {
        let value = &param.children[0];
        let mut result = self.resolve_integer(value, table, mode, out);

        for tail in &param.children[1..] {
            if tail.kind != RawKind::OrExpr {
                out.mismatch("OR expression", tail);
                continue;
            }
            let Some(operand) = tail.children.first() else {
                out.mismatch("value after |", tail);
                continue;
            };
            let operand = self.resolve_integer(operand, table, mode, out);
            result = match (result, operand) {
                (Some(acc), Some(v)) => Some(acc | v),
                _ => None,
            };
        }

        result.map(|v| self.truncate(v, param, out))
    }

    pub(super) fn truncate(&self, value: i64, at: &RawNode, out: &mut Lowering) -> i32 {
        if self.options.verbose && !literal::fits_i32(value) {
            out.diags.warning(
                DiagnosticCode::RangeWarning,
                format!("value {value} does not fit in 32 bits and will be truncated"),
                at,
            );
        }
        value as i32
    }

    /// Number literal or symbol resolved through `table`.
    pub(super) fn resolve_integer(&self, raw: &RawNode, table: &str, mode: Mode, out: &mut Lowering) -> Option<i64> {
        let Some(text) = raw.text() else {
            out.mismatch("number or symbol", raw);
            return None;
        };
        self.resolve_text(text, table, raw, mode, out)
    }

    pub(super) fn resolve_text(
        &self,
        text: &str,
        table: &str,
        at: &RawNode,
        mode: Mode,
        out: &mut Lowering,
    ) -> Option<i64> {
        if let Some(v) = literal::parse_number(text, mode.octal_supported) {
            return Some(v);
        }

        let symbol = literal::unescape_symbol(text.trim());
        let message = if table.is_empty() {
            format!("cannot resolve symbol {symbol}")
        } else if !self.symbols.has_table(table) {
            format!("cannot resolve {symbol}: resource {table}.IDS not found")
        } else {
            let exact = mode.exact_match || self.symbols.is_case_sensitive(table);
            match self.symbols.lookup(table, symbol, exact) {
                Some(v) => return Some(v),
                None => format!("{symbol} not found in {table}"),
            }
        };
        out.diags.error(DiagnosticCode::UnresolvedSymbol, message, at);
        None
    }

    /// Unquote a string literal, warning about text the engine may mangle.
    pub(super) fn string_value(&self, raw: &RawNode, out: &mut Lowering) -> Option<String> {
        let Some(text) = raw.text() else {
            out.mismatch("string", raw);
            return None;
        };
        let s = match literal::unquote(text) {
            Ok(s) => s,
            Err(StringError::Unquoted) => {
                out.diags.error(
                    DiagnosticCode::InvalidLiteral,
                    format!("invalid string {text}"),
                    raw,
                );
                return None;
            }
            Err(StringError::EmbeddedQuote) => {
                out.diags.error(
                    DiagnosticCode::InvalidLiteral,
                    format!("string {text} must not contain a double quote"),
                    raw,
                );
                return None;
            }
        };

        if self.options.verbose {
            if literal::significant_len(&s) > literal::MAX_STRING_LEN {
                out.diags.warning(
                    DiagnosticCode::InvalidLiteral,
                    format!(
                        "string {text} is longer than {} characters",
                        literal::MAX_STRING_LEN
                    ),
                    raw,
                );
            }
            if !s.is_ascii() {
                out.diags.warning(
                    DiagnosticCode::InvalidLiteral,
                    format!("string {text} contains non-ASCII characters"),
                    raw,
                );
            }
        }
        Some(s)
    }

    fn point_value(&self, raw: &RawNode, table: &str, mode: Mode, out: &mut Lowering) -> Option<Point> {
        let is_pair = raw.kind == RawKind::Point
            && raw.children.len() == 2
            && raw.children.iter().all(|c| c.text().is_some());
        if !is_pair {
            out.diags.error(
                DiagnosticCode::InvalidLiteral,
                "invalid point, expected [x.y]",
                raw,
            );
            return None;
        }

        let mut coords = [0i32; 2];
        for (slot, c) in coords.iter_mut().zip(&raw.children) {
            if let Some(v) = self.resolve_integer(c, table, mode, out) {
                *slot = self.truncate(v, c, out);
            }
        }
        Some(Point {
            x: coords[0],
            y: coords[1],
        })
    }
}
