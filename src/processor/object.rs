//! Object parameters: identifiers, script names, IDS targets, regions.

use super::ast::{RawKind, RawNode};
use super::catalog::ParamDescriptor;
use super::diag::DiagnosticCode;
use super::literal;
use super::transform::{Lowering, Mode, Transformer};
use crate::model::{NodeId, NodeKind};

impl Transformer<'_> {
    /// Build the object node for `param` and attach it under `owner`.
    pub(super) fn lower_object(
        &self,
        param: &RawNode,
        slot: &ParamDescriptor,
        owner: NodeId,
        mode: Mode,
        out: &mut Lowering,
    ) {
        let value = &param.children[0];
        if value.kind != RawKind::Object {
            out.mismatch("object", value);
            return;
        }
        if value.children.is_empty() {
            out.mismatch("object identifier, script name or target", value);
            return;
        }

        // Filled while detached, relocated under its owner once complete.
        let obj = out.tree.detached(NodeKind::Object);
        out.tree.node_mut(obj).parameter = Some(slot.clone());

        for shape in &value.children {
            self.object_shape(shape, obj, mode, out);
        }
        for tail in &param.children[1..] {
            match tail.kind {
                RawKind::Rect => self.region(tail, obj, out),
                _ => out.mismatch("rectangle", tail),
            }
        }

        out.tree.attach(owner, obj);
    }

    /// One object descriptor. Identifiers may nest to any depth.
    fn object_shape(&self, raw: &RawNode, obj: NodeId, mode: Mode, out: &mut Lowering) {
        match &raw.kind {
            RawKind::Identifier { name } => {
                let table = self.options.object_table.as_str();
                if let Some(v) = self.resolve_text(name, table, raw, mode, out) {
                    let v = self.truncate(v, raw, out);
                    out.tree.node_mut(obj).numbers2.push(v);
                }
                for arg in &raw.children {
                    self.object_shape(arg, obj, mode, out);
                }
            }
            RawKind::Literal { .. } => {
                if let Some(name) = self.string_value(raw, out) {
                    out.tree.node_mut(obj).strings.push(name);
                }
            }
            RawKind::Target => self.target(raw, obj, mode, out),
            _ => out.mismatch("object identifier, script name or target", raw),
        }
    }

    /// `[EA.GENERAL.RACE…]`, one value per positional table.
    fn target(&self, raw: &RawNode, obj: NodeId, mode: Mode, out: &mut Lowering) {
        let tables = &self.options.target.tables;
        for field in &raw.children {
            let index = out.tree.node(obj).param_index + 1;
            let Some(table) = tables.get(index as usize) else {
                out.diags.warning(
                    DiagnosticCode::ArityOverflow,
                    format!("too many target values: expected at most {}", tables.len()),
                    field,
                );
                break;
            };
            out.tree.node_mut(obj).param_index = index;

            let Some(v) = self.resolve_integer(field, table, mode, out) else {
                continue;
            };
            if self.options.verbose
                && self.options.target.is_ranged(table)
                && !(0..=255).contains(&v)
            {
                out.diags.warning(
                    DiagnosticCode::RangeWarning,
                    format!("{table} value {v} is outside 0..255"),
                    field,
                );
            }
            let v = self.truncate(v, field, out);
            out.tree.node_mut(obj).numbers.push(v);
        }
    }

    /// Rectangle fields are plain decimals; a bad field keeps its old value.
    fn region(&self, raw: &RawNode, obj: NodeId, out: &mut Lowering) {
        if raw.children.len() != 4 {
            out.diags.warning(
                DiagnosticCode::InvalidLiteral,
                format!(
                    "rectangle needs 4 values, found {}",
                    raw.children.len()
                ),
                raw,
            );
        }

        let mut region = [0i32; 4];
        for (slot, field) in region.iter_mut().zip(&raw.children) {
            match field.text().and_then(literal::parse_plain) {
                Some(v) => *slot = v,
                None => out.diags.warning(
                    DiagnosticCode::InvalidLiteral,
                    format!("invalid rectangle value, keeping {}", *slot),
                    field,
                ),
            }
        }
        out.tree.node_mut(obj).region = region;
    }
}
