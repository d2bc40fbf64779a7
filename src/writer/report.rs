//! Human-readable report: an indented tree dump followed by diagnostics.

use crate::model::{NodeKind, ProcessedProject, ScriptNode, ScriptTree};
use crate::processor::diag::Diagnostics;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

pub fn emit(project: &ProcessedProject, out_dir: &Path) -> io::Result<()> {
    let mut text = render_tree(&project.result.tree);
    text.push('\n');
    text.push_str(&render_diagnostics(&project.result.diagnostics));
    fs::write(out_dir.join(format!("{}.report.txt", project.name)), text)
}

pub fn render_tree(tree: &ScriptTree) -> String {
    let mut out = String::new();
    for (depth, id) in tree.walk() {
        let _ = writeln!(out, "{:indent$}{}", "", describe(tree.node(id)), indent = depth * 2);
    }
    out
}

pub fn render_diagnostics(diags: &Diagnostics) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} error(s), {} warning(s)",
        diags.errors().len(),
        diags.warnings().len()
    );
    for d in diags.errors() {
        let _ = writeln!(out, "error: {d}");
    }
    for d in diags.warnings() {
        let _ = writeln!(out, "warning: {d}");
    }
    out
}

fn describe(node: &ScriptNode) -> String {
    let mut s = match node.kind {
        NodeKind::Trigger | NodeKind::Action => {
            let name = node.function.as_ref().map_or("?", |f| f.name.as_str());
            let bang = if node.negated { "!" } else { "" };
            format!("{:?} {bang}{name} 0x{:04X}", node.kind, node.code)
        }
        NodeKind::ResponseEntry => format!("ResponseEntry #{}", node.code),
        NodeKind::Object => match &node.parameter {
            Some(p) if !p.name.is_empty() => format!("Object {}", p.name),
            _ => "Object".to_string(),
        },
        kind => format!("{kind:?}"),
    };

    if !node.numbers.is_empty() {
        let _ = write!(s, " numbers={:?}", node.numbers);
    }
    if !node.numbers2.is_empty() {
        let _ = write!(s, " ids={:?}", node.numbers2);
    }
    if !node.strings.is_empty() {
        let _ = write!(s, " strings={:?}", node.strings);
    }
    if node.point.x != 0 || node.point.y != 0 {
        let _ = write!(s, " point=[{}.{}]", node.point.x, node.point.y);
    }
    if node.has_region() {
        let r = node.region;
        let _ = write!(s, " region=[{}.{}.{}.{}]", r[0], r[1], r[2], r[3]);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::catalog::FunctionDescriptor;

    #[test]
    fn test_render_tree() {
        let mut tree = ScriptTree::new(NodeKind::TriggerSequence);
        let t = tree.add_child(tree.root(), NodeKind::Trigger);
        {
            let n = tree.node_mut(t);
            n.code = 0x400F;
            n.negated = true;
            n.function = Some(FunctionDescriptor {
                id: 0x400F,
                name: "Global".into(),
                params: vec![],
            });
            n.strings.push("Chapter".into());
            n.numbers.push(2);
        }
        let o = tree.add_child(t, NodeKind::Object);
        tree.node_mut(o).numbers2.push(1);
        tree.node_mut(o).region = [1, 2, 3, 4];

        assert_eq!(
            render_tree(&tree),
            "TriggerSequence\n  Trigger !Global 0x400F numbers=[2] strings=[\"Chapter\"]\n    Object ids=[1] region=[1.2.3.4]\n"
        );
    }

    #[test]
    fn test_render_diagnostics_empty() {
        assert_eq!(render_diagnostics(&Diagnostics::new()), "0 error(s), 0 warning(s)\n");
    }
}
