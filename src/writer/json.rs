//! Dump the intermediate tree and its diagnostics as JSON.

use crate::model::{ProcessedProject, ScriptTree};
use crate::processor::diag::Diagnostic;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct Document<'a> {
    script: &'a str,
    emittable: bool,
    tree: &'a ScriptTree,
    errors: &'a [Diagnostic],
    warnings: &'a [Diagnostic],
}

pub fn emit(project: &ProcessedProject, out_dir: &Path) -> io::Result<()> {
    let file = File::create(out_dir.join(format!("{}.tree.json", project.name)))?;
    let mut w = BufWriter::new(file);
    write_document(project, &mut w)?;
    w.flush()
}

pub fn write_document<W: Write>(project: &ProcessedProject, w: &mut W) -> io::Result<()> {
    let result = &project.result;
    let doc = Document {
        script: &project.name,
        emittable: result.is_emittable(),
        tree: &result.tree,
        errors: result.diagnostics.errors(),
        warnings: result.diagnostics.warnings(),
    };
    serde_json::to_writer_pretty(&mut *w, &doc)?;
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use crate::processor::diag::Diagnostics;
    use crate::processor::Transformed;

    #[test]
    fn test_document_shape() {
        let project = ProcessedProject {
            name: "empty".into(),
            result: Transformed {
                tree: ScriptTree::new(NodeKind::ActionSequence),
                diagnostics: Diagnostics::new(),
            },
        };
        let mut buf = Vec::new();
        write_document(&project, &mut buf).unwrap();

        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["script"], "empty");
        assert_eq!(v["emittable"], true);
        assert_eq!(v["tree"]["nodes"][0]["kind"], "ActionSequence");
        assert_eq!(v["tree"]["nodes"][0]["region"], serde_json::json!([-1, -1, -1, -1]));
        assert_eq!(v["errors"], serde_json::json!([]));
    }
}
