//! The functional core.
//!
//! Takes the raw syntax tree of one BAF script and lowers it into the
//! intermediate script tree, resolving functions and symbols on the way.
pub mod ast;
pub mod catalog;
pub mod diag;
pub mod literal;
mod object;
pub mod options;
pub mod symbols;
pub mod transform;

pub use transform::{Transformed, Transformer};

use crate::model::{ProcessedProject, RawProject};
use anyhow::Result;
use options::TransformOptions;
use tracing::{info, warn};

/// Runs the transform and returns a read-only structure for writers.
pub fn run(raw: &RawProject, options: TransformOptions, exact_match: bool) -> Result<ProcessedProject> {
    let transformer = Transformer::new(&raw.signatures, &raw.ids, options);
    let result = transformer.transform_matching(&raw.tree, exact_match)?;

    let diags = &result.diagnostics;
    info!(
        script = %raw.name,
        nodes = result.tree.node_count(),
        errors = diags.errors().len(),
        warnings = diags.warnings().len(),
        "script transformed"
    );
    if !result.is_emittable() {
        warn!(script = %raw.name, "script has errors and must not be compiled");
    }

    Ok(ProcessedProject {
        name: raw.name.clone(),
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use ast::{RawKind, RawNode};
    use catalog::{FunctionDescriptor, Signatures};
    use symbols::IdsTables;

    fn project(tree: RawNode) -> RawProject {
        RawProject {
            name: "test".into(),
            tree,
            signatures: Signatures {
                triggers: vec![FunctionDescriptor {
                    id: 0x0001,
                    name: "True".into(),
                    params: vec![],
                }],
                actions: vec![],
            },
            ids: IdsTables::new(),
        }
    }

    #[test]
    fn test_run_trigger_sequence() {
        let tree = RawNode::new(
            RawKind::TriggerSequence,
            vec![RawNode::trigger("True", false, vec![])],
        );
        let processed = run(&project(tree), TransformOptions::default(), false).unwrap();

        assert_eq!(processed.name, "test");
        assert!(processed.result.is_emittable());
        let t = &processed.result.tree;
        assert_eq!(t.node(t.root()).kind, NodeKind::TriggerSequence);
        assert_eq!(t.children_of_kind(t.root(), NodeKind::Trigger).len(), 1);
    }

    #[test]
    fn test_run_rejects_bad_root() {
        let tree = RawNode::new(RawKind::Condition, vec![]);
        let err = run(&project(tree), TransformOptions::default(), false).unwrap_err();
        assert!(err.to_string().contains("condition root"), "got: {err}");
    }
}
