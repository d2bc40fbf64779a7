use std::fs;
use std::path::Path;

use bafscript_rust::model::{NodeKind, ProcessedProject, RawProject};
use bafscript_rust::parser::{load_ids, load_signatures, load_tree};
use bafscript_rust::processor;
use bafscript_rust::processor::diag::DiagnosticCode;
use bafscript_rust::processor::options::TransformOptions;
use bafscript_rust::writer::{json, report};

fn load_project() -> RawProject {
    let tree = fs::read_to_string("tests/script.json").unwrap();
    let sigs = fs::read_to_string("tests/signatures.json").unwrap();
    RawProject {
        name: "script".into(),
        tree: load_tree(&tree).expect("valid tree"),
        signatures: load_signatures(&sigs).expect("valid catalog"),
        ids: load_ids(Path::new("tests/ids")).expect("ids dir"),
    }
}

fn process() -> ProcessedProject {
    processor::run(&load_project(), TransformOptions::default(), false).expect("script root")
}

#[test]
fn transforms_script_fixture() {
    let processed = process();
    let result = &processed.result;
    let t = &result.tree;

    let blocks = t.children_of_kind(t.root(), NodeKind::ConditionResponse);
    assert_eq!(blocks.len(), 2);

    // first block: See([ENEMY]) !Global("Met","GLOBAL",0)
    let co = t.children_of_kind(blocks[0], NodeKind::Condition)[0];
    let trig: Vec<_> = t.children(co).collect();
    assert_eq!(trig.len(), 2);
    assert_eq!(trig[0].code, 2);
    assert_eq!(t.node(trig[0].children[0]).numbers, vec![255]);
    assert!(trig[1].negated);
    assert_eq!(trig[1].strings, vec!["Met", "GLOBAL"]);
    assert_eq!(trig[1].numbers, vec![0]);

    let rs = t.children_of_kind(blocks[0], NodeKind::ResponseSet)[0];
    let re = t.node(rs).children[0];
    assert_eq!(t.node(re).code, 100);
    let acts: Vec<_> = t.children(re).collect();
    assert_eq!(acts[0].numbers, vec![1]);
    assert_eq!(t.node(acts[1].children[0]).numbers2, vec![18, 1]);
}

#[test]
fn reports_fixture_diagnostics() {
    let processed = process();
    let diags = &processed.result.diagnostics;
    assert!(!processed.result.is_emittable());

    assert_eq!(diags.errors().len(), 1);
    let err = &diags.errors()[0];
    assert_eq!(err.code, DiagnosticCode::UnresolvedFunction);
    assert_eq!(
        err.to_string(),
        "11:3-11:17: Detect not found in TRIGGER table (unresolved-function)"
    );

    assert_eq!(diags.warnings().len(), 1);
    assert_eq!(
        diags.warnings()[0].to_string(),
        "13:12: invalid probability \"#often\", using 100 (invalid-literal)"
    );
}

#[test]
fn writes_outputs() {
    let processed = process();

    let mut buf = Vec::new();
    json::write_document(&processed, &mut buf).unwrap();
    let doc: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(doc["emittable"], false);
    assert_eq!(doc["errors"][0]["code"], "unresolved-function");

    let dump = report::render_tree(&processed.result.tree);
    assert!(dump.starts_with("Script\n  ConditionResponse\n    Condition\n"));
    assert!(dump.contains("Trigger !Global 0x400F"));
    assert!(dump.contains("Object Target ids=[18, 1]"));
}
