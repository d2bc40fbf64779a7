use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::processor::ast::RawNode;
use crate::processor::catalog::Signatures;
use crate::processor::literal::parse_number;
use crate::processor::options::TransformOptions;
use crate::processor::symbols::{IdsEntry, IdsTable, IdsTables};

/// Parse the raw syntax tree emitted by the BAF parser.
pub fn load_tree(json: &str) -> Result<RawNode> {
    let tree: RawNode =
        serde_json::from_str(json).map_err(|e| anyhow!("Failed to parse syntax tree: {}", e))?;
    debug!(root = tree.kind.label(), children = tree.children.len(), "syntax tree loaded");
    Ok(tree)
}

/// Parse the trigger/action catalog.
///
/// The file is expected to contain a `triggers` and an `actions` array of
/// `{ "id", "name", "params": [{ "type", "name", "table" }] }` entries.
pub fn load_signatures(json: &str) -> Result<Signatures> {
    let sigs: Signatures = serde_json::from_str(json)?;
    info!(
        triggers = sigs.triggers.len(),
        actions = sigs.actions.len(),
        "signatures loaded"
    );
    Ok(sigs)
}

pub fn load_options(json: &str) -> Result<TransformOptions> {
    serde_json::from_str(json).with_context(|| "Parsing transform options")
}

/// Load IDS tables from a JSON bundle or from a directory of `.ids` files.
pub fn load_ids(path: &Path) -> Result<IdsTables> {
    let tables = if path.is_dir() {
        load_ids_dir(path)?
    } else {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Reading {}", path.display()))?;
        load_ids_json(&json)?
    };
    info!(tables = tables.len(), "IDS tables loaded");
    Ok(tables)
}

/// `{ "EA": { "case_sensitive": false, "entries": [{ "value", "symbol" }] } }`
pub fn load_ids_json(json: &str) -> Result<IdsTables> {
    let tables: IdsTables = serde_json::from_str(json)?;
    Ok(tables.normalized())
}

fn load_ids_dir(dir: &Path) -> Result<IdsTables> {
    let mut tables = IdsTables::new();
    let entries = fs::read_dir(dir).with_context(|| format!("Listing {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        let is_ids = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ids"));
        if !is_ids {
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("bad IDS file name {}", path.display()))?;

        // IDS files from the game are not always valid UTF-8.
        let bytes = fs::read(&path).with_context(|| format!("Reading {}", path.display()))?;
        let table = parse_ids(&String::from_utf8_lossy(&bytes));
        debug!(table = name, entries = table.entries.len(), "IDS file parsed");
        tables.insert(name, table);
    }
    Ok(tables)
}

/// Parse the classic text form: an optional `IDS V1.0` header and an
/// optional entry count, then one `<value> <symbol>` pair per line.
/// Lines that do not start with a number are skipped.
pub fn parse_ids(text: &str) -> IdsTable {
    let mut table = IdsTable::default();

    for line in text.lines() {
        let line = line.trim();
        let Some((value, symbol)) = line.split_once(char::is_whitespace) else {
            continue;
        };
        let Some(value) = parse_number(value, false) else {
            continue;
        };
        let symbol = symbol.trim();
        if symbol.is_empty() {
            continue;
        }
        table.entries.push(IdsEntry {
            value,
            symbol: symbol.to_string(),
        });
    }
    table
}
