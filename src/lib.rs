pub mod cli;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use anyhow::{Context, anyhow, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use model::RawProject;
use processor::options::{TargetLayout, TransformOptions};

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    init_logging(args.verbose);

    // 1. ── Load ───────────────────────────────────────────────────────
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;
    let tree = parser::load_tree(&json).with_context(|| "Parsing input syntax tree")?;

    let catalog = std::fs::read_to_string(&args.catalog)
        .with_context(|| format!("Reading {}", args.catalog.display()))?;
    let signatures = parser::load_signatures(&catalog).with_context(|| "Parsing signature catalog")?;

    let ids = parser::load_ids(&args.ids).with_context(|| "Loading IDS tables")?;
    let options = options_from_args(&args)?;

    let name = args
        .input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "script".to_string());
    let raw = RawProject {
        name,
        tree,
        signatures,
        ids,
    };

    // 2. ── Process ────────────────────────────────────────────────────
    let processed =
        processor::run(&raw, options, args.exact).with_context(|| "Transforming script")?;

    // 3. ── Write outputs ──────────────────────────────────────────────
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Creating {}", args.output.display()))?;

    writer::json::emit(&processed, &args.output).with_context(|| "Writing JSON tree")?;
    writer::report::emit(&processed, &args.output).with_context(|| "Writing report")?;

    let diags = &processed.result.diagnostics;
    for d in diags.errors() {
        eprintln!("error: {d}");
    }
    for d in diags.warnings() {
        eprintln!("warning: {d}");
    }
    if diags.has_errors() {
        bail!("{}: {} error(s)", processed.name, diags.errors().len());
    }

    Ok(())
}

/// Config file first, then command-line overrides.
fn options_from_args(args: &cli::Cli) -> anyhow::Result<TransformOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Reading {}", path.display()))?;
            parser::load_options(&json)?
        }
        None => TransformOptions::default(),
    };
    if let Some(preset) = &args.target {
        options.target = TargetLayout::preset(preset)
            .ok_or_else(|| anyhow!("unknown target layout `{preset}`"))?;
    }
    options.verbose |= args.pedantic;
    Ok(options)
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
