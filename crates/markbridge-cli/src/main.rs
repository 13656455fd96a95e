mod config;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use config::JobConfig;
use markbridge_common::{CanonicalRow, FieldCatalog};
use markbridge_export::{
    DiscriminatorFilter, RowAccumulator, export_pairs_to_workbook, export_rows_to_workbook,
    summarize,
};
#[cfg(feature = "system-clipboard")]
use markbridge_grid::{SystemClipboard, read_paste};
use markbridge_grid::{
    Column, Grid, GridSession, KeyedPairStore, MemoryClipboard, PasteKind, PasteOutcome,
    StatusKind, format_processed, parse,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "markbridge", about = "Move student-records exports into spreadsheet templates")]
struct Cli {
    /// YAML job file overriding the built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter delimited exports and preview the kept rows.
    Extract(ExtractArgs),
    /// Filter delimited exports and write the rows under the template's headers.
    ExportRows(ExportRowsArgs),
    /// Write stored identifier/mark pairs into the marks template.
    ExportPairs(ExportPairsArgs),
    /// Manage the stored identifier/mark pairs.
    #[command(subcommand)]
    Pairs(PairsCommand),
}

#[derive(Parser, Debug)]
struct ExtractArgs {
    /// Source files; non-csv paths are skipped.
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Number of rows to preview.
    #[arg(long, default_value_t = 5)]
    preview: usize,

    /// Print every kept row as JSON instead of a preview.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct ExportRowsArgs {
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Target workbook (saved in place).
    #[arg(long)]
    workbook: Option<PathBuf>,

    #[arg(long)]
    sheet: Option<String>,

    #[arg(long)]
    header_row: Option<u32>,

    #[arg(long)]
    first_data_row: Option<u32>,
}

#[derive(Parser, Debug)]
struct ExportPairsArgs {
    /// Pair file to export; defaults to the grid data file.
    #[arg(long)]
    from: Option<PathBuf>,

    #[arg(long)]
    template: Option<PathBuf>,

    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long)]
    sheet: Option<String>,
}

#[derive(Subcommand, Debug)]
enum PairsCommand {
    /// Paste text into an empty grid and store the resulting pairs.
    Import(ImportArgs),
    /// Print the stored pairs as `id<TAB>mark` lines.
    Show,
    /// Load the stored pairs into a grid and process them as `id mark` lines.
    Print,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ImportKind {
    /// Two columns per line, tab- or comma-separated.
    Paired,
    /// One identifier per line.
    Ids,
}

#[derive(Parser, Debug)]
struct ImportArgs {
    /// Text file to read; stdin when omitted or `-`.
    input: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ImportKind::Paired)]
    kind: ImportKind,

    /// Read from the desktop clipboard instead of a file.
    #[cfg(feature = "system-clipboard")]
    #[arg(long, conflicts_with = "input")]
    clipboard: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let job = JobConfig::load(cli.config.as_deref())?;
    match cli.command {
        Command::Extract(args) => run_extract(&job, args),
        Command::ExportRows(args) => run_export_rows(job, args),
        Command::ExportPairs(args) => run_export_pairs(job, args),
        Command::Pairs(cmd) => run_pairs(&job, cmd),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_rows(job: &JobConfig, sources: &[PathBuf]) -> Result<Vec<CanonicalRow>> {
    let filter = DiscriminatorFilter::new(
        Arc::new(FieldCatalog::assessment()),
        &job.export.discriminator,
    );
    let mut acc = RowAccumulator::new(filter);
    let report = acc.load_paths(sources);
    for skipped in &report.skipped {
        tracing::warn!(path = %skipped.display(), "not a csv file, skipped");
    }
    for err in &report.failed {
        tracing::error!(error = %err, "failed to read source");
    }
    if report.loaded == 0 {
        bail!("no source file could be read");
    }
    tracing::info!(files = report.loaded, rows = acc.len(), "loaded sources");
    Ok(acc.take())
}

fn run_extract(job: &JobConfig, args: ExtractArgs) -> Result<()> {
    let rows = load_rows(job, &args.sources)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    println!("{} row(s) matched '{}'", rows.len(), job.export.discriminator);
    for summary in summarize(&rows, args.preview) {
        println!("  {summary}");
    }
    Ok(())
}

fn run_export_rows(mut job: JobConfig, args: ExportRowsArgs) -> Result<()> {
    let target = &mut job.export.rows;
    if let Some(p) = args.workbook {
        target.workbook = p;
    }
    if let Some(s) = args.sheet {
        target.sheet = s;
    }
    if let Some(r) = args.header_row {
        target.header_row = r;
    }
    if let Some(r) = args.first_data_row {
        target.first_data_row = r;
    }

    let rows = load_rows(&job, &args.sources)?;
    let target = &job.export.rows;
    let summary = export_rows_to_workbook(target, &FieldCatalog::assessment(), &rows)
        .with_context(|| format!("exporting rows to {}", target.workbook.display()))?;
    for s in &summary.report.shadowed {
        tracing::warn!(
            field = %s.canonical,
            kept = s.kept_col,
            dropped = s.dropped_col,
            "duplicate header in target"
        );
    }
    println!(
        "Wrote {} row(s) to '{}' in {}",
        summary.report.rows_written,
        target.sheet,
        summary.path.display()
    );
    Ok(())
}

fn run_export_pairs(mut job: JobConfig, args: ExportPairsArgs) -> Result<()> {
    let target = &mut job.export.pairs;
    if let Some(p) = args.template {
        target.template = p;
    }
    if let Some(p) = args.output {
        target.output = p;
    }
    if let Some(s) = args.sheet {
        target.sheet = s;
    }

    let from = args.from.unwrap_or_else(|| job.grid.data_file.clone());
    let mut store = KeyedPairStore::new(&from);
    let count = store
        .try_load()
        .with_context(|| format!("reading pairs from {}", from.display()))?;
    if count == 0 {
        bail!("{} holds no pairs with an identifier", from.display());
    }

    let target = &job.export.pairs;
    let report = export_pairs_to_workbook(target, store.pairs())
        .with_context(|| format!("exporting pairs from {}", target.template.display()))?;
    println!(
        "Wrote {} pair(s) to {}",
        report.rows_written,
        target.output.display()
    );
    Ok(())
}

fn run_pairs(job: &JobConfig, cmd: PairsCommand) -> Result<()> {
    match cmd {
        PairsCommand::Import(args) => run_import(job, args),
        PairsCommand::Show => {
            let mut session = GridSession::new(job.grid.clone(), MemoryClipboard::new());
            let status = session.retrieve();
            if status.kind == StatusKind::Done {
                println!("{}", session.output());
            }
            eprintln!("{status}");
            Ok(())
        }
        PairsCommand::Print => {
            let mut session = GridSession::new(job.grid.clone(), MemoryClipboard::new());
            let loaded = session.load_from_file();
            if loaded.kind != StatusKind::Done {
                eprintln!("{loaded}");
                return Ok(());
            }
            let status = session.process(|pairs| println!("{}", format_processed(pairs)));
            eprintln!("{status}");
            Ok(())
        }
    }
}

fn run_import(job: &JobConfig, args: ImportArgs) -> Result<()> {
    let kind = match args.kind {
        ImportKind::Paired => PasteKind::Paired,
        ImportKind::Ids => PasteKind::Single(Column::Id),
    };

    #[cfg(feature = "system-clipboard")]
    let outcome = if args.clipboard {
        let mut clipboard =
            SystemClipboard::new().context("opening the desktop clipboard")?;
        read_paste(&mut clipboard, kind)
    } else {
        parse(kind, &read_input(args.input.as_deref())?)
    };
    #[cfg(not(feature = "system-clipboard"))]
    let outcome = parse(kind, &read_input(args.input.as_deref())?);

    let parsed = match outcome {
        PasteOutcome::Parsed(parsed) => parsed,
        PasteOutcome::Empty => {
            eprintln!("Nothing to paste.");
            return Ok(());
        }
        PasteOutcome::AccessDenied(err) => bail!("clipboard is empty or not text: {err}"),
    };

    let mut grid = Grid::with_rows(job.grid.initial_rows);
    let report = grid.apply_paste(&parsed);
    tracing::debug!(start = report.start, count = report.count, "pasted into grid");

    let pairs = grid.collect_pairs();
    if pairs.is_empty() {
        eprintln!("Store: no IDs found.");
        return Ok(());
    }
    let mut store = KeyedPairStore::new(&job.grid.data_file);
    store.replace(pairs);
    store
        .try_save()
        .with_context(|| format!("saving pairs to {}", store.path().display()))?;
    eprintln!(
        "Stored {} row(s). Saved to '{}'.",
        store.len(),
        store.file_name()
    );
    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(p) if p != Path::new("-") => {
            std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}
