//! Load command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use neograph_core::ingest::count_lines;
use neograph_core::{GraphStore, IngestReport, Ingestor, MemoryStore, Progress};
use neograph_graph::Neo4jStore;

use crate::config::Settings;
use crate::output;

#[derive(Args)]
pub struct LoadArgs {
    /// Visit table: a header line followed by one visit per line
    pub file: PathBuf,

    /// Concurrent row writers (overrides the config file)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Load into an in-memory graph instead of Neo4j
    #[arg(long)]
    pub dry_run: bool,

    /// Do not create uniqueness constraints before loading
    #[arg(long)]
    pub skip_schema: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Advances a progress bar once per finished row.
struct BarProgress(ProgressBar);

impl Progress for BarProgress {
    fn row_done(&self, _line: usize) {
        self.0.inc(1);
    }
}

fn progress_bar(rows: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(rows as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} Loading visits [{elapsed_precise}] [{bar:32.cyan/blue}] \
{pos}/{len} ({percent}%) {per_sec} eta {eta_precise}",
    ) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar
}

pub async fn execute(args: LoadArgs, settings: &Settings) -> Result<()> {
    let mut options = settings.ingest.to_options();
    if let Some(workers) = args.workers {
        options.workers = workers.max(1);
    }

    let lines = count_lines(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let bar = progress_bar(lines.saturating_sub(1), args.json);

    let report = if args.dry_run {
        let ingestor = Ingestor::new(MemoryStore::new(), options);
        let report = run(&ingestor, &args.file, &bar).await?;
        if !args.json {
            let store = ingestor.store();
            println!(
                "{} in-memory graph: {} nodes, {} relationships",
                "Dry run:".yellow().bold(),
                store.node_count(),
                store.edge_count()
            );
        }
        report
    } else {
        let client = super::connect(settings).await?;
        if !args.skip_schema {
            neograph_graph::schema::initialize_schema(&client).await?;
        }
        let ingestor = Ingestor::new(Neo4jStore::new(client), options);
        run(&ingestor, &args.file, &bar).await?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_report(&report);
    }

    match &report.abort {
        None => Ok(()),
        Some(abort) => anyhow::bail!("Ingestion aborted at line {}: {}", abort.line, abort.error),
    }
}

async fn run<S: GraphStore>(ingestor: &Ingestor<S>, file: &Path, bar: &ProgressBar) -> Result<IngestReport> {
    info!(file = %file.display(), workers = ingestor.options().workers, "Starting load");

    let progress = BarProgress(bar.clone());
    let result = ingestor.ingest_path(file, &progress).await;
    bar.finish_and_clear();
    result.with_context(|| format!("Failed to load {}", file.display()))
}
