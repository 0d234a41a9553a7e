mod commands;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use locsync_config::Project;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(
    name = "locsync",
    version,
    about = "Keep translation catalogs in sync with collected game text"
)]
struct Cli {
    /// Project directory holding locsync.toml, languages.json and translations/
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Only log warnings and errors to the console
    #[arg(long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

/// Which catalog of a language a command works on.
#[derive(clap::Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Language code from languages.json (default: the first one)
    #[arg(long)]
    language: Option<String>,
    /// Use the FormatString catalog instead of the main one
    #[arg(long)]
    fmtstring: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge collected entries into every language catalog
    Sync {
        /// JSON array of {namespace, key, source} produced by the collector
        collected: PathBuf,
        /// Reset every translation to pending
        #[arg(long)]
        force: bool,
        /// Drop catalog rows that were not collected this time
        #[arg(long)]
        prune: bool,
    },

    /// Show totals and pending counts per catalog
    Status {
        #[arg(long)]
        language: Option<String>,
    },

    /// List or export pending translation work
    Pending {
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Write the pending groups as JSON for manual or external translation
        #[arg(long)]
        out: Option<PathBuf>,
        /// Maximum number of groups
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Apply a filled-in pending export to a catalog
    Apply {
        filled: PathBuf,
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Save after this many updated rows (0: only at the end)
        #[arg(long)]
        checkpoint: Option<usize>,
    },

    /// Import decoded upstream records ({namespace, key, text, sourceHash})
    Import {
        records: PathBuf,
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Compare a catalog with its state at a Git revision
    Diff {
        /// Catalog file (default: the selected language catalog)
        file: Option<PathBuf>,
        #[command(flatten)]
        catalog: CatalogArgs,
        /// Git revision to compare against
        #[arg(long = "ref")]
        reference: Option<String>,
        /// Entries shown per section (0: all)
        #[arg(long)]
        limit: Option<usize>,
        /// Write the full report as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Invalidate imported translations that no longer match their source
    Reconcile {
        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Write translated rows as NDJSON for the packer
    ExportPack {
        #[command(flatten)]
        catalog: CatalogArgs,
        #[arg(long)]
        out: PathBuf,
    },

    /// Dump JSON Schemas of the report types
    Schema {
        #[arg(long, default_value = "./docs/assets/schemas")]
        out_dir: PathBuf,
    },
}

trait Runnable {
    fn run(self, project: &Project, use_color: bool) -> Result<ExitCode>;
}

impl Runnable for Commands {
    fn run(self, project: &Project, use_color: bool) -> Result<ExitCode> {
        let cmd_name = format!("{:?}", self);
        info!(event = "command_start", cmd = %cmd_name);

        let ok = |r: Result<()>| r.map(|_| ExitCode::SUCCESS);
        let result = match self {
            Commands::Sync {
                collected,
                force,
                prune,
            } => ok(commands::sync::run_sync(project, &collected, force, prune)),
            Commands::Status { language } => ok(commands::status::run_status(project, language)),
            Commands::Pending {
                catalog,
                out,
                limit,
            } => ok(commands::pending::run_pending(project, &catalog, out, limit)),
            Commands::Apply {
                filled,
                catalog,
                checkpoint,
            } => ok(commands::apply::run_apply(project, &filled, &catalog, checkpoint)),
            Commands::Import { records, catalog } => {
                ok(commands::import::run_import(project, &records, &catalog))
            }
            Commands::Diff {
                file,
                catalog,
                reference,
                limit,
                output,
            } => commands::diff::run_diff(
                project, file, &catalog, reference, limit, output, use_color,
            ),
            Commands::Reconcile { catalog } => {
                ok(commands::reconcile::run_reconcile(project, &catalog))
            }
            Commands::ExportPack { catalog, out } => {
                ok(commands::export_pack::run_export_pack(project, &catalog, &out))
            }
            Commands::Schema { out_dir } => ok(commands::schema::run_schema(out_dir)),
        };

        match &result {
            Ok(_) => info!(event = "command_done", cmd = %cmd_name),
            Err(e) => error!(event = "command_failed", cmd = %cmd_name, error = ?e),
        }
        result
    }
}

fn init_tracing(root: &Path, quiet: bool) -> WorkerGuard {
    let file_appender = rolling::daily(root.join("logs"), "locsync.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if quiet { "warn" } else { "info" };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        );

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _guard = init_tracing(&cli.root, cli.quiet);

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    let project = Project::open(&cli.root);
    debug!(event = "project_opened", root = %cli.root.display(), config = ?project.config());
    cli.cmd.run(&project, use_color)
}
