use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use reach_bench::config::{HarnessConfig, ScalingVariant};
use reach_bench::experiment::ExperimentRunner;
use reach_bench::report::{ConsoleProgress, NoopObserver, Report, ReportEmitter};
use reach_bench::storage::Collection;
use reach_bench::store::{MemoryGraphStore, VertexId};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "reach-bench",
    version,
    about = "Benchmark bounded-depth reachability queries: maxDepth gradient and seed-set scaling"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the experiment matrix and save the report
    Run(RunArgs),
    /// Print the statistics summary of a saved report
    Analyze {
        /// Report to analyze; defaults to the newest one in --dir
        report: Option<PathBuf>,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Parquet file holding the edge collection
    #[arg(long)]
    edges: PathBuf,
    /// Parquet file holding the vertex population seeds are drawn from
    #[arg(long)]
    vertices: PathBuf,
    /// JSON config file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    seed_count: Option<usize>,
    /// Comma-separated max depths, e.g. 0,1,3,5,10,30,50
    #[arg(long, value_delimiter = ',')]
    depths: Option<Vec<u32>>,
    #[arg(long)]
    iterations: Option<usize>,
    #[arg(long, value_enum)]
    scaling_variant: Option<ScalingVariantArg>,
    #[arg(long)]
    scaling_depth: Option<u32>,
    /// Skip the seed-set scaling sweep
    #[arg(long)]
    no_scaling: bool,
    /// Comma-separated seed ids; replaces random sampling
    #[arg(long, value_delimiter = ',')]
    seed_ids: Option<Vec<VertexId>>,
    /// Fixed RNG seed for reproducible sampling
    #[arg(long)]
    random_seed: Option<u64>,
    #[arg(long)]
    connect_from: Option<String>,
    #[arg(long)]
    connect_to: Option<String>,
    #[arg(long, default_value = "id")]
    vertex_id_column: String,
    /// Comma-separated columns joined into a seed's display name
    #[arg(long, value_delimiter = ',', default_values = ["firstName", "lastName"])]
    name_columns: Vec<String>,
    /// Report path; defaults to a timestamped file in --out-dir
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Suppress per-phase and per-cell progress lines and the summary
    #[arg(long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScalingVariantArg {
    #[value(name = "fixed-full-set")]
    FixedFullSet,
    #[value(name = "incremental-prefix")]
    IncrementalPrefix,
}

impl From<ScalingVariantArg> for ScalingVariant {
    fn from(value: ScalingVariantArg) -> Self {
        match value {
            ScalingVariantArg::FixedFullSet => Self::FixedFullSet,
            ScalingVariantArg::IncrementalPrefix => Self::IncrementalPrefix,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Analyze { report, dir } => analyze(report, &dir),
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let config = resolve_config(args)?;
    config.validate()?;

    let store = load_store(args, &config)?;
    let runner = ExperimentRunner::new(&store, config)?;

    let report = if args.quiet {
        runner.run(&mut NoopObserver)?
    } else {
        runner.run(&mut ConsoleProgress::new(io::stdout().lock()))?
    };

    if !args.quiet {
        ReportEmitter::write_summary(&report, io::stdout().lock())?;
    }

    let path = args
        .out
        .clone()
        .unwrap_or_else(|| ReportEmitter::default_path(&args.out_dir, &report));
    let file = File::create(&path)
        .with_context(|| format!("creating report file {}", path.display()))?;
    ReportEmitter::write_json(&report, BufWriter::new(file))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

fn analyze(report: Option<PathBuf>, dir: &Path) -> Result<()> {
    let path = match report {
        Some(path) => path,
        None => {
            let latest = ReportEmitter::latest_in(dir)
                .with_context(|| format!("listing reports in {}", dir.display()))?;
            let path = latest.with_context(|| {
                format!("no saved reports found in {}; pass a report path", dir.display())
            })?;
            tracing::info!(path = %path.display(), "using most recent report");
            path
        }
    };

    let report = Report::from_json_file(&path)
        .with_context(|| format!("loading report {}", path.display()))?;
    ReportEmitter::write_summary(&report, io::stdout().lock())?;
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn resolve_config(args: &RunArgs) -> Result<HarnessConfig> {
    let mut config = match &args.config {
        Some(path) => HarnessConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HarnessConfig::default(),
    };

    if let Some(count) = args.seed_count {
        config.seed_count = count;
    }
    if let Some(depths) = &args.depths {
        config.depths.clone_from(depths);
    }
    if let Some(iterations) = args.iterations {
        config.iterations_per_cell = iterations;
    }
    if let Some(variant) = args.scaling_variant {
        config.scaling_sweep_variant = variant.into();
    }
    if let Some(depth) = args.scaling_depth {
        config.scaling_depth = depth;
    }
    if args.no_scaling {
        config.scaling_sweep_enabled = false;
    }
    if let Some(ids) = &args.seed_ids {
        config.explicit_seed_ids = Some(ids.clone());
    }
    if let Some(seed) = args.random_seed {
        config.random_seed = Some(seed);
    }
    if let Some(field) = &args.connect_from {
        config.connection_rule.connect_from.clone_from(field);
    }
    if let Some(field) = &args.connect_to {
        config.connection_rule.connect_to.clone_from(field);
    }
    Ok(config)
}

fn load_store(args: &RunArgs, config: &HarnessConfig) -> Result<MemoryGraphStore> {
    let edges = Collection::load_parquet(&args.edges)
        .with_context(|| format!("loading edges from {}", args.edges.display()))?;
    let vertices = Collection::load_parquet(&args.vertices)
        .with_context(|| format!("loading vertices from {}", args.vertices.display()))?;

    let rule = &config.connection_rule;
    let edge_columns = [rule.connect_to.as_str(), rule.connect_from.as_str()];
    let name_columns: Vec<&str> = args.name_columns.iter().map(String::as_str).collect();

    let store = MemoryGraphStore::from_collections(
        &edges,
        &edge_columns,
        &vertices,
        &args.vertex_id_column,
        &name_columns,
    )?;
    tracing::info!(
        edges = store.edge_count(),
        vertices = vertices.num_rows(),
        "store loaded"
    );
    Ok(store)
}
