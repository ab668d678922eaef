use std::path::{Path, PathBuf};

use acicap_core::{validate_descriptor, Error as CoreError, FabricDescriptor};
use acicap_engine::{CapacityEngine, IngestError, LinecardCatalog, ScalabilityTable};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("ingest error: {0}")]
    Ingest(#[from] IngestError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "acicap", version, about = "Fabric capacity analysis CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full capacity analysis and write report.json.
    Analyze(AnalyzeArgs),
    /// Rate class coverage of the declared datasets.
    Completeness(FabricArgs),
    /// Print flat inventory counts.
    Summary(FabricArgs),
}

#[derive(Args, Debug)]
struct FabricArgs {
    /// Fabric descriptor file (JSON).
    #[arg(long, value_name = "FILE")]
    fabric: PathBuf,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[command(flatten)]
    fabric: FabricArgs,
    /// Output directory for report.json; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
    /// External scalability limits table; bundled table when omitted.
    #[arg(long, value_name = "FILE")]
    limits: Option<PathBuf>,
    /// External linecard port-capacity table; bundled table when omitted.
    #[arg(long, value_name = "FILE")]
    linecards: Option<PathBuf>,
    /// Release override used when no firmware version is discovered.
    #[arg(long)]
    release: Option<String>,
    /// Uplinks-per-leaf fallback when no adjacency evidence exists.
    #[arg(long)]
    uplinks_per_leaf: Option<u32>,
    /// Scale-profile tag selecting the L3Out limit column.
    #[arg(long)]
    scale_profile: Option<String>,
    /// Endpoint-profile tag selecting the endpoints-per-leaf column.
    #[arg(long)]
    endpoint_profile: Option<String>,
    /// Pretty-print JSON output.
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> Result<(), CliError> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Analyze(args) => run_analyze(args),
        Command::Completeness(args) => run_completeness(args),
        Command::Summary(args) => run_summary(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_descriptor(path: &Path) -> Result<FabricDescriptor, CliError> {
    let content = std::fs::read_to_string(path)?;
    let descriptor: FabricDescriptor = serde_json::from_str(&content)?;
    validate_descriptor(&descriptor)?;
    Ok(descriptor)
}

/// Read a reference table, degrading to the bundled copy when the file is
/// absent and to the empty table when it cannot be read.
fn load_limits(path: Option<&PathBuf>) -> ScalabilityTable {
    let Some(path) = path else {
        return ScalabilityTable::bundled();
    };
    match std::fs::read_to_string(path) {
        Ok(content) => ScalabilityTable::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(event = "limits_unparsable", path = %path.display(), error = %err);
            ScalabilityTable::empty()
        }),
        Err(err) => {
            tracing::warn!(event = "limits_missing", path = %path.display(), error = %err);
            ScalabilityTable::empty()
        }
    }
}

fn load_linecards(path: Option<&PathBuf>) -> LinecardCatalog {
    let Some(path) = path else {
        return LinecardCatalog::bundled();
    };
    match std::fs::read_to_string(path) {
        Ok(content) => LinecardCatalog::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(event = "linecards_unparsable", path = %path.display(), error = %err);
            LinecardCatalog::empty()
        }),
        Err(err) => {
            tracing::warn!(event = "linecards_missing", path = %path.display(), error = %err);
            LinecardCatalog::empty()
        }
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), CliError> {
    let mut descriptor = load_descriptor(&args.fabric.fabric)?;
    if args.release.is_some() {
        descriptor.release = args.release.clone();
    }
    if args.uplinks_per_leaf.is_some() {
        descriptor.uplinks_per_leaf = args.uplinks_per_leaf;
    }
    if args.scale_profile.is_some() {
        descriptor.scale_profile = args.scale_profile.clone();
    }
    if args.endpoint_profile.is_some() {
        descriptor.endpoint_profile = args.endpoint_profile.clone();
    }
    validate_descriptor(&descriptor)?;

    let limits = load_limits(args.limits.as_ref());
    let linecards = load_linecards(args.linecards.as_ref());

    tracing::info!(event = "analysis_started", fabric = %args.fabric.fabric.display());
    let mut engine = CapacityEngine::with_reference_data(descriptor, limits, linecards);
    let report = engine.analyze()?;
    tracing::info!(
        event = "analysis_finished",
        completeness = report.completeness.completeness_score
    );

    let payload = if args.pretty {
        serde_json::to_vec_pretty(&report)?
    } else {
        serde_json::to_vec(&report)?
    };

    match args.out {
        Some(out_dir) => {
            std::fs::create_dir_all(&out_dir)?;
            let report_path = out_dir.join("report.json");
            std::fs::write(&report_path, payload)?;
            tracing::info!(event = "report_written", path = %report_path.display());
        }
        None => {
            println!("{}", String::from_utf8_lossy(&payload));
        }
    }

    Ok(())
}

fn run_completeness(args: FabricArgs) -> Result<(), CliError> {
    let descriptor = load_descriptor(&args.fabric)?;
    let mut engine = CapacityEngine::new(descriptor);
    let completeness = engine.completeness()?;
    println!("{}", serde_json::to_string_pretty(&completeness)?);
    Ok(())
}

fn run_summary(args: FabricArgs) -> Result<(), CliError> {
    let descriptor = load_descriptor(&args.fabric)?;
    let mut engine = CapacityEngine::new(descriptor);
    let summary = engine.summary()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
