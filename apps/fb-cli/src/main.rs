use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use fb_app::{
    compute_domain, decompose, trace_overlay, AppResult, CorrectionMode, DomainOptions,
    DomainRequest, DomainResponse, MarketSnapshot,
};
use fb_core::{Real, ZonePair};
use fb_data::ProjectionAxes;
use fb_eli::{EliConfig, TraceConfig};
use fb_geom::{LineSet, RowInfo, Viewport};
use fb_lp::MinilpBackend;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "fb-cli")]
#[command(about = "Flow-based domain viewer - zonal capacity domain and allocation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a snapshot file and print a summary
    Validate {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
    },
    /// Compute a 2D domain cross-section
    Domain {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
        /// X axis zone pair, e.g. DE>FR
        #[arg(long, value_parser = parse_pair)]
        x: ZonePair,
        /// Y axis zone pair, e.g. ALBE>ALDE
        #[arg(long, value_parser = parse_pair)]
        y: ZonePair,
        /// Capacity re-centering mode
        #[arg(long, value_enum, default_value_t = Correction::Raw)]
        correction: Correction,
        /// Also trace the LTA region and overlay it
        #[arg(long)]
        lta_overlay: bool,
        /// Output JSON file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompose the observed outcome into FB and LTA components
    Decompose {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
        /// Output JSON file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Trace the LTA-only feasible region in a plane
    Trace {
        /// Path to the snapshot JSON file
        snapshot: PathBuf,
        /// X axis zone pair, e.g. DE>FR
        #[arg(long, value_parser = parse_pair)]
        x: ZonePair,
        /// Y axis zone pair, e.g. ALBE>ALDE
        #[arg(long, value_parser = parse_pair)]
        y: ZonePair,
        /// Sweep steps per quadrant
        #[arg(long, default_value_t = 8)]
        steps: usize,
        /// Output JSON file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Correction {
    /// Raw domain around the zero-exchange point
    Raw,
    /// Re-center for the observed out-of-plane exchange
    Observed,
    /// Re-center for the flow-based exchange component
    Fb,
}

impl From<Correction> for CorrectionMode {
    fn from(c: Correction) -> Self {
        match c {
            Correction::Raw => CorrectionMode::Raw,
            Correction::Observed => CorrectionMode::Observed,
            Correction::Fb => CorrectionMode::FlowBased,
        }
    }
}

fn parse_pair(s: &str) -> Result<ZonePair, String> {
    match s.split_once('>') {
        Some((from, to)) if !from.is_empty() && !to.is_empty() => Ok(ZonePair::new(from, to)),
        _ => Err(format!("expected FROM>TO, got '{s}'")),
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { snapshot } => cmd_validate(&snapshot),
        Commands::Domain {
            snapshot,
            x,
            y,
            correction,
            lta_overlay,
            output,
        } => cmd_domain(&snapshot, x, y, correction, lta_overlay, output.as_deref()),
        Commands::Decompose { snapshot, output } => cmd_decompose(&snapshot, output.as_deref()),
        Commands::Trace {
            snapshot,
            x,
            y,
            steps,
            output,
        } => cmd_trace(&snapshot, x, y, steps, output.as_deref()),
    }
}

fn cmd_validate(path: &Path) -> AppResult<()> {
    println!("Validating snapshot: {}", path.display());
    let snapshot = MarketSnapshot::from_file(path)?;
    println!("✓ Snapshot is valid");
    println!("  MTU:          {}", snapshot.mtu);
    println!("  Zones:        {}", snapshot.zones.len());
    println!("  Constraints:  {}", snapshot.constraints.len());
    println!("  LTA borders:  {}", snapshot.lta.len());
    println!("  Observations: {}", snapshot.exchange.len());
    Ok(())
}

/// Serializable view of one domain response.
#[derive(Serialize)]
struct DomainOutput {
    mtu: String,
    x: String,
    y: String,
    polygon: Vec<[Real; 2]>,
    viewport: Viewport,
    retained: Vec<usize>,
    rows: Vec<RowInfo>,
    lines: LineSet,
    correction_pairs: Vec<String>,
    floored_rows: Vec<usize>,
    overlay: Option<Vec<[Real; 2]>>,
    alpha: Option<Real>,
}

impl DomainOutput {
    fn new(snapshot: &MarketSnapshot, axes: &ProjectionAxes, response: DomainResponse) -> Self {
        Self {
            mtu: snapshot.mtu.to_rfc3339(),
            x: axes.x.to_string(),
            y: axes.y.to_string(),
            polygon: response.geometry.polygon,
            viewport: response.geometry.viewport,
            retained: response.geometry.retained,
            rows: response.geometry.rows,
            lines: response.geometry.lines,
            correction_pairs: response.geometry.correction.applied_pairs,
            floored_rows: response.geometry.correction.floored_rows,
            overlay: response.overlay,
            alpha: response.allocation.map(|a| a.alpha),
        }
    }
}

fn cmd_domain(
    path: &Path,
    x: ZonePair,
    y: ZonePair,
    correction: Correction,
    lta_overlay: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let snapshot = MarketSnapshot::from_file(path)?;
    let axes = ProjectionAxes::new(x, y);
    let request = DomainRequest {
        axes: axes.clone(),
        options: DomainOptions {
            correction: correction.into(),
            lta_overlay,
            ..Default::default()
        },
    };

    let response = compute_domain(&snapshot, &request, &MinilpBackend::new())?;
    eprintln!(
        "✓ Domain computed: {} rows, {} in domain, {} polygon vertices",
        response.geometry.rows.len(),
        response.geometry.retained.len(),
        response.geometry.polygon.len().saturating_sub(1)
    );

    emit(&DomainOutput::new(&snapshot, &axes, response), output)
}

fn cmd_decompose(path: &Path, output: Option<&Path>) -> AppResult<()> {
    let snapshot = MarketSnapshot::from_file(path)?;
    let result = decompose(&snapshot, &EliConfig::default(), &MinilpBackend::new())?;
    eprintln!(
        "✓ Decomposition solved: alpha = {:.4}, {} relaxed rows",
        result.alpha,
        result.relaxations.len()
    );
    emit(&result, output)
}

fn cmd_trace(
    path: &Path,
    x: ZonePair,
    y: ZonePair,
    steps: usize,
    output: Option<&Path>,
) -> AppResult<()> {
    let snapshot = MarketSnapshot::from_file(path)?;
    let axes = ProjectionAxes::new(x, y);
    let config = TraceConfig {
        steps_per_quadrant: steps,
    };
    let polygon = trace_overlay(&snapshot, &axes, &config, &MinilpBackend::new())?;
    eprintln!("✓ LTA boundary traced: {} vertices", polygon.len());
    emit(&polygon, output)
}

fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("✓ Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
