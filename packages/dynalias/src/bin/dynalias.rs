//! dynalias CLI
//!
//! # Usage
//!
//! ```bash
//! # Replay a trace and print the observed alias pairs
//! dynalias run --trace run.trace --ids ids.json
//!
//! # Print allocator-level points-to sets instead
//! dynalias run --trace run.trace --analysis pointer
//!
//! # Check a static analysis' verdicts against the trace
//! dynalias check --trace run.trace --ids ids.json --oracle aa.json
//!
//! # Re-encode a text trace in the binary framed format
//! dynalias convert --trace run.trace --output run.trace.bin
//! ```
//!
//! Exit status: 0 on success, 2 when the trace is corrupt, 1 on any other
//! failure.

use clap::{Parser, Subcommand, ValueEnum};
use dynalias::config::{AnalysisKind, ConfigError, DynAliasConfig};
use dynalias::features::checker::{AliasChecker, AliasTable, StaticAliasOracle};
use dynalias::features::ids::{IdLookup, IdTable};
use dynalias::features::points_to::{collect_aliases, collect_pointees, PointeeAnalysis};
use dynalias::features::trace::{
    open_trace, FramedTraceWriter, RecordStream, TextTraceWriter, TraceFormat,
};
use dynalias::{AliasReport, DynAliasError, ValueId};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "dynalias")]
#[command(about = "Trace-driven dynamic alias analysis", long_about = None)]
struct Cli {
    /// Debug logging (overridden by DYNALIAS_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a trace and report the observed aliases
    Run {
        #[command(flatten)]
        input: TraceInput,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Only pairs involving this function
        #[arg(long)]
        function: Option<ValueId>,
    },

    /// Report dynamic aliases a static analysis rules out
    Check {
        #[command(flatten)]
        input: TraceInput,

        /// Verdicts of the analysis under test (JSON)
        #[arg(long)]
        oracle: PathBuf,

        /// Verdicts of the baseline analysis (JSON)
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// The analysis under test answers intra-procedural queries only
        #[arg(long)]
        intra: bool,
    },

    /// Re-encode a trace
    Convert {
        /// Input trace
        #[arg(short, long)]
        trace: PathBuf,

        /// Input format (guessed from the extension if omitted)
        #[arg(long, value_enum)]
        from: Option<FormatArg>,

        /// Output trace
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "framed")]
        to: FormatArg,
    },
}

#[derive(clap::Args)]
struct TraceInput {
    /// Trace file
    #[arg(short, long)]
    trace: PathBuf,

    /// Trace format (guessed from the extension if omitted)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Value id table (JSON)
    #[arg(long)]
    ids: Option<PathBuf>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analysis variant (overrides the configuration file)
    #[arg(long, value_parser = AnalysisKind::from_str)]
    analysis: Option<AnalysisKind>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Framed,
}

impl From<FormatArg> for TraceFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => TraceFormat::Text,
            FormatArg::Framed => TraceFormat::Framed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            function,
        } => run(&input, output, function),
        Commands::Check {
            input,
            oracle,
            baseline,
            intra,
        } => check(&input, &oracle, baseline.as_deref(), intra),
        Commands::Convert {
            trace,
            from,
            output,
            to,
        } => convert(&trace, from, &output, to),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            if e.is_trace_corruption() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use std::io::IsTerminal;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    let default = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env("DYNALIAS_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

// ============================================================================
// Commands
// ============================================================================

fn run(
    input: &TraceInput,
    output: OutputFormat,
    function: Option<ValueId>,
) -> Result<(), DynAliasError> {
    let config = load_config(input)?;
    let ids = load_ids(input.ids.as_deref())?;
    let records = open_input(input)?;

    match config.analysis {
        AnalysisKind::Alias => {
            let report = collect_aliases(records, &config, ids.as_ref().map(as_lookup))?;
            print_aliases(&report, output, function, ids.as_ref())
        }
        AnalysisKind::Pointer => {
            if function.is_some() {
                return Err(ConfigError::Validation(
                    "--function filters alias pairs; the pointer analysis has none".to_string(),
                )
                .into());
            }
            let analysis = collect_pointees(records, &config)?;
            print_pointees(&analysis, output, ids.as_ref())
        }
    }
}

fn print_aliases(
    report: &AliasReport,
    output: OutputFormat,
    function: Option<ValueId>,
    ids: Option<&IdTable>,
) -> Result<(), DynAliasError> {
    match output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => {
            let pairs = match function {
                Some(function) => report.pairs_involving_function(function),
                None => report.pairs(),
            };
            println!("{} aliases", pairs.len());
            for pair in pairs {
                match ids {
                    Some(ids) => println!(
                        "{}  {}",
                        ids.describe(pair.first()),
                        ids.describe(pair.second())
                    ),
                    None => println!("{}", pair),
                }
            }
        }
    }
    Ok(())
}

fn print_pointees(
    analysis: &PointeeAnalysis,
    output: OutputFormat,
    ids: Option<&IdTable>,
) -> Result<(), DynAliasError> {
    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(analysis)?),
        OutputFormat::Text => {
            let describe = |id: ValueId| match ids {
                Some(ids) => ids.describe(id),
                None => format!("#{}", id),
            };
            println!("{} pointers", analysis.pointers().count());
            for pointer in analysis.pointers() {
                let pointees = analysis
                    .pointees_of(pointer)
                    .unwrap_or_default()
                    .iter()
                    .map(|&id| describe(id))
                    .collect::<Vec<_>>();
                println!("{} -> {}", describe(pointer), pointees.join(", "));
            }
            if analysis.unresolved() > 0 {
                println!("{} unresolved", analysis.unresolved());
            }
        }
    }
    Ok(())
}

fn check(
    input: &TraceInput,
    oracle: &Path,
    baseline: Option<&Path>,
    intra: bool,
) -> Result<(), DynAliasError> {
    let mut config = load_config(input)?;
    if config.analysis != AnalysisKind::Alias {
        return Err(ConfigError::Validation(format!(
            "check compares alias pairs; analysis '{}' does not produce them",
            config.analysis
        ))
        .into());
    }
    if intra {
        config.checker.intra_proc = true;
    }
    let ids = load_ids(input.ids.as_deref())?;
    let report = collect_aliases(open_input(input)?, &config, ids.as_ref().map(as_lookup))?;

    let oracle = AliasTable::from_json_file(oracle)?;
    let baseline = baseline.map(AliasTable::from_json_file).transpose()?;

    let mut checker = AliasChecker::new(config.checker.clone());
    if let Some(ids) = &ids {
        checker = checker.with_ids(ids);
    }
    let result = checker.check(
        &report,
        &oracle,
        baseline.as_ref().map(|b| b as &dyn StaticAliasOracle),
    );
    checker.log(&result);

    println!("{} dynamic aliases", result.dynamic_aliases);
    println!("{}", result.summary());
    Ok(())
}

fn convert(
    trace: &Path,
    from: Option<FormatArg>,
    output: &Path,
    to: FormatArg,
) -> Result<(), DynAliasError> {
    let from = from.map_or_else(|| TraceFormat::from_path(trace), TraceFormat::from);
    let records = open_trace(trace, from)?;
    let sink = BufWriter::new(File::create(output)?);

    let written = match TraceFormat::from(to) {
        TraceFormat::Text => {
            let mut writer = TextTraceWriter::new(sink);
            for record in records {
                writer.write(&record?)?;
            }
            let written = writer.written();
            writer.finish()?;
            written
        }
        TraceFormat::Framed => {
            let mut writer = FramedTraceWriter::new(sink);
            for record in records {
                writer.write(&record?)?;
            }
            let written = writer.written();
            writer.finish()?;
            written
        }
    };
    println!("{} records written to {}", written, output.display());
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

/// Configuration file (or defaults) with command-line overrides applied
fn load_config(input: &TraceInput) -> Result<DynAliasConfig, DynAliasError> {
    let mut config = match input.config.as_deref() {
        Some(path) => DynAliasConfig::from_yaml(path)?,
        None => DynAliasConfig::default(),
    };
    if let Some(analysis) = input.analysis {
        config.analysis = analysis;
    }
    Ok(config)
}

fn load_ids(path: Option<&Path>) -> Result<Option<IdTable>, DynAliasError> {
    path.map(IdTable::from_json_file).transpose()
}

fn as_lookup(ids: &IdTable) -> &dyn IdLookup {
    ids
}

fn open_input(input: &TraceInput) -> Result<RecordStream, DynAliasError> {
    let format = input
        .format
        .map_or_else(|| TraceFormat::from_path(&input.trace), TraceFormat::from);
    open_trace(&input.trace, format)
}
