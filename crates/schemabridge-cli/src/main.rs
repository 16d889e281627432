//! schemabridge CLI - schema and type conversion across database paradigms.

use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::{theme::ColorfulTheme, Select};
use schemabridge::{
    Config, ConversionEngine, ConversionRequest, ConversionResult, ConvertError, ExecutionMode,
    Registry, Schema, Severity, UserPreferences,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, Level};
use tracing_subscriber::fmt::format::FmtSpan;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser)]
#[command(name = "schemabridge")]
#[command(about = "Schema and type conversion across database paradigms")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file (built-in defaults when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "warn")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered databases and their paradigms
    Databases,

    /// Resolve one primitive type between two databases
    Resolve {
        /// Source database
        #[arg(long)]
        from: String,

        /// Target database
        #[arg(long)]
        to: String,

        /// Native type spelling, e.g. "varchar(255)"
        #[arg(value_name = "TYPE")]
        type_name: String,
    },

    /// Show the conversion matrix for a database pair
    Matrix {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Find a direct or two-step conversion path
    Path {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Convert a schema file
    Convert {
        /// Schema file (.json, .yaml or .yml)
        #[arg(short, long)]
        schema: PathBuf,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Execution mode [default: from configuration]
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Write the converted schema here (.json, otherwise YAML)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Request preferences file (YAML or JSON)
        #[arg(long)]
        preferences: Option<PathBuf>,
    },

    /// Write the default configuration file
    InitConfig {
        /// Output path for configuration file [default: schemabridge.yaml]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite existing file
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Automatic,
    Interactive,
    AnalysisOnly,
    DryRun,
}

impl From<ModeArg> for ExecutionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Automatic => ExecutionMode::Automatic,
            ModeArg::Interactive => ExecutionMode::Interactive,
            ModeArg::AnalysisOnly => ExecutionMode::AnalysisOnly,
            ModeArg::DryRun => ExecutionMode::DryRun,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), ConvertError> {
    let cli = Cli::parse();

    // init-config does not need an existing configuration
    if let Commands::InitConfig { output, force } = &cli.command {
        let path = output
            .clone()
            .unwrap_or_else(|| PathBuf::from("schemabridge.yaml"));
        return init_config(&path, *force);
    }

    setup_logging(&cli.verbosity, &cli.log_format);

    let config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::default(),
    };

    let registry = Arc::new(Registry::build());
    let engine = ConversionEngine::new(registry.clone(), config);

    match cli.command {
        Commands::InitConfig { .. } => unreachable!(), // Handled above

        Commands::Databases => {
            let databases: Vec<_> = registry
                .database_ids()
                .into_iter()
                .filter_map(|id| registry.capabilities(id))
                .collect();
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&databases)?);
            } else {
                println!("Registered databases ({}):", databases.len());
                for db in databases {
                    println!(
                        "  {:<16} {:<24} {}",
                        db.id,
                        db.display_name,
                        schemabridge::paradigm::format_paradigms(&db.paradigms)
                    );
                }
            }
        }

        Commands::Resolve { from, to, type_name } => {
            let outcome = engine.resolve_type(&from, &to, &type_name)?;
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{} -> {}", outcome.original, outcome.converted);
                println!("  Canonical: {} -> {}", outcome.canonical, outcome.target_canonical);
                println!("  Kind: {}", outcome.kind);
                println!("  Lossy: {}", if outcome.lossy { "yes" } else { "no" });
                for warning in &outcome.warnings {
                    println!("  Warning: {}", warning);
                }
            }
        }

        Commands::Matrix { from, to } => {
            let matrix = engine.matrix(&from, &to)?;
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&matrix)?);
            } else {
                println!("Conversion matrix {} -> {}", matrix.source_db, matrix.target_db);
                println!("  Compatibility: {}", matrix.compatibility);
                println!("  Complexity: {}", matrix.complexity);
                println!("  Success rate: {:.0}%", matrix.success_rate * 100.0);
                println!("  Duration: {}", matrix.duration);
                if !matrix.strategies.is_empty() {
                    let strategies: Vec<String> =
                        matrix.strategies.iter().map(|s| s.to_string()).collect();
                    println!("  Strategies: {}", strategies.join(", "));
                }
                println!("  Object types:");
                for rule in matrix.object_conversions.values() {
                    println!("    {:<20} {}", rule.object_type, rule.action);
                }
                for note in &matrix.notes {
                    println!("  Note: {}", note);
                }
                for warning in &matrix.warnings {
                    println!("  Warning: {}", warning);
                }
            }
        }

        Commands::Path { from, to } => {
            let path = engine.find_path(&from, &to)?;
            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&path)?);
            } else {
                println!("Conversion path {} -> {}", path.source_db, path.target_db);
                for step in &path.steps {
                    println!("  {} -> {} ({})", step.from, step.to, step.complexity);
                }
                println!("  Total complexity: {}", path.total_complexity);
                println!("  Recommended: {}", if path.recommended { "yes" } else { "no" });
            }
        }

        Commands::Convert {
            schema,
            from,
            to,
            mode,
            output,
            preferences,
        } => {
            let schema = Schema::load(&schema)?;
            let preferences = match preferences {
                Some(path) => load_preferences(&path)?,
                None => UserPreferences::default(),
            };
            let mut request = ConversionRequest::new(schema, from, to).with_preferences(preferences);
            request.mode = mode.map(ExecutionMode::from);

            let cancel_token = setup_signal_handler();
            let engine = engine.with_cancellation(cancel_token);

            let mut result = convert_blocking(&engine, &request).await?;

            // Ask pending decisions on a terminal and re-run with the answers
            if !result.pending_decisions.is_empty() && !cli.output_json && std::io::stdin().is_terminal() {
                ask_decisions(&result, &mut request.preferences)?;
                request.mode = Some(ExecutionMode::Automatic);
                result = convert_blocking(&engine, &request).await?;
            }

            if let (Some(path), Some(converted)) = (&output, &result.schema) {
                write_schema(path, converted)?;
                info!("Wrote converted schema to {:?}", path);
            }

            if cli.output_json {
                println!("{}", result.to_json()?);
            } else {
                print_summary(&result);
            }
        }
    }

    Ok(())
}

/// Run the conversion on a blocking task so signal handlers stay responsive.
async fn convert_blocking(
    engine: &ConversionEngine,
    request: &ConversionRequest,
) -> Result<ConversionResult, ConvertError> {
    let engine = engine.clone();
    let request = request.clone();
    tokio::task::spawn_blocking(move || engine.try_convert(&request))
        .await
        .map_err(|e| ConvertError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?
}

fn ask_decisions(result: &ConversionResult, preferences: &mut UserPreferences) -> Result<(), ConvertError> {
    let theme = ColorfulTheme::default();
    for decision in &result.pending_decisions {
        let default = decision
            .options
            .iter()
            .position(|o| *o == decision.default)
            .unwrap_or(0);
        let choice = Select::with_theme(&theme)
            .with_prompt(&decision.question)
            .items(&decision.options)
            .default(default)
            .interact()
            .map_err(|e| ConvertError::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))?;
        preferences
            .decisions
            .insert(decision.id.clone(), decision.options[choice].clone());
    }
    Ok(())
}

fn print_summary(result: &ConversionResult) {
    let Some(report) = &result.report else {
        return;
    };
    let status = if report.dry_run {
        "Dry run completed!"
    } else if result.schema.is_none() {
        "Analysis completed!"
    } else {
        "Conversion completed!"
    };
    println!("\n{}", status);
    println!("  Request ID: {}", report.request_id);
    println!("  {} -> {}", report.source_db, report.target_db);
    println!("  Compatibility: {}", report.compatibility);
    println!("  Complexity: {}", report.complexity);
    println!(
        "  Objects: {}/{} converted ({:.0}%)",
        report.total_converted(),
        report.total_source_objects(),
        report.success_rate * 100.0
    );
    println!(
        "  Estimated: {:.0}% success, {}",
        report.estimated_success_rate * 100.0,
        report.estimated_duration
    );
    println!("  Duration: {}ms", result.elapsed_ms);

    let serious: Vec<_> = result.warnings_at_least(Severity::Warning).collect();
    if !serious.is_empty() {
        println!("  Warnings:");
        for warning in serious {
            println!("    [{}] {}", warning.severity, warning.message);
        }
    }
    if !result.unsupported_features.is_empty() {
        println!("  Unsupported: {}", result.unsupported_features.len());
    }
    for decision in &result.pending_decisions {
        println!("  Pending: {} (default: {})", decision.id, decision.default);
    }
}

fn load_preferences(path: &Path) -> Result<UserPreferences, ConvertError> {
    let content = std::fs::read_to_string(path)?;
    if is_json(path) {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(serde_yaml::from_str(&content)?)
    }
}

fn write_schema(path: &Path, schema: &Schema) -> Result<(), ConvertError> {
    let content = if is_json(path) {
        serde_json::to_string_pretty(schema)?
    } else {
        serde_yaml::to_string(schema)?
    };
    std::fs::write(path, content)?;
    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn init_config(path: &Path, force: bool) -> Result<(), ConvertError> {
    if path.exists() && !force {
        return Err(ConvertError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    std::fs::write(path, Config::default().to_yaml()?)?;
    println!("Configuration written to {}", path.display());
    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Setup signal handlers for cancellation.
/// Handles both SIGINT (Ctrl-C) and SIGTERM.
#[cfg(unix)]
fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();

    for (kind, name) in [(SignalKind::interrupt(), "SIGINT"), (SignalKind::terminate(), "SIGTERM")] {
        let token = cancel_token.clone();
        tokio::spawn(async move {
            match signal(kind) {
                Ok(mut stream) => {
                    stream.recv().await;
                    eprintln!("\nReceived {}. Cancelling conversion...", name);
                    token.cancel();
                }
                Err(e) => eprintln!("Failed to install {} handler: {}", name, e),
            }
        });
    }

    cancel_token
}

/// Setup signal handler for Windows (only Ctrl-C)
#[cfg(not(unix))]
fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nReceived Ctrl-C. Cancelling conversion...");
            token.cancel();
        }
    });

    cancel_token
}
