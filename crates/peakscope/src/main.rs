//! peakscope: step-by-step visualizer for pivot search in rotated arrays
//!
//! Generates the decision trace of the peak-finding binary search for an
//! input sequence and plays it back in the terminal.

mod config;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use peakscope_shell::{
    Command, DriverEvent, HELP, PlaybackDriver, Player, TraceRecord, TraceWriter, WriterConfig,
    find_case, parse_sequence, random_rotation, render_case_table, render_log, render_step,
    run_examples,
};
use peakscope_trace::{Trace, generate};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use config::Config;

/// Step-by-step visualizer for pivot search in rotated sorted arrays
#[derive(Parser)]
#[command(name = "peakscope")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to .peakscope directory or config file (default: search for .peakscope/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where the input sequence comes from.
#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Comma-separated integers, e.g. "4,5,6,7,0,1,2,3"
    #[arg(allow_hyphen_values = true)]
    input: Option<String>,

    /// Use a random rotation of 0..SIZE (default size from config)
    #[arg(long, value_name = "SIZE", conflicts_with_all = ["input", "case"])]
    random: Option<Option<usize>>,

    /// Use a built-in example case, by number (1-based) or name
    #[arg(long, value_name = "CASE", conflicts_with = "input")]
    case: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a trace and play it back
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Milliseconds between steps while playing
        #[arg(long, value_parser = clap::value_parser!(u64).range(200..=2000))]
        interval_ms: Option<u64>,

        /// Print every step at once instead of playing
        #[arg(long, conflicts_with = "interactive")]
        no_play: bool,

        /// Control playback from stdin (next, prev, play, pause, seek, speed, quit)
        #[arg(long, short)]
        interactive: bool,

        /// Print the trace as JSON and exit
        #[arg(long, conflicts_with_all = ["no_play", "interactive"])]
        json: bool,
    },

    /// Run the built-in example cases and report pass/fail
    Check {
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Append a trace record to a JSONL file
    Export {
        #[command(flatten)]
        input: InputArgs,

        /// Output file (default: export path from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Initialize a new .peakscope directory with config file
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

fn env_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Initialize logging to stderr, keeping stdout for rendered output.
fn init_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter(verbose))
        .init();
}

/// Initialize logging to daily-rotated files in `.peakscope/logs/`.
fn init_file_logging(data_dir: &Path, verbose: bool) {
    let logs_dir = data_dir.join("logs");

    if let Err(e) = std::fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Failed to create logs directory: {}", e);
        init_logging(verbose);
        return;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &logs_dir, "peakscope.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Dropping the guard stops the background writer.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .with(env_filter(verbose))
        .init();
}

/// Load config from an explicit path or auto-discover `.peakscope/config.toml`.
///
/// Returns the config and the `.peakscope` directory it came from, if any.
/// Logging is not up yet, so discovery problems are returned as notes.
fn load_config(override_path: Option<&PathBuf>) -> Result<(Config, Option<PathBuf>, Vec<String>)> {
    let mut notes = Vec::new();

    if let Some(path) = override_path {
        let config_file = if path.is_dir() {
            path.join(config::CONFIG_FILE)
        } else {
            path.clone()
        };
        let data_dir = config_file.parent().unwrap_or(path).to_path_buf();
        let config = Config::from_file(&config_file)?;
        notes.push(format!("Loaded config from {}", config_file.display()));
        return Ok((config, Some(data_dir), notes));
    }

    match Config::find_and_load() {
        Ok(Some((config, data_dir))) => {
            notes.push(format!("Found config at {}", data_dir.display()));
            Ok((config, Some(data_dir), notes))
        }
        Ok(None) => Ok((Config::default(), None, notes)),
        Err(e) => {
            notes.push(format!("Error searching for config: {:#}, using defaults", e));
            Ok((Config::default(), None, notes))
        }
    }
}

/// Resolve the input sequence and a label describing where it came from.
fn resolve_input(args: &InputArgs, config: &Config) -> Result<(String, Vec<i64>)> {
    if let Some(text) = &args.input {
        return Ok(("input".to_string(), parse_sequence(text)?));
    }
    if let Some(key) = &args.case {
        let case = find_case(key)?;
        return Ok((format!("case:{}", case.name), case.values.to_vec()));
    }
    if let Some(size) = args.random {
        let size = size.unwrap_or(config.input.random_size);
        let values = random_rotation(size, &mut rand::rng());
        return Ok(("random".to_string(), values));
    }
    let values = parse_sequence(&config.input.default)
        .context("Invalid [input] default in config")?;
    Ok(("default".to_string(), values))
}

fn build_trace(args: &InputArgs, config: &Config) -> Result<(String, Trace)> {
    let (source, values) = resolve_input(args, config)?;
    let trace = generate(&values);
    info!(
        source = %source,
        len = values.len(),
        steps = trace.len(),
        peak = ?trace.peak_index(),
        fallback = trace.used_fallback(),
        "Trace generated"
    );
    Ok((source, trace))
}

fn export_trace(path: &Path, source: &str, trace: &Trace) -> Result<()> {
    let writer = TraceWriter::new(WriterConfig::new(path))
        .with_context(|| format!("Failed to open export file {}", path.display()))?;
    writer
        .write(&TraceRecord::new(source, trace.clone()))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Trace exported to {}", path.display());
    Ok(())
}

fn draw(player: &Player) {
    println!("{}", "-".repeat(40));
    print!("{}", render_step(player.trace(), player.cursor()));
    println!("[{:?}]", player.state());
}

/// Play the trace on a timer until it ends.
async fn play_trace(trace: Trace, interval: Duration) {
    let mut driver = PlaybackDriver::new(trace, interval);
    draw(driver.player());
    driver.play_to_end(draw).await;
    println!();
    print!("{}", render_log(driver.player().trace(), driver.player().cursor()));
}

enum Input {
    Tick(Option<peakscope_shell::Tick>),
    Line(Option<String>),
}

/// Play the trace under control of commands read from stdin.
async fn play_interactive(trace: Trace, interval: Duration, autoplay: bool) -> Result<()> {
    let mut driver = PlaybackDriver::new(trace, interval);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}");
    if autoplay {
        driver.apply(Command::Play);
    }
    draw(driver.player());

    loop {
        let input = tokio::select! {
            tick = driver.next_tick() => Input::Tick(tick),
            line = lines.next_line() => Input::Line(line.context("Failed to read stdin")?),
        };

        match input {
            Input::Tick(None) | Input::Line(None) => break,
            Input::Tick(Some(tick)) => {
                if driver.on_tick(tick) != DriverEvent::Unchanged {
                    draw(driver.player());
                }
            }
            Input::Line(Some(line)) => match line.parse::<Command>() {
                Ok(command) => match driver.apply(command) {
                    DriverEvent::Quit => break,
                    DriverEvent::Updated | DriverEvent::Finished => draw(driver.player()),
                    DriverEvent::Unchanged => {}
                },
                Err(e) => eprintln!("{e}\n{HELP}"),
            },
        }
    }

    print!("{}", render_log(driver.player().trace(), driver.player().cursor()));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, config_dir, notes) = load_config(cli.config.as_ref())?;

    match (&config_dir, config.logging.to_file) {
        (Some(dir), true) => init_file_logging(dir, cli.verbose),
        _ => init_logging(cli.verbose),
    }
    for note in &notes {
        info!("{}", note);
    }
    for error in config.validate() {
        tracing::warn!("Config: {}", error);
    }

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Run {
            input,
            interval_ms,
            no_play,
            interactive,
            json,
        } => {
            let (source, trace) = build_trace(&input, &config)?;

            if config.export.enabled {
                let path = config.resolve_export_path(config_dir.as_deref());
                export_trace(&path, &source, &trace)?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&trace)?);
                return Ok(());
            }

            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| config.interval());

            if interactive {
                play_interactive(trace, interval, config.playback.autoplay).await?;
            } else if no_play || !config.playback.autoplay {
                for cursor in 0..trace.len() {
                    println!("{}", "-".repeat(40));
                    print!("{}", render_step(&trace, cursor));
                }
            } else {
                play_trace(trace, interval).await;
            }
        }

        Commands::Check { json } => {
            let reports = run_examples();
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                print!("{}", render_case_table(&reports));
            }

            let failed = reports.iter().filter(|r| !r.passed).count();
            if failed > 0 {
                anyhow::bail!("{} of {} example cases failed", failed, reports.len());
            }
            info!("All {} example cases passed", reports.len());
        }

        Commands::Export { input, out } => {
            let (source, trace) = build_trace(&input, &config)?;
            let path = out.unwrap_or_else(|| config.resolve_export_path(config_dir.as_deref()));
            export_trace(&path, &source, &trace)?;
            println!("{}", path.display());
        }

        Commands::Init { force } => {
            let data_dir = cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(config::PEAKSCOPE_DIR));
            let config_path = data_dir.join(config::CONFIG_FILE);

            if config_path.exists() && !force {
                anyhow::bail!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                );
            }

            std::fs::create_dir_all(&data_dir)
                .with_context(|| format!("Failed to create {}", data_dir.display()))?;
            std::fs::write(&config_path, Config::default().to_toml()?)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            println!("Created {}", config_path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input_args(args: &[&str]) -> InputArgs {
        let mut argv = vec!["peakscope", "export"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Export { input, .. }) => input,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_resolve_explicit_input() {
        let args = input_args(&["3,1,2"]);
        let (source, values) = resolve_input(&args, &Config::default()).unwrap();
        assert_eq!(source, "input");
        assert_eq!(values, vec![3, 1, 2]);
    }

    #[test]
    fn test_resolve_negative_input() {
        let args = input_args(&["-3,-1,-2"]);
        let (_, values) = resolve_input(&args, &Config::default()).unwrap();
        assert_eq!(values, vec![-3, -1, -2]);
    }

    #[test]
    fn test_resolve_case_and_default() {
        let args = input_args(&["--case", "5"]);
        let (source, values) = resolve_input(&args, &Config::default()).unwrap();
        assert_eq!(source, "case:Peak at index 0");
        assert_eq!(values, vec![3, 1, 2]);

        let (source, values) = resolve_input(&input_args(&[]), &Config::default()).unwrap();
        assert_eq!(source, "default");
        assert_eq!(values, vec![8, 9, 0, 1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_resolve_random_uses_config_size() {
        let mut config = Config::default();
        config.input.random_size = 6;

        let (source, values) = resolve_input(&input_args(&["--random"]), &config).unwrap();
        assert_eq!(source, "random");
        assert_eq!(values.len(), 6);

        let (_, values) = resolve_input(&input_args(&["--random", "3"]), &config).unwrap();
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn test_resolve_rejects_bad_input() {
        let err = resolve_input(&input_args(&["1,a"]), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("Only integers"));
    }

    #[test]
    fn test_conflicting_sources_rejected() {
        assert!(Cli::try_parse_from(["peakscope", "run", "1,2", "--case", "1"]).is_err());
        assert!(Cli::try_parse_from(["peakscope", "run", "--random", "--case", "1"]).is_err());
    }

    #[test]
    fn test_interval_range_enforced() {
        assert!(Cli::try_parse_from(["peakscope", "run", "--interval-ms", "100"]).is_err());
        assert!(Cli::try_parse_from(["peakscope", "run", "--interval-ms", "400"]).is_ok());
    }
}
