//! pixtick CLI: run the bundled demos on a terminal virtual board.

mod bindings;
mod demos;
mod term;

use std::fs::File;
use std::sync::Mutex;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use pixtick_runtime::{setup, Config, Outcome, Runtime};
use pixtick_types::Rotation;
use tracing_subscriber::EnvFilter;

use demos::{DemoKind, Quittable};
use term::TerminalBoard;

#[derive(Parser)]
#[command(
    name = "pixtick",
    about = "Fixed-tick game loop for monochrome displays",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a demo on the terminal board.
    Run {
        /// Demo to run.
        #[arg(value_enum, default_value = "geom")]
        demo: DemoKind,

        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,

        /// Stop after this many ticks.
        #[arg(long)]
        max_ticks: Option<u64>,

        /// Display rotation in degrees.
        #[arg(long, value_parser = parse_rotation)]
        rotation: Option<Rotation>,

        /// Tick period in milliseconds.
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Write logs here; the terminal is busy while a demo runs.
        #[arg(long)]
        log_file: Option<String>,
    },

    /// Print the effective configuration as TOML.
    Config {
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// List the keyboard bindings of the terminal board.
    Keys,
}

fn parse_rotation(s: &str) -> Result<Rotation, String> {
    let degrees: u16 = s.parse().map_err(|e| format!("{e}"))?;
    Rotation::try_from(degrees).map_err(|e| e.to_string())
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            demo,
            config,
            max_ticks,
            rotation,
            tick_ms,
            log_file,
        } => {
            let mut config = setup::load_config(config.as_deref())?;
            if let Some(max_ticks) = max_ticks {
                config.runtime.max_ticks = Some(max_ticks);
            }
            if let Some(rotation) = rotation {
                config.display.rotation = rotation;
            }
            if let Some(tick_ms) = tick_ms {
                config.runtime.tick_ms = tick_ms;
            }

            if let Some(path) = log_file {
                let file = File::create(&path)
                    .with_context(|| format!("failed to create log file {path}"))?;
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter(&config.runtime.log_level))
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .init();
            }

            run_demo(demo, config)?;
        }
        Commands::Config { config } => {
            init_stderr_logging("warn");
            let config = match config {
                Some(path) => setup::load_config(Some(&path))?,
                None => Config::default(),
            };
            print!("{}", setup::render_config(&config)?);
        }
        Commands::Keys => {
            for (key, keys) in bindings::BINDINGS {
                println!("{:<14} {keys}", key.to_string());
            }
            println!("{:<14} {}", "quit", bindings::QUIT_KEYS);
        }
    }

    Ok(())
}

fn init_stderr_logging(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .init();
}

fn run_demo(demo: DemoKind, config: Config) -> anyhow::Result<()> {
    tracing::info!(?demo, tick_ms = config.runtime.tick_ms, "starting demo");

    let mut board = TerminalBoard::new();
    let mut game = Quittable::new(demo.build(), board.quit_signal());

    let report = {
        let mut runtime = Runtime::from_hardware(config, &mut board)?;
        runtime.run(&mut game)?
    };

    let outcome = match report.outcome {
        Outcome::Terminated => "quit",
        Outcome::TickLimit => "tick limit reached",
    };
    println!(
        "{outcome} after {} ticks ({} frames, {} late)",
        report.ticks, report.frames, report.late_ticks
    );
    Ok(())
}
