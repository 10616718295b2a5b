//! hrosc - forward heart-rate readings as OSC over UDP
//!
//! Sends single readings, or streams BPM samples read from stdin, to a
//! configured OSC receiver.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use hrosc_core::codec::hex_dump;
use hrosc_transport::OscSender;
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{event, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod samples;

use config::{Config, Overrides};

const DEFAULT_LOG_LEVEL: &str = "info";

/// Level of the `--trace` hex dump; visible under the default filter
const TRACE_DUMP_LEVEL: Level = Level::INFO;

/// HROSC - heart rate over Open Sound Control
#[derive(Parser)]
#[command(name = "hrosc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Destination host (overrides config)
    #[arg(short = 'H', long, global = true, env = "HROSC_HOST")]
    host: Option<String>,

    /// Destination UDP port (overrides config)
    #[arg(short = 'P', long, global = true, env = "HROSC_PORT")]
    port: Option<u16>,

    /// OSC address pattern (overrides config)
    #[arg(long, global = true, env = "HROSC_PATH")]
    path: Option<String>,

    /// Log a hex dump of every datagram at info level
    #[arg(long, global = true)]
    trace: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a single value
    Send {
        /// Value to send (float unless --int is given)
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Send as int32 (type tag ,i) instead of float32
        #[arg(long)]
        int: bool,
    },

    /// Forward BPM samples read from stdin, one per line
    Stream,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version and effective destination
    Info,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the effective configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Print the default config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli.log_level, cli.json_logs)?;

    // `config init` may name a file that does not exist yet
    let loaded = match (&cli.command, cli.config.as_deref()) {
        (
            Commands::Config {
                action: ConfigAction::Init { .. },
            },
            Some(path),
        ) => Config::load_or_default(path)?,
        (_, explicit) => Config::load(explicit)?,
    };

    let config = loaded.apply(Overrides {
        host: cli.host.clone(),
        port: cli.port,
        path: cli.path.clone(),
        trace: cli.trace,
    });

    match cli.command {
        Commands::Send { value, int } => {
            config.validate()?;
            send_value(&config, &value, int).await?;
        }

        Commands::Stream => {
            config.validate()?;
            println!(
                "{} Streaming heart rate to {} at {}",
                "HROSC".red().bold(),
                config.destination().to_string().yellow(),
                config.osc.path.cyan()
            );
            run_stream(&config).await?;
        }

        Commands::Config { action } => {
            run_config(action, &config, cli.config)?;
        }

        Commands::Info => {
            print_info(&config);
        }
    }

    Ok(())
}

fn setup_logging(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("Failed to parse log level")?;

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).compact())
            .init();
    }

    Ok(())
}

fn build_sender(config: &Config) -> OscSender {
    let sender = OscSender::udp();
    if config.osc.trace {
        sender.with_trace_hook(|msg, bytes| {
            event!(
                TRACE_DUMP_LEVEL,
                "OSC {} ({} bytes): {}",
                msg.address(),
                bytes.len(),
                hex_dump(bytes)
            );
        })
    } else {
        sender
    }
}

async fn send_value(config: &Config, value: &str, int: bool) -> Result<()> {
    let sender = build_sender(config);
    let destination = config.destination();
    let path = &config.osc.path;

    if int {
        let value: i32 = value
            .trim()
            .parse()
            .with_context(|| format!("Not an int32: {}", value))?;
        sender
            .send_int(&destination, path, value)
            .await
            .with_context(|| format!("Failed to send to {}", destination))?;
    } else {
        let value: f32 = value
            .trim()
            .parse()
            .with_context(|| format!("Not a float32: {}", value))?;
        sender
            .send_float(&destination, path, value)
            .await
            .with_context(|| format!("Failed to send to {}", destination))?;
    }

    println!(
        "{} Sent {} {} -> {}",
        "HROSC".red().bold(),
        path.cyan(),
        value,
        destination.to_string().yellow()
    );

    Ok(())
}

async fn run_stream(config: &Config) -> Result<()> {
    // Handle Ctrl+C
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
            let _ = shutdown_tx.send(()).await;
        }
    });

    let stats = samples::run_stream(
        BufReader::new(tokio::io::stdin()),
        build_sender(config),
        config.destination(),
        &config.osc.path,
        &mut shutdown_rx,
    )
    .await?;

    info!(
        "Stream finished: {} sent, {} skipped, {} failed",
        stats.sent, stats.skipped, stats.failed
    );

    Ok(())
}

fn run_config(action: ConfigAction, config: &Config, explicit: Option<PathBuf>) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            let path = explicit.unwrap_or_else(config::default_config_file);
            config.init(&path, force)?;
            println!(
                "{} Wrote {}",
                "HROSC".red().bold(),
                path.display().to_string().green()
            );
        }

        ConfigAction::Show => {
            let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
            print!("{}", content);
        }

        ConfigAction::Path => {
            println!("{}", config::default_config_file().display());
        }
    }

    Ok(())
}

fn print_info(config: &Config) {
    println!(
        "{}",
        "HROSC - heart rate over Open Sound Control".red().bold()
    );
    println!();
    println!("Version:     {}", env!("CARGO_PKG_VERSION"));
    println!("Platform:    {}", std::env::consts::OS);
    println!("Arch:        {}", std::env::consts::ARCH);
    println!("Destination: {}", config.destination());
    println!("OSC path:    {}", config.osc.path);
    println!("Config file: {}", config::default_config_file().display());
    println!();
    println!("{}", "Examples:".green());
    println!("  hrosc send 72                      # Send 72.0 as ,f");
    println!("  hrosc send 72 --int                # Send 72 as ,i");
    println!("  hrosc stream -H 10.0.0.5 -P 9000   # Forward stdin samples");
    println!("  hrosc config init                  # Save current settings");
}
