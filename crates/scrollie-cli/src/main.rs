use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scrollie_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "scrollie")]
#[command(author, version, about = "Eased scroll animations over native frames or timers")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the terminal demo
    Demo,
    /// Trace one animation on virtual time and print every offset written
    Trace(commands::trace::TraceArgs),
    /// Print the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // The demo owns the terminal, so its logs go to a file
    let log_to_file = matches!(cli.command, None | Some(Commands::Demo));
    init_logging(&config, log_to_file)?;

    match cli.command {
        Some(Commands::Demo) | None => commands::demo::run(config),
        Some(Commands::Trace(args)) => commands::trace::run(&config, args).await,
        Some(Commands::Config { init }) => commands::config::run(&config, init),
    }
}

fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );
    let registry = tracing_subscriber::registry().with(filter);

    if to_file {
        let path = config.log_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
    Ok(())
}
