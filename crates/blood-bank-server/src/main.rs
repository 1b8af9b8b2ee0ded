//! blood-bank-server binary.

use std::path::PathBuf;

use anyhow::{Context, Result};
use blood_bank_server::Config;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Blood bank REST API server
#[derive(Parser, Debug)]
#[command(name = "blood-bank-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "blood-bank.toml")]
    config: PathBuf,

    /// Address to bind (overrides `[server] host`)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides `[server] port`)
    #[arg(short, long)]
    port: Option<u16>,

    /// SQLite database file (overrides `[database] path`)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log to file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(log_file) = &args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .context("failed to open log file")?;

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(file)
                    .with_ansi(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(database) = &args.database {
        config.database.path = database.clone();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = load_config(&args)?;
    info!(
        database = %config.database.path.display(),
        check_expiry = config.transfusions.check_expiry,
        "starting blood bank server"
    );

    let app = blood_bank_server::app(&config).context("failed to open database")?;

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;

    blood_bank_server::serve(listener, app)
        .await
        .context("server error")?;
    Ok(())
}
