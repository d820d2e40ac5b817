//! consumerctl - one-shot operator tool for storage consumer registrations.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "consumerctl", version, about = "Manage a storage consumer registration")]
struct Cli {
    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show what a connection string points at.
    Decode(commands::DecodeArgs),
    /// Build a connection string from a ticket and a provider address.
    Encode(commands::EncodeArgs),
    /// Run a single lifecycle pass for a StorageCluster manifest.
    Reconcile(commands::ReconcileArgs),
}

fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format);

    match cli.command {
        Commands::Decode(args) => commands::decode(&args),
        Commands::Encode(args) => commands::encode(&args),
        Commands::Reconcile(args) => commands::reconcile(args).await,
    }
}
