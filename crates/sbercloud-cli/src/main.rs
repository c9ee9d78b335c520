mod commands;
mod inputs;

use clap::{Parser, Subcommand};
use inputs::InputArgs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sbc")]
#[command(about = "Resolve and validate SberCloud provider configuration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the configuration and authenticate against IAM
    Validate {
        #[command(flatten)]
        inputs: InputArgs,
        /// Protocol version of the orchestrating host
        #[arg(long)]
        host_version: Option<String>,
    },
    /// Resolve the configuration without contacting the cloud
    Resolve {
        #[command(flatten)]
        inputs: InputArgs,
        /// Protocol version of the orchestrating host
        #[arg(long)]
        host_version: Option<String>,
    },
    /// Show the provider input schema
    Schema {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List registered resources and data sources
    Resources {
        /// Only objects of this service (iam, vpc, dns)
        #[arg(short, long)]
        service: Option<String>,
    },
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Validate {
            inputs,
            host_version,
        } => commands::validate::handle(inputs, host_version).await,
        Commands::Resolve {
            inputs,
            host_version,
        } => commands::resolve::handle(inputs, host_version),
        Commands::Schema { json } => commands::schema::handle(json),
        Commands::Resources { service } => commands::resources::handle(service.as_deref()),
        Commands::Version => {
            println!("sbercloud-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
