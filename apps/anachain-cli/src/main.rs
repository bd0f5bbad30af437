use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

use config::{CliConfig, Overrides};
use error::CliResult;

#[derive(Parser)]
#[command(name = "anachain")]
#[command(about = "Anachain CLI - Manage Anachain counter accounts on Solana")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.config/anachain/config.yml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cluster: devnet, testnet, mainnet-beta, localnet or an RPC URL
    #[arg(short = 'u', long, global = true)]
    cluster: Option<String>,

    /// RPC endpoint to use instead of the cluster's public one
    #[arg(long, global = true)]
    rpc_url: Option<String>,

    /// Payer keypair file
    #[arg(short, long, global = true)]
    keypair: Option<PathBuf>,

    /// Program id to use instead of the cluster default (required off devnet/testnet)
    #[arg(long, global = true)]
    program_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new counter account (count starts at 0)
    Initialize {
        /// Save the new account's keypair to this file
        #[arg(long)]
        keypair_out: Option<PathBuf>,
    },

    /// Add one to a counter
    Increment {
        /// Counter account address
        address: String,
    },

    /// Subtract one from a counter
    Decrement {
        /// Counter account address
        address: String,
    },

    /// Set a counter to a value
    Set {
        /// Counter account address
        address: String,

        /// New count
        value: u8,
    },

    /// Close a counter and return its rent to the payer
    Close {
        /// Counter account address
        address: String,
    },

    /// Show one counter
    Show {
        /// Counter account address
        address: String,
    },

    /// List every counter owned by the program
    List,

    /// Show the program account on the selected cluster
    ProgramInfo,
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = CliConfig::load(cli.config.as_deref())?.resolve(Overrides {
        cluster: cli.cluster,
        rpc_url: cli.rpc_url,
        keypair_path: cli.keypair,
        program_id: cli.program_id,
    })?;

    match cli.command {
        Commands::Initialize { keypair_out } => {
            commands::initialize::execute(&settings, keypair_out).await
        }
        Commands::Increment { address } => commands::increment::execute(&settings, address).await,
        Commands::Decrement { address } => commands::decrement::execute(&settings, address).await,
        Commands::Set { address, value } => commands::set::execute(&settings, address, value).await,
        Commands::Close { address } => commands::close::execute(&settings, address).await,
        Commands::Show { address } => commands::show::execute(&settings, address).await,
        Commands::List => commands::list::execute(&settings).await,
        Commands::ProgramInfo => commands::program_info::execute(&settings).await,
    }
}
