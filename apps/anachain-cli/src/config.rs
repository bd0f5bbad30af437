use crate::error::{CliError, CliResult};
use anachain_sdk::{deployed_program_id, Cluster};
use serde::{Deserialize, Serialize};
use solana_sdk::{
    commitment_config::{CommitmentConfig, CommitmentLevel},
    pubkey::Pubkey,
};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// Config file structure (`~/.config/anachain/config.yml` unless `--config` is given)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// devnet, testnet, mainnet-beta, localnet or an RPC URL
    pub cluster: Option<String>,

    /// RPC endpoint to use instead of the cluster's public one
    pub rpc_url: Option<String>,

    /// Path to the payer keypair file
    pub keypair_path: Option<PathBuf>,

    /// Program id to use instead of the cluster default
    pub program_id: Option<String>,

    /// processed, confirmed or finalized
    pub commitment: Option<String>,
}

/// Values given on the command line; each one wins over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub cluster: Option<String>,
    pub rpc_url: Option<String>,
    pub keypair_path: Option<PathBuf>,
    pub program_id: Option<String>,
}

/// Fully resolved settings a command runs with
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub cluster: Cluster,
    pub rpc_url: String,
    pub keypair_path: PathBuf,
    pub program_id: Option<Pubkey>,
    pub commitment: CommitmentConfig,
}

impl CliConfig {
    /// Load `path`, or the default config file if it exists
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    pub fn resolve(self, overrides: Overrides) -> CliResult<Settings> {
        let cluster: Cluster = overrides
            .cluster
            .or(self.cluster)
            .as_deref()
            .unwrap_or("devnet")
            .parse()?;

        let rpc_url = overrides
            .rpc_url
            .or(self.rpc_url)
            .unwrap_or_else(|| cluster.rpc_url());
        // Explorer links must point at the endpoint actually used
        let cluster = cluster.with_rpc_url(&rpc_url)?;

        let keypair_path = overrides
            .keypair_path
            .or(self.keypair_path)
            .or_else(default_keypair_path)
            .ok_or_else(|| {
                CliError::InvalidConfig("No keypair path given and HOME is not set".to_string())
            })?;

        let program_id = overrides
            .program_id
            .or(self.program_id)
            .map(|id| {
                Pubkey::from_str(&id)
                    .map_err(|e| CliError::InvalidConfig(format!("Invalid program id {id}: {e}")))
            })
            .transpose()?
            .or_else(|| deployed_program_id(&cluster));
        if program_id.is_none() {
            return Err(CliError::InvalidConfig(format!(
                "No known Anachain deployment on {cluster}; pass --program-id"
            )));
        }

        let commitment = match self.commitment.as_deref() {
            None => CommitmentConfig::confirmed(),
            Some(level) => CommitmentConfig {
                commitment: CommitmentLevel::from_str(level).map_err(|_| {
                    CliError::InvalidConfig(format!("Invalid commitment level: {level}"))
                })?,
            },
        };

        Ok(Settings {
            cluster,
            rpc_url,
            keypair_path,
            program_id,
            commitment,
        })
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

fn default_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".config/anachain/config.yml"))
}

/// The Solana CLI's default keypair
fn default_keypair_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".config/solana/id.json"))
}
