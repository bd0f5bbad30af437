use crate::{SdkError, SdkResult};
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey, pubkey::Pubkey};
use std::{fmt, str::FromStr};
use url::{form_urlencoded, Url};

/// Stand-in for the program id declared in the Anachain IDL, which is not
/// shipped with this crate. Used for mainnet-beta, localnet and custom clusters
/// when no deployed id is supplied; see [`deployed_program_id`].
pub const ANACHAIN_PROGRAM_ID: Pubkey = pubkey!("BcsrvACyUr2i5Unsbw8zFw9PyE5s57H7Gcu9CLbhb1jP");

/// Program id deployed on devnet and testnet.
pub const ANACHAIN_DEVNET_PROGRAM_ID: Pubkey =
    pubkey!("coUnmi3oBUtwtd9fjeAvSsJssXh5A5xyPbhpewyzRVF");

/// Network the client is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cluster {
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    /// Any other RPC endpoint, stored as a validated http(s) URL
    Custom(String),
}

impl Cluster {
    /// Default public RPC endpoint for this cluster
    pub fn rpc_url(&self) -> String {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com".to_string(),
            Cluster::Testnet => "https://api.testnet.solana.com".to_string(),
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com".to_string(),
            Cluster::Localnet => "http://127.0.0.1:8899".to_string(),
            Cluster::Custom(url) => url.clone(),
        }
    }

    /// The cluster as seen through `rpc_url`. A localnet reached at anything
    /// but the default address is a custom cluster.
    pub fn with_rpc_url(self, rpc_url: &str) -> SdkResult<Self> {
        match self {
            Cluster::Localnet if rpc_url != self.rpc_url() => match rpc_url.parse()? {
                Cluster::Custom(url) => Ok(Cluster::Custom(url)),
                _ => Ok(Cluster::Localnet),
            },
            other => Ok(other),
        }
    }

    /// Query string the Solana Explorer needs to show this cluster
    pub fn explorer_query(&self) -> String {
        match self {
            Cluster::Devnet => "?cluster=devnet".to_string(),
            Cluster::Testnet => "?cluster=testnet".to_string(),
            Cluster::MainnetBeta => String::new(),
            Cluster::Localnet | Cluster::Custom(_) => {
                let rpc_url = self.rpc_url();
                let encoded: String = form_urlencoded::byte_serialize(rpc_url.as_bytes()).collect();
                format!("?cluster=custom&customUrl={encoded}")
            }
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Testnet => write!(f, "testnet"),
            Cluster::MainnetBeta => write!(f, "mainnet-beta"),
            Cluster::Localnet => write!(f, "localnet"),
            Cluster::Custom(url) => write!(f, "{url}"),
        }
    }
}

impl FromStr for Cluster {
    type Err = SdkError;

    fn from_str(s: &str) -> SdkResult<Self> {
        match s.trim() {
            "devnet" | "d" => Ok(Cluster::Devnet),
            "testnet" | "t" => Ok(Cluster::Testnet),
            "mainnet-beta" | "mainnet" | "m" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" | "l" => Ok(Cluster::Localnet),
            other => {
                let url = Url::parse(other)
                    .map_err(|e| SdkError::InvalidCluster(format!("{other}: {e}")))?;
                match url.scheme() {
                    "http" | "https" => Ok(Cluster::Custom(other.to_string())),
                    scheme => Err(SdkError::InvalidCluster(format!(
                        "{other}: unsupported scheme {scheme}"
                    ))),
                }
            }
        }
    }
}

impl TryFrom<String> for Cluster {
    type Error = SdkError;

    fn try_from(value: String) -> SdkResult<Self> {
        value.parse()
    }
}

impl From<Cluster> for String {
    fn from(cluster: Cluster) -> Self {
        cluster.to_string()
    }
}

/// Resolve the program id for a cluster. Pure; no RPC.
pub fn program_id_for(cluster: &Cluster) -> Pubkey {
    match cluster {
        Cluster::Devnet | Cluster::Testnet => ANACHAIN_DEVNET_PROGRAM_ID,
        Cluster::MainnetBeta | Cluster::Localnet | Cluster::Custom(_) => ANACHAIN_PROGRAM_ID,
    }
}

/// The id the program is known to be deployed at, if any. Other clusters
/// must be given their id explicitly.
pub fn deployed_program_id(cluster: &Cluster) -> Option<Pubkey> {
    match cluster {
        Cluster::Devnet | Cluster::Testnet => Some(ANACHAIN_DEVNET_PROGRAM_ID),
        Cluster::MainnetBeta | Cluster::Localnet | Cluster::Custom(_) => None,
    }
}
