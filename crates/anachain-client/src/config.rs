use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

/// Configuration for program handles
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Commitment level used for reads and transaction confirmation
    pub commitment: CommitmentConfig,

    /// Whether mutations wait for the refetch of the invalidated entries before returning
    pub await_refetch: bool,

    /// Program id to use instead of the per-cluster default
    pub program_id_override: Option<Pubkey>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            commitment: CommitmentConfig::confirmed(),
            await_refetch: true,
            program_id_override: None,
        }
    }
}
