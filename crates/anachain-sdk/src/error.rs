use thiserror::Error;

pub type SdkResult<T> = Result<T, SdkError>;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Account data too short: {len} bytes (need at least {required})")]
    AccountDataTooShort { len: usize, required: usize },

    #[error("Account discriminator mismatch: expected {expected:?}, found {found:?}")]
    DiscriminatorMismatch { expected: [u8; 8], found: [u8; 8] },

    #[error("Unknown instruction discriminator: {0:?}")]
    UnknownInstruction([u8; 8]),

    #[error("Instruction data too short: {0} bytes")]
    InstructionDataTooShort(usize),

    #[error("Borsh error: {0}")]
    Borsh(#[from] std::io::Error),

    #[error("Invalid cluster: {0}")]
    InvalidCluster(String),
}
