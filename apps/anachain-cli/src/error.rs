use anachain_client::ClientError;
use anachain_sdk::SdkError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0}")]
    Client(#[from] ClientError),

    #[error("Invalid cluster: {0}")]
    Cluster(#[from] SdkError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
