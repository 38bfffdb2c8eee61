use crate::model::PairingId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShipdexError {
    #[error("Pairing not found: {0}")]
    NotFound(PairingId),

    #[error("Invalid snapshot: {0}")]
    InvalidFormat(String),

    #[error("Remote snapshot unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Image rejected: {0}")]
    UploadRejected(String),

    #[error("Could not save catalog: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ShipdexError>;
