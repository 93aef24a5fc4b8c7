use thiserror::Error;

/// Error taxonomy shared by every flow in the workspace.
///
/// Configuration and resolution failures are detected before any call into
/// the sealer capability; capability failures surface as [`BenchError::Proof`]
/// and are never converted into a success signal.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("invalid challenge length: expected 32 bytes, got {0}")]
    ChallengeLength(usize),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported sector size: {0} bytes")]
    UnsupportedSectorSize(u64),

    #[error("cannot resolve miner address {addr:?}: {reason}")]
    Resolution { addr: String, reason: String },

    #[error("proof backend failure: {0}")]
    Proof(String),

    #[error("seal worker terminated abnormally: {0}")]
    Worker(String),

    #[error("malformed payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BenchError>;
