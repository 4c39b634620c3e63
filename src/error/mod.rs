use thiserror::Error;

/// Fatal programming errors: reading state that was never written, or asking a round
/// for an answer it isn't entitled to give yet. These never arise from a Byzantine or
/// stale payload — see [`crate::consensus::round::admits`] for the payload-drop path,
/// which returns `bool`/`Option`, not `Result`.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("period state field '{0}' was read before it was populated")]
    UnpopulatedField(&'static str),

    #[error("threshold not reached for '{0}'")]
    ThresholdNotReached(&'static str),

    #[error("round is terminal; no further transition is possible")]
    TerminalRound,

    #[error("invalid consensus configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
