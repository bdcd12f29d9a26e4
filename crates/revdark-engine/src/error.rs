use thiserror::Error;

/// Errors raised while loading level content or asset metadata.
///
/// The frame path never produces these: running out of light is a game state,
/// not an error.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid colour {0:?}, expected \"rgb(r, g, b)\" or \"#rrggbb\"")]
    Color(String),

    #[error("no level at index {0}")]
    UnknownLevel(usize),

    #[error("level {0} is invalid: {1}")]
    InvalidLevel(usize, String),
}
