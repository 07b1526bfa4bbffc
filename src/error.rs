use std::io;

/// Recoverable failures: configuration, parsing and parameter validation.
///
/// Contract violations on the board API (bad coordinates, oversized
/// exponents, searching a board without legal moves) panic instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid weights: {0}")]
    Weights(String),
    #[error("invalid search parameter: {0}")]
    Parameter(String),
    #[error("unknown direction {0:?}")]
    Direction(String),
}

pub type Result<T> = std::result::Result<T, Error>;
