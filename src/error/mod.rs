mod from;

use std::fmt::Display;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("store is unavailable: {0}")]
    StoreUnavailable(String),

    #[error("`{0}` is not a valid id")]
    InvalidId(String),

    #[error("script `{script}` takes {min} to {max} keys, got {actual}")]
    ScriptArity {
        script: &'static str,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("invalid event on line {line}: {reason}")]
    InvalidEvent { line: usize, reason: String },

    #[error("{0}")]
    Cli(String),

    #[error(transparent)]
    Other(AnyError),
}

#[derive(Error, Debug)]
pub struct AnyError(anyhow::Error);

impl Display for AnyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq for AnyError {
    fn eq(&self, _other: &Self) -> bool {
        false
    }
}

impl Error {
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Other(AnyError(error.into()))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}

impl From<anyhow::Error> for Error {
    fn from(error: anyhow::Error) -> Self {
        Error::Other(AnyError(error))
    }
}
