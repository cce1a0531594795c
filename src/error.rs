use std::io;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Config(String),

    #[error("password is required to create user {name}")]
    MissingPassword { name: String },

    #[error("{name}: {msg}")]
    CommandFailed { name: String, msg: String, rc: i32 },

    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Exit code of the external command, if one produced this error.
    pub fn rc(&self) -> Option<i32> {
        match self {
            Error::CommandFailed { rc, .. } => Some(*rc),
            _ => None,
        }
    }

    /// Text for the `msg` field of a failed report.
    pub fn msg(&self) -> String {
        match self {
            Error::CommandFailed { msg, .. } => msg.clone(),
            other => other.to_string(),
        }
    }
}
