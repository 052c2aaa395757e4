use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use ld_luatable::EncodeError;

/// Errors of the document-generation workflow.
#[derive(Error, Debug)]
pub enum DocgenError {
    #[error("request parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no supported document in request")]
    NoDocument,

    #[error("table encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("failed to create directory `{}`: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to stage template `{}`: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write input data `{}`: {source}", .path.display())]
    InputData {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Typeset { command: String, status: ExitStatus },

    #[error("failed to stage output `{}`: {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("logging already initialized")]
    Logging,
}
