//! Error types for `LuauPad`
//!
//! Each user action has its own failure type so the caller can pick the right
//! recovery: a blocking alert for [`ReadError`] and [`ClipboardError`], a log
//! line for [`NetworkError`].

use std::path::PathBuf;

use thiserror::Error;

use crate::state::DocumentId;

/// A local file could not be imported
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not a text file", path.display())]
    NotText { path: PathBuf },
}

/// Writing to the system clipboard failed
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("clipboard write refused: {0}")]
    Denied(String),
}

/// A dispatch to the remote endpoint failed
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} answered with status {status}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("dispatch worker stopped before reporting a result")]
    Dropped,
}

/// An export could not be written
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("export cancelled")]
    Cancelled,
}

/// Configuration file problems
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// The error type for `LuauPad` operations.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    #[error("document {0} is not open")]
    DocumentNotFound(DocumentId),

    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("grammar error: {0}")]
    Grammar(#[from] luausyntax::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
