use std::path::PathBuf;
use thiserror::Error;

/// Startup failures. Any of these aborts the run before a file is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key is missing. Set the {var} environment variable or add it to a .env file.")]
    MissingApiKey { var: String },

    #[error("Failed to load env file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid directory: {0:?}")]
    InvalidDirectory(PathBuf),
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response contained no text")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{source}\nRaw content: {cleaned}")]
    Json {
        cleaned: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Parsed metadata that is too vague to name a file after.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("author is a placeholder ({0:?})")]
    PlaceholderAuthor(String),

    #[error("title is empty")]
    EmptyTitle,

    #[error("title is a placeholder ({0:?})")]
    PlaceholderTitle(String),
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to load {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to move {from:?} onto {to:?}: {source}")]
    Replace {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
