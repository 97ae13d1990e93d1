use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The page already has a sink; the new one was dropped.
    #[error("an implementor sink has already been initialized for this page")]
    SinkAlreadyInitialized,
    /// A line of an implementors script that is not `implementors["<library>"] = [...];`
    #[error("line {line}: expected `implementors[\"<library>\"] = [...];`")]
    MalformedEntry { line: usize },
    #[error("line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
    #[error("failed to serialize implementors: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("not an implementors script path: {}", .0.display())]
    InvalidScriptPath(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
