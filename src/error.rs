use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CompareError {
    #[error("{0} is still loading")]
    NotReady(String),

    #[error("{what} failed to load: {message}")]
    UpstreamFailed { what: String, message: String },

    #[error("index {index} is out of range for {len} groups")]
    OutOfRange { index: usize, len: usize },

    #[error("malformed value for parameter {key}: {message}")]
    MalformedPersistedState { key: String, message: String },

    #[error("failed to encode parameter {key}: {message}")]
    ParamEncode { key: String, message: String },

    #[error("missing config file kira-gc.json in current directory")]
    MissingConfig,

    #[error("failed to read config file at {0}")]
    ConfigRead(Utf8PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("failed to read input file at {0}")]
    InputRead(Utf8PathBuf),

    #[error("failed to parse {path}: {message}")]
    InputParse { path: Utf8PathBuf, message: String },

    #[error("no {0} configured")]
    MissingInput(&'static str),

    #[error("failed to parse parameter store: {0}")]
    StateParse(String),

    #[error("session service request failed: {0}")]
    Session(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
