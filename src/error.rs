use std::path::PathBuf;

/// A judge strategy could not find or read one of its landmarks.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("landmark not found: {0}")]
    MissingLandmark(&'static str),
    #[error("unexpected structure: {0}")]
    Malformed(String),
    #[error("extractor panicked: {0}")]
    Panicked(String),
}

/// One failed synthesis attempt. Never escapes the retry loop.
#[derive(thiserror::Error, Debug)]
pub enum SynthesisError {
    #[error("transport failed: {0}")]
    Transport(String),
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response had no text payload")]
    EmptyResponse,
    #[error("test cases did not parse: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum CorpusError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}: invalid page record: {source}")]
    Line {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("unsupported corpus format: {0} (expected .jsonl, .ndjson, .sqlite or .db)")]
    UnsupportedFormat(PathBuf),
}

pub type ExtractResult<T> = std::result::Result<T, ExtractError>;
