/// Errors talking to the analysis API.
///
/// The analyzer logs and absorbs these; they surface only from the
/// constructor and from `MenuAnalyzer::fetch_*` helpers.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response had {got} analyses for {expected} items")]
    Misaligned { expected: usize, got: usize },
}

pub type ClientResult<T> = Result<T, ClientError>;
