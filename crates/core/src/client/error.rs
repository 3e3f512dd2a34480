use std::fmt;
use std::time::Duration;

/// Everything that can end a submission before results are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Rejected before any I/O.
    Validation(String),
    /// The request could not be sent or the body could not be read.
    Transport(String),
    Timeout(Duration),
    /// Backend reachable but answered with a non-2xx status.
    Http { status: u16 },
    /// Body is not JSON of the expected shape.
    Parse(String),
}

impl AnalysisError {
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Validation(_) => "validation",
            AnalysisError::Transport(_) => "transport",
            AnalysisError::Timeout(_) => "timeout",
            AnalysisError::Http { .. } => "http",
            AnalysisError::Parse(_) => "parse",
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            AnalysisError::Timeout(timeout)
        } else {
            AnalysisError::Transport(err.to_string())
        }
    }
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::Validation(msg) => f.write_str(msg),
            AnalysisError::Transport(detail) => write!(f, "Failed to fetch ({detail})"),
            AnalysisError::Timeout(after) => {
                write!(f, "Request timed out after {}s", after.as_secs_f64())
            }
            AnalysisError::Http { status } => write!(f, "HTTP {status}"),
            AnalysisError::Parse(detail) => write!(f, "Invalid response body ({detail})"),
        }
    }
}

impl std::error::Error for AnalysisError {}
