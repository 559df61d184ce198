use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum WetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("History error: {0}")]
    History(String),

    #[error("Credential error: {0}")]
    Credential(&'static str),

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Encountered HTTP error {} on {url}: {}", .status.as_u16(), one_line(.body))]
    Http {
        status: StatusCode,
        url: String,
        body: String,
    },

    #[error("Malformed API response: {0}")]
    MalformedResponse(String),

    #[error("No eligible candidate: search returned no businesses")]
    NoBusinesses,

    #[error("No eligible candidate: all {0} fetched businesses were suggested recently")]
    NoEligibleCandidate(usize),
}

/// Collapses a response body onto one line so a diagnostic never spans several.
fn one_line(body: &str) -> String {
    body.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub type Result<T> = std::result::Result<T, WetError>;
