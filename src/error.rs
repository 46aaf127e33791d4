/// Failures while retrieving or decoding a statistics feed.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("Gave up after {attempts} attempts")]
    FetchExhausted { attempts: u32 },

    #[error("Malformed feed document: {0}")]
    Parse(String),

    #[error("Feed root is missing attribute '{0}'")]
    MissingAttribute(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook rejected payload with status {0}")]
    Rejected(reqwest::StatusCode),

    #[error("Payload not delivered after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}
