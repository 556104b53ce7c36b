use thiserror::Error;

/// Failure of a single page fetch. A page either resolves into a full
/// `RepositoryGroup` or fails with one of these.
#[derive(Error, Debug)]
pub enum FetchError {
    /// GitHub answered with a non-success status. `message` is the upstream
    /// `message` field when the body had one.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("couldn't decode GitHub response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request header: {0}")]
    InvalidHeader(String),
}

impl FetchError {
    pub fn upstream(status: u16, message: Option<String>) -> Self {
        let message = match message {
            Some(message) if !message.trim().is_empty() => message,
            _ => format!("GitHub API request failed with status {status}"),
        };
        FetchError::Upstream { status, message }
    }

    /// Upstream status code, if the failure came from a GitHub response.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Upstream { status, .. } => Some(*status),
            FetchError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("couldn't read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("couldn't parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
