use thiserror::Error;

/// Result type used by every fetch path in this crate.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Why a fetch cycle could not produce records.
///
/// All variants collapse into a single "load failed" outcome at the pipeline
/// boundary; they are kept apart so logs and tests can tell them apart.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The request never completed (DNS, connection refused, reset...)
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-2xx status
    #[error("request to {url} returned HTTP {status}")]
    Http { url: String, status: u16 },

    /// The body was not JSON, or not the JSON shape we expected
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// No response within the configured request timeout
    #[error("request to {url} timed out")]
    Timeout { url: String },
}

impl FetchError {
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn http(url: impl Into<String>, status: u16) -> Self {
        Self::Http {
            url: url.into(),
            status,
        }
    }

    pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// The URL of the request that failed.
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. }
            | Self::Http { url, .. }
            | Self::Decode { url, .. }
            | Self::Timeout { url } => url,
        }
    }

    /// HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short kind label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network",
            Self::Http { .. } => "http",
            Self::Decode { .. } => "decode",
            Self::Timeout { .. } => "timeout",
        }
    }
}
