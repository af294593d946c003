/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum EtcdError {
    /// Connection could not be established (refused, DNS, TLS handshake).
    #[error("connection error: {0}")]
    Connect(reqwest::Error),
    /// The request or its response did not complete within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(reqwest::Error),
    /// Channel-level error after the connection was established.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The wire request could not be built from the logical request.
    ///
    /// Terminal for the request — never routed through the retry path.
    #[error("failed to build request: {0}")]
    RequestBuild(String),
    /// Non-success HTTP status whose body was not a recognizable error payload.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Structured error returned by the etcd API.
    #[error("etcd error {error_code}: {message}")]
    Api {
        /// Service error code, e.g. 100 for "Key not found".
        error_code: u64,
        /// Error message text from the service.
        message: String,
        /// Offending key or input, when reported.
        cause: Option<String>,
        /// Cluster index at the time of the error.
        index: Option<u64>,
    },
    /// Response decoding or protocol-shape validation error.
    #[error("decode error: {0}")]
    Decode(String),
    /// Invalid client configuration (empty endpoint list, malformed endpoint, bad TLS material).
    #[error("invalid configuration: {0}")]
    Config(String),
    /// The client was closed while the request was pending.
    #[error("client closed")]
    Closed,
}

impl EtcdError {
    /// True for connection-establishment failures.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connect(_))
    }

    /// True for timeout failures.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Default retryability classification, used by the shipped retry policies.
    ///
    /// Connection and timeout failures are retryable, as are 5xx statuses.
    /// Everything else is left to custom policies.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connect(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Errors the transport never hands to a retry policy: the request
    /// cannot be rebuilt or the client is gone.
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(self, Self::RequestBuild(_) | Self::Config(_) | Self::Closed)
    }

    /// HTTP status code, when the failure carries one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Classifies a `reqwest` failure into the transport taxonomy.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else if err.is_connect() {
            Self::Connect(err)
        } else {
            Self::Transport(err)
        }
    }
}
