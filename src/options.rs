use std::time::Duration;

/// Configures transport-level connection behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// TCP connect timeout per attempt.
    pub connect_timeout: Duration,
    /// Default request timeout applied when the logical request carries none.
    ///
    /// `None` leaves requests without a deadline.
    pub request_timeout: Option<Duration>,
    /// Disable Nagle's algorithm on transport sockets.
    pub tcp_nodelay: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(300),
            request_timeout: None,
            tcp_nodelay: true,
        }
    }
}

/// TLS material for https endpoints.
///
/// All fields are optional; an empty value relies on the platform trust
/// roots bundled with `rustls`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TlsOptions {
    /// Additional root certificate in PEM format.
    pub root_certificate_pem: Option<Vec<u8>>,
    /// Client identity (certificate + key) in PEM format.
    pub client_identity_pem: Option<Vec<u8>>,
    /// Skip server certificate verification. Test clusters only.
    pub danger_accept_invalid_certs: bool,
}
