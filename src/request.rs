use std::time::Duration;

use reqwest::Method;

/// A logical request prior to wire translation.
///
/// The variant set is closed: adding a request kind forces every
/// dispatch site to handle it at compile time.
#[derive(Clone, Debug)]
pub enum EtcdRequest {
    /// Operation against the `/v2/keys` space.
    Key(KeyRequest),
    /// Probe of the server's `/version` endpoint.
    Version(VersionRequest),
}

impl EtcdRequest {
    pub(crate) fn method(&self) -> Method {
        match self {
            Self::Key(req) => req.method.clone(),
            Self::Version(_) => Method::GET,
        }
    }

    pub(crate) fn path(&self) -> String {
        match self {
            Self::Key(req) => format!("/v2/keys/{}", req.key.trim_start_matches('/')),
            Self::Version(_) => "/version".to_owned(),
        }
    }

    pub(crate) fn params(&self) -> &[(String, String)] {
        match self {
            Self::Key(req) => &req.params,
            Self::Version(_) => &[],
        }
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        match self {
            Self::Key(req) => req.timeout,
            Self::Version(req) => req.timeout,
        }
    }
}

impl From<KeyRequest> for EtcdRequest {
    fn from(request: KeyRequest) -> Self {
        Self::Key(request)
    }
}

impl From<VersionRequest> for EtcdRequest {
    fn from(request: VersionRequest) -> Self {
        Self::Version(request)
    }
}

/// Key-space request: method, key, and an ordered parameter list.
///
/// Parameters are encoded in encounter order; callers are responsible
/// for pre-encoding values that are not URL-safe (see [`crate::wire`]).
#[derive(Clone, Debug)]
pub struct KeyRequest {
    pub(crate) method: Method,
    pub(crate) key: String,
    pub(crate) params: Vec<(String, String)>,
    pub(crate) timeout: Option<Duration>,
}

impl KeyRequest {
    fn new(method: Method, key: impl Into<String>) -> Self {
        Self {
            method,
            key: key.into(),
            params: Vec::new(),
            timeout: None,
        }
    }

    /// Reads a key.
    pub fn get(key: impl Into<String>) -> Self {
        Self::new(Method::GET, key)
    }

    /// Sets a key to a value.
    pub fn put(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Method::PUT, key).with_param("value", value)
    }

    /// Creates a directory node.
    pub fn put_dir(key: impl Into<String>) -> Self {
        Self::new(Method::PUT, key).with_param("dir", "true")
    }

    /// Appends an in-order value under a directory key.
    pub fn post(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(Method::POST, key).with_param("value", value)
    }

    /// Deletes a key.
    pub fn delete(key: impl Into<String>) -> Self {
        Self::new(Method::DELETE, key)
    }

    /// Adds a raw parameter pair. Pairs keep their encounter order.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Expires the key after `ttl` seconds.
    pub fn with_ttl(self, ttl: u64) -> Self {
        self.with_param("ttl", ttl.to_string())
    }

    /// Compare-and-swap guard on the previous value.
    pub fn with_prev_value(self, value: impl Into<String>) -> Self {
        self.with_param("prevValue", value)
    }

    /// Compare-and-swap guard on the previous modified index.
    pub fn with_prev_index(self, index: u64) -> Self {
        self.with_param("prevIndex", index.to_string())
    }

    /// Require the key to exist (or not) before applying.
    pub fn with_prev_exist(self, exists: bool) -> Self {
        self.with_param("prevExist", exists.to_string())
    }

    /// Recurse into child nodes on get/delete.
    pub fn recursive(self) -> Self {
        self.with_param("recursive", "true")
    }

    /// Sort in-order keys in the listing.
    pub fn sorted(self) -> Self {
        self.with_param("sorted", "true")
    }

    /// Long-poll for the next change of the key.
    pub fn wait(self) -> Self {
        self.with_param("wait", "true")
    }

    /// Long-poll starting from a known index.
    pub fn wait_index(self, index: u64) -> Self {
        self.with_param("wait", "true")
            .with_param("waitIndex", index.to_string())
    }

    /// Per-request timeout, overriding the client default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Version probe request.
#[derive(Clone, Copy, Debug, Default)]
pub struct VersionRequest {
    pub(crate) timeout: Option<Duration>,
}

impl VersionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-request timeout, overriding the client default.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{EtcdRequest, KeyRequest, VersionRequest};
    use reqwest::Method;

    #[test]
    fn key_path_normalizes_leading_slash() {
        let request = EtcdRequest::from(KeyRequest::get("/foo/bar"));
        assert_eq!(request.path(), "/v2/keys/foo/bar");
    }

    #[test]
    fn put_carries_value_param_first() {
        let request = KeyRequest::put("foo", "bar").with_ttl(30);
        assert_eq!(
            request.params,
            vec![
                ("value".to_owned(), "bar".to_owned()),
                ("ttl".to_owned(), "30".to_owned())
            ]
        );
        assert_eq!(request.method, Method::PUT);
    }

    #[test]
    fn wait_index_sets_both_params() {
        let request = KeyRequest::get("foo").wait_index(7);
        assert_eq!(
            request.params,
            vec![
                ("wait".to_owned(), "true".to_owned()),
                ("waitIndex".to_owned(), "7".to_owned())
            ]
        );
    }

    #[test]
    fn version_request_is_a_bare_get() {
        let request = EtcdRequest::from(VersionRequest::new().with_timeout(Duration::from_secs(1)));
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.path(), "/version");
        assert!(request.params().is_empty());
        assert_eq!(request.timeout(), Some(Duration::from_secs(1)));
    }
}
