use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    decode,
    wire::{self, WireRequest},
    ClientOptions, ConnectionState, EtcdError, EtcdRequest, EtcdResponse, KeyRequest, KeyResponse,
    ResponseFuture, Result, RetryPolicy, RetryWithBackoff, TlsOptions, VersionRequest,
};

/// HTTP transport client for an etcd v2 cluster.
///
/// Owns an ordered, immutable endpoint set and fails over between
/// endpoints on connection errors, remembering the last endpoint that
/// worked so the next request starts there. Cloning is cheap; clones
/// share the endpoint set, the last-working hint, and the shutdown
/// signal.
#[derive(Clone)]
pub struct EtcdClient {
    http: reqwest::Client,
    endpoints: Arc<[Url]>,
    options: ClientOptions,
    retry: Arc<dyn RetryPolicy>,
    last_working: Arc<AtomicUsize>,
    shutdown: Arc<watch::Sender<bool>>,
}

impl fmt::Debug for EtcdClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EtcdClient")
            .field("endpoints", &self.endpoints)
            .field("options", &self.options)
            .field("last_working", &self.last_working.load(Ordering::Relaxed))
            .finish()
    }
}

impl EtcdClient {
    /// Creates a client for one or more endpoint URIs.
    ///
    /// Fails synchronously when the list is empty or an endpoint is not
    /// a valid http/https URI.
    pub fn new<I, S>(endpoints: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::configured(endpoints, None, ClientOptions::default())
    }

    /// Creates a client that presents and trusts the given TLS material.
    pub fn with_tls<I, S>(endpoints: I, tls: TlsOptions) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::configured(endpoints, Some(tls), ClientOptions::default())
    }

    /// Full constructor: endpoints, optional TLS material, and options.
    pub fn configured<I, S>(
        endpoints: I,
        tls: Option<TlsOptions>,
        options: ClientOptions,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let endpoints = parse_endpoints(endpoints)?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .tcp_nodelay(options.tcp_nodelay);

        if let Some(tls) = tls {
            if let Some(pem) = tls.root_certificate_pem {
                let certificate = reqwest::Certificate::from_pem(&pem)
                    .map_err(|err| EtcdError::Config(format!("invalid root certificate: {err}")))?;
                builder = builder.add_root_certificate(certificate);
            }
            if let Some(pem) = tls.client_identity_pem {
                let identity = reqwest::Identity::from_pem(&pem)
                    .map_err(|err| EtcdError::Config(format!("invalid client identity: {err}")))?;
                builder = builder.identity(identity);
            }
            if tls.danger_accept_invalid_certs {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let http = builder
            .build()
            .map_err(|err| EtcdError::Config(format!("failed to build http client: {err}")))?;
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            http,
            endpoints: endpoints.into(),
            options,
            retry: Arc::new(RetryWithBackoff::default()),
            last_working: Arc::new(AtomicUsize::new(0)),
            shutdown: Arc::new(shutdown),
        })
    }

    /// Replaces the retry policy consulted on failed attempts.
    pub fn with_retry_policy(mut self, policy: impl RetryPolicy) -> Self {
        self.retry = Arc::new(policy);
        self
    }

    /// Sends a logical request and returns its response future.
    ///
    /// Never blocks: the connect/retry sequence runs on a spawned task,
    /// and the returned future resolves exactly once with the outcome.
    /// Must be called within a tokio runtime.
    pub fn send(&self, request: impl Into<EtcdRequest>) -> ResponseFuture {
        let request = request.into();
        let (future, completion) = ResponseFuture::channel();

        if *self.shutdown.borrow() {
            completion.complete(Err(EtcdError::Closed));
            return future;
        }

        let client = self.clone();
        tokio::spawn(async move {
            let outcome = client.drive(request).await;
            completion.complete(outcome);
        });
        future
    }

    /// Reads a key.
    pub async fn get(&self, key: &str) -> Result<KeyResponse> {
        self.send(KeyRequest::get(key)).await?.into_key_response()
    }

    /// Sets a key to a value.
    pub async fn put(&self, key: &str, value: &str) -> Result<KeyResponse> {
        self.send(KeyRequest::put(key, value))
            .await?
            .into_key_response()
    }

    /// Deletes a key.
    pub async fn delete(&self, key: &str) -> Result<KeyResponse> {
        self.send(KeyRequest::delete(key))
            .await?
            .into_key_response()
    }

    /// Appends an in-order value under a directory key.
    pub async fn create_in_order(&self, key: &str, value: &str) -> Result<KeyResponse> {
        self.send(KeyRequest::post(key, value))
            .await?
            .into_key_response()
    }

    /// Fetches the server's version string.
    pub async fn version(&self) -> Result<String> {
        self.send(VersionRequest::new()).await?.into_version()
    }

    /// Index of the endpoint that most recently accepted a connection.
    ///
    /// Advisory: concurrent requests race on it harmlessly, and it only
    /// seeds where the *next* request starts.
    pub fn last_working_endpoint(&self) -> usize {
        self.last_working.load(Ordering::Relaxed)
    }

    /// The endpoint set, in construction order.
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    /// Shuts the transport down. Idempotent.
    ///
    /// In-flight requests fail with [`EtcdError::Closed`] at their next
    /// attempt boundary; later `send` calls resolve with the same error
    /// immediately.
    pub fn close(&self) {
        self.shutdown.send_replace(true);
    }

    /// Runs one logical request's attempt sequence to a terminal outcome.
    ///
    /// Attempts are strictly sequential: a new attempt starts only after
    /// the previous one failed and the retry policy accepted the failure.
    async fn drive(&self, request: EtcdRequest) -> Result<EtcdResponse> {
        let mut state = ConnectionState::new(self.last_working.load(Ordering::Relaxed));
        let mut shutdown = self.shutdown.subscribe();

        loop {
            let attempt = tokio::select! {
                outcome = self.attempt(&request, &state) => outcome,
                _ = shutdown.wait_for(|closed| *closed) => return Err(EtcdError::Closed),
            };

            let error = match attempt {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if error.is_terminal() || !self.retry.should_retry(&state, &error) {
                if state.retry_count() > 0 {
                    warn!(retries = state.retry_count(), error = %error, "request failed after retries");
                }
                return Err(error);
            }

            let delay = self.retry.next_delay(&state);
            debug!(
                endpoint = state.endpoint_index(),
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "retrying after failure"
            );
            state.advance(self.endpoints.len());

            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.wait_for(|closed| *closed) => return Err(EtcdError::Closed),
            }
        }
    }

    /// One build-connect-send-dispatch attempt against the state's endpoint.
    async fn attempt(&self, request: &EtcdRequest, state: &ConnectionState) -> Result<EtcdResponse> {
        let endpoint = &self.endpoints[state.endpoint_index()];
        let wire = wire::build(endpoint, request)?;
        let response = self.transmit(wire, request.timeout()).await?;

        // A received response proves the connection worked; the next
        // request starts at this endpoint.
        self.last_working
            .store(state.endpoint_index(), Ordering::Relaxed);
        info!(endpoint = %endpoint, "connected");

        decode::dispatch(request, response).await
    }

    async fn transmit(
        &self,
        wire: WireRequest,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response> {
        let url = Url::parse(&wire.url)
            .map_err(|err| EtcdError::RequestBuild(format!("invalid url '{}': {err}", wire.url)))?;

        let mut builder = self.http.request(wire.method, url);
        for (name, value) in &wire.headers {
            builder = builder.header(*name, value);
        }
        if let Some(body) = wire.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = timeout.or(self.options.request_timeout) {
            builder = builder.timeout(timeout);
        }

        builder.send().await.map_err(EtcdError::from_transport)
    }
}

fn parse_endpoints<I, S>(endpoints: I) -> Result<Vec<Url>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = Vec::new();
    for endpoint in endpoints {
        let raw = endpoint.as_ref();
        let url = Url::parse(raw)
            .map_err(|err| EtcdError::Config(format!("invalid endpoint '{raw}': {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(EtcdError::Config(format!(
                "endpoint '{raw}' must use http or https"
            )));
        }
        if url.host_str().is_none() {
            return Err(EtcdError::Config(format!("endpoint '{raw}' has no host")));
        }
        parsed.push(url);
    }

    if parsed.is_empty() {
        return Err(EtcdError::Config("endpoint list is empty".to_owned()));
    }
    Ok(parsed)
}
