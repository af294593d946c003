//! `etcdv2-http` is the async HTTP transport for an etcd v2 cluster.
//!
//! One [`EtcdClient`] spans several candidate endpoints: each request
//! picks the endpoint that last worked, fails over round-robin on
//! connection errors under an injected [`RetryPolicy`], and resolves a
//! single-completion [`ResponseFuture`] with the outcome:
//! - [`EtcdClient::send`] — the transport operation itself
//! - [`EtcdClient::get`] / [`EtcdClient::put`] / [`EtcdClient::delete`]
//! - [`EtcdClient::version`]

mod client;
mod connection;
mod decode;
mod error;
mod future;
mod options;
mod request;
mod retry;
mod types;
pub mod wire;

pub use client::EtcdClient;
pub use connection::ConnectionState;
pub use error::EtcdError;
pub use future::ResponseFuture;
pub use options::{ClientOptions, TlsOptions};
pub use request::{EtcdRequest, KeyRequest, VersionRequest};
pub use retry::{RetryNTimes, RetryPolicy, RetryWithBackoff};
pub use types::{EtcdResponse, KeyAction, KeyNode, KeyResponse};

pub type Result<T> = std::result::Result<T, EtcdError>;
