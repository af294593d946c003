//! Translation of logical requests into wire-level HTTP requests.

use reqwest::{Method, Url};

use crate::{EtcdError, EtcdRequest, Result};

/// A fully assembled HTTP request, ready for transmission.
///
/// The `url` field keeps the assembled target verbatim — including any
/// unencoded query characters — so tests and diagnostics can inspect
/// exactly what the builder produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<Vec<u8>>,
}

/// Builds the wire request for one attempt against `endpoint`.
///
/// Pure function of its inputs. Parameter handling:
/// - no parameters: bare method + path;
/// - POST: parameters become a form-urlencoded body;
/// - any other method: parameters are joined `key=value` with `&` in
///   encounter order, with **no percent-encoding** — callers pre-encode
///   values that are not URL-safe. If the path already contains `?` the
///   assembled query string is discarded and the path used as-is.
///
/// Encoding failures surface as [`EtcdError::RequestBuild`] and are
/// terminal for the request; they never enter the connection-retry path.
pub fn build(endpoint: &Url, request: &EtcdRequest) -> Result<WireRequest> {
    let method = request.method();
    let path = request.path();
    let base = format!("{}{}", endpoint.as_str().trim_end_matches('/'), path);
    let mut headers = vec![("Connection", "keep-alive".to_owned())];

    let params = request.params();
    if params.is_empty() {
        return Ok(WireRequest {
            method,
            url: base,
            headers,
            body: None,
        });
    }

    if method == Method::POST {
        let body = serde_urlencoded::to_string(params)
            .map_err(|err| EtcdError::RequestBuild(format!("form encoding failed: {err}")))?;
        headers.push(("Content-Type", "application/x-www-form-urlencoded".to_owned()));
        return Ok(WireRequest {
            method,
            url: base,
            headers,
            body: Some(body.into_bytes()),
        });
    }

    let mut query = String::new();
    for (name, value) in params {
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(name);
        query.push('=');
        query.push_str(value);
    }

    let url = if path.contains('?') {
        base
    } else {
        format!("{base}?{query}")
    };

    Ok(WireRequest {
        method,
        url,
        headers,
        body: None,
    })
}
