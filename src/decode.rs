use reqwest::StatusCode;
use serde::Deserialize;

use crate::{EtcdError, EtcdRequest, EtcdResponse, KeyResponse, Result};

/// Error payload the service attaches to non-success key responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    error_code: u64,
    message: String,
    #[serde(default)]
    cause: Option<String>,
    #[serde(default)]
    index: Option<u64>,
}

/// Routes a received response into the decoder for the request's variant.
///
/// The match is exhaustive over [`EtcdRequest`]; adding a request kind
/// without a decode arm is a compile error.
pub(crate) async fn dispatch(
    request: &EtcdRequest,
    response: reqwest::Response,
) -> Result<EtcdResponse> {
    match request {
        EtcdRequest::Key(_) => {
            let status = response.status();
            let body = response.text().await.map_err(EtcdError::from_transport)?;
            decode_key_response(status, &body)
        }
        EtcdRequest::Version(_) => {
            // Delivered as-is: the version body is plain text on older
            // servers and JSON on newer ones. Decoded as UTF-8.
            let body = response.text().await.map_err(EtcdError::from_transport)?;
            Ok(EtcdResponse::Version(body))
        }
    }
}

pub(crate) fn decode_key_response(status: StatusCode, body: &str) -> Result<EtcdResponse> {
    if status.is_success() {
        return serde_json::from_str::<KeyResponse>(body)
            .map(EtcdResponse::Key)
            .map_err(|err| {
                EtcdError::Decode(format!("invalid key response JSON: {err}; body: {body}"))
            });
    }

    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(error) => Err(EtcdError::Api {
            error_code: error.error_code,
            message: error.message,
            cause: error.cause,
            index: error.index,
        }),
        Err(_) => Err(EtcdError::Http {
            status: status.as_u16(),
            body: body.to_owned(),
        }),
    }
}
