use serde::Deserialize;

use crate::{EtcdError, Result};

/// Decoded result of a transport request, one variant per request kind.
#[derive(Clone, Debug, PartialEq)]
pub enum EtcdResponse {
    Key(KeyResponse),
    Version(String),
}

impl EtcdResponse {
    /// Unwraps the key-space variant.
    pub fn into_key_response(self) -> Result<KeyResponse> {
        match self {
            Self::Key(response) => Ok(response),
            Self::Version(_) => Err(EtcdError::Decode(
                "expected key response, got version response".to_owned(),
            )),
        }
    }

    /// Unwraps the version variant.
    pub fn into_version(self) -> Result<String> {
        match self {
            Self::Version(version) => Ok(version),
            Self::Key(_) => Err(EtcdError::Decode(
                "expected version response, got key response".to_owned(),
            )),
        }
    }
}

/// Response envelope of a key-space operation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResponse {
    /// What the server did: get, set, delete, ...
    pub action: KeyAction,
    /// Node the action applied to.
    pub node: Option<KeyNode>,
    /// Previous state of the node, for mutating actions.
    pub prev_node: Option<KeyNode>,
}

/// Action reported by the server in a key response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyAction {
    Get,
    Set,
    Create,
    Update,
    Delete,
    CompareAndSwap,
    CompareAndDelete,
    Expire,
}

/// A node in the key space. Directories carry `nodes`, leaves carry `value`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyNode {
    pub key: Option<String>,
    pub value: Option<String>,
    pub dir: bool,
    pub ttl: Option<i64>,
    pub expiration: Option<String>,
    pub modified_index: Option<u64>,
    pub created_index: Option<u64>,
    pub nodes: Vec<KeyNode>,
}

#[cfg(test)]
mod tests {
    use super::{EtcdResponse, KeyAction, KeyResponse};

    #[test]
    fn key_response_decodes_from_service_json() {
        let body = r#"{
            "action": "set",
            "node": {
                "key": "/foo",
                "value": "bar",
                "modifiedIndex": 14,
                "createdIndex": 14
            },
            "prevNode": {
                "key": "/foo",
                "value": "old",
                "modifiedIndex": 12,
                "createdIndex": 12
            }
        }"#;

        let response: KeyResponse = serde_json::from_str(body).expect("must decode");
        assert_eq!(response.action, KeyAction::Set);
        let node = response.node.expect("must carry node");
        assert_eq!(node.value.as_deref(), Some("bar"));
        assert_eq!(node.modified_index, Some(14));
        assert_eq!(
            response.prev_node.expect("must carry prevNode").value.as_deref(),
            Some("old")
        );
    }

    #[test]
    fn directory_listing_decodes_child_nodes() {
        let body = r#"{
            "action": "get",
            "node": {
                "key": "/queue",
                "dir": true,
                "nodes": [
                    { "key": "/queue/1", "value": "a", "createdIndex": 1, "modifiedIndex": 1 },
                    { "key": "/queue/2", "value": "b", "createdIndex": 2, "modifiedIndex": 2 }
                ]
            }
        }"#;

        let response: KeyResponse = serde_json::from_str(body).expect("must decode");
        let node = response.node.expect("must carry node");
        assert!(node.dir);
        assert_eq!(node.nodes.len(), 2);
        assert_eq!(node.nodes[1].value.as_deref(), Some("b"));
    }

    #[test]
    fn into_key_response_rejects_version_variant() {
        let response = EtcdResponse::Version("2.3.8".to_owned());
        assert!(response.into_key_response().is_err());
    }
}
