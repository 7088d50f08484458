//! Message types published to the broker.
//!
//! Every accepted webhook becomes one [`Envelope`], which downstream
//! consumers dispatch on `_type`/`_method`.

use serde::{Deserialize, Serialize};

/// Topic exchange declared before every publish.
pub const EXCHANGE: &str = "logs";

/// Domain tag carried in `_type`.
pub const ENVELOPE_TYPE: &str = "hosting";

/// Operation tag carried in `_method`.
pub const ENVELOPE_METHOD: &str = "webhooks_handle";

/// Content type set on published messages.
pub const MESSAGE_CONTENT_TYPE: &str = "application/json";

/// Canonical message published for each accepted webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Constant domain tag
    #[serde(rename = "_type")]
    pub kind: String,
    /// Constant operation tag
    #[serde(rename = "_method")]
    pub method: String,
    /// Path suffix after `/deploy/`
    pub hash: String,
    /// Normalized request body
    pub payload: String,
}

impl Envelope {
    /// Create a `hosting`/`webhooks_handle` envelope.
    pub fn new(hash: String, payload: String) -> Self {
        Self {
            kind: ENVELOPE_TYPE.to_string(),
            method: ENVELOPE_METHOD.to_string(),
            hash,
            payload,
        }
    }

    /// Serialize to the JSON bytes that go on the wire.
    pub fn to_json_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
