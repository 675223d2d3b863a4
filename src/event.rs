//! Inbound frame decoding
//!
//! Turns one raw text frame into an [`Event`]: a flat mapping of string
//! fields with an `event` discriminator. Decoding never fails upward — a
//! malformed frame is logged and yields whatever partial (possibly empty)
//! mapping could be extracted, which the dispatcher then routes to its
//! unrecognized-event fallback. Downstream logic depends on always receiving
//! a dispatchable Event, so malformed frames must not be dropped here.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

/// One decoded command event.
///
/// Well-formed frames carry an `event` key naming the variant plus
/// variant-specific fields (`url`, `audio`, `url_raw`). The wire may carry
/// additional fields (`caption`, `duration`) that this client ignores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Event {
    fields: HashMap<String, String>,
}

impl Event {
    /// The `event` discriminator, if present.
    pub fn kind(&self) -> Option<&str> {
        self.get("event")
    }

    /// Look up a field value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Whether the frame decoded to nothing at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<HashMap<String, String>> for Event {
    fn from(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }
}

/// Decode one frame payload into an [`Event`].
///
/// The wire contract is a flat JSON object whose values are all strings.
/// Non-object payloads and unparseable frames decode to an empty Event;
/// non-string values inside an otherwise valid object are skipped. Both
/// cases are logged, never raised.
pub fn decode_frame(payload: &str) -> Event {
    let value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse frame as JSON: {}", e);
            return Event::default();
        }
    };

    let object = match value {
        Value::Object(map) => map,
        other => {
            warn!("Frame is not a JSON object: {}", other);
            return Event::default();
        }
    };

    let mut fields = HashMap::with_capacity(object.len());
    for (key, value) in object {
        match value {
            Value::String(s) => {
                fields.insert(key, s);
            }
            other => {
                warn!("Skipping non-string value for field '{}': {}", key, other);
            }
        }
    }

    Event { fields }
}
