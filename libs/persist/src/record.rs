//! The flat persisted record, one per stateful entity.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One persistence pass produces exactly one record per live entity; the
/// record is the only thing written to durable storage.
///
/// Wire shape: `[handlerTag, [contextString, payload]]`. The payload is
/// plain and printable — no live handles, no cyclic structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Resolved to a registered deserializer at restore time.
    pub handler_tag: String,

    /// Ambient context captured at serialization time.
    pub context: String,

    /// A custom serializer's structured value, or the ordered save-list
    /// values as a JSON array.
    pub payload: Value,
}

impl Record {
    /// Creates a record.
    pub fn new(handler_tag: impl Into<String>, context: impl Into<String>, payload: Value) -> Self {
        Self {
            handler_tag: handler_tag.into(),
            context: context.into(),
            payload,
        }
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        (&self.handler_tag, (&self.context, &self.payload)).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let (handler_tag, (context, payload)) =
            <(String, (String, Value))>::deserialize(deserializer)?;
        Ok(Self {
            handler_tag,
            context,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let record = Record::new("text", "/home/user", json!([true]));
        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(encoded, json!(["text", ["/home/user", [true]]]));
    }

    #[test]
    fn test_roundtrip() {
        let record = Record::new("term", "/tmp", json!({"cols": 80, "rows": 24}));
        let encoded = serde_json::to_string(&record).unwrap();
        let decoded: Record = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, record);
    }
}
