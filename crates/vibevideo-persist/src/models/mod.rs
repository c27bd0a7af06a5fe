pub mod chat;
pub mod library;
pub mod user;

pub use chat::ChatDocument;
pub use library::LibraryItemDocument;
pub use user::{LoginResult, UserAccount};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a document id that may arrive as a plain string or as extended
/// JSON (`{"$oid": "..."}`).
pub fn object_id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

pub(crate) fn deserialize_object_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(object_id_string))
}
