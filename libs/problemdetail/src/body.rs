//! RFC 9457 problem detail body.

use std::collections::BTreeMap;

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::uri::ProblemUri;

/// Media type for JSON problem bodies.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Keys reserved for the standard members.
pub const CORE_KEYS: [&str; 5] = ["type", "title", "status", "detail", "instance"];

/// Custom serializer for `StatusCode` to u16
#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

/// Custom deserializer for `StatusCode` from u16
fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// Problem detail body.
///
/// Serializes the standard members in the order `type`, `title`, `status`,
/// `detail`, `instance`, followed by the extensions sorted by key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemBody {
    #[serde(rename = "type")]
    pub type_uri: ProblemUri,
    pub title: String,
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    pub status: StatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub instance: ProblemUri,
    #[serde(flatten)]
    pub extensions: BTreeMap<String, Value>,
}

impl ProblemBody {
    /// Members as `(key, text)` pairs in serialization order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&str, String)> {
        let mut entries = Vec::with_capacity(4 + self.extensions.len());
        entries.push(("type", self.type_uri.to_string()));
        entries.push(("title", self.title.clone()));
        entries.push(("status", self.status.as_u16().to_string()));
        if let Some(detail) = &self.detail {
            entries.push(("detail", detail.clone()));
        }
        entries.push(("instance", self.instance.to_string()));
        for (key, value) in &self.extensions {
            entries.push((key.as_str(), value_text(value)));
        }
        entries
    }

    /// One `  key: value` line per member.
    #[must_use]
    pub fn format_lines(&self) -> String {
        self.entries()
            .iter()
            .map(|(key, value)| format!("  {key}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Text form of a member value: strings unquoted, everything else as JSON.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
