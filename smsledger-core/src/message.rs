//! Raw inbox records as handed over by the device message store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Upper bound on how many messages one retrieval asks for.
pub const DEFAULT_MAX_COUNT: usize = 10_000;

/// A single SMS as exported by the device.
///
/// Exports are loosely typed: `date` shows up as epoch millis or as a numeric
/// string, `_id` as a number or a string. Both are normalized here so one odd
/// record never fails the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub body: String,
    /// Epoch milliseconds
    #[serde(default, deserialize_with = "de_epoch_millis")]
    pub date: Option<i64>,
    #[serde(rename = "_id", default, deserialize_with = "de_local_id")]
    pub id: Option<String>,
}

impl RawMessage {
    pub fn new(address: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            body: body.into(),
            date: None,
            id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_date(mut self, epoch_millis: i64) -> Self {
        self.date = Some(epoch_millis);
        self
    }

    /// Sender address, case-normalized for allow-list comparison.
    pub fn sender(&self) -> String {
        self.address.to_uppercase()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date.and_then(DateTime::from_timestamp_millis)
    }

    /// Local id, ignoring empty strings.
    pub fn local_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Mailbox query passed to the message source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFilter {
    #[serde(rename = "box")]
    pub mailbox: String,
    #[serde(rename = "maxCount")]
    pub max_count: usize,
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self {
            mailbox: "inbox".to_string(),
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Int(i64),
    Float(f64),
    Text(String),
    #[allow(dead_code)]
    Other(serde_json::Value),
}

fn de_epoch_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Int(v)) => Some(v),
        Some(Loose::Float(v)) if v.is_finite() => Some(v as i64),
        Some(Loose::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn de_local_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Int(v)) => Some(v.to_string()),
        Some(Loose::Float(v)) => Some(v.to_string()),
        Some(Loose::Text(s)) => Some(s),
        _ => None,
    })
}
