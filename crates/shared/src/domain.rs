use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Server-assigned character identifier.
///
/// The client never interprets it: any JSON number or string is accepted and
/// sent back exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacterId {
    Number(Number),
    Text(String),
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for CharacterId {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for CharacterId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CharacterId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
