//! Value types produced by INFO expansion.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One comma-separated sub-item of an INFO value segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoItem {
    /// A plain string (anything not shaped like `key:value`).
    Bare(String),
    /// A `key:value` sub-item, emitted as a single-key object.
    Pair(String, String),
}

/// An expanded INFO value: one entry per `|` segment, each holding one
/// entry per `,` sub-item.
pub type InfoValue = Vec<Vec<InfoItem>>;

impl InfoItem {
    /// Classify a raw sub-item token.
    ///
    /// A token with exactly one `:` becomes a [`InfoItem::Pair`]; anything
    /// else is kept whole as [`InfoItem::Bare`].
    pub fn from_token(token: &str) -> Self {
        match token.split_once(':') {
            Some((key, value)) if !value.contains(':') => {
                InfoItem::Pair(key.to_string(), value.to_string())
            }
            _ => InfoItem::Bare(token.to_string()),
        }
    }

    /// Returns the bare string, if this is not a pair.
    pub fn as_bare(&self) -> Option<&str> {
        match self {
            InfoItem::Bare(s) => Some(s),
            InfoItem::Pair(..) => None,
        }
    }
}

impl Serialize for InfoItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InfoItem::Bare(s) => serializer.serialize_str(s),
            InfoItem::Pair(key, value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(key, value)?;
                map.end()
            }
        }
    }
}

impl fmt::Display for InfoItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfoItem::Bare(s) => write!(f, "{}", s),
            InfoItem::Pair(key, value) => write!(f, "{}:{}", key, value),
        }
    }
}

impl From<&str> for InfoItem {
    fn from(s: &str) -> Self {
        InfoItem::from_token(s)
    }
}
