//! Tag parsing and wire encoding.
//!
//! Users type tags as one comma-separated string. Backends disagree on how
//! they store them: some keep the raw comma string, others a JSON array.
//! Incoming notes accept either form; outgoing bodies use [`TagFormat`].

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::error::CoreError;

/// Separator used when tags are joined back into a single string.
pub const TAG_SEPARATOR: &str = ", ";

/// How tags are encoded in request bodies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagFormat {
    /// `"tags": ["work", "urgent"]`
    #[default]
    Array,
    /// `"tags": "work, urgent"`
    CommaString,
}

impl TagFormat {
    /// Encode a tag list for a request body.
    pub fn encode(self, tags: &[String]) -> serde_json::Value {
        match self {
            TagFormat::Array => serde_json::Value::from(tags.to_vec()),
            TagFormat::CommaString => serde_json::Value::from(join_tags(tags)),
        }
    }
}

impl FromStr for TagFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "array" => Ok(TagFormat::Array),
            "string" | "comma" => Ok(TagFormat::CommaString),
            other => Err(CoreError::Invalid(format!(
                "unknown tag format '{other}', expected 'array' or 'string'"
            ))),
        }
    }
}

/// Split comma-separated input into tags.
///
/// - Splits on `,`.
/// - Trims whitespace around each segment.
/// - Drops empty segments.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tags back into the form a user would type them.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(TAG_SEPARATOR)
}

/// Re-apply the parsing rules to an already split list.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Field decoder accepting an array, a comma string, or `null`.
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTags {
        List(Vec<Option<String>>),
        Joined(String),
    }

    Ok(match Option::<RawTags>::deserialize(deserializer)? {
        Some(RawTags::List(items)) => {
            normalize_tags(&items.into_iter().flatten().collect::<Vec<_>>())
        }
        Some(RawTags::Joined(s)) => parse_tags(&s),
        None => Vec::new(),
    })
}
