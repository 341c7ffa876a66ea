//! Request and response shapes specific to the REST API.

use notely_core::{SortOrder, ViewFilter, ViewParams};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Maximum number of characters of a raw error body kept in messages.
const MAX_ERROR_BODY_CHARS: usize = 200;

// ---------------------------------------------------------------------------
// List query
// ---------------------------------------------------------------------------

/// Query parameters for `GET /notes`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filter: Option<ViewFilter>,
    pub search: Option<String>,
    pub sort: Option<SortOrder>,
}

impl ListQuery {
    /// No parameters: the backend returns every note, trashed ones included.
    pub fn everything() -> Self {
        Self::default()
    }

    /// Forward the active view parameters to the backend.
    pub fn from_params(params: &ViewParams) -> Self {
        Self {
            filter: Some(params.filter),
            search: params.search_term().map(str::to_string),
            sort: params.sort,
        }
    }

    pub(crate) fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(filter) = self.filter {
            pairs.push(("filter", filter.as_str().to_string()));
        }
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// Import summary
// ---------------------------------------------------------------------------

/// One item of a bulk import that was not created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRejection {
    /// Position of the item in the submitted list.
    pub index: usize,
    #[serde(alias = "error", alias = "message")]
    pub reason: String,
}

/// Outcome of `POST /notes/import`. Partial success is normal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    #[serde(default, alias = "imported")]
    pub created: usize,
    #[serde(default, alias = "errors")]
    pub rejected: Vec<ImportRejection>,
}

// ---------------------------------------------------------------------------
// Body decoding
// ---------------------------------------------------------------------------

/// Decode a JSON body that may or may not be wrapped in `{"data": ...}`.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    let payload = match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Human-readable message for a failed response.
///
/// Prefers an `error` or `message` string field from a JSON body, then the
/// raw body (truncated), then the status reason phrase.
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|key| v.get(key).and_then(|m| m.as_str()).map(str::to_string))
        });
    if let Some(message) = from_json {
        return message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use notely_core::Note;

    // -- decode_body ---------------------------------------------------------

    #[test]
    fn decodes_bare_and_wrapped_lists() {
        let bare: Vec<Note> = decode_body(br#"[{"id": 1, "title": "a"}]"#).unwrap();
        let wrapped: Vec<Note> = decode_body(br#"{"data": [{"id": 1, "title": "a"}]}"#).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn decodes_single_note_bare_or_wrapped() {
        let note: Note = decode_body(br#"{"id": "x", "title": "t", "content": "c"}"#).unwrap();
        assert_eq!(note.id.as_str(), "x");
        let note: Note = decode_body(br#"{"data": {"id": "y"}}"#).unwrap();
        assert_eq!(note.id.as_str(), "y");
    }

    #[test]
    fn malformed_body_is_decode_error() {
        assert_matches!(decode_body::<Vec<Note>>(b"<html>"), Err(ApiError::Decode(_)));
        assert_matches!(decode_body::<Vec<Note>>(br#"{"rows": []}"#), Err(ApiError::Decode(_)));
    }

    #[test]
    fn import_summary_aliases() {
        let result: ImportResult =
            decode_body(br#"{"imported": 2, "errors": [{"index": 1, "error": "bad"}]}"#).unwrap();
        assert_eq!(result.created, 2);
        assert_eq!(result.rejected[0].reason, "bad");
    }

    // -- error_message -------------------------------------------------------

    #[test]
    fn error_message_prefers_json_field() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        assert_eq!(error_message(status, r#"{"error": "title missing"}"#), "title missing");
        assert_eq!(error_message(status, r#"{"message": "nope"}"#), "nope");
    }

    #[test]
    fn error_message_falls_back_to_body_then_reason() {
        let status = reqwest::StatusCode::INTERNAL_SERVER_ERROR;
        assert_eq!(error_message(status, "  oops "), "oops");
        assert_eq!(error_message(status, ""), "Internal Server Error");
        assert_eq!(error_message(status, &"x".repeat(500)).len(), MAX_ERROR_BODY_CHARS);
    }

    // -- ListQuery -----------------------------------------------------------

    #[test]
    fn list_query_sends_only_set_fields() {
        assert!(ListQuery::everything().pairs().is_empty());

        let params = ViewParams {
            filter: ViewFilter::Important,
            search: "  ".into(),
            sort: Some(SortOrder::AlphaAsc),
        };
        assert_eq!(
            ListQuery::from_params(&params).pairs(),
            vec![("filter", "important".to_string()), ("sort", "alpha-asc".to_string())]
        );
    }
}
