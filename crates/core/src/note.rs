//! The note entity and the payloads used to create and change it.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::tags::{self, join_tags, normalize_tags, parse_tags, TagFormat};
use crate::types::{
    deserialize_lenient_bool, deserialize_lenient_timestamp, deserialize_nullable_string, NoteId,
    Timestamp,
};

// ---------------------------------------------------------------------------
// Note
// ---------------------------------------------------------------------------

/// A note as returned by the backend.
///
/// Decoding is tolerant of the shapes different backends produce: missing
/// flags default to `false`, tags may be an array or a comma string, and
/// unparseable timestamps are treated as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub content: String,
    #[serde(default, deserialize_with = "tags::deserialize")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub important: bool,
    #[serde(default, deserialize_with = "deserialize_lenient_bool")]
    pub deleted: bool,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<Timestamp>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<Timestamp>,
}

impl Note {
    /// Timestamp used for recency ordering: `updated_at`, else `created_at`.
    pub fn last_modified(&self) -> Option<Timestamp> {
        self.updated_at.or(self.created_at)
    }

    /// Tags joined the way they are typed into the form.
    pub fn tags_joined(&self) -> String {
        join_tags(&self.tags)
    }
}

// ---------------------------------------------------------------------------
// NoteDraft
// ---------------------------------------------------------------------------

/// Validated payload for creating a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NoteDraft {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "content is required"))]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub important: bool,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            important: false,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_important(mut self, important: bool) -> Self {
        self.important = important;
        self
    }

    /// Trim text fields and normalize tags, then validate.
    ///
    /// Title and content must be non-empty after trimming.
    pub fn validated(self) -> Result<Self, CoreError> {
        let draft = Self {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            tags: normalize_tags(&self.tags),
            important: self.important,
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Request body for `POST /notes`.
    pub fn to_wire(&self, format: TagFormat) -> serde_json::Value {
        serde_json::json!({
            "title": self.title,
            "content": self.content,
            "tags": format.encode(&self.tags),
            "important": self.important,
        })
    }
}

impl From<&Note> for NoteDraft {
    fn from(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags.clone(),
            important: note.important,
        }
    }
}

// ---------------------------------------------------------------------------
// NotePatch
// ---------------------------------------------------------------------------

/// Full or partial update. `None` fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NotePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub important: Option<bool>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.tags.is_none()
            && self.important.is_none()
    }

    /// Trim present text fields; a present title or content must not be blank.
    pub fn validated(self) -> Result<Self, CoreError> {
        let title = self.title.map(|t| t.trim().to_string());
        let content = self.content.map(|c| c.trim().to_string());

        if title.as_deref().is_some_and(str::is_empty) {
            return Err(CoreError::Validation("title is required".to_string()));
        }
        if content.as_deref().is_some_and(str::is_empty) {
            return Err(CoreError::Validation("content is required".to_string()));
        }

        Ok(Self {
            title,
            content,
            tags: self.tags.map(|t| normalize_tags(&t)),
            important: self.important,
        })
    }

    /// Request body for `PUT /notes/{id}`.
    pub fn to_wire(&self, format: TagFormat) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        if let Some(ref title) = self.title {
            body.insert("title".into(), title.clone().into());
        }
        if let Some(ref content) = self.content {
            body.insert("content".into(), content.clone().into());
        }
        if let Some(ref tags) = self.tags {
            body.insert("tags".into(), format.encode(tags));
        }
        if let Some(important) = self.important {
            body.insert("important".into(), important.into());
        }
        serde_json::Value::Object(body)
    }
}

impl From<NoteDraft> for NotePatch {
    fn from(draft: NoteDraft) -> Self {
        Self {
            title: Some(draft.title),
            content: Some(draft.content),
            tags: Some(draft.tags),
            important: Some(draft.important),
        }
    }
}

// ---------------------------------------------------------------------------
// NoteForm
// ---------------------------------------------------------------------------

/// Raw editor input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteForm {
    pub title: String,
    pub content: String,
    /// Comma-separated tags.
    pub tags: String,
    pub important: bool,
}

impl NoteForm {
    /// Pre-fill the form from an existing note.
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            tags: note.tags_joined(),
            important: note.important,
        }
    }

    /// Turn the form into a validated draft.
    pub fn to_draft(&self) -> Result<NoteDraft, CoreError> {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            tags: parse_tags(&self.tags),
            important: self.important,
        }
        .validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_json() -> &'static str {
        r#"{
            "id": 12,
            "title": "Groceries",
            "content": "milk\neggs",
            "tags": "home, errands",
            "important": 1,
            "created_at": "2024-05-01 09:30:00",
            "updated_at": null
        }"#
    }

    // -- Note decoding -------------------------------------------------------

    #[test]
    fn decodes_loose_backend_shape() {
        let note: Note = serde_json::from_str(note_json()).unwrap();
        assert_eq!(note.id.as_str(), "12");
        assert_eq!(note.tags, vec!["home", "errands"]);
        assert!(note.important);
        assert!(!note.deleted);
        assert!(note.created_at.is_some());
        assert!(note.updated_at.is_none());
        assert_eq!(note.last_modified(), note.created_at);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let note: Note = serde_json::from_str(r#"{"id": "a1", "title": null}"#).unwrap();
        assert_eq!(note.title, "");
        assert!(note.tags.is_empty());
        assert!(!note.important);
        assert!(note.last_modified().is_none());
    }

    #[test]
    fn note_without_id_is_rejected() {
        assert!(serde_json::from_str::<Note>(r#"{"title": "x"}"#).is_err());
    }

    // -- NoteDraft -----------------------------------------------------------

    #[test]
    fn draft_trims_and_validates() {
        let draft = NoteDraft::new("  Title ", " body ")
            .with_tags([" a ", ""])
            .validated()
            .unwrap();
        assert_eq!(draft.title, "Title");
        assert_eq!(draft.content, "body");
        assert_eq!(draft.tags, vec!["a"]);
    }

    #[test]
    fn blank_title_rejected() {
        let err = NoteDraft::new("   ", "x").validated().unwrap_err();
        assert!(err.to_string().contains("title is required"));
    }

    #[test]
    fn blank_content_rejected() {
        let err = NoteDraft::new("t", "").validated().unwrap_err();
        assert!(err.to_string().contains("content is required"));
    }

    #[test]
    fn draft_wire_uses_tag_format() {
        let draft = NoteDraft::new("t", "c").with_tags(["a", "b"]);
        assert_eq!(draft.to_wire(TagFormat::CommaString)["tags"], "a, b");
        assert_eq!(draft.to_wire(TagFormat::Array)["tags"], serde_json::json!(["a", "b"]));
    }

    // -- NotePatch -----------------------------------------------------------

    #[test]
    fn patch_omits_absent_fields() {
        let patch = NotePatch {
            important: Some(true),
            ..Default::default()
        };
        assert_eq!(
            patch.to_wire(TagFormat::Array),
            serde_json::json!({"important": true})
        );
        assert!(!patch.is_empty());
        assert!(NotePatch::default().is_empty());
    }

    #[test]
    fn patch_rejects_blank_present_title() {
        let patch = NotePatch {
            title: Some("  ".into()),
            ..Default::default()
        };
        assert!(patch.validated().is_err());
    }

    // -- NoteForm ------------------------------------------------------------

    #[test]
    fn form_roundtrips_through_note() {
        let note: Note = serde_json::from_str(note_json()).unwrap();
        let form = NoteForm::from_note(&note);
        assert_eq!(form.tags, "home, errands");

        let draft = form.to_draft().unwrap();
        assert_eq!(draft.tags, note.tags);
        assert_eq!(draft.content, "milk\neggs");
    }

    #[test]
    fn empty_form_fails_locally() {
        let form = NoteForm {
            title: String::new(),
            content: "x".into(),
            ..Default::default()
        };
        assert!(matches!(form.to_draft(), Err(CoreError::Validation(_))));
    }
}
