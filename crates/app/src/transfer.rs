//! Export and import documents.
//!
//! An export is `{"exported_at", "count", "data": [Note]}`. Import accepts
//! that document, a bare array, or an object holding the notes under
//! `data` or `notes`. Items are checked one by one; a bad item is reported
//! by its position and never sent.

use chrono::Utc;
use notely_client::{ImportRejection, ImportResult};
use notely_core::tags::{normalize_tags, parse_tags};
use notely_core::{CoreError, Note, NoteDraft, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub exported_at: Timestamp,
    pub count: usize,
    pub data: Vec<Note>,
}

impl ExportDocument {
    pub fn new(notes: Vec<Note>) -> Self {
        Self {
            exported_at: Utc::now(),
            count: notes.len(),
            data: notes,
        }
    }

    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| AppError::Import(e.to_string()))
    }
}

/// An import document split into sendable drafts and local rejections.
#[derive(Debug, Default)]
pub struct ImportPlan {
    pub drafts: Vec<NoteDraft>,
    /// Position in the document of each entry of `drafts`.
    pub positions: Vec<usize>,
    pub rejected: Vec<ImportRejection>,
}

impl ImportPlan {
    /// Parse and validate an import document.
    pub fn from_document(text: &str) -> AppResult<Self> {
        let items = document_items(text)?;
        let mut plan = Self::default();

        for (index, item) in items.iter().enumerate() {
            match draft_from_item(item) {
                Ok(draft) => {
                    plan.drafts.push(draft);
                    plan.positions.push(index);
                }
                Err(err) => plan.rejected.push(ImportRejection {
                    index,
                    reason: err.to_string(),
                }),
            }
        }
        Ok(plan)
    }

    /// Merge the backend's answer for `drafts` with the local rejections,
    /// translating indices back to document positions.
    pub fn merge(mut self, backend: ImportResult) -> ImportResult {
        for rejection in backend.rejected {
            let index = self
                .positions
                .get(rejection.index)
                .copied()
                .unwrap_or(rejection.index);
            self.rejected.push(ImportRejection {
                index,
                reason: rejection.reason,
            });
        }
        self.rejected.sort_by_key(|r| r.index);
        ImportResult {
            created: backend.created,
            rejected: self.rejected,
        }
    }
}

fn document_items(text: &str) -> AppResult<Vec<Value>> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| AppError::Import(format!("not valid JSON: {e}")))?;

    let list = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data").or_else(|| map.remove("notes")) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(AppError::Import(
                    "expected a list of notes under 'data' or 'notes'".to_string(),
                ))
            }
        },
        _ => return Err(AppError::Import("expected a list of notes".to_string())),
    };
    Ok(list)
}

fn draft_from_item(item: &Value) -> Result<NoteDraft, CoreError> {
    let Value::Object(fields) = item else {
        return Err(CoreError::Validation("expected an object".to_string()));
    };
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let tags = match fields.get("tags") {
        Some(Value::String(joined)) => parse_tags(joined),
        Some(Value::Array(items)) => normalize_tags(
            &items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>(),
        ),
        _ => Vec::new(),
    };
    let important = fields
        .get("important")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    NoteDraft::new(text("title"), text("content"))
        .with_tags(tags)
        .with_important(important)
        .validated()
}
