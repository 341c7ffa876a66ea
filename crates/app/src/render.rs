//! Projection of a computed view into something a user can look at.
//!
//! [`ViewFrame`] is the renderer-independent description of the screen:
//! one [`NoteCard`] per visible note, each listing the actions it offers.
//! Renderers depend on nothing else.

use std::fmt::Write as _;

use notely_core::{EmptyState, Note, NoteId, Timestamp, View, ViewParams};

/// Title shown for notes that have none.
pub const UNTITLED: &str = "Untitled";

/// Shown when a note has no creation timestamp.
const UNKNOWN_DATE: &str = "today";

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// Per-card actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Edit,
    Delete,
    ToggleImportant,
    Restore,
    DeletePermanently,
}

impl CardAction {
    pub fn label(self) -> &'static str {
        match self {
            CardAction::Edit => "Edit",
            CardAction::Delete => "Delete",
            CardAction::ToggleImportant => "Toggle important",
            CardAction::Restore => "Restore",
            CardAction::DeletePermanently => "Delete permanently",
        }
    }

    fn css_class(self) -> &'static str {
        match self {
            CardAction::Edit => "btn-edit",
            CardAction::Delete => "btn-delete",
            CardAction::ToggleImportant => "btn-important",
            CardAction::Restore => "btn-restore",
            CardAction::DeletePermanently => "btn-purge",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NoteCard {
    pub id: NoteId,
    /// Display title, never empty.
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub important: bool,
    pub deleted: bool,
    /// Creation date as `dd.mm.yyyy`.
    pub created: String,
    pub actions: Vec<CardAction>,
}

impl NoteCard {
    pub fn from_note(note: &Note) -> Self {
        let title = if note.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            note.title.clone()
        };
        let actions = if note.deleted {
            vec![CardAction::Restore, CardAction::DeletePermanently]
        } else {
            vec![
                CardAction::Edit,
                CardAction::Delete,
                CardAction::ToggleImportant,
            ]
        };
        Self {
            id: note.id.clone(),
            title,
            content: note.content.clone(),
            tags: note.tags.clone(),
            important: note.important,
            deleted: note.deleted,
            created: note
                .created_at
                .map(format_date)
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            actions,
        }
    }
}

/// Everything a renderer draws.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewFrame {
    pub cards: Vec<NoteCard>,
    pub empty: Option<EmptyState>,
    pub params: ViewParams,
    pub live_count: usize,
    pub trashed_count: usize,
}

impl ViewFrame {
    pub fn from_view(view: &View) -> Self {
        Self {
            cards: view.notes.iter().map(NoteCard::from_note).collect(),
            empty: view.empty,
            params: view.params.clone(),
            live_count: view.live_count,
            trashed_count: view.trashed_count,
        }
    }
}

/// Something that can draw a [`ViewFrame`].
pub trait Renderer {
    fn render(&mut self, frame: &ViewFrame);
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

/// Renders the note list as HTML, keeping the last output.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    output: String,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

impl Renderer for HtmlRenderer {
    fn render(&mut self, frame: &ViewFrame) {
        self.output = render_html(frame);
    }
}

pub fn render_html(frame: &ViewFrame) -> String {
    let mut html = String::new();

    if let Some(empty) = frame.empty {
        let _ = write!(
            html,
            r#"<div class="empty-state"><p>{}</p></div>"#,
            escape_html(empty.message())
        );
        return html;
    }

    for card in &frame.cards {
        let mut classes = String::from("note");
        if card.important {
            classes.push_str(" important");
        }
        if card.deleted {
            classes.push_str(" deleted");
        }

        let _ = write!(
            html,
            r#"<div class="{classes}" data-id="{}">"#,
            escape_html(card.id.as_str())
        );
        let _ = write!(
            html,
            r#"<div class="note-header"><h3>{}</h3><div class="note-actions">"#,
            escape_html(&card.title)
        );
        for action in &card.actions {
            let active = if *action == CardAction::ToggleImportant && card.important {
                " active"
            } else {
                ""
            };
            let _ = write!(
                html,
                r#"<button class="{}{active}" title="{}"></button>"#,
                action.css_class(),
                action.label()
            );
        }
        html.push_str("</div></div>");

        let _ = write!(
            html,
            r#"<div class="note-content"><p>{}</p></div>"#,
            escape_html(&card.content).replace('\n', "<br>")
        );

        if !card.tags.is_empty() {
            html.push_str(r#"<div class="note-tags">"#);
            for tag in &card.tags {
                let _ = write!(html, r#"<span class="tag">{}</span>"#, escape_html(tag));
            }
            html.push_str("</div>");
        }

        let _ = write!(
            html,
            r#"<div class="note-footer"><small>Created: {}</small>"#,
            card.created
        );
        if card.important {
            html.push_str(r#"<span class="important-badge">★ Important</span>"#);
        }
        html.push_str("</div></div>");
    }
    html
}

// ---------------------------------------------------------------------------
// Plain text
// ---------------------------------------------------------------------------

/// Renders the note list for a terminal, keeping the last output.
#[derive(Debug, Default)]
pub struct TextRenderer {
    output: String,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.output
    }
}

impl Renderer for TextRenderer {
    fn render(&mut self, frame: &ViewFrame) {
        self.output = render_text(frame);
    }
}

pub fn render_text(frame: &ViewFrame) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {} notes, {} in trash",
        frame.params.filter, frame.live_count, frame.trashed_count
    );

    if let Some(empty) = frame.empty {
        let _ = writeln!(out, "{}", empty.message());
        return out;
    }

    for card in &frame.cards {
        let star = if card.important { "★" } else { " " };
        let _ = writeln!(out, "{star} #{} {}  ({})", card.id, card.title, card.created);
        for line in card.content.lines() {
            let _ = writeln!(out, "    {line}");
        }
        if !card.tags.is_empty() {
            let _ = writeln!(out, "    tags: {}", card.tags.join(", "));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// `dd.mm.yyyy`.
pub fn format_date(ts: Timestamp) -> String {
    ts.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notely_core::{ViewFilter, ViewParams};

    fn note(json: &str) -> Note {
        serde_json::from_str(json).unwrap()
    }

    fn frame_of(notes: &[Note], params: &ViewParams) -> ViewFrame {
        ViewFrame::from_view(&View::build(notes, params))
    }

    // -- cards --

    #[test]
    fn card_actions_depend_on_trash_state() {
        let live = NoteCard::from_note(&note(r#"{"id": 1, "title": "a"}"#));
        let trashed = NoteCard::from_note(&note(r#"{"id": 2, "title": "b", "deleted": true}"#));

        assert_eq!(
            live.actions,
            vec![CardAction::Edit, CardAction::Delete, CardAction::ToggleImportant]
        );
        assert_eq!(
            trashed.actions,
            vec![CardAction::Restore, CardAction::DeletePermanently]
        );
    }

    #[test]
    fn card_uses_placeholder_title_and_formats_date() {
        let card = NoteCard::from_note(&note(
            r#"{"id": 1, "title": "", "created_at": "2024-03-05T10:00:00Z"}"#,
        ));
        assert_eq!(card.title, UNTITLED);
        assert_eq!(card.created, "05.03.2024");

        let undated = NoteCard::from_note(&note(r#"{"id": 1, "title": "x"}"#));
        assert_eq!(undated.created, "today");
    }

    // -- html --

    #[test]
    fn html_escapes_and_breaks_lines() {
        let notes = vec![note(
            r#"{"id": 1, "title": "<b>hi</b>", "content": "a & b\nc", "tags": ["x\"y"], "important": true}"#,
        )];
        let html = render_html(&frame_of(&notes, &ViewParams::default()));

        assert!(html.contains(r#"<div class="note important" data-id="1">"#));
        assert!(html.contains("<h3>&lt;b&gt;hi&lt;/b&gt;</h3>"));
        assert!(html.contains("<p>a &amp; b<br>c</p>"));
        assert!(html.contains(r#"<span class="tag">x&quot;y</span>"#));
        assert!(html.contains(r#"class="btn-important active""#));
        assert!(html.contains("★ Important"));
    }

    #[test]
    fn html_empty_state() {
        let params = ViewParams {
            filter: ViewFilter::Deleted,
            ..ViewParams::default()
        };
        let mut renderer = HtmlRenderer::new();
        renderer.render(&frame_of(&[], &params));
        assert_eq!(
            renderer.output(),
            r#"<div class="empty-state"><p>Trash is empty.</p></div>"#
        );
    }

    // -- text --

    #[test]
    fn text_lists_cards_with_counts() {
        let notes = vec![
            note(r#"{"id": 1, "title": "a", "content": "one\ntwo", "tags": "t1, t2"}"#),
            note(r#"{"id": 2, "title": "b", "deleted": true}"#),
        ];
        let mut renderer = TextRenderer::new();
        renderer.render(&frame_of(&notes, &ViewParams::default()));
        let out = renderer.output();

        assert!(out.starts_with("[all] 1 notes, 1 in trash\n"));
        assert!(out.contains("#1 a"));
        assert!(out.contains("    two\n"));
        assert!(out.contains("    tags: t1, t2\n"));
        assert!(!out.contains("#2"));
    }

    #[test]
    fn escape_html_covers_quotes() {
        assert_eq!(escape_html(r#"<a href="x">'"#), "&lt;a href=&quot;x&quot;&gt;&#39;");
    }
}
