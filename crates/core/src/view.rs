//! The view pipeline: filter, search and sort the cached notes into the list
//! that gets displayed.
//!
//! Everything here is pure. [`compute_view`] can be called any number of
//! times on the same inputs and returns the same output.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::note::Note;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Lifecycle/category filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFilter {
    #[default]
    All,
    Important,
    /// The trash.
    Deleted,
}

impl ViewFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewFilter::All => "all",
            ViewFilter::Important => "important",
            ViewFilter::Deleted => "deleted",
        }
    }

    /// Whether a note belongs in this filter, ignoring search.
    pub fn admits(self, note: &Note) -> bool {
        match self {
            ViewFilter::Deleted => note.deleted,
            ViewFilter::All => !note.deleted,
            ViewFilter::Important => !note.deleted && note.important,
        }
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(ViewFilter::All),
            "important" => Ok(ViewFilter::Important),
            "deleted" | "trash" => Ok(ViewFilter::Deleted),
            other => Err(CoreError::Invalid(format!(
                "unknown filter '{other}', expected all, important or deleted"
            ))),
        }
    }
}

/// Sort keys offered by the sort selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    Newest,
    Oldest,
    AlphaAsc,
    AlphaDesc,
    Important,
}

impl SortOrder {
    pub const ALL: [SortOrder; 5] = [
        SortOrder::Newest,
        SortOrder::Oldest,
        SortOrder::AlphaAsc,
        SortOrder::AlphaDesc,
        SortOrder::Important,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::AlphaAsc => "alpha-asc",
            SortOrder::AlphaDesc => "alpha-desc",
            SortOrder::Important => "important",
        }
    }

    /// Parse a selector value where the empty string means "no sort".
    pub fn parse_optional(s: &str) -> Result<Option<Self>, CoreError> {
        if s.trim().is_empty() {
            Ok(None)
        } else {
            s.parse().map(Some)
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SortOrder::ALL
            .into_iter()
            .find(|o| o.as_str() == wanted)
            .ok_or_else(|| {
                CoreError::Invalid(format!(
                    "unknown sort '{wanted}', expected one of: newest, oldest, alpha-asc, alpha-desc, important"
                ))
            })
    }
}

/// Everything the pipeline needs besides the notes themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub filter: ViewFilter,
    pub search: String,
    pub sort: Option<SortOrder>,
}

impl ViewParams {
    /// The trimmed search text, or `None` if there is nothing to search for.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Derive the visible list: category filter, then search, then stable sort.
pub fn compute_view(notes: &[Note], params: &ViewParams) -> Vec<Note> {
    let needle = params.search_term().map(str::to_lowercase);

    let mut visible: Vec<Note> = notes
        .iter()
        .filter(|n| params.filter.admits(n))
        .filter(|n| needle.as_deref().map_or(true, |q| matches_search(n, q)))
        .cloned()
        .collect();

    if let Some(order) = params.sort {
        sort_notes(&mut visible, order);
    }
    visible
}

/// Case-insensitive substring match on title, content or the joined tags.
///
/// `needle` must already be lowercased.
pub fn matches_search(note: &Note, needle: &str) -> bool {
    note.title.to_lowercase().contains(needle)
        || note.content.to_lowercase().contains(needle)
        || note.tags.join(",").to_lowercase().contains(needle)
}

/// Stable in-place sort by the given key.
pub fn sort_notes(notes: &mut [Note], order: SortOrder) {
    match order {
        // `None < Some(_)`, so missing timestamps sort as earliest.
        SortOrder::Newest => notes.sort_by(|a, b| b.last_modified().cmp(&a.last_modified())),
        SortOrder::Oldest => notes.sort_by(|a, b| a.last_modified().cmp(&b.last_modified())),
        SortOrder::AlphaAsc => notes.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortOrder::AlphaDesc => notes.sort_by(|a, b| compare_titles(&b.title, &a.title)),
        SortOrder::Important => notes.sort_by_key(|n| !n.important),
    }
}

/// Locale-style title comparison.
///
/// Primary key is the case-folded text (with `ё` folded onto `е`, which is
/// where Russian collation places it). Ties fall back to putting lowercase
/// before uppercase, then to plain code point order.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(fold(b))
        .then_with(|| case_rank(a).cmp(case_rank(b)))
        .then_with(|| a.cmp(b))
}

fn fold(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase).map(|c| match c {
        'ё' => 'е',
        other => other,
    })
}

fn case_rank(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(char::is_uppercase)
}

// ---------------------------------------------------------------------------
// Empty states
// ---------------------------------------------------------------------------

/// Why the visible list is empty. Only selects the message that is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// No live notes exist at all.
    NoNotes,
    /// Notes exist but none is marked important.
    NoImportant,
    /// The trash is empty.
    TrashEmpty,
    /// The search text matched nothing.
    NoResults,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoNotes => "No notes yet. Create the first one!",
            EmptyState::NoImportant => "No important notes.",
            EmptyState::TrashEmpty => "Trash is empty.",
            EmptyState::NoResults => "Nothing matches your search.",
        }
    }
}

/// Classify an empty result; `None` when something is visible.
pub fn classify_empty(params: &ViewParams, visible: &[Note]) -> Option<EmptyState> {
    if !visible.is_empty() {
        return None;
    }
    if params.search_term().is_some() {
        return Some(EmptyState::NoResults);
    }
    Some(match params.filter {
        ViewFilter::All => EmptyState::NoNotes,
        ViewFilter::Important => EmptyState::NoImportant,
        ViewFilter::Deleted => EmptyState::TrashEmpty,
    })
}

/// A computed view: the visible notes plus the context needed to show them.
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub notes: Vec<Note>,
    pub empty: Option<EmptyState>,
    pub params: ViewParams,
    /// Live (non-deleted) notes in the cache.
    pub live_count: usize,
    /// Trashed notes in the cache.
    pub trashed_count: usize,
}

impl View {
    pub fn build(notes: &[Note], params: &ViewParams) -> Self {
        let visible = compute_view(notes, params);
        let trashed_count = notes.iter().filter(|n| n.deleted).count();
        Self {
            empty: classify_empty(params, &visible),
            notes: visible,
            params: params.clone(),
            live_count: notes.len() - trashed_count,
            trashed_count,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_timestamp, NoteId};

    fn note(id: &str, title: &str) -> Note {
        Note {
            id: NoteId::from(id),
            title: title.to_string(),
            content: format!("{title} body"),
            tags: Vec::new(),
            important: false,
            deleted: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn important(mut n: Note) -> Note {
        n.important = true;
        n
    }

    fn deleted(mut n: Note) -> Note {
        n.deleted = true;
        n
    }

    fn created(mut n: Note, ts: &str) -> Note {
        n.created_at = parse_timestamp(ts);
        n
    }

    fn ids(notes: &[Note]) -> Vec<&str> {
        notes.iter().map(|n| n.id.as_str()).collect()
    }

    fn params(filter: ViewFilter, search: &str, sort: Option<SortOrder>) -> ViewParams {
        ViewParams {
            filter,
            search: search.to_string(),
            sort,
        }
    }

    fn sample() -> Vec<Note> {
        vec![
            note("1", "alpha"),
            important(note("2", "beta")),
            deleted(note("3", "gamma")),
            deleted(important(note("4", "delta"))),
            note("5", "epsilon"),
        ]
    }

    // -- filters -------------------------------------------------------------

    #[test]
    fn all_excludes_deleted() {
        let view = compute_view(&sample(), &ViewParams::default());
        assert_eq!(ids(&view), vec!["1", "2", "5"]);
    }

    #[test]
    fn important_excludes_deleted_and_unimportant() {
        let view = compute_view(&sample(), &params(ViewFilter::Important, "", None));
        assert_eq!(ids(&view), vec!["2"]);
        assert!(view.iter().all(|n| n.important && !n.deleted));
    }

    #[test]
    fn deleted_shows_only_trash() {
        let view = compute_view(&sample(), &params(ViewFilter::Deleted, "", None));
        assert_eq!(ids(&view), vec!["3", "4"]);
    }

    #[test]
    fn output_is_subset_consistent_with_predicate() {
        let notes = sample();
        for filter in [ViewFilter::All, ViewFilter::Important, ViewFilter::Deleted] {
            let view = compute_view(&notes, &params(filter, "", None));
            assert!(view.iter().all(|n| filter.admits(n) && notes.contains(n)));
        }
    }

    // -- search --------------------------------------------------------------

    #[test]
    fn search_is_case_insensitive_over_tags() {
        let mut tagged = note("9", "plain");
        tagged.tags = vec!["urgent".into()];
        let notes = vec![tagged, note("10", "other")];

        let view = compute_view(&notes, &params(ViewFilter::All, "URGENT", None));
        assert_eq!(ids(&view), vec!["9"]);
    }

    #[test]
    fn search_matches_title_or_content() {
        let mut n = note("1", "Shopping");
        n.content = "Buy MILK".into();
        let notes = vec![n, note("2", "Work")];

        assert_eq!(ids(&compute_view(&notes, &params(ViewFilter::All, "shop", None))), vec!["1"]);
        assert_eq!(ids(&compute_view(&notes, &params(ViewFilter::All, "milk", None))), vec!["1"]);
    }

    #[test]
    fn blank_search_matches_everything() {
        let view = compute_view(&sample(), &params(ViewFilter::All, "   ", None));
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn search_applies_within_trash() {
        let view = compute_view(&sample(), &params(ViewFilter::Deleted, "gam", None));
        assert_eq!(ids(&view), vec!["3"]);
    }

    // -- sorting -------------------------------------------------------------

    #[test]
    fn important_sort_is_stable() {
        let notes = vec![
            note("a", "1"),
            important(note("b", "2")),
            note("c", "3"),
            important(note("d", "4")),
            note("e", "5"),
        ];
        let view = compute_view(&notes, &params(ViewFilter::All, "", Some(SortOrder::Important)));
        assert_eq!(ids(&view), vec!["b", "d", "a", "c", "e"]);
    }

    #[test]
    fn newest_and_oldest_use_updated_then_created() {
        let mut edited = created(note("old", "x"), "2024-01-01T00:00:00Z");
        edited.updated_at = parse_timestamp("2024-06-01T00:00:00Z");
        let notes = vec![
            edited,
            created(note("mid", "y"), "2024-03-01T00:00:00Z"),
            note("none", "z"),
        ];

        let newest = compute_view(&notes, &params(ViewFilter::All, "", Some(SortOrder::Newest)));
        assert_eq!(ids(&newest), vec!["old", "mid", "none"]);

        let oldest = compute_view(&notes, &params(ViewFilter::All, "", Some(SortOrder::Oldest)));
        assert_eq!(ids(&oldest), vec!["none", "mid", "old"]);
    }

    #[test]
    fn alphabetical_sorts_ignore_case() {
        let notes = vec![note("1", "banana"), note("2", "Apple"), note("3", "cherry")];

        let asc = compute_view(&notes, &params(ViewFilter::All, "", Some(SortOrder::AlphaAsc)));
        assert_eq!(ids(&asc), vec!["2", "1", "3"]);

        let desc = compute_view(&notes, &params(ViewFilter::All, "", Some(SortOrder::AlphaDesc)));
        assert_eq!(ids(&desc), vec!["3", "1", "2"]);
    }

    #[test]
    fn no_sort_keeps_input_order() {
        let notes = vec![note("z", "z"), note("a", "a")];
        let view = compute_view(&notes, &ViewParams::default());
        assert_eq!(ids(&view), vec!["z", "a"]);
    }

    #[test]
    fn compare_titles_orders_cyrillic_yo_with_ye() {
        assert_eq!(compare_titles("ёж", "жук"), Ordering::Less);
        assert_eq!(compare_titles("a", "A"), Ordering::Less);
        assert_eq!(compare_titles("same", "same"), Ordering::Equal);
    }

    #[test]
    fn recompute_is_idempotent() {
        let notes = sample();
        let p = params(ViewFilter::All, "a", Some(SortOrder::AlphaDesc));
        assert_eq!(compute_view(&notes, &p), compute_view(&notes, &p));
    }

    // -- empty states --------------------------------------------------------

    #[test]
    fn empty_input_yields_no_notes_state() {
        let view = View::build(&[], &ViewParams::default());
        assert!(view.notes.is_empty());
        assert_eq!(view.empty, Some(EmptyState::NoNotes));
    }

    #[test]
    fn unmatched_search_yields_no_results_state() {
        let view = View::build(&sample(), &params(ViewFilter::All, "zzz", None));
        assert_eq!(view.empty, Some(EmptyState::NoResults));
    }

    #[test]
    fn empty_trash_and_important_states() {
        let notes = vec![note("1", "x")];
        assert_eq!(
            View::build(&notes, &params(ViewFilter::Deleted, "", None)).empty,
            Some(EmptyState::TrashEmpty)
        );
        assert_eq!(
            View::build(&notes, &params(ViewFilter::Important, "", None)).empty,
            Some(EmptyState::NoImportant)
        );
    }

    #[test]
    fn view_counts_live_and_trashed() {
        let view = View::build(&sample(), &ViewParams::default());
        assert_eq!(view.live_count, 3);
        assert_eq!(view.trashed_count, 2);
        assert_eq!(view.empty, None);
    }

    // -- parsing -------------------------------------------------------------

    #[test]
    fn parses_selector_values() {
        assert_eq!("trash".parse::<ViewFilter>().unwrap(), ViewFilter::Deleted);
        assert_eq!("alpha-desc".parse::<SortOrder>().unwrap(), SortOrder::AlphaDesc);
        assert_eq!(SortOrder::parse_optional("").unwrap(), None);
        assert!("random".parse::<SortOrder>().is_err());
        assert!("archived".parse::<ViewFilter>().is_err());
    }
}
