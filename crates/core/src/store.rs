//! Client-side note cache and view parameters.

use crate::note::Note;
use crate::types::NoteId;
use crate::view::{compute_view, SortOrder, View, ViewFilter, ViewParams};

/// The last successfully fetched notes plus the active view parameters.
///
/// The cache is only ever overwritten wholesale by the reload path; it is
/// never patched locally after a mutation.
#[derive(Debug, Default, Clone)]
pub struct NoteStore {
    notes: Vec<Note>,
    params: ViewParams,
    /// Generation of the reload whose result is currently cached.
    generation: u64,
    loaded: bool,
}

impl NoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: ViewParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Overwrite the cached list.
    pub fn replace(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.loaded = true;
    }

    /// Overwrite the cached list only if `generation` is newer than the one
    /// currently cached. Returns whether the list was applied.
    ///
    /// Reloads can overlap; a slow, older response must not clobber a newer
    /// one that already landed.
    pub fn replace_if_newer(&mut self, generation: u64, notes: Vec<Note>) -> bool {
        if self.loaded && generation <= self.generation {
            return false;
        }
        self.generation = generation;
        self.replace(notes);
        true
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether any reload has succeeded yet.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        self.params.filter = filter;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.params.search = search.into();
    }

    pub fn set_sort(&mut self, sort: Option<SortOrder>) {
        self.params.sort = sort;
    }

    pub fn find(&self, id: &NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| &n.id == id)
    }

    /// Run the view pipeline on the current state.
    pub fn visible(&self) -> Vec<Note> {
        compute_view(&self.notes, &self.params)
    }

    /// The full view, including the empty-state classification.
    pub fn view(&self) -> View {
        View::build(&self.notes, &self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::EmptyState;

    fn note(id: &str, deleted: bool) -> Note {
        Note {
            id: NoteId::from(id),
            title: format!("note {id}"),
            content: "body".into(),
            tags: Vec::new(),
            important: false,
            deleted,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn starts_empty_and_unloaded() {
        let store = NoteStore::new();
        assert!(!store.is_loaded());
        assert!(store.notes().is_empty());
        assert_eq!(store.view().empty, Some(EmptyState::NoNotes));
    }

    #[test]
    fn replace_overwrites_wholesale() {
        let mut store = NoteStore::new();
        store.replace(vec![note("1", false), note("2", false)]);
        store.replace(vec![note("3", false)]);
        assert_eq!(store.notes().len(), 1);
        assert!(store.find(&NoteId::from("3")).is_some());
        assert!(store.find(&NoteId::from("1")).is_none());
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut store = NoteStore::new();
        assert!(store.replace_if_newer(2, vec![note("new", false)]));
        assert!(!store.replace_if_newer(1, vec![note("old", false)]));
        assert!(!store.replace_if_newer(2, vec![note("dup", false)]));
        assert_eq!(store.notes()[0].id.as_str(), "new");
        assert_eq!(store.generation(), 2);
    }

    #[test]
    fn setters_do_not_touch_notes() {
        let mut store = NoteStore::new();
        store.replace(vec![note("1", false), note("2", true)]);

        store.set_filter(ViewFilter::Deleted);
        store.set_search("note");
        store.set_sort(Some(SortOrder::AlphaAsc));

        assert_eq!(store.notes().len(), 2);
        let visible = store.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id.as_str(), "2");
        assert_eq!(store.params().sort, Some(SortOrder::AlphaAsc));
    }
}
