//! Binding of named UI targets.
//!
//! A front-end declares which targets it can provide. Binding fails up
//! front if a required one is missing, instead of failing later when the
//! first event arrives. Optional targets only switch features on or off.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::FeatureFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UiTarget {
    NotesList,
    NoteForm,
    TitleInput,
    ContentInput,
    TagsInput,
    ImportantInput,
    SearchInput,
    FilterSelect,
    SortSelect,
    Notifications,
    // Optional.
    ThemeToggle,
    ClearAll,
    Export,
    Import,
    TrashFilter,
}

impl UiTarget {
    pub const REQUIRED: [UiTarget; 10] = [
        UiTarget::NotesList,
        UiTarget::NoteForm,
        UiTarget::TitleInput,
        UiTarget::ContentInput,
        UiTarget::TagsInput,
        UiTarget::ImportantInput,
        UiTarget::SearchInput,
        UiTarget::FilterSelect,
        UiTarget::SortSelect,
        UiTarget::Notifications,
    ];

    pub const OPTIONAL: [UiTarget; 5] = [
        UiTarget::ThemeToggle,
        UiTarget::ClearAll,
        UiTarget::Export,
        UiTarget::Import,
        UiTarget::TrashFilter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UiTarget::NotesList => "notes-list",
            UiTarget::NoteForm => "note-form",
            UiTarget::TitleInput => "title-input",
            UiTarget::ContentInput => "content-input",
            UiTarget::TagsInput => "tags-input",
            UiTarget::ImportantInput => "important-input",
            UiTarget::SearchInput => "search-input",
            UiTarget::FilterSelect => "filter-select",
            UiTarget::SortSelect => "sort-select",
            UiTarget::Notifications => "notifications",
            UiTarget::ThemeToggle => "theme-toggle",
            UiTarget::ClearAll => "clear-all",
            UiTarget::Export => "export",
            UiTarget::Import => "import",
            UiTarget::TrashFilter => "trash-filter",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::REQUIRED
            .into_iter()
            .chain(Self::OPTIONAL)
            .find(|t| t.name() == name)
    }
}

impl fmt::Display for UiTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("missing required UI targets: {}", join(.missing))]
pub struct BindError {
    pub missing: Vec<UiTarget>,
}

fn join(targets: &[UiTarget]) -> String {
    targets
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// The set of targets a front-end provides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiTargets {
    bound: BTreeSet<UiTarget>,
}

impl UiTargets {
    /// Bind the targets named in `available`. Unknown names are ignored.
    pub fn bind<'a>(available: impl IntoIterator<Item = &'a str>) -> Result<Self, BindError> {
        let bound: BTreeSet<UiTarget> = available
            .into_iter()
            .filter_map(UiTarget::from_name)
            .collect();

        let missing: Vec<UiTarget> = UiTarget::REQUIRED
            .into_iter()
            .filter(|t| !bound.contains(t))
            .collect();
        if !missing.is_empty() {
            return Err(BindError { missing });
        }
        Ok(Self { bound })
    }

    /// Every known target, for front-ends that provide all of them.
    pub fn all() -> Self {
        Self {
            bound: UiTarget::REQUIRED
                .into_iter()
                .chain(UiTarget::OPTIONAL)
                .collect(),
        }
    }

    pub fn has(&self, target: UiTarget) -> bool {
        self.bound.contains(&target)
    }

    /// Narrow the configured flags to what these targets can support.
    pub fn restrict(&self, flags: FeatureFlags) -> FeatureFlags {
        FeatureFlags {
            trash: flags.trash && self.has(UiTarget::TrashFilter),
            theme_toggle: flags.theme_toggle && self.has(UiTarget::ThemeToggle),
            ..flags
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required_names() -> Vec<&'static str> {
        UiTarget::REQUIRED.iter().map(|t| t.name()).collect()
    }

    #[test]
    fn binds_when_all_required_present() {
        let targets = UiTargets::bind(required_names()).unwrap();
        assert!(targets.has(UiTarget::NotesList));
        assert!(!targets.has(UiTarget::ThemeToggle));
    }

    #[test]
    fn reports_every_missing_target() {
        let mut names = required_names();
        names.retain(|n| *n != "notes-list" && *n != "sort-select");

        let err = UiTargets::bind(names).unwrap_err();
        assert_eq!(err.missing, vec![UiTarget::NotesList, UiTarget::SortSelect]);
        assert_eq!(
            err.to_string(),
            "missing required UI targets: notes-list, sort-select"
        );
    }

    #[test]
    fn optional_targets_gate_features() {
        let mut names = required_names();
        names.push("theme-toggle");
        let targets = UiTargets::bind(names).unwrap();

        let flags = targets.restrict(FeatureFlags::default());
        assert!(flags.theme_toggle);
        assert!(!flags.trash);
        assert_eq!(UiTargets::all().restrict(FeatureFlags::default()), FeatureFlags::default());
    }
}
