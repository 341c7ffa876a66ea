use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use notely_core::{NoteId, SortOrder, ViewFilter};

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Notes manager client")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Clone, Debug, Subcommand)]
pub enum CliCommand {
    /// List notes.
    List {
        /// all, important or deleted.
        #[arg(long, default_value = "all")]
        filter: ViewFilter,
        #[arg(long, default_value = "")]
        search: String,
        /// newest, oldest, alpha-asc, alpha-desc or important.
        #[arg(long)]
        sort: Option<SortOrder>,
        /// Print the list as HTML instead of text.
        #[arg(long, default_value_t = false)]
        html: bool,
    },
    /// Show a single note.
    Show { id: NoteId },
    /// Create a note.
    Create {
        #[command(flatten)]
        fields: NoteFields,
    },
    /// Edit a note. Fields not given keep their current value.
    Edit {
        id: NoteId,
        #[command(flatten)]
        fields: NoteFields,
    },
    /// Delete a note (to the trash when the trash is enabled).
    Delete { id: NoteId },
    /// Delete a note for good.
    Purge { id: NoteId },
    /// Take a note out of the trash.
    Restore { id: NoteId },
    /// Flip a note's importance.
    Star { id: NoteId },
    /// Export every note as JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import notes from a JSON document.
    Import { file: PathBuf },
    /// Delete every note, one at a time.
    ClearAll {
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
    /// Permanently delete everything in the trash.
    EmptyTrash,
    /// Show or change the colour theme.
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },
}

#[derive(Clone, Debug, Default, clap::Args)]
pub struct NoteFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    /// Comma-separated.
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long)]
    pub important: Option<bool>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Show,
    Toggle,
    Light,
    Dark,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        CliConfig::command().debug_assert();
    }

    #[test]
    fn parses_list_options() {
        let cli = CliConfig::parse_from(["notely", "list", "--filter", "trash", "--sort", "alpha-asc"]);
        match cli.command {
            CliCommand::List { filter, sort, html, .. } => {
                assert_eq!(filter, ViewFilter::Deleted);
                assert_eq!(sort, Some(SortOrder::AlphaAsc));
                assert!(!html);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn edit_takes_partial_fields() {
        let cli = CliConfig::parse_from(["notely", "edit", "3", "--title", "New"]);
        match cli.command {
            CliCommand::Edit { id, fields } => {
                assert_eq!(id, NoteId::from("3"));
                assert_eq!(fields.title.as_deref(), Some("New"));
                assert!(fields.content.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn theme_defaults_to_show() {
        let cli = CliConfig::parse_from(["notely", "theme"]);
        assert!(matches!(
            cli.command,
            CliCommand::Theme {
                action: ThemeAction::Show
            }
        ));
    }
}
