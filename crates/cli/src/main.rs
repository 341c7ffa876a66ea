//! `notely` -- command-line front-end for the notes API.
//!
//! Every invocation loads the notes, runs one command and prints the
//! resulting notifications to stderr.
//!
//! # Environment variables
//!
//! See [`AppConfig::from_env`] for the full table. `RUST_LOG` overrides the
//! default log filter.

mod cli;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use clap::Parser;
use notely_app::{
    AppConfig, Editor, HtmlRenderer, LoadOutcome, NotesApp, PreferenceStore, Renderer, Severity,
    TextRenderer, Theme, UiTargets,
};
use notely_core::{NoteForm, ViewFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{CliCommand, CliConfig, NoteFields, ThemeAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notely_cli=info,notely_app=info,notely_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = CliConfig::parse();

    let mut config = AppConfig::from_env()?;
    // A terminal offers every target.
    config.flags = UiTargets::all().restrict(config.flags);

    tracing::debug!(
        base_url = %config.client.base_url,
        trash = config.flags.trash,
        server_filtering = config.flags.server_filtering,
        "Starting notely",
    );

    let app = NotesApp::from_config(&config)?;
    let prefs = PreferenceStore::new(&config.prefs_path);

    let result = run(&app, &prefs, cli.command).await;
    print_notifications(&app);
    result
}

async fn run(app: &NotesApp, prefs: &PreferenceStore, command: CliCommand) -> anyhow::Result<()> {
    match command {
        CliCommand::List {
            filter,
            search,
            sort,
            html,
        } => {
            if filter == ViewFilter::Deleted && !app.flags().trash {
                bail!("the trash is disabled");
            }
            app.set_filter(filter).await;
            app.set_search(search).await;
            app.set_sort(sort).await;
            ensure_loaded(app).await?;

            let frame = app.frame().await;
            if html {
                let mut renderer = HtmlRenderer::new();
                renderer.render(&frame);
                println!("{}", renderer.output());
            } else {
                let mut renderer = TextRenderer::new();
                renderer.render(&frame);
                print!("{}", renderer.output());
            }
        }
        CliCommand::Show { id } => {
            ensure_loaded(app).await?;
            let note = app
                .find(&id)
                .await
                .with_context(|| format!("note {id} not found"))?;
            println!("#{} {}", note.id, note.title);
            if note.important {
                println!("important");
            }
            if note.deleted {
                println!("in trash");
            }
            if !note.tags.is_empty() {
                println!("tags: {}", note.tags_joined());
            }
            println!();
            println!("{}", note.content);
        }
        CliCommand::Create { fields } => {
            let mut editor = Editor::new();
            editor.open_new();
            fields.apply(editor.form_mut());
            let note = app.submit(&mut editor).await?;
            println!("{}", note.id);
        }
        CliCommand::Edit { id, fields } => {
            ensure_loaded(app).await?;
            let mut editor = Editor::new();
            app.begin_edit(&mut editor, &id).await?;
            fields.apply(editor.form_mut());
            app.submit(&mut editor).await?;
        }
        CliCommand::Delete { id } => {
            ensure_loaded(app).await?;
            app.delete_note(&id).await?;
        }
        CliCommand::Purge { id } => {
            ensure_loaded(app).await?;
            app.delete_permanently(&id).await?;
        }
        CliCommand::Restore { id } => {
            if !app.flags().trash {
                bail!("the trash is disabled");
            }
            ensure_loaded(app).await?;
            app.restore_note(&id).await?;
        }
        CliCommand::Star { id } => {
            ensure_loaded(app).await?;
            app.toggle_important(&id).await?;
        }
        CliCommand::Export { out } => {
            let json = app.export().await?.to_json()?;
            match out {
                Some(path) => std::fs::write(&path, json)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => println!("{json}"),
            }
        }
        CliCommand::Import { file } => {
            let document = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let result = app.import(&document).await?;
            for rejection in &result.rejected {
                eprintln!("item {}: {}", rejection.index, rejection.reason);
            }
        }
        CliCommand::ClearAll { yes } => {
            ensure_loaded(app).await?;
            if !yes && !confirm("Delete all notes?")? {
                return Ok(());
            }
            let report = app.clear_all().await?;
            if let Some(failure) = report.failed {
                bail!(
                    "stopped at note {} ({}); {} not attempted",
                    failure.id,
                    failure.message,
                    report.not_attempted.len()
                );
            }
        }
        CliCommand::EmptyTrash => {
            if !app.flags().trash {
                bail!("the trash is disabled");
            }
            app.empty_trash().await?;
        }
        CliCommand::Theme { action } => {
            if action != ThemeAction::Show && !app.flags().theme_toggle {
                bail!("theme switching is disabled");
            }
            let theme = match action {
                ThemeAction::Show => prefs.theme(),
                ThemeAction::Toggle => prefs.toggle_theme()?,
                ThemeAction::Light => {
                    prefs.set_theme(Theme::Light)?;
                    Theme::Light
                }
                ThemeAction::Dark => {
                    prefs.set_theme(Theme::Dark)?;
                    Theme::Dark
                }
            };
            println!("{theme}");
        }
    }
    Ok(())
}

async fn ensure_loaded(app: &NotesApp) -> anyhow::Result<()> {
    match app.load().await {
        LoadOutcome::Stale(kind) => bail!("could not load notes: {kind}"),
        LoadOutcome::Fresh | LoadOutcome::Superseded => Ok(()),
    }
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_notifications(app: &NotesApp) {
    for notification in app.notifier().active() {
        let prefix = match notification.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
            Severity::Info => "info",
        };
        eprintln!("{prefix}: {}", notification.message);
    }
}

impl NoteFields {
    /// Overwrite the form fields that were given on the command line.
    fn apply(self, form: &mut NoteForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(content) = self.content {
            form.content = content;
        }
        if let Some(tags) = self.tags {
            form.tags = tags;
        }
        if let Some(important) = self.important {
            form.important = important;
        }
    }
}
