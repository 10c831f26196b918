//! `themes` subcommands: the theme-management side of the shared store.

use std::io::Write;
use std::process::ExitCode;

use restyle_common::keys::{CURRENT_THEME_ID, IS_ENABLED, STATE_KEYS, THEMES};
use restyle_common::{CollectionError, RestyleError, Theme, ThemeBundle};
use restyle_sync::{Entries, KeyValueStore, PersistedState};
use serde_json::json;
use tracing::info;

use super::{read_input, write_out};
use crate::cli::ThemesCommand;

pub async fn run(
    action: ThemesCommand,
    store: &dyn KeyValueStore,
    out: &mut dyn Write,
) -> Result<ExitCode, RestyleError> {
    let state = PersistedState::from_entries(&store.get(STATE_KEYS).await?);

    match action {
        ThemesCommand::List => list(&state, out)?,
        ThemesCommand::Add {
            name,
            url,
            css,
            description,
            select,
        } => {
            let source = read_input(css.as_deref())?;
            let mut theme = Theme::new(name, url, source);
            if let Some(description) = description {
                theme = theme.with_description(description);
            }
            let id = add(store, state, theme, select).await?;
            write_out(out, &id)?;
        }
        ThemesCommand::Remove { id } => remove(store, state, &id).await?,
        ThemesCommand::Select { id } => {
            if !state.themes.contains(&id) {
                return Err(CollectionError::NotFound(id).into());
            }
            store.set(entry(CURRENT_THEME_ID, json!(id))).await?;
            info!(theme = %id, "selected theme");
        }
        ThemesCommand::Enable => store.set(entry(IS_ENABLED, json!(true))).await?,
        ThemesCommand::Disable => store.set(entry(IS_ENABLED, json!(false))).await?,
        ThemesCommand::Import { file } => {
            let raw = read_input(Some(&file))?;
            let added = import(store, state, &raw).await?;
            write_out(out, &format!("imported {added} theme(s)"))?;
        }
        ThemesCommand::Export { output } => {
            let json = export(&state)?;
            match output {
                Some(path) => std::fs::write(&path, json).map_err(|e| {
                    RestyleError::Other(format!("failed to write {}: {e}", path.display()))
                })?,
                None => write_out(out, &json)?,
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn list(state: &PersistedState, out: &mut dyn Write) -> Result<(), RestyleError> {
    let current = state.current_theme_id.as_ref().map(|id| id.as_str());
    for theme in state.themes.sorted() {
        let marker = if Some(theme.id.as_str()) == current { "*" } else { " " };
        let target = if theme.website_url.is_empty() {
            "all sites"
        } else {
            theme.website_url.as_str()
        };
        write_out(
            out,
            &format!(
                "{marker} {}  {}  [{target}]  updated {}",
                theme.id,
                theme.name,
                theme.updated_at.format("%Y-%m-%d %H:%M")
            ),
        )?;
    }
    let enabled = if state.enabled { "on" } else { "off" };
    write_out(out, &format!("theming is {enabled}"))
}

async fn add(
    store: &dyn KeyValueStore,
    mut state: PersistedState,
    theme: Theme,
    select: bool,
) -> Result<String, RestyleError> {
    let id = theme.id.to_string();
    state.themes.insert(theme);

    let mut update = entry(THEMES, state.themes.to_value());
    if select || state.current_theme().is_none() {
        update.insert(CURRENT_THEME_ID.into(), json!(id));
    }
    store.set(update).await?;
    info!(theme = %id, "added theme");
    Ok(id)
}

async fn remove(
    store: &dyn KeyValueStore,
    mut state: PersistedState,
    id: &str,
) -> Result<(), RestyleError> {
    state.themes.remove(id)?;

    let mut update = entry(THEMES, state.themes.to_value());
    if state.current_theme().is_none() {
        if let Some(first) = state.themes.first_id() {
            update.insert(CURRENT_THEME_ID.into(), json!(first.as_str()));
        }
    }
    store.set(update).await?;
    info!(theme = id, "removed theme");
    Ok(())
}

async fn import(
    store: &dyn KeyValueStore,
    mut state: PersistedState,
    raw: &str,
) -> Result<usize, RestyleError> {
    let incoming = ThemeBundle::parse(raw)?;
    let added = state.themes.merge(incoming);
    store.set(entry(THEMES, state.themes.to_value())).await?;
    info!(added, "imported themes");
    Ok(added)
}

fn export(state: &PersistedState) -> Result<String, RestyleError> {
    let themes = state.themes.sorted().into_iter().cloned().collect();
    Ok(ThemeBundle::new(themes).to_json()?)
}

fn entry(key: &str, value: serde_json::Value) -> Entries {
    let mut entries = Entries::new();
    entries.insert(key.to_string(), value);
    entries
}
