use std::path::Path;
use std::time::Duration;

use tokio::time::Instant;

use crate::actions::ActionContext;
use crate::config::GamemodeConfig;
use crate::errors::HudResult;
use crate::executor::input::click_at;
use crate::perception::traits::sample_pixel;
use crate::perception::types::{matches_exact, matches_within, rgb};

const READY_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gamemode {
    /// File stem, used when announcing and when picking by name.
    pub name: String,
    /// Typed verbatim into the discover search box.
    pub search_text: String,
    pub team_sizes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    NotInLobby,
    TimedOut,
}

fn parse_gamemode(name: &str, content: &str) -> Option<Gamemode> {
    let mut lines = content.lines();
    let search_text = lines.next()?.trim().to_string();
    let team_sizes = lines
        .next()?
        .trim()
        .split(',')
        .map(str::to_string)
        .collect();
    Some(Gamemode {
        name: name.to_string(),
        search_text,
        team_sizes,
    })
}

/// Reads every `*.txt` file in `folder`; files shorter than two lines are skipped.
pub fn load_gamemodes(folder: &Path) -> HudResult<Vec<Gamemode>> {
    let mut modes = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let content = std::fs::read_to_string(&path)?;
        match parse_gamemode(name, &content) {
            Some(mode) => modes.push(mode),
            None => tracing::warn!(path = %path.display(), "gamemode file needs two lines, skipped"),
        }
    }
    modes.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::info!(folder = %folder.display(), count = modes.len(), "gamemodes loaded");
    Ok(modes)
}

pub fn find_gamemode<'a>(modes: &'a [Gamemode], name: &str) -> Option<&'a Gamemode> {
    let name = name.trim();
    modes.iter().find(|m| m.name.eq_ignore_ascii_case(name))
}

/// Searches for `mode` in the lobby, opens it and readies up.
pub async fn select_gamemode(
    ctx: &ActionContext,
    config: &GamemodeConfig,
    mode: &Gamemode,
) -> HudResult<SelectOutcome> {
    let lobby_pixel = sample_pixel(&ctx.sampler, config.lobby_check_pixel).await?;
    if matches_within(
        lobby_pixel,
        rgb(config.lobby_check_color),
        config.lobby_check_tolerance,
    ) {
        tracing::info!(mode = %mode.name, "gamemode: not in lobby");
        ctx.speaker.speak("Please ensure that you are in the Fortnite Lobby.");
        return Ok(SelectOutcome::NotInLobby);
    }

    tracing::info!(mode = %mode.name, search = %mode.search_text, "gamemode: searching");
    click_at(ctx.input.as_ref(), config.search_field)?;
    tokio::time::sleep(Duration::from_millis(500)).await;
    ctx.input.type_text(&mode.search_text)?;
    ctx.input.press_enter()?;

    let ready = rgb(config.ready_color);
    let deadline = Instant::now() + Duration::from_millis(config.ready_timeout_ms);
    while !matches_exact(sample_pixel(&ctx.sampler, config.ready_pixel).await?, ready) {
        if Instant::now() >= deadline {
            tracing::warn!(
                mode = %mode.name,
                timeout_ms = config.ready_timeout_ms,
                "gamemode: search results never appeared"
            );
            ctx.speaker.speak("Game mode search timed out.");
            return Ok(SelectOutcome::TimedOut);
        }
        tokio::time::sleep(READY_POLL).await;
    }
    tokio::time::sleep(Duration::from_millis(100)).await;

    click_at(ctx.input.as_ref(), config.first_result)?;
    tokio::time::sleep(Duration::from_millis(150)).await;
    click_at(ctx.input.as_ref(), config.play_button)?;
    tokio::time::sleep(Duration::from_millis(250)).await;

    ctx.input.press_key('b')?;
    tokio::time::sleep(Duration::from_millis(50)).await;
    ctx.input.press_key('b')?;

    ctx.speaker.speak(&format!("{} selected", mode.name));
    tracing::info!(mode = %mode.name, "gamemode selected");
    Ok(SelectOutcome::Selected)
}
