use std::time::Duration;

use crate::actions::ActionContext;
use crate::config::ExitMatchConfig;
use crate::errors::HudResult;
use crate::executor::input::move_and_click;
use crate::perception::traits::sample_pixel;
use crate::perception::types::{matches_within, rgb};

const QUICK_MENU_PROMPT: &str = "Open your quick menu before attempting to leave a match. \
Press Escape to open your quick menu, and try again.";

const CLICK_SETTLE: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    Exited,
    QuickMenuClosed,
}

/// Leaves the current match through the quick menu.
///
/// Only acts when the quick menu is open; otherwise tells the player how to
/// open it.
pub async fn exit_match(ctx: &ActionContext, config: &ExitMatchConfig) -> HudResult<ExitOutcome> {
    let pixel = sample_pixel(&ctx.sampler, config.quick_menu_pixel).await?;
    if !matches_within(pixel, rgb(config.quick_menu_color), config.tolerance) {
        tracing::info!(?pixel, "exit match: quick menu not open");
        ctx.speaker.speak(QUICK_MENU_PROMPT);
        return Ok(ExitOutcome::QuickMenuClosed);
    }

    tracing::info!("exit match: leaving");
    tokio::time::sleep(Duration::from_millis(100)).await;
    move_and_click(ctx.input.as_ref(), config.leave_button, CLICK_SETTLE).await?;
    move_and_click(ctx.input.as_ref(), config.confirm_button, CLICK_SETTLE).await?;
    tokio::time::sleep(Duration::from_millis(250)).await;
    // Second click on the confirm dialog, cursor already in place.
    ctx.input.left_click()?;
    Ok(ExitOutcome::Exited)
}
