//! Scripted menu interactions: each one checks a single pixel, then plays a
//! fixed sequence of clicks and keystrokes with fixed pauses.

pub mod exit_match;
pub mod gamemode;

use std::sync::Arc;

use crate::executor::input::InputDriver;
use crate::perception::traits::ScreenSampler;
use crate::speech::Speaker;

pub use exit_match::{exit_match, ExitOutcome};
pub use gamemode::{find_gamemode, load_gamemodes, select_gamemode, Gamemode, SelectOutcome};

/// Collaborators every script needs.
#[derive(Clone)]
pub struct ActionContext {
    pub sampler: Arc<dyn ScreenSampler>,
    pub input: Arc<dyn InputDriver>,
    pub speaker: Arc<dyn Speaker>,
}
