// Physical input simulation through enigo.
use std::time::Duration;

use enigo::{Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

use crate::errors::{HudError, HudResult};
use crate::perception::types::ScreenPoint;

pub trait InputDriver: Send + Sync {
    /// Moves the cursor to absolute screen coordinates.
    fn move_to(&self, point: ScreenPoint) -> HudResult<()>;
    /// Left click wherever the cursor currently is.
    fn left_click(&self) -> HudResult<()>;
    fn type_text(&self, text: &str) -> HudResult<()>;
    fn press_enter(&self) -> HudResult<()>;
    fn press_key(&self, key: char) -> HudResult<()>;
}

/// Hardware-level input via enigo. A fresh connection is opened per call so
/// the driver stays `Send + Sync` on every platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoInput;

impl EnigoInput {
    pub fn new() -> Self {
        Self
    }

    fn connect() -> HudResult<Enigo> {
        Enigo::new(&Settings::default()).map_err(|e| HudError::Input(format!("connect: {e}")))
    }
}

impl InputDriver for EnigoInput {
    fn move_to(&self, point: ScreenPoint) -> HudResult<()> {
        let (x, y) = (point.x as i32, point.y as i32);
        tracing::debug!(x, y, "mouse move");
        Self::connect()?
            .move_mouse(x, y, Coordinate::Abs)
            .map_err(|e| HudError::Input(format!("move mouse: {e}")))
    }

    fn left_click(&self) -> HudResult<()> {
        tracing::debug!("left click");
        Self::connect()?
            .button(Button::Left, Direction::Click)
            .map_err(|e| HudError::Input(format!("left click: {e}")))
    }

    fn type_text(&self, text: &str) -> HudResult<()> {
        tracing::debug!(text = %text, "type text");
        Self::connect()?.text(text).map_err(|e| HudError::Input(format!("type text: {e}")))
    }

    fn press_enter(&self) -> HudResult<()> {
        tracing::debug!("press enter");
        Self::connect()?
            .key(Key::Return, Direction::Click)
            .map_err(|e| HudError::Input(format!("press enter: {e}")))
    }

    fn press_key(&self, key: char) -> HudResult<()> {
        tracing::debug!(key = %key, "press key");
        Self::connect()?
            .key(Key::Unicode(key), Direction::Click)
            .map_err(|e| HudError::Input(format!("press key: {e}")))
    }
}

/// Moves, lets the cursor settle for `settle`, then left clicks.
pub async fn move_and_click(
    input: &dyn InputDriver,
    point: ScreenPoint,
    settle: Duration,
) -> HudResult<()> {
    input.move_to(point)?;
    tokio::time::sleep(settle).await;
    input.left_click()
}

/// Move and click with no pause in between.
pub fn click_at(input: &dyn InputDriver, point: ScreenPoint) -> HudResult<()> {
    input.move_to(point)?;
    input.left_click()
}
