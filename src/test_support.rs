//! In-memory collaborators shared by unit tests.
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use image::{imageops, Rgb, RgbImage};

use crate::errors::{HudError, HudResult};
use crate::executor::input::InputDriver;
use crate::perception::traits::ScreenSampler;
use crate::perception::types::{ScreenPoint, ScreenRegion};
use crate::speech::Speaker;

/// A fake monitor backed by a mutable frame.
pub struct FrameSampler {
    frame: Mutex<RgbImage>,
    delay: Option<Duration>,
    captures: AtomicUsize,
}

impl FrameSampler {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            frame: Mutex::new(RgbImage::new(width, height)),
            delay: None,
            captures: AtomicUsize::new(0),
        }
    }

    /// Every capture sleeps the calling thread first, like a real screen grab.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    pub fn set(&self, x: u32, y: u32, color: Rgb<u8>) {
        self.frame.lock().unwrap().put_pixel(x, y, color);
    }
}

impl ScreenSampler for FrameSampler {
    fn sample_region(&self, region: ScreenRegion) -> HudResult<RgbImage> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let frame = self.frame.lock().unwrap();
        if region.x1 > frame.width() || region.y1 > frame.height() {
            return Err(HudError::Capture(format!(
                "region {region:?} outside {}x{} frame",
                frame.width(),
                frame.height()
            )));
        }
        Ok(imageops::crop_imm(&*frame, region.x0, region.y0, region.width(), region.height())
            .to_image())
    }
}

#[derive(Default)]
pub struct RecordingSpeaker {
    spoken: Mutex<Vec<String>>,
}

impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl Speaker for RecordingSpeaker {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

/// One call made on [`RecordingInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    MoveTo(ScreenPoint),
    LeftClick,
    Text(String),
    Enter,
    Key(char),
}

#[derive(Default)]
pub struct RecordingInput {
    events: Mutex<Vec<InputEvent>>,
}

impl RecordingInput {
    pub fn events(&self) -> Vec<InputEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: InputEvent) -> HudResult<()> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

impl InputDriver for RecordingInput {
    fn move_to(&self, point: ScreenPoint) -> HudResult<()> {
        self.record(InputEvent::MoveTo(point))
    }

    fn left_click(&self) -> HudResult<()> {
        self.record(InputEvent::LeftClick)
    }

    fn type_text(&self, text: &str) -> HudResult<()> {
        self.record(InputEvent::Text(text.to_string()))
    }

    fn press_enter(&self) -> HudResult<()> {
        self.record(InputEvent::Enter)
    }

    fn press_key(&self, key: char) -> HudResult<()> {
        self.record(InputEvent::Key(key))
    }
}
