use std::sync::Arc;

use image::{Rgb, RgbImage};

use crate::errors::{HudError, HudResult};
use crate::perception::types::{ScreenPoint, ScreenRegion};

/// Read-only access to what is currently on screen.
/// Production uses the xcap backend; tests substitute an in-memory frame.
///
/// Calls block until the capture completes. From async code go through
/// [`sample_pixel`] or `spawn_blocking`.
pub trait ScreenSampler: Send + Sync {
    fn sample_region(&self, region: ScreenRegion) -> HudResult<RgbImage>;

    fn pixel(&self, point: ScreenPoint) -> HudResult<Rgb<u8>> {
        let img = self.sample_region(ScreenRegion::point(point)?)?;
        img.get_pixel_checked(0, 0)
            .copied()
            .ok_or_else(|| HudError::Capture(format!("no pixel captured at ({}, {})", point.x, point.y)))
    }
}

/// Reads one pixel on the blocking pool so a slow capture never stalls the
/// runtime.
pub async fn sample_pixel(sampler: &Arc<dyn ScreenSampler>, point: ScreenPoint) -> HudResult<Rgb<u8>> {
    let sampler = sampler.clone();
    tokio::task::spawn_blocking(move || sampler.pixel(point))
        .await
        .map_err(|e| HudError::Capture(format!("capture task failed: {e}")))?
}
