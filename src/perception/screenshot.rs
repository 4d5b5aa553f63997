use image::{DynamicImage, RgbImage};
use xcap::Monitor;

use crate::errors::{HudError, HudResult};
use crate::perception::traits::ScreenSampler;
use crate::perception::types::ScreenRegion;

/// Samples the primary monitor through xcap.
///
/// xcap has no sub-rectangle capture, so every call grabs the full monitor
/// and crops.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapSampler;

impl XcapSampler {
    pub fn new() -> Self {
        Self
    }

    fn primary_monitor() -> HudResult<Monitor> {
        let monitors =
            Monitor::all().map_err(|e| HudError::Capture(format!("enumerate monitors: {e}")))?;
        let mut fallback = None;
        for monitor in monitors {
            if monitor.is_primary() {
                return Ok(monitor);
            }
            if fallback.is_none() {
                fallback = Some(monitor);
            }
        }
        fallback.ok_or_else(|| HudError::Capture("no monitors found".into()))
    }
}

impl ScreenSampler for XcapSampler {
    fn sample_region(&self, region: ScreenRegion) -> HudResult<RgbImage> {
        let monitor = Self::primary_monitor()?;
        let frame = monitor
            .capture_image()
            .map_err(|e| HudError::Capture(format!("capture primary monitor: {e}")))?;

        if region.x1 > frame.width() || region.y1 > frame.height() {
            return Err(HudError::Capture(format!(
                "region ({},{})-({},{}) exceeds monitor {}x{}",
                region.x0,
                region.y0,
                region.x1,
                region.y1,
                frame.width(),
                frame.height()
            )));
        }

        let cropped = DynamicImage::ImageRgba8(frame).crop_imm(
            region.x0,
            region.y0,
            region.width(),
            region.height(),
        );
        Ok(cropped.to_rgb8())
    }
}
