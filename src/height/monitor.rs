use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{Rgb, RgbImage};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::HeightConfig;
use crate::errors::{HudError, HudResult};
use crate::height::curve::HeightCurve;
use crate::perception::traits::ScreenSampler;
use crate::perception::types::{matches_exact, rgb, ScreenPoint, ScreenRegion};
use crate::speech::Speaker;

/// Result of a single detection pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollOutcome {
    /// At least one calibration pixel did not show the indicator color.
    HudAbsent,
    /// HUD frame present but no strip row matched.
    IndicatorMissing,
    /// Indicator found on a row the curve has no value for.
    OutOfRange { row: u32 },
    Announced { row: u32, meters: f64 },
}

impl PollOutcome {
    pub fn indicator_visible(&self) -> bool {
        matches!(self, Self::OutOfRange { .. } | Self::Announced { .. })
    }
}

pub struct HeightMonitor {
    sampler: Arc<dyn ScreenSampler>,
    speaker: Arc<dyn Speaker>,
    curve: HeightCurve,
    indicator: Rgb<u8>,
    calibration_pixels: Vec<ScreenPoint>,
    strip: ScreenRegion,
    // Covers the strip and every calibration pixel; grabbed once per poll.
    capture: ScreenRegion,
    interval: Duration,
    announce_new_match: bool,
    new_match_stability: u32,
    visible: Arc<AtomicBool>,
    // New-match bookkeeping: armed once the indicator has been seen.
    armed: bool,
    missed_polls: u32,
}

impl HeightMonitor {
    pub fn new(
        config: &HeightConfig,
        sampler: Arc<dyn ScreenSampler>,
        speaker: Arc<dyn Speaker>,
    ) -> HudResult<Self> {
        if config.calibration_pixels.is_empty() {
            return Err(HudError::Config("height.calibration_pixels is empty".into()));
        }
        if config.strip_bottom < config.strip_top {
            return Err(HudError::Config(format!(
                "height strip bottom {} is above top {}",
                config.strip_bottom, config.strip_top
            )));
        }
        let strip = ScreenRegion::inclusive(
            config.strip_column,
            config.strip_top,
            config.strip_column,
            config.strip_bottom,
        )?;
        let capture = config
            .calibration_pixels
            .iter()
            .try_fold(strip, |acc, p| Ok::<_, HudError>(acc.union(&ScreenRegion::point(*p)?)))?;

        Ok(Self {
            sampler,
            speaker,
            curve: HeightCurve::new(config.calibration_points.clone())?,
            indicator: rgb(config.indicator_color),
            calibration_pixels: config.calibration_pixels.clone(),
            strip,
            capture,
            interval: Duration::from_millis(config.poll_interval_ms),
            announce_new_match: config.announce_new_match,
            new_match_stability: config.new_match_stability.max(1),
            visible: Arc::new(AtomicBool::new(false)),
            armed: false,
            missed_polls: 0,
        })
    }

    pub fn visibility(&self) -> Arc<AtomicBool> {
        self.visible.clone()
    }

    /// Color at a screen coordinate inside the captured frame.
    fn pixel_at(&self, frame: &RgbImage, x: u32, y: u32) -> HudResult<Rgb<u8>> {
        frame
            .get_pixel_checked(x - self.capture.x0, y - self.capture.y0)
            .copied()
            .ok_or_else(|| {
                HudError::Capture(format!(
                    "captured {}x{} frame is missing ({x}, {y})",
                    frame.width(),
                    frame.height()
                ))
            })
    }

    /// First calibration pixel not showing the indicator color, if any.
    fn unlit_calibration_pixel(&self, frame: &RgbImage) -> HudResult<Option<ScreenPoint>> {
        for point in &self.calibration_pixels {
            if !matches_exact(self.pixel_at(frame, point.x, point.y)?, self.indicator) {
                return Ok(Some(*point));
            }
        }
        Ok(None)
    }

    /// First strip row, in screen coordinates, showing the indicator color.
    fn find_indicator_row(&self, frame: &RgbImage) -> HudResult<Option<u32>> {
        for row in self.strip.y0..self.strip.y1 {
            if matches_exact(self.pixel_at(frame, self.strip.x0, row)?, self.indicator) {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    fn detect(&self) -> HudResult<PollOutcome> {
        let frame = self.sampler.sample_region(self.capture)?;
        if let Some(point) = self.unlit_calibration_pixel(&frame)? {
            tracing::debug!(x = point.x, y = point.y, "height HUD not on screen");
            return Ok(PollOutcome::HudAbsent);
        }
        let Some(row) = self.find_indicator_row(&frame)? else {
            tracing::debug!("no height indicator detected");
            return Ok(PollOutcome::IndicatorMissing);
        };
        let Some(meters) = self.curve.interpolate(row) else {
            tracing::debug!(row, "height indicator outside calibrated range");
            return Ok(PollOutcome::OutOfRange { row });
        };

        tracing::info!(row, meters = %format!("{meters:.2}"), "height detected");
        self.speaker.speak(&format!("{meters:.0} meters high"));
        Ok(PollOutcome::Announced { row, meters })
    }

    fn track_visibility(&mut self, outcome: &PollOutcome) {
        let now = outcome.indicator_visible();
        let before = self.visible.swap(now, Ordering::AcqRel);
        if now && !before {
            tracing::info!("height indicator appeared");
        } else if before && !now {
            tracing::info!("height indicator disappeared");
        }

        if now {
            self.armed = true;
            self.missed_polls = 0;
            return;
        }
        if !self.armed {
            return;
        }
        self.missed_polls += 1;
        if self.missed_polls >= self.new_match_stability {
            self.armed = false;
            self.missed_polls = 0;
            tracing::info!("height indicator gone, new match started");
            if self.announce_new_match {
                self.speaker.speak("New match started");
            }
        }
    }

    /// Runs one detection pass on a single captured frame. Capture errors
    /// are returned; every other miss is reported through the outcome.
    ///
    /// Blocks on the capture.
    pub fn poll_once(&mut self) -> HudResult<PollOutcome> {
        let outcome = self.detect()?;
        self.track_visibility(&outcome);
        Ok(outcome)
    }

    pub async fn run(self, stop: Arc<AtomicBool>, wake: Arc<Notify>) -> HudResult<()> {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "height monitor started");
        let visible = self.visibility();
        let interval = self.interval;
        let mut monitor = self;
        while !stop.load(Ordering::Acquire) {
            // The capture blocks, so the poll runs on the blocking pool and
            // hands the monitor back afterwards.
            let (back, polled) = tokio::task::spawn_blocking(move || {
                let polled = monitor.poll_once();
                (monitor, polled)
            })
            .await
            .map_err(|e| {
                visible.store(false, Ordering::Release);
                HudError::Monitor(format!("poll task: {e}"))
            })?;
            monitor = back;
            if let Err(e) = polled {
                tracing::error!(error = %e, "height monitor stopped on capture failure");
                visible.store(false, Ordering::Release);
                return Err(e);
            }
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = wake.notified() => {}
            }
        }
        visible.store(false, Ordering::Release);
        tracing::info!("height monitor stopped");
        Ok(())
    }

    pub fn spawn(self) -> MonitorHandle {
        let stop = Arc::new(AtomicBool::new(false));
        let wake = Arc::new(Notify::new());
        let visible = self.visibility();
        let task = tokio::spawn(self.run(stop.clone(), wake.clone()));
        MonitorHandle {
            stop,
            wake,
            visible,
            task,
        }
    }
}

/// Owner side of a running monitor task.
pub struct MonitorHandle {
    stop: Arc<AtomicBool>,
    wake: Arc<Notify>,
    visible: Arc<AtomicBool>,
    task: JoinHandle<HudResult<()>>,
}

impl MonitorHandle {
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signals the loop, interrupts its sleep and waits for it to exit.
    pub async fn shutdown(self) -> HudResult<()> {
        self.stop.store(true, Ordering::Release);
        // notify_one keeps a permit if the loop is between polls.
        self.wake.notify_one();
        self.task
            .await
            .map_err(|e| HudError::Monitor(format!("join: {e}")))?
    }
}
