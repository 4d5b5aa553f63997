//! Spoken altitude readout from the in-game height HUD.

pub mod curve;
pub mod monitor;

pub use curve::HeightCurve;
pub use monitor::{HeightMonitor, MonitorHandle, PollOutcome};
