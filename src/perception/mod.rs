//! Screen perception: pixel sampling and color predicates.

pub mod screenshot;
pub mod traits;
pub mod types;

pub use screenshot::XcapSampler;
pub use traits::{sample_pixel, ScreenSampler};
pub use types::{matches_exact, matches_within, ColorTriple, ScreenPoint, ScreenRegion};
