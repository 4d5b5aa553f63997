use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::errors::{HudError, HudResult};

/// Absolute screen coordinate in physical pixels of the primary monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: u32,
    pub y: u32,
}

impl ScreenPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Capture rectangle, end coordinates exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRegion {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl ScreenRegion {
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> HudResult<Self> {
        if x1 <= x0 || y1 <= y0 {
            return Err(HudError::Capture(format!(
                "empty capture region ({x0},{y0})-({x1},{y1})"
            )));
        }
        Ok(Self { x0, y0, x1, y1 })
    }

    /// Region from `(x0, y0)` through `(x_last, y_last)`, both corners included.
    pub fn inclusive(x0: u32, y0: u32, x_last: u32, y_last: u32) -> HudResult<Self> {
        Self::new(x0, y0, one_past(x_last)?, one_past(y_last)?)
    }

    /// The 1×1 region covering a single pixel.
    pub fn point(p: ScreenPoint) -> HudResult<Self> {
        Self::inclusive(p.x, p.y, p.x, p.y)
    }

    /// Smallest region containing both.
    pub fn union(&self, other: &ScreenRegion) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn contains(&self, p: ScreenPoint) -> bool {
        (self.x0..self.x1).contains(&p.x) && (self.y0..self.y1).contains(&p.y)
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

fn one_past(coord: u32) -> HudResult<u32> {
    coord
        .checked_add(1)
        .ok_or_else(|| HudError::Config(format!("screen coordinate {coord} is out of range")))
}

/// RGB triple as written in config.toml, e.g. `[255, 255, 255]`.
pub type ColorTriple = [u8; 3];

pub fn rgb(c: ColorTriple) -> Rgb<u8> {
    Rgb(c)
}

pub fn matches_exact(pixel: Rgb<u8>, target: Rgb<u8>) -> bool {
    pixel == target
}

/// True when every channel differs from `target` by at most `tolerance`.
pub fn matches_within(pixel: Rgb<u8>, target: Rgb<u8>, tolerance: u8) -> bool {
    pixel
        .0
        .iter()
        .zip(target.0.iter())
        .all(|(a, b)| a.abs_diff(*b) <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_applies_per_channel() {
        let target = Rgb([14, 24, 52]);
        assert!(matches_within(Rgb([20, 30, 45]), target, 10));
        assert!(matches_within(Rgb([4, 34, 62]), target, 10));
        assert!(!matches_within(Rgb([14, 24, 63]), target, 10));
        assert!(!matches_exact(Rgb([14, 24, 53]), target));
        assert!(matches_exact(Rgb([14, 24, 52]), target));
    }

    #[test]
    fn empty_region_is_rejected() {
        assert!(ScreenRegion::new(10, 10, 10, 20).is_err());
        assert!(ScreenRegion::new(10, 20, 11, 5).is_err());
        let strip = ScreenRegion::new(1583, 47, 1584, 300).unwrap();
        assert_eq!(strip.width(), 1);
        assert_eq!(strip.height(), 253);
    }

    #[test]
    fn largest_coordinate_is_a_config_error() {
        let err = ScreenRegion::point(ScreenPoint::new(u32::MAX, 0)).unwrap_err();
        assert!(matches!(err, HudError::Config(_)));
        let err = ScreenRegion::inclusive(10, 10, 10, u32::MAX).unwrap_err();
        assert!(matches!(err, HudError::Config(_)));
    }

    #[test]
    fn union_covers_both_regions() {
        let strip = ScreenRegion::inclusive(1583, 47, 1583, 299).unwrap();
        let corner = ScreenRegion::point(ScreenPoint::new(1599, 23)).unwrap();
        let both = strip.union(&corner);
        assert_eq!(both, ScreenRegion::new(1583, 23, 1600, 300).unwrap());
        assert!(both.contains(ScreenPoint::new(1599, 23)));
        assert!(both.contains(ScreenPoint::new(1583, 299)));
        assert!(!both.contains(ScreenPoint::new(1600, 23)));
    }
}
