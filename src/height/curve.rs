//! Piecewise-linear mapping from a HUD pixel row to an altitude in meters.
//!
//! The first segment is closed on both ends, every later segment is open at
//! its top row, so each row in range belongs to exactly one segment. Rows
//! outside the calibrated range have no value; the curve never extrapolates.
use crate::config::CalibrationPoint;
use crate::errors::{HudError, HudResult};

#[derive(Debug, Clone)]
pub struct HeightCurve {
    points: Vec<CalibrationPoint>,
}

impl HeightCurve {
    pub fn new(points: Vec<CalibrationPoint>) -> HudResult<Self> {
        if points.len() < 2 {
            return Err(HudError::Config(format!(
                "height curve needs at least 2 calibration points, got {}",
                points.len()
            )));
        }
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if b.row <= a.row {
                return Err(HudError::Config(format!(
                    "calibration rows must increase: {} then {}",
                    a.row, b.row
                )));
            }
            if b.meters > a.meters {
                return Err(HudError::Config(format!(
                    "calibration meters must not increase downwards: row {} = {}m, row {} = {}m",
                    a.row, a.meters, b.row, b.meters
                )));
            }
        }
        Ok(Self { points })
    }

    pub fn first_row(&self) -> u32 {
        self.points[0].row
    }

    pub fn last_row(&self) -> u32 {
        self.points[self.points.len() - 1].row
    }

    pub fn interpolate(&self, row: u32) -> Option<f64> {
        if row < self.first_row() || row > self.last_row() {
            return None;
        }
        let segment = self
            .points
            .windows(2)
            .find(|pair| row <= pair[1].row)?;
        let (a, b) = (segment[0], segment[1]);
        let offset = f64::from(row - a.row);
        let span = f64::from(b.row - a.row);
        Some(a.meters + offset * (b.meters - a.meters) / span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeightConfig;

    fn default_curve() -> HeightCurve {
        HeightCurve::new(HeightConfig::default().calibration_points).unwrap()
    }

    #[test]
    fn endpoints_hit_calibration_values() {
        let curve = default_curve();
        assert_eq!(curve.interpolate(47), Some(750.0));
        assert_eq!(curve.interpolate(173), Some(325.0));
        assert_eq!(curve.interpolate(299), Some(0.0));
    }

    #[test]
    fn segments_meet_at_the_shared_row() {
        let curve = default_curve();
        let upper = 750.0 + (173.0 - 47.0) * (325.0 - 750.0) / (173.0 - 47.0);
        let lower = 325.0 + (173.0 - 173.0) * (0.0 - 325.0) / (299.0 - 173.0);
        assert_eq!(upper, lower);
        assert_eq!(curve.interpolate(173), Some(upper));
    }

    #[test]
    fn height_never_rises_as_row_descends() {
        let curve = default_curve();
        let mut prev = f64::INFINITY;
        for row in 47..=299 {
            let meters = curve.interpolate(row).unwrap();
            assert!(meters <= prev, "row {row}: {meters} > {prev}");
            prev = meters;
        }
    }

    #[test]
    fn midpoints_are_linear() {
        let curve = default_curve();
        assert_eq!(curve.interpolate(110), Some(537.5));
        assert_eq!(curve.interpolate(236), Some(162.5));
    }

    #[test]
    fn rows_outside_range_have_no_value() {
        let curve = default_curve();
        assert_eq!(curve.interpolate(0), None);
        assert_eq!(curve.interpolate(46), None);
        assert_eq!(curve.interpolate(300), None);
        assert_eq!(curve.interpolate(u32::MAX), None);
    }

    #[test]
    fn invalid_curves_are_rejected() {
        let p = |row, meters| CalibrationPoint { row, meters };
        assert!(HeightCurve::new(vec![p(47, 750.0)]).is_err());
        assert!(HeightCurve::new(vec![p(173, 325.0), p(47, 750.0)]).is_err());
        assert!(HeightCurve::new(vec![p(47, 750.0), p(47, 325.0)]).is_err());
        assert!(HeightCurve::new(vec![p(47, 0.0), p(299, 750.0)]).is_err());
        assert!(HeightCurve::new(vec![p(47, 750.0), p(299, 0.0)]).is_ok());
    }
}
