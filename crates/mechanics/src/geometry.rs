//! Rim-and-block geometry
//!
//! A point fixed on a rim of radius R, centred at the origin, is joined by a
//! rigid rod of length L to a block that slides along the horizontal axis:
//! - rim point: (R·cos α, R·sin α)
//! - block:     (sqrt(L² − rim_y²) + rim_x, 0)

use log::warn;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use simcore::NoiseSource;
use std::f64::consts::TAU;

/// Bring an angle back below one turn.
///
/// Only a single turn is removed, and only when `alpha` is strictly greater
/// than 2π. Angles of 4π and above stay at or above 2π, negative angles are
/// returned unchanged. The per-tick rotation is always far below one turn, so
/// a stored angle never needs more than one correction.
pub fn wrap_angle(alpha: f64) -> f64 {
    if alpha > TAU {
        alpha - TAU
    } else {
        alpha
    }
}

/// Positions of the rim contact point and the block for one angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkagePose {
    /// Rim contact point, relative to the rim centre
    pub rim: Point2<f64>,
    /// Block position on the horizontal axis (y is always 0)
    pub block: Point2<f64>,
    /// Rod length used for this pose, including any noise
    pub rod_length: f64,
    /// Set when the rod cannot reach the axis and the block was clamped to 0
    pub degenerate: bool,
}

impl LinkagePose {
    pub fn block_x(&self) -> f64 {
        self.block.x
    }
}

/// Rim radius and nominal rod length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RimBlockGeometry {
    pub radius: f64,
    pub rod_length: f64,
}

impl RimBlockGeometry {
    pub fn new(radius: f64, rod_length: f64) -> Self {
        Self { radius, rod_length }
    }

    /// Horizontal distance from the rim centre to the block when the rim
    /// point is at the top of the rim: sqrt(L² − R²).
    pub fn rest_offset(&self) -> f64 {
        (self.rod_length * self.rod_length - self.radius * self.radius)
            .max(0.0)
            .sqrt()
    }

    /// Pose drawn before the first tick: rim point straight up, block at the
    /// rest offset.
    pub fn rest_pose(&self) -> LinkagePose {
        LinkagePose {
            rim: Point2::new(0.0, self.radius),
            block: Point2::new(self.rest_offset(), 0.0),
            rod_length: self.rod_length,
            degenerate: false,
        }
    }

    /// Noise-free solve at `alpha`
    pub fn solve_exact(&self, alpha: f64) -> LinkagePose {
        pose_at(self.radius, self.rod_length, wrap_angle(alpha))
    }

    /// Solve at `alpha` with the rod length perturbed by N(0, noise_std²).
    ///
    /// A fresh sample is drawn on every call when `noise_std > 0`; otherwise
    /// the nominal rod length is used and `noise` is not touched.
    pub fn solve(&self, alpha: f64, noise_std: f64, noise: &mut dyn NoiseSource) -> LinkagePose {
        let rod_length = if noise_std > 0.0 {
            self.rod_length + noise.gaussian(0.0, noise_std)
        } else {
            self.rod_length
        };
        pose_at(self.radius, rod_length, wrap_angle(alpha))
    }
}

fn pose_at(radius: f64, rod_length: f64, alpha: f64) -> LinkagePose {
    let rim = Point2::new(alpha.cos() * radius, alpha.sin() * radius);
    let mut block_x = (rod_length * rod_length - rim.y * rim.y).sqrt() + rim.x;

    let degenerate = block_x.is_nan();
    if degenerate {
        warn!(
            "rod of length {rod_length:.6} cannot reach the axis from rim height {:.6}; \
             block clamped to 0",
            rim.y
        );
        block_x = 0.0;
    }

    LinkagePose {
        rim,
        block: Point2::new(block_x, 0.0),
        rod_length,
        degenerate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    /// Returns a fixed offset regardless of the requested spread
    struct FixedOffset(f64);

    impl NoiseSource for FixedOffset {
        fn gaussian(&mut self, mean: f64, _std_dev: f64) -> f64 {
            mean + self.0
        }
    }

    #[test]
    fn test_wrap_angle_single_subtraction() {
        assert_eq!(wrap_angle(1.0), 1.0);
        assert_eq!(wrap_angle(-1.0), -1.0);
        assert_abs_diff_eq!(wrap_angle(TAU + 0.5), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(3.0 * PI), PI, epsilon = 1e-12);

        // Exactly one turn is not "greater than" one turn
        assert_eq!(wrap_angle(TAU), TAU);

        // Two or more turns are only reduced by one
        let wrapped = wrap_angle(2.0 * TAU + 0.25);
        assert_abs_diff_eq!(wrapped, TAU + 0.25, epsilon = 1e-12);
        assert!(wrapped >= TAU);
    }

    #[test]
    fn test_closed_form_block_position() {
        let geometry = RimBlockGeometry::new(80.0, 300.0);
        for i in 0..64 {
            let alpha = i as f64 * TAU / 64.0;
            let pose = geometry.solve_exact(alpha);
            let rim_y = 80.0 * alpha.sin();
            let expected = (300.0_f64.powi(2) - rim_y * rim_y).sqrt() + 80.0 * alpha.cos();
            assert_abs_diff_eq!(pose.block_x(), expected, epsilon = 1e-9);
            assert_eq!(pose.block.y, 0.0);
            assert!(!pose.degenerate);
        }
    }

    #[test]
    fn test_rim_point_on_circle() {
        let geometry = RimBlockGeometry::new(50.0, 120.0);
        let pose = geometry.solve_exact(0.3);
        assert_abs_diff_eq!(pose.rim.coords.norm(), 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pose.rim.x, 50.0 * 0.3_f64.cos(), epsilon = 1e-12);
        assert_abs_diff_eq!(pose.rim.y, 50.0 * 0.3_f64.sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_zero_noise_is_deterministic() {
        let geometry = RimBlockGeometry::new(80.0, 300.0);
        let mut noise = FixedOffset(1000.0);
        let a = geometry.solve(1.2, 0.0, &mut noise);
        let b = geometry.solve(1.2, 0.0, &mut noise);
        assert_eq!(a, b);
        assert_eq!(a.rod_length, 300.0);
    }

    #[test]
    fn test_noise_perturbs_rod_length() {
        let geometry = RimBlockGeometry::new(80.0, 300.0);
        let mut noise = FixedOffset(2.5);
        let pose = geometry.solve(FRAC_PI_2, 0.05, &mut noise);
        assert_abs_diff_eq!(pose.rod_length, 302.5, epsilon = 1e-12);

        let expected = (302.5_f64.powi(2) - 80.0_f64.powi(2)).sqrt() + 80.0 * FRAC_PI_2.cos();
        assert_abs_diff_eq!(pose.block_x(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_unreachable_axis_clamps_block_to_zero() {
        // Rod shorter than the rim height at the top of the rim
        let geometry = RimBlockGeometry::new(80.0, 60.0);
        let pose = geometry.solve_exact(FRAC_PI_2);
        assert!(pose.degenerate);
        assert_eq!(pose.block_x(), 0.0);
    }

    #[test]
    fn test_tangent_rod_is_not_degenerate() {
        let geometry = RimBlockGeometry::new(80.0, 80.0);
        let pose = geometry.solve_exact(FRAC_PI_2);
        assert!(!pose.degenerate);
        assert_abs_diff_eq!(pose.block_x(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rest_pose() {
        let geometry = RimBlockGeometry::new(80.0, 300.0);
        let rest = geometry.rest_pose();
        assert_abs_diff_eq!(rest.block_x(), (300.0_f64.powi(2) - 6400.0).sqrt(), epsilon = 1e-12);
        assert_eq!(rest.rim, Point2::new(0.0, 80.0));

        assert_eq!(RimBlockGeometry::new(80.0, 80.0).rest_offset(), 0.0);
    }
}
