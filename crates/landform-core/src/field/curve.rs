//! Response curves for terraced quantization.
//!
//! A curve is a monotonic 0..1 → 0..1 mapping given as piecewise-linear
//! control points, the portable stand-in for an engine curve asset.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseCurve {
    /// (input, output) control points, ascending in input.
    points: Vec<(f32, f32)>,
}

impl ResponseCurve {
    /// The identity mapping.
    pub fn linear() -> Self {
        Self {
            points: vec![(0.0, 0.0), (1.0, 1.0)],
        }
    }

    /// Build a curve from control points. Points are clamped into the
    /// unit square and sorted by input; fewer than two points degrade to
    /// the identity mapping.
    pub fn from_points(points: Vec<(f32, f32)>) -> Self {
        if points.len() < 2 {
            return Self::linear();
        }
        let mut points: Vec<(f32, f32)> = points
            .into_iter()
            .map(|(x, y)| (x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)))
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { points }
    }

    /// Evaluate the curve at `t` (clamped to [0, 1]).
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let first = self.points[0];
        if t <= first.0 {
            return first.1;
        }
        for pair in self.points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if t <= x1 {
                let span = x1 - x0;
                if span <= f32::EPSILON {
                    return y1;
                }
                let f = (t - x0) / span;
                return y0 + (y1 - y0) * f;
            }
        }
        self.points[self.points.len() - 1].1
    }
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self::linear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_curve_is_identity() {
        let curve = ResponseCurve::linear();
        for t in [0.0, 0.25, 0.5, 1.0] {
            assert!((curve.evaluate(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn step_like_curve_interpolates_between_points() {
        let curve = ResponseCurve::from_points(vec![(0.0, 0.0), (0.5, 0.1), (1.0, 1.0)]);
        assert!((curve.evaluate(0.25) - 0.05).abs() < 1e-6);
        assert!((curve.evaluate(0.75) - 0.55).abs() < 1e-6);
    }

    #[test]
    fn inputs_outside_unit_range_clamp() {
        let curve = ResponseCurve::linear();
        assert_eq!(curve.evaluate(-2.0), 0.0);
        assert_eq!(curve.evaluate(3.0), 1.0);
    }
}
