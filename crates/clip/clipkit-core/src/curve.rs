//! One-dimensional easing curve over [0,1].
//!
//! A `Curve` is a cubic bezier anchored at (0,0) and (1,1) with two free
//! control points `(x1, y1)` / `(x2, y2)`. Evaluating inverts the x-bezier
//! by bisection, then evaluates the y-bezier at the found parameter. The
//! result re-weights a linear interpolation between two keyframes.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Curve {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Default for Curve {
    fn default() -> Self {
        Self::linear()
    }
}

impl Curve {
    /// X control coordinates are clamped into [0,1] so the x-bezier stays
    /// monotonic and invertible. Y is unrestricted (overshoot is allowed).
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.clamp(0.0, 1.0),
            y1,
            x2: x2.clamp(0.0, 1.0),
            y2,
        }
    }

    /// Identity curve: evaluate(t) == t.
    #[inline]
    pub fn linear() -> Self {
        Self {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        }
    }

    /// Standard ease-in-out shape.
    #[inline]
    pub fn ease_in_out() -> Self {
        Self::new(0.42, 0.0, 0.58, 1.0)
    }

    /// Evaluate the easing weight at `t` in [0,1].
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        // Fast path: Bezier(0,0,1,1) is exactly linear.
        if self.x1 == 0.0 && self.y1 == 0.0 && self.x2 == 1.0 && self.y2 == 1.0 {
            return t;
        }
        let mut lo = 0.0f32;
        let mut hi = 1.0f32;
        let mut mid = t;
        for _ in 0..24 {
            let x = cubic_bezier(0.0, self.x1, self.x2, 1.0, mid);
            if (x - t).abs() < 1e-6 {
                break;
            }
            if x < t {
                lo = mid;
            } else {
                hi = mid;
            }
            mid = 0.5 * (lo + hi);
        }
        cubic_bezier(0.0, self.y1, self.y2, 1.0, mid)
    }
}

#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_is_identity() {
        let c = Curve::linear();
        for i in 0..=10 {
            let t = i as f32 / 10.0;
            assert!((c.evaluate(t) - t).abs() < 1e-6);
        }
    }

    #[test]
    fn endpoints_are_pinned() {
        let c = Curve::ease_in_out();
        assert!(c.evaluate(0.0).abs() < 1e-4);
        assert!((c.evaluate(1.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn ease_in_out_is_symmetric_at_half() {
        let c = Curve::ease_in_out();
        assert!((c.evaluate(0.5) - 0.5).abs() < 1e-3);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let c = Curve::ease_in_out();
        assert_eq!(c.evaluate(-1.0), c.evaluate(0.0));
        assert_eq!(c.evaluate(2.0), c.evaluate(1.0));
    }
}
