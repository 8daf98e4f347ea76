//! A single keyframe: normalized time stamp, easing curve, payload vector.

use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::value::Value;

/// Ordered by `stamp`; the ordering invariant (sorted, endpoints pinned to
/// 0 and 1) is enforced by the owning leaf, not here.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct KeyFrame {
    /// Normalized time in [0,1] within the owning clip.
    pub stamp: f32,
    /// Easing shape applied to the segment starting at this keyframe.
    #[serde(default)]
    pub curve: Curve,
    pub value: Value,
}

impl KeyFrame {
    pub fn new(stamp: f32, value: Value) -> Self {
        Self {
            stamp: stamp.clamp(0.0, 1.0),
            curve: Curve::linear(),
            value,
        }
    }

    pub fn with_curve(stamp: f32, value: Value, curve: Curve) -> Self {
        Self {
            stamp: stamp.clamp(0.0, 1.0),
            curve,
            value,
        }
    }

    #[inline]
    pub fn set_stamp(&mut self, stamp: f32) {
        self.stamp = stamp.clamp(0.0, 1.0);
    }
}
