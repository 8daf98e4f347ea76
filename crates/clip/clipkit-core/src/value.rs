//! Leaf payload values.
//!
//! A leaf clip drives one transform channel, so the payload is either a
//! 3-component vector (position, scale) or a quaternion (rotation).

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValueKind {
    Vec3,
    Quat,
}

/// Component vector carried by a keyframe. Serialized as a bare array;
/// the arity (3 vs 4) disambiguates the variant.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Vec3([f32; 3]),
    /// Quaternion (x, y, z, w)
    Quat([f32; 4]),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Quat(_) => ValueKind::Quat,
        }
    }

    /// Neutral value for a payload kind: zero vector or identity rotation.
    #[inline]
    pub fn neutral(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Vec3 => Value::Vec3([0.0; 3]),
            ValueKind::Quat => Value::Quat([0.0, 0.0, 0.0, 1.0]),
        }
    }

    #[inline]
    pub fn components(&self) -> &[f32] {
        match self {
            Value::Vec3(v) => v,
            Value::Quat(q) => q,
        }
    }
}
