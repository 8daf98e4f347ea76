//! Keyframed leaf clip: an ordered run of keyframes evaluated into one
//! interpolated payload per call and applied to a resolved target.

use serde::{Deserialize, Serialize};

use crate::binding::{TargetHandle, TargetPath, TargetSink};
use crate::error::ClipError;
use crate::interp::lerp_value;
use crate::keyframe::KeyFrame;
use crate::value::{Value, ValueKind};

/// Which transform channel this leaf drives. Position and scale carry
/// 3-component payloads; rotation carries a quaternion.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum Channel {
    Position,
    Rotation,
    Scale,
}

impl Channel {
    #[inline]
    pub fn value_kind(self) -> ValueKind {
        match self {
            Channel::Position | Channel::Scale => ValueKind::Vec3,
            Channel::Rotation => ValueKind::Quat,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Position => "Position",
            Channel::Rotation => "Rotation",
            Channel::Scale => "Scale",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Position" => Some(Channel::Position),
            "Rotation" => Some(Channel::Rotation),
            "Scale" => Some(Channel::Scale),
            _ => None,
        }
    }
}

/// Leaf animation node.
///
/// Invariant (restored by [`KeyframedClip::order_keyframes`] after any
/// stamp edit): keyframes sorted ascending by stamp, first stamp exactly 0,
/// last stamp exactly 1. Evaluation requires at least two keyframes.
#[derive(Clone, Debug)]
pub struct KeyframedClip {
    pub name: String,
    /// Authoring-only display flag; evaluation ignores it.
    pub visible: bool,
    pub channel: Channel,
    /// When false, the host may overwrite the first keyframe with the
    /// target's live value via [`KeyframedClip::snapshot_start`], so the
    /// clip departs from wherever the target currently is.
    pub absolute_start: bool,
    /// Persisted reference used to (re)resolve the target.
    pub target_path: Option<TargetPath>,
    /// Resolved handle, if resolution succeeded at load time.
    pub target: Option<TargetHandle>,
    keyframes: Vec<KeyFrame>,
    start_snapped: bool,
    warned_unresolved: bool,
}

impl KeyframedClip {
    /// New leaf with the default pair of keyframes at t=0 and t=1 holding
    /// the channel's neutral value.
    pub fn new(name: impl Into<String>, channel: Channel) -> Self {
        let neutral = Value::neutral(channel.value_kind());
        Self {
            name: name.into(),
            visible: false,
            channel,
            absolute_start: false,
            target_path: None,
            target: None,
            keyframes: vec![KeyFrame::new(0.0, neutral), KeyFrame::new(1.0, neutral)],
            start_snapped: false,
            warned_unresolved: false,
        }
    }

    /// Build a leaf from explicit keyframes (deserialization, tests). The
    /// caller provides keyframes already sorted; endpoints are pinned here.
    pub fn from_keyframes(
        name: impl Into<String>,
        channel: Channel,
        keyframes: Vec<KeyFrame>,
    ) -> Self {
        let mut clip = Self {
            name: name.into(),
            visible: false,
            channel,
            absolute_start: false,
            target_path: None,
            target: None,
            keyframes,
            start_snapped: false,
            warned_unresolved: false,
        };
        clip.order_keyframes();
        clip
    }

    #[inline]
    pub fn keyframes(&self) -> &[KeyFrame] {
        &self.keyframes
    }

    /// Restore the ordering invariant: sort by stamp, pin the first stamp
    /// to 0 and the last to 1. Must run after any stamp edit.
    pub fn order_keyframes(&mut self) {
        self.keyframes
            .sort_by(|a, b| a.stamp.partial_cmp(&b.stamp).unwrap_or(std::cmp::Ordering::Equal));
        if let Some(first) = self.keyframes.first_mut() {
            first.set_stamp(0.0);
        }
        if self.keyframes.len() > 1 {
            if let Some(last) = self.keyframes.last_mut() {
                last.set_stamp(1.0);
            }
        }
    }

    /// Authoring: insert a keyframe and restore ordering.
    pub fn add_keyframe(&mut self, keyframe: KeyFrame) {
        self.keyframes.push(keyframe);
        self.order_keyframes();
    }

    /// Authoring: remove the keyframe at `index`. Removing below two
    /// keyframes is allowed but leaves the clip unevaluatable until a
    /// keyframe is added back.
    pub fn remove_keyframe(&mut self, index: usize) -> Result<KeyFrame, ClipError> {
        if index >= self.keyframes.len() {
            return Err(ClipError::invalid_state(format!(
                "keyframe index {index} out of range (len {})",
                self.keyframes.len()
            )));
        }
        let removed = self.keyframes.remove(index);
        self.order_keyframes();
        Ok(removed)
    }

    /// Authoring: move a keyframe in time and restore ordering.
    pub fn set_stamp(&mut self, index: usize, stamp: f32) -> Result<(), ClipError> {
        match self.keyframes.get_mut(index) {
            Some(kf) => {
                kf.set_stamp(stamp);
                self.order_keyframes();
                Ok(())
            }
            None => Err(ClipError::invalid_state(format!(
                "keyframe index {index} out of range (len {})",
                self.keyframes.len()
            ))),
        }
    }

    /// Authoring: replace the payload of the keyframe at `index`.
    pub fn set_value(&mut self, index: usize, value: Value) -> Result<(), ClipError> {
        match self.keyframes.get_mut(index) {
            Some(kf) => {
                kf.value = value;
                Ok(())
            }
            None => Err(ClipError::invalid_state(format!(
                "keyframe index {index} out of range (len {})",
                self.keyframes.len()
            ))),
        }
    }

    /// Host hook: overwrite the first keyframe with the target's live
    /// value. Applied once per playback unless the clip is marked
    /// `absolute_start`. Reading the live value is the host's job.
    pub fn snapshot_start(&mut self, value: Value) {
        if self.absolute_start || self.start_snapped {
            return;
        }
        if let Some(first) = self.keyframes.first_mut() {
            first.value = value;
            self.start_snapped = true;
        }
    }

    /// Binary search for the bracketing segment: returns `i` such that
    /// `keyframes[i].stamp <= t <= keyframes[i+1].stamp`. Queries below the
    /// first stamp return 0, at or above the last return `len - 2`, and an
    /// exact match on an interior stamp returns that index.
    fn find_segment(&self, t: f32) -> usize {
        let kf = &self.keyframes;
        let mut min = 0;
        let mut max = kf.len() - 1;

        if t <= kf[min].stamp {
            return min;
        }
        if kf[max].stamp <= t {
            return max - 1;
        }

        while max - min > 1 {
            let mid = min + (max - min) / 2;
            if t == kf[mid].stamp {
                return mid;
            } else if t < kf[mid].stamp {
                max = mid;
            } else {
                min = mid;
            }
        }
        min
    }

    /// Evaluate the clip at normalized time `t` without applying it.
    pub fn sample(&self, t: f32) -> Result<Value, ClipError> {
        if self.keyframes.len() < 2 {
            return Err(ClipError::invalid_state(format!(
                "keyframed clip '{}' needs at least 2 keyframes (has {})",
                self.name,
                self.keyframes.len()
            )));
        }
        let t = t.clamp(0.0, 1.0);
        let i = self.find_segment(t);
        let a = &self.keyframes[i];
        let b = &self.keyframes[i + 1];
        let span = (b.stamp - a.stamp).max(f32::EPSILON);
        let local = ((t - a.stamp) / span).clamp(0.0, 1.0);
        let weight = a.curve.evaluate(local);
        Ok(lerp_value(a.value, b.value, weight))
    }

    /// Evaluate at `t` and apply the result to the resolved target. With no
    /// resolved target the output is skipped and a warning is logged once.
    pub fn animate(&mut self, t: f32, sink: &mut dyn TargetSink) -> Result<(), ClipError> {
        let value = self.sample(t)?;
        match &self.target {
            Some(handle) => sink.apply(handle, self.channel, value),
            None => {
                if !self.warned_unresolved {
                    log::warn!(
                        "keyframed clip '{}' has no resolved target; skipping apply",
                        self.name
                    );
                    self.warned_unresolved = true;
                }
            }
        }
        Ok(())
    }

    /// Forget runtime playback state (start snapshot latch).
    pub fn reset(&mut self) {
        self.start_snapped = false;
    }
}
