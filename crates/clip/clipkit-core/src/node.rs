//! The polymorphic animation node: a closed sum over the three concrete
//! clip kinds. New kinds extend this enum and the two dispatch tables in
//! `document.rs` (parse, emit); there is no open-ended subclassing.

use crate::binding::TargetSink;
use crate::error::ClipError;
use crate::keyframed::KeyframedClip;
use crate::layers::LayerClip;
use crate::timeline::TimelineClip;

/// Stable type tags used both at construction and in persisted records.
pub const KEYFRAMED_TAG: &str = "KeyframedClip";
pub const TIMELINE_TAG: &str = "TimelineClip";
pub const LAYERS_TAG: &str = "LayerClip";

/// Animation tree node. `Clone` produces a fully independent deep copy:
/// ownership is strictly tree-shaped, so the derived recursive copy shares
/// no keyframe, slot, or layer data with the original.
#[derive(Clone, Debug)]
pub enum ClipNode {
    Keyframed(KeyframedClip),
    Timeline(TimelineClip),
    Layers(LayerClip),
}

impl ClipNode {
    pub fn type_tag(&self) -> &'static str {
        match self {
            ClipNode::Keyframed(_) => KEYFRAMED_TAG,
            ClipNode::Timeline(_) => TIMELINE_TAG,
            ClipNode::Layers(_) => LAYERS_TAG,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ClipNode::Keyframed(c) => &c.name,
            ClipNode::Timeline(c) => &c.name,
            ClipNode::Layers(c) => &c.name,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            ClipNode::Keyframed(c) => c.name = name,
            ClipNode::Timeline(c) => c.name = name,
            ClipNode::Layers(c) => c.name = name,
        }
    }

    /// Evaluate the node at normalized time `t`.
    pub fn animate(&mut self, t: f32, sink: &mut dyn TargetSink) -> Result<(), ClipError> {
        match self {
            ClipNode::Keyframed(c) => c.animate(t, sink),
            ClipNode::Timeline(c) => c.animate(t, sink),
            ClipNode::Layers(c) => c.animate(t, sink),
        }
    }

    /// Drop playback state (timeline cursors, start snapshots) in this
    /// node and every descendant.
    pub fn reset_cursors(&mut self) {
        match self {
            ClipNode::Keyframed(c) => c.reset(),
            ClipNode::Timeline(c) => c.reset_cursor(),
            ClipNode::Layers(c) => c.reset_cursors(),
        }
    }
}

impl From<KeyframedClip> for ClipNode {
    fn from(clip: KeyframedClip) -> Self {
        ClipNode::Keyframed(clip)
    }
}

impl From<TimelineClip> for ClipNode {
    fn from(clip: TimelineClip) -> Self {
        ClipNode::Timeline(clip)
    }
}

impl From<LayerClip> for ClipNode {
    fn from(clip: LayerClip) -> Self {
        ClipNode::Layers(clip)
    }
}
