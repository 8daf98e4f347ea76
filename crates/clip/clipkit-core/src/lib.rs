//! clipkit-core: parametric clip authoring and playback (host-agnostic).
//!
//! Named, nested animation clips driven by a normalized time in [0,1].
//! Leaves interpolate keyframed component vectors; timelines sequence
//! children with boundary-snap playback; layer stacks run timelines in
//! parallel. Trees round-trip through a tagged JSON document, and leaf
//! targets resolve through an injected [`TargetResolver`] rather than any
//! process-wide registry.
//!
//! Evaluation is single-threaded and synchronous: confine a tree to one
//! thread or serialize all `animate`/authoring calls on it.

pub mod binding;
pub mod curve;
pub mod document;
pub mod error;
pub mod interp;
pub mod keyframe;
pub mod keyframed;
pub mod layers;
pub mod manager;
pub mod node;
pub mod templates;
pub mod timeline;
pub mod value;

// Re-exports for consumers (hosts, tests)
pub use binding::{TargetHandle, TargetPath, TargetResolver, TargetSink};
pub use curve::Curve;
pub use document::{deserialize_node, serialize_node, ClipDocument};
pub use error::ClipError;
pub use keyframe::KeyFrame;
pub use keyframed::{Channel, KeyframedClip};
pub use layers::LayerClip;
pub use manager::ClipManager;
pub use node::{ClipNode, KEYFRAMED_TAG, LAYERS_TAG, TIMELINE_TAG};
pub use templates::TemplateSet;
pub use timeline::{TimelineClip, TimelineSlot};
pub use value::{Value, ValueKind};
