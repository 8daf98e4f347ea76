//! Parallel composite: independent timeline layers sharing one normalized
//! duration.

use crate::binding::TargetSink;
use crate::error::ClipError;
use crate::timeline::TimelineClip;

/// Parallel composite animation node. Each layer is a [`TimelineClip`]
/// rescaled so every layer spans the same normalized duration, derived as
/// the maximum layer total.
#[derive(Clone, Debug, Default)]
pub struct LayerClip {
    pub name: String,
    /// Authoring-only display flag; evaluation ignores it.
    pub visible: bool,
    layers: Vec<TimelineClip>,
}

impl LayerClip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: false,
            layers: Vec::new(),
        }
    }

    #[inline]
    pub fn layers(&self) -> &[TimelineClip] {
        &self.layers
    }

    #[inline]
    pub fn layers_mut(&mut self) -> &mut [TimelineClip] {
        &mut self.layers
    }

    /// Derived duration: the longest layer. Never persisted.
    pub fn duration(&self) -> f32 {
        self.layers
            .iter()
            .map(TimelineClip::total_duration)
            .fold(0.0, f32::max)
    }

    /// Authoring: append a new empty layer and return it for editing.
    pub fn add_layer(&mut self) -> &mut TimelineClip {
        self.layers.push(TimelineClip::default());
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    /// Append an already-built layer (construction, deserialization).
    pub fn push_layer(&mut self, layer: TimelineClip) {
        self.layers.push(layer);
    }

    /// Authoring: remove the layer at `index`.
    pub fn remove_layer(&mut self, index: usize) -> Result<TimelineClip, ClipError> {
        if index >= self.layers.len() {
            return Err(ClipError::invalid_state(format!(
                "layer index {index} out of range (len {}) in layer stack '{}'",
                self.layers.len(),
                self.name
            )));
        }
        Ok(self.layers.remove(index))
    }

    pub fn reset_cursors(&mut self) {
        for layer in &mut self.layers {
            layer.reset_cursor();
        }
    }

    /// Evaluate every layer at normalized `t`.
    ///
    /// Layers are evaluated in list order every call; when multiple layers
    /// write to the same target the later layer wins, deterministically.
    /// Zero-duration layers are skipped. A stack whose derived duration is
    /// 0 is a no-op. The rescaled layer time is capped at 1 so a large
    /// forward jump still drives shorter layers through their boundary
    /// snap to the terminal state.
    pub fn animate(&mut self, t: f32, sink: &mut dyn TargetSink) -> Result<(), ClipError> {
        let duration = self.duration();
        if duration <= 0.0 {
            return Ok(());
        }
        for layer in &mut self.layers {
            let layer_duration = layer.total_duration();
            if layer_duration <= 0.0 {
                continue;
            }
            layer.animate((t * duration / layer_duration).min(1.0), sink)?;
        }
        Ok(())
    }
}
