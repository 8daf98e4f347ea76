//! Top-level authoring context: templates, the root layer stack, and the
//! frame window the host's scheduling loop drives it with.

use crate::binding::{TargetResolver, TargetSink};
use crate::document::ClipDocument;
use crate::error::ClipError;
use crate::layers::LayerClip;
use crate::templates::TemplateSet;

/// One animation manager. The host owns the per-frame loop and calls
/// [`ClipManager::animate_frame`] once per tick; everything else here is
/// authoring surface.
#[derive(Clone, Debug)]
pub struct ClipManager {
    pub id: String,
    pub templates: TemplateSet,
    pub root: LayerClip,
    /// First frame (in host frames) at which this manager plays.
    pub start_frame: u32,
    /// Playback length in host frames; 0 disables playback.
    pub duration_frames: u32,
}

impl ClipManager {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            templates: TemplateSet::new(),
            root: LayerClip::new("root"),
            start_frame: 0,
            duration_frames: 0,
        }
    }

    /// Map a host frame into normalized time and evaluate the root stack.
    /// Frames outside the window are a no-op (the tree holds its state).
    pub fn animate_frame(&mut self, frame: u32, sink: &mut dyn TargetSink) -> Result<(), ClipError> {
        if self.duration_frames == 0 {
            return Ok(());
        }
        if frame < self.start_frame || self.start_frame + self.duration_frames < frame {
            return Ok(());
        }
        let t = (frame - self.start_frame) as f32 / self.duration_frames as f32;
        self.root.animate(t, sink)
    }

    /// Authoring: clone a template and append it to the given layer with
    /// zero initial duration.
    pub fn place_template(&mut self, name: &str, layer: usize) -> Result<(), ClipError> {
        let instance = self
            .templates
            .instantiate(name)
            .ok_or_else(|| ClipError::invalid_state(format!("no template named '{name}'")))?;
        let layers = self.root.layers_mut();
        let layer_clip = layers.get_mut(layer).ok_or_else(|| {
            ClipError::invalid_state(format!("layer index {layer} out of range"))
        })?;
        layer_clip.append(instance);
        Ok(())
    }

    /// Snapshot the manager into a persistable document.
    pub fn to_document(&self) -> ClipDocument {
        ClipDocument {
            templates: self.templates.iter().cloned().collect(),
            root: self.root.clone(),
            start_frame: self.start_frame,
            duration_frames: self.duration_frames,
        }
    }

    pub fn save_json(&self) -> String {
        self.to_document().to_json_string()
    }

    /// Rebuild a manager from a persisted document, resolving leaf targets
    /// through the injected resolver.
    pub fn from_document(id: impl Into<String>, doc: ClipDocument) -> Self {
        let mut templates = TemplateSet::new();
        for t in doc.templates {
            templates.insert(t);
        }
        Self {
            id: id.into(),
            templates,
            root: doc.root,
            start_frame: doc.start_frame,
            duration_frames: doc.duration_frames,
        }
    }

    pub fn load_json(
        id: impl Into<String>,
        json: &str,
        resolver: &mut dyn TargetResolver,
    ) -> Result<Self, ClipError> {
        let doc = ClipDocument::from_json_str(json, resolver)?;
        Ok(Self::from_document(id, doc))
    }
}
