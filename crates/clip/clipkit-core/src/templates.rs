//! Named standalone clip templates.
//!
//! Templates own their data; a timeline never references a template, it
//! receives an independent clone. Mutating a placed instance therefore
//! never affects the template it came from.

use crate::node::ClipNode;

#[derive(Clone, Debug, Default)]
pub struct TemplateSet {
    templates: Vec<ClipNode>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: ClipNode) {
        self.templates.push(node);
    }

    /// First template with the given name. Names are not required to be
    /// unique; lookups return the earliest match.
    pub fn get(&self, name: &str) -> Option<&ClipNode> {
        self.templates.iter().find(|n| n.name() == name)
    }

    /// Deep-copy a template for placement. The clone carries no playback
    /// state.
    pub fn instantiate(&self, name: &str) -> Option<ClipNode> {
        let mut clone = self.get(name)?.clone();
        clone.reset_cursors();
        Some(clone)
    }

    /// Remove the first template with the given name.
    pub fn remove(&mut self, name: &str) -> Option<ClipNode> {
        let idx = self.templates.iter().position(|n| n.name() == name)?;
        Some(self.templates.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClipNode> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
