//! Target paths, handles, and the resolver/sink collaborator traits.
//!
//! The engine never owns scene objects. A persisted `TargetPath` is turned
//! into an opaque `TargetHandle` by a `TargetResolver` injected at document
//! load time, and evaluated leaves push their output through a `TargetSink`.
//! Both traits are trivially mockable in tests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClipError;
use crate::keyframed::Channel;
use crate::value::Value;

/// Opaque target handle (small string key).
pub type TargetHandle = String;

/// Persisted reference to a scene object: a named root plus a chain of
/// child indices descending from it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetPath {
    pub root: String,
    #[serde(default)]
    pub children: Vec<u32>,
}

impl TargetPath {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, index: u32) -> Self {
        self.children.push(index);
        self
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for c in &self.children {
            write!(f, "/{c}")?;
        }
        Ok(())
    }
}

/// Resolves persisted target paths to live handles. Passed into
/// deserialization instead of consulting any process-wide registry.
pub trait TargetResolver {
    fn resolve(&mut self, path: &TargetPath) -> Result<TargetHandle, ClipError>;
}

/// Receives the output of evaluated leaves. The host applies the value to
/// whatever object the handle denotes.
pub trait TargetSink {
    fn apply(&mut self, target: &TargetHandle, channel: Channel, value: Value);
}
