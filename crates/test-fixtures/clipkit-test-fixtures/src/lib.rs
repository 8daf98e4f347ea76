//! Shared JSON clip documents for integration tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    documents: HashMap<String, String>,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = fixtures_root().join(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

/// Names of all clip documents in the manifest.
pub fn document_names() -> Vec<String> {
    let mut names: Vec<String> = MANIFEST.documents.keys().cloned().collect();
    names.sort();
    names
}

/// Raw JSON text of a named clip document.
pub fn document_json(name: &str) -> Result<String> {
    let rel = MANIFEST
        .documents
        .get(name)
        .ok_or_else(|| anyhow!("no fixture document named '{name}'"))?;
    read_to_string(rel)
}

/// Parsed JSON value of a named clip document.
pub fn document_value(name: &str) -> Result<serde_json::Value> {
    let raw = document_json(name)?;
    serde_json::from_str(&raw).with_context(|| format!("fixture '{name}' is not valid JSON"))
}
