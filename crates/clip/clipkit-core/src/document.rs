//! Persisted tree representation: tagged records, one per node.
//!
//! `serialize_node` emits `{type, name, <variant fields>}` with owned
//! children serialized recursively; `deserialize_node` dispatches on the
//! `type` tag and rebuilds the tree, resolving leaf target paths through
//! the injected resolver. Loading is atomic: any malformed record fails the
//! whole load with a `ClipError::Deserialization` naming the node path.
//! Derived data (slot starts, total durations) is recomputed, not
//! persisted, and converges to the same values on round-trip.

use serde_json::{json, Map, Value as JsonValue};

use crate::binding::{TargetPath, TargetResolver};
use crate::curve::Curve;
use crate::error::ClipError;
use crate::keyframe::KeyFrame;
use crate::keyframed::{Channel, KeyframedClip};
use crate::layers::LayerClip;
use crate::node::{ClipNode, KEYFRAMED_TAG, LAYERS_TAG, TIMELINE_TAG};
use crate::timeline::TimelineClip;
use crate::value::{Value, ValueKind};

/// A whole persisted authoring context: standalone templates, the root
/// layer stack, and the frame window the host drives it with.
#[derive(Clone, Debug)]
pub struct ClipDocument {
    pub templates: Vec<ClipNode>,
    pub root: LayerClip,
    pub start_frame: u32,
    pub duration_frames: u32,
}

impl ClipDocument {
    pub fn to_json(&self) -> JsonValue {
        let templates: Vec<JsonValue> = self.templates.iter().map(serialize_node).collect();
        json!({
            "templates": templates,
            "root": emit_layers(&self.root),
            "startFrame": self.start_frame,
            "durationFrames": self.duration_frames,
        })
    }

    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    pub fn from_json(
        value: &JsonValue,
        resolver: &mut dyn TargetResolver,
    ) -> Result<Self, ClipError> {
        let map = as_object(value, "$")?;
        let mut templates = Vec::new();
        for (i, entry) in array_field(map, "templates", "$")?.iter().enumerate() {
            templates.push(parse_node(entry, resolver, &format!("templates[{i}]"))?);
        }
        let root_value = field(map, "root", "$")?;
        let root = match parse_node(root_value, resolver, "root")? {
            ClipNode::Layers(layers) => layers,
            other => {
                return Err(ClipError::at(
                    "root",
                    format!("expected a {LAYERS_TAG} record, found {}", other.type_tag()),
                ))
            }
        };
        Ok(Self {
            templates,
            root,
            start_frame: u32_field(map, "startFrame", "$")?,
            duration_frames: u32_field(map, "durationFrames", "$")?,
        })
    }

    pub fn from_json_str(s: &str, resolver: &mut dyn TargetResolver) -> Result<Self, ClipError> {
        let value: JsonValue =
            serde_json::from_str(s).map_err(|e| ClipError::at("$", format!("invalid JSON: {e}")))?;
        Self::from_json(&value, resolver)
    }
}

// ----- emission -----

/// Emit the persisted record for a node (children included recursively).
pub fn serialize_node(node: &ClipNode) -> JsonValue {
    match node {
        ClipNode::Keyframed(clip) => emit_keyframed(clip),
        ClipNode::Timeline(clip) => emit_timeline(clip),
        ClipNode::Layers(clip) => emit_layers(clip),
    }
}

fn emit_keyframed(clip: &KeyframedClip) -> JsonValue {
    let keyframes: Vec<JsonValue> = clip.keyframes().iter().map(emit_keyframe).collect();
    let target = match &clip.target_path {
        Some(path) => json!({ "root": path.root, "children": path.children }),
        None => JsonValue::Null,
    };
    json!({
        "type": KEYFRAMED_TAG,
        "name": clip.name,
        "channel": clip.channel.as_str(),
        "absoluteStart": clip.absolute_start,
        "target": target,
        "keyFrames": keyframes,
    })
}

fn emit_keyframe(kf: &KeyFrame) -> JsonValue {
    let value = match kf.value {
        Value::Vec3(v) => json!(v),
        Value::Quat(q) => json!(q),
    };
    json!({
        "stamp": kf.stamp,
        "curve": { "x1": kf.curve.x1, "y1": kf.curve.y1, "x2": kf.curve.x2, "y2": kf.curve.y2 },
        "value": value,
    })
}

fn emit_timeline(clip: &TimelineClip) -> JsonValue {
    let slots: Vec<JsonValue> = clip
        .slots()
        .iter()
        .map(|slot| {
            json!({
                "duration": slot.duration,
                "child": serialize_node(&slot.child),
            })
        })
        .collect();
    json!({
        "type": TIMELINE_TAG,
        "name": clip.name,
        "slots": slots,
    })
}

fn emit_layers(clip: &LayerClip) -> JsonValue {
    let layers: Vec<JsonValue> = clip
        .layers()
        .iter()
        .map(|layer| emit_timeline(layer))
        .collect();
    json!({
        "type": LAYERS_TAG,
        "name": clip.name,
        "layers": layers,
    })
}

// ----- parsing -----

/// Parse one persisted record into a node, dispatching on its type tag.
pub fn deserialize_node(
    value: &JsonValue,
    resolver: &mut dyn TargetResolver,
) -> Result<ClipNode, ClipError> {
    parse_node(value, resolver, "$")
}

fn parse_node(
    value: &JsonValue,
    resolver: &mut dyn TargetResolver,
    path: &str,
) -> Result<ClipNode, ClipError> {
    let map = as_object(value, path)?;
    let tag = str_field(map, "type", path)?;
    match tag {
        KEYFRAMED_TAG => Ok(ClipNode::Keyframed(parse_keyframed(map, resolver, path)?)),
        TIMELINE_TAG => Ok(ClipNode::Timeline(parse_timeline(map, resolver, path)?)),
        LAYERS_TAG => Ok(ClipNode::Layers(parse_layers(map, resolver, path)?)),
        other => Err(ClipError::at(path, format!("unknown type tag '{other}'"))),
    }
}

fn parse_keyframed(
    map: &Map<String, JsonValue>,
    resolver: &mut dyn TargetResolver,
    path: &str,
) -> Result<KeyframedClip, ClipError> {
    let name = str_field(map, "name", path)?;
    let channel_str = str_field(map, "channel", path)?;
    let channel = Channel::from_str(channel_str)
        .ok_or_else(|| ClipError::at(path, format!("unknown channel '{channel_str}'")))?;

    let raw_frames = array_field(map, "keyFrames", path)?;
    if raw_frames.len() < 2 {
        return Err(ClipError::at(
            &format!("{path}/keyFrames"),
            format!("a keyframed clip needs at least 2 keyframes (found {})", raw_frames.len()),
        ));
    }
    let mut keyframes = Vec::with_capacity(raw_frames.len());
    let mut last_stamp = f32::NEG_INFINITY;
    for (i, raw) in raw_frames.iter().enumerate() {
        let kf_path = format!("{path}/keyFrames[{i}]");
        let kf = parse_keyframe(raw, channel.value_kind(), &kf_path)?;
        if kf.stamp < last_stamp {
            return Err(ClipError::at(&kf_path, "keyframe stamps must be non-decreasing"));
        }
        last_stamp = kf.stamp;
        keyframes.push(kf);
    }

    // from_keyframes pins the endpoint stamps to exactly 0 and 1.
    let mut clip = KeyframedClip::from_keyframes(name, channel, keyframes);
    clip.absolute_start = bool_field_or(map, "absoluteStart", false, path)?;

    match map.get("target") {
        None | Some(JsonValue::Null) => {}
        Some(raw) => {
            let target_path = parse_target(raw, &format!("{path}/target"))?;
            match resolver.resolve(&target_path) {
                Ok(handle) => clip.target = Some(handle),
                Err(err) => {
                    // Non-fatal: the clip stays loadable and evaluates
                    // without applying its output.
                    log::warn!("{path}: {err}; clip '{}' will not apply output", clip.name);
                }
            }
            clip.target_path = Some(target_path);
        }
    }
    Ok(clip)
}

fn parse_keyframe(value: &JsonValue, kind: ValueKind, path: &str) -> Result<KeyFrame, ClipError> {
    let map = as_object(value, path)?;
    let stamp = f32_field(map, "stamp", path)?;
    if !(0.0..=1.0).contains(&stamp) {
        return Err(ClipError::at(path, format!("stamp {stamp} outside [0,1]")));
    }
    let curve = match map.get("curve") {
        None | Some(JsonValue::Null) => Curve::linear(),
        Some(raw) => parse_curve(raw, &format!("{path}/curve"))?,
    };
    let payload = parse_value(field(map, "value", path)?, kind, &format!("{path}/value"))?;
    Ok(KeyFrame::with_curve(stamp, payload, curve))
}

fn parse_curve(value: &JsonValue, path: &str) -> Result<Curve, ClipError> {
    let map = as_object(value, path)?;
    Ok(Curve::new(
        f32_field(map, "x1", path)?,
        f32_field(map, "y1", path)?,
        f32_field(map, "x2", path)?,
        f32_field(map, "y2", path)?,
    ))
}

fn parse_value(value: &JsonValue, kind: ValueKind, path: &str) -> Result<Value, ClipError> {
    let arr = value
        .as_array()
        .ok_or_else(|| ClipError::at(path, "expected an array of components"))?;
    let mut components = [0.0f32; 4];
    let expected = match kind {
        ValueKind::Vec3 => 3,
        ValueKind::Quat => 4,
    };
    if arr.len() != expected {
        return Err(ClipError::at(
            path,
            format!("expected {expected} components for this channel, found {}", arr.len()),
        ));
    }
    for (i, c) in arr.iter().enumerate() {
        components[i] = finite_f32(c, &format!("{path}[{i}]"))?;
    }
    Ok(match kind {
        ValueKind::Vec3 => Value::Vec3([components[0], components[1], components[2]]),
        ValueKind::Quat => Value::Quat(components),
    })
}

fn parse_target(value: &JsonValue, path: &str) -> Result<TargetPath, ClipError> {
    let map = as_object(value, path)?;
    let root = str_field(map, "root", path)?.to_string();
    let mut children = Vec::new();
    if let Some(raw) = map.get("children") {
        let arr = raw
            .as_array()
            .ok_or_else(|| ClipError::at(path, "'children' must be an array of indices"))?;
        for (i, c) in arr.iter().enumerate() {
            let idx = c.as_u64().ok_or_else(|| {
                ClipError::at(&format!("{path}/children[{i}]"), "expected a child index")
            })?;
            children.push(idx as u32);
        }
    }
    Ok(TargetPath { root, children })
}

fn parse_timeline(
    map: &Map<String, JsonValue>,
    resolver: &mut dyn TargetResolver,
    path: &str,
) -> Result<TimelineClip, ClipError> {
    let name = str_field(map, "name", path)?;
    let mut clip = TimelineClip::new(name);
    for (i, raw) in array_field(map, "slots", path)?.iter().enumerate() {
        let slot_path = format!("{path}/slots[{i}]");
        let slot_map = as_object(raw, &slot_path)?;
        let duration = f32_field(slot_map, "duration", &slot_path)?;
        if duration < 0.0 {
            return Err(ClipError::at(&slot_path, format!("negative duration {duration}")));
        }
        let child_value = field(slot_map, "child", &slot_path)?;
        let child = parse_node(child_value, resolver, &format!("{slot_path}/child"))?;
        clip.push_slot(child, duration);
    }
    Ok(clip)
}

fn parse_layers(
    map: &Map<String, JsonValue>,
    resolver: &mut dyn TargetResolver,
    path: &str,
) -> Result<LayerClip, ClipError> {
    let name = str_field(map, "name", path)?;
    let mut clip = LayerClip::new(name);
    for (i, raw) in array_field(map, "layers", path)?.iter().enumerate() {
        let layer_path = format!("{path}/layers[{i}]");
        match parse_node(raw, resolver, &layer_path)? {
            ClipNode::Timeline(layer) => clip.push_layer(layer),
            other => {
                return Err(ClipError::at(
                    &layer_path,
                    format!("expected a {TIMELINE_TAG} record, found {}", other.type_tag()),
                ))
            }
        }
    }
    Ok(clip)
}

// ----- field accessors -----

fn as_object<'a>(value: &'a JsonValue, path: &str) -> Result<&'a Map<String, JsonValue>, ClipError> {
    value
        .as_object()
        .ok_or_else(|| ClipError::at(path, "expected an object"))
}

fn field<'a>(
    map: &'a Map<String, JsonValue>,
    key: &str,
    path: &str,
) -> Result<&'a JsonValue, ClipError> {
    map.get(key)
        .ok_or_else(|| ClipError::at(path, format!("missing field '{key}'")))
}

fn str_field<'a>(
    map: &'a Map<String, JsonValue>,
    key: &str,
    path: &str,
) -> Result<&'a str, ClipError> {
    field(map, key, path)?
        .as_str()
        .ok_or_else(|| ClipError::at(path, format!("field '{key}' must be a string")))
}

fn array_field<'a>(
    map: &'a Map<String, JsonValue>,
    key: &str,
    path: &str,
) -> Result<&'a Vec<JsonValue>, ClipError> {
    field(map, key, path)?
        .as_array()
        .ok_or_else(|| ClipError::at(path, format!("field '{key}' must be an array")))
}

fn f32_field(map: &Map<String, JsonValue>, key: &str, path: &str) -> Result<f32, ClipError> {
    finite_f32(field(map, key, path)?, &format!("{path}/{key}"))
}

fn finite_f32(value: &JsonValue, path: &str) -> Result<f32, ClipError> {
    let n = value
        .as_f64()
        .ok_or_else(|| ClipError::at(path, "expected a number"))? as f32;
    if !n.is_finite() {
        return Err(ClipError::at(path, "number must be finite"));
    }
    Ok(n)
}

fn u32_field(map: &Map<String, JsonValue>, key: &str, path: &str) -> Result<u32, ClipError> {
    let raw = field(map, key, path)?;
    let n = raw
        .as_u64()
        .ok_or_else(|| ClipError::at(path, format!("field '{key}' must be a non-negative integer")))?;
    u32::try_from(n)
        .map_err(|_| ClipError::at(path, format!("field '{key}' out of range: {n}")))
}

fn bool_field_or(
    map: &Map<String, JsonValue>,
    key: &str,
    default: bool,
    path: &str,
) -> Result<bool, ClipError> {
    match map.get(key) {
        None | Some(JsonValue::Null) => Ok(default),
        Some(raw) => raw
            .as_bool()
            .ok_or_else(|| ClipError::at(path, format!("field '{key}' must be a boolean"))),
    }
}
