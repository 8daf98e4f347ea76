use criterion::{black_box, criterion_group, criterion_main, Criterion};

use clipkit_core::{
    Channel, ClipNode, KeyFrame, KeyframedClip, LayerClip, TargetHandle, TargetSink, TimelineClip,
    Value,
};

struct NullSink;

impl TargetSink for NullSink {
    fn apply(&mut self, _target: &TargetHandle, _channel: Channel, _value: Value) {}
}

fn dense_leaf(name: &str, keyframe_count: usize) -> ClipNode {
    let frames = (0..keyframe_count)
        .map(|i| {
            let stamp = i as f32 / (keyframe_count - 1) as f32;
            KeyFrame::new(stamp, Value::Vec3([stamp, 0.0, 0.0]))
        })
        .collect();
    let mut clip = KeyframedClip::from_keyframes(name, Channel::Position, frames);
    clip.target = Some(name.to_string());
    ClipNode::Keyframed(clip)
}

fn layered_tree(layer_count: usize, slots_per_layer: usize) -> LayerClip {
    let mut stack = LayerClip::new("bench");
    for l in 0..layer_count {
        let mut layer = TimelineClip::new(format!("layer-{l}"));
        for s in 0..slots_per_layer {
            layer.push_slot(dense_leaf(&format!("leaf-{l}-{s}"), 32), 1.0);
        }
        stack.push_layer(layer);
    }
    stack
}

fn bench_leaf_sample(c: &mut Criterion) {
    let leaf = match dense_leaf("leaf", 256) {
        ClipNode::Keyframed(clip) => clip,
        _ => unreachable!(),
    };
    c.bench_function("leaf_sample_256_keyframes", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t = (t + 0.0137) % 1.0;
            black_box(leaf.sample(black_box(t)).unwrap())
        })
    });
}

fn bench_tree_sweep(c: &mut Criterion) {
    c.bench_function("layered_tree_sweep_4x8", |b| {
        let mut tree = layered_tree(4, 8);
        let mut sink = NullSink;
        b.iter(|| {
            tree.reset_cursors();
            for i in 0..=60 {
                let t = i as f32 / 60.0;
                tree.animate(black_box(t), &mut sink).unwrap();
            }
        })
    });
}

fn bench_forward_jump(c: &mut Criterion) {
    c.bench_function("timeline_jump_snap_64_slots", |b| {
        let mut tl = TimelineClip::new("jumpy");
        for s in 0..64 {
            tl.push_slot(dense_leaf(&format!("leaf-{s}"), 8), 1.0);
        }
        let mut sink = NullSink;
        b.iter(|| {
            tl.reset_cursor();
            tl.animate(black_box(0.0), &mut sink).unwrap();
            tl.animate(black_box(1.0), &mut sink).unwrap();
        })
    });
}

criterion_group!(benches, bench_leaf_sample, bench_tree_sweep, bench_forward_jump);
criterion_main!(benches);
