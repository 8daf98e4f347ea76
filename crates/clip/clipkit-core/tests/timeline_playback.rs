use clipkit_core::{
    Channel, ClipError, ClipNode, KeyFrame, KeyframedClip, TargetHandle, TargetSink, TimelineClip,
    Value,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[derive(Default)]
struct RecordingSink {
    applied: Vec<(String, f32)>,
}

impl TargetSink for RecordingSink {
    fn apply(&mut self, target: &TargetHandle, _channel: Channel, value: Value) {
        let x = match value {
            Value::Vec3(v) => v[0],
            Value::Quat(q) => q[0],
        };
        self.applied.push((target.clone(), x));
    }
}

/// Leaf whose x component runs 0 -> 1 linearly, applied to `target`.
fn ramp_leaf(target: &str) -> ClipNode {
    let mut clip = KeyframedClip::from_keyframes(
        target,
        Channel::Position,
        vec![
            KeyFrame::new(0.0, Value::Vec3([0.0, 0.0, 0.0])),
            KeyFrame::new(1.0, Value::Vec3([1.0, 0.0, 0.0])),
        ],
    );
    clip.target = Some(target.to_string());
    ClipNode::Keyframed(clip)
}

fn three_slot_timeline() -> TimelineClip {
    let mut tl = TimelineClip::new("seq");
    tl.push_slot(ramp_leaf("l0"), 1.0);
    tl.push_slot(ramp_leaf("l1"), 1.0);
    tl.push_slot(ramp_leaf("l2"), 1.0);
    tl
}

#[test]
fn forward_jump_snaps_skipped_slots_to_one() {
    let mut tl = three_slot_timeline();
    let mut sink = RecordingSink::default();

    tl.animate(0.0, &mut sink).unwrap();
    assert_eq!(sink.applied, vec![("l0".to_string(), 0.0)]);

    sink.applied.clear();
    tl.animate(1.0, &mut sink).unwrap();
    // Skipped slots reach their terminal state, in order, before the new
    // active slot is evaluated.
    assert_eq!(
        sink.applied,
        vec![
            ("l0".to_string(), 1.0),
            ("l1".to_string(), 1.0),
            ("l2".to_string(), 1.0),
        ]
    );
}

#[test]
fn backward_jump_snaps_crossed_slots_to_zero() {
    let mut tl = three_slot_timeline();
    let mut sink = RecordingSink::default();

    tl.animate(1.0, &mut sink).unwrap();
    sink.applied.clear();

    tl.animate(0.0, &mut sink).unwrap();
    let names: Vec<&str> = sink.applied.iter().map(|(n, _)| n.as_str()).collect();
    // Crossed slots (new active included) rewind to 0 in reverse order,
    // then the active slot is evaluated at its mapped local time.
    assert_eq!(names, vec!["l2", "l1", "l0", "l0"]);
    assert!(sink.applied.iter().all(|(_, x)| *x == 0.0));
}

#[test]
fn partial_advance_evaluates_only_the_active_slot() {
    let mut tl = three_slot_timeline();
    let mut sink = RecordingSink::default();

    tl.animate(0.5, &mut sink).unwrap();
    // t=0.5 over total 3.0 lands in slot 1 at local 0.5; slot 0 snaps to 1.
    assert_eq!(sink.applied.len(), 2);
    assert_eq!(sink.applied[0], ("l0".to_string(), 1.0));
    assert_eq!(sink.applied[1].0, "l1");
    approx(sink.applied[1].1, 0.5, 1e-6);
}

#[test]
fn out_of_range_times_hold_state() {
    let mut tl = three_slot_timeline();
    let mut sink = RecordingSink::default();

    // Before playback ever starts, negative time is a no-op.
    tl.animate(-0.5, &mut sink).unwrap();
    assert!(sink.applied.is_empty());

    tl.animate(0.5, &mut sink).unwrap();
    sink.applied.clear();

    // Past the end and still moving forward: hold, don't extrapolate.
    tl.animate(1.2, &mut sink).unwrap();
    tl.animate(1.5, &mut sink).unwrap();
    assert!(sink.applied.is_empty());
}

#[test]
fn empty_timeline_fails_with_invalid_state() {
    let mut tl = TimelineClip::new("empty");
    let mut sink = RecordingSink::default();
    assert!(matches!(
        tl.animate(0.5, &mut sink),
        Err(ClipError::InvalidState(_))
    ));
    assert!(sink.applied.is_empty());
}

#[test]
fn zero_total_duration_is_a_noop() {
    let mut tl = TimelineClip::new("zeroed");
    tl.push_slot(ramp_leaf("l0"), 0.0);
    tl.push_slot(ramp_leaf("l1"), 0.0);
    let mut sink = RecordingSink::default();
    tl.animate(0.5, &mut sink).unwrap();
    assert!(sink.applied.is_empty());
}

#[test]
fn zero_duration_slot_completes_instantly() {
    let mut tl = TimelineClip::new("mixed");
    tl.push_slot(ramp_leaf("l0"), 1.0);
    tl.push_slot(ramp_leaf("flash"), 0.0);
    tl.push_slot(ramp_leaf("l2"), 1.0);
    let mut sink = RecordingSink::default();

    tl.animate(1.0, &mut sink).unwrap();
    let flash: Vec<f32> = sink
        .applied
        .iter()
        .filter(|(n, _)| n == "flash")
        .map(|(_, x)| *x)
        .collect();
    assert_eq!(flash, vec![1.0]);
}

#[test]
fn starts_are_recomputed_on_every_edit() {
    let mut tl = TimelineClip::new("edit");
    tl.push_slot(ramp_leaf("a"), 1.0);
    tl.push_slot(ramp_leaf("b"), 2.0);
    tl.push_slot(ramp_leaf("c"), 3.0);
    let starts: Vec<f32> = tl.slots().iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![0.0, 1.0, 3.0]);
    assert_eq!(tl.total_duration(), 6.0);

    tl.swap_slots(0, 2).unwrap();
    let starts: Vec<f32> = tl.slots().iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![0.0, 3.0, 5.0]);

    tl.set_duration(0, 0.5).unwrap();
    let starts: Vec<f32> = tl.slots().iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![0.0, 0.5, 2.5]);
    assert_eq!(tl.total_duration(), 3.5);

    tl.remove_slot(1).unwrap();
    let starts: Vec<f32> = tl.slots().iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![0.0, 0.5]);
    assert_eq!(tl.total_duration(), 1.5);
}

#[test]
fn appended_slot_starts_at_the_current_end() {
    let mut tl = TimelineClip::new("grow");
    tl.push_slot(ramp_leaf("a"), 2.0);
    tl.append(ramp_leaf("b"));
    let last = tl.slots().last().unwrap();
    assert_eq!(last.start, 2.0);
    assert_eq!(last.duration, 0.0);
}

#[test]
fn structural_edit_resets_the_playback_cursor() {
    let mut tl = TimelineClip::new("resettable");
    tl.push_slot(ramp_leaf("a"), 1.0);
    tl.push_slot(ramp_leaf("b"), 1.0);
    let mut sink = RecordingSink::default();

    // Drive to the end so the cursor points at the last slot.
    tl.animate(1.0, &mut sink).unwrap();
    sink.applied.clear();

    // Any structural edit invalidates the cursor; with a fresh cursor at
    // index 0 there is no backward snap through slot "b".
    tl.set_duration(1, 2.0).unwrap();
    tl.animate(0.0, &mut sink).unwrap();
    assert_eq!(sink.applied, vec![("a".to_string(), 0.0)]);
}

#[test]
fn invalid_slot_indices_are_rejected() {
    let mut tl = TimelineClip::new("bounds");
    tl.push_slot(ramp_leaf("a"), 1.0);
    assert!(matches!(tl.remove_slot(5), Err(ClipError::InvalidState(_))));
    assert!(matches!(tl.swap_slots(0, 3), Err(ClipError::InvalidState(_))));
    assert!(matches!(
        tl.set_duration(9, 1.0),
        Err(ClipError::InvalidState(_))
    ));
}

#[test]
fn nested_timelines_delegate_with_remapped_time() {
    let mut inner = TimelineClip::new("inner");
    inner.push_slot(ramp_leaf("x"), 1.0);
    inner.push_slot(ramp_leaf("y"), 1.0);

    let mut outer = TimelineClip::new("outer");
    outer.push_slot(ClipNode::Timeline(inner), 4.0);
    outer.push_slot(ramp_leaf("z"), 4.0);

    let mut sink = RecordingSink::default();
    // Outer t=0.3 -> elapsed 2.4 of 8.0 -> inner at local 0.6 -> inner's
    // second slot at local 0.2 (slot x snaps to 1 on the way).
    outer.animate(0.3, &mut sink).unwrap();
    assert_eq!(sink.applied[0], ("x".to_string(), 1.0));
    assert_eq!(sink.applied[1].0, "y");
    approx(sink.applied[1].1, 0.2, 1e-5);
}
