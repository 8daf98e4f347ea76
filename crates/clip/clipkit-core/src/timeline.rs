//! Sequential composite: child clips placed one after another on a
//! timeline, plus the incremental playback cursor and boundary-snap logic.

use crate::binding::TargetSink;
use crate::error::ClipError;
use crate::node::ClipNode;

/// A child animation placed on a parent timeline. `start` is derived from
/// the durations of all preceding slots and recomputed on every structural
/// edit; only `duration` is free.
#[derive(Clone, Debug)]
pub struct TimelineSlot {
    pub start: f32,
    pub duration: f32,
    pub child: ClipNode,
}

/// Sequential composite animation node.
///
/// `animate(t)` maps normalized `t` to elapsed time on the timeline,
/// locates the active slot by binary search, and delegates with remapped
/// local time. The clip keeps a playback cursor `(last_t, last_active)` so
/// that slots skipped by a large time jump are first driven to their
/// terminal boundary (1 moving forward, 0 moving backward) instead of
/// being abandoned mid-interpolation.
#[derive(Clone, Debug)]
pub struct TimelineClip {
    pub name: String,
    /// Authoring-only display flag; evaluation ignores it.
    pub visible: bool,
    slots: Vec<TimelineSlot>,
    total_duration: f32,
    last_t: f32,
    last_active: usize,
}

impl Default for TimelineClip {
    fn default() -> Self {
        Self::new("")
    }
}

impl TimelineClip {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: false,
            slots: Vec::new(),
            total_duration: 0.0,
            last_t: -1.0,
            last_active: 0,
        }
    }

    #[inline]
    pub fn slots(&self) -> &[TimelineSlot] {
        &self.slots
    }

    #[inline]
    pub fn total_duration(&self) -> f32 {
        self.total_duration
    }

    /// Elapsed time at the end of the last slot (equals the total duration).
    #[inline]
    pub fn end_time(&self) -> f32 {
        self.total_duration
    }

    /// Authoring: append a child at the end of the timeline with zero
    /// initial duration. Template placement goes through this after
    /// cloning (see `TemplateSet::instantiate`).
    pub fn append(&mut self, child: ClipNode) {
        self.push_slot(child, 0.0);
    }

    /// Authoring: append a child with an explicit duration.
    pub fn push_slot(&mut self, child: ClipNode, duration: f32) {
        self.slots.push(TimelineSlot {
            start: self.end_time(),
            duration: duration.max(0.0),
            child,
        });
        self.refresh();
    }

    /// Authoring: remove the slot at `index`, returning its child.
    pub fn remove_slot(&mut self, index: usize) -> Result<ClipNode, ClipError> {
        if index >= self.slots.len() {
            return Err(self.bad_index(index));
        }
        let slot = self.slots.remove(index);
        self.refresh();
        Ok(slot.child)
    }

    /// Authoring: swap two slots (reordering on the timeline).
    pub fn swap_slots(&mut self, a: usize, b: usize) -> Result<(), ClipError> {
        if a >= self.slots.len() {
            return Err(self.bad_index(a));
        }
        if b >= self.slots.len() {
            return Err(self.bad_index(b));
        }
        self.slots.swap(a, b);
        self.refresh();
        Ok(())
    }

    /// Authoring: change a slot's duration (negative values clamp to 0).
    pub fn set_duration(&mut self, index: usize, duration: f32) -> Result<(), ClipError> {
        if index >= self.slots.len() {
            return Err(self.bad_index(index));
        }
        self.slots[index].duration = duration.max(0.0);
        self.refresh();
        Ok(())
    }

    fn bad_index(&self, index: usize) -> ClipError {
        ClipError::invalid_state(format!(
            "slot index {index} out of range (len {}) in timeline '{}'",
            self.slots.len(),
            self.name
        ))
    }

    /// Recompute every derived `start` by cumulative summation and drop the
    /// playback cursor. Runs after every structural edit so a stale cursor
    /// cannot mis-snap against a changed timeline.
    fn refresh(&mut self) {
        let mut elapsed = 0.0;
        for slot in &mut self.slots {
            slot.start = elapsed;
            elapsed += slot.duration;
        }
        self.total_duration = elapsed;
        self.reset_cursor();
    }

    /// Reset the playback cursor of this clip and every descendant.
    pub fn reset_cursor(&mut self) {
        self.last_t = -1.0;
        self.last_active = 0;
        for slot in &mut self.slots {
            slot.child.reset_cursors();
        }
    }

    /// Binary search for the slot whose `[start, start + duration]` range
    /// contains elapsed time `e`. Below-range queries return the first
    /// slot, above-range the last. `None` only when the timeline is empty.
    fn find_slot(&self, e: f32) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }

        let mut min = 0;
        let mut max = self.slots.len() - 1;

        if e < 0.0 {
            return Some(min);
        }
        if self.total_duration < e {
            return Some(max);
        }

        while max - min > 1 {
            let mid = min + (max - min) / 2;
            let slot = &self.slots[mid];
            if slot.start <= e && e <= slot.start + slot.duration {
                return Some(mid);
            }
            if e < slot.start {
                max = mid;
            } else {
                min = mid;
            }
        }
        let slot = &self.slots[min];
        if slot.start <= e && e <= slot.start + slot.duration {
            Some(min)
        } else {
            Some(max)
        }
    }

    /// Evaluate the timeline at normalized `t`.
    ///
    /// Out-of-range `t` that does not advance past the previous bound is a
    /// no-op (the timeline holds its last state, never extrapolates). A
    /// timeline whose total duration is 0 is also a no-op. An empty
    /// timeline is an invalid state and playback state is left untouched.
    pub fn animate(&mut self, t: f32, sink: &mut dyn TargetSink) -> Result<(), ClipError> {
        if self.slots.is_empty() {
            return Err(ClipError::invalid_state(format!(
                "timeline '{}' has no slots",
                self.name
            )));
        }
        if t < 0.0 && self.last_t < 0.0 {
            return Ok(());
        }
        if t > 1.0 && t > self.last_t {
            return Ok(());
        }
        if self.total_duration <= 0.0 {
            return Ok(());
        }

        let e = t.clamp(0.0, 1.0) * self.total_duration;
        let index = self
            .find_slot(e)
            .ok_or_else(|| ClipError::invalid_state("no active slot".to_string()))?;

        // Boundary-snap: drive every slot crossed since the previous call
        // to its terminal time before evaluating the new active slot.
        if self.last_active < index {
            for i in self.last_active..index {
                self.slots[i].child.animate(1.0, sink)?;
            }
        } else if self.last_active > index {
            for i in (index..=self.last_active).rev() {
                self.slots[i].child.animate(0.0, sink)?;
            }
        }

        let slot = &mut self.slots[index];
        let local = if slot.duration > 0.0 {
            ((e - slot.start) / slot.duration).clamp(0.0, 1.0)
        } else {
            // Zero-duration slot: completes instantly when reached.
            1.0
        };
        slot.child.animate(local, sink)?;

        self.last_t = t;
        self.last_active = index;
        Ok(())
    }
}
