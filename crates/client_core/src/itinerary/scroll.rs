//! Timeline scroll bookkeeping: programmatic smooth scrolls to a day or event
//! card, and the per-frame "which day section is nearest the top" observer.
//!
//! Everything here works on plain offsets so the UI layer only has to report
//! geometry and apply the offsets it gets back.

use std::time::{Duration, Instant};

use super::correlate::EventTarget;

pub const DAY_PADDING: f32 = 8.0;
pub const EVENT_PADDING: f32 = 24.0;
pub const SMOOTH_SCROLL_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Day(usize),
    Event(EventTarget),
}

impl ScrollTarget {
    pub fn day_index(&self) -> usize {
        match self {
            Self::Day(day_index) => *day_index,
            Self::Event(target) => target.day_index,
        }
    }

    pub fn padding(&self) -> f32 {
        match self {
            Self::Day(_) => DAY_PADDING,
            Self::Event(_) => EVENT_PADDING,
        }
    }
}

/// Destination offset for bringing an element `relative_top` pixels below
/// the viewport top to just under it.
pub fn scroll_destination(current_offset: f32, relative_top: f32, padding: f32) -> f32 {
    (current_offset + relative_top - padding).max(0.0)
}

/// Index of the section whose top is closest to the viewport top. Ties go to
/// the lower index.
pub fn nearest_section(distances: &[f32]) -> Option<usize> {
    distances
        .iter()
        .enumerate()
        .filter(|(_, distance)| distance.is_finite())
        .fold(None, |best: Option<(usize, f32)>, (index, distance)| {
            let distance = distance.abs();
            match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((index, distance)),
            }
        })
        .map(|(index, _)| index)
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f32,
    to: f32,
    started: Instant,
}

impl Animation {
    fn offset_at(&self, now: Instant) -> (f32, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        let t = (elapsed.as_secs_f32() / SMOOTH_SCROLL_DURATION.as_secs_f32()).clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        (self.from + (self.to - self.from) * eased, t >= 1.0)
    }
}

#[derive(Debug, Default)]
pub struct ScrollSync {
    animation: Option<Animation>,
    observe_pending: bool,
}

impl ScrollSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a smooth scroll and returns its destination offset.
    pub fn scroll_to(
        &mut self,
        target: ScrollTarget,
        current_offset: f32,
        relative_top: f32,
        now: Instant,
    ) -> f32 {
        let to = scroll_destination(current_offset, relative_top, target.padding());
        self.animation = Some(Animation {
            from: current_offset,
            to,
            started: now,
        });
        to
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Offset to apply this frame while an animation runs. The observer is
    /// kept quiet for the whole animation, including the settling frame.
    pub fn animated_offset(&mut self, now: Instant) -> Option<f32> {
        let animation = self.animation?;
        let (offset, finished) = animation.offset_at(now);
        if finished {
            self.animation = None;
            self.observe_pending = false;
        }
        Some(offset)
    }

    /// Cancels a running animation, e.g. when the user grabs the scrollbar.
    pub fn interrupt(&mut self) {
        self.animation = None;
    }

    /// Records a scroll event. Any number of calls per frame collapse into
    /// one observation.
    pub fn note_scrolled(&mut self) {
        if self.animation.is_none() {
            self.observe_pending = true;
        }
    }

    /// Runs at most once per frame. `distances` are each day section's top
    /// minus the container's top. Returns the new active day only when it
    /// differs from `current_day`.
    pub fn observe(&mut self, distances: &[f32], current_day: usize) -> Option<usize> {
        if !std::mem::take(&mut self.observe_pending) || self.animation.is_some() {
            return None;
        }
        nearest_section(distances).filter(|nearest| *nearest != current_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_section_picks_minimum_absolute_distance() {
        // Container top sits at 380: sections at 0, 400, 900.
        let distances = [-380.0, 20.0, 520.0];
        assert_eq!(nearest_section(&distances), Some(1));
        assert_eq!(nearest_section(&[-10.0, 10.0]), Some(0));
        assert_eq!(nearest_section(&[]), None);
    }

    #[test]
    fn observer_is_coalesced_and_idempotent() {
        let mut sync = ScrollSync::new();
        let distances = [-380.0, 20.0, 520.0];

        assert_eq!(sync.observe(&distances, 0), None);

        sync.note_scrolled();
        sync.note_scrolled();
        assert_eq!(sync.observe(&distances, 0), Some(1));
        assert_eq!(sync.observe(&distances, 0), None);

        sync.note_scrolled();
        assert_eq!(sync.observe(&distances, 1), None);
    }

    #[test]
    fn destination_applies_padding_and_clamps_at_zero() {
        assert_eq!(scroll_destination(100.0, 300.0, DAY_PADDING), 392.0);
        assert_eq!(scroll_destination(100.0, 300.0, EVENT_PADDING), 376.0);
        assert_eq!(scroll_destination(0.0, 10.0, EVENT_PADDING), 0.0);
    }

    #[test]
    fn observer_is_suppressed_during_programmatic_scroll() {
        let mut sync = ScrollSync::new();
        let start = Instant::now();
        let to = sync.scroll_to(ScrollTarget::Day(2), 0.0, 908.0, start);
        assert_eq!(to, 900.0);

        sync.note_scrolled();
        assert_eq!(sync.observe(&[-450.0, -50.0, 450.0], 2), None);

        let mid = sync
            .animated_offset(start + Duration::from_millis(150))
            .expect("animating");
        assert!(mid > 450.0 && mid < 900.0);

        let end = sync
            .animated_offset(start + SMOOTH_SCROLL_DURATION)
            .expect("final frame");
        assert_eq!(end, 900.0);
        assert!(!sync.is_animating());
        assert_eq!(sync.observe(&[-900.0, -500.0, 0.0], 2), None);
    }

    #[test]
    fn targets_report_day_and_padding() {
        let event = ScrollTarget::Event(EventTarget {
            day_index: 1,
            event_index: 3,
        });
        assert_eq!(event.day_index(), 1);
        assert_eq!(event.padding(), EVENT_PADDING);
        assert_eq!(ScrollTarget::Day(0).padding(), DAY_PADDING);
    }
}
