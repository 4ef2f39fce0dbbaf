use shared::domain::{Day, PinKey};
use tracing::debug;

use super::{
    correlate::{event_for_pin, EventTarget},
    sequence::SequencedPin,
};
use crate::map::ClickId;

/// What last changed the focus. The map dispatches a marker click and the
/// background click for the same physical click back to back, so the tag lets
/// the background handler recognise a click the marker already consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Marker { click: ClickId },
    Background { click: ClickId },
    Timeline,
    DayTab,
    Scroll,
    Document,
}

/// Active day plus the focused and selected pin keys.
///
/// A change of active day always clears both keys; transitions that set keys
/// and a day together switch the day first.
#[derive(Debug, Clone)]
pub struct FocusController {
    day_count: usize,
    active_day: usize,
    focused: Option<PinKey>,
    selected: Option<PinKey>,
    last_input: Option<InputSource>,
}

impl FocusController {
    pub fn new(day_count: usize) -> Self {
        Self {
            day_count,
            active_day: 0,
            focused: None,
            selected: None,
            last_input: None,
        }
    }

    pub fn active_day(&self) -> usize {
        self.active_day
    }

    pub fn day_count(&self) -> usize {
        self.day_count
    }

    pub fn focused(&self) -> Option<&PinKey> {
        self.focused.as_ref()
    }

    pub fn selected(&self) -> Option<&PinKey> {
        self.selected.as_ref()
    }

    pub fn last_input(&self) -> Option<InputSource> {
        self.last_input
    }

    /// Returns true when the active day actually changed.
    pub fn set_active_day(&mut self, day_index: usize, source: InputSource) -> bool {
        let clamped = day_index.min(self.day_count.saturating_sub(1));
        self.last_input = Some(source);
        if clamped == self.active_day {
            return false;
        }
        debug!(from = self.active_day, to = clamped, ?source, "active day changed");
        self.active_day = clamped;
        self.focused = None;
        self.selected = None;
        true
    }

    /// Focuses and selects the clicked marker. Returns the timeline card to
    /// scroll to on the next frame, if the pin has one.
    pub fn marker_clicked(
        &mut self,
        click: ClickId,
        pin: &SequencedPin,
        days: &[Day],
    ) -> Option<EventTarget> {
        self.set_active_day(pin.day_index, InputSource::Marker { click });
        self.focused = Some(pin.key.clone());
        self.selected = Some(pin.key.clone());
        event_for_pin(days, pin)
    }

    /// Clears focus unless this physical click already hit a marker.
    /// Returns true when the keys were cleared.
    pub fn background_clicked(&mut self, click: ClickId) -> bool {
        if self.last_input == Some(InputSource::Marker { click }) {
            self.last_input = Some(InputSource::Background { click });
            return false;
        }
        self.last_input = Some(InputSource::Background { click });
        self.focused = None;
        self.selected = None;
        true
    }

    /// Timeline cards highlight their pin but never open the detail overlay.
    /// Pins without coordinates are ignored; returns true when focus moved.
    pub fn timeline_clicked(&mut self, pin: &SequencedPin) -> bool {
        if pin.coordinate().is_none() {
            return false;
        }
        self.set_active_day(pin.day_index, InputSource::Timeline);
        self.focused = Some(pin.key.clone());
        true
    }

    /// Closes the detail overlay without touching the highlight.
    pub fn close_details(&mut self) {
        self.selected = None;
    }

    pub fn replace_document(&mut self, day_count: usize) {
        self.day_count = day_count;
        if self.active_day >= day_count {
            self.active_day = 0;
        }
        self.focused = None;
        self.selected = None;
        self.last_input = Some(InputSource::Document);
    }
}

#[cfg(test)]
#[path = "../tests/focus_tests.rs"]
mod tests;
