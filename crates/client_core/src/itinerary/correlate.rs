//! Links timeline events to map pins.
//!
//! Resolution is first-match-wins with no scoring: an explicit pin reference
//! beats text containment, and text rules are tried in a fixed order. Results
//! are recomputed from the current [`PinSequence`] every time and never cached.

use shared::domain::{Day, MapPin, TimelineEvent};

use super::sequence::{PinSequence, SequencedPin};

/// Where a pin's matching timeline card lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventTarget {
    pub day_index: usize,
    pub event_index: usize,
}

/// Returns the pin an event on `day_index` refers to, or `None` when unlinked.
pub fn pin_for_event<'a>(
    sequence: &'a PinSequence,
    day_index: usize,
    event: &TimelineEvent,
) -> Option<&'a SequencedPin> {
    if let Some(pin_ref) = &event.pin_ref {
        let by_id = sequence
            .for_day(day_index)
            .find(|candidate| candidate.pin.id.as_ref() == Some(pin_ref));
        if by_id.is_some() {
            return by_id;
        }
    }

    if event.title.is_empty() {
        return None;
    }
    sequence
        .for_day(day_index)
        .find(|candidate| text_matches(&event.title, &candidate.pin))
}

/// Reverse lookup: the first event of the pin's day that links to it.
pub fn event_for_pin(days: &[Day], pin: &SequencedPin) -> Option<EventTarget> {
    let day = days.get(pin.day_index)?;
    day.timeline
        .iter()
        .position(|event| {
            let by_id = matches!(
                (&pin.pin.id, &event.pin_ref),
                (Some(pin_id), Some(event_ref)) if pin_id == event_ref
            );
            by_id || (!event.title.is_empty() && text_matches(&event.title, &pin.pin))
        })
        .map(|event_index| EventTarget {
            day_index: pin.day_index,
            event_index,
        })
}

fn text_matches(event_title: &str, pin: &MapPin) -> bool {
    let name = pin.name.as_str();
    let title = pin.title.as_str();
    (!name.is_empty() && event_title.contains(name))
        || (!title.is_empty() && event_title.contains(title))
        || (!name.is_empty() && name.contains(event_title))
}

#[cfg(test)]
#[path = "../tests/correlate_tests.rs"]
mod tests;
