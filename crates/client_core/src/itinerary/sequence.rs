use shared::domain::{Coordinate, Day, MapPin, PinKey};

/// A pin placed in the trip-wide display order.
#[derive(Debug, Clone, PartialEq)]
pub struct SequencedPin {
    pub key: PinKey,
    pub day_index: usize,
    pub sequence: u32,
    pub pin: MapPin,
}

impl SequencedPin {
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.pin.coordinate
    }
}

/// Flat, ordered view over every day's pins.
///
/// Pins without coordinates stay in the list so timeline cards can still
/// correlate against them; [`PinSequence::mappable`] filters them out for the
/// map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PinSequence {
    pins: Vec<SequencedPin>,
}

impl PinSequence {
    pub fn build(days: &[Day]) -> Self {
        let mut counter: u32 = 1;
        let mut any_explicit = false;
        let mut pins = Vec::new();

        for (day_index, day) in days.iter().enumerate() {
            for (local_index, pin) in day.pins.iter().enumerate() {
                let sequence = match pin.sequence {
                    Some(explicit) => {
                        any_explicit = true;
                        explicit
                    }
                    None => {
                        let next = counter;
                        counter = counter.saturating_add(1);
                        next
                    }
                };
                let local = pin
                    .id
                    .as_ref()
                    .map(|id| id.as_str().to_string())
                    .unwrap_or_else(|| local_index.to_string());
                pins.push(SequencedPin {
                    key: PinKey::new(day_index, local),
                    day_index,
                    sequence,
                    pin: pin.clone(),
                });
            }
        }

        if any_explicit {
            // Vec::sort_by_key is stable, so ties keep encounter order.
            pins.sort_by_key(|pin| pin.sequence);
        }

        Self { pins }
    }

    pub fn pins(&self) -> &[SequencedPin] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Pins that can be drawn on the map, in display order.
    pub fn mappable(&self) -> impl Iterator<Item = &SequencedPin> + '_ {
        self.pins.iter().filter(|pin| pin.coordinate().is_some())
    }

    /// One day's pins in display order.
    pub fn for_day(&self, day_index: usize) -> impl Iterator<Item = &SequencedPin> + '_ {
        self.pins
            .iter()
            .filter(move |pin| pin.day_index == day_index)
    }

    pub fn get(&self, key: &PinKey) -> Option<&SequencedPin> {
        self.pins.iter().find(|pin| &pin.key == key)
    }
}

#[cfg(test)]
#[path = "../tests/sequence_tests.rs"]
mod tests;
