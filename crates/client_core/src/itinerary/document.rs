//! Load boundary for itinerary payloads.
//!
//! Payloads come from the bundled sample or from whatever the generator
//! persisted, so every field is optional and loosely typed here. Defaults are
//! applied once in [`parse_itinerary`]; consumers only ever see the typed
//! [`Itinerary`].

use serde::Deserialize;
use shared::domain::{
    BudgetRange, Coordinate, Day, EventTag, Itinerary, MapPin, PinId, TagColor, TimelineEvent,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("itinerary payload is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub fn parse_itinerary(raw: &str) -> Result<Itinerary, DocumentError> {
    let document: RawDocument = serde_json::from_str(raw)?;
    Ok(document.into_itinerary())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LooseId {
    Number(serde_json::Number),
    Text(String),
}

impl LooseId {
    fn into_pin_id(self) -> Option<PinId> {
        let text = match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.trim().to_string(),
        };
        (!text.is_empty()).then(|| PinId::new(text))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn value(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        }
        .filter(|value| value.is_finite())
    }

    /// Positive whole numbers only; anything else counts as "not provided".
    fn sequence(&self) -> Option<u32> {
        let value = self.value()?;
        if value > 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
            Some(value as u32)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LooseTag {
    Structured {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        color: Option<String>,
    },
    Bare(String),
}

impl LooseTag {
    fn into_tag(self) -> Option<EventTag> {
        let (label, color) = match self {
            Self::Structured { label, color } => (
                label.unwrap_or_default(),
                color.as_deref().map(TagColor::from_name).unwrap_or_default(),
            ),
            Self::Bare(label) => (label, TagColor::Slate),
        };
        (!label.trim().is_empty()).then_some(EventTag { label, color })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPin {
    id: Option<LooseId>,
    name: Option<String>,
    title: Option<String>,
    lng: Option<LooseNumber>,
    lat: Option<LooseNumber>,
    description: Option<String>,
    ai_strategy: Option<String>,
    duration: Option<String>,
    stop_number: Option<String>,
    seq: Option<LooseNumber>,
}

impl RawPin {
    fn into_pin(self) -> MapPin {
        MapPin {
            id: self.id.and_then(LooseId::into_pin_id),
            name: self.name.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            coordinate: Coordinate::from_parts(
                self.lng.as_ref().and_then(LooseNumber::value),
                self.lat.as_ref().and_then(LooseNumber::value),
            ),
            description: self.description.unwrap_or_default(),
            strategy: self.ai_strategy.unwrap_or_default(),
            duration: self.duration.unwrap_or_default(),
            stop_label: self.stop_number.unwrap_or_default(),
            sequence: self.seq.as_ref().and_then(LooseNumber::sequence),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawEvent {
    time: Option<String>,
    title: Option<String>,
    description: Option<String>,
    tags: Option<Vec<LooseTag>>,
    is_extra: Option<bool>,
    pin_id: Option<LooseId>,
    map_pin_id: Option<LooseId>,
    #[serde(rename = "pin_id")]
    snake_pin_id: Option<LooseId>,
}

impl RawEvent {
    fn into_event(self) -> TimelineEvent {
        let pin_ref = self
            .pin_id
            .or(self.map_pin_id)
            .or(self.snake_pin_id)
            .and_then(LooseId::into_pin_id);
        TimelineEvent {
            time: self.time.unwrap_or_default(),
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            tags: self
                .tags
                .unwrap_or_default()
                .into_iter()
                .filter_map(LooseTag::into_tag)
                .collect(),
            is_extra: self.is_extra.unwrap_or(false),
            pin_ref,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawDay {
    #[serde(alias = "header")]
    day_header: Option<String>,
    #[serde(alias = "subtitle")]
    day_sub_header: Option<String>,
    #[serde(alias = "date")]
    date_short: Option<String>,
    map_pins: Option<Vec<RawPin>>,
    timeline: Option<Vec<RawEvent>>,
}

impl RawDay {
    fn into_day(self, index: usize) -> Day {
        let header = self
            .day_header
            .filter(|header| !header.trim().is_empty())
            .unwrap_or_else(|| format!("Day {}", index + 1));
        Day {
            header,
            subtitle: self.day_sub_header.unwrap_or_default(),
            date_label: self.date_short.unwrap_or_default(),
            pins: self
                .map_pins
                .unwrap_or_default()
                .into_iter()
                .map(RawPin::into_pin)
                .collect(),
            timeline: self
                .timeline
                .unwrap_or_default()
                .into_iter()
                .map(RawEvent::into_event)
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCenter {
    lng: Option<LooseNumber>,
    lat: Option<LooseNumber>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawBudget {
    min: Option<LooseNumber>,
    max: Option<LooseNumber>,
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawDocument {
    trip_title: Option<String>,
    date_display: Option<String>,
    map_center: Option<RawCenter>,
    budget_range: Option<RawBudget>,
    budget: Option<Vec<LooseNumber>>,
    days: Option<Vec<RawDay>>,
    /// Legacy single-day payloads carry the day fields at the top level.
    #[serde(flatten)]
    single: RawDay,
}

impl RawDocument {
    fn into_itinerary(self) -> Itinerary {
        let budget = self
            .budget_range
            .and_then(|range| {
                let min = range.min.as_ref().and_then(LooseNumber::value)?;
                let max = range.max.as_ref().and_then(LooseNumber::value)?;
                let currency = range
                    .currency
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| BudgetRange::DEFAULT_CURRENCY.to_string());
                Some(BudgetRange { min, max, currency })
            })
            .or_else(|| match self.budget.as_deref() {
                Some([min, max, ..]) => Some(BudgetRange {
                    min: min.value()?,
                    max: max.value()?,
                    currency: BudgetRange::DEFAULT_CURRENCY.to_string(),
                }),
                _ => None,
            });

        let map_center = self.map_center.and_then(|center| {
            Coordinate::from_parts(
                center.lng.as_ref().and_then(LooseNumber::value),
                center.lat.as_ref().and_then(LooseNumber::value),
            )
        });

        let raw_days = match self.days {
            Some(days) if !days.is_empty() => days,
            _ => vec![self.single],
        };

        Itinerary {
            title: self.trip_title.unwrap_or_default(),
            date_display: self.date_display.unwrap_or_default(),
            map_center,
            budget,
            days: raw_days
                .into_iter()
                .enumerate()
                .map(|(index, day)| day.into_day(index))
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/document_tests.rs"]
mod tests;
