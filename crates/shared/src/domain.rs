use std::fmt;

use serde::{Deserialize, Serialize};

/// Longitude/latitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lng: f64,
    pub lat: f64,
}

impl Coordinate {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Builds a coordinate from loosely typed parts. A zero or non-finite
    /// component counts as missing.
    pub fn from_parts(lng: Option<f64>, lat: Option<f64>) -> Option<Self> {
        let usable = |value: f64| value.is_finite() && value != 0.0;
        match (lng, lat) {
            (Some(lng), Some(lat)) if usable(lng) && usable(lat) => Some(Self { lng, lat }),
            _ => None,
        }
    }

    pub fn differs_from(&self, other: &Coordinate, epsilon: f64) -> bool {
        (self.lng - other.lng).abs() > epsilon || (self.lat - other.lat).abs() > epsilon
    }
}

/// Pin identifier as written in the itinerary document. Only unique within
/// one document; numeric and textual ids compare by their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(pub String);

impl PinId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session-unique pin key, rendered as `"{day_index}:{id-or-index}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinKey {
    day_index: usize,
    local: String,
}

impl PinKey {
    pub fn new(day_index: usize, local: impl Into<String>) -> Self {
        Self {
            day_index,
            local: local.into(),
        }
    }

    pub fn day_index(&self) -> usize {
        self.day_index
    }

    pub fn local(&self) -> &str {
        &self.local
    }
}

impl fmt::Display for PinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.day_index, self.local)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagColor {
    #[default]
    Slate,
    Yellow,
    Red,
    Purple,
    Blue,
}

impl TagColor {
    /// Unknown color names fall back to slate.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "yellow" => Self::Yellow,
            "red" => Self::Red,
            "purple" => Self::Purple,
            "blue" => Self::Blue,
            _ => Self::Slate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTag {
    pub label: String,
    pub color: TagColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
    pub currency: String,
}

impl BudgetRange {
    pub const DEFAULT_CURRENCY: &'static str = "¥";

    pub fn display(&self) -> String {
        format!(
            "{}{} - {}",
            self.currency,
            group_thousands(self.min),
            group_thousands(self.max)
        )
    }
}

fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPin {
    pub id: Option<PinId>,
    pub name: String,
    pub title: String,
    pub coordinate: Option<Coordinate>,
    pub description: String,
    pub strategy: String,
    pub duration: String,
    pub stop_label: String,
    /// Explicit display sequence, always positive when present.
    pub sequence: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub time: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<EventTag>,
    pub is_extra: bool,
    pub pin_ref: Option<PinId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub header: String,
    pub subtitle: String,
    pub date_label: String,
    pub pins: Vec<MapPin>,
    pub timeline: Vec<TimelineEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub title: String,
    pub date_display: String,
    pub map_center: Option<Coordinate>,
    pub budget: Option<BudgetRange>,
    pub days: Vec<Day>,
}

impl Itinerary {
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }
}
