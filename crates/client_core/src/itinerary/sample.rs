use shared::domain::{Day, Itinerary};
use tracing::error;

use super::document::parse_itinerary;

pub const SAMPLE_ITINERARY_JSON: &str = include_str!("../../assets/sample_itinerary.json");

/// The bundled sample trip.
pub fn sample_itinerary() -> Itinerary {
    match parse_itinerary(SAMPLE_ITINERARY_JSON) {
        Ok(itinerary) => itinerary,
        Err(error) => {
            error!(%error, "bundled sample itinerary is unreadable");
            placeholder()
        }
    }
}

fn placeholder() -> Itinerary {
    Itinerary {
        title: "Untitled trip".into(),
        date_display: String::new(),
        map_center: None,
        budget: None,
        days: vec![Day {
            header: "Day 1".into(),
            subtitle: String::new(),
            date_label: String::new(),
            pins: Vec::new(),
            timeline: Vec::new(),
        }],
    }
}
