//! Backend commands queued from UI to backend worker.

use client_core::map::{static_map::StaticMapRequest, MapView};

pub enum BackendCommand {
    /// Debounced; short queries clear the list without a request.
    SearchSuggestions {
        query: String,
    },
    /// Drops any pending suggestion lookup.
    CancelSuggestions,
    /// Debounced. `tags` is `None` for the "All" filter.
    RecommendLocations {
        city: String,
        tags: Option<String>,
    },
    LoadItinerary,
    LoadMap {
        initial: MapView,
        width: u32,
        height: u32,
    },
    FetchBackdrop {
        request: StaticMapRequest,
    },
    /// Best-effort; failures are only logged.
    Locate,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SearchSuggestions { .. } => "search_suggestions",
            Self::CancelSuggestions => "cancel_suggestions",
            Self::RecommendLocations { .. } => "recommend_locations",
            Self::LoadItinerary => "load_itinerary",
            Self::LoadMap { .. } => "load_map",
            Self::FetchBackdrop { .. } => "fetch_backdrop",
            Self::Locate => "locate",
        }
    }
}
