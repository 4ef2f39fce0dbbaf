//! UI/backend events and error modeling for the planner shell.

use client_core::{
    itinerary::LoadedItinerary,
    map::{static_map::StaticMapRequest, MapUnavailable},
};
use shared::{
    domain::Coordinate,
    protocol::{SearchSuggestion, TripLocation},
};

use crate::map_canvas::{CanvasMap, DecodedBackdrop};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    /// Answer for `query`; stale answers are dropped by the UI.
    Suggestions {
        query: String,
        items: Vec<SearchSuggestion>,
    },
    Recommendations {
        city: String,
        tags: Option<String>,
        items: Vec<TripLocation>,
    },
    ItineraryLoaded(LoadedItinerary),
    MapLoaded(Result<CanvasMap, MapUnavailable>),
    BackdropLoaded(DecodedBackdrop),
    BackdropFailed(StaticMapRequest, String),
    Located(Coordinate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Startup,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Map,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if context == UiErrorContext::BackendStartup
            || lower.contains("startup failure")
        {
            UiErrorCategory::Startup
        } else if lower.contains("invalid")
            || lower.contains("missing")
            || lower.contains("malformed")
            || lower.contains("configured")
            || lower.contains("instead of an image")
        {
            UiErrorCategory::Validation
        } else if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("request")
            || lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line rendering for the status bar.
    pub fn status_line(&self) -> String {
        let label = err_label(self.category);
        match self.context {
            UiErrorContext::BackendStartup => format!("{label} error: {}", self.message),
            UiErrorContext::Map => format!("{label} map error: {}", self.message),
        }
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Startup => "Startup",
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Validation => "Input",
        UiErrorCategory::Unknown => "Unexpected",
    }
}
