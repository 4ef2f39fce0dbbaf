use std::time::Duration;

use client_core::{
    itinerary::{DocumentSource, ItinerarySession},
    map::MapAdapter,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::protocol::{SearchSuggestion, TripLocation, RECOMMENDATION_FILTERS};
use tracing::debug;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiError, UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};
use crate::map_canvas::CanvasMap;
use crate::ui::itinerary::TimelineLayout;

/// Backdrop size for the first map load, before the map panel is laid out.
pub const INITIAL_MAP_SIZE: (u32, u32) = (800, 600);

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub default_city: String,
    pub map_configured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Landing,
    Destinations,
    Itinerary,
}

#[derive(Debug, Default)]
pub struct LandingState {
    pub search: String,
    pub suggestions: Vec<SearchSuggestion>,
}

#[derive(Debug, Default)]
pub struct DestinationState {
    pub city: String,
    /// Index into [`RECOMMENDATION_FILTERS`].
    pub filter: usize,
    pub recommendations: Vec<TripLocation>,
    pub loading: bool,
    pub basket: Vec<TripLocation>,
}

impl DestinationState {
    pub fn active_tags(&self) -> Option<String> {
        filter_tags(self.filter)
    }

    pub fn in_basket(&self, id: &str) -> bool {
        self.basket.iter().any(|location| location.id == id)
    }

    pub fn toggle_basket(&mut self, location: &TripLocation) {
        match self.basket.iter().position(|l| l.id == location.id) {
            Some(index) => {
                self.basket.remove(index);
            }
            None => self.basket.push(location.clone()),
        }
    }

    pub fn basket_days(&self) -> u32 {
        self.basket.iter().map(|l| l.days_recommended).sum()
    }
}

/// Tag sent for a filter chip; "All" sends none.
pub fn filter_tags(index: usize) -> Option<String> {
    match RECOMMENDATION_FILTERS.get(index) {
        None | Some(&"All") => None,
        Some(tag) => Some((*tag).to_string()),
    }
}

pub fn source_notice(source: DocumentSource) -> &'static str {
    match source {
        DocumentSource::Persisted => "Showing your saved itinerary",
        DocumentSource::Sample => "Showing the sample itinerary",
        DocumentSource::SampleAfterCorruptPayload => {
            "Saved itinerary could not be read; showing the sample itinerary"
        }
    }
}

pub struct ItineraryScreen {
    pub session: Option<ItinerarySession>,
    pub loading: bool,
    pub map: MapAdapter<CanvasMap>,
    pub map_requested: bool,
    pub layout: TimelineLayout,
}

pub struct PlannerApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    pub(super) status: String,
    pub(super) screen: Screen,
    pub(super) default_city: String,
    pub(super) map_configured: bool,
    pub(super) landing: LandingState,
    pub(super) destinations: DestinationState,
    pub(super) itinerary: ItineraryScreen,
}

impl PlannerApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            status: "Starting".to_string(),
            screen: Screen::Landing,
            default_city: startup.default_city,
            map_configured: startup.map_configured,
            landing: LandingState::default(),
            destinations: DestinationState::default(),
            itinerary: ItineraryScreen {
                session: None,
                loading: false,
                map: MapAdapter::new(),
                map_requested: false,
                layout: TimelineLayout::default(),
            },
        }
    }

    pub(super) fn send(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status);
    }

    pub(super) fn open_destinations(&mut self, city: String) {
        let city = match city.trim() {
            "" => self.default_city.clone(),
            city => city.to_string(),
        };
        self.landing.suggestions.clear();
        self.send(BackendCommand::CancelSuggestions);
        self.destinations.city = city;
        self.screen = Screen::Destinations;
        self.request_recommendations();
    }

    pub(super) fn request_recommendations(&mut self) {
        self.destinations.recommendations.clear();
        self.destinations.loading = true;
        let cmd = BackendCommand::RecommendLocations {
            city: self.destinations.city.clone(),
            tags: self.destinations.active_tags(),
        };
        self.send(cmd);
    }

    pub(super) fn open_itinerary(&mut self) {
        self.screen = Screen::Itinerary;
        if self.itinerary.session.is_some() {
            self.request_map();
        } else if !self.itinerary.loading {
            self.reload_itinerary();
        }
    }

    /// Tears the map down with the screen; the session stays so coming
    /// back only reloads the widget.
    pub(super) fn leave_itinerary(&mut self, to: Screen) {
        self.itinerary.map.dispose();
        self.itinerary.map = MapAdapter::new();
        self.itinerary.map_requested = false;
        self.itinerary.layout = TimelineLayout::default();
        self.screen = to;
    }

    fn report(&mut self, err: UiError) {
        self.status = err.status_line();
    }

    pub(super) fn reload_itinerary(&mut self) {
        self.itinerary.loading = true;
        self.send(BackendCommand::LoadItinerary);
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => self.status = message,
                UiEvent::Error(err) => self.report(err),
                UiEvent::Suggestions { query, items } => {
                    if self.screen == Screen::Landing && query == self.landing.search.trim() {
                        self.landing.suggestions = items;
                    }
                }
                UiEvent::Recommendations { city, tags, items } => {
                    if city == self.destinations.city && tags == self.destinations.active_tags() {
                        self.destinations.recommendations = items;
                        self.destinations.loading = false;
                    }
                }
                UiEvent::ItineraryLoaded(loaded) => {
                    self.itinerary.loading = false;
                    self.status = source_notice(loaded.source).to_string();
                    match self.itinerary.session.as_mut() {
                        Some(session) => session.replace(loaded),
                        None => self.itinerary.session = Some(ItinerarySession::new(loaded)),
                    }
                    self.itinerary.layout = TimelineLayout::default();
                    self.request_map();
                }
                UiEvent::MapLoaded(result) => {
                    if self.screen != Screen::Itinerary {
                        debug!("dropping map loaded after leaving the itinerary");
                        continue;
                    }
                    if let Err(reason) = &result {
                        self.report(UiError::from_message(UiErrorContext::Map, reason.to_string()));
                    }
                    self.itinerary.map.attach(result);
                }
                UiEvent::BackdropLoaded(backdrop) => {
                    if let Some(widget) = self.itinerary.map.widget_mut() {
                        widget.set_backdrop(backdrop);
                    }
                }
                UiEvent::BackdropFailed(request, reason) => {
                    if let Some(widget) = self.itinerary.map.widget_mut() {
                        widget.backdrop_failed(request);
                    }
                    self.report(UiError::from_message(
                        UiErrorContext::Map,
                        format!("backdrop unavailable: {reason}"),
                    ));
                }
                UiEvent::Located(position) => {
                    if let Some(session) = self.itinerary.session.as_mut() {
                        session.show_location(position);
                    }
                }
            }
        }
    }

    /// The widget is loaded once; later documents reuse it.
    fn request_map(&mut self) {
        if self.itinerary.map_requested {
            return;
        }
        let Some(session) = &self.itinerary.session else {
            return;
        };
        self.itinerary.map_requested = true;
        let (width, height) = INITIAL_MAP_SIZE;
        let cmd = BackendCommand::LoadMap {
            initial: session.view(),
            width,
            height,
        };
        self.send(cmd);
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(&self.status);
                if !self.map_configured {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.small("No map key configured");
                    });
                }
            });
        });
    }
}

impl eframe::App for PlannerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.show_status_bar(ctx);

        match self.screen {
            Screen::Landing => self.show_landing(ctx),
            Screen::Destinations => self.show_destinations(ctx),
            Screen::Itinerary => self.show_itinerary(ctx),
        }

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
