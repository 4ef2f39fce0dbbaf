use shared::domain::{Coordinate, Itinerary, PinKey};
use tracing::{debug, info};

use super::{
    correlate::pin_for_event,
    focus::{FocusController, InputSource},
    scroll::{ScrollSync, ScrollTarget},
    sequence::{PinSequence, SequencedPin},
    store::{DocumentSource, LoadedItinerary},
};
use crate::map::{ClickId, MapAdapter, MapEvent, MapView, MapWidget};

/// Everything the itinerary screen tracks for one loaded document: the
/// derived pin sequence, focus state, desired map view and any scroll the
/// next frame has to perform.
#[derive(Debug)]
pub struct ItinerarySession {
    itinerary: Itinerary,
    source: DocumentSource,
    sequence: PinSequence,
    focus: FocusController,
    scroll: ScrollSync,
    view: MapView,
    pending_scroll: Option<ScrollTarget>,
    refit_pending: bool,
}

impl ItinerarySession {
    pub fn new(loaded: LoadedItinerary) -> Self {
        let sequence = PinSequence::build(&loaded.itinerary.days);
        let focus = FocusController::new(loaded.itinerary.day_count());
        let mut session = Self {
            itinerary: loaded.itinerary,
            source: loaded.source,
            sequence,
            focus,
            scroll: ScrollSync::new(),
            view: MapView::default(),
            pending_scroll: None,
            refit_pending: false,
        };
        session.recenter();
        session
    }

    pub fn replace(&mut self, loaded: LoadedItinerary) {
        info!(days = loaded.itinerary.day_count(), source = ?loaded.source, "replacing itinerary");
        self.sequence = PinSequence::build(&loaded.itinerary.days);
        self.focus.replace_document(loaded.itinerary.day_count());
        self.itinerary = loaded.itinerary;
        self.source = loaded.source;
        self.pending_scroll = None;
        self.scroll.interrupt();
        self.refit_pending = true;
        self.recenter();
    }

    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    pub fn source(&self) -> DocumentSource {
        self.source
    }

    pub fn sequence(&self) -> &PinSequence {
        &self.sequence
    }

    pub fn focus(&self) -> &FocusController {
        &self.focus
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    /// Desired view, for the map adapter to fit into or copy gestures into.
    pub fn view_mut(&mut self) -> &mut MapView {
        &mut self.view
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollSync {
        &mut self.scroll
    }

    pub fn active_day(&self) -> usize {
        self.focus.active_day()
    }

    /// Pin whose detail overlay is open.
    pub fn detail_pin(&self) -> Option<&SequencedPin> {
        self.focus.selected().and_then(|key| self.sequence.get(key))
    }

    pub fn linked_pin(&self, day_index: usize, event_index: usize) -> Option<&SequencedPin> {
        let event = self.itinerary.day(day_index)?.timeline.get(event_index)?;
        pin_for_event(&self.sequence, day_index, event)
    }

    pub fn is_event_focused(&self, day_index: usize, event_index: usize) -> bool {
        match (self.linked_pin(day_index, event_index), self.focus.focused()) {
            (Some(pin), Some(focused)) => &pin.key == focused,
            _ => false,
        }
    }

    pub fn apply_map_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::MarkerClicked { key, click } => self.marker_clicked(click, &key),
            MapEvent::BackgroundClicked { click } => {
                self.focus.background_clicked(click);
            }
            MapEvent::ViewChanged(view) => self.view = view,
        }
    }

    pub fn marker_clicked(&mut self, click: ClickId, key: &PinKey) {
        let Some(pin) = self.sequence.get(key) else {
            debug!(%key, "click on unknown marker");
            return;
        };
        let pin = pin.clone();
        if let Some(target) = self.focus.marker_clicked(click, &pin, &self.itinerary.days) {
            self.pending_scroll = Some(ScrollTarget::Event(target));
        }
    }

    pub fn background_clicked(&mut self, click: ClickId) {
        self.focus.background_clicked(click);
    }

    /// Focuses the card's linked pin and centers the map on it. Returns false
    /// for unlinked cards and pins without coordinates.
    pub fn timeline_clicked(&mut self, day_index: usize, event_index: usize) -> bool {
        let Some(pin) = self.linked_pin(day_index, event_index).cloned() else {
            return false;
        };
        let Some(coordinate) = pin.coordinate() else {
            return false;
        };
        if !self.focus.timeline_clicked(&pin) {
            return false;
        }
        self.view = self.view.focus_on(coordinate);
        true
    }

    pub fn day_tab_clicked(&mut self, day_index: usize) {
        if self.focus.set_active_day(day_index, InputSource::DayTab) {
            self.recenter();
        }
        self.pending_scroll = Some(ScrollTarget::Day(self.focus.active_day()));
    }

    /// Feeds one frame's section distances to the scroll observer.
    pub fn observe_scroll(&mut self, distances: &[f32]) {
        if let Some(day_index) = self.scroll.observe(distances, self.focus.active_day()) {
            if self.focus.set_active_day(day_index, InputSource::Scroll) {
                self.recenter();
            }
        }
    }

    /// One frame of map reconciliation: widget events in, then markers and
    /// view out.
    pub fn sync_map<W: MapWidget>(&mut self, adapter: &mut MapAdapter<W>) {
        if std::mem::take(&mut self.refit_pending) {
            adapter.rearm_fit();
        }
        for event in adapter.handle_events(&mut self.view) {
            self.apply_map_event(event);
        }
        adapter.set_markers(&self.sequence, &self.focus, &mut self.view);
        adapter.set_view(self.view);
    }

    pub fn take_pending_scroll(&mut self) -> Option<ScrollTarget> {
        self.pending_scroll.take()
    }

    /// Moves the map to the user's position. Focus and day are untouched.
    pub fn show_location(&mut self, position: Coordinate) {
        self.view = self.view.locate(position);
    }

    pub fn close_details(&mut self) {
        self.focus.close_details();
    }

    pub fn zoom_in(&mut self) {
        self.view = self.view.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.view = self.view.zoom_out();
    }

    fn recenter(&mut self) {
        if let Some(center) = self.recenter_target() {
            self.view = self.view.recenter(center);
        }
    }

    /// The document's center if it has one, else the active day's first
    /// pin with coordinates.
    fn recenter_target(&self) -> Option<Coordinate> {
        self.itinerary.map_center.or_else(|| {
            self.itinerary
                .day(self.focus.active_day())?
                .pins
                .iter()
                .find_map(|pin| pin.coordinate)
        })
    }
}

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod tests;
