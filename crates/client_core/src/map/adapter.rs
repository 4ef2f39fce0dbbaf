use tracing::{debug, info, warn};

use super::{
    MapEvent, MapUnavailable, MapView, MapWidget, MarkerEmphasis, MarkerHandle, MarkerSpec,
    MARKER_OFFSET,
};
use crate::itinerary::{focus::FocusController, sequence::PinSequence};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterState {
    Loading,
    Ready,
    Unavailable(MapUnavailable),
    Disposed,
}

/// Sole owner of the map widget and its markers.
///
/// Markers are rebuilt wholesale whenever the marker specs derived from the
/// pin sequence and focus state change. The first non-empty marker set of a
/// document is fitted into view once; [`MapAdapter::rearm_fit`] re-arms that
/// for the next document.
pub struct MapAdapter<W: MapWidget> {
    widget: Option<W>,
    state: AdapterState,
    markers: Vec<MarkerHandle>,
    rendered: Vec<MarkerSpec>,
    fitted: bool,
}

impl<W: MapWidget> Default for MapAdapter<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: MapWidget> MapAdapter<W> {
    pub fn new() -> Self {
        Self {
            widget: None,
            state: AdapterState::Loading,
            markers: Vec::new(),
            rendered: Vec::new(),
            fitted: false,
        }
    }

    pub fn state(&self) -> &AdapterState {
        &self.state
    }

    /// Takes the loader's outcome. Only the first outcome while loading is
    /// accepted.
    pub fn attach(&mut self, loaded: Result<W, MapUnavailable>) {
        if self.state != AdapterState::Loading {
            debug!(state = ?self.state, "ignoring late map widget");
            if let Ok(mut widget) = loaded {
                widget.destroy();
            }
            return;
        }
        match loaded {
            Ok(widget) => {
                info!("map widget ready");
                self.widget = Some(widget);
                self.state = AdapterState::Ready;
            }
            Err(reason) => {
                warn!(%reason, "map unavailable");
                self.state = AdapterState::Unavailable(reason);
            }
        }
    }

    pub fn widget(&self) -> Option<&W> {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut W> {
        self.widget.as_mut()
    }

    pub fn rearm_fit(&mut self) {
        self.fitted = false;
    }

    /// Brings markers in line with the pin sequence and focus state. When
    /// this produces the document's first fit, `desired` is replaced with the
    /// fitted view.
    pub fn set_markers(
        &mut self,
        sequence: &PinSequence,
        focus: &FocusController,
        desired: &mut MapView,
    ) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };

        let specs = marker_specs(sequence, focus);
        if specs != self.rendered {
            for handle in self.markers.drain(..) {
                widget.remove_marker(handle);
            }
            self.markers = specs
                .iter()
                .cloned()
                .map(|spec| widget.add_marker(spec))
                .collect();
            debug!(count = self.markers.len(), "rebuilt map markers");
            self.rendered = specs;
        }

        if !self.fitted && !self.markers.is_empty() {
            let fitted = widget.fit_to_markers(&self.markers);
            debug!(?fitted, "fitted markers into view");
            *desired = fitted;
            self.fitted = true;
        }
    }

    /// Pushes `desired` to the widget when it has drifted.
    pub fn set_view(&mut self, desired: MapView) {
        if let Some(widget) = self.widget.as_mut() {
            if desired.differs_from(&widget.view()) {
                widget.set_view(desired);
            }
        }
    }

    /// Drains widget events. View changes from user gestures are copied into
    /// `desired`; clicks are returned for the focus logic.
    pub fn handle_events(&mut self, desired: &mut MapView) -> Vec<MapEvent> {
        let Some(widget) = self.widget.as_mut() else {
            return Vec::new();
        };
        let events = widget.drain_events();
        for event in &events {
            if let MapEvent::ViewChanged(view) = event {
                *desired = *view;
            }
        }
        events
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Tears the widget down. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.state == AdapterState::Disposed {
            return;
        }
        if let Some(mut widget) = self.widget.take() {
            for handle in self.markers.drain(..) {
                widget.remove_marker(handle);
            }
            widget.destroy();
            debug!("map widget disposed");
        }
        self.rendered.clear();
        self.state = AdapterState::Disposed;
    }
}

impl<W: MapWidget> Drop for MapAdapter<W> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Marker specs for every mappable pin in display order.
pub fn marker_specs(sequence: &PinSequence, focus: &FocusController) -> Vec<MarkerSpec> {
    sequence
        .mappable()
        .filter_map(|pin| {
            let coordinate = pin.coordinate()?;
            let emphasis = if focus.focused() == Some(&pin.key) {
                MarkerEmphasis::Focused
            } else if pin.day_index == focus.active_day() {
                MarkerEmphasis::ActiveDay
            } else {
                MarkerEmphasis::Other
            };
            Some(MarkerSpec {
                key: pin.key.clone(),
                coordinate,
                label: pin.sequence.to_string(),
                title: pin.pin.name.clone(),
                emphasis,
                offset: MARKER_OFFSET,
            })
        })
        .collect()
}

#[cfg(test)]
#[path = "../tests/adapter_tests.rs"]
mod tests;
