use shared::domain::Coordinate;

pub const DEFAULT_CENTER: Coordinate = Coordinate::new(116.397428, 39.90923);
pub const DEFAULT_ZOOM: f64 = 11.0;
pub const MIN_ZOOM: f64 = 3.0;
pub const MAX_ZOOM: f64 = 18.0;
/// Minimum zoom after focusing a pin from the timeline.
pub const FOCUS_ZOOM: f64 = 14.0;
/// Minimum zoom after jumping to the user's own position.
pub const LOCATE_ZOOM: f64 = 12.0;
/// Center deltas at or below this many degrees are not pushed to the widget.
pub const CENTER_EPSILON: f64 = 0.0001;

/// Map center and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: f64,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapView {
    pub fn new(center: Coordinate, zoom: f64) -> Self {
        Self {
            center,
            zoom: clamp_zoom(zoom),
        }
    }

    pub fn with_zoom(self, zoom: f64) -> Self {
        Self::new(self.center, zoom)
    }

    pub fn zoom_in(self) -> Self {
        self.with_zoom(self.zoom + 1.0)
    }

    pub fn zoom_out(self) -> Self {
        self.with_zoom(self.zoom - 1.0)
    }

    /// Centers on `center` and zooms in to at least [`FOCUS_ZOOM`].
    pub fn focus_on(self, center: Coordinate) -> Self {
        Self::new(center, self.zoom.max(FOCUS_ZOOM))
    }

    /// Centers on the user's position and zooms in to at least
    /// [`LOCATE_ZOOM`].
    pub fn locate(self, position: Coordinate) -> Self {
        Self::new(position, self.zoom.max(LOCATE_ZOOM))
    }

    pub fn recenter(self, center: Coordinate) -> Self {
        Self { center, ..self }
    }

    /// True when `live` has drifted far enough from `self` to be pushed.
    pub fn differs_from(&self, live: &MapView) -> bool {
        self.center.differs_from(&live.center, CENTER_EPSILON) || self.zoom != live.zoom
    }
}

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(MIN_ZOOM, MAX_ZOOM)
    } else {
        DEFAULT_ZOOM
    }
}
