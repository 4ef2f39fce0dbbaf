//! Map widget seam.
//!
//! The adapter in [`adapter`] only talks to a widget through [`MapWidget`], and
//! widgets are produced by a [`MapWidgetLoader`]. The desktop shell paints its
//! own canvas widget; tests use in-memory fakes.

use async_trait::async_trait;
use shared::domain::{Coordinate, PinKey};
use thiserror::Error;

use crate::config::MapCredentials;

pub mod adapter;
pub mod projection;
pub mod static_map;
pub mod view;

pub use adapter::{AdapterState, MapAdapter};
pub use view::MapView;

/// Identifies one physical click on the map surface. A widget tags the
/// marker-click and background-click events of the same click with the same id.
pub type ClickId = u64;

pub const MARKER_SIZE: f32 = 40.0;
pub const FOCUSED_MARKER_SIZE: f32 = 48.0;
/// Markers are 40x40 badges anchored by their top-left corner.
pub const MARKER_OFFSET: (f32, f32) = (-20.0, -20.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerEmphasis {
    Focused,
    ActiveDay,
    Other,
}

impl MarkerEmphasis {
    pub fn z_index(self) -> i32 {
        match self {
            Self::Focused => 200,
            Self::ActiveDay => 120,
            Self::Other => 50,
        }
    }

    pub fn size(self) -> f32 {
        match self {
            Self::Focused => FOCUSED_MARKER_SIZE,
            Self::ActiveDay | Self::Other => MARKER_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub key: PinKey,
    pub coordinate: Coordinate,
    /// Resolved display sequence shown inside the badge.
    pub label: String,
    /// Shown on hover.
    pub title: String,
    pub emphasis: MarkerEmphasis,
    pub offset: (f32, f32),
}

impl MarkerSpec {
    pub fn z_index(&self) -> i32 {
        self.emphasis.z_index()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    MarkerClicked { key: PinKey, click: ClickId },
    BackgroundClicked { click: ClickId },
    /// The user panned or zoomed the widget.
    ViewChanged(MapView),
}

/// Every way the map can fail to come up. All of them end in the same
/// degraded state; none are retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MapUnavailable {
    #[error("no map key configured")]
    MissingKey,
    #[error("map loader rejected: {0}")]
    LoadRejected(String),
    #[error("map widget construction failed: {0}")]
    ConstructionFailed(String),
}

pub trait MapWidget {
    fn view(&self) -> MapView;
    fn set_view(&mut self, view: MapView);
    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerHandle;
    fn remove_marker(&mut self, handle: MarkerHandle);
    /// Fits the given markers in view and returns the resulting view.
    fn fit_to_markers(&mut self, handles: &[MarkerHandle]) -> MapView;
    /// Click and view-change events since the last call, in dispatch order.
    fn drain_events(&mut self) -> Vec<MapEvent>;
    fn destroy(&mut self);
}

#[async_trait]
pub trait MapWidgetLoader: Send + Sync {
    type Widget: MapWidget + Send;

    async fn load(
        &self,
        credentials: &MapCredentials,
        initial: MapView,
    ) -> Result<Self::Widget, MapUnavailable>;
}

/// Loads a widget, mapping a missing key to [`MapUnavailable::MissingKey`]
/// without calling the loader.
pub async fn load_widget<L: MapWidgetLoader>(
    loader: &L,
    credentials: Option<&MapCredentials>,
    initial: MapView,
) -> Result<L::Widget, MapUnavailable> {
    let credentials = credentials.ok_or(MapUnavailable::MissingKey)?;
    loader.load(credentials, initial).await
}
