//! Painted map widget: a static-map backdrop with numbered marker badges on
//! top, driven through the `MapWidget` seam.

use client_core::map::{
    projection::{fit_bounds, offset_from_center, pan},
    static_map::StaticMapRequest,
    ClickId, MapEvent, MapView, MapWidget, MarkerEmphasis, MarkerHandle, MarkerSpec, MARKER_SIZE,
};
use eframe::egui;
use tracing::debug;

pub mod loader;

pub use loader::{decode_backdrop, StaticMapLoader};

/// Padding kept around markers when fitting them into view.
pub const FIT_PADDING: f64 = 48.0;
/// Scroll distance, in points, per zoom level.
const SCROLL_PER_ZOOM_LEVEL: f64 = 240.0;
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(226, 232, 240);

/// Backdrop image decoded off the UI thread.
#[derive(Clone)]
pub struct DecodedBackdrop {
    pub request: StaticMapRequest,
    pub image: egui::ColorImage,
}

pub struct CanvasMap {
    view: MapView,
    viewport: egui::Vec2,
    markers: Vec<(MarkerHandle, MarkerSpec)>,
    next_handle: u64,
    next_click: ClickId,
    events: Vec<MapEvent>,
    backdrop: Option<DecodedBackdrop>,
    texture: Option<egui::TextureHandle>,
    backdrop_in_flight: bool,
    failed_request: Option<StaticMapRequest>,
    destroyed: bool,
}

impl CanvasMap {
    pub fn new(view: MapView, viewport: egui::Vec2, backdrop: Option<DecodedBackdrop>) -> Self {
        Self {
            view,
            viewport,
            markers: Vec::new(),
            next_handle: 0,
            next_click: 0,
            events: Vec::new(),
            backdrop,
            texture: None,
            backdrop_in_flight: false,
            failed_request: None,
            destroyed: false,
        }
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerSpec> + '_ {
        self.markers.iter().map(|(_, spec)| spec)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    pub fn set_backdrop(&mut self, backdrop: DecodedBackdrop) {
        self.backdrop = Some(backdrop);
        self.texture = None;
        self.backdrop_in_flight = false;
        self.failed_request = None;
    }

    pub fn backdrop_failed(&mut self, request: StaticMapRequest) {
        self.backdrop_in_flight = false;
        self.failed_request = Some(request);
    }

    /// A backdrop request for the current view when the painted one no
    /// longer covers it. Marks the request as in flight.
    pub fn wanted_backdrop(&mut self) -> Option<StaticMapRequest> {
        if self.backdrop_in_flight || self.destroyed {
            return None;
        }
        let wanted = StaticMapRequest::for_view(
            &self.view,
            self.viewport.x.round() as u32,
            self.viewport.y.round() as u32,
        );
        if self.failed_request == Some(wanted) {
            return None;
        }
        let stale = match &self.backdrop {
            None => true,
            Some(current) => {
                let (dx, dy) = offset_from_center(&self.view, current.request.center);
                current.request.zoom != wanted.zoom
                    || dx.abs() > f64::from(current.request.width) / 4.0
                    || dy.abs() > f64::from(current.request.height) / 4.0
            }
        };
        if stale {
            self.backdrop_in_flight = true;
            Some(wanted)
        } else {
            None
        }
    }

    /// Screen position of a coordinate inside a map drawn in `map_rect`.
    pub fn screen_pos(&self, map_rect: egui::Rect, spec: &MarkerSpec) -> egui::Pos2 {
        let (dx, dy) = offset_from_center(&self.view, spec.coordinate);
        map_rect.center() + egui::vec2(dx as f32, dy as f32)
    }

    /// Topmost marker under `pos`. Among equal stacking orders the one
    /// added last is painted on top.
    pub fn hit_test(&self, map_rect: egui::Rect, pos: egui::Pos2) -> Option<&MarkerSpec> {
        self.markers
            .iter()
            .map(|(_, spec)| spec)
            .filter(|spec| marker_rect(self.screen_pos(map_rect, spec), spec).contains(pos))
            .max_by_key(|spec| spec.z_index())
    }

    /// One physical click: the marker event, if any, strictly before the
    /// background event, both with the same click id.
    pub fn click(&mut self, map_rect: egui::Rect, pos: egui::Pos2) -> ClickId {
        self.next_click += 1;
        let click = self.next_click;
        if let Some(key) = self.hit_test(map_rect, pos).map(|spec| spec.key.clone()) {
            self.events.push(MapEvent::MarkerClicked { key, click });
        }
        self.events.push(MapEvent::BackgroundClicked { click });
        click
    }

    pub fn drag(&mut self, delta: egui::Vec2) {
        if delta == egui::Vec2::ZERO {
            return;
        }
        self.view = pan(&self.view, f64::from(delta.x), f64::from(delta.y));
        self.events.push(MapEvent::ViewChanged(self.view));
    }

    pub fn zoom_by(&mut self, scroll: f32) {
        let next = self.view.with_zoom(self.view.zoom + f64::from(scroll) / SCROLL_PER_ZOOM_LEVEL);
        if next != self.view {
            self.view = next;
            self.events.push(MapEvent::ViewChanged(self.view));
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        self.viewport = rect.size();

        if response.dragged() {
            self.drag(response.drag_delta());
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.zoom_by(scroll);
            }
        }
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.click(rect, pos);
            }
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, egui::CornerRadius::ZERO, BACKGROUND);
        self.paint_backdrop(ui.ctx(), &painter, rect);

        let mut ordered: Vec<&MarkerSpec> = self.markers().collect();
        ordered.sort_by_key(|spec| spec.z_index());
        for spec in ordered {
            paint_marker(&painter, marker_rect(self.screen_pos(rect, spec), spec), spec);
        }

        if let Some(hover) = response.hover_pos() {
            if let Some(spec) = self.hit_test(rect, hover) {
                let badge = marker_rect(self.screen_pos(rect, spec), spec);
                let font = egui::FontId::proportional(13.0);
                let galley = painter.layout_no_wrap(spec.title.clone(), font, egui::Color32::WHITE);
                let label = egui::Rect::from_min_size(
                    badge.center_top() - egui::vec2(galley.size().x / 2.0 + 6.0, galley.size().y + 10.0),
                    galley.size() + egui::vec2(12.0, 6.0),
                );
                painter.rect_filled(label, egui::CornerRadius::same(4), egui::Color32::from_black_alpha(200));
                painter.galley(label.min + egui::vec2(6.0, 3.0), galley, egui::Color32::WHITE);
            }
        }

        response
    }

    fn paint_backdrop(&mut self, ctx: &egui::Context, painter: &egui::Painter, rect: egui::Rect) {
        let Some(backdrop) = &self.backdrop else {
            return;
        };
        let texture = self.texture.get_or_insert_with(|| {
            ctx.load_texture(
                "map-backdrop",
                backdrop.image.clone(),
                egui::TextureOptions::LINEAR,
            )
        });
        let request = backdrop.request;
        let scale = 2f64.powf(self.view.zoom - f64::from(request.zoom)) as f32;
        let (dx, dy) = offset_from_center(&self.view, request.center);
        let image_rect = egui::Rect::from_center_size(
            rect.center() + egui::vec2(dx as f32, dy as f32),
            egui::vec2(request.width as f32 * scale, request.height as f32 * scale),
        );
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }
}

impl MapWidget for CanvasMap {
    fn view(&self) -> MapView {
        self.view
    }

    fn set_view(&mut self, view: MapView) {
        self.view = view;
    }

    fn add_marker(&mut self, spec: MarkerSpec) -> MarkerHandle {
        self.next_handle += 1;
        let handle = MarkerHandle(self.next_handle);
        self.markers.push((handle, spec));
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        self.markers.retain(|(h, _)| *h != handle);
    }

    fn fit_to_markers(&mut self, handles: &[MarkerHandle]) -> MapView {
        let coordinates: Vec<_> = self
            .markers
            .iter()
            .filter(|(handle, _)| handles.contains(handle))
            .map(|(_, spec)| spec.coordinate)
            .collect();
        if let Some(fitted) = fit_bounds(
            &coordinates,
            f64::from(self.viewport.x),
            f64::from(self.viewport.y),
            FIT_PADDING,
        ) {
            self.view = fitted;
        }
        self.view
    }

    fn drain_events(&mut self) -> Vec<MapEvent> {
        std::mem::take(&mut self.events)
    }

    fn destroy(&mut self) {
        debug!(markers = self.markers.len(), "destroying canvas map");
        self.markers.clear();
        self.events.clear();
        self.texture = None;
        self.backdrop = None;
        self.destroyed = true;
    }
}

/// Badge rectangle: the marker's offset anchors a standard badge on the
/// coordinate, and emphasis grows it around the same center.
pub fn marker_rect(anchor: egui::Pos2, spec: &MarkerSpec) -> egui::Rect {
    let base = egui::Rect::from_min_size(
        anchor + egui::vec2(spec.offset.0, spec.offset.1),
        egui::vec2(MARKER_SIZE, MARKER_SIZE),
    );
    let size = spec.emphasis.size();
    egui::Rect::from_center_size(base.center(), egui::vec2(size, size))
}

fn marker_colors(emphasis: MarkerEmphasis) -> (egui::Color32, egui::Color32) {
    match emphasis {
        MarkerEmphasis::Focused => (egui::Color32::from_rgb(234, 88, 12), egui::Color32::WHITE),
        MarkerEmphasis::ActiveDay => (egui::Color32::from_rgb(37, 99, 235), egui::Color32::WHITE),
        MarkerEmphasis::Other => (
            egui::Color32::from_rgb(148, 163, 184),
            egui::Color32::from_rgb(30, 41, 59),
        ),
    }
}

fn paint_marker(painter: &egui::Painter, rect: egui::Rect, spec: &MarkerSpec) {
    let (fill, text) = marker_colors(spec.emphasis);
    let radius = rect.width() / 2.0;
    painter.circle_filled(rect.center(), radius, fill);
    painter.circle_stroke(rect.center(), radius, egui::Stroke::new(2.0, egui::Color32::WHITE));
    painter.text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        &spec.label,
        egui::FontId::proportional(if spec.emphasis == MarkerEmphasis::Focused { 18.0 } else { 15.0 }),
        text,
    );
}
