//! Itinerary screen: day tabs and the timeline on the left, the map on the
//! right, and the detail overlay for the selected pin.

use std::{collections::HashMap, time::Instant};

use client_core::{
    itinerary::{ItinerarySession, ScrollTarget, SequencedPin},
    map::{static_map::StaticMapRequest, AdapterState, MapAdapter},
};
use eframe::egui;
use shared::domain::TimelineEvent;
use tracing::debug;

use crate::backend_bridge::commands::BackendCommand;
use crate::map_canvas::CanvasMap;
use crate::ui::{
    app::{source_notice, PlannerApp, Screen},
    theme,
};

/// Where the timeline's sections and cards were laid out last frame,
/// relative to the top of the scroll viewport.
#[derive(Debug, Default)]
pub struct TimelineLayout {
    pub offset: f32,
    pub day_tops: Vec<f32>,
    pub event_tops: HashMap<(usize, usize), f32>,
}

impl TimelineLayout {
    pub fn relative_top(&self, target: ScrollTarget) -> Option<f32> {
        match target {
            ScrollTarget::Day(day_index) => self.day_tops.get(day_index).copied(),
            ScrollTarget::Event(target) => self
                .event_tops
                .get(&(target.day_index, target.event_index))
                .copied(),
        }
    }
}

#[derive(Default)]
struct ItineraryActions {
    back: bool,
    reload: bool,
    zoom: Option<bool>,
    locate: bool,
    day_tab: Option<usize>,
    card: Option<(usize, usize)>,
    close_details: bool,
    backdrop: Option<StaticMapRequest>,
}

impl PlannerApp {
    pub(super) fn show_itinerary(&mut self, ctx: &egui::Context) {
        let Some(session) = self.itinerary.session.as_mut() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak("Loading itinerary…");
                });
            });
            return;
        };
        let map = &mut self.itinerary.map;
        let layout = &mut self.itinerary.layout;
        let mut actions = ItineraryActions::default();

        show_header(ctx, session, &mut actions);

        egui::SidePanel::left("timeline_panel")
            .resizable(true)
            .default_width(440.0)
            .min_width(320.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);
                ui.horizontal_wrapped(|ui| {
                    for (index, day) in session.itinerary().days.iter().enumerate() {
                        if ui
                            .selectable_label(index == session.active_day(), &day.header)
                            .clicked()
                        {
                            actions.day_tab = Some(index);
                        }
                    }
                });
                ui.separator();
                actions.card = show_timeline(ui, session, layout);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                actions.backdrop = show_map(ui, session, map);
            });

        if let Some(pin) = session.detail_pin() {
            actions.close_details = show_details(ctx, pin);
        }

        if let Some(day_index) = actions.day_tab {
            session.day_tab_clicked(day_index);
        }
        if let Some((day_index, event_index)) = actions.card {
            if !session.timeline_clicked(day_index, event_index) {
                debug!(day_index, event_index, "timeline card has no mappable pin");
            }
        }
        match actions.zoom {
            Some(true) => session.zoom_in(),
            Some(false) => session.zoom_out(),
            None => {}
        }
        if actions.close_details {
            session.close_details();
        }

        if let Some(request) = actions.backdrop {
            self.send(BackendCommand::FetchBackdrop { request });
        }
        if actions.locate {
            self.send(BackendCommand::Locate);
        }
        if actions.reload {
            self.reload_itinerary();
        }
        if actions.back {
            self.leave_itinerary(Screen::Destinations);
        }
    }
}

fn show_header(ctx: &egui::Context, session: &ItinerarySession, actions: &mut ItineraryActions) {
    let itinerary = session.itinerary();
    egui::TopBottomPanel::top("itinerary_header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("← Destinations").clicked() {
                actions.back = true;
            }
            ui.vertical(|ui| {
                ui.heading(&itinerary.title);
                let mut details = Vec::new();
                if !itinerary.date_display.is_empty() {
                    details.push(itinerary.date_display.clone());
                }
                if let Some(budget) = &itinerary.budget {
                    details.push(budget.display());
                }
                details.push(source_notice(session.source()).to_string());
                ui.weak(details.join("  ·  "));
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Reload").clicked() {
                    actions.reload = true;
                }
                if ui.button("−").on_hover_text("Zoom out").clicked() {
                    actions.zoom = Some(false);
                }
                if ui.button("+").on_hover_text("Zoom in").clicked() {
                    actions.zoom = Some(true);
                }
                if ui.button("Locate").on_hover_text("Center the map on where you are").clicked() {
                    actions.locate = true;
                }
            });
        });
        ui.add_space(6.0);
    });
}

/// Draws every day's section and cards. Performs any pending programmatic
/// scroll and feeds the scroll observer. Returns the clicked card.
fn show_timeline(
    ui: &mut egui::Ui,
    session: &mut ItinerarySession,
    layout: &mut TimelineLayout,
) -> Option<(usize, usize)> {
    let now = Instant::now();
    if let Some(target) = session.take_pending_scroll() {
        match layout.relative_top(target) {
            Some(relative_top) => {
                session
                    .scroll_mut()
                    .scroll_to(target, layout.offset, relative_top, now);
            }
            None => debug!(?target, "scroll target not laid out yet"),
        }
    }

    let mut area = egui::ScrollArea::vertical()
        .id_salt("timeline_scroll")
        .auto_shrink([false, false]);
    let animated = session.scroll_mut().animated_offset(now);
    if let Some(offset) = animated {
        area = area.vertical_scroll_offset(offset);
        ui.ctx().request_repaint();
    }

    let mut clicked = None;
    let mut day_tops = Vec::new();
    let mut event_tops = HashMap::new();
    let output = {
        let session: &ItinerarySession = session;
        area.show(ui, |ui| {
            for (day_index, day) in session.itinerary().days.iter().enumerate() {
                day_tops.push(ui.cursor().top());
                ui.add_space(4.0);
                ui.label(egui::RichText::new(&day.header).strong().size(18.0));
                let subtitle = [day.subtitle.as_str(), day.date_label.as_str()]
                    .into_iter()
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
                    .join("  ·  ");
                if !subtitle.is_empty() {
                    ui.weak(subtitle);
                }
                ui.add_space(6.0);

                for (event_index, event) in day.timeline.iter().enumerate() {
                    event_tops.insert((day_index, event_index), ui.cursor().top());
                    if event_card(ui, session, day_index, event_index, event).clicked() {
                        clicked = Some((day_index, event_index));
                    }
                    ui.add_space(6.0);
                }
                ui.add_space(18.0);
            }
        })
    };

    let pointer_over = ui
        .input(|i| i.pointer.hover_pos())
        .is_some_and(|pos| output.inner_rect.contains(pos));
    if animated.is_some() && pointer_over && ui.input(|i| i.smooth_scroll_delta.y != 0.0) {
        session.scroll_mut().interrupt();
    }

    let viewport_top = output.inner_rect.top();
    let offset = output.state.offset.y;
    if animated.is_none() && (offset - layout.offset).abs() > 0.5 {
        session.scroll_mut().note_scrolled();
    }
    layout.offset = offset;
    layout.day_tops = day_tops.into_iter().map(|top| top - viewport_top).collect();
    layout.event_tops = event_tops
        .into_iter()
        .map(|(key, top)| (key, top - viewport_top))
        .collect();
    session.observe_scroll(&layout.day_tops);

    clicked
}

fn event_card(
    ui: &mut egui::Ui,
    session: &ItinerarySession,
    day_index: usize,
    event_index: usize,
    event: &TimelineEvent,
) -> egui::Response {
    let linked = session.linked_pin(day_index, event_index);
    let focused = session.is_event_focused(day_index, event_index);
    let (fill, stroke) = if focused {
        (theme::ACCENT_SOFT, egui::Stroke::new(2.0, theme::ACCENT))
    } else if event.is_extra {
        (theme::EXTRA_SOFT, egui::Stroke::new(1.0, theme::EXTRA))
    } else if linked.is_some() {
        (ui.visuals().faint_bg_color, egui::Stroke::new(1.0, theme::LINKED_STROKE))
    } else {
        (ui.visuals().faint_bg_color, egui::Stroke::NONE)
    };

    let frame = egui::Frame::NONE
        .fill(fill)
        .stroke(stroke)
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                if let Some(pin) = linked {
                    let badge = if focused { theme::ACCENT } else { egui::Color32::from_rgb(37, 99, 235) };
                    theme::chip(ui, &pin.sequence.to_string(), (badge, egui::Color32::WHITE));
                }
                if !event.time.is_empty() {
                    ui.label(egui::RichText::new(&event.time).monospace().weak());
                }
                ui.label(egui::RichText::new(&event.title).strong());
                if event.is_extra {
                    ui.label(egui::RichText::new("Extra").italics().color(theme::EXTRA));
                }
            });
            if !event.description.is_empty() {
                ui.label(&event.description);
            }
            if !event.tags.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for tag in &event.tags {
                        theme::chip(ui, &tag.label, theme::tag_colors(tag.color));
                    }
                });
            }
        });

    let response = frame.response.interact(egui::Sense::click());
    match linked.and_then(SequencedPin::coordinate) {
        Some(_) => response.on_hover_cursor(egui::CursorIcon::PointingHand),
        None => response,
    }
}

/// Paints the map or its fallback and reconciles it with the session.
/// Returns a backdrop request when the painted one went stale.
fn show_map(
    ui: &mut egui::Ui,
    session: &mut ItinerarySession,
    map: &mut MapAdapter<CanvasMap>,
) -> Option<StaticMapRequest> {
    let message = match map.state() {
        AdapterState::Ready => None,
        AdapterState::Loading => Some("Loading map…".to_string()),
        AdapterState::Unavailable(reason) => Some(format!("Map unavailable: {reason}")),
        AdapterState::Disposed => Some("Map closed".to_string()),
    };
    if let Some(message) = message {
        map_fallback(ui, &message);
        return None;
    }

    let mut backdrop = None;
    let mut had_events = false;
    if let Some(widget) = map.widget_mut() {
        let _response = widget.show(ui);
        had_events = widget.has_pending_events();
        backdrop = widget.wanted_backdrop();
    }
    let markers_before = map.marker_count();
    session.sync_map(map);
    if had_events || map.marker_count() != markers_before {
        ui.ctx().request_repaint();
    }
    backdrop
}

fn map_fallback(ui: &mut egui::Ui, message: &str) {
    let rect = ui.available_rect_before_wrap();
    ui.painter()
        .rect_filled(rect, egui::CornerRadius::ZERO, egui::Color32::from_rgb(226, 232, 240));
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        message,
        egui::FontId::proportional(16.0),
        egui::Color32::from_rgb(71, 85, 105),
    );
}

/// Returns true when the overlay was closed.
fn show_details(ctx: &egui::Context, pin: &SequencedPin) -> bool {
    let mut open = true;
    let mut close = false;
    egui::Window::new(format!("{}. {}", pin.sequence, pin.pin.name))
        .id(egui::Id::new("pin_details"))
        .collapsible(false)
        .resizable(false)
        .default_width(320.0)
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 72.0))
        .open(&mut open)
        .show(ctx, |ui| {
            if !pin.pin.title.is_empty() {
                ui.label(egui::RichText::new(&pin.pin.title).strong());
            }
            let facts = [pin.pin.stop_label.as_str(), pin.pin.duration.as_str()]
                .into_iter()
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("  ·  ");
            if !facts.is_empty() {
                ui.weak(facts);
            }
            if !pin.pin.description.is_empty() {
                ui.add_space(4.0);
                ui.label(&pin.pin.description);
            }
            if !pin.pin.strategy.is_empty() {
                ui.add_space(4.0);
                ui.label(egui::RichText::new("Tip").small().strong());
                ui.label(&pin.pin.strategy);
            }
            ui.add_space(6.0);
            if ui.button("Close").clicked() {
                close = true;
            }
        });
    !open || close
}
