use eframe::egui;
use shared::protocol::{TripLocation, RECOMMENDATION_FILTERS};

use crate::ui::{
    app::{PlannerApp, Screen},
    theme,
};

enum DestinationAction {
    Back,
    Filter(usize),
    Toggle(TripLocation),
    ViewItinerary,
}

impl PlannerApp {
    pub(super) fn show_destinations(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("destinations_header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui.button("← Back").clicked() {
                    actions.push(DestinationAction::Back);
                }
                ui.heading(format!("Destinations around {}", self.destinations.city));
            });
            ui.horizontal(|ui| {
                for (index, filter) in RECOMMENDATION_FILTERS.iter().enumerate() {
                    if ui
                        .selectable_label(self.destinations.filter == index, *filter)
                        .clicked()
                        && self.destinations.filter != index
                    {
                        actions.push(DestinationAction::Filter(index));
                    }
                }
            });
            ui.add_space(6.0);
        });

        egui::SidePanel::right("basket_panel")
            .resizable(false)
            .exact_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.strong("Your trip");
                if self.destinations.basket.is_empty() {
                    ui.weak("Add places to start planning.");
                }
                for location in &self.destinations.basket {
                    ui.horizontal(|ui| {
                        ui.label(&location.name);
                        if ui.small_button("✕").clicked() {
                            actions.push(DestinationAction::Toggle(location.clone()));
                        }
                    });
                }
                ui.separator();
                ui.label(format!("About {} day(s)", self.destinations.basket_days()));
                if ui.button("View itinerary").clicked() {
                    actions.push(DestinationAction::ViewItinerary);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.destinations.loading {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.weak("Finding places…");
                });
                return;
            }
            if self.destinations.recommendations.is_empty() {
                ui.weak("No recommendations right now. Try another filter.");
                return;
            }
            egui::ScrollArea::vertical()
                .id_salt("recommendations_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for location in &self.destinations.recommendations {
                        let in_basket = self.destinations.in_basket(&location.id);
                        if location_card(ui, location, in_basket) {
                            actions.push(DestinationAction::Toggle(location.clone()));
                        }
                        ui.add_space(8.0);
                    }
                });
        });

        for action in actions {
            match action {
                DestinationAction::Back => self.screen = Screen::Landing,
                DestinationAction::Filter(index) => {
                    self.destinations.filter = index;
                    self.request_recommendations();
                }
                DestinationAction::Toggle(location) => self.destinations.toggle_basket(&location),
                DestinationAction::ViewItinerary => self.open_itinerary(),
            }
        }
    }
}

/// Returns true when the add/remove button was clicked.
fn location_card(ui: &mut egui::Ui, location: &TripLocation, in_basket: bool) -> bool {
    let mut toggled = false;
    egui::Frame::NONE
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(12.0)
        .inner_margin(egui::Margin::symmetric(14, 10))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&location.name).strong().size(16.0));
                    ui.weak(format!(
                        "{}  ·  ★ {:.1}  ·  {} day(s)",
                        location.country, location.rating, location.days_recommended
                    ));
                    ui.horizontal_wrapped(|ui| {
                        for tag in &location.tags {
                            theme::chip(ui, tag, theme::tag_colors(Default::default()));
                        }
                    });
                    if let Some(image) = &location.image {
                        ui.hyperlink_to("Photo", image);
                    }
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = if in_basket { "Remove" } else { "Add" };
                    toggled = ui.button(label).clicked();
                });
            });
        });
    toggled
}
