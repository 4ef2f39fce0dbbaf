use client_core::api::MIN_SUGGESTION_QUERY_CHARS;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::ui::app::PlannerApp;

impl PlannerApp {
    pub(super) fn show_landing(&mut self, ctx: &egui::Context) {
        let mut chosen: Option<String> = None;
        let mut query_changed = false;
        let mut open_itinerary = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            ui.add_space((avail.y * 0.18).clamp(24.0, 140.0));

            ui.vertical_centered(|ui| {
                ui.set_width(avail.x.clamp(360.0, 560.0));
                ui.heading("Where to next?");
                ui.weak("Search a city or landmark to get destination ideas.");
                ui.add_space(12.0);

                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.landing.search)
                        .hint_text(self.default_city.as_str())
                        .desired_width(f32::INFINITY),
                );
                query_changed = response.changed();
                let submitted =
                    response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                for suggestion in &self.landing.suggestions {
                    let label = if suggestion.district.is_empty() {
                        suggestion.name.clone()
                    } else {
                        format!("{}  ·  {}", suggestion.name, suggestion.district)
                    };
                    if ui
                        .add(egui::Button::new(label).frame(false))
                        .on_hover_cursor(egui::CursorIcon::PointingHand)
                        .clicked()
                    {
                        chosen = Some(suggestion.name.clone());
                    }
                }

                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    if ui.button("Explore destinations").clicked() || submitted {
                        chosen = Some(self.landing.search.clone());
                    }
                    if ui.button("Open my itinerary").clicked() {
                        open_itinerary = true;
                    }
                });
            });
        });

        if query_changed {
            if self.landing.search.trim().chars().count() < MIN_SUGGESTION_QUERY_CHARS {
                self.landing.suggestions.clear();
            }
            let query = self.landing.search.clone();
            self.send(BackendCommand::SearchSuggestions { query });
        }
        if let Some(city) = chosen {
            self.open_destinations(city);
        } else if open_itinerary {
            self.open_itinerary();
        }
    }
}
