use eframe::egui;
use shared::domain::TagColor;

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(234, 88, 12);
pub const ACCENT_SOFT: egui::Color32 = egui::Color32::from_rgb(255, 237, 213);
pub const EXTRA: egui::Color32 = egui::Color32::from_rgb(180, 83, 9);
pub const EXTRA_SOFT: egui::Color32 = egui::Color32::from_rgb(254, 249, 195);
pub const LINKED_STROKE: egui::Color32 = egui::Color32::from_rgb(203, 213, 225);

/// Background and text color of an event tag chip.
pub fn tag_colors(color: TagColor) -> (egui::Color32, egui::Color32) {
    match color {
        TagColor::Slate => (
            egui::Color32::from_rgb(241, 245, 249),
            egui::Color32::from_rgb(71, 85, 105),
        ),
        TagColor::Yellow => (
            egui::Color32::from_rgb(254, 249, 195),
            egui::Color32::from_rgb(133, 77, 14),
        ),
        TagColor::Red => (
            egui::Color32::from_rgb(254, 226, 226),
            egui::Color32::from_rgb(185, 28, 28),
        ),
        TagColor::Purple => (
            egui::Color32::from_rgb(243, 232, 255),
            egui::Color32::from_rgb(126, 34, 206),
        ),
        TagColor::Blue => (
            egui::Color32::from_rgb(219, 234, 254),
            egui::Color32::from_rgb(29, 78, 216),
        ),
    }
}

pub fn chip(ui: &mut egui::Ui, text: &str, (fill, color): (egui::Color32, egui::Color32)) {
    egui::Frame::NONE
        .fill(fill)
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(6, 2))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).small().color(color));
        });
}
