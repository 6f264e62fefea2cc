//! Reusable UI components

use crate::theme;
use crate::types::Quote;
use eframe::egui;

/// Small pill showing a category name in its color
pub fn category_badge(ui: &mut egui::Ui, category: &str) -> egui::Response {
    let (bg, fg) = theme::category_colors(category);
    egui::Frame::new()
        .fill(bg)
        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, fg.gamma_multiply(0.4)))
        .corner_radius(theme::RADIUS_MEDIUM)
        .inner_margin(egui::Margin::symmetric(8, 2))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(category).size(theme::FONT_SMALL).color(fg));
        })
        .response
}

/// Quote text with its category underneath
pub fn quote_body(ui: &mut egui::Ui, quote: &Quote) {
    ui.label(
        egui::RichText::new(format!("\u{201c}{}\u{201d}", quote.text))
            .size(theme::FONT_QUOTE)
            .italics()
            .color(theme::TEXT_PRIMARY),
    );
    ui.add_space(theme::SPACING_MD);
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("—").color(theme::TEXT_DIM));
        category_badge(ui, &quote.category);
    });
}

/// Dimmed placeholder line for empty states
pub fn placeholder(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .size(theme::FONT_BODY)
            .color(theme::TEXT_DIM),
    );
}
