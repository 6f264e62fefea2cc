//! View rendering (header, quote card, add form, actions, status bar)

use super::manager::{Showing, UiEvent};
use super::App;
use crate::constants::{APP_NAME, MSG_NO_QUOTES};
use crate::theme;
use crate::ui::components::{placeholder, quote_body};
use crate::utils::{format_count, format_quote};
use eframe::egui;

impl App {
    pub fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(egui_phosphor::regular::QUOTES)
                    .size(theme::FONT_TITLE)
                    .color(theme::ACCENT),
            );
            ui.label(
                egui::RichText::new(APP_NAME.to_uppercase())
                    .size(theme::FONT_TITLE)
                    .strong(),
            );
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                self.render_category_picker(ui);
            });
        });
    }

    pub fn render_quote_card(&mut self, ui: &mut egui::Ui) {
        theme::card_frame().show(ui, |ui| {
            ui.set_min_height(theme::QUOTE_CARD_MIN_HEIGHT);
            ui.set_width(ui.available_width());

            match self.manager.showing() {
                Showing::Quote(quote) => {
                    quote_body(ui, quote);
                    ui.add_space(theme::SPACING_SM);
                    let copy = ui.add(theme::button(format!(
                        "{}  Copy",
                        egui_phosphor::regular::COPY
                    )));
                    if copy.clicked() {
                        ui.ctx().copy_text(format_quote(quote));
                    }
                }
                Showing::NoQuotes => placeholder(ui, MSG_NO_QUOTES),
                Showing::Nothing => placeholder(ui, "Press \"Show New Quote\" to get started."),
            }
        });

        ui.add_space(theme::SPACING_LG);
        if ui
            .add(theme::button_accent(format!(
                "{}  Show New Quote",
                egui_phosphor::regular::SHUFFLE
            )))
            .clicked()
        {
            self.dispatch(UiEvent::ShowRandom);
        }
    }

    pub fn render_add_form(&mut self, ui: &mut egui::Ui) {
        ui.label(
            egui::RichText::new("Add a quote")
                .size(theme::FONT_LABEL)
                .color(theme::TEXT_MUTED),
        );
        ui.add_space(theme::SPACING_SM);

        let text_resp = ui.add(
            egui::TextEdit::singleline(&mut self.new_quote_text)
                .hint_text("Enter a new quote")
                .desired_width(theme::FORM_WIDTH),
        );
        let category_resp = ui.add(
            egui::TextEdit::singleline(&mut self.new_quote_category)
                .hint_text("Enter quote category")
                .desired_width(theme::FORM_WIDTH),
        );

        let submitted_by_enter = (text_resp.lost_focus() || category_resp.lost_focus())
            && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui
            .add(theme::button(format!("{}  Add Quote", egui_phosphor::regular::PLUS)))
            .clicked();

        if clicked || submitted_by_enter {
            let text = self.new_quote_text.clone();
            let category = self.new_quote_category.clone();
            let before = self.manager.quotes().len();
            self.dispatch(UiEvent::AddQuote { text, category });
            if self.manager.quotes().len() > before {
                self.new_quote_text.clear();
                self.new_quote_category.clear();
            }
        }
    }

    pub fn render_actions(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui
                .add(theme::button(format!(
                    "{}  Export Quotes",
                    egui_phosphor::regular::DOWNLOAD_SIMPLE
                )))
                .clicked()
            {
                self.export_quotes();
            }
            if ui
                .add(theme::button(format!(
                    "{}  Import Quotes",
                    egui_phosphor::regular::UPLOAD_SIMPLE
                )))
                .clicked()
            {
                self.import_quotes();
            }
            if ui
                .add(theme::button(format!(
                    "{}  Sync Now",
                    egui_phosphor::regular::ARROWS_CLOCKWISE
                )))
                .clicked()
            {
                self.sync_now();
            }
        });
    }

    pub fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .show_separator_line(false)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_ELEVATED)
                    .inner_margin(egui::Margin::symmetric(16, 6)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let quotes = format_count(self.manager.quotes().len(), "quote", "quotes");
                    let categories =
                        format_count(self.manager.categories().len(), "category", "categories");
                    ui.label(
                        egui::RichText::new(format!("{}  ·  {}", quotes, categories))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let sync_text = match self.manager.last_sync() {
                            Some(at) => format!("Last synced {}", at.format("%H:%M:%S")),
                            None if self.sync.is_none() => "Server sync unavailable".to_string(),
                            None if self.settings.auto_sync => "Waiting for first sync".to_string(),
                            None => "Auto sync off".to_string(),
                        };
                        ui.label(
                            egui::RichText::new(sync_text)
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        );
                    });
                });
            });
    }
}
