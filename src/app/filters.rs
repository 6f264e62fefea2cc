//! Category filter picker

use super::manager::UiEvent;
use super::App;
use crate::theme;
use crate::types::CategoryFilter;
use eframe::egui;

impl App {
    pub fn render_category_picker(&mut self, ui: &mut egui::Ui) {
        let current = self.manager.filter().clone();
        let mut choice: Option<CategoryFilter> = None;

        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new(egui_phosphor::regular::FUNNEL)
                    .size(theme::FONT_BODY)
                    .color(theme::TEXT_DIM),
            );
            egui::ComboBox::from_id_salt("category_filter")
                .selected_text(current.label())
                .width(180.0)
                .show_ui(ui, |ui| {
                    if ui
                        .selectable_label(current == CategoryFilter::All, CategoryFilter::All.label())
                        .clicked()
                    {
                        choice = Some(CategoryFilter::All);
                    }
                    for category in self.manager.categories() {
                        let option = CategoryFilter::Category(category.clone());
                        if ui.selectable_label(current == option, category.as_str()).clicked() {
                            choice = Some(option);
                        }
                    }
                });
        });

        if let Some(filter) = choice {
            if filter != current {
                self.dispatch(UiEvent::SelectCategory(filter));
            }
        }
    }
}
