//! Alert dialog and toast notifications

use super::App;
use crate::theme;
use crate::types::NoticeKind;
use eframe::egui;

impl App {
    pub fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(message) = self.alert_message.clone() else {
            return;
        };

        // Built-in Modal with backdrop, escape-to-close, click-outside handling
        let modal = egui::Modal::new(egui::Id::new("alert_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(180))
            .frame(theme::modal_frame());
        let modal_response = modal.show(ctx, |ui| {
            ui.set_min_width(theme::MODAL_WIDTH);
            ui.set_max_width(theme::MODAL_WIDTH);

            let mut close = false;
            ui.vertical_centered(|ui| {
                ui.add_space(theme::SPACING_SM);
                ui.label(
                    egui::RichText::new(egui_phosphor::regular::INFO)
                        .size(28.0)
                        .color(theme::ACCENT),
                );
                ui.add_space(theme::SPACING_MD);
                ui.label(egui::RichText::new(&message).size(theme::FONT_BODY));
                ui.add_space(theme::SPACING_XL);
                let ok_btn = ui.add(theme::button_accent(format!(
                    "{}  OK",
                    egui_phosphor::regular::CHECK
                )));
                if ok_btn.clicked() {
                    close = true;
                }
            });
            close
        });

        if modal_response.inner || modal_response.should_close() {
            self.alert_message = None;
        }
    }

    /// Bottom-right toast, 3s visible then fade, paused while hovered
    pub fn render_toast(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.toast.clone() else {
            return;
        };

        let visible_duration = 3.0;
        let fade_duration = 0.5;
        let total_duration = visible_duration + fade_duration;
        let accent = match notice.kind {
            NoticeKind::BannerError => theme::STATUS_ERROR,
            _ => theme::STATUS_SUCCESS,
        };

        let response = egui::Area::new(egui::Id::new("sync_toast"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -40.0))
            .show(ctx, |ui| {
                let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
                let alpha = if elapsed > visible_duration {
                    ((total_duration - elapsed) / fade_duration).clamp(0.0, 1.0)
                } else {
                    1.0
                };

                egui::Frame::new()
                    .fill(egui::Color32::from_rgba_unmultiplied(0x1a, 0x1a, 0x1e, (230.0 * alpha) as u8))
                    .stroke(egui::Stroke::new(
                        theme::STROKE_DEFAULT,
                        egui::Color32::from_rgba_unmultiplied(
                            accent.r(),
                            accent.g(),
                            accent.b(),
                            (100.0 * alpha) as u8,
                        ),
                    ))
                    .corner_radius(theme::RADIUS_MEDIUM)
                    .inner_margin(egui::Margin::symmetric(16, 10))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&notice.message).color(
                            egui::Color32::from_rgba_unmultiplied(255, 255, 255, (255.0 * alpha) as u8),
                        ));
                    });
            });

        if response.response.hovered() {
            self.toast_start = Some(std::time::Instant::now());
        }

        let elapsed = self.toast_start.map(|t| t.elapsed().as_secs_f32()).unwrap_or(0.0);
        if elapsed >= total_duration {
            self.toast = None;
            self.toast_start = None;
        } else {
            ctx.request_repaint();
        }
    }
}
