//! App module - contains the main application state and logic

mod files;
mod filters;
pub mod manager;
mod modals;
mod views;

use crate::remote::RemoteSource;
use crate::settings::Settings;
use crate::sync::{spawn_sync_loop, SyncConfig, SyncHandle};
use crate::theme;
use crate::types::{Notice, NoticeKind};
use eframe::egui;
use manager::{Outcome, QuoteManager, UiEvent};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) manager: QuoteManager,
    /// `None` when the HTTP client could not be built
    pub(crate) sync: Option<SyncHandle>,
    pub(crate) settings: Settings,
    pub(crate) data_dir: PathBuf,
    // Add-quote form
    pub(crate) new_quote_text: String,
    pub(crate) new_quote_category: String,
    // Blocking alert
    pub(crate) alert_message: Option<String>,
    // Toast notification
    pub(crate) toast: Option<Notice>,
    pub(crate) toast_start: Option<Instant>,
    // Window geometry for saving on exit
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        manager: QuoteManager,
        settings: Settings,
        data_dir: PathBuf,
        runtime: &tokio::runtime::Handle,
    ) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let mut startup_notice = None;
        let sync = match RemoteSource::from_settings(&settings) {
            Ok(source) => {
                info!(endpoint = %source.endpoint(), auto_sync = settings.auto_sync, "Server sync configured");
                let ctx = cc.egui_ctx.clone();
                Some(spawn_sync_loop(
                    source,
                    SyncConfig {
                        interval: settings.sync_interval(),
                        auto_sync: settings.auto_sync,
                    },
                    move || ctx.request_repaint(),
                    runtime,
                ))
            }
            Err(e) => {
                error!(error = %e, "Failed to configure HTTP client, server sync disabled");
                startup_notice = Some(Notice::banner_error(format!("Server sync unavailable. {}", e)));
                None
            }
        };

        info!(
            quotes = manager.quotes().len(),
            category = %manager.filter().as_str(),
            "Quote manager ready"
        );

        let mut app = Self {
            manager,
            sync,
            settings,
            data_dir,
            new_quote_text: String::new(),
            new_quote_category: String::new(),
            alert_message: None,
            toast: None,
            toast_start: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
        };
        if let Some(notice) = startup_notice {
            app.show_notice(notice);
        }
        app
    }

    /// Run a UI event through the manager and act on the result
    pub fn dispatch(&mut self, event: UiEvent) {
        let outcome = self.manager.handle(event);
        self.apply_outcome(outcome);
    }

    /// Drain finished sync work into the store
    pub fn poll_sync_events(&mut self) {
        while let Some(event) = self.sync.as_mut().and_then(SyncHandle::try_next) {
            let outcome = self.manager.apply_sync(event);
            self.apply_outcome(outcome);
        }
    }

    pub fn sync_now(&self) {
        match &self.sync {
            Some(sync) => {
                info!("Manual sync requested");
                sync.sync_now();
            }
            None => warn!("Manual sync requested but server sync is disabled"),
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        if let (Some(quote), Some(sync)) = (outcome.publish, &self.sync) {
            if self.settings.auto_sync {
                sync.publish(quote);
            }
        }
        for notice in outcome.notices {
            self.show_notice(notice);
        }
    }

    pub fn show_notice(&mut self, notice: Notice) {
        match notice.kind {
            NoticeKind::Alert => self.alert_message = Some(notice.message),
            NoticeKind::Banner | NoticeKind::BannerError => {
                self.toast = Some(notice);
                self.toast_start = Some(Instant::now());
            }
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            ..self.settings.clone()
        };
        settings.save(&self.data_dir);
    }

    /// Stop background work and end the session
    pub fn shutdown(&mut self) {
        if let Some(sync) = &self.sync {
            sync.shutdown();
        }
        self.manager.session().clear();
        self.save_settings();
    }
}
