//! Import and export through native file dialogs

use super::manager::UiEvent;
use super::App;
use crate::constants::EXPORT_FILE_NAME;
use tracing::debug;

impl App {
    pub fn export_quotes(&mut self) {
        let path = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .set_file_name(EXPORT_FILE_NAME)
            .save_file();

        match path {
            Some(path) => self.dispatch(UiEvent::ExportFile(path)),
            None => debug!("Export cancelled"),
        }
    }

    pub fn import_quotes(&mut self) {
        let path = rfd::FileDialog::new()
            .add_filter("JSON", &["json"])
            .pick_file();

        match path {
            Some(path) => self.dispatch(UiEvent::ImportFile(path)),
            None => debug!("Import cancelled"),
        }
    }
}
