//! Native dialogs via `rfd`

use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use super::{LoadedFile, Platform, read_text_file, write_export};
use crate::error::{ClipboardError, ExportError, ReadError};

const TITLE: &str = "LuauPad";

/// File pickers and message boxes from the host OS
#[derive(Default)]
pub struct NativePlatform {
    clipboard: Option<arboard::Clipboard>,
}

impl NativePlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Platform for NativePlatform {
    fn pick_file(&mut self, filters: &[String]) -> Result<Option<LoadedFile>, ReadError> {
        let mut dialog = FileDialog::new().set_title("Open Script");
        for ext in filters {
            dialog = dialog.add_filter(ext.to_uppercase(), &[ext.as_str()]);
        }
        let dialog = dialog.add_filter("All Files", &["*"]);

        match dialog.pick_file() {
            Some(path) => read_text_file(&path).map(Some),
            None => Ok(None),
        }
    }

    fn download(&mut self, name: &str, content: &str) -> Result<PathBuf, ExportError> {
        let target = FileDialog::new()
            .set_title("Export Script")
            .set_file_name(name)
            .save_file()
            .ok_or(ExportError::Cancelled)?;

        let dir = target.parent().map(PathBuf::from).unwrap_or_default();
        let file_name = target
            .file_name()
            .map_or_else(|| name.to_string(), |n| n.to_string_lossy().into_owned());
        write_export(&dir, &file_name, content)
    }

    fn copy_to_clipboard(&mut self, content: &str) -> Result<(), ClipboardError> {
        if self.clipboard.is_none() {
            self.clipboard = Some(
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?,
            );
        }
        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard
                .set_text(content)
                .map_err(|e| ClipboardError::Denied(e.to_string())),
            None => Err(ClipboardError::Unavailable("clipboard not initialised".to_string())),
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        let answer = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(TITLE)
            .set_description(message)
            .set_buttons(MessageButtons::YesNo)
            .show();
        answer == MessageDialogResult::Yes
    }

    fn alert(&mut self, message: &str) {
        MessageDialog::new()
            .set_level(MessageLevel::Error)
            .set_title(TITLE)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
