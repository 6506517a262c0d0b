//! I/O bridge: file import, export, clipboard and user prompts
//!
//! The session only talks to the outside world through [`Platform`]. The
//! terminal and native implementations live behind the `cli` and
//! `native-dialogs` features.

#[cfg(feature = "native-dialogs")]
pub mod native;
#[cfg(feature = "cli")]
pub mod terminal;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ClipboardError, ExportError, ReadError};
use crate::state::Document;

/// Alert shown when an import fails
pub const READ_ERROR_ALERT: &str = "Error reading file. Please try again.";
/// Alert shown when a clipboard write fails
pub const CLIPBOARD_ERROR_ALERT: &str = "Failed to copy to clipboard. Please try again.";

/// A file picked by the user, decoded as text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedFile {
    pub name: String,
    pub content: String,
}

/// Everything the editor needs from its host
pub trait Platform {
    /// Let the user choose a file. `Ok(None)` means the pick was cancelled.
    fn pick_file(&mut self, filters: &[String]) -> Result<Option<LoadedFile>, ReadError>;

    /// Save `content` under `name`, returning where it went
    fn download(&mut self, name: &str, content: &str) -> Result<PathBuf, ExportError>;

    fn copy_to_clipboard(&mut self, content: &str) -> Result<(), ClipboardError>;

    /// Ask a yes/no question; anything but an explicit yes is a no
    fn confirm(&mut self, message: &str) -> bool;

    /// Show a blocking message
    fn alert(&mut self, message: &str);
}

/// Name to export `document` under: its origin path if it has one, otherwise
/// its name with `.<extension>` appended unless already present
pub fn export_file_name(document: &Document, extension: &str) -> String {
    if let Some(path) = document.path() {
        return path.to_string();
    }
    let suffix = format!(".{extension}");
    if document.name().ends_with(&suffix) {
        document.name().to_string()
    } else {
        format!("{}{suffix}", document.name())
    }
}

/// Read a local file as text. Any file is accepted as long as it decodes.
pub fn read_text_file(path: &Path) -> Result<LoadedFile, ReadError> {
    let bytes = fs::read(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|_| ReadError::NotText {
        path: path.to_path_buf(),
    })?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

    info!(path = %path.display(), bytes = content.len(), "read file");
    Ok(LoadedFile { name, content })
}

/// Write an export into `dir`
pub fn write_export(dir: &Path, name: &str, content: &str) -> Result<PathBuf, ExportError> {
    let target = dir.join(name);
    fs::write(&target, content).map_err(|source| ExportError::Io {
        path: target.clone(),
        source,
    })?;
    info!(path = %target.display(), bytes = content.len(), "exported");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DocumentTabs;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_name_rules() {
        let mut tabs = DocumentTabs::new();
        assert_eq!(export_file_name(tabs.active(), "lua"), "New Script.lua");

        tabs.open_document("notes.txt", "hello");
        assert_eq!(export_file_name(tabs.active(), "lua"), "notes.txt");

        tabs.create_document();
        assert_eq!(export_file_name(tabs.active(), "lua"), "Script 3.lua");
    }

    #[test]
    fn test_export_name_keeps_existing_extension() {
        let mut tabs = DocumentTabs::with_default_name("main.lua");
        assert_eq!(export_file_name(tabs.active(), "lua"), "main.lua");
        tabs.create_document();
        assert_eq!(export_file_name(tabs.active(), "luau"), "Script 2.luau");
    }

    #[test]
    fn test_read_rejects_binary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();

        assert!(matches!(read_text_file(&path), Err(ReadError::NotText { .. })));
        assert!(matches!(
            read_text_file(&dir.path().join("missing.lua")),
            Err(ReadError::Io { .. })
        ));
    }

    #[test]
    fn test_export_then_import_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let content = "local s = [==[\r\n raw ]==]\n\tprint(s) -- ü\n";

        let written = write_export(dir.path(), "round.lua", content).unwrap();
        let loaded = read_text_file(&written).unwrap();

        assert_eq!(loaded.name, "round.lua");
        assert_eq!(loaded.content, content);
    }
}
