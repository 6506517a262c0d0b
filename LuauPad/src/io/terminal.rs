//! Terminal implementation of [`Platform`]
//!
//! Prompts go through `dialoguer` when attached to a terminal and fall back to
//! plain line input otherwise, so the shell also works with piped stdin.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use tracing::warn;

use super::{LoadedFile, Platform, read_text_file, write_export};
use crate::error::{ClipboardError, ExportError, ReadError};

fn use_dialoguer() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

/// Terminal prompts, the system clipboard, and exports written to a directory
pub struct TerminalPlatform {
    export_dir: PathBuf,
    // Kept alive: on some platforms the clipboard is cleared when its owner drops
    clipboard: Option<arboard::Clipboard>,
}

impl TerminalPlatform {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
            clipboard: None,
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    fn clipboard(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.clipboard.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.clipboard = Some(clipboard);
        }
        self.clipboard
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard not initialised".to_string()))
    }
}

impl Platform for TerminalPlatform {
    fn pick_file(&mut self, filters: &[String]) -> Result<Option<LoadedFile>, ReadError> {
        let label = format!("Open file ({})", filters.join(", "));
        let answer = if use_dialoguer() {
            Input::<String>::with_theme(&ColorfulTheme::default())
                .with_prompt(label)
                .allow_empty(true)
                .interact_text()
                .ok()
        } else {
            read_line(&format!("{label}: "))
        };

        match answer {
            Some(path) if !path.trim().is_empty() => read_text_file(Path::new(path.trim())).map(Some),
            _ => Ok(None),
        }
    }

    fn download(&mut self, name: &str, content: &str) -> Result<PathBuf, ExportError> {
        write_export(&self.export_dir, name, content)
    }

    fn copy_to_clipboard(&mut self, content: &str) -> Result<(), ClipboardError> {
        self.clipboard()?
            .set_text(content)
            .map_err(|e| ClipboardError::Denied(e.to_string()))
    }

    fn confirm(&mut self, message: &str) -> bool {
        if use_dialoguer() {
            return Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(message)
                .default(false)
                .interact()
                .unwrap_or(false);
        }
        read_line(&format!("{message} [y/N]: "))
            .is_some_and(|answer| matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn alert(&mut self, message: &str) {
        warn!("alert: {message}");
        eprintln!("{} {message}", style("!").red().bold());
    }
}
