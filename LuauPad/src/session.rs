//! Editor session: user actions wired to the document model, the platform and
//! the dispatcher
//!
//! Every failure is handled inside the action that caused it. Read and
//! clipboard failures become an alert, network failures only a log line, and no
//! action leaves the model in a partial state.

use std::path::{Path, PathBuf};
use std::time::Instant;

use luausyntax::grammar::luau;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::dispatch::{DispatchHandle, Dispatcher};
use crate::error::{ExportError, Result};
use crate::io::{
    CLIPBOARD_ERROR_ALERT, LoadedFile, Platform, READ_ERROR_ALERT, export_file_name,
    read_text_file,
};
use crate::presentation::{Presenter, TabLabel, ViewState, tab_labels};
use crate::state::{CloseOutcome, Closed, Document, DocumentId, DocumentTabs, PendingClose};

/// Alert shown when an export cannot be written
pub const EXPORT_ERROR_ALERT: &str = "Failed to save file. Please try again.";

pub struct Session<P: Platform> {
    tabs: DocumentTabs,
    presenter: Presenter,
    platform: P,
    dispatcher: Dispatcher,
    config: AppConfig,
    /// Copy-success indicator expiry. Belongs to the copy action, not to a document.
    copied_until: Option<Instant>,
}

impl<P: Platform> Session<P> {
    pub fn new(config: AppConfig, platform: P, dispatcher: Dispatcher) -> Result<Self> {
        let grammar = luau::shared()?.clone();
        Ok(Self {
            tabs: DocumentTabs::with_default_name(config.default_name.clone()),
            presenter: Presenter::new(grammar),
            platform,
            dispatcher,
            config,
            copied_until: None,
        })
    }

    /// Session dispatching over HTTP to the configured endpoint
    pub fn with_http(config: AppConfig, platform: P) -> Result<Self> {
        let dispatcher = Dispatcher::http(config.endpoint.clone(), config.request_timeout());
        Self::new(config, platform, dispatcher)
    }

    pub fn tabs(&self) -> &DocumentTabs {
        &self.tabs
    }

    pub fn active(&self) -> &Document {
        self.tabs.active()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Line count and tokens for the active document
    pub fn view(&mut self) -> &ViewState {
        self.presenter.view(self.tabs.active())
    }

    pub fn tab_labels(&self) -> Vec<TabLabel> {
        tab_labels(&self.tabs)
    }

    pub fn new_document(&mut self) -> DocumentId {
        let id = self.tabs.create_document();
        info!(id = %id, "new document");
        id
    }

    /// Import through the platform's file picker. `None` when cancelled or failed.
    pub fn open_file(&mut self) -> Option<DocumentId> {
        let picked = self.platform.pick_file(&self.config.open_filters);
        match picked {
            Ok(Some(file)) => Some(self.open_loaded(file)),
            Ok(None) => None,
            Err(e) => {
                warn!("open failed: {e}");
                self.platform.alert(READ_ERROR_ALERT);
                None
            }
        }
    }

    /// Import a known path, bypassing the picker
    pub fn open_path(&mut self, path: &Path) -> Option<DocumentId> {
        match read_text_file(path) {
            Ok(file) => Some(self.open_loaded(file)),
            Err(e) => {
                warn!("open failed: {e}");
                self.platform.alert(READ_ERROR_ALERT);
                None
            }
        }
    }

    fn open_loaded(&mut self, file: LoadedFile) -> DocumentId {
        let id = self.tabs.open_document(file.name, file.content);
        info!(id = %id, name = self.tabs.active().name(), "opened");
        id
    }

    /// Replace the active document's content
    pub fn edit(&mut self, content: impl Into<String>) {
        let id = self.tabs.active_id().clone();
        if let Err(e) = self.tabs.edit_content(&id, content) {
            debug!(id = %id, "edit dropped: {e}");
        }
    }

    pub fn edit_document(&mut self, id: &DocumentId, content: impl Into<String>) -> Result<()> {
        self.tabs.edit_content(id, content)
    }

    /// Add `text` to the end of the active document
    pub fn append(&mut self, text: &str) {
        let mut content = self.tabs.active().content().to_string();
        content.push_str(text);
        self.edit(content);
    }

    pub fn switch_to(&mut self, id: &DocumentId) -> bool {
        self.tabs.set_active(id)
    }

    /// First half of a close. A dirty document comes back as
    /// [`CloseOutcome::NeedsConfirmation`] and stays open until resolved.
    pub fn request_close(&mut self, id: &DocumentId) -> Result<CloseOutcome> {
        self.tabs.close_document(id)
    }

    /// Second half of a close. Declining leaves everything as it was.
    pub fn resolve_close(&mut self, pending: PendingClose, confirmed: bool) -> Result<Option<Closed>> {
        if !confirmed {
            info!(id = %pending.id(), "close declined");
            return Ok(None);
        }
        self.tabs.confirm_close(pending).map(Some)
    }

    /// Close a document, asking the platform to confirm when it is dirty.
    /// Returns whether it was closed.
    pub fn close(&mut self, id: &DocumentId) -> Result<bool> {
        let closed = match self.request_close(id)? {
            CloseOutcome::Closed(_) => true,
            CloseOutcome::NeedsConfirmation(pending) => {
                let confirmed = self.platform.confirm(&pending.prompt());
                self.resolve_close(pending, confirmed)?.is_some()
            }
        };
        if closed {
            info!(id = %id, "closed");
        }
        Ok(closed)
    }

    /// Close the active document after an unconditional confirmation
    pub fn delete_active(&mut self) -> Result<bool> {
        let prompt = format!(
            "Are you sure you want to close the \"{}\" tab?",
            self.tabs.active().name()
        );
        if !self.platform.confirm(&prompt) {
            return Ok(false);
        }
        let id = self.tabs.active_id().clone();
        self.close(&id)
    }

    /// Export the active document. On success it becomes clean.
    pub fn save_active(&mut self) -> Option<PathBuf> {
        let document = self.tabs.active();
        let id = document.id().clone();
        let name = export_file_name(document, &self.config.export_extension);

        match self.platform.download(&name, document.content()) {
            Ok(path) => {
                if let Err(e) = self.tabs.mark_saved(&id) {
                    debug!(id = %id, "exported document is no longer open: {e}");
                }
                info!(id = %id, path = %path.display(), "saved");
                Some(path)
            }
            Err(ExportError::Cancelled) => None,
            Err(e) => {
                warn!("export failed: {e}");
                self.platform.alert(EXPORT_ERROR_ALERT);
                None
            }
        }
    }

    /// Copy the active document's content verbatim
    pub fn copy_active(&mut self) -> bool {
        let result = self.platform.copy_to_clipboard(self.tabs.active().content());
        match result {
            Ok(()) => {
                self.copied_until = Some(Instant::now() + self.config.copy_indicator());
                info!("copied to clipboard");
                true
            }
            Err(e) => {
                warn!("copy failed: {e}");
                self.platform.alert(CLIPBOARD_ERROR_ALERT);
                false
            }
        }
    }

    /// Whether the copy-success indicator is still showing at `now`
    pub fn copy_indicator_visible(&self, now: Instant) -> bool {
        self.copied_until.is_some_and(|until| now < until)
    }

    /// Send the active document to the endpoint
    pub fn execute_active(&self) -> DispatchHandle {
        self.dispatcher.execute(self.tabs.active().content())
    }

    pub fn probe(&self) -> DispatchHandle {
        self.dispatcher.probe()
    }
}
