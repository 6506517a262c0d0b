//! The ordered set of open documents and the active-document pointer
//!
//! Invariants, held after every public method returns:
//! - at least one document is open;
//! - the active id names an open document.

use tracing::debug;

use super::document::{Document, DocumentId, IdGenerator};
use crate::error::{Error, Result};

pub const DEFAULT_NAME: &str = "New Script";

/// Result of asking to close a document
#[derive(Debug)]
#[must_use]
pub enum CloseOutcome {
    /// The document was clean and has been closed
    Closed(Closed),
    /// The document has unsaved changes; resolve with [`DocumentTabs::confirm_close`]
    /// or drop the request to keep it open
    NeedsConfirmation(PendingClose),
}

/// A close waiting for the user's answer
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct PendingClose {
    id: DocumentId,
    name: String,
}

impl PendingClose {
    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    /// Question to put to the user
    pub fn prompt(&self) -> String {
        format!(
            "The file \"{}\" has unsaved changes. Do you want to close it anyway?",
            self.name
        )
    }
}

/// A document that has been removed
#[derive(Debug)]
pub struct Closed {
    pub removed: Document,
    /// The closed document was the last one and a fresh default document took its place
    pub replaced: bool,
}

/// Open documents, in tab order
#[derive(Debug)]
pub struct DocumentTabs {
    documents: Vec<Document>,
    active: DocumentId,
    ids: IdGenerator,
    default_name: String,
}

impl Default for DocumentTabs {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTabs {
    /// One empty, clean document named `New Script`
    pub fn new() -> Self {
        Self::with_default_name(DEFAULT_NAME)
    }

    pub fn with_default_name(default_name: impl Into<String>) -> Self {
        let mut ids = IdGenerator::new();
        let default_name = default_name.into();
        let first = Document::new(ids.next_id(), default_name.clone(), String::new(), None);
        Self {
            active: first.id().clone(),
            documents: vec![first],
            ids,
            default_name,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Always false: the set is never empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn active_id(&self) -> &DocumentId {
        &self.active
    }

    pub fn active(&self) -> &Document {
        self.get(&self.active).unwrap_or(&self.documents[0])
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.id() == id)
    }

    pub fn position(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|doc| doc.id() == id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.position(id).is_some()
    }

    fn get_mut(&mut self, id: &DocumentId) -> Result<&mut Document> {
        self.documents
            .iter_mut()
            .find(|doc| doc.id() == id)
            .ok_or_else(|| Error::DocumentNotFound(id.clone()))
    }

    fn push(&mut self, document: Document) -> DocumentId {
        let id = document.id().clone();
        self.documents.push(document);
        self.active = id.clone();
        id
    }

    /// Append an empty document named `Script N` and make it active
    pub fn create_document(&mut self) -> DocumentId {
        let name = format!("Script {}", self.documents.len() + 1);
        let document = Document::new(self.ids.next_id(), name, String::new(), None);
        debug!(id = %document.id(), name = document.name(), "created document");
        self.push(document)
    }

    /// Append a clean document holding an imported file and make it active
    pub fn open_document(&mut self, name: impl Into<String>, content: impl Into<String>) -> DocumentId {
        let name = name.into();
        let document = Document::new(self.ids.next_id(), name.clone(), content.into(), Some(name));
        debug!(id = %document.id(), name = document.name(), "opened document");
        self.push(document)
    }

    /// Replace a document's content. Always marks it dirty, even if the text is unchanged.
    pub fn edit_content(&mut self, id: &DocumentId, content: impl Into<String>) -> Result<()> {
        let document = self.get_mut(id)?;
        document.set_content(content.into());
        debug!(id = %id, revision = document.revision(), "edited document");
        Ok(())
    }

    /// Mark a document clean without touching its content
    pub fn mark_saved(&mut self, id: &DocumentId) -> Result<()> {
        self.get_mut(id)?.mark_saved();
        debug!(id = %id, "marked saved");
        Ok(())
    }

    /// Switch the active document. Unknown ids are ignored; returns whether it switched.
    pub fn set_active(&mut self, id: &DocumentId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.active = id.clone();
        true
    }

    /// Ask to close a document. Clean documents close at once; dirty ones need a
    /// confirmation first and are left untouched until then.
    pub fn close_document(&mut self, id: &DocumentId) -> Result<CloseOutcome> {
        let document = self
            .get(id)
            .ok_or_else(|| Error::DocumentNotFound(id.clone()))?;

        if document.is_saved() {
            self.remove(id).map(CloseOutcome::Closed)
        } else {
            Ok(CloseOutcome::NeedsConfirmation(PendingClose {
                id: id.clone(),
                name: document.name().to_string(),
            }))
        }
    }

    /// Carry out a close the user has confirmed
    pub fn confirm_close(&mut self, pending: PendingClose) -> Result<Closed> {
        let PendingClose { id, .. } = pending;
        self.remove(&id)
    }

    fn remove(&mut self, id: &DocumentId) -> Result<Closed> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::DocumentNotFound(id.clone()))?;

        if self.documents.len() == 1 {
            let fresh = Document::new(
                self.ids.next_id(),
                self.default_name.clone(),
                String::new(),
                None,
            );
            self.active = fresh.id().clone();
            let removed = std::mem::replace(&mut self.documents[index], fresh);
            debug!(id = %id, "closed last document, reset to default");
            return Ok(Closed {
                removed,
                replaced: true,
            });
        }

        let removed = self.documents.remove(index);
        if removed.id() == &self.active {
            if let Some(last) = self.documents.last() {
                self.active = last.id().clone();
            }
        }
        debug!(id = %id, active = %self.active, "closed document");
        Ok(Closed {
            removed,
            replaced: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DocumentStatus, IdGenerator};

    fn assert_invariants(tabs: &DocumentTabs) {
        assert!(!tabs.is_empty());
        assert!(tabs.contains(tabs.active_id()));
    }

    #[test]
    fn test_starts_with_one_clean_document() {
        let tabs = DocumentTabs::new();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs.active().name(), "New Script");
        assert_eq!(tabs.active().content(), "");
        assert_eq!(tabs.active().status(), DocumentStatus::Clean);
        assert_invariants(&tabs);
    }

    #[test]
    fn test_create_names_and_activates() {
        let mut tabs = DocumentTabs::new();
        let id = tabs.create_document();
        assert_eq!(tabs.active_id(), &id);
        assert_eq!(tabs.active().name(), "Script 2");
        assert!(tabs.active().is_saved());
        assert!(tabs.active().path().is_none());
    }

    #[test]
    fn test_open_sets_name_and_path() {
        let mut tabs = DocumentTabs::new();
        let id = tabs.open_document("foo.lua", "local x = 1\nlocal y = 2");
        let doc = tabs.get(&id).unwrap();
        assert_eq!(doc.name(), "foo.lua");
        assert_eq!(doc.path(), Some("foo.lua"));
        assert!(doc.is_saved());
        assert_eq!(tabs.active_id(), &id);
    }

    #[test]
    fn test_edit_then_save() {
        let mut tabs = DocumentTabs::new();
        let id = tabs.active_id().clone();
        tabs.edit_content(&id, "print('hi')").unwrap();
        assert_eq!(tabs.active().status(), DocumentStatus::Dirty);

        tabs.mark_saved(&id).unwrap();
        assert_eq!(tabs.active().status(), DocumentStatus::Clean);
        assert_eq!(tabs.active().content(), "print('hi')");
    }

    #[test]
    fn test_edit_unknown_document() {
        let mut tabs = DocumentTabs::new();
        let id = tabs.active_id().clone();
        let stranger = IdGenerator::new().next_at(0);

        let err = tabs.edit_content(&stranger, "x").unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(_)));
        assert_eq!(tabs.get(&id).unwrap().content(), "");
        assert_eq!(tabs.active().status(), DocumentStatus::Clean);
        assert!(matches!(
            tabs.mark_saved(&stranger),
            Err(Error::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_set_active_ignores_unknown() {
        let mut tabs = DocumentTabs::new();
        let first = tabs.active_id().clone();
        tabs.create_document();
        tabs.set_active(&first);
        let stranger = IdGenerator::new().next_at(0);

        assert!(!tabs.contains(&stranger));
        assert!(!tabs.set_active(&stranger));
        assert_eq!(tabs.active_id(), &first);
        assert_eq!(tabs.len(), 2);
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let mut tabs = DocumentTabs::new();
        let first = tabs.active_id().clone();
        let second = tabs.create_document();

        let outcome = tabs.close_document(&first).unwrap();
        assert!(matches!(outcome, CloseOutcome::Closed(_)));
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs.active_id(), &second);
    }

    #[test]
    fn test_close_active_selects_last() {
        let mut tabs = DocumentTabs::new();
        let _b = tabs.create_document();
        let c = tabs.create_document();
        let b = tabs.documents()[1].id().clone();
        tabs.set_active(&b);

        let _ = tabs.close_document(&b).unwrap();
        assert_eq!(tabs.active_id(), &c);
        assert_invariants(&tabs);
    }

    #[test]
    fn test_dirty_close_waits_for_confirmation() {
        let mut tabs = DocumentTabs::new();
        let id = tabs.active_id().clone();
        tabs.create_document();
        tabs.edit_content(&id, "x = 1").unwrap();

        let CloseOutcome::NeedsConfirmation(pending) = tabs.close_document(&id).unwrap() else {
            panic!("dirty document closed without confirmation");
        };
        assert_eq!(tabs.len(), 2);
        assert!(pending.prompt().contains("\"New Script\""));

        // Declining is just dropping the request
        drop(pending);
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs.get(&id).unwrap().content(), "x = 1");
    }

    #[test]
    fn test_closing_last_dirty_resets() {
        let mut tabs = DocumentTabs::new();
        let id = tabs.active_id().clone();
        tabs.edit_content(&id, "x = 1").unwrap();

        let CloseOutcome::NeedsConfirmation(pending) = tabs.close_document(&id).unwrap() else {
            panic!("expected confirmation");
        };
        let closed = tabs.confirm_close(pending).unwrap();

        assert!(closed.replaced);
        assert_eq!(closed.removed.content(), "x = 1");
        assert_eq!(tabs.len(), 1);
        assert_ne!(tabs.active_id(), &id);
        assert_eq!(tabs.active().name(), "New Script");
        assert_eq!(tabs.active().content(), "");
        assert!(tabs.active().is_saved());
    }

    #[test]
    fn test_confirm_after_document_is_gone() {
        let mut tabs = DocumentTabs::new();
        let id = tabs.active_id().clone();
        tabs.create_document();
        tabs.edit_content(&id, "dirty").unwrap();

        let CloseOutcome::NeedsConfirmation(pending) = tabs.close_document(&id).unwrap() else {
            panic!("expected confirmation");
        };
        tabs.mark_saved(&id).unwrap();
        let _ = tabs.close_document(&id).unwrap();

        assert!(tabs.confirm_close(pending).is_err());
        assert_invariants(&tabs);
    }

    #[test]
    fn test_random_create_close_sequences_hold_invariants() {
        let mut tabs = DocumentTabs::new();
        // Deterministic mix of operations, including edits so some closes need confirming
        for step in 0u32..200 {
            match step % 7 {
                0 | 3 => {
                    tabs.create_document();
                }
                1 => {
                    let id = tabs.active_id().clone();
                    tabs.edit_content(&id, format!("step {step}")).unwrap();
                }
                2 | 5 => {
                    let index = (step as usize * 31) % tabs.len();
                    let id = tabs.documents()[index].id().clone();
                    match tabs.close_document(&id).unwrap() {
                        CloseOutcome::Closed(_) => {}
                        CloseOutcome::NeedsConfirmation(pending) => {
                            if step % 2 == 0 {
                                tabs.confirm_close(pending).unwrap();
                            }
                        }
                    }
                }
                4 => {
                    let index = (step as usize) % tabs.len();
                    let id = tabs.documents()[index].id().clone();
                    tabs.set_active(&id);
                }
                _ => {
                    let id = tabs.active_id().clone();
                    tabs.mark_saved(&id).unwrap();
                }
            }
            assert_invariants(&tabs);
        }
    }

    #[test]
    fn test_ids_never_reused_after_reset() {
        let mut tabs = DocumentTabs::new();
        let mut seen = vec![tabs.active_id().clone()];
        for _ in 0..5 {
            let id = tabs.active_id().clone();
            let _ = tabs.close_document(&id).unwrap();
            assert!(!seen.contains(tabs.active_id()));
            seen.push(tabs.active_id().clone());
        }
    }
}
