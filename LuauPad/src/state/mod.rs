//! Document state: the open documents, which one is active, and whether each
//! has unsaved changes

mod document;
mod tabs;

pub use document::{Document, DocumentId, DocumentStatus, IdGenerator};
pub use tabs::{CloseOutcome, Closed, DEFAULT_NAME, DocumentTabs, PendingClose};
