#![allow(non_snake_case)]
//! # LuauPad
//!
//! Core of a multi-document Luau script editor: open documents with dirty
//! tracking, the derived view (line count, highlighted tokens, scroll-synced
//! gutter), import and export through a host platform, and dispatch of scripts
//! to a remote execution endpoint.
//!
//! ## Quick Start
//!
//! ```
//! use luaupad::prelude::*;
//!
//! let mut tabs = DocumentTabs::new();
//! let id = tabs.active_id().clone();
//! tabs.edit_content(&id, "print('hi')")?;
//!
//! assert_eq!(tabs.active().status(), DocumentStatus::Dirty);
//! assert_eq!(line_count(tabs.active().content()), 1);
//! # Ok::<(), luaupad::Error>(())
//! ```
//!
//! ## Closing with unsaved changes
//!
//! ```
//! use luaupad::prelude::*;
//!
//! let mut tabs = DocumentTabs::new();
//! let id = tabs.active_id().clone();
//! tabs.edit_content(&id, "local x = 1")?;
//!
//! match tabs.close_document(&id)? {
//!     CloseOutcome::NeedsConfirmation(pending) => {
//!         tabs.confirm_close(pending)?;
//!     }
//!     CloseOutcome::Closed(_) => unreachable!(),
//! }
//! assert_eq!(tabs.active().name(), "New Script");
//! # Ok::<(), luaupad::Error>(())
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod io;
pub mod presentation;
pub mod session;
pub mod state;

#[cfg(feature = "cli")]
pub mod cli;

// Re-exports for convenience
pub use config::AppConfig;
pub use error::{Error, Result};
pub use session::Session;
pub use state::{Document, DocumentId, DocumentStatus, DocumentTabs};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::dispatch::{DispatchHandle, Dispatcher, Payload, Transport};
    pub use crate::error::{Error, Result};
    pub use crate::io::{LoadedFile, Platform};
    pub use crate::presentation::{ViewState, derive_view, line_count};
    pub use crate::session::Session;
    pub use crate::state::{
        CloseOutcome, Closed, Document, DocumentId, DocumentStatus, DocumentTabs, PendingClose,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
