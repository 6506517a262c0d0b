//! A single open document and its identifier

use std::fmt;

use serde::Serialize;

/// Opaque document identifier, unique for the lifetime of the process
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues ids from the creation timestamp plus a discriminator.
///
/// Ids are strictly increasing `(millis, sequence)` pairs, so two documents
/// created within the same millisecond (or after a clock step backwards) still
/// get distinct ids, and an id is never handed out twice.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: Option<(i64, u32)>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> DocumentId {
        self.next_at(chrono::Utc::now().timestamp_millis())
    }

    /// Issue an id for a document created at `millis`
    pub fn next_at(&mut self, millis: i64) -> DocumentId {
        let (millis, sequence) = match self.last {
            Some((last, seq)) if millis <= last => (last, seq + 1),
            _ => (millis, 0),
        };
        self.last = Some((millis, sequence));

        if sequence == 0 {
            DocumentId(format!("tab-{millis}"))
        } else {
            DocumentId(format!("tab-{millis}-{sequence}"))
        }
    }
}

/// Unsaved-changes state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DocumentStatus {
    /// Content matches the last export
    Clean,
    /// Edited since the last export
    Dirty,
}

/// One open, named, editable text buffer
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Document {
    id: DocumentId,
    name: String,
    content: String,
    saved: bool,
    path: Option<String>,
    /// Bumped on every content edit, including edits that leave the text unchanged
    revision: u64,
}

impl Document {
    pub(crate) fn new(id: DocumentId, name: String, content: String, path: Option<String>) -> Self {
        Self {
            id,
            name,
            content,
            saved: true,
            path,
            revision: 0,
        }
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Origin filename, only for documents opened from a local file
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn status(&self) -> DocumentStatus {
        if self.saved {
            DocumentStatus::Clean
        } else {
            DocumentStatus::Dirty
        }
    }

    /// Tab label: the name, with ` *` while there are unsaved changes
    pub fn label(&self) -> String {
        if self.saved {
            self.name.clone()
        } else {
            format!("{} *", self.name)
        }
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
        self.saved = false;
        self.revision += 1;
    }

    pub(crate) fn mark_saved(&mut self) {
        self.saved = true;
    }
}
