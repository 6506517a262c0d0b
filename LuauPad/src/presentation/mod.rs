//! Presentation sync: what the display shows for the active document
//!
//! Everything here is derived from the document model. The only state kept is
//! the [`Presenter`]'s cache of the last derivation.

pub mod colors;
pub mod scroll;

pub use colors::{Rgb, SyntaxColors};
pub use scroll::{Gutter, LineGutter, ListenerId, ScrollMirror, ScrollSurface, Viewport};

use luausyntax::{Grammar, TokenSpan, tokenize};
use serde::Serialize;
use tracing::trace;

use crate::state::{Document, DocumentId, DocumentTabs};

/// Number of lines: line breaks plus one, so empty text has one line
pub fn line_count(content: &str) -> usize {
    content.bytes().filter(|&b| b == b'\n').count() + 1
}

/// Gutter labels `1..=line_count`
pub fn gutter_labels(line_count: usize) -> Vec<String> {
    (1..=line_count).map(|n| n.to_string()).collect()
}

/// Derived view of one document
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ViewState {
    pub document: DocumentId,
    pub revision: u64,
    pub line_count: usize,
    pub tokens: Vec<TokenSpan>,
}

/// Pure derivation of the view for `document`
pub fn derive_view(document: &Document, grammar: &Grammar) -> ViewState {
    ViewState {
        document: document.id().clone(),
        revision: document.revision(),
        line_count: line_count(document.content()),
        tokens: tokenize(document.content(), grammar),
    }
}

/// Derives views, re-tokenizing only when the document or its revision changed
#[derive(Debug)]
pub struct Presenter {
    grammar: Grammar,
    cached: Option<ViewState>,
}

impl Presenter {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            cached: None,
        }
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn view(&mut self, document: &Document) -> &ViewState {
        let stale = self.cached.as_ref().is_none_or(|view| {
            &view.document != document.id() || view.revision != document.revision()
        });
        if stale {
            trace!(id = %document.id(), revision = document.revision(), "deriving view");
            self.cached = None;
        }
        self.cached
            .get_or_insert_with(|| derive_view(document, &self.grammar))
    }
}

/// One entry of the tab strip
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TabLabel {
    pub id: DocumentId,
    pub label: String,
    pub active: bool,
}

pub fn tab_labels(tabs: &DocumentTabs) -> Vec<TabLabel> {
    tabs.documents()
        .iter()
        .map(|doc| TabLabel {
            id: doc.id().clone(),
            label: doc.label(),
            active: doc.id() == tabs.active_id(),
        })
        .collect()
}
