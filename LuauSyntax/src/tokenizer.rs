//! Tokenizer: turns text into a gap-free stream of highlighted spans
//!
//! At each position every pattern reports its next match. The match that starts
//! first wins; ties go to the pattern listed first in the grammar. A non-greedy
//! winner is dropped when a greedy match (a string or comment) begins inside it,
//! so e.g. an operator can never eat the `-` that opens a comment. Text between
//! winners is emitted as [`TokenKind::Plain`].
//!
//! Lookbehind patterns are matched once over the whole text up front: their
//! context may already belong to an earlier token (`type` is a keyword, the
//! name after it is a class name).

use std::collections::VecDeque;

use serde::Serialize;

use crate::grammar::{Found, Grammar, Pattern, TokenKind};

/// A span of text with a specific token type
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<&'static str>,
}

impl TokenSpan {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

enum Upcoming {
    /// Recomputed lazily from the current position
    Search(Option<Found>),
    /// Precomputed matches for lookbehind patterns, in order
    Queue(VecDeque<Found>),
    Exhausted,
}

struct Candidate<'g> {
    kind: TokenKind,
    pattern: &'g Pattern,
    upcoming: Upcoming,
}

impl<'g> Candidate<'g> {
    fn new(kind: TokenKind, pattern: &'g Pattern, text: &str) -> Self {
        let upcoming = if pattern.is_lookbehind() {
            let mut queue = VecDeque::new();
            let mut from = 0;
            while let Some(found) = pattern.find(text, from) {
                from = found.full_end.max(found.span.end);
                queue.push_back(found);
            }
            Upcoming::Queue(queue)
        } else {
            Upcoming::Search(None)
        };
        Self {
            kind,
            pattern,
            upcoming,
        }
    }

    /// Next match whose token starts at or after `pos`
    fn next(&mut self, text: &str, pos: usize) -> Option<Found> {
        let found = match &mut self.upcoming {
            Upcoming::Exhausted => None,
            Upcoming::Queue(queue) => {
                while queue.front().is_some_and(|f| f.span.start < pos) {
                    queue.pop_front();
                }
                queue.front().cloned()
            }
            Upcoming::Search(cached) => {
                if cached.as_ref().is_none_or(|f| f.full_start < pos) {
                    *cached = self.pattern.find(text, pos);
                }
                cached.clone()
            }
        };
        if found.is_none() {
            self.upcoming = Upcoming::Exhausted;
        }
        found
    }
}

struct Winner {
    index: usize,
    start: usize,
    end: usize,
}

/// Tokenize `text` with `grammar`.
///
/// The result covers the text exactly, without overlaps. Empty text produces no tokens.
pub fn tokenize(text: &str, grammar: &Grammar) -> Vec<TokenSpan> {
    let mut tokens = Vec::new();
    if text.is_empty() {
        return tokens;
    }

    let mut candidates: Vec<Candidate<'_>> = grammar
        .rules()
        .flat_map(|(kind, patterns)| patterns.iter().map(move |p| (kind, p)))
        .map(|(kind, pattern)| Candidate::new(kind, pattern, text))
        .collect();

    let mut pos = 0;
    while pos < text.len() {
        let mut matches: Vec<Winner> = Vec::new();
        for (index, candidate) in candidates.iter_mut().enumerate() {
            if let Some(found) = candidate.next(text, pos) {
                matches.push(Winner {
                    index,
                    start: found.span.start,
                    end: found.span.end,
                });
            }
        }

        let Some(winner) = pick(&matches, &candidates) else {
            push_plain(&mut tokens, pos, text.len());
            break;
        };

        push_plain(&mut tokens, pos, winner.start);
        let candidate = &candidates[winner.index];
        tokens.push(TokenSpan {
            start: winner.start,
            end: winner.end,
            kind: candidate.kind,
            alias: candidate.pattern.alias_name(),
        });
        pos = winner.end;
    }

    tracing::trace!(len = text.len(), tokens = tokens.len(), "tokenized");
    tokens
}

/// Earliest start wins, ties by grammar order; a greedy match starting inside a
/// non-greedy winner takes its place.
fn pick<'m>(matches: &'m [Winner], candidates: &[Candidate<'_>]) -> Option<&'m Winner> {
    let first = matches.iter().min_by_key(|m| (m.start, m.index))?;
    if candidates[first.index].pattern.is_greedy() {
        return Some(first);
    }

    let displaced = matches
        .iter()
        .filter(|m| candidates[m.index].pattern.is_greedy())
        .filter(|m| m.start >= first.start && m.start < first.end)
        .min_by_key(|m| (m.start, m.index));
    Some(displaced.unwrap_or(first))
}

fn push_plain(tokens: &mut Vec<TokenSpan>, start: usize, end: usize) {
    if start < end {
        tokens.push(TokenSpan {
            start,
            end,
            kind: TokenKind::Plain,
            alias: None,
        });
    }
}
