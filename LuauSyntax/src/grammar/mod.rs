//! Grammar model: an ordered table of token rules
//!
//! A [`Grammar`] maps each [`TokenKind`] to one or more [`Pattern`]s. Table order is
//! match priority: when two patterns claim a span starting at the same offset, the
//! one listed first wins. Replacing a rule keeps its position in the table; adding
//! a new rule appends it.
//!
//! Grammars are plain values. Deriving the Luau grammar from the Lua grammar
//! produces a new table and leaves the base untouched (see [`luau::extend`]).

pub mod lua;
pub mod luau;

use std::fmt;
use std::ops::Range;

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::scanner;

/// Classification of a highlighted span
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    Comment,
    String,
    Number,
    Keyword,
    Function,
    /// Name introduced by a declaration keyword (`type Foo`)
    ClassName,
    Operator,
    Punctuation,
    /// Text no rule matched
    Plain,
}

impl TokenKind {
    /// Stable lowercase name, used for CSS-style class names and JSON output
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Keyword => "keyword",
            TokenKind::Function => "function",
            TokenKind::ClassName => "class-name",
            TokenKind::Operator => "operator",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Plain => "plain",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a pattern finds its matches
#[derive(Clone, Debug)]
pub enum Matcher {
    /// A regular expression. With `lookbehind`, capture group 1 is context and
    /// is excluded from the token.
    Regex(Regex),
    /// `'...'` / `"..."` with escapes, `\z` whitespace skipping and `\`-newline
    /// continuation. Needs a back-reference to the opening quote, so it is scanned.
    QuotedString,
    /// `[[...]]`, `[==[...]==]`; the closing bracket must carry the same number
    /// of `=` as the opening one.
    LongBracket,
    /// `--` followed by a long bracket, or `--` to end of line.
    LuaComment,
}

impl PartialEq for Matcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Matcher::Regex(a), Matcher::Regex(b)) => a.as_str() == b.as_str(),
            (Matcher::QuotedString, Matcher::QuotedString)
            | (Matcher::LongBracket, Matcher::LongBracket)
            | (Matcher::LuaComment, Matcher::LuaComment) => true,
            _ => false,
        }
    }
}

/// Trailing context that must (or must not) follow a match
#[derive(Clone, Debug)]
pub enum Lookahead {
    Followed(Regex),
    NotFollowed(Regex),
}

impl Lookahead {
    fn accepts(&self, rest: &str) -> bool {
        match self {
            Lookahead::Followed(re) => re.is_match(rest),
            Lookahead::NotFollowed(re) => !re.is_match(rest),
        }
    }

    fn as_str(&self) -> (bool, &str) {
        match self {
            Lookahead::Followed(re) => (true, re.as_str()),
            Lookahead::NotFollowed(re) => (false, re.as_str()),
        }
    }
}

impl PartialEq for Lookahead {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// A match found by a pattern
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Found {
    /// Where the whole match (including lookbehind context) starts
    pub full_start: usize,
    /// Where the whole match ends
    pub full_end: usize,
    /// The highlighted part
    pub span: Range<usize>,
}

/// One alternative of a rule
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    matcher: Matcher,
    lookbehind: bool,
    greedy: bool,
    lookahead: Option<Lookahead>,
    alias: Option<&'static str>,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Lookahead expressions are tested against the text following a match, so
/// they are anchored at its start.
fn compile_anchored(pattern: &str) -> Result<Regex> {
    compile(&format!("^(?:{pattern})"))
}

impl Pattern {
    pub fn new(matcher: Matcher) -> Self {
        Self {
            matcher,
            lookbehind: false,
            greedy: false,
            lookahead: None,
            alias: None,
        }
    }

    /// Pattern backed by a regular expression
    pub fn regex(pattern: &str) -> Result<Self> {
        Ok(Self::new(Matcher::Regex(compile(pattern)?)))
    }

    /// Treat capture group 1 as context that precedes the token
    #[must_use]
    pub fn lookbehind(mut self) -> Self {
        self.lookbehind = true;
        self
    }

    /// Greedy patterns are matched against the whole text: a non-greedy match that
    /// would swallow the start of a greedy one is discarded in its favour.
    #[must_use]
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    /// Require the text after the match to start with `pattern`
    pub fn followed_by(mut self, pattern: &str) -> Result<Self> {
        self.lookahead = Some(Lookahead::Followed(compile_anchored(pattern)?));
        Ok(self)
    }

    /// Reject matches whose following text starts with `pattern`
    pub fn not_followed_by(mut self, pattern: &str) -> Result<Self> {
        self.lookahead = Some(Lookahead::NotFollowed(compile_anchored(pattern)?));
        Ok(self)
    }

    /// Secondary label reported on tokens produced by this pattern
    #[must_use]
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn is_lookbehind(&self) -> bool {
        self.lookbehind
    }

    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    pub fn alias_name(&self) -> Option<&'static str> {
        self.alias
    }

    /// Find the first match whose full extent starts at or after `from`.
    ///
    /// Empty matches and matches rejected by the lookahead are skipped.
    pub fn find(&self, text: &str, from: usize) -> Option<Found> {
        let mut at = from;
        while at <= text.len() {
            let found = match &self.matcher {
                Matcher::Regex(re) => {
                    let caps = re.captures_at(text, at)?;
                    let m = caps.get(0)?;
                    let token_start = if self.lookbehind {
                        caps.get(1).map_or(m.start(), |ctx| ctx.end())
                    } else {
                        m.start()
                    };
                    Found {
                        full_start: m.start(),
                        full_end: m.end(),
                        span: token_start..m.end(),
                    }
                }
                Matcher::QuotedString => whole(scanner::quoted_string(text, at)?),
                Matcher::LongBracket => whole(scanner::long_bracket(text, at)?),
                Matcher::LuaComment => whole(scanner::lua_comment(text, at)?),
            };

            let accepted = !found.span.is_empty()
                && self
                    .lookahead
                    .as_ref()
                    .is_none_or(|la| la.accepts(&text[found.full_end..]));
            if accepted {
                return Some(found);
            }
            at = scanner::next_boundary(text, found.full_start);
        }
        None
    }
}

fn whole(range: Range<usize>) -> Found {
    Found {
        full_start: range.start,
        full_end: range.end,
        span: range,
    }
}

/// Ordered rule table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grammar {
    rules: IndexMap<TokenKind, Vec<Pattern>>,
}

impl Grammar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Grammar::set_rule`]
    #[must_use]
    pub fn with_rule(mut self, kind: TokenKind, patterns: Vec<Pattern>) -> Self {
        self.set_rule(kind, patterns);
        self
    }

    /// Replace the rule for `kind` in place, or append it if the table has none
    pub fn set_rule(&mut self, kind: TokenKind, patterns: Vec<Pattern>) {
        self.rules.insert(kind, patterns);
    }

    pub fn rule(&self, kind: TokenKind) -> Option<&[Pattern]> {
        self.rules.get(&kind).map(Vec::as_slice)
    }

    /// Rules in priority order
    pub fn rules(&self) -> impl Iterator<Item = (TokenKind, &[Pattern])> {
        self.rules.iter().map(|(kind, patterns)| (*kind, patterns.as_slice()))
    }

    pub fn kinds(&self) -> Vec<TokenKind> {
        self.rules.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
