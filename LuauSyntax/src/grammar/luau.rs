//! Luau rule overrides on top of the Lua grammar
//!
//! [`extend`] takes a base table and returns a new one; the base is never
//! modified. Every override replaces a whole rule, so extending an already
//! extended grammar yields an equal grammar.

use std::sync::OnceLock;

use super::lua::{self, keyword_pattern};
use super::{Grammar, Matcher, Pattern, TokenKind};
use crate::error::Result;

/// Reserved words: Lua control flow, Luau additions and the scheduler intrinsics
pub const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
    "continue", "export", "type", "typeof", "task.spawn", "task.wait", "task.delay",
];

/// Keyword whose following identifier is highlighted as a declared name
pub const DECLARATION_KEYWORD: &str = "type";

/// Comment aliases reported on tokens, so block and line comments can be told apart
pub const BLOCK_COMMENT: &str = "block";
pub const LINE_COMMENT: &str = "line";

/// Apply the Luau overrides to `base`.
pub fn extend(base: &Grammar) -> Result<Grammar> {
    let mut grammar = base.clone();

    grammar.set_rule(
        TokenKind::Keyword,
        vec![Pattern::regex(&keyword_pattern(KEYWORDS))?],
    );

    grammar.set_rule(
        TokenKind::ClassName,
        vec![Pattern::regex(&format!(r"(\b(?:{DECLARATION_KEYWORD})\s+)(\w+)"))?.lookbehind()],
    );

    grammar.set_rule(
        TokenKind::Operator,
        vec![Pattern::regex(r"[=+\-*/%^#<>]=?|[~:]")?],
    );

    grammar.set_rule(
        TokenKind::Comment,
        vec![
            Pattern::regex(r"(?m)^--\[\[[\s\S]*?\]\]")?
                .greedy()
                .alias(BLOCK_COMMENT),
            Pattern::regex(r"--\[\[[\s\S]*?\]\]")?
                .greedy()
                .alias(BLOCK_COMMENT),
            Pattern::regex(r"(?m)--.*$")?.greedy().alias(LINE_COMMENT),
        ],
    );

    grammar.set_rule(
        TokenKind::String,
        vec![
            Pattern::new(Matcher::QuotedString).greedy(),
            Pattern::new(Matcher::LongBracket).greedy(),
        ],
    );

    Ok(grammar)
}

/// The Luau grammar, built from the Lua grammar on first use
pub fn grammar() -> Result<Grammar> {
    extend(&lua::grammar()?)
}

static SHARED: OnceLock<Result<Grammar>> = OnceLock::new();

/// Process-wide Luau grammar, built once and shared by every caller
pub fn shared() -> Result<&'static Grammar> {
    SHARED
        .get_or_init(|| {
            tracing::debug!("building Luau grammar");
            grammar()
        })
        .as_ref()
        .map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extend_is_idempotent() {
        let base = lua::grammar().unwrap();
        let once = extend(&base).unwrap();
        let twice = extend(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_extend_leaves_base_untouched() {
        let base = lua::grammar().unwrap();
        let snapshot = base.clone();
        let extended = extend(&base).unwrap();

        assert_eq!(base, snapshot);
        assert_ne!(base, extended);
        assert!(base.rule(TokenKind::ClassName).is_none());
    }

    #[test]
    fn test_class_name_appended_last() {
        let grammar = grammar().unwrap();
        assert_eq!(grammar.kinds().last(), Some(&TokenKind::ClassName));
        assert_eq!(grammar.kinds().first(), Some(&TokenKind::Comment));
    }

    #[test]
    fn test_shared_is_built_once() {
        let a = shared().unwrap();
        let b = shared().unwrap();
        assert!(std::ptr::eq(a, b));
    }
}
