//! Base grammar for Lua 5.x

use super::{Grammar, Matcher, Pattern, TokenKind};
use crate::error::Result;

pub const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

const NUMBER: &str = r"(?i)\b0x[a-f\d]+(?:\.[a-f\d]*)?(?:p[+-]?\d+)?\b|\b\d+(?:\.\B|(?:\.\d*)?(?:e[+-]?\d+)?\b)|\B\.\d+(?:e[+-]?\d+)?\b";

/// `\b(?:word|word|...)\b`, with `.` in qualified names escaped
pub fn keyword_pattern(words: &[&str]) -> String {
    let alternatives: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    format!(r"\b(?:{})\b", alternatives.join("|"))
}

/// Build the Lua grammar.
///
/// Rule order: comment, string, number, keyword, function, operator, punctuation.
pub fn grammar() -> Result<Grammar> {
    Ok(Grammar::new()
        .with_rule(
            TokenKind::Comment,
            vec![
                Pattern::regex(r"(?m)^#!.+")?,
                Pattern::new(Matcher::LuaComment),
            ],
        )
        .with_rule(
            TokenKind::String,
            vec![
                Pattern::new(Matcher::QuotedString).greedy(),
                Pattern::new(Matcher::LongBracket).greedy(),
            ],
        )
        .with_rule(TokenKind::Number, vec![Pattern::regex(NUMBER)?])
        .with_rule(TokenKind::Keyword, vec![Pattern::regex(&keyword_pattern(KEYWORDS))?])
        .with_rule(
            TokenKind::Function,
            vec![Pattern::regex(r"\b[^\W\d]\w*")?.followed_by(r"\s*[({]")?],
        )
        .with_rule(
            TokenKind::Operator,
            vec![
                Pattern::regex(r"[-+*%^&|#]|//?|<[<=]?|>[>=]?|[=~]=?")?,
                Pattern::regex(r"(^|[^.])\.\.")?
                    .lookbehind()
                    .not_followed_by(r"\.")?,
            ],
        )
        .with_rule(
            TokenKind::Punctuation,
            vec![Pattern::regex(r"[\[\](){},;]|\.+|:+")?],
        ))
}
