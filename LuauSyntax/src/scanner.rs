//! Hand-written scanners for constructs a regular expression cannot express
//!
//! Each `*(text, from)` function returns the first complete construct that starts
//! at or after `from`. A candidate start that fails to close is skipped and the
//! search resumes at the next byte, so an unterminated string never hides a
//! later, valid one.

use std::ops::Range;

/// Offset of the character boundary following `pos` (or `text.len() + 1` at the end)
pub fn next_boundary(text: &str, pos: usize) -> usize {
    text.get(pos..)
        .and_then(|rest| rest.chars().next())
        .map_or(text.len() + 1, |ch| pos + ch.len_utf8())
}

/// Quoted string: `'...'` or `"..."`
pub fn quoted_string(text: &str, from: usize) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let mut pos = from;
    while pos < bytes.len() {
        if bytes[pos] == b'"' || bytes[pos] == b'\'' {
            if let Some(end) = quoted_string_end(text, pos) {
                return Some(pos..end);
            }
        }
        pos += 1;
    }
    None
}

/// End offset (exclusive) of the string opened by the quote at `start`
fn quoted_string_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let quote = bytes[start];
    let mut pos = start + 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b if b == quote => return Some(pos + 1),
            b'\r' | b'\n' => return None,
            b'\\' => {
                let escaped = *bytes.get(pos + 1)?;
                pos += 2;
                if escaped == b'z' {
                    // \z must be followed by a line break or whitespace, which it skips
                    if bytes[pos..].starts_with(b"\r\n") {
                        pos += 2;
                    } else {
                        let ch = text.get(pos..)?.chars().next()?;
                        if !ch.is_whitespace() {
                            return None;
                        }
                        pos += ch.len_utf8();
                    }
                } else if escaped == b'\r' && bytes.get(pos) == Some(&b'\n') {
                    pos += 1;
                } else if !escaped.is_ascii() {
                    // Escaped multi-byte character: step over its continuation bytes
                    while pos < bytes.len() && !text.is_char_boundary(pos) {
                        pos += 1;
                    }
                }
            }
            _ => pos += 1,
        }
    }
    None
}

/// Long-bracket string: `[[...]]`, `[=[...]=]`, ...
pub fn long_bracket(text: &str, from: usize) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    // Levels whose opener already ran to the end of the text unclosed. Any later
    // opener of the same level has a subset of that search space.
    let mut unclosed: Vec<usize> = Vec::new();
    let mut pos = from;
    while pos < bytes.len() {
        if bytes[pos] == b'[' {
            if let Some((level, body)) = long_bracket_open(bytes, pos) {
                if !unclosed.contains(&level) {
                    match long_bracket_close(bytes, body, level) {
                        Some(end) => return Some(pos..end),
                        None => unclosed.push(level),
                    }
                }
            }
        }
        pos += 1;
    }
    None
}

/// Level and body offset of a long-bracket opener at `start`
fn long_bracket_open(bytes: &[u8], start: usize) -> Option<(usize, usize)> {
    let mut pos = start + 1;
    while pos < bytes.len() && bytes[pos] == b'=' {
        pos += 1;
    }
    let level = pos - start - 1;
    (bytes.get(pos) == Some(&b'[')).then_some((level, pos + 1))
}

/// End offset (exclusive) of the first `]` `=`*level `]` at or after `body`.
///
/// Only the exact opening level closes; `]==]` does not close a `[=[` and is
/// simply part of the body.
fn long_bracket_close(bytes: &[u8], body: usize, level: usize) -> Option<usize> {
    let mut pos = body;
    while pos < bytes.len() {
        if bytes[pos] == b']' {
            let close = pos + 1 + level;
            if close < bytes.len()
                && bytes[pos + 1..close].iter().all(|&b| b == b'=')
                && bytes[close] == b']'
            {
                return Some(close + 1);
            }
        }
        pos += 1;
    }
    None
}

/// End offset (exclusive) of the long bracket opened at `start`
fn long_bracket_end(bytes: &[u8], start: usize) -> Option<usize> {
    let (level, body) = long_bracket_open(bytes, start)?;
    long_bracket_close(bytes, body, level)
}

/// Lua comment: `--` + long bracket, or `--` up to the end of the line
pub fn lua_comment(text: &str, from: usize) -> Option<Range<usize>> {
    let bytes = text.as_bytes();
    let start = from + text.get(from..)?.find("--")?;
    let body = start + 2;

    if bytes.get(body) == Some(&b'[') {
        if let Some(end) = long_bracket_end(bytes, body) {
            return Some(start..end);
        }
    }

    let end = text[body..].find('\n').map_or(text.len(), |i| body + i);
    Some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_string_with_escapes() {
        let text = r#"print("a \"quoted\" word")"#;
        assert_eq!(quoted_string(text, 0), Some(6..25));
    }

    #[test]
    fn test_quoted_string_stops_at_newline() {
        let text = "x = 'open\ny = 'closed'";
        assert_eq!(quoted_string(text, 0), Some(14..22));
    }

    #[test]
    fn test_quoted_string_line_continuation() {
        let text = "'first\\\nsecond'";
        assert_eq!(quoted_string(text, 0), Some(0..text.len()));
    }

    #[test]
    fn test_quoted_string_z_escape() {
        let text = "\"a\\z  b\"";
        assert_eq!(quoted_string(text, 0), Some(0..text.len()));
        // \z followed by a non-space cannot continue the string
        assert_eq!(quoted_string("\"a\\zb\"", 0), None);
    }

    #[test]
    fn test_quoted_string_other_quote_inside() {
        assert_eq!(quoted_string(r#"'say "hi"'"#, 0), Some(0..10));
    }

    #[test]
    fn test_long_bracket_levels() {
        assert_eq!(long_bracket("[[abc]]", 0), Some(0..7));
        assert_eq!(long_bracket("[==[a]]b]==]", 0), Some(0..12));
    }

    #[test]
    fn test_long_bracket_mismatch_is_no_match() {
        assert_eq!(long_bracket("[==[abc]=]", 0), None);
        assert_eq!(long_bracket("[=[abc]==]", 0), None);
        assert_eq!(long_bracket("[=[abc]===] ]=]", 0), Some(0..15));
    }

    #[test]
    fn test_unclosed_level_does_not_hide_other_levels() {
        assert_eq!(long_bracket("[[ a [=[ b ]=]", 0), Some(5..14));
        assert_eq!(long_bracket("[=[ [[ x ]] ", 0), Some(4..11));
    }

    #[test]
    fn test_many_unclosed_openers() {
        let text = "[[".repeat(20_000);
        assert_eq!(long_bracket(&text, 0), None);

        let closed = format!("{text}]]");
        assert_eq!(long_bracket(&closed, 0), Some(0..closed.len()));
    }

    #[test]
    fn test_lua_comment_forms() {
        assert_eq!(lua_comment("x -- note\ny", 0), Some(2..9));
        assert_eq!(lua_comment("--[[a\nb]] c", 0), Some(0..9));
        assert_eq!(lua_comment("--[==[a]]\n]==]", 0), Some(0..14));
        // Unterminated block falls back to the line form
        assert_eq!(lua_comment("--[[ open\nnext", 0), Some(0..9));
    }

    #[test]
    fn test_next_boundary_multibyte() {
        let text = "é!";
        assert_eq!(next_boundary(text, 0), 2);
        assert_eq!(next_boundary(text, 2), 3);
        assert_eq!(next_boundary(text, 3), 4);
    }
}
