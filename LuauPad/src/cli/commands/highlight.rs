//! Highlight and line-count commands

use std::path::Path;

use anyhow::Context;
use console::Style;
use luausyntax::grammar::luau;
use luausyntax::{TokenSpan, tokenize};
use serde::Serialize;

use crate::io::read_text_file;
use crate::presentation::{SyntaxColors, line_count};

#[derive(Serialize)]
struct JsonToken<'a> {
    #[serde(flatten)]
    span: &'a TokenSpan,
    text: &'a str,
}

/// Print a file highlighted, or its tokens as JSON
pub fn execute(path: &Path, json: bool) -> anyhow::Result<()> {
    let file = read_text_file(path)?;
    let grammar = luau::shared().context("failed to build the Luau grammar")?;
    let tokens = tokenize(&file.content, grammar);

    if json {
        println!("{}", tokens_json(&file.content, &tokens)?);
    } else {
        println!("{}", render(&file.content, &tokens, console::colors_enabled()));
    }
    Ok(())
}

/// Token stream as a JSON array; each entry carries its source text
pub fn tokens_json(text: &str, tokens: &[TokenSpan]) -> serde_json::Result<String> {
    let out: Vec<JsonToken> = tokens
        .iter()
        .map(|span| JsonToken {
            span,
            text: span.text(text),
        })
        .collect();
    serde_json::to_string_pretty(&out)
}

/// Print the line count of a file
pub fn lines(path: &Path) -> anyhow::Result<()> {
    println!("{}", count_lines(path)?);
    Ok(())
}

fn count_lines(path: &Path) -> anyhow::Result<usize> {
    let file = read_text_file(path)?;
    Ok(line_count(&file.content))
}

fn push_gutter(out: &mut String, line: usize, width: usize, style: &Style) {
    let label = format!("{line:>width$} | ");
    out.push_str(&style.apply_to(label).to_string());
}

/// Source text with a line-number gutter, colored per token when `colored`
pub fn render(text: &str, tokens: &[TokenSpan], colored: bool) -> String {
    let width = line_count(text).to_string().len();
    let gutter = Style::new()
        .color256(SyntaxColors::GUTTER.to_ansi256())
        .force_styling(colored);

    let mut out = String::with_capacity(text.len() * 2);
    let mut line = 1;
    push_gutter(&mut out, line, width, &gutter);

    for token in tokens {
        let style = Style::new()
            .color256(SyntaxColors::for_token(token.kind).to_ansi256())
            .force_styling(colored);
        for (i, piece) in token.text(text).split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
                line += 1;
                push_gutter(&mut out, line, width, &gutter);
            }
            if !piece.is_empty() {
                out.push_str(&style.apply_to(piece).to_string());
            }
        }
    }
    out
}
