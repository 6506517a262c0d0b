use luausyntax::prelude::*;
use pretty_assertions::assert_eq;

fn summary(text: &str, grammar: &Grammar) -> Vec<(TokenKind, Option<&'static str>, String)> {
    tokenize(text, grammar)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Plain)
        .map(|t| (t.kind, t.alias, t.text(text).to_string()))
        .collect()
}

#[test]
fn test_block_and_line_comments_do_not_bleed() {
    let grammar = luau::shared().unwrap();
    let text = "--[[ block ]] local x --line\nreturn x";

    assert_eq!(
        summary(text, grammar),
        vec![
            (TokenKind::Comment, Some("block"), "--[[ block ]]".to_string()),
            (TokenKind::Keyword, None, "local".to_string()),
            (TokenKind::Comment, Some("line"), "--line".to_string()),
            (TokenKind::Keyword, None, "return".to_string()),
        ]
    );
}

#[test]
fn test_block_comment_spans_lines() {
    let grammar = luau::shared().unwrap();
    let text = "x = 1\n--[[ first\nsecond ]]\ny = 2";
    let comments: Vec<_> = summary(text, grammar)
        .into_iter()
        .filter(|(kind, _, _)| *kind == TokenKind::Comment)
        .collect();

    assert_eq!(
        comments,
        vec![(
            TokenKind::Comment,
            Some("block"),
            "--[[ first\nsecond ]]".to_string()
        )]
    );
}

#[test]
fn test_double_extension_tokenizes_identically() {
    let base = lua::grammar().unwrap();
    let once = luau::extend(&base).unwrap();
    let twice = luau::extend(&once).unwrap();

    let text = r#"
export type Vec = { x: number, y: number }
local function len(v: Vec): number
    --[[ squared ]] return math.sqrt(v.x ^ 2 + v.y ^ 2)
end
task.spawn(function() print("len", len({ x = 3, y = 4 })) end)
local s = [==[ raw ]] text ]==]
"#;
    assert_eq!(tokenize(text, &once), tokenize(text, &twice));
}

#[test]
fn test_long_strings_and_quotes() {
    let grammar = luau::shared().unwrap();
    let text = "local a, b = [=[x]]y]=], 'it\\'s'";
    let strings: Vec<String> = summary(text, grammar)
        .into_iter()
        .filter(|(kind, _, _)| *kind == TokenKind::String)
        .map(|(_, _, s)| s)
        .collect();

    assert_eq!(strings, vec!["[=[x]]y]=]".to_string(), "'it\\'s'".to_string()]);
}

#[test]
fn test_unterminated_string_falls_back_to_plain() {
    let grammar = luau::shared().unwrap();
    let text = "print('oops)\nlocal y";
    let tokens = tokenize(text, grammar);

    assert!(tokens.iter().all(|t| t.kind != TokenKind::String));
    assert_eq!(
        tokens.last().map(|t| (t.kind, t.text(text))),
        Some((TokenKind::Plain, " y"))
    );
}

#[test]
fn test_operators_and_declaration() {
    let grammar = luau::shared().unwrap();
    let text = "type Id = number\nif a >= b and a ~= c then end";

    assert_eq!(
        summary(text, grammar),
        vec![
            (TokenKind::Keyword, None, "type".to_string()),
            (TokenKind::ClassName, None, "Id".to_string()),
            (TokenKind::Operator, None, "=".to_string()),
            (TokenKind::Keyword, None, "if".to_string()),
            (TokenKind::Operator, None, ">=".to_string()),
            (TokenKind::Keyword, None, "and".to_string()),
            (TokenKind::Operator, None, "~".to_string()),
            (TokenKind::Operator, None, "=".to_string()),
            (TokenKind::Keyword, None, "then".to_string()),
            (TokenKind::Keyword, None, "end".to_string()),
        ]
    );
}

#[test]
fn test_unclosed_long_brackets_scale_linearly() {
    let grammar = luau::shared().unwrap();
    let text = "[[".repeat(20_000);

    let started = std::time::Instant::now();
    let tokens = tokenize(&text, grammar);
    assert!(started.elapsed() < std::time::Duration::from_secs(2));

    assert!(tokens.iter().all(|t| t.kind != TokenKind::String));
    assert_eq!(tokens.first().map(|t| t.start), Some(0));
    assert_eq!(tokens.last().map(|t| t.end), Some(text.len()));
    assert!(tokens.windows(2).all(|pair| pair[0].end == pair[1].start));
}
