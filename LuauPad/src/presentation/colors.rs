//! Display colors per token kind (VS Code dark palette)

use luausyntax::TokenKind;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Nearest entry in the 6x6x6 cube of the 256-color terminal palette
    pub fn to_ansi256(self) -> u8 {
        fn level(c: u8) -> u8 {
            // Cube steps are 0, 95, 135, 175, 215, 255
            if c < 48 {
                0
            } else if c < 115 {
                1
            } else {
                (c - 35) / 40
            }
        }
        16 + 36 * level(self.0) + 6 * level(self.1) + level(self.2)
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Colors for syntax highlighting
pub struct SyntaxColors;

impl SyntaxColors {
    pub const COMMENT: Rgb = Rgb(106, 153, 85); // Green
    pub const STRING: Rgb = Rgb(206, 145, 120); // Orange/brown
    pub const NUMBER: Rgb = Rgb(181, 206, 168); // Light green
    pub const KEYWORD: Rgb = Rgb(197, 134, 192); // Purple
    pub const FUNCTION: Rgb = Rgb(220, 220, 170); // Pale yellow
    pub const CLASS_NAME: Rgb = Rgb(78, 201, 176); // Teal
    pub const OPERATOR: Rgb = Rgb(212, 212, 212);
    pub const PUNCTUATION: Rgb = Rgb(128, 128, 128);
    pub const PLAIN: Rgb = Rgb(212, 212, 212); // Light gray

    /// Line-number gutter
    pub const GUTTER: Rgb = Rgb(133, 133, 133);

    pub fn for_token(kind: TokenKind) -> Rgb {
        match kind {
            TokenKind::Comment => Self::COMMENT,
            TokenKind::String => Self::STRING,
            TokenKind::Number => Self::NUMBER,
            TokenKind::Keyword => Self::KEYWORD,
            TokenKind::Function => Self::FUNCTION,
            TokenKind::ClassName => Self::CLASS_NAME,
            TokenKind::Operator => Self::OPERATOR,
            TokenKind::Punctuation => Self::PUNCTUATION,
            TokenKind::Plain => Self::PLAIN,
        }
    }
}
