#![allow(non_snake_case)]
//! # LuauSyntax
//!
//! Tokenization grammar for Luau, derived from a base Lua grammar, and the
//! tokenizer that turns source text into highlighted spans.
//!
//! ## Quick Start
//!
//! ```
//! use luausyntax::prelude::*;
//!
//! let grammar = luau::shared()?;
//! let tokens = tokenize("local x = 1 -- one", grammar);
//! assert_eq!(tokens[0].kind, TokenKind::Keyword);
//! # Ok::<(), luausyntax::Error>(())
//! ```
//!
//! ## Deriving a grammar
//!
//! The Luau grammar is the Lua grammar with its keyword, operator, comment and
//! string rules replaced and a declaration-name rule added:
//!
//! ```
//! use luausyntax::grammar::{lua, luau};
//!
//! let base = lua::grammar()?;
//! let extended = luau::extend(&base)?;
//! assert_eq!(luau::extend(&extended)?, extended);
//! # Ok::<(), luausyntax::Error>(())
//! ```

pub mod error;
pub mod grammar;
pub mod scanner;
pub mod tokenizer;

// Re-exports for convenience
pub use error::{Error, Result};
pub use grammar::{Grammar, Pattern, TokenKind};
pub use tokenizer::{TokenSpan, tokenize};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::grammar::{Grammar, Matcher, Pattern, TokenKind, lua, luau};
    pub use crate::tokenizer::{TokenSpan, tokenize};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
