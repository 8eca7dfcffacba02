//! Token types produced by the tokenizer
//!
//! A [`Token`] pairs a [`TokenKind`] with the exact source text it covers and
//! the span of that text. Kinds are coarse: the tokenizer only distinguishes
//! dictionary symbols, dictionary keywords, everything else (user words) and
//! the end-of-input marker.
//!
//! [`TokenKind`] doubles as the value type stored in the lexicon trie, so the
//! kind of a dictionary entry is exactly what classification returns.

pub mod token;

pub use token::{Token, TokenKind, UnknownTokenKind};

// Re-export span types from utils
pub use crate::utils::{Position, Span};
