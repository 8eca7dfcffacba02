//! Shared primitive types used by the trie, tokenizer and logging layers.

pub mod span;

pub use span::{Position, Span};
