//! Lexical analysis
//!
//! Splits a character stream into [`Token`]s using a lexicon trie whose
//! values are [`TokenKind`] tags. The tokenizer never mutates the trie, so a
//! single lexicon can drive any number of tokenizers, across threads if it is
//! shared behind an `Arc`.

pub mod analyzer;
pub mod chars;
pub mod source;

use std::io::Read;

use crate::config::runtime::LexicalPreferences;
use crate::tokens::{Token, TokenKind};
use crate::trie::PrefixTrie;

pub use analyzer::{LexerError, LexicalMetrics, Tokenizer};
pub use source::{
    CharSource, CharStream, ReaderChars, ReaderSource, SourceError, StrChars, StrSource,
};

/// Tokenize a whole string, `End` included
pub fn tokenize_str(
    lexicon: &PrefixTrie<TokenKind>,
    input: &str,
    preferences: LexicalPreferences,
) -> Result<Vec<Token>, LexerError> {
    Tokenizer::with_preferences(lexicon, CharStream::from_str(input), preferences).collect()
}

/// Tokenize everything a reader yields, `End` included
pub fn tokenize_reader<R: Read>(
    lexicon: &PrefixTrie<TokenKind>,
    reader: R,
    preferences: LexicalPreferences,
) -> Result<(Vec<Token>, LexicalMetrics), LexerError> {
    let mut tokenizer =
        Tokenizer::with_preferences(lexicon, CharStream::from_reader(reader), preferences);
    let tokens = tokenizer.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok((tokens, tokenizer.metrics().clone()))
}
