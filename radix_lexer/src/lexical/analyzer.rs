//! Trie-driven tokenizer
//!
//! Each call to [`Tokenizer::next_token`] skips whitespace, then reads
//! characters until one of two boundaries is hit before the next character:
//!
//! - a word boundary: the character is whitespace, or its alphanumeric class
//!   differs from the previous character's;
//! - a completed symbol: the text so far is a `Symbol` entry and either its
//!   trie node has no children or the text extended by the character is not
//!   an entry path in the trie.
//!
//! The boundary character is pushed back for the next call. Text found in
//! the lexicon takes the kind stored there; anything else is `User`.

use serde::Serialize;

use crate::config::compile_time::lexical::*;
use crate::config::runtime::LexicalPreferences;
use crate::lexical::chars::hits_word_boundary;
use crate::lexical::source::{CharSource, SourceError};
use crate::logging::{codes, Code};
use crate::tokens::{Token, TokenKind};
use crate::trie::PrefixTrie;
use crate::utils::Span;
use crate::{log_debug, log_error, log_success};

/// Lexical analysis errors. Any of them halts the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Token too long: {length} characters (max {MAX_TOKEN_LENGTH})")]
    TokenTooLong { length: usize },

    #[error("Too many tokens: {count} (max {MAX_TOKEN_COUNT})")]
    TooManyTokens { count: usize },
}

impl LexerError {
    pub fn error_code(&self) -> Code {
        match self {
            LexerError::Source(err) => err.error_code(),
            LexerError::TokenTooLong { .. } => codes::lexical::TOKEN_TOO_LONG,
            LexerError::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
        }
    }
}

/// Counters gathered while tokenizing
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct LexicalMetrics {
    /// Tokens emitted, not counting `End`
    pub total_tokens: usize,
    pub keyword_tokens: usize,
    pub symbol_tokens: usize,
    pub user_tokens: usize,
    /// Longest token text, in characters
    pub longest_token: usize,
    pub whitespace_skipped: usize,
    /// Characters consumed overall
    pub chars_read: usize,
}

impl LexicalMetrics {
    pub(crate) fn record_token(&mut self, token: &Token, char_count: usize) {
        match token.kind {
            TokenKind::End => return,
            TokenKind::Keyword => self.keyword_tokens += 1,
            TokenKind::Symbol => self.symbol_tokens += 1,
            TokenKind::User => self.user_tokens += 1,
        }
        self.total_tokens += 1;
        self.longest_token = self.longest_token.max(char_count);
    }

    pub fn count_of(&self, kind: TokenKind) -> usize {
        match kind {
            TokenKind::End => 0,
            TokenKind::Keyword => self.keyword_tokens,
            TokenKind::Symbol => self.symbol_tokens,
            TokenKind::User => self.user_tokens,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Running,
    Finished,
    Failed,
}

/// Streaming tokenizer over a [`CharSource`] and a read-only lexicon trie
pub struct Tokenizer<'l, S> {
    source: S,
    lexicon: &'l PrefixTrie<TokenKind>,
    is_whitespace: fn(char) -> bool,
    preferences: LexicalPreferences,
    metrics: LexicalMetrics,
    token_count: usize,
    state: State,
}

impl<'l, S: CharSource> Tokenizer<'l, S> {
    /// Tokenizer with default preferences: C-locale whitespace, metrics on
    pub fn new(lexicon: &'l PrefixTrie<TokenKind>, source: S) -> Self {
        Self::with_preferences(lexicon, source, LexicalPreferences::default())
    }

    pub fn with_preferences(
        lexicon: &'l PrefixTrie<TokenKind>,
        source: S,
        preferences: LexicalPreferences,
    ) -> Self {
        Self {
            source,
            lexicon,
            is_whitespace: preferences.whitespace.predicate(),
            preferences,
            metrics: LexicalMetrics::default(),
            token_count: 0,
            state: State::Running,
        }
    }

    /// Replace the whitespace predicate
    pub fn with_whitespace(mut self, is_whitespace: fn(char) -> bool) -> Self {
        self.is_whitespace = is_whitespace;
        self
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    pub fn lexicon(&self) -> &'l PrefixTrie<TokenKind> {
        self.lexicon
    }

    /// True once `End` was produced or an error halted tokenization
    pub fn is_finished(&self) -> bool {
        self.state != State::Running
    }

    /// Release the underlying source
    pub fn into_source(self) -> S {
        self.source
    }

    /// Kind stored for `text`, or `User` when it is not an entry
    pub fn classify(&self, text: &str) -> TokenKind {
        self.lexicon
            .get(text)
            .and_then(|values| values.first().copied())
            .unwrap_or(TokenKind::User)
    }

    /// Produce the next token.
    ///
    /// Once `End` has been returned, or an error has halted tokenization,
    /// every further call returns `End` again without touching the source.
    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        if self.state != State::Running {
            return Ok(Token::end(Span::empty_at(self.source.position())));
        }

        match self.scan_token() {
            Ok(token) => {
                if token.is_end() {
                    self.state = State::Finished;
                    self.log_completion();
                }
                Ok(token)
            }
            Err(err) => {
                self.state = State::Failed;
                log_error!(err.error_code(), &err.to_string(),
                    span = Span::empty_at(self.source.position()),
                    "tokens_emitted" => self.token_count
                );
                Err(err)
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace()?;

        let start = self.source.position();
        let mut text = String::new();
        let mut char_count = 0usize;
        let mut prev: Option<char> = None;

        while let Some(ch) = self.source.get()? {
            if let Some(prev) = prev {
                if self.ends_token(&text, prev, ch) {
                    self.source.unget(ch);
                    break;
                }
            }

            text.push(ch);
            char_count += 1;
            if char_count > MAX_TOKEN_LENGTH {
                return Err(LexerError::TokenTooLong { length: char_count });
            }
            prev = Some(ch);
        }

        let span = Span::new(start, self.source.position());
        if text.is_empty() {
            return Ok(Token::end(span));
        }

        self.token_count += 1;
        if self.token_count > MAX_TOKEN_COUNT {
            return Err(LexerError::TooManyTokens {
                count: self.token_count,
            });
        }

        let token = Token::new(self.classify(&text), text, span);

        if self.preferences.collect_metrics {
            self.metrics.chars_read += char_count;
            self.metrics.record_token(&token, char_count);
        }
        if self.preferences.log_token_events {
            log_debug!("Token emitted",
                "kind" => token.kind,
                "text" => format!("{:?}", token.text),
                "at" => token.span.start()
            );
        }

        Ok(token)
    }

    fn skip_whitespace(&mut self) -> Result<(), SourceError> {
        while let Some(ch) = self.source.peek()? {
            if !(self.is_whitespace)(ch) {
                break;
            }
            self.source.get()?;
            if self.preferences.collect_metrics {
                self.metrics.whitespace_skipped += 1;
                self.metrics.chars_read += 1;
            }
        }
        Ok(())
    }

    /// Whether `text` is complete given the following character `next`
    fn ends_token(&self, text: &str, prev: char, next: char) -> bool {
        hits_word_boundary(prev, next, self.is_whitespace) || self.completes_symbol(text, next)
    }

    /// Greedy longest match: a symbol only keeps growing while a trie entry
    /// path continues with `next`
    fn completes_symbol(&self, text: &str, next: char) -> bool {
        let Some(node) = self.lexicon.find_exact(text) else {
            return false;
        };
        if !node.values().first().is_some_and(|kind| kind.is_symbol()) {
            return false;
        }
        if node.is_terminal() {
            return true;
        }

        let mut extended = String::with_capacity(text.len() + next.len_utf8());
        extended.push_str(text);
        extended.push(next);
        self.lexicon.find_exact(&extended).is_none()
    }

    fn log_completion(&self) {
        if self.preferences.collect_metrics {
            log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
                "tokens" => self.metrics.total_tokens,
                "keywords" => self.metrics.keyword_tokens,
                "symbols" => self.metrics.symbol_tokens,
                "user" => self.metrics.user_tokens,
                "longest_token" => self.metrics.longest_token
            );
        } else {
            log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
                "tokens" => self.token_count
            );
        }
    }
}

/// Yields tokens up to and including `End`, or up to the first error
impl<S: CharSource> Iterator for Tokenizer<'_, S> {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != State::Running {
            return None;
        }
        Some(self.next_token())
    }
}

impl<S: CharSource> std::iter::FusedIterator for Tokenizer<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::WhitespaceClass;
    use crate::lexical::source::CharStream;
    use crate::utils::Position;
    use assert_matches::assert_matches;

    fn lexicon(symbols: &[&str], keywords: &[&str]) -> PrefixTrie<TokenKind> {
        let mut trie = PrefixTrie::new();
        for symbol in symbols {
            trie.insert(symbol, vec![TokenKind::Symbol]);
        }
        for keyword in keywords {
            trie.insert(keyword, vec![TokenKind::Keyword]);
        }
        trie
    }

    fn prefs() -> LexicalPreferences {
        LexicalPreferences {
            whitespace: WhitespaceClass::Ascii,
            collect_metrics: true,
            log_token_events: false,
        }
    }

    fn tokenize(trie: &PrefixTrie<TokenKind>, input: &str) -> Vec<(TokenKind, String)> {
        Tokenizer::with_preferences(trie, CharStream::from_str(input), prefs())
            .map(|token| {
                let token = token.unwrap();
                (token.kind, token.text)
            })
            .collect()
    }

    fn kinds_and_texts(expected: &[(TokenKind, &str)]) -> Vec<(TokenKind, String)> {
        expected
            .iter()
            .map(|(kind, text)| (*kind, text.to_string()))
            .collect()
    }

    #[test]
    fn test_longest_match_prefers_longer_symbol() {
        let trie = lexicon(&["!", "!=", "=", "=="], &[]);

        assert_eq!(
            tokenize(&trie, "!=foo"),
            kinds_and_texts(&[
                (TokenKind::Symbol, "!="),
                (TokenKind::User, "foo"),
                (TokenKind::End, ""),
            ])
        );
    }

    #[test]
    fn test_symbol_run_splits_after_terminal_symbol() {
        let trie = lexicon(&["=", "==", "(", ")"], &[]);

        assert_eq!(
            tokenize(&trie, "===(("),
            kinds_and_texts(&[
                (TokenKind::Symbol, "=="),
                (TokenKind::Symbol, "="),
                (TokenKind::Symbol, "("),
                (TokenKind::Symbol, "("),
                (TokenKind::End, ""),
            ])
        );
    }

    #[test]
    fn test_symbol_without_intermediate_entry_is_not_reached() {
        let trie = lexicon(&["<", "<<="], &[]);

        assert_eq!(
            tokenize(&trie, "<<="),
            kinds_and_texts(&[
                (TokenKind::Symbol, "<"),
                (TokenKind::Symbol, "<"),
                (TokenKind::User, "="),
                (TokenKind::End, ""),
            ])
        );
    }

    #[test]
    fn test_extension_onto_split_node_is_user() {
        let trie = lexicon(&["=", "=>>", "=>="], &[]);

        assert_eq!(
            tokenize(&trie, "=>x"),
            kinds_and_texts(&[
                (TokenKind::User, "=>"),
                (TokenKind::User, "x"),
                (TokenKind::End, ""),
            ])
        );
        assert_eq!(
            tokenize(&trie, "=>= ="),
            kinds_and_texts(&[
                (TokenKind::Symbol, "=>="),
                (TokenKind::Symbol, "="),
                (TokenKind::End, ""),
            ])
        );
    }

    #[test]
    fn test_unknown_symbol_run_is_user() {
        let trie = lexicon(&["+"], &[]);

        assert_eq!(
            tokenize(&trie, "@#$ +"),
            kinds_and_texts(&[
                (TokenKind::User, "@#$"),
                (TokenKind::Symbol, "+"),
                (TokenKind::End, ""),
            ])
        );
    }

    #[test]
    fn test_word_boundaries_without_dictionary_hits() {
        let trie = lexicon(&[], &[]);

        assert_eq!(
            tokenize(&trie, "abc123 def"),
            kinds_and_texts(&[
                (TokenKind::User, "abc123"),
                (TokenKind::User, "def"),
                (TokenKind::End, ""),
            ])
        );
    }

    #[test]
    fn test_keyword_followed_by_symbols() {
        let trie = lexicon(&["(", ")"], &["if"]);

        assert_eq!(
            tokenize(&trie, "if(x)"),
            kinds_and_texts(&[
                (TokenKind::Keyword, "if"),
                (TokenKind::Symbol, "("),
                (TokenKind::User, "x"),
                (TokenKind::Symbol, ")"),
                (TokenKind::End, ""),
            ])
        );
    }

    #[test]
    fn test_keyword_prefix_of_word_is_user() {
        let trie = lexicon(&[], &["if", "for"]);

        assert_eq!(
            tokenize(&trie, "iffy format for"),
            kinds_and_texts(&[
                (TokenKind::User, "iffy"),
                (TokenKind::User, "format"),
                (TokenKind::Keyword, "for"),
                (TokenKind::End, ""),
            ])
        );
    }

    #[test]
    fn test_empty_input_yields_single_end() {
        let trie = lexicon(&["+"], &["if"]);
        assert_eq!(tokenize(&trie, ""), kinds_and_texts(&[(TokenKind::End, "")]));
    }

    #[test]
    fn test_whitespace_only_input_yields_single_end() {
        let trie = lexicon(&["+"], &["if"]);
        assert_eq!(
            tokenize(&trie, "   \n\t  "),
            kinds_and_texts(&[(TokenKind::End, "")])
        );
    }

    #[test]
    fn test_spans_track_lines_and_columns() {
        let trie = lexicon(&["="], &["let"]);
        let tokens: Vec<Token> =
            Tokenizer::with_preferences(&trie, CharStream::from_str("let x\n  = 42"), prefs())
                .collect::<Result<_, _>>()
                .unwrap();

        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].span.start(), Position::new(0, 1, 1));
        assert_eq!(tokens[0].span.end(), Position::new(3, 1, 4));
        assert_eq!(tokens[2].text, "=");
        assert_eq!(tokens[2].span.start(), Position::new(8, 2, 3));
        assert_eq!(tokens[3].span.slice("let x\n  = 42"), "42");

        let end = &tokens[4];
        assert!(end.is_end());
        assert!(end.span.is_empty());
        assert_eq!(end.span.start(), Position::new(12, 2, 7));
    }

    #[test]
    fn test_token_at_end_of_input_is_emitted() {
        let trie = lexicon(&[";"], &[]);
        assert_eq!(
            tokenize(&trie, "x;"),
            kinds_and_texts(&[
                (TokenKind::User, "x"),
                (TokenKind::Symbol, ";"),
                (TokenKind::End, ""),
            ])
        );
    }

    #[test]
    fn test_iterator_stops_after_end() {
        let trie = lexicon(&[], &[]);
        let mut tokenizer = Tokenizer::with_preferences(&trie, CharStream::from_str("a"), prefs());

        assert_eq!(tokenizer.next().unwrap().unwrap().text, "a");
        assert!(tokenizer.next().unwrap().unwrap().is_end());
        assert!(tokenizer.next().is_none());
        assert!(tokenizer.is_finished());
        // Direct calls keep answering End
        assert!(tokenizer.next_token().unwrap().is_end());
    }

    #[test]
    fn test_unicode_whitespace_preference() {
        let trie = lexicon(&[], &[]);
        let input = "a\u{a0}b";

        let ascii = Tokenizer::with_preferences(&trie, CharStream::from_str(input), prefs())
            .filter_map(Result::ok)
            .filter(|t| !t.is_end())
            .count();
        // NBSP is a symbol character under ASCII rules: a, NBSP, b
        assert_eq!(ascii, 3);

        let unicode_prefs = LexicalPreferences {
            whitespace: WhitespaceClass::Unicode,
            ..prefs()
        };
        let unicode: Vec<String> =
            Tokenizer::with_preferences(&trie, CharStream::from_str(input), unicode_prefs)
                .filter_map(Result::ok)
                .filter(|t| !t.is_end())
                .map(|t| t.text)
                .collect();
        assert_eq!(unicode, vec!["a", "b"]);
    }

    #[test]
    fn test_new_ignores_whitespace_environment() {
        let trie = lexicon(&[], &[]);
        let texts = |trie: &PrefixTrie<TokenKind>| -> Vec<String> {
            Tokenizer::new(trie, CharStream::from_str("a\u{a0}b"))
                .map(|token| token.unwrap().text)
                .collect()
        };

        let before = texts(&trie);
        std::env::set_var(crate::config::runtime::env_vars::LEXICAL_WHITESPACE, "unicode");
        let after = texts(&trie);
        std::env::remove_var(crate::config::runtime::env_vars::LEXICAL_WHITESPACE);

        assert_eq!(before, vec!["a", "\u{a0}", "b", ""]);
        assert_eq!(after, before);
    }

    #[test]
    fn test_custom_whitespace_predicate() {
        let trie = lexicon(&[], &[]);
        let texts: Vec<String> =
            Tokenizer::with_preferences(&trie, CharStream::from_str("a,b"), prefs())
                .with_whitespace(|c| c == ',')
                .filter_map(Result::ok)
                .filter(|t| !t.is_end())
                .map(|t| t.text)
                .collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_metrics() {
        let trie = lexicon(&["(", ")"], &["if"]);
        let mut tokenizer =
            Tokenizer::with_preferences(&trie, CharStream::from_str(" if (value)"), prefs());
        for token in tokenizer.by_ref() {
            token.unwrap();
        }

        let metrics = tokenizer.metrics();
        assert_eq!(metrics.total_tokens, 4);
        assert_eq!(metrics.keyword_tokens, 1);
        assert_eq!(metrics.symbol_tokens, 2);
        assert_eq!(metrics.count_of(TokenKind::User), 1);
        assert_eq!(metrics.longest_token, 5);
        assert_eq!(metrics.whitespace_skipped, 2);
        assert_eq!(metrics.chars_read, 11);
    }

    #[test]
    fn test_token_too_long_halts() {
        let trie = lexicon(&[], &[]);
        let input = "a".repeat(MAX_TOKEN_LENGTH + 1);
        let mut tokenizer = Tokenizer::with_preferences(&trie, CharStream::from_str(&input), prefs());

        assert_matches!(
            tokenizer.next(),
            Some(Err(LexerError::TokenTooLong { length })) if length == MAX_TOKEN_LENGTH + 1
        );
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_token_at_length_limit_is_accepted() {
        let trie = lexicon(&[], &[]);
        let input = "a".repeat(MAX_TOKEN_LENGTH);
        let tokens = tokenize(&trie, &input);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].1.len(), MAX_TOKEN_LENGTH);
    }

    #[test]
    fn test_source_error_surfaces_once() {
        let trie = lexicon(&[], &[]);
        let bytes: &[u8] = &[b'a', b' ', 0xFF];
        let mut tokenizer =
            Tokenizer::with_preferences(&trie, CharStream::from_reader(bytes), prefs());

        assert_eq!(tokenizer.next().unwrap().unwrap().text, "a");
        let err = tokenizer.next().unwrap().unwrap_err();
        assert_matches!(err, LexerError::Source(SourceError::InvalidEncoding { offset: 2 }));
        assert_eq!(err.error_code(), codes::file_processing::INVALID_ENCODING);
        assert!(tokenizer.next().is_none());
    }

    #[test]
    fn test_classify() {
        let mut trie = lexicon(&["+"], &["while"]);
        trie.insert("wh", Vec::new());
        let tokenizer = Tokenizer::with_preferences(&trie, CharStream::from_str(""), prefs());

        assert_eq!(tokenizer.classify("+"), TokenKind::Symbol);
        assert_eq!(tokenizer.classify("while"), TokenKind::Keyword);
        assert_eq!(tokenizer.classify("wh"), TokenKind::User);
        assert_eq!(tokenizer.classify("whale"), TokenKind::User);
    }
}
