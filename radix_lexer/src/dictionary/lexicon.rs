use std::fmt;
use std::sync::Arc;

use crate::lexical::{CharSource, CharStream, LexerError, StrSource, Tokenizer};
use crate::config::runtime::LexicalPreferences;
use crate::logging::codes;
use crate::log_success;
use crate::tokens::{Token, TokenKind};
use crate::trie::{PrefixTrie, TrieDump, TrieStats};

/// Built, read-only keyword/symbol trie.
///
/// Cloning is cheap; clones share the same trie.
#[derive(Clone)]
pub struct Lexicon {
    trie: Arc<PrefixTrie<TokenKind>>,
}

impl Lexicon {
    /// Insert `(text, kind)` pairs in order; later duplicates win
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, TokenKind)>) -> Self {
        let mut trie = PrefixTrie::new();
        for (text, kind) in entries {
            trie.insert(text, vec![kind]);
        }

        let lexicon = Self::from_trie(trie);
        let stats = lexicon.stats();
        log_success!(codes::success::LEXICON_BUILT, "Lexicon trie built",
            "keys" => stats.key_count,
            "nodes" => stats.node_count,
            "max_depth" => stats.max_depth
        );
        lexicon
    }

    pub fn from_trie(trie: PrefixTrie<TokenKind>) -> Self {
        Self {
            trie: Arc::new(trie),
        }
    }

    pub fn trie(&self) -> &PrefixTrie<TokenKind> {
        &self.trie
    }

    pub fn stats(&self) -> TrieStats {
        self.trie.stats()
    }

    /// Stored kind for `text`, `User` if it is not an entry
    pub fn classify(&self, text: &str) -> TokenKind {
        self.trie
            .get(text)
            .and_then(|values| values.first().copied())
            .unwrap_or(TokenKind::User)
    }

    pub fn tokenizer<S: CharSource>(
        &self,
        source: S,
        preferences: LexicalPreferences,
    ) -> Tokenizer<'_, S> {
        Tokenizer::with_preferences(&self.trie, source, preferences)
    }

    pub fn tokenize_str<'s>(
        &self,
        input: &'s str,
        preferences: LexicalPreferences,
    ) -> Tokenizer<'_, StrSource<'s>> {
        self.tokenizer(CharStream::from_str(input), preferences)
    }

    /// Collect every token of `input`, `End` included
    pub fn tokens(
        &self,
        input: &str,
        preferences: LexicalPreferences,
    ) -> Result<Vec<Token>, LexerError> {
        self.tokenize_str(input, preferences).collect()
    }

    pub fn dump(&self) -> TrieDump<'_, TokenKind> {
        TrieDump::new(&self.trie)
    }
}

impl fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexicon")
            .field("stats", &self.stats())
            .finish()
    }
}
