// Internal modules
pub mod config;
pub mod dictionary;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod tokens;
pub mod trie;
pub mod utils;

// Re-export key types for library consumers
pub use dictionary::{Dictionary, DictionaryError, Lexicon};
pub use lexical::{CharSource, CharStream, LexerError, SourceError, Tokenizer};
pub use pipeline::{PipelineError, PipelineResult};
pub use tokens::{Token, TokenKind};
pub use trie::{NodeId, PrefixTrie, TrieStats};
