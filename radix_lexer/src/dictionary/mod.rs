//! Keyword and symbol dictionaries
//!
//! A [`Dictionary`] is plain configuration data: two string tables supplied
//! by the caller. Building it validates the tables against the compile-time
//! limits and produces a [`Lexicon`], the read-only trie the tokenizer
//! consults.

pub mod lexicon;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::config::compile_time::dictionary::*;
use crate::logging::{codes, Code};
use crate::tokens::TokenKind;
use crate::{log_error, log_success, log_warning};

pub use lexicon::Lexicon;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DictionaryError {
    #[error("Empty entry in the {table} table")]
    EmptyEntry { table: &'static str },

    #[error("Entry '{entry}' is {length} characters long (max {MAX_ENTRY_LENGTH})")]
    EntryTooLong { entry: String, length: usize },

    #[error("Dictionary has {count} entries (max {MAX_DICTIONARY_ENTRIES})")]
    TooManyEntries { count: usize },

    #[error("Failed to parse dictionary: {message}")]
    Parse { message: String },

    #[error("Failed to read dictionary '{path}': {message}")]
    Io { path: String, message: String },
}

impl DictionaryError {
    pub fn error_code(&self) -> Code {
        match self {
            DictionaryError::EmptyEntry { .. } => codes::dictionary::EMPTY_ENTRY,
            DictionaryError::EntryTooLong { .. } => codes::dictionary::ENTRY_TOO_LONG,
            DictionaryError::TooManyEntries { .. } => codes::dictionary::TOO_MANY_ENTRIES,
            DictionaryError::Parse { .. } => codes::dictionary::PARSE_ERROR,
            DictionaryError::Io { .. } => codes::dictionary::DICTIONARY_IO_ERROR,
        }
    }
}

/// Symbol and keyword tables
///
/// TOML form:
///
/// ```toml
/// symbols = ["==", "=", "("]
/// keywords = ["if", "while"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dictionary {
    #[serde(default)]
    pub symbols: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl Dictionary {
    pub fn new<S, K>(symbols: S, keywords: K) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
            keywords: keywords.into_iter().map(Into::into).collect(),
        }
    }

    /// The C-like demonstration set
    pub fn c_like() -> Self {
        Self::new(
            [
                "+", "-", "*", "/", "%", "++", "--", "=", "+=", "-=", "*=", "/=", "%=", "==",
                "!=", "~=", "<", ">", "<=", ">=", "!", "&&", "||", "~", "&", "|", "^", "<<",
                ">>", "&=", "|=", "^=", "<<=", ">>=", "->", ".", ",", ";", ":", "?", "(", ")",
                "[", "]", "{", "}", "#", "::",
            ],
            [
                "auto", "break", "case", "char", "const", "continue", "default", "do",
                "double", "else", "enum", "extern", "float", "for", "goto", "if", "inline",
                "int", "long", "register", "return", "short", "signed", "sizeof", "static",
                "struct", "switch", "typedef", "union", "unsigned", "void", "volatile",
                "while",
            ],
        )
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DictionaryError> {
        toml::from_str(content).map_err(|e| DictionaryError::Parse {
            message: e.to_string(),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, DictionaryError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            let error = DictionaryError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            };
            log_error!(error.error_code(), &error.to_string());
            error
        })?;

        let dictionary = Self::from_toml_str(&content).map_err(|error| {
            log_error!(error.error_code(), &error.to_string(),
                "path" => path.display()
            );
            error
        })?;

        log_success!(codes::success::DICTIONARY_LOADED, "Dictionary loaded",
            "path" => path.display(),
            "symbols" => dictionary.symbols.len(),
            "keywords" => dictionary.keywords.len()
        );

        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.symbols.len() + self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && self.keywords.is_empty()
    }

    /// Check every entry against the compile-time limits
    pub fn validate(&self) -> Result<(), DictionaryError> {
        let count = self.len();
        if count > MAX_DICTIONARY_ENTRIES {
            return Err(DictionaryError::TooManyEntries { count });
        }

        for (table, entries) in self.tables() {
            for entry in entries {
                if entry.is_empty() {
                    return Err(DictionaryError::EmptyEntry { table });
                }
                let length = entry.chars().count();
                if length > MAX_ENTRY_LENGTH {
                    return Err(DictionaryError::EntryTooLong {
                        entry: entry.clone(),
                        length,
                    });
                }
            }
        }

        Ok(())
    }

    /// Entries listed both as symbol and keyword
    pub fn duplicates(&self) -> Vec<&str> {
        let symbols: HashSet<&str> = self.symbols.iter().map(String::as_str).collect();
        self.keywords
            .iter()
            .map(String::as_str)
            .filter(|keyword| symbols.contains(keyword))
            .collect()
    }

    /// Entries in insertion order: symbols first, then keywords
    pub fn entries(&self) -> impl Iterator<Item = (&str, TokenKind)> {
        let symbols = self.symbols.iter().map(|s| (s.as_str(), TokenKind::Symbol));
        let keywords = self.keywords.iter().map(|k| (k.as_str(), TokenKind::Keyword));
        symbols.chain(keywords)
    }

    /// Validate and build the lexicon trie.
    ///
    /// Keywords are inserted after symbols, so an entry present in both
    /// tables is classified as a keyword.
    pub fn build(&self) -> Result<Lexicon, DictionaryError> {
        if let Err(error) = self.validate() {
            log_error!(error.error_code(), &error.to_string());
            return Err(error);
        }

        for duplicate in self.duplicates() {
            log_warning!(code = codes::dictionary::DUPLICATE_ENTRY,
                "Entry listed as both symbol and keyword",
                "entry" => duplicate
            );
        }

        Ok(Lexicon::from_entries(self.entries()))
    }

    fn tables(&self) -> [(&'static str, &[String]); 2] {
        [
            ("symbols", self.symbols.as_slice()),
            ("keywords", self.keywords.as_slice()),
        ]
    }
}
