use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::Span;

/// Category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// End of input, always the last token with empty text
    End,
    /// Any word not found in the dictionary
    User,
    /// Dictionary keyword
    Keyword,
    /// Dictionary symbol (operator or punctuation)
    Symbol,
}

impl TokenKind {
    pub const ALL: [TokenKind; 4] = [Self::End, Self::User, Self::Keyword, Self::Symbol];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::End => "end",
            Self::User => "user",
            Self::Keyword => "keyword",
            Self::Symbol => "symbol",
        }
    }

    /// Symbols are matched greedily; everything else ends at word boundaries
    pub fn is_symbol(&self) -> bool {
        matches!(self, Self::Symbol)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown token kind '{0}', expected one of: end, user, keyword, symbol")]
pub struct UnknownTokenKind(pub String);

impl FromStr for TokenKind {
    type Err = UnknownTokenKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "end" | "eof" => Ok(Self::End),
            "user" | "word" => Ok(Self::User),
            "keyword" => Ok(Self::Keyword),
            "symbol" => Ok(Self::Symbol),
            _ => Err(UnknownTokenKind(s.to_string())),
        }
    }
}

/// A classified slice of input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Exact characters consumed, never containing skipped whitespace
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// End-of-input marker at `span` (normally empty)
    pub fn end(span: Span) -> Self {
        Self::new(TokenKind::End, String::new(), span)
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::End => write!(f, "<end> @ {}", self.span.start()),
            kind => write!(f, "{}({:?}) @ {}", kind, self.text, self.span),
        }
    }
}
