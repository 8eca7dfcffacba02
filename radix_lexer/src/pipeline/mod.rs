//! File-to-tokens driver
//!
//! Ties the file processor, a lexicon and the tokenizer together and logs
//! the run under the file's context.

mod error;
mod result;

pub use error::PipelineError;
pub use result::PipelineResult;

use std::path::Path;
use std::time::Instant;

use crate::config::runtime::LexicalPreferences;
use crate::dictionary::{Dictionary, Lexicon};
use crate::file_processor::FileProcessor;
use crate::logging;
use crate::tokens::Token;

/// Tokenize `file_path` with `lexicon`, collecting every token
pub fn process_file(
    file_path: &Path,
    lexicon: &Lexicon,
    preferences: LexicalPreferences,
) -> Result<PipelineResult, PipelineError> {
    let mut tokens = Vec::new();
    let mut result = stream_file(file_path, lexicon, preferences, |token| {
        tokens.push(token.clone())
    })?;
    result.tokens = tokens;
    Ok(result)
}

/// Tokenize `file_path`, handing each token to `on_token` as it is produced.
///
/// The returned result carries metadata and metrics but no tokens.
pub fn stream_file<F>(
    file_path: &Path,
    lexicon: &Lexicon,
    preferences: LexicalPreferences,
    mut on_token: F,
) -> Result<PipelineResult, PipelineError>
where
    F: FnMut(&Token),
{
    let start_time = Instant::now();

    logging::with_file_context(file_path, || -> Result<PipelineResult, PipelineError> {
        crate::log_info!("Starting tokenization", "file" => file_path.display());

        let opened = FileProcessor::new().open(file_path)?;
        let mut tokenizer = lexicon.tokenizer(opened.source, preferences);

        for token in tokenizer.by_ref() {
            on_token(&token?);
        }

        let result = PipelineResult {
            file_metadata: opened.metadata,
            tokens: Vec::new(),
            lexical_metrics: tokenizer.metrics().clone(),
            processing_duration: start_time.elapsed(),
        };
        result.log_success();

        Ok(result)
    })
}

/// Load a dictionary file and build its lexicon
pub fn load_lexicon(dictionary_path: &Path) -> Result<Lexicon, PipelineError> {
    let dictionary = Dictionary::from_file(dictionary_path)?;
    Ok(dictionary.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::runtime::WhitespaceClass;
    use crate::lexical::{LexerError, SourceError};
    use crate::tokens::TokenKind;
    use assert_matches::assert_matches;
    use std::io::Write;

    fn prefs() -> LexicalPreferences {
        LexicalPreferences {
            whitespace: WhitespaceClass::Ascii,
            collect_metrics: true,
            log_token_events: false,
        }
    }

    #[test]
    fn test_process_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "while (i < 10) i++;\n").unwrap();

        let lexicon = Dictionary::c_like().build().unwrap();
        let result = process_file(file.path(), &lexicon, prefs()).unwrap();

        assert_eq!(result.token_count(), 9);
        assert!(result.tokens.last().unwrap().is_end());
        assert_eq!(result.lexical_metrics.keyword_tokens, 1);
        assert_eq!(result.lexical_metrics.symbol_tokens, 5);
        assert_eq!(result.file_metadata.size, 20);

        let users: Vec<&str> = result
            .tokens_of(&[TokenKind::User])
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(users, vec!["i", "10", "i"]);
    }

    #[test]
    fn test_stream_file_visits_every_token() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a b c").unwrap();

        let lexicon = Dictionary::default().build().unwrap();
        let mut seen = Vec::new();
        let result = stream_file(file.path(), &lexicon, prefs(), |t| seen.push(t.text.clone()))
            .unwrap();

        assert_eq!(seen, vec!["a", "b", "c", ""]);
        assert!(result.tokens.is_empty());
        assert_eq!(result.lexical_metrics.total_tokens, 3);
    }

    #[test]
    fn test_missing_file_is_file_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let lexicon = Dictionary::default().build().unwrap();

        let err = process_file(&dir.path().join("missing.c"), &lexicon, prefs()).unwrap_err();
        assert_matches!(err, PipelineError::FileProcessing(_));
    }

    #[test]
    fn test_invalid_utf8_is_lexical_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'x', b' ', 0xC3]).unwrap();

        let lexicon = Dictionary::default().build().unwrap();
        let err = process_file(file.path(), &lexicon, prefs()).unwrap_err();
        assert_matches!(
            err,
            PipelineError::LexicalAnalysis(LexerError::Source(SourceError::InvalidEncoding {
                offset: 2
            }))
        );
    }

    #[test]
    fn test_load_lexicon() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "symbols = [\"<-\"]\nkeywords = [\"recv\"]").unwrap();

        let lexicon = load_lexicon(file.path()).unwrap();
        assert_eq!(lexicon.classify("<-"), TokenKind::Symbol);
        assert_eq!(lexicon.classify("recv"), TokenKind::Keyword);
    }

    #[test]
    fn test_load_lexicon_rejects_invalid_dictionary() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "symbols = [\"\"]").unwrap();

        assert_matches!(
            load_lexicon(file.path()),
            Err(PipelineError::Dictionary(_))
        );
    }
}
