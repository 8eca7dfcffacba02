use crate::file_processor::FileMetadata;
use crate::lexical::LexicalMetrics;
use crate::tokens::{Token, TokenKind};
use std::time::Duration;

/// Everything produced by tokenizing one file
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub file_metadata: FileMetadata,
    /// All tokens, the final one being `End`
    pub tokens: Vec<Token>,
    pub lexical_metrics: LexicalMetrics,
    pub processing_duration: Duration,
}

impl PipelineResult {
    /// Number of tokens excluding `End`
    pub fn token_count(&self) -> usize {
        self.tokens.iter().filter(|t| !t.is_end()).count()
    }

    /// Tokens of the given kinds, `End` included only if asked for
    pub fn tokens_of<'a>(&'a self, kinds: &'a [TokenKind]) -> impl Iterator<Item = &'a Token> {
        self.tokens.iter().filter(move |t| kinds.contains(&t.kind))
    }

    pub fn log_success(&self) {
        let seconds = self.processing_duration.as_secs_f64();
        let rate = if seconds > 0.0 {
            self.file_metadata.size as f64 / seconds
        } else {
            0.0
        };

        crate::log_success!(
            crate::logging::codes::success::PIPELINE_COMPLETE,
            "File tokenized",
            "file" => self.file_metadata.path.display(),
            "tokens" => self.token_count(),
            "duration_ms" => format!("{:.2}", seconds * 1000.0),
            "bytes_per_sec" => format!("{:.0}", rate)
        );
    }
}
