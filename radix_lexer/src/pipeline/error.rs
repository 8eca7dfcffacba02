use crate::dictionary::DictionaryError;
use crate::file_processor::FileProcessorError;
use crate::lexical::LexerError;
use crate::logging::Code;

/// Pipeline processing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Dictionary loading failed: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Lexical analysis failed: {0}")]
    LexicalAnalysis(#[from] LexerError),
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            PipelineError::Dictionary(e) => e.error_code(),
            PipelineError::FileProcessing(e) => e.error_code(),
            PipelineError::LexicalAnalysis(e) => e.error_code(),
        }
    }
}
