//! Input file handling
//!
//! Validates a path (existence, regular file, size limit) and opens it as a
//! streaming [`CharSource`](crate::lexical::CharSource). The file is decoded
//! incrementally, so encoding errors surface during tokenization.

mod processor;

use std::path::Path;

use crate::config::compile_time::file_processing::MAX_FILE_SIZE;
pub use processor::{FileMetadata, FileProcessor, FileProcessorError, OpenedFile};

/// Open a file with the default size limit
pub fn open_file(file_path: &Path) -> Result<OpenedFile, FileProcessorError> {
    FileProcessor::new().open(file_path)
}

/// Compile-time maximum input size in bytes
pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE
}
