//! Opening input files as character sources

use crate::config::compile_time::file_processing::MAX_FILE_SIZE;
use crate::lexical::{CharStream, ReaderSource};
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    fn from_io(err: &io::Error, path: &Path) -> Self {
        let path = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => FileProcessorError::FileNotFound { path },
            io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied { path },
            _ => FileProcessorError::IoError {
                message: format!("{}: {}", path, err),
            },
        }
    }
}

/// Metadata collected before the file is opened
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<std::time::SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// An input file opened for streaming.
///
/// The file handle lives inside `source` and is closed when it is dropped,
/// on success and on every error path alike.
pub struct OpenedFile {
    pub metadata: FileMetadata,
    pub source: ReaderSource<File>,
}

/// Validates and opens input files
#[derive(Debug, Clone)]
pub struct FileProcessor {
    max_file_size: u64,
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
        }
    }

    /// Lower the size limit. Values above the compile-time maximum are clamped.
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size.min(MAX_FILE_SIZE);
        self
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate `file_path` and open it as a character source
    pub fn open(&self, file_path: &Path) -> Result<OpenedFile, FileProcessorError> {
        log_debug!("Opening input file", "file" => file_path.display());

        let path = self.validate_path(file_path)?;
        let metadata = self.get_metadata(&path)?;
        self.validate_size(&metadata)?;

        let file = File::open(&path).map_err(|e| {
            let error = FileProcessorError::from_io(&e, &path);
            log_error!(error.error_code(), "Failed to open file",
                "path" => path.display(),
                "io_error" => e
            );
            error
        })?;

        log_success!(codes::success::FILE_VALIDATION_PASSED, "Input file validated",
            "file" => metadata.path.display(),
            "size" => metadata.human_readable_size()
        );

        Ok(OpenedFile {
            metadata,
            source: CharStream::from_reader(file),
        })
    }

    fn validate_path(&self, file_path: &Path) -> Result<PathBuf, FileProcessorError> {
        if file_path.as_os_str().is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: String::new(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        let canonical = file_path.canonicalize().map_err(|e| {
            let error = FileProcessorError::from_io(&e, file_path);
            log_error!(error.error_code(), "Failed to resolve path",
                "path" => file_path.display(),
                "io_error" => e
            );
            error
        })?;

        if !canonical.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.display().to_string(),
            };
            log_error!(error.error_code(), "Path is not a regular file",
                "path" => file_path.display()
            );
            return Err(error);
        }

        Ok(canonical)
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = FileProcessorError::from_io(&e, path);
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display(),
                "io_error" => e
            );
            error
        })?;

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
        })
    }

    fn validate_size(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > self.max_file_size {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: self.max_file_size,
            };
            log_error!(error.error_code(), "File exceeds maximum size",
                "path" => metadata.path.display(),
                "size" => metadata.size,
                "max_size" => self.max_file_size
            );
            return Err(error);
        }
        Ok(())
    }
}
