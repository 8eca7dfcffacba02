//! Error and success codes with their classification metadata
//!
//! Every code the crate logs is declared here, grouped by area, and described
//! once in the registry below. Classification helpers fall back to neutral
//! defaults for codes missing from the registry.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const INVALID_ENCODING: Code = Code::new("E010");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Lexical analysis error codes
pub mod lexical {
    use super::Code;

    pub const TOKEN_TOO_LONG: Code = Code::new("E023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Dictionary loading and validation codes
pub mod dictionary {
    use super::Code;

    pub const EMPTY_ENTRY: Code = Code::new("E030");
    pub const ENTRY_TOO_LONG: Code = Code::new("E031");
    pub const TOO_MANY_ENTRIES: Code = Code::new("E032");
    pub const PARSE_ERROR: Code = Code::new("E033");
    pub const DICTIONARY_IO_ERROR: Code = Code::new("E034");
    /// Same text listed as both symbol and keyword
    pub const DUPLICATE_ENTRY: Code = Code::new("W035");
}

/// Success and progress codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_VALIDATION_PASSED: Code = Code::new("I007");
    pub const DICTIONARY_LOADED: Code = Code::new("I010");
    pub const LEXICON_BUILT: Code = Code::new("I011");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PIPELINE_COMPLETE: Code = Code::new("I090");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

type RegistryRow = (
    &'static str,
    &'static str,
    Severity,
    bool,
    bool,
    &'static str,
    &'static str,
);

// (code, category, severity, recoverable, requires_halt, description, action)
const REGISTRY_ROWS: &[RegistryRow] = &[
    (
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal error",
        "File a bug report with the input that triggered it",
    ),
    (
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "System initialization failure",
        "Check build profile and runtime environment variables",
    ),
    (
        "E005",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Input file not found",
        "Verify the file path exists",
    ),
    (
        "E007",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Input file exceeds maximum size",
        "Split the input or raise max_file_size in the build profile",
    ),
    (
        "E009",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Permission denied reading input",
        "Check file permissions",
    ),
    (
        "E010",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Input is not valid UTF-8",
        "Convert the input to UTF-8",
    ),
    (
        "E011",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "I/O error while reading input",
        "Check the device and retry",
    ),
    (
        "E012",
        "FileProcessing",
        Severity::High,
        false,
        true,
        "Path does not name a regular file",
        "Pass a path to a regular file",
    ),
    (
        "E023",
        "LexicalAnalysis",
        Severity::High,
        false,
        true,
        "Token exceeds maximum length",
        "Check the input for runaway words or raise max_token_length",
    ),
    (
        "E027",
        "LexicalAnalysis",
        Severity::High,
        false,
        true,
        "Input produced too many tokens",
        "Split the input or raise max_token_count",
    ),
    (
        "E030",
        "Dictionary",
        Severity::Medium,
        false,
        true,
        "Dictionary contains an empty entry",
        "Remove empty strings from the dictionary",
    ),
    (
        "E031",
        "Dictionary",
        Severity::Medium,
        false,
        true,
        "Dictionary entry exceeds maximum length",
        "Shorten the entry or raise max_entry_length",
    ),
    (
        "E032",
        "Dictionary",
        Severity::Medium,
        false,
        true,
        "Dictionary has too many entries",
        "Trim the dictionary or raise max_dictionary_entries",
    ),
    (
        "E033",
        "Dictionary",
        Severity::Medium,
        false,
        true,
        "Dictionary file could not be parsed",
        "Fix the TOML syntax of the dictionary file",
    ),
    (
        "E034",
        "Dictionary",
        Severity::Medium,
        false,
        true,
        "Dictionary file could not be read",
        "Verify the dictionary path",
    ),
    (
        "W035",
        "Dictionary",
        Severity::Low,
        true,
        false,
        "Entry listed as both symbol and keyword",
        "Keep the entry in one table; the keyword classification wins",
    ),
    (
        "I004",
        "Success",
        Severity::Low,
        true,
        false,
        "System initialization completed",
        "None",
    ),
    (
        "I007",
        "Success",
        Severity::Low,
        true,
        false,
        "Input file validation passed",
        "Continue to tokenization",
    ),
    (
        "I010",
        "Success",
        Severity::Low,
        true,
        false,
        "Dictionary loaded",
        "Continue to lexicon construction",
    ),
    (
        "I011",
        "Success",
        Severity::Low,
        true,
        false,
        "Lexicon trie built",
        "Lexicon ready for tokenization",
    ),
    (
        "I020",
        "Success",
        Severity::Low,
        true,
        false,
        "Tokenization completed",
        "None",
    ),
    (
        "I090",
        "Success",
        Severity::Low,
        true,
        false,
        "Pipeline completed",
        "None",
    ),
];

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        REGISTRY_ROWS
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code,
                        ErrorMetadata {
                            code,
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code, `Medium` when unregistered
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_declared_code_is_registered() {
        let declared = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            file_processing::FILE_NOT_FOUND,
            file_processing::FILE_TOO_LARGE,
            file_processing::PERMISSION_DENIED,
            file_processing::INVALID_ENCODING,
            file_processing::IO_ERROR,
            file_processing::INVALID_PATH,
            lexical::TOKEN_TOO_LONG,
            lexical::TOO_MANY_TOKENS,
            dictionary::EMPTY_ENTRY,
            dictionary::ENTRY_TOO_LONG,
            dictionary::TOO_MANY_ENTRIES,
            dictionary::PARSE_ERROR,
            dictionary::DICTIONARY_IO_ERROR,
            dictionary::DUPLICATE_ENTRY,
            success::SYSTEM_INITIALIZATION_COMPLETED,
            success::FILE_VALIDATION_PASSED,
            success::DICTIONARY_LOADED,
            success::LEXICON_BUILT,
            success::TOKENIZATION_COMPLETE,
            success::PIPELINE_COMPLETE,
        ];

        for code in declared {
            let metadata = get_error_metadata(code.as_str());
            assert!(metadata.is_some(), "{} missing from registry", code);
            assert_eq!(metadata.unwrap().code, code.as_str());
        }
        assert_eq!(get_error_registry().len(), declared.len());
    }

    #[test]
    fn test_classification() {
        assert_eq!(get_severity("ERR001"), Severity::Critical);
        assert!(requires_halt("E023"));
        assert!(is_recoverable("W035"));
        assert_eq!(get_category("E031"), "Dictionary");
    }

    #[test]
    fn test_unknown_code_defaults() {
        assert_eq!(get_severity("X999"), Severity::Medium);
        assert!(is_recoverable("X999"));
        assert!(!requires_halt("X999"));
        assert_eq!(get_description("X999"), "Unknown error");
        assert_eq!(get_action("X999"), "No specific action available");
    }
}
