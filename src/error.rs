//! Error types for chatlog-viewer.
//!
//! Only file ingestion can fail in the core: a file that cannot be read, or a
//! file whose contents are not a thread document. Search and navigation
//! always complete. The remaining variants belong to the host surface
//! (configuration, output, command-line arguments).

use std::path::PathBuf;

use thiserror::Error;

/// Primary error type for chatlog-viewer operations.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// A file's contents could not be parsed as a thread document.
    #[error("Invalid JSON in file {file}")]
    Parse {
        /// Source identifier of the offending file.
        file: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// The bytes of a file could not be obtained.
    #[error("Failed to read file {file}")]
    Read {
        /// Source identifier of the unreadable file.
        file: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file exceeds the configured size limit.
    #[error("File {file} is too large ({size} bytes, limit {limit})")]
    TooLarge {
        /// Source identifier of the oversized file.
        file: String,
        /// Size of the document in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: u64,
    },

    /// An input path given on the command line does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// I/O error outside of thread ingestion.
    #[error("I/O error: {context}")]
    Io {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error while producing output.
    #[error("Serialization error: {context}")]
    Serialization {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Directory or config location could not be determined on this platform.
    #[error("Unsupported: {feature}")]
    Unsupported {
        /// Name of the unsupported feature.
        feature: String,
    },
}

impl ViewerError {
    /// Create a parse error for the given source file.
    #[must_use]
    pub fn parse(file: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            file: file.into(),
            source,
        }
    }

    /// Create a read error for the given source file.
    #[must_use]
    pub fn read(file: impl Into<String>, source: std::io::Error) -> Self {
        Self::Read {
            file: file.into(),
            source,
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Name of the file this error is about, for per-file import errors.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        match self {
            Self::Parse { file, .. } | Self::Read { file, .. } | Self::TooLarge { file, .. } => {
                Some(file)
            }
            _ => None,
        }
    }

    /// Get the process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Parse { .. } | Self::TooLarge { .. } => exit_codes::EXIT_PARSE_ERROR,
            Self::Read { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => exit_codes::EXIT_FILE_NOT_FOUND,
                std::io::ErrorKind::PermissionDenied => exit_codes::EXIT_PERMISSION_DENIED,
                _ => exit_codes::EXIT_IO_ERROR,
            },
            Self::FileNotFound { .. } => exit_codes::EXIT_FILE_NOT_FOUND,
            Self::InvalidConfig { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::InvalidArgument { .. } => exit_codes::EXIT_USAGE_ERROR,
            Self::Io { .. } => exit_codes::EXIT_IO_ERROR,
            _ => exit_codes::EXIT_GENERAL_ERROR,
        }
    }

    /// Whether a batch import may continue past this error.
    ///
    /// Per-file failures only affect their own file.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Parse { .. } | Self::Read { .. } | Self::TooLarge { .. }
        )
    }
}

/// Result type alias for chatlog-viewer operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

impl From<std::io::Error> for ViewerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for ViewerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// A thread file could not be parsed.
    pub const EXIT_PARSE_ERROR: i32 = 2;
    /// Specified file not found.
    pub const EXIT_FILE_NOT_FOUND: i32 = 3;
    /// Insufficient permissions.
    pub const EXIT_PERMISSION_DENIED: i32 = 4;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}
