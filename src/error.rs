//! Error types for the documentation parser
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for parsing and generation operations
#[derive(Error, Debug)]
pub enum DocError {
    /// File system errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("File '{path}' is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },

    /// Comment style errors
    #[error("Comment style '{language}' extends '{target}', which doesn't exist")]
    UnknownStyleExtend { language: String, target: String },

    #[error("Comment style '{language}' is invalid: {reason}")]
    InvalidCommentStyle { language: String, reason: String },

    /// Annotation registry errors
    #[error(transparent)]
    Registry(#[from] crate::annotation::RegistryError),

    /// Configuration errors
    #[error("Invalid configuration: {reason}")]
    ConfigError { reason: String },

    #[error("No files matched under {roots:?}")]
    NoFiles { roots: Vec<PathBuf> },

    /// General errors for cases where we need to preserve existing behavior
    #[error("{0}")]
    General(String),
}

impl DocError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::FileRead { .. } => "FILE_READ_ERROR",
            Self::FileWrite { .. } => "FILE_WRITE_ERROR",
            Self::InvalidUtf8 { .. } => "INVALID_UTF8",
            Self::UnknownStyleExtend { .. } | Self::InvalidCommentStyle { .. } => {
                "COMMENT_STYLE_ERROR"
            }
            Self::Registry(_) => "ANNOTATION_REGISTRY_ERROR",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::NoFiles { .. } => "NO_FILES",
            Self::General(_) => "GENERAL_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::FileRead { .. } => vec![
                "Check that the file exists and you have read permissions",
                "Ensure the file is not locked by another process",
            ],
            Self::FileWrite { .. } => vec![
                "Check that the output directory exists and is writable",
                "Pass a different location with --out",
            ],
            Self::InvalidUtf8 { .. } => vec![
                "Convert the file to UTF-8",
                "Add the file to the `ignore` list in .docblocks/settings.toml",
            ],
            Self::UnknownStyleExtend { .. } => vec![
                "Check the `extend` value under [comments] in .docblocks/settings.toml",
                "Run 'docblocks config' to see the comment styles that are defined",
            ],
            Self::InvalidCommentStyle { .. } => vec![
                "Every comment style needs a non-empty `line` marker or a start/end pair",
            ],
            Self::Registry(_) => vec![
                "Rename the custom annotation or alias in .docblocks/settings.toml",
                "Run 'docblocks annotations' to list the names already in use",
            ],
            Self::ConfigError { .. } => vec![
                "Run 'docblocks init --force' to regenerate the settings file",
            ],
            Self::NoFiles { .. } => vec![
                "Check the `files` and `ignore` globs in .docblocks/settings.toml",
                "Pass the file or directory to parse explicitly",
            ],
            Self::General(_) => vec![],
        }
    }
}

/// Result type alias for documentation operations
pub type DocResult<T> = Result<T, DocError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T, DocError>;

    /// Add context with a path
    fn with_path(self, path: &std::path::Path) -> Result<T, DocError>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: &str) -> Result<T, DocError> {
        self.map_err(|e| DocError::General(format!("{msg}: {e}")))
    }

    fn with_path(self, path: &std::path::Path) -> Result<T, DocError> {
        self.map_err(|e| {
            DocError::General(format!("Error processing '{}': {}", path.display(), e))
        })
    }
}
