//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success
//! - `1`: General error - unspecified failure
//! - `2`: Blocking error - the run can't continue with this configuration
//! - `3-125`: Specific recoverable errors
//! - `126-255`: Reserved by shell

use crate::error::DocError;

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Invalid comment styles or annotations (code 2)
    BlockingError = 2,

    /// No files matched the globs (code 3)
    NoFiles = 3,

    /// Documentation was generated but warnings were raised and
    /// `--strict` was passed (code 4)
    Warnings = 4,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Map a `DocError` to the exit code scripts can act on.
    pub fn from_error(error: &DocError) -> Self {
        match error {
            DocError::FileRead { .. } | DocError::FileWrite { .. } | DocError::InvalidUtf8 { .. } => {
                ExitCode::IoError
            }
            DocError::UnknownStyleExtend { .. }
            | DocError::InvalidCommentStyle { .. }
            | DocError::Registry(_) => ExitCode::BlockingError,
            DocError::ConfigError { .. } => ExitCode::ConfigError,
            DocError::NoFiles { .. } => ExitCode::NoFiles,
            DocError::General(_) => ExitCode::GeneralError,
        }
    }

    #[must_use]
    pub fn is_blocking(&self) -> bool {
        matches!(self, ExitCode::BlockingError)
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Get a human-readable description of the exit code.
    pub fn description(&self) -> &str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::BlockingError => "Blocking error - fix the configuration",
            ExitCode::NoFiles => "No files matched",
            ExitCode::Warnings => "Generated with warnings",
            ExitCode::IoError => "I/O error",
            ExitCode::ConfigError => "Configuration error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::RegistryError;
    use std::path::PathBuf;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success as u8, 0);
        assert_eq!(ExitCode::GeneralError as u8, 1);
        assert_eq!(ExitCode::BlockingError as u8, 2);
        assert_eq!(ExitCode::NoFiles as u8, 3);
        assert_eq!(i32::from(ExitCode::ConfigError), 6);
    }

    #[test]
    fn test_from_error() {
        let error = DocError::InvalidUtf8 {
            path: PathBuf::from("a.js"),
        };
        assert_eq!(ExitCode::from_error(&error), ExitCode::IoError);

        let error = DocError::Registry(RegistryError::InvalidName {
            name: "bad name".into(),
        });
        assert!(ExitCode::from_error(&error).is_blocking());

        let error = DocError::NoFiles { roots: vec![] };
        assert_eq!(ExitCode::from_error(&error), ExitCode::NoFiles);
    }

    #[test]
    fn test_is_success() {
        assert!(ExitCode::Success.is_success());
        assert!(!ExitCode::Warnings.is_success());
        assert!(!ExitCode::GeneralError.is_success());
    }
}
