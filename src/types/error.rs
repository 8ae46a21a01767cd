//! Unified Error Type System
//!
//! Centralized error type for extraction, scanning and search.
//!
//! ## Error Kinds
//!
//! - **NotFound**: the requested file or repository root does not exist
//! - **UnsupportedLanguage**: no extractor is registered for a language key
//! - **Encoding**: file bytes are not valid UTF-8
//! - **MalformedSource**: grammar-based parse failed (fatal for that file)
//! - **Internal**: I/O, serialization, grammar loading and configuration
//!
//! Per-file failures inside a repository scan never surface here; the
//! scanner logs and counts them instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

// =============================================================================
// Error Kinds
// =============================================================================

/// Coarse classification used by callers to map errors onto their own
/// status codes (HTTP handlers, CLI exit codes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    UnsupportedLanguage,
    Encoding,
    MalformedSource,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::UnsupportedLanguage => write!(f, "UNSUPPORTED_LANGUAGE"),
            Self::Encoding => write!(f, "ENCODING"),
            Self::MalformedSource => write!(f, "MALFORMED_SOURCE"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum SiftError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Path not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Unreadable encoding in {}: {message}", path.display())]
    Encoding { path: PathBuf, message: String },

    #[error("Malformed source in {path} at line {line}: {message}")]
    MalformedSource {
        path: String,
        line: u32,
        message: String,
    },

    #[error("Parse error in {path}: {message}")]
    Parse { message: String, path: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SiftError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl SiftError {
    /// Create a not-found error for a path
    pub fn not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            Self::UnsupportedLanguage(_) => ErrorKind::UnsupportedLanguage,
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::MalformedSource { .. } => ErrorKind::MalformedSource,
            _ => ErrorKind::Internal,
        }
    }

    /// Whether a multi-file caller may skip this file and continue
    pub fn is_file_local(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NotFound | ErrorKind::Encoding | ErrorKind::MalformedSource
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
