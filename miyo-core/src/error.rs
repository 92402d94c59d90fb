//! Error types for Miyo Core

use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Errors that occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to delete {path}: {source}")]
    FileDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {from} to {to}: {source}")]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt JSON in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize JSON for {path}: {source}")]
    JsonSerialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid base64 content for {context}: {source}")]
    InvalidBase64 {
        context: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Invalid {kind}: {value:?}")]
    InvalidName { kind: &'static str, value: String },

    #[error("Storage has not been initialized")]
    NotInitialized,

    #[error("Could not resolve a platform document directory")]
    NoPlatformDirectory,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

impl StorageError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::DirectoryCreate { .. } => "DIRECTORY_CREATE_FAILURE",
            StorageError::DirectoryRead { .. } => "DIRECTORY_READ_FAILURE",
            StorageError::FileWrite { .. } => "FILE_WRITE_FAILURE",
            StorageError::FileRead { .. } => "FILE_READ_FAILURE",
            StorageError::FileNotFound(_) => "FILE_NOT_FOUND",
            StorageError::FileDelete { .. } => "FILE_DELETE_FAILURE",
            StorageError::FileCopy { .. } => "FILE_COPY_FAILURE",
            StorageError::JsonParse { .. } => "JSON_PARSE_FAILURE",
            StorageError::JsonSerialize { .. } => "JSON_SERIALIZE_FAILURE",
            StorageError::InvalidBase64 { .. } => "INVALID_BASE64",
            StorageError::InvalidName { .. } => "VALIDATION_ERROR",
            StorageError::NotInitialized => "NOT_INITIALIZED",
            StorageError::NoPlatformDirectory => "NO_PLATFORM_DIRECTORY",
            StorageError::Config(_) => "CONFIG_ERROR",
            StorageError::Unsupported(_) => "UNSUPPORTED",
        }
    }

    /// The path this error concerns, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            StorageError::DirectoryCreate { path, .. }
            | StorageError::DirectoryRead { path, .. }
            | StorageError::FileWrite { path, .. }
            | StorageError::FileRead { path, .. }
            | StorageError::FileDelete { path, .. }
            | StorageError::JsonParse { path, .. }
            | StorageError::JsonSerialize { path, .. } => Some(path.as_path()),
            StorageError::FileNotFound(path) => Some(path.as_path()),
            StorageError::FileCopy { from, .. } => Some(from.as_path()),
            _ => None,
        }
    }

    /// Whether this error means the target simply does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            StorageError::FileNotFound(_) => true,
            _ => self
                .io_error()
                .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound),
        }
    }

    /// Message suitable for showing to an end user
    pub fn user_message(&self) -> String {
        if self.is_not_found() {
            return "File not found.".to_string();
        }
        if self
            .io_error()
            .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
        {
            return "Permission denied.".to_string();
        }
        match self {
            StorageError::InvalidName { .. } | StorageError::Config(_) => self.to_string(),
            StorageError::JsonParse { .. } => {
                "A stored file is corrupted and could not be read.".to_string()
            }
            _ => "Failed to access storage. Please check permissions and available space."
                .to_string(),
        }
    }

    fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            StorageError::DirectoryCreate { source, .. }
            | StorageError::DirectoryRead { source, .. }
            | StorageError::FileWrite { source, .. }
            | StorageError::FileRead { source, .. }
            | StorageError::FileDelete { source, .. }
            | StorageError::FileCopy { source, .. } => Some(source),
            _ => None,
        }
    }
}
