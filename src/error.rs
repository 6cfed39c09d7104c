//! Structured error types for registry, persistence and item management.

use crate::registry::TypeKey;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Deserialization errors
    ConfigNotFound,
    ConfigUnreadable,
    MalformedConfig,
    MissingRootTag,
    UnknownTag,
    NotAnItem,
    InvalidField,

    // I/O errors
    SerializationFailed,
    WriteFailed,

    // Registration errors
    EmptyDisplayName,
    ConflictingAlias,
    UnboundType,

    // Item management errors
    UnknownItemType,
    InvalidItemName,
    AlreadyExists,
}

/// Failure while loading or saving an item's config file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("item directory {} has no base name", path.display())]
    NoItemName { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed config file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("config file {} has no root type tag", path.display())]
    MissingRootTag { path: PathBuf },

    #[error("unknown type tag '!{tag}' in {}", path.display())]
    UnknownTag { path: PathBuf, tag: String },

    #[error("type tag '!{tag}' in {} does not name an item type", path.display())]
    NotAnItem { path: PathBuf, tag: String },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize item '{name}': {source}")]
    Serialize {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::NotFound { .. } => ErrorCode::ConfigNotFound,
            StoreError::NoItemName { .. } => ErrorCode::InvalidItemName,
            StoreError::Read { .. } => ErrorCode::ConfigUnreadable,
            StoreError::Malformed { .. } => ErrorCode::MalformedConfig,
            StoreError::MissingRootTag { .. } => ErrorCode::MissingRootTag,
            StoreError::UnknownTag { .. } => ErrorCode::UnknownTag,
            StoreError::NotAnItem { .. } => ErrorCode::NotAnItem,
            StoreError::Decode { .. } => ErrorCode::InvalidField,
            StoreError::Serialize { .. } => ErrorCode::SerializationFailed,
            StoreError::Write { .. } => ErrorCode::WriteFailed,
        }
    }

    /// True for failures that happen while turning a config file into an item.
    pub fn is_deserialization(&self) -> bool {
        !matches!(
            self,
            StoreError::Serialize { .. } | StoreError::Write { .. }
        )
    }
}

/// Failure while registering item types or aliases at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("descriptor for {key} has an empty display name")]
    EmptyDisplayName { key: TypeKey },

    #[error("tag '{tag}' is already bound to {existing}, cannot rebind to {requested}")]
    ConflictingAlias {
        tag: String,
        existing: TypeKey,
        requested: TypeKey,
    },

    #[error("cannot alias '{tag}' to {key}: type is not bound")]
    UnboundType { tag: String, key: TypeKey },
}

impl RegistryError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistryError::EmptyDisplayName { .. } => ErrorCode::EmptyDisplayName,
            RegistryError::ConflictingAlias { .. } => ErrorCode::ConflictingAlias,
            RegistryError::UnboundType { .. } => ErrorCode::UnboundType,
        }
    }
}

/// Failure while creating or registering items in the home directory.
#[derive(Debug, Error)]
pub enum HomeError {
    #[error("no item type registered as {0}")]
    UnknownType(String),

    #[error("invalid item name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("an item named '{0}' already exists")]
    AlreadyExists(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HomeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            HomeError::UnknownType(_) => ErrorCode::UnknownItemType,
            HomeError::InvalidName { .. } => ErrorCode::InvalidItemName,
            HomeError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            HomeError::Store(err) => err.code(),
        }
    }
}

/// Result type for persistence operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
