use std::fmt;

// === StorageError ===

/// Errors raised by the key-value persistence layer.
#[derive(Debug)]
pub enum StorageError {
    /// A stored value could not be read.
    ReadError(String),
    /// A value could not be written or removed.
    WriteError(String),
    /// A stored value is malformed or could not be encoded.
    SerializationError(String),
    /// The backing database rejected an operation.
    DatabaseError(String),
}

impl StorageError {
    /// True for failures on the read path (malformed or unreadable values).
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            StorageError::ReadError(_) | StorageError::SerializationError(_)
        )
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ReadError(msg) => write!(f, "Storage read error: {}", msg),
            StorageError::WriteError(msg) => write!(f, "Storage write error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::DatabaseError(err.to_string())
    }
}

// === SettingsError ===

/// Errors related to extension settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === PopupError ===

/// Errors surfaced by a popup session.
#[derive(Debug, PartialEq)]
pub enum PopupError {
    /// A user action arrived before the first tab-info snapshot.
    NotInitialized,
    /// Feedback was submitted without a topic.
    InvalidFeedbackSubmission,
    /// The background collaborator could not be reached.
    Backend(String),
}

impl fmt::Display for PopupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopupError::NotInitialized => write!(f, "Popup has not received tab info yet"),
            PopupError::InvalidFeedbackSubmission => {
                write!(f, "Invalid feedback submission: a topic must be selected")
            }
            PopupError::Backend(msg) => write!(f, "Popup backend error: {}", msg),
        }
    }
}

impl std::error::Error for PopupError {}
