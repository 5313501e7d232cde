/// Application error taxonomy
///
/// Every fallible path in the app funnels into one of these variants, and every
/// operation recovers them into a user-facing outcome before the shell sees them.
/// "No picture found" and "deleted zero rows" are NOT errors; they are reported as
/// informational outcomes by the operations layer.

use thiserror::Error;

use crate::capture::camera::CameraError;
use crate::codec::CodecError;

/// Top-level application error.
///
/// Variants carry their rendered cause as a `String` so the whole type stays
/// `Clone` and can travel through shell messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// A picture name was empty or missing. Rejected before any side effect.
    #[error("a picture name is required")]
    InvalidInput,

    /// The camera could not be opened at all.
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// The camera opened but stopped producing frames mid-session.
    #[error("camera read failed: {0}")]
    ReadFailed(String),

    /// Picture data could not pass through the codec; almost always a stored
    /// payload that no longer decodes.
    #[error("picture data error: {0}")]
    CorruptData(String),

    /// The database rejected a read, write, or delete.
    #[error("database error: {0}")]
    Persist(String),
}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::Unavailable(msg) => AppError::DeviceUnavailable(msg),
            CameraError::ReadFailed(msg) => AppError::ReadFailed(msg),
        }
    }
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Corrupt(msg) => AppError::CorruptData(msg),
            CodecError::Encode(msg) => AppError::CorruptData(msg),
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        AppError::Persist(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_errors_map_to_distinct_variants() {
        let open = AppError::from(CameraError::Unavailable("no device 0".into()));
        let read = AppError::from(CameraError::ReadFailed("stream stalled".into()));

        assert_eq!(open, AppError::DeviceUnavailable("no device 0".into()));
        assert_eq!(read, AppError::ReadFailed("stream stalled".into()));
    }

    #[test]
    fn test_display_messages_are_user_readable() {
        let err = AppError::InvalidInput;
        assert_eq!(err.to_string(), "a picture name is required");
    }
}
