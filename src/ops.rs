/// User-facing operations
///
/// One function per button: capture, find, browse, delete. Each runs its
/// whole pipeline and folds every possible ending (success, cancellation,
/// misses, and the full error taxonomy) into a single `Outcome` the shell
/// can put on the status line. Nothing in here panics or escapes as a raw
/// error, and name validation happens before any device or database side
/// effect.

use std::time::Duration;

use crate::capture::camera::{CameraError, FrameSource};
use crate::capture::session::{self, CaptureDecision};
use crate::capture::{PreviewSink, SignalPoll};
use crate::codec;
use crate::error::AppError;
use crate::gallery::{GalleryWalker, SignalWait};
use crate::state::library::Library;
use crate::state::settings::CaptureSettings;

/// The single user-facing result of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Capture committed and stored under this name
    Saved(String),
    /// Capture abandoned before commit; nothing stored
    Cancelled,
    /// A stored picture was found and displayed
    Shown(String),
    /// Gallery browsing finished after showing this many pictures
    Browsed(usize),
    /// Delete ran; count may be zero, which is information, not an error
    Deleted { name: String, count: usize },
    /// No picture has this name (informational, not a failure)
    NotFound(String),
    /// The library is empty, so there is nothing to browse
    NoPhotos,
    /// The operation failed for one of the taxonomy reasons
    Failed(AppError),
}

impl Outcome {
    /// Status-line text for the shell.
    pub fn message(&self) -> String {
        match self {
            Outcome::Saved(name) => format!("✅ Picture '{}' saved.", name),
            Outcome::Cancelled => "Capture cancelled.".to_string(),
            Outcome::Shown(name) => format!("Showing '{}'.", name),
            Outcome::Browsed(count) => format!("Browsed {} picture(s).", count),
            Outcome::Deleted { name, count: 0 } => {
                format!("No picture named '{}' to delete.", name)
            }
            Outcome::Deleted { name, count } => {
                format!("✅ Deleted {} picture(s) named '{}'.", count, name)
            }
            Outcome::NotFound(name) => format!("No picture named '{}' found.", name),
            Outcome::NoPhotos => "No pictures saved yet.".to_string(),
            Outcome::Failed(err) => format!("⚠️  {}", err),
        }
    }
}

fn validated(name: &str) -> Option<&str> {
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Capture one picture from the camera and store it under `name`.
///
/// The camera is handed in as a factory so a rejected name never opens the
/// device. The session owns the source; by the time anything is written to
/// the library, the device has already been released.
pub fn capture_and_save<S, F>(
    library: &Library,
    name: &str,
    open_camera: F,
    signals: &mut dyn SignalPoll,
    preview: &mut dyn PreviewSink,
    settings: &CaptureSettings,
) -> Outcome
where
    S: FrameSource,
    F: FnOnce() -> Result<S, CameraError>,
{
    let name = match validated(name) {
        Some(name) => name,
        None => return Outcome::Failed(AppError::InvalidInput),
    };

    let source = match open_camera() {
        Ok(source) => source,
        Err(err) => return Outcome::Failed(err.into()),
    };

    let decision = session::run_preview(
        source,
        signals,
        preview,
        settings.mirror_preview,
        Duration::from_millis(settings.poll_wait_ms),
    );

    match decision {
        Ok(CaptureDecision::Commit(frame)) => {
            let jpeg = match codec::encode(&frame, settings.jpeg_quality) {
                Ok(jpeg) => jpeg,
                Err(err) => return Outcome::Failed(err.into()),
            };
            match library.insert(name, &jpeg) {
                Ok(_id) => Outcome::Saved(name.to_string()),
                Err(err) => Outcome::Failed(err.into()),
            }
        }
        Ok(CaptureDecision::Cancelled) => Outcome::Cancelled,
        Err(err) => Outcome::Failed(err.into()),
    }
}

/// Look up the first picture with `name` (lowest id) and display it.
pub fn find_and_show(library: &Library, name: &str, sink: &mut dyn PreviewSink) -> Outcome {
    let name = match validated(name) {
        Some(name) => name,
        None => return Outcome::Failed(AppError::InvalidInput),
    };

    let photo = match library.find_first_by_name(name) {
        Ok(Some(photo)) => photo,
        Ok(None) => return Outcome::NotFound(name.to_string()),
        Err(err) => return Outcome::Failed(err.into()),
    };

    match codec::decode(&photo.data) {
        Ok(frame) => {
            sink.show(&frame);
            Outcome::Shown(photo.name)
        }
        Err(err) => Outcome::Failed(err.into()),
    }
}

/// Walk every stored picture, oldest first, one signal per page.
pub fn list_and_browse_all(
    library: &Library,
    signals: &mut dyn SignalWait,
    sink: &mut dyn PreviewSink,
) -> Outcome {
    let photos = match library.list_all() {
        Ok(photos) => photos,
        Err(err) => return Outcome::Failed(err.into()),
    };

    if photos.is_empty() {
        return Outcome::NoPhotos;
    }

    match GalleryWalker::new(photos).run(signals, sink) {
        Ok(shown) => Outcome::Browsed(shown),
        Err(err) => Outcome::Failed(err.into()),
    }
}

/// Delete every picture named `name`; zero matches is a normal result.
pub fn delete_by_name(library: &Library, name: &str) -> Outcome {
    let name = match validated(name) {
        Some(name) => name,
        None => return Outcome::Failed(AppError::InvalidInput),
    };

    match library.delete_by_name(name) {
        Ok(count) => Outcome::Deleted {
            name: name.to_string(),
            count,
        },
        Err(err) => Outcome::Failed(err.into()),
    }
}
