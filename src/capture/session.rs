/// Capture preview session
///
/// The loop between opening the camera and deciding what to do with it:
/// read a frame, show it (mirrored, if the user likes a selfie view), and
/// give the user a short window to press commit or cancel before the next
/// frame. The loop only ends on a signal or a camera failure.

use std::time::Duration;

use super::camera::{CameraError, FrameSource};
use super::{CaptureSignal, PreviewSink, SignalPoll};
use crate::frame::Frame;

/// How a preview session ended, when the camera itself held up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureDecision {
    /// The user committed this frame. Note this is the frame as read from the
    /// camera; the mirrored copy only ever went to the preview sink.
    Commit(Frame),
    /// The user backed out; nothing to save.
    Cancelled,
}

/// Run the preview loop until a signal or a camera failure ends it.
///
/// Takes the source by value: whenever this returns, the source has been
/// dropped and the device released, on every path including errors.
///
/// `poll_wait` bounds how long each iteration waits for a signal; it should
/// stay well under the camera's frame interval so reads never back up.
pub fn run_preview(
    mut source: impl FrameSource,
    signals: &mut dyn SignalPoll,
    preview: &mut dyn PreviewSink,
    mirror_preview: bool,
    poll_wait: Duration,
) -> Result<CaptureDecision, CameraError> {
    loop {
        let frame = source.read_frame()?;

        if mirror_preview {
            preview.show(&frame.mirrored());
        } else {
            preview.show(&frame);
        }

        match signals.poll(poll_wait) {
            Some(CaptureSignal::Commit) => return Ok(CaptureDecision::Commit(frame)),
            Some(CaptureSignal::Cancel) => return Ok(CaptureDecision::Cancelled),
            None => continue,
        }
    }
}
