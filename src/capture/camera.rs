/// Camera access
///
/// Wraps the platform webcam behind the `FrameSource` trait so the capture
/// session never depends on a real device. The live implementation uses
/// nokhwa's native backend and hands out decoded RGB8 frames.

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use thiserror::Error;

use crate::frame::Frame;

/// Camera failure, split by phase: opening the device is distinct from a
/// read failing mid-stream (e.g. the device was unplugged after a good open).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    #[error("could not open camera: {0}")]
    Unavailable(String),

    #[error("camera stopped producing frames: {0}")]
    ReadFailed(String),
}

/// A live source of raw frames.
///
/// Implementors own their device exclusively while alive and release it on
/// drop, so holding a source by value is holding the device.
pub trait FrameSource {
    fn read_frame(&mut self) -> Result<Frame, CameraError>;
}

/// A webcam opened through nokhwa.
pub struct Webcam {
    inner: Camera,
}

impl Webcam {
    /// Open the camera at the given device index and start its stream.
    ///
    /// Fails fast with `CameraError::Unavailable` if there is no such device
    /// or it cannot be claimed.
    pub fn open(device_index: u32) -> Result<Self, CameraError> {
        let requested =
            RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);

        let mut inner = Camera::new(CameraIndex::Index(device_index), requested)
            .map_err(|e| CameraError::Unavailable(e.to_string()))?;

        inner
            .open_stream()
            .map_err(|e| CameraError::Unavailable(e.to_string()))?;

        Ok(Self { inner })
    }
}

impl FrameSource for Webcam {
    fn read_frame(&mut self) -> Result<Frame, CameraError> {
        let buffer = self
            .inner
            .frame()
            .map_err(|e| CameraError::ReadFailed(e.to_string()))?;

        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::ReadFailed(e.to_string()))?;

        let (width, height) = (decoded.width(), decoded.height());
        Ok(Frame::new(width, height, decoded.into_raw()))
    }
}

impl Drop for Webcam {
    fn drop(&mut self) {
        // Best-effort; the OS reclaims the device either way when we go away.
        let _ = self.inner.stop_stream();
    }
}
