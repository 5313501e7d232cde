/// Raw camera frame
///
/// A `Frame` is one decoded image from the camera: a width × height grid of
/// 8-bit RGB samples, row-major, three bytes per pixel. Frames are transient:
/// they live inside a capture session or one gallery step, and are only ever
/// persisted through the JPEG codec.

/// Number of bytes per pixel (RGB8).
const CHANNELS: usize = 3;

/// One decoded RGB8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    /// Wrap a raw RGB8 buffer.
    ///
    /// # Panics
    /// Panics if the buffer length does not match `width * height * 3`; a frame
    /// with mismatched geometry is a programming error, not a runtime condition.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize * CHANNELS,
            "pixel buffer does not match {}x{} RGB8",
            width,
            height
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGB8 bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// A horizontally flipped copy (selfie-mirror view for the live preview).
    pub fn mirrored(&self) -> Frame {
        let row_bytes = self.width as usize * CHANNELS;
        let mut flipped = Vec::with_capacity(self.pixels.len());

        for row in self.pixels.chunks_exact(row_bytes) {
            for pixel in row.chunks_exact(CHANNELS).rev() {
                flipped.extend_from_slice(pixel);
            }
        }

        Frame {
            width: self.width,
            height: self.height,
            pixels: flipped,
        }
    }

    /// Expand to RGBA8 (alpha = opaque) for display widgets that want 4 channels.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for pixel in self.pixels.chunks_exact(CHANNELS) {
            rgba.extend_from_slice(pixel);
            rgba.push(0xFF);
        }
        rgba
    }
}
