/// Gallery browsing
///
/// Steps through every stored picture one at a time, decoding on demand so
/// only a single frame is ever held in memory. The user advances with one
/// signal and bails out with the other; running off the end is a clean finish,
/// not an error.

use crate::capture::PreviewSink;
use crate::codec::{self, CodecError};
use crate::frame::Frame;
use crate::state::data::Photo;

/// The two discrete signals that drive gallery browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GallerySignal {
    /// Show the next picture
    Advance,
    /// Stop browsing now
    Quit,
}

/// Source of gallery signals. Unlike the capture poll, this wait is
/// indefinite; a gallery page stays up until the user reacts.
pub trait SignalWait {
    fn wait(&mut self) -> GallerySignal;
}

/// One decoded gallery page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub name: String,
    pub frame: Frame,
}

/// Forward-only cursor over a listing, decoding one payload per step.
pub struct GalleryWalker {
    photos: Vec<Photo>,
    index: usize,
}

impl GalleryWalker {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self { photos, index: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Decode and return the next picture, or None when the listing is done.
    pub fn advance(&mut self) -> Option<Result<GalleryItem, CodecError>> {
        let photo = self.photos.get(self.index)?;
        self.index += 1;

        Some(codec::decode(&photo.data).map(|frame| GalleryItem {
            name: photo.name.clone(),
            frame,
        }))
    }

    /// Restart the traversal from the first picture.
    pub fn rewind(&mut self) {
        self.index = 0;
    }

    /// Blocking traversal: show a page, wait for a signal, repeat.
    ///
    /// An empty listing returns immediately without touching the codec.
    /// Returns how many pictures were shown. A corrupt payload aborts the
    /// walk; the caller decides how to report it.
    pub fn run(
        mut self,
        signals: &mut dyn SignalWait,
        sink: &mut dyn PreviewSink,
    ) -> Result<usize, CodecError> {
        let mut shown = 0;

        loop {
            match self.advance() {
                None => return Ok(shown),
                Some(Err(err)) => return Err(err),
                Some(Ok(item)) => {
                    sink.show(&item.frame);
                    shown += 1;
                }
            }

            match signals.wait() {
                GallerySignal::Advance => continue,
                GallerySignal::Quit => return Ok(shown),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    fn jpeg_photo(id: i64, name: &str) -> Photo {
        let frame = Frame::new(4, 2, vec![100; 4 * 2 * 3]);
        Photo {
            id,
            name: name.to_string(),
            data: codec::encode(&frame, 80).unwrap(),
            captured_at: 0,
        }
    }

    struct Script(VecDeque<GallerySignal>);

    impl SignalWait for Script {
        fn wait(&mut self) -> GallerySignal {
            // A drained script means the test expected the walk to be over
            self.0.pop_front().expect("walker asked for more signals than scripted")
        }
    }

    /// Counts pages without keeping them.
    #[derive(Default)]
    struct Counter(usize);

    impl PreviewSink for Counter {
        fn show(&mut self, _frame: &Frame) {
            self.0 += 1;
        }
    }

    #[test]
    fn test_empty_listing_terminates_without_decoding() {
        let walker = GalleryWalker::new(Vec::new());
        let mut signals = Script(VecDeque::new());
        let mut sink = Counter::default();

        let shown = walker.run(&mut signals, &mut sink).unwrap();

        assert_eq!(shown, 0);
        assert_eq!(sink.0, 0);
    }

    #[test]
    fn test_advancing_past_the_end_finishes_cleanly() {
        let walker = GalleryWalker::new(vec![
            jpeg_photo(1, "a"),
            jpeg_photo(2, "b"),
            jpeg_photo(3, "c"),
        ]);
        // Three pictures, three advances: the last advance finds nothing left
        let mut signals = Script(VecDeque::from([
            GallerySignal::Advance,
            GallerySignal::Advance,
            GallerySignal::Advance,
        ]));
        let mut sink = Counter::default();

        let shown = walker.run(&mut signals, &mut sink).unwrap();

        assert_eq!(shown, 3);
        assert_eq!(sink.0, 3);
    }

    #[test]
    fn test_quit_stops_early() {
        let walker = GalleryWalker::new(vec![jpeg_photo(1, "a"), jpeg_photo(2, "b")]);
        let mut signals = Script(VecDeque::from([GallerySignal::Quit]));
        let mut sink = Counter::default();

        let shown = walker.run(&mut signals, &mut sink).unwrap();

        assert_eq!(shown, 1);
        assert_eq!(sink.0, 1);
    }

    #[test]
    fn test_corrupt_payload_aborts_walk() {
        let mut bad = jpeg_photo(1, "bad");
        bad.data = vec![0xDE, 0xAD, 0xBE, 0xEF];

        let walker = GalleryWalker::new(vec![bad, jpeg_photo(2, "good")]);
        let mut signals = Script(VecDeque::new());
        let mut sink = Counter::default();

        let result = walker.run(&mut signals, &mut sink);

        assert!(matches!(result, Err(CodecError::Corrupt(_))));
        assert_eq!(sink.0, 0);
    }

    #[test]
    fn test_rewind_restarts_from_zero() {
        let mut walker = GalleryWalker::new(vec![jpeg_photo(1, "a"), jpeg_photo(2, "b")]);

        let first = walker.advance().unwrap().unwrap();
        walker.advance().unwrap().unwrap();
        assert!(walker.advance().is_none());

        walker.rewind();
        let again = walker.advance().unwrap().unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_items_carry_names_in_listing_order() {
        let mut walker = GalleryWalker::new(vec![jpeg_photo(1, "first"), jpeg_photo(2, "second")]);

        assert_eq!(walker.advance().unwrap().unwrap().name, "first");
        assert_eq!(walker.advance().unwrap().unwrap().name, "second");
    }
}
