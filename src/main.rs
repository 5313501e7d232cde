use iced::widget::{button, column, container, image as picture, row, text, text_input};
use iced::{Alignment, Element, Length, Subscription, Task, Theme};
use std::sync::mpsc;
use std::time::Duration;

// Declare the application modules
mod capture;
mod codec;
mod error;
mod frame;
mod gallery;
mod ops;
mod state;

use crate::capture::camera::Webcam;
use crate::capture::{CaptureSignal, PreviewSink, SignalPoll};
use crate::error::AppError;
use crate::frame::Frame;
use crate::gallery::GalleryWalker;
use crate::ops::Outcome;
use crate::state::library::Library;
use crate::state::settings::CaptureSettings;

/// How often the live preview repaints. Stays ahead of typical webcam rates.
const PREVIEW_TICK: Duration = Duration::from_millis(33);

/// Main application state
struct PhotoBooth {
    /// The picture database
    library: Library,
    /// User-tunable capture settings, persisted next to the database
    settings: CaptureSettings,
    /// Contents of the name field
    name_input: String,
    /// Status message to display to the user
    status: String,
    /// Which screen is up
    screen: Screen,
}

/// The screens the app can be on
enum Screen {
    /// Name field + the four operation buttons
    Menu,
    /// Live camera preview; a background task owns the device
    Capturing {
        preview: Option<picture::Handle>,
        signal_tx: mpsc::Sender<CaptureSignal>,
        frame_rx: mpsc::Receiver<Frame>,
    },
    /// One looked-up picture
    Viewing {
        name: String,
        handle: picture::Handle,
    },
    /// Stepping through the whole library
    Browsing {
        walker: GalleryWalker,
        page: Option<(String, picture::Handle)>,
        shown: usize,
    },
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User edited the name field
    NameChanged(String),
    /// The four operation buttons
    CapturePressed,
    FindPressed,
    BrowsePressed,
    DeletePressed,
    /// Repaint timer while the live preview is up
    PreviewTick,
    /// Space/Esc during the live preview
    CaptureKey(CaptureSignal),
    /// Background capture finished with its outcome
    CaptureFinished(Outcome),
    /// Advance to the next gallery page
    NextPressed,
    /// Leave the viewing/browsing screen
    ClosePressed,
}

/// Bridges the background capture loop to UI key presses.
struct ChannelSignals(mpsc::Receiver<CaptureSignal>);

impl SignalPoll for ChannelSignals {
    fn poll(&mut self, wait: Duration) -> Option<CaptureSignal> {
        self.0.recv_timeout(wait).ok()
    }
}

/// Streams preview frames from the background capture loop to the UI.
struct ChannelPreview(mpsc::Sender<Frame>);

impl PreviewSink for ChannelPreview {
    fn show(&mut self, frame: &Frame) {
        // The UI may already have moved on; a dead receiver is not our problem
        let _ = self.0.send(frame.clone());
    }
}

/// Captures the single frame an operation wants to display.
#[derive(Default)]
struct SlotSink(Option<Frame>);

impl PreviewSink for SlotSink {
    fn show(&mut self, frame: &Frame) {
        self.0 = Some(frame.clone());
    }
}

fn handle_from(frame: &Frame) -> picture::Handle {
    picture::Handle::from_rgba(frame.width(), frame.height(), frame.to_rgba())
}

impl PhotoBooth {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // Initialize the database
        // If this fails, we panic because the app cannot function without its database
        let library = Library::new()
            .expect("Failed to initialize database. Check permissions and disk space.");

        let settings_path = CaptureSettings::default_path();
        let settings = CaptureSettings::load_or_default(&settings_path);

        // First run: write the defaults so there is a file to edit
        if !settings_path.exists() {
            if let Err(err) = settings.save(&settings_path) {
                eprintln!("⚠️  Could not write settings file: {}", err);
            }
        }

        let picture_count = library.picture_count().unwrap_or(0);
        println!("📁 Database initialized at: {}", library.path().display());
        println!("📸 Photo booth ready with {} pictures", picture_count);

        let status = format!("Ready. {} pictures in the library.", picture_count);

        (
            PhotoBooth {
                library,
                settings,
                name_input: String::new(),
                status,
                screen: Screen::Menu,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NameChanged(name) => {
                self.name_input = name;
                Task::none()
            }

            Message::CapturePressed => {
                if self.name_input.trim().is_empty() {
                    self.status = "⚠️  Enter a picture name first.".to_string();
                    return Task::none();
                }

                // Two channels bridge the UI and the background capture loop:
                // key presses flow down, preview frames flow back up
                let (signal_tx, signal_rx) = mpsc::channel();
                let (frame_tx, frame_rx) = mpsc::channel();

                self.screen = Screen::Capturing {
                    preview: None,
                    signal_tx,
                    frame_rx,
                };
                self.status = "Live preview: Space saves, Esc cancels.".to_string();

                let db_path = self.library.path().clone();
                let settings = self.settings.clone();
                let name = self.name_input.clone();

                Task::perform(
                    capture_async(db_path, settings, name, signal_rx, frame_tx),
                    Message::CaptureFinished,
                )
            }

            Message::PreviewTick => {
                if let Screen::Capturing {
                    preview, frame_rx, ..
                } = &mut self.screen
                {
                    // Drain the channel and keep only the freshest frame
                    let mut latest = None;
                    while let Ok(frame) = frame_rx.try_recv() {
                        latest = Some(frame);
                    }
                    if let Some(frame) = latest {
                        *preview = Some(handle_from(&frame));
                    }
                }
                Task::none()
            }

            Message::CaptureKey(signal) => {
                if let Screen::Capturing { signal_tx, .. } = &self.screen {
                    let _ = signal_tx.send(signal);
                }
                Task::none()
            }

            Message::CaptureFinished(outcome) => {
                self.status = outcome.message();
                println!("📸 {}", self.status);
                self.screen = Screen::Menu;
                Task::none()
            }

            Message::FindPressed => {
                let mut slot = SlotSink::default();
                let outcome = ops::find_and_show(&self.library, &self.name_input, &mut slot);
                self.status = outcome.message();

                if let (Outcome::Shown(name), Some(frame)) = (&outcome, slot.0) {
                    self.screen = Screen::Viewing {
                        name: name.clone(),
                        handle: handle_from(&frame),
                    };
                }
                Task::none()
            }

            Message::BrowsePressed => {
                match self.library.list_all() {
                    Ok(photos) if photos.is_empty() => {
                        self.status = Outcome::NoPhotos.message();
                    }
                    Ok(photos) => {
                        self.step_gallery(GalleryWalker::new(photos), 0);
                    }
                    Err(err) => {
                        self.status = Outcome::Failed(AppError::from(err)).message();
                    }
                }
                Task::none()
            }

            Message::NextPressed => {
                if let Screen::Browsing { walker, shown, .. } =
                    std::mem::replace(&mut self.screen, Screen::Menu)
                {
                    self.step_gallery(walker, shown);
                }
                Task::none()
            }

            Message::ClosePressed => {
                if let Screen::Browsing { shown, .. } =
                    std::mem::replace(&mut self.screen, Screen::Menu)
                {
                    self.status = Outcome::Browsed(shown).message();
                }
                Task::none()
            }

            Message::DeletePressed => {
                let outcome = ops::delete_by_name(&self.library, &self.name_input);
                self.status = outcome.message();
                Task::none()
            }
        }
    }

    /// Decode one more gallery page, or drop back to the menu when done.
    ///
    /// The UI thread cannot block waiting for a signal the way a headless
    /// caller can, so the walker is stepped here, one page per button press.
    fn step_gallery(&mut self, mut walker: GalleryWalker, shown: usize) {
        match walker.advance() {
            None => {
                self.screen = Screen::Menu;
                self.status = Outcome::Browsed(shown).message();
            }
            Some(Err(err)) => {
                self.screen = Screen::Menu;
                self.status = Outcome::Failed(AppError::from(err)).message();
            }
            Some(Ok(item)) => {
                let handle = handle_from(&item.frame);
                self.status = format!("Showing '{}'. Space for next, Esc to stop.", item.name);
                self.screen = Screen::Browsing {
                    walker,
                    page: Some((item.name, handle)),
                    shown: shown + 1,
                };
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let content: Element<Message> = match &self.screen {
            Screen::Menu => column![
                text("Photo Booth").size(48),
                text_input("Picture name…", &self.name_input)
                    .on_input(Message::NameChanged)
                    .padding(10),
                row![
                    button("Capture & Save").on_press(Message::CapturePressed).padding(10),
                    button("Find & Show").on_press(Message::FindPressed).padding(10),
                    button("Browse All").on_press(Message::BrowsePressed).padding(10),
                    button("Delete").on_press(Message::DeletePressed).padding(10),
                ]
                .spacing(10),
                text(&self.status).size(16),
            ]
            .spacing(20)
            .padding(40)
            .align_x(Alignment::Center)
            .into(),

            Screen::Capturing { preview, .. } => {
                let view_area: Element<Message> = match preview {
                    Some(handle) => picture(handle.clone())
                        .width(Length::Fill)
                        .height(Length::Fill)
                        .into(),
                    None => text("Opening camera…").size(24).into(),
                };
                column![
                    view_area,
                    text("Space saves the picture, Esc cancels.").size(16),
                ]
                .spacing(10)
                .padding(20)
                .align_x(Alignment::Center)
                .into()
            }

            Screen::Viewing { name, handle } => column![
                text(format!("Picture: {}", name)).size(24),
                picture(handle.clone())
                    .width(Length::Fill)
                    .height(Length::Fill),
                button("Close").on_press(Message::ClosePressed).padding(10),
            ]
            .spacing(10)
            .padding(20)
            .align_x(Alignment::Center)
            .into(),

            Screen::Browsing { page, .. } => {
                let page_area: Element<Message> = match page {
                    Some((name, handle)) => column![
                        text(format!("Picture: {}", name)).size(24),
                        picture(handle.clone())
                            .width(Length::Fill)
                            .height(Length::Fill),
                    ]
                    .spacing(10)
                    .into(),
                    None => text("Nothing to show.").size(24).into(),
                };
                column![
                    page_area,
                    row![
                        button("Next").on_press(Message::NextPressed).padding(10),
                        button("Stop").on_press(Message::ClosePressed).padding(10),
                    ]
                    .spacing(10),
                ]
                .spacing(10)
                .padding(20)
                .align_x(Alignment::Center)
                .into()
            }
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    /// Screen-dependent event sources: a repaint timer plus the capture keys
    /// while previewing, page keys while viewing or browsing
    fn subscription(&self) -> Subscription<Message> {
        use iced::keyboard::{self, key::Named, Key};

        match &self.screen {
            Screen::Capturing { .. } => Subscription::batch([
                iced::time::every(PREVIEW_TICK).map(|_| Message::PreviewTick),
                keyboard::on_key_press(|key, _modifiers| match key {
                    Key::Named(Named::Space) => {
                        Some(Message::CaptureKey(CaptureSignal::Commit))
                    }
                    Key::Named(Named::Escape) => {
                        Some(Message::CaptureKey(CaptureSignal::Cancel))
                    }
                    _ => None,
                }),
            ]),
            Screen::Browsing { .. } => keyboard::on_key_press(|key, _modifiers| match key {
                Key::Named(Named::Space) => Some(Message::NextPressed),
                Key::Named(Named::Escape) => Some(Message::ClosePressed),
                _ => None,
            }),
            Screen::Viewing { .. } => keyboard::on_key_press(|key, _modifiers| match key {
                Key::Named(Named::Escape) => Some(Message::ClosePressed),
                _ => None,
            }),
            Screen::Menu => Subscription::none(),
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application("Photo Booth", PhotoBooth::update, PhotoBooth::view)
        .subscription(PhotoBooth::subscription)
        .theme(PhotoBooth::theme)
        .centered()
        .run_with(PhotoBooth::new)
}

/// Run one full capture operation on a background thread.
///
/// Everything from opening the camera to the final insert happens
/// off the UI thread; the channels carry key presses down and frames back up.
async fn capture_async(
    db_path: std::path::PathBuf,
    settings: CaptureSettings,
    name: String,
    signal_rx: mpsc::Receiver<CaptureSignal>,
    frame_tx: mpsc::Sender<Frame>,
) -> Outcome {
    let task = tokio::task::spawn_blocking(move || {
        // Open a new database connection for this background thread
        // rusqlite::Connection is not Send, so we can't share the main connection
        let library = match Library::open(&db_path) {
            Ok(library) => library,
            Err(err) => return Outcome::Failed(AppError::from(err)),
        };

        let mut signals = ChannelSignals(signal_rx);
        let mut preview = ChannelPreview(frame_tx);
        let device_index = settings.device_index;

        ops::capture_and_save(
            &library,
            &name,
            || Webcam::open(device_index),
            &mut signals,
            &mut preview,
            &settings,
        )
    });

    task.await
        .unwrap_or_else(|err| Outcome::Failed(AppError::ReadFailed(format!("capture task aborted: {}", err))))
}
