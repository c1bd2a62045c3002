use iced::alignment::{Horizontal, Vertical};
use iced::keyboard::{self, key};
use iced::widget::{button, canvas, column, container, row, scrollable, stack, text, Column};
use iced::{theme, Alignment, Color, Element, Length, Subscription, Task, Theme};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

mod audio;
mod state;
mod ui;

use audio::output::AudioOutput;
use audio::player::{birthday_playlist, PlaybackState, PlayerCore};
use state::confetti::ConfettiEngine;
use state::data::FeedbackMessage;
use state::feedback::FeedbackFlow;
use state::gallery::{ModalKey, PhotoBrowser};
use state::guestbook::GuestBook;
use state::photos::ManifestEntry;

/// Which page fills the window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Card,
    Messages,
}

/// Main application state
struct BirthdayCard {
    /// Photo sequence and the modal viewing session
    browser: PhotoBrowser,
    /// Confetti batch and its clearing deadline
    confetti: ConfettiEngine,
    /// Playback controller, shared with the audio stream callback
    player: Arc<Mutex<PlayerCore>>,
    /// The claimed output device, once playback has started
    output: Option<AudioOutput>,
    /// Whether the floating player panel is expanded
    player_open: bool,
    /// Feedback submission lifecycle
    feedback: FeedbackFlow,
    /// The guest book database
    guest_book: GuestBook,
    /// Database file location, handed to background tasks
    db_path: PathBuf,
    /// User-added photos, persisted in the gallery manifest
    imported: Vec<ManifestEntry>,
    manifest_path: PathBuf,
    page: Page,
    /// Guest book messages, loaded when the messages page opens
    messages: Option<Vec<FeedbackMessage>>,
    messages_error: Option<String>,
    /// Status line shown under the hero section
    status: String,
    /// Clock driving the confetti animation
    now: Instant,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User pressed the celebrate button
    Celebrate,
    /// Animation clock tick
    Tick(Instant),
    OpenPhoto(usize),
    CloseModal,
    NextPhoto,
    PreviousPhoto,
    /// A key the modal cares about was pressed
    KeyPressed(ModalKey),
    AddPhotos,
    /// File picker finished with the selected photos
    PhotosPicked(Vec<PathBuf>),
    TogglePanel,
    TogglePlay,
    NextTrack,
    PreviousTrack,
    SelectTrack(usize),
    ToggleMute,
    VolumeChanged(f32),
    SeekTo(f32),
    DraftChanged(String),
    SubmitFeedback,
    /// The guest book answered the create request
    FeedbackSaved(Result<FeedbackMessage, String>),
    OpenMessages,
    MessagesLoaded(Result<Vec<FeedbackMessage>, String>),
    BackToCard,
}

impl BirthdayCard {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        // If this fails, we panic because the card cannot function
        // without its guest book database
        let guest_book = GuestBook::new()
            .expect("Failed to initialize the guest book. Check permissions and disk space.");
        let message_count = guest_book.feedback_count().unwrap_or(0);

        let manifest_path = state::photos::default_manifest_path();
        let imported = state::photos::load_manifest(&manifest_path).unwrap_or_else(|e| {
            tracing::warn!("could not load the gallery manifest: {e}");
            Vec::new()
        });

        let mut photos = state::photos::scan_photos(Path::new("photos"));
        photos.extend(imported.iter().map(ManifestEntry::to_photo));

        tracing::info!(
            photos = photos.len(),
            messages = message_count,
            db = %guest_book.path().display(),
            "birthday card initialized"
        );

        let status = format!(
            "{} photos in the gallery · {} messages in the guest book",
            photos.len(),
            message_count
        );

        let db_path = guest_book.path().to_path_buf();

        (
            BirthdayCard {
                browser: PhotoBrowser::new(photos),
                confetti: ConfettiEngine::new(),
                player: Arc::new(Mutex::new(PlayerCore::new(birthday_playlist()))),
                output: None,
                player_open: false,
                feedback: FeedbackFlow::new(),
                guest_book,
                db_path,
                imported,
                manifest_path,
                page: Page::Card,
                messages: None,
                messages_error: None,
                status,
                now: Instant::now(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Celebrate => {
                self.confetti.activate(Instant::now());
            }
            Message::Tick(now) => {
                self.now = now;
                self.confetti.tick(now);
            }

            Message::OpenPhoto(index) => self.browser.open(index),
            Message::CloseModal => self.browser.close(),
            Message::NextPhoto => self.browser.next(),
            Message::PreviousPhoto => self.browser.previous(),
            Message::KeyPressed(k) => {
                self.browser.on_key(k);
            }

            Message::AddPhotos => {
                return Task::perform(pick_photos(), Message::PhotosPicked);
            }
            Message::PhotosPicked(paths) => {
                if !paths.is_empty() {
                    let entries: Vec<ManifestEntry> =
                        paths.into_iter().map(ManifestEntry::from_path).collect();
                    self.browser
                        .push_photos(entries.iter().map(ManifestEntry::to_photo));
                    self.imported.extend(entries);

                    if let Err(e) =
                        state::photos::save_manifest(&self.manifest_path, &self.imported)
                    {
                        tracing::warn!("could not save the gallery manifest: {e}");
                    }
                    self.status = format!("Photos added · {} in the gallery", self.browser.len());
                }
            }

            Message::TogglePanel => self.player_open = !self.player_open,
            Message::TogglePlay => {
                let playing = self
                    .with_player(|c| c.state() == PlaybackState::Playing)
                    .unwrap_or(false);
                if playing {
                    self.with_player(PlayerCore::pause);
                } else if self.ensure_output() {
                    self.with_player(PlayerCore::play);
                }
            }
            Message::NextTrack => {
                if self.ensure_output() {
                    self.with_player(PlayerCore::next);
                }
            }
            Message::PreviousTrack => {
                if self.ensure_output() {
                    self.with_player(PlayerCore::previous);
                }
            }
            Message::SelectTrack(index) => {
                if self.ensure_output() {
                    self.with_player(|c| c.select(index));
                }
            }
            Message::ToggleMute => {
                self.with_player(PlayerCore::toggle_mute);
            }
            Message::VolumeChanged(volume) => {
                self.with_player(|c| c.set_volume(volume));
            }
            Message::SeekTo(fraction) => {
                self.with_player(|c| c.seek(fraction));
            }

            Message::DraftChanged(draft) => self.feedback.edit(draft),
            Message::SubmitFeedback => {
                if let Some(text) = self.feedback.begin_submit() {
                    return Task::perform(
                        save_feedback(self.db_path.clone(), text),
                        Message::FeedbackSaved,
                    );
                }
            }
            Message::FeedbackSaved(result) => {
                if result.is_ok() {
                    let count = self.guest_book.feedback_count().unwrap_or(0);
                    self.status = format!("💌 Message received · {count} in the guest book");
                }
                self.feedback.resolve(result);
            }

            Message::OpenMessages => {
                self.page = Page::Messages;
                self.messages = None;
                self.messages_error = None;
                return Task::perform(load_feedbacks(self.db_path.clone()), Message::MessagesLoaded);
            }
            Message::MessagesLoaded(result) => match result {
                Ok(messages) => self.messages = Some(messages),
                Err(error) => self.messages_error = Some(error),
            },
            Message::BackToCard => self.page = Page::Card,
        }

        Task::none()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        if self.page == Page::Messages {
            return ui::messages::page(self.messages.as_deref(), self.messages_error.as_deref());
        }

        let content = column![
            self.hero(),
            ui::gallery::section(&self.browser),
            ui::wishes::section(),
            ui::feedback::section(&self.feedback),
        ]
        .spacing(48)
        .padding(32)
        .align_x(Alignment::Center)
        .width(Length::Fill);

        // While the modal is open, the page behind it must not scroll.
        let base: Element<Message> = if self.browser.scroll_lock().is_locked() {
            container(content).height(Length::Fill).clip(true).into()
        } else {
            scrollable(content).height(Length::Fill).into()
        };

        let mut layers = stack![base, self.player_corner()];

        if self.confetti.is_active() {
            layers = layers.push(
                canvas(ui::confetti::ConfettiLayer {
                    engine: &self.confetti,
                    now: self.now,
                })
                .width(Length::Fill)
                .height(Length::Fill),
            );
        }

        if self.browser.is_open() {
            layers = layers.push(ui::gallery::modal(&self.browser));
        }

        layers.into()
    }

    /// Hero section: greeting, celebrate trigger, and the status line
    fn hero(&self) -> Element<Message> {
        column![
            text("🎈 🎂 🎁 🎉").size(36),
            text("Happy Birthday!").size(64),
            text("Wishing you a day as wonderful as you are").size(20),
            row![
                button(text("🎉 Celebrate!").size(18))
                    .padding(14)
                    .on_press(Message::Celebrate),
                button(text("💌 Guest Book").size(18))
                    .padding(14)
                    .on_press(Message::OpenMessages),
            ]
            .spacing(16),
            text(&self.status).size(14),
        ]
        .spacing(18)
        .align_x(Alignment::Center)
        .into()
    }

    /// Floating music control in the bottom-right corner
    fn player_corner(&self) -> Element<Message> {
        let mut corner = Column::new().spacing(12).align_x(Alignment::End);

        if self.player_open {
            if let Some(snapshot) = self.with_player(|c| c.snapshot()) {
                corner = corner.push(ui::player::panel(snapshot));
            }
        }
        corner = corner.push(
            button(text("🎵").size(24))
                .padding(12)
                .on_press(Message::TogglePanel),
        );

        container(corner)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Right)
            .align_y(Vertical::Bottom)
            .padding(24)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let keys = keyboard::on_key_press(handle_key);

        let playing = self
            .with_player(|c| c.state() == PlaybackState::Playing)
            .unwrap_or(false);

        if self.confetti.is_active() || playing {
            Subscription::batch([
                keys,
                iced::time::every(Duration::from_millis(33)).map(Message::Tick),
            ])
        } else {
            keys
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::custom(
            "Birthday".to_owned(),
            theme::Palette {
                background: Color::from_rgb(1.0, 0.96, 0.98),
                text: Color::from_rgb(0.2, 0.2, 0.25),
                primary: Color::from_rgb(0.93, 0.29, 0.6),
                success: Color::from_rgb(0.13, 0.77, 0.37),
                danger: Color::from_rgb(0.94, 0.27, 0.27),
            },
        )
    }

    /// Run a closure against the shared playback controller
    fn with_player<R>(&self, f: impl FnOnce(&mut PlayerCore) -> R) -> Option<R> {
        match self.player.lock() {
            Ok(mut core) => Some(f(&mut core)),
            Err(_) => {
                tracing::error!("playback controller lock poisoned");
                None
            }
        }
    }

    /// Claim the output device if we have not yet. A start failure is
    /// expected on machines without audio: log it, leave playback state
    /// unchanged, and let the user retry.
    fn ensure_output(&mut self) -> bool {
        if self.output.is_some() {
            return true;
        }
        match AudioOutput::start(Arc::clone(&self.player)) {
            Ok(output) => {
                self.output = Some(output);
                true
            }
            Err(e) => {
                tracing::warn!("playback unavailable: {e}");
                false
            }
        }
    }
}

/// Map global key presses onto modal navigation. The browser ignores
/// them all while the modal is closed.
fn handle_key(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key {
        keyboard::Key::Named(key::Named::Escape) => Some(Message::KeyPressed(ModalKey::Escape)),
        keyboard::Key::Named(key::Named::ArrowLeft) => {
            Some(Message::KeyPressed(ModalKey::Previous))
        }
        keyboard::Key::Named(key::Named::ArrowRight) => Some(Message::KeyPressed(ModalKey::Next)),
        _ => None,
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt::init();

    iced::application("Birthday Card", BirthdayCard::update, BirthdayCard::view)
        .subscription(BirthdayCard::subscription)
        .theme(BirthdayCard::theme)
        .centered()
        .run_with(BirthdayCard::new)
}

/// Let the user pick photos to add to the gallery
async fn pick_photos() -> Vec<PathBuf> {
    let picked = rfd::AsyncFileDialog::new()
        .set_title("Select Photos for the Gallery")
        .add_filter("Images", &["jpg", "jpeg", "png", "webp", "gif", "bmp"])
        .pick_files()
        .await;

    picked
        .map(|files| {
            files
                .into_iter()
                .map(|file| file.path().to_path_buf())
                .filter(|path| state::photos::is_image(path))
                .collect()
        })
        .unwrap_or_default()
}

/// Persist a guest book message in the background.
/// rusqlite connections are not Send, so the task opens its own.
async fn save_feedback(db_path: PathBuf, message: String) -> Result<FeedbackMessage, String> {
    tokio::task::spawn_blocking(move || {
        let book = GuestBook::open_at(db_path).map_err(|e| e.to_string())?;
        book.create_feedback(&message).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())?
}

/// Load all guest book messages, newest first, in the background
async fn load_feedbacks(db_path: PathBuf) -> Result<Vec<FeedbackMessage>, String> {
    tokio::task::spawn_blocking(move || {
        let book = GuestBook::open_at(db_path).map_err(|e| e.to_string())?;
        book.all_feedbacks().map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())?
}
