/// Photo modal navigation
///
/// The browser holds an index into the ordered photo sequence and an
/// optional modal session. Opening the modal acquires the session,
/// which suppresses background scrolling; the session releases the
/// scroll lock on every exit path, including teardown, via `Drop`.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::data::Photo;

/// Keyboard bindings routed to the modal. Active only while it is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
    Escape,
    Previous,
    Next,
}

/// Scroll-suppression flag shared between the browser and the view layer
#[derive(Debug, Clone, Default)]
pub struct ScrollLock(Arc<AtomicBool>);

impl ScrollLock {
    pub fn is_locked(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The modal viewing session as an owned resource.
///
/// Holding one means the modal is open and background scroll is locked.
/// Dropping it restores scrolling unconditionally.
#[derive(Debug)]
struct ModalSession {
    lock: Arc<AtomicBool>,
}

impl ModalSession {
    fn acquire(lock: &ScrollLock) -> Self {
        lock.0.store(true, Ordering::Relaxed);
        Self {
            lock: Arc::clone(&lock.0),
        }
    }
}

impl Drop for ModalSession {
    fn drop(&mut self) {
        self.lock.store(false, Ordering::Relaxed);
    }
}

/// Ordered photo sequence with wraparound modal navigation
#[derive(Debug)]
pub struct PhotoBrowser {
    photos: Vec<Photo>,
    current: usize,
    session: Option<ModalSession>,
    scroll: ScrollLock,
}

impl PhotoBrowser {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self {
            photos,
            current: 0,
            session: None,
            scroll: ScrollLock::default(),
        }
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_photo(&self) -> Option<&Photo> {
        self.photos.get(self.current)
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Handle shared by the view layer to decide whether the page
    /// behind the modal may scroll
    pub fn scroll_lock(&self) -> ScrollLock {
        self.scroll.clone()
    }

    /// Open the modal at `index`. Out-of-range indices are ignored.
    pub fn open(&mut self, index: usize) {
        if index >= self.photos.len() {
            return;
        }
        self.current = index;
        if self.session.is_none() {
            self.session = Some(ModalSession::acquire(&self.scroll));
        }
    }

    /// Close the modal. The index is retained for a later reopen.
    pub fn close(&mut self) {
        self.session = None;
    }

    /// Step to the next photo, wrapping past the end.
    /// Valid whether or not the modal is open.
    pub fn next(&mut self) {
        if !self.photos.is_empty() {
            self.current = (self.current + 1) % self.photos.len();
        }
    }

    /// Step to the previous photo, wrapping past the start.
    pub fn previous(&mut self) {
        if !self.photos.is_empty() {
            self.current = (self.current + self.photos.len() - 1) % self.photos.len();
        }
    }

    /// Append photos to the end of the sequence
    pub fn push_photos(&mut self, photos: impl IntoIterator<Item = Photo>) {
        self.photos.extend(photos);
    }

    /// Route a key press. Returns true when the key was consumed;
    /// all bindings are inert while the modal is closed.
    pub fn on_key(&mut self, key: ModalKey) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            ModalKey::Escape => self.close(),
            ModalKey::Previous => self.previous(),
            ModalKey::Next => self.next(),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn photos(count: usize) -> Vec<Photo> {
        (0..count)
            .map(|i| Photo {
                path: PathBuf::from(format!("photo-{i}.jpg")),
                alt: format!("Photo {i}"),
                caption: format!("Caption {i}"),
            })
            .collect()
    }

    #[test]
    fn test_next_cycles_back_to_start() {
        for start in 0..7 {
            let mut browser = PhotoBrowser::new(photos(7));
            browser.open(start);
            for _ in 0..7 {
                browser.next();
            }
            assert_eq!(browser.current_index(), start);
        }
    }

    #[test]
    fn test_previous_cycles_back_to_start() {
        for start in 0..5 {
            let mut browser = PhotoBrowser::new(photos(5));
            browser.open(start);
            for _ in 0..5 {
                browser.previous();
            }
            assert_eq!(browser.current_index(), start);
        }
    }

    #[test]
    fn test_wraparound_at_both_ends() {
        let mut browser = PhotoBrowser::new(photos(3));
        browser.previous();
        assert_eq!(browser.current_index(), 2);
        browser.next();
        assert_eq!(browser.current_index(), 0);
    }

    #[test]
    fn test_navigation_on_empty_sequence_does_not_panic() {
        let mut browser = PhotoBrowser::new(Vec::new());
        browser.next();
        browser.previous();
        browser.open(0);
        assert!(!browser.is_open());
        assert_eq!(browser.current_index(), 0);
    }

    #[test]
    fn test_close_retains_index() {
        let mut browser = PhotoBrowser::new(photos(4));
        browser.open(3);
        browser.close();
        assert!(!browser.is_open());
        assert_eq!(browser.current_index(), 3);
    }

    #[test]
    fn test_keyboard_navigation_scenario() {
        // Open at index 2 of 7, ArrowRight twice, then Escape.
        let mut browser = PhotoBrowser::new(photos(7));
        let lock = browser.scroll_lock();

        browser.open(2);
        assert!(lock.is_locked());

        assert!(browser.on_key(ModalKey::Next));
        assert!(browser.on_key(ModalKey::Next));
        assert_eq!(browser.current_index(), 4);
        assert!(browser.is_open());

        assert!(browser.on_key(ModalKey::Escape));
        assert!(!browser.is_open());
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_keys_are_inert_while_closed() {
        let mut browser = PhotoBrowser::new(photos(7));
        browser.open(2);
        browser.close();

        assert!(!browser.on_key(ModalKey::Next));
        assert!(!browser.on_key(ModalKey::Previous));
        assert_eq!(browser.current_index(), 2);
        assert!(!browser.is_open());
    }

    #[test]
    fn test_scroll_restored_on_teardown() {
        let browser = {
            let mut b = PhotoBrowser::new(photos(2));
            b.open(0);
            b
        };
        let lock = browser.scroll_lock();
        assert!(lock.is_locked());

        // Dropping the browser mid-session must still release the lock.
        drop(browser);
        assert!(!lock.is_locked());
    }

    #[test]
    fn test_push_photos_appends() {
        let mut browser = PhotoBrowser::new(photos(2));
        browser.push_photos(photos(3));
        assert_eq!(browser.len(), 5);
    }
}
