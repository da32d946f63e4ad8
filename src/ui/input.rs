/// Keys the viewer reacts to. Everything else collapses into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    ArrowRight,
    ArrowLeft,
    Other,
}

impl Key {
    /// Map a DOM-style key name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            "ArrowRight" => Key::ArrowRight,
            "ArrowLeft" => Key::ArrowLeft,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Thumbnail(usize),
    Next,
    Previous,
    Close,
    /// Click inside the media slot but outside the media element.
    Backdrop,
    /// Click on the media element itself.
    Media,
    Key(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Navigate(i64),
    Dismiss,
    Ignore,
}

pub fn route(gesture: Gesture, current: usize) -> Action {
    let current = current as i64;
    match gesture {
        Gesture::Thumbnail(i) => Action::Navigate(i as i64),
        Gesture::Next | Gesture::Key(Key::ArrowRight) => Action::Navigate(current + 1),
        Gesture::Previous | Gesture::Key(Key::ArrowLeft) => Action::Navigate(current - 1),
        Gesture::Close | Gesture::Backdrop | Gesture::Key(Key::Escape) => Action::Dismiss,
        Gesture::Media | Gesture::Key(Key::Other) => Action::Ignore,
    }
}
