//! Render tree the viewer builds inside the host.
//!
//! The host owns attached overlays; the viewer only mutates them through
//! [`crate::ui::host::Host::overlay_mut`]. Everything here is plain data so the
//! host can lay it out and paint it however it likes.

use crate::media::MediaKind;

/// Identity of one constructed main element. A new id is issued every time the
/// synchronizer builds a main element, so a deferred measurement can tell
/// whether its target is still the one attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn ratio(&self) -> f32 {
        self.width / self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFlags {
    pub autoplay: bool,
    pub muted: bool,
    pub looping: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Image,
    Video(VideoFlags),
}

impl Surface {
    pub fn for_kind(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => Surface::Image,
            MediaKind::Video => Surface::Video(VideoFlags {
                autoplay: true,
                muted: true,
                looping: true,
            }),
        }
    }
}

/// How the main element is sized inside the media slot. The other axis is
/// derived from the media's own ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fit {
    Height(f32),
    Width(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MainElement {
    pub id: ElementId,
    pub index: usize,
    pub surface: Surface,
    pub src: String,
    /// Accessible label, also used as tooltip text.
    pub label: String,
    /// `None` until the post-layout measurement has run.
    pub fit: Option<Fit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub index: usize,
    pub src: String,
    pub caption: Option<String>,
    pub kind: MediaKind,
    pub active: bool,
}

/// Removes the control from layout flow entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Shown,
    None,
}

/// Hides the control but keeps its space reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub previous: Visibility,
    pub next: Display,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    /// Set for sessions with at most one item; the thumbnail region is absent.
    pub single: bool,
    pub main: Option<MainElement>,
    pub thumbnails: Vec<Thumbnail>,
    pub controls: Controls,
}

impl Overlay {
    pub fn new(single: bool) -> Self {
        Self {
            single,
            main: None,
            thumbnails: Vec::new(),
            controls: Controls {
                previous: Visibility::Hidden,
                next: Display::None,
            },
        }
    }

    pub fn active_thumbnails(&self) -> impl Iterator<Item = usize> + '_ {
        self.thumbnails.iter().filter(|t| t.active).map(|t| t.index)
    }
}
