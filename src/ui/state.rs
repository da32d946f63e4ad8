use std::sync::Arc;

use crate::media::MediaItem;
use crate::ui::host::{ListenerId, OverlayId};
use crate::ui::scene::ElementId;

// ---------------------------------------------------------------------------
// Navigation state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationResult {
    /// The index was set; the display has to be re-rendered.
    Moved { from: usize, to: usize },
    /// Target outside `[0, len)`; nothing changed.
    Ignored,
}

/// Clamped (non-wrapping) position within a collection of `len` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    current: usize,
    len: usize,
}

impl Navigation {
    pub fn new(len: usize) -> Self {
        Self { current: 0, len }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.len
    }

    pub fn set_index(&mut self, target: i64) -> NavigationResult {
        if target < 0 || target >= self.len as i64 {
            return NavigationResult::Ignored;
        }
        let from = self.current;
        self.current = target as usize;
        NavigationResult::Moved {
            from,
            to: self.current,
        }
    }
}

// ---------------------------------------------------------------------------
// Session (one per mount)
// ---------------------------------------------------------------------------

pub struct Session {
    /// Shared read-only with the viewer options and the asset loader.
    pub items: Arc<[MediaItem]>,
    pub title: Option<String>,
    pub nav: Navigation,
    pub overlay: OverlayId,
    pub listener: ListenerId,
    /// Main element attached by the last render.
    pub main: Option<ElementId>,
}

impl Session {
    pub fn new(
        items: Arc<[MediaItem]>,
        title: Option<String>,
        overlay: OverlayId,
        listener: ListenerId,
    ) -> Self {
        let nav = Navigation::new(items.len());
        Self {
            items,
            title,
            nav,
            overlay,
            listener,
            main: None,
        }
    }

    pub fn is_single(&self) -> bool {
        self.items.len() <= 1
    }

    pub fn current_item(&self) -> &MediaItem {
        &self.items[self.nav.current()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_range_targets_move() {
        let mut nav = Navigation::new(3);
        assert_eq!(nav.set_index(2), NavigationResult::Moved { from: 0, to: 2 });
        assert_eq!(nav.current(), 2);
        assert_eq!(nav.set_index(2), NavigationResult::Moved { from: 2, to: 2 });
        assert_eq!(nav.set_index(0), NavigationResult::Moved { from: 2, to: 0 });
    }

    #[test]
    fn out_of_range_targets_are_ignored_without_wrapping() {
        let mut nav = Navigation::new(3);
        assert_eq!(nav.set_index(-1), NavigationResult::Ignored);
        assert_eq!(nav.current(), 0);
        nav.set_index(2);
        assert_eq!(nav.set_index(3), NavigationResult::Ignored);
        assert_eq!(nav.set_index(i64::MAX), NavigationResult::Ignored);
        assert_eq!(nav.current(), 2);
    }

    #[test]
    fn boundaries() {
        let mut nav = Navigation::new(2);
        assert!(nav.is_first());
        assert!(!nav.is_last());
        nav.set_index(1);
        assert!(!nav.is_first());
        assert!(nav.is_last());
        let single = Navigation::new(1);
        assert!(single.is_first() && single.is_last());
    }
}
