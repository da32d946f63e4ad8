use crate::ui::host::{Host, ListenerId, OverlayId};
use crate::ui::layout;
use crate::ui::scene::{Overlay, Size};

/// Host backed by the application window. Overlays are painted in attach
/// order; the last one is on top and receives clicks.
pub struct WindowHost {
    overlays: Vec<(OverlayId, Overlay)>,
    listeners: Vec<ListenerId>,
    size: (u32, u32),
    layout_requested: bool,
    next_id: u64,
}

impl WindowHost {
    pub fn new() -> Self {
        Self {
            overlays: Vec::new(),
            listeners: Vec::new(),
            size: (0, 0),
            layout_requested: false,
            next_id: 1,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn top(&self) -> Option<&Overlay> {
        self.overlays.last().map(|(_, overlay)| overlay)
    }

    pub fn key_listeners(&self) -> Vec<ListenerId> {
        self.listeners.clone()
    }

    /// Whether a layout pass was requested since the last call.
    pub fn take_layout_request(&mut self) -> bool {
        std::mem::take(&mut self.layout_requested)
    }

    fn issue_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Host for WindowHost {
    fn attach_overlay(&mut self, overlay: Overlay) -> OverlayId {
        let id = OverlayId(self.issue_id());
        self.overlays.push((id, overlay));
        id
    }

    fn remove_overlay(&mut self, id: OverlayId) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|(oid, _)| *oid != id);
        before != self.overlays.len()
    }

    fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.overlays
            .iter_mut()
            .find(|(oid, _)| *oid == id)
            .map(|(_, overlay)| overlay)
    }

    fn media_slot_size(&self, id: OverlayId) -> Option<Size> {
        let (w, h) = self.size;
        if w == 0 || h == 0 {
            return None;
        }
        let (_, overlay) = self.overlays.iter().find(|(oid, _)| *oid == id)?;
        Some(layout::compute(w, h, overlay).media_slot.size())
    }

    fn add_key_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.issue_id());
        self.listeners.push(id);
        id
    }

    fn remove_key_listener(&mut self, id: ListenerId) {
        self.listeners.retain(|l| *l != id);
    }

    fn request_layout(&mut self) {
        self.layout_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaItem;
    use crate::ui::input::Key;
    use crate::ui::scene::Fit;
    use crate::ui::viewer::{Viewer, ViewerOptions};

    fn viewer() -> Viewer {
        Viewer::new(ViewerOptions {
            title: Some("T".into()),
            images: vec![
                MediaItem::new("a.jpg").with_size(100, 50),
                MediaItem::new("b.jpg").with_size(50, 100),
            ],
        })
    }

    #[test]
    fn slot_is_unmeasurable_before_the_window_has_a_size() {
        let mut host = WindowHost::new();
        let mut v = viewer();
        v.show(&mut host);
        assert!(host.take_layout_request());
        v.after_layout(&mut host);
        assert_eq!(host.top().unwrap().main.as_ref().unwrap().fit, None);

        host.resize(1000, 700);
        v.after_layout(&mut host);
        let slot = host
            .media_slot_size(OverlayId(1))
            .expect("overlay is attached and sized");
        // a.jpg is 2:1, wider than the slot, so it fits by width.
        assert_eq!(
            host.top().unwrap().main.as_ref().unwrap().fit,
            Some(Fit::Width(slot.width))
        );
    }

    #[test]
    fn escape_through_the_listener_registry_empties_the_window() {
        let mut host = WindowHost::new();
        host.resize(800, 600);
        let mut v = viewer();
        v.show(&mut host);
        assert_eq!(host.key_listeners().len(), 1);
        for listener in host.key_listeners() {
            v.on_key(&mut host, listener, Key::Escape);
        }
        assert!(host.top().is_none());
        assert!(host.key_listeners().is_empty());
        assert!(host.media_slot_size(OverlayId(1)).is_none());
    }
}
