use crate::ui::scene::{Overlay, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Capabilities the viewer needs from the environment it is mounted into:
/// a render tree it can attach an overlay to, layout measurement, and a global
/// keyboard-listener registry.
pub trait Host {
    fn attach_overlay(&mut self, overlay: Overlay) -> OverlayId;

    /// Returns false if the overlay was not attached.
    fn remove_overlay(&mut self, id: OverlayId) -> bool;

    fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut Overlay>;

    /// Size of the media slot of an attached overlay. `None` while the overlay
    /// is detached or has not been laid out yet.
    fn media_slot_size(&self, id: OverlayId) -> Option<Size>;

    fn add_key_listener(&mut self) -> ListenerId;

    fn remove_key_listener(&mut self, id: ListenerId);

    /// Ask the host to run a layout pass and then call the viewer's
    /// post-layout hook.
    fn request_layout(&mut self);
}

#[cfg(test)]
pub mod testing {
    use super::*;

    /// In-memory host with a fixed media slot size.
    pub struct HeadlessHost {
        pub overlays: Vec<(OverlayId, Overlay)>,
        pub listeners: Vec<ListenerId>,
        pub slot: Option<Size>,
        pub layout_requests: usize,
        /// Count of every attach/remove call, to assert "no mutation".
        pub mutations: usize,
        next_id: u64,
    }

    impl HeadlessHost {
        pub fn new() -> Self {
            Self {
                overlays: Vec::new(),
                listeners: Vec::new(),
                slot: Some(Size::new(800.0, 600.0)),
                layout_requests: 0,
                mutations: 0,
                next_id: 1,
            }
        }

        pub fn overlay(&self) -> Option<&Overlay> {
            self.overlays.last().map(|(_, o)| o)
        }

        fn next(&mut self) -> u64 {
            let id = self.next_id;
            self.next_id += 1;
            id
        }
    }

    impl Host for HeadlessHost {
        fn attach_overlay(&mut self, overlay: Overlay) -> OverlayId {
            let id = OverlayId(self.next());
            self.overlays.push((id, overlay));
            self.mutations += 1;
            id
        }

        fn remove_overlay(&mut self, id: OverlayId) -> bool {
            let before = self.overlays.len();
            self.overlays.retain(|(oid, _)| *oid != id);
            self.mutations += 1;
            before != self.overlays.len()
        }

        fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
            self.overlays
                .iter_mut()
                .find(|(oid, _)| *oid == id)
                .map(|(_, o)| o)
        }

        fn media_slot_size(&self, id: OverlayId) -> Option<Size> {
            if self.overlays.iter().any(|(oid, _)| *oid == id) {
                self.slot
            } else {
                None
            }
        }

        fn add_key_listener(&mut self) -> ListenerId {
            let id = ListenerId(self.next());
            self.listeners.push(id);
            id
        }

        fn remove_key_listener(&mut self, id: ListenerId) {
            self.listeners.retain(|l| *l != id);
        }

        fn request_layout(&mut self) {
            self.layout_requests += 1;
        }
    }
}
