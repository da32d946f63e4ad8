//! Lifecycle of the lightbox: mount, gesture handling, unmount.

use std::sync::Arc;

use crate::error::GalleryError;
use crate::media::{validate, MediaItem};
use crate::ui::host::{Host, ListenerId};
use crate::ui::input::{route, Action, Gesture, Key};
use crate::ui::scene::ElementId;
use crate::ui::state::{NavigationResult, Session};
use crate::ui::sync::{self, FitOutcome, FitRequest};

#[derive(Debug, Clone, Default)]
pub struct ViewerOptions {
    pub title: Option<String>,
    pub images: Vec<MediaItem>,
}

pub struct Viewer {
    title: Option<String>,
    items: Arc<[MediaItem]>,
    session: Option<Session>,
    /// Fit requests waiting for the host's next layout pass. They are kept
    /// here rather than on the session so a pass that runs after unmount still
    /// sees (and discards) them.
    pending: Vec<FitRequest>,
    next_element: u64,
}

impl Viewer {
    pub fn new(options: ViewerOptions) -> Self {
        Self {
            title: options.title,
            items: options.images.into(),
            session: None,
            pending: Vec::new(),
            next_element: 1,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn items(&self) -> Arc<[MediaItem]> {
        Arc::clone(&self.items)
    }

    pub fn is_mounted(&self) -> bool {
        self.session.is_some()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.nav.current())
    }

    /// Validate the collection and mount the overlay. Refusals are logged and
    /// leave the host untouched. Returns whether a session is mounted.
    pub fn show<H: Host>(&mut self, host: &mut H) -> bool {
        if self.session.is_some() {
            log::debug!("show: replacing the mounted session");
            self.hide(host);
        }

        if let Err(err) = validate(&self.items) {
            match err {
                GalleryError::EmptyCollection => log::warn!("gallery: {}", err),
                GalleryError::UnsupportedMultiVideo => log::error!("gallery: {}", err),
            }
            return false;
        }

        let overlay = host.attach_overlay(sync::build_overlay(&self.items));
        let listener = host.add_key_listener();
        self.session = Some(Session::new(
            Arc::clone(&self.items),
            self.title.clone(),
            overlay,
            listener,
        ));
        self.render(host);

        log::info!("gallery shown with {} item(s)", self.items.len());
        true
    }

    /// Remove the keyboard listener and the overlay, and drop the session.
    pub fn hide<H: Host>(&mut self, host: &mut H) {
        let Some(session) = self.session.take() else {
            log::debug!("hide: gallery is not shown");
            return;
        };
        host.remove_key_listener(session.listener);
        if !host.remove_overlay(session.overlay) {
            log::warn!("hide: overlay {:?} was already detached", session.overlay);
        }
        log::info!("gallery hidden");
    }

    pub fn handle<H: Host>(&mut self, host: &mut H, gesture: Gesture) -> Action {
        let Some(session) = self.session.as_mut() else {
            return Action::Ignore;
        };

        let action = route(gesture, session.nav.current());
        match action {
            Action::Navigate(target) => match session.nav.set_index(target) {
                NavigationResult::Moved { from, to } => {
                    log::debug!("[nav] move {} -> {}", from, to);
                    self.render(host);
                }
                NavigationResult::Ignored => {
                    log::debug!("[nav] target {} out of range, ignored", target);
                }
            },
            Action::Dismiss => self.hide(host),
            Action::Ignore => {}
        }
        action
    }

    /// Keyboard delivery from the host. Only the listener registered by the
    /// mounted session is honoured.
    pub fn on_key<H: Host>(&mut self, host: &mut H, listener: ListenerId, key: Key) -> Action {
        let registered = self
            .session
            .as_ref()
            .is_some_and(|session| session.listener == listener);
        if !registered {
            return Action::Ignore;
        }
        self.handle(host, Gesture::Key(key))
    }

    /// Post-layout hook: size the attached main element now that the host
    /// can measure it.
    pub fn after_layout<H: Host>(&mut self, host: &mut H) {
        for request in std::mem::take(&mut self.pending) {
            match sync::apply_fit(host, &request) {
                FitOutcome::Applied(fit) => {
                    log::debug!("[fit] {:?} -> {:?}", request.element, fit);
                }
                FitOutcome::Stale => {
                    log::debug!("[fit] {:?} no longer attached, dropped", request.element);
                }
                FitOutcome::NotMeasured => self.pending.push(request),
            }
        }
    }

    /// The host's viewport changed size; measure the current element again.
    pub fn relayout<H: Host>(&mut self, host: &mut H) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(element) = session.main else {
            return;
        };
        self.pending.push(FitRequest {
            overlay: session.overlay,
            element,
            ratio: session.current_item().aspect_ratio(),
        });
        host.request_layout();
    }

    fn render<H: Host>(&mut self, host: &mut H) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let element = ElementId(self.next_element);
        self.next_element += 1;
        if let Some(request) = sync::render(session, element, host) {
            self.pending.push(request);
        }
    }
}
