use std::num::NonZeroU32;
use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::NamedKey;
use winit::window::{Window, WindowId};
use softbuffer::Surface;

use crate::loader::{SharedState, UserEvent};
use crate::ui::input::Key;
use crate::ui::layout::{OverlayLayout, Rect};
use crate::ui::viewer::Viewer;
use crate::ui::window::WindowHost;

pub mod host;
pub mod input;
pub mod layout;
pub mod render;
pub mod scene;
pub mod state;
pub mod sync;
pub mod viewer;
pub mod window;

fn map_key(key: &winit::keyboard::Key) -> Key {
    match key {
        winit::keyboard::Key::Named(NamedKey::Escape) => Key::Escape,
        winit::keyboard::Key::Named(NamedKey::ArrowRight) => Key::ArrowRight,
        winit::keyboard::Key::Named(NamedKey::ArrowLeft) => Key::ArrowLeft,
        _ => Key::Other,
    }
}

// ---------------------------------------------------------------------------
// Application handler (winit 0.30 style)
// ---------------------------------------------------------------------------

pub struct App {
    pub viewer: Viewer,
    pub host: WindowHost,
    pub shared: SharedState,
    pub window: Option<Arc<Window>>,
    pub context: Option<softbuffer::Context<Arc<Window>>>,
    pub surface: Option<Surface<Arc<Window>, Arc<Window>>>,
    pub mouse_pos: (f64, f64),
}

impl App {
    pub fn new(viewer: Viewer, shared: SharedState) -> Self {
        Self {
            viewer,
            host: WindowHost::new(),
            shared,
            window: None,
            context: None,
            surface: None,
            mouse_pos: (0.0, 0.0),
        }
    }

    fn request_redraw(&self) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    /// Layout of the top overlay, plus where its main element currently sits.
    fn frame_layout(&self) -> Option<(OverlayLayout, Option<Rect>)> {
        let overlay = self.host.top()?;
        let (w, h) = self.host.size();
        let natural = overlay
            .main
            .as_ref()
            .and_then(|main| self.viewer.items().get(main.index).and_then(|i| i.aspect_ratio()));
        let (lock, _) = &*self.shared;
        let cache = lock.lock().unwrap();
        Some(render::layout_with_media(w.max(1), h.max(1), overlay, &cache, natural))
    }

    /// Bookkeeping after the viewer handled a gesture.
    fn after_gesture(&mut self, event_loop: &ActiveEventLoop) {
        if !self.viewer.is_mounted() {
            log::info!("Gallery dismissed, exiting.");
            event_loop.exit();
            return;
        }
        if let Some(idx) = self.viewer.current_index() {
            let (lock, cvar) = &*self.shared;
            lock.lock().unwrap().set_current_idx(idx);
            cvar.notify_all();
        }
        self.request_redraw();
    }

    fn click(&mut self, event_loop: &ActiveEventLoop) {
        let Some((geometry, media)) = self.frame_layout() else { return };
        let Some(overlay) = self.host.top() else { return };
        let (x, y) = (self.mouse_pos.0 as f32, self.mouse_pos.1 as f32);
        let Some(gesture) = layout::hit_test(&geometry, overlay, media, x, y) else {
            return;
        };
        log::debug!("[click] ({:.0}, {:.0}) -> {:?}", x, y, gesture);
        self.viewer.handle(&mut self.host, gesture);
        self.after_gesture(event_loop);
    }

    fn key(&mut self, event_loop: &ActiveEventLoop, key: Key) {
        for listener in self.host.key_listeners() {
            self.viewer.on_key(&mut self.host, listener, key);
        }
        self.after_gesture(event_loop);
    }

    fn redraw(&mut self) {
        if self.host.take_layout_request() {
            self.viewer.after_layout(&mut self.host);
        }
        let Some((geometry, media)) = self.frame_layout() else { return };
        let Some(overlay) = self.host.top() else { return };
        let (fb_w, fb_h) = self.host.size();
        if fb_w == 0 || fb_h == 0 {
            return;
        }
        let Some(ref mut surface) = self.surface else { return };
        match surface.buffer_mut() {
            Ok(mut buffer) => {
                let (lock, _) = &*self.shared;
                let cache = lock.lock().unwrap();
                render::paint_overlay(&mut buffer, fb_w, fb_h, overlay, &geometry, media, &cache);
                drop(cache);
                if let Err(e) = buffer.present() {
                    log::warn!("present failed: {}", e);
                }
            }
            Err(e) => log::warn!("no framebuffer: {}", e),
        }
    }
}

impl ApplicationHandler<UserEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title(self.viewer.title().unwrap_or("lightbox"))
            .with_inner_size(LogicalSize::new(1280u32, 800u32));
        let window = Arc::new(event_loop.create_window(attrs).expect("create window"));
        let context = softbuffer::Context::new(Arc::clone(&window)).expect("create context");
        let mut surface = Surface::new(&context, Arc::clone(&window)).expect("create surface");

        let size = window.inner_size();
        if let (Some(w), Some(h)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            let _ = surface.resize(w, h);
            self.host.resize(size.width, size.height);
        }

        self.window = Some(window);
        self.context = Some(context);
        self.surface = Some(surface);

        if !self.viewer.show(&mut self.host) {
            // Refused collection: nothing was mounted, nothing to show.
            event_loop.exit();
            return;
        }
        self.request_redraw();
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::ImageReady(idx) => {
                if self.viewer.current_index() == Some(idx) {
                    self.request_redraw();
                }
            }
            UserEvent::ThumbnailReady(_) => self.request_redraw(),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.viewer.hide(&mut self.host);
                event_loop.exit();
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                let w = width.max(1);
                let h = height.max(1);
                if let (Some(surface), Some(nw), Some(nh)) =
                    (self.surface.as_mut(), NonZeroU32::new(w), NonZeroU32::new(h))
                {
                    let _ = surface.resize(nw, nh);
                }
                self.host.resize(w, h);
                self.viewer.relayout(&mut self.host);
                self.request_redraw();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    let key = map_key(&event.logical_key);
                    if key != Key::Other {
                        self.key(event_loop, key);
                    }
                }
            }

            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                self.mouse_pos = (x, y);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left && state == ElementState::Pressed {
                    self.click(event_loop);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_navigation_keys_are_mapped() {
        use winit::keyboard::Key as WKey;
        assert_eq!(map_key(&WKey::Named(NamedKey::Escape)), Key::Escape);
        assert_eq!(map_key(&WKey::Named(NamedKey::ArrowRight)), Key::ArrowRight);
        assert_eq!(map_key(&WKey::Named(NamedKey::ArrowLeft)), Key::ArrowLeft);
        assert_eq!(map_key(&WKey::Named(NamedKey::Space)), Key::Other);
        assert_eq!(map_key(&WKey::Character("q".into())), Key::Other);
    }
}
