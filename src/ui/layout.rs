use crate::ui::input::Gesture;
use crate::ui::scene::{Fit, Overlay, Size, Visibility};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const THUMB_STRIP_H: f32 = 120.0;
pub const THUMB_SIZE: f32 = 96.0;
pub const THUMB_GAP: f32 = 10.0;
pub const ZONE_W: f32 = 72.0;
pub const CLOSE_SIZE: f32 = 40.0;
pub const ARROW_W: f32 = 40.0;
pub const ARROW_H: f32 = 64.0;
pub const LABEL_H: f32 = 32.0;
pub const MARGIN: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w && py < self.y + self.h
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    fn centered(&self, w: f32, h: f32) -> Rect {
        Rect::new(self.x + (self.w - w) / 2.0, self.y + (self.h - h) / 2.0, w, h)
    }
}

/// Geometry of an overlay for a given framebuffer size.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    pub main_region: Rect,
    pub left_zone: Rect,
    pub right_zone: Rect,
    pub prev_arrow: Rect,
    pub next_arrow: Rect,
    pub close_button: Rect,
    pub label_bar: Rect,
    pub media_slot: Rect,
    pub thumb_strip: Option<Rect>,
    /// One rect per thumbnail, in item order.
    pub thumbs: Vec<Rect>,
}

pub fn compute(fb_w: u32, fb_h: u32, overlay: &Overlay) -> OverlayLayout {
    let w = fb_w as f32;
    let h = fb_h as f32;
    let strip_h = if overlay.single { 0.0 } else { THUMB_STRIP_H.min(h / 2.0) };

    let main_region = Rect::new(0.0, 0.0, w, h - strip_h);
    let left_zone = Rect::new(0.0, 0.0, ZONE_W, main_region.h);
    let right_zone = Rect::new(w - ZONE_W, 0.0, ZONE_W, main_region.h);
    let close_button = Rect::new(
        right_zone.x + (ZONE_W - CLOSE_SIZE) / 2.0,
        MARGIN,
        CLOSE_SIZE,
        CLOSE_SIZE,
    );
    let label_bar = Rect::new(ZONE_W, 0.0, w - 2.0 * ZONE_W, LABEL_H);
    let media_slot = Rect::new(
        ZONE_W,
        LABEL_H,
        w - 2.0 * ZONE_W,
        main_region.h - LABEL_H - MARGIN,
    );

    let (thumb_strip, thumbs) = if overlay.single {
        (None, Vec::new())
    } else {
        let strip = Rect::new(0.0, main_region.h, w, strip_h);
        let active = overlay.active_thumbnails().next().unwrap_or(0);
        (Some(strip), thumb_rects(strip, overlay.thumbnails.len(), active))
    };

    OverlayLayout {
        prev_arrow: left_zone.centered(ARROW_W, ARROW_H),
        next_arrow: right_zone.centered(ARROW_W, ARROW_H),
        main_region,
        left_zone,
        right_zone,
        close_button,
        label_bar,
        media_slot,
        thumb_strip,
        thumbs,
    }
}

/// Thumbnails are centered in the strip; when they overflow, the strip is
/// scrolled so the active one sits as close to the middle as possible.
fn thumb_rects(strip: Rect, count: usize, active: usize) -> Vec<Rect> {
    let size = THUMB_SIZE.min(strip.h - MARGIN).max(1.0);
    let step = size + THUMB_GAP;
    let total = count as f32 * step - THUMB_GAP;
    let x0 = if total <= strip.w {
        (strip.w - total) / 2.0
    } else {
        let centered = strip.w / 2.0 - (active as f32 * step + size / 2.0);
        centered.clamp(strip.w - total, 0.0)
    };
    let y = strip.y + (strip.h - size) / 2.0;
    (0..count)
        .map(|i| Rect::new(strip.x + x0 + i as f32 * step, y, size, size))
        .collect()
}

/// Rect of the main element inside the slot, once it has been fitted.
/// `ratio` is the media's width/height.
pub fn media_rect(slot: Rect, fit: Option<Fit>, ratio: f32) -> Option<Rect> {
    let ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };
    let (w, h) = match fit? {
        Fit::Height(h) => (h * ratio, h),
        Fit::Width(w) => (w, w / ratio),
    };
    Some(slot.centered(w, h))
}

pub fn hit_test(
    layout: &OverlayLayout,
    overlay: &Overlay,
    media: Option<Rect>,
    x: f32,
    y: f32,
) -> Option<Gesture> {
    if layout.close_button.contains(x, y) {
        return Some(Gesture::Close);
    }
    if layout.right_zone.contains(x, y) {
        return Some(Gesture::Next);
    }
    if layout.left_zone.contains(x, y) {
        // A hidden control does not receive clicks.
        return match overlay.controls.previous {
            Visibility::Visible => Some(Gesture::Previous),
            Visibility::Hidden => None,
        };
    }
    if let Some(i) = layout.thumbs.iter().position(|r| r.contains(x, y)) {
        return overlay.thumbnails.get(i).map(|t| Gesture::Thumbnail(t.index));
    }
    if media.is_some_and(|r| r.contains(x, y)) {
        return Some(Gesture::Media);
    }
    if layout.media_slot.contains(x, y) {
        return Some(Gesture::Backdrop);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaItem;
    use crate::ui::state::Navigation;
    use crate::ui::sync::{build_overlay, controls_for};

    fn gallery(n: usize) -> Overlay {
        let items: Vec<MediaItem> = (0..n).map(|i| MediaItem::new(format!("{i}.jpg"))).collect();
        let mut overlay = build_overlay(&items);
        if let Some(t) = overlay.thumbnails.first_mut() {
            t.active = true;
        }
        overlay.controls = controls_for(&Navigation::new(n));
        overlay
    }

    #[test]
    fn single_overlay_has_no_strip() {
        let layout = compute(800, 600, &gallery(1));
        assert!(layout.thumb_strip.is_none());
        assert!(layout.thumbs.is_empty());
        assert_eq!(layout.main_region.h, 600.0);
    }

    #[test]
    fn media_slot_sits_between_the_control_zones() {
        let layout = compute(800, 600, &gallery(3));
        assert_eq!(layout.media_slot.x, ZONE_W);
        assert_eq!(layout.media_slot.w, 800.0 - 2.0 * ZONE_W);
        assert_eq!(layout.thumbs.len(), 3);
        assert!(layout.thumbs.iter().all(|t| t.y >= layout.main_region.h));
    }

    #[test]
    fn overflowing_strip_keeps_the_active_thumbnail_visible() {
        let mut overlay = gallery(40);
        overlay.thumbnails[0].active = false;
        overlay.thumbnails[39].active = true;
        let layout = compute(800, 600, &overlay);
        let last = layout.thumbs[39];
        assert!(last.x >= 0.0 && last.x + last.w <= 800.0);
    }

    #[test]
    fn media_rect_respects_fit() {
        let slot = Rect::new(0.0, 0.0, 800.0, 400.0);
        let r = media_rect(slot, Some(Fit::Height(400.0)), 1.0).unwrap();
        assert_eq!((r.x, r.w, r.h), (200.0, 400.0, 400.0));
        let r = media_rect(slot, Some(Fit::Width(800.0)), 4.0).unwrap();
        assert_eq!((r.y, r.w, r.h), (100.0, 800.0, 200.0));
        assert!(media_rect(slot, None, 1.0).is_none());
    }

    #[test]
    fn clicks_map_to_gestures() {
        let mut overlay = gallery(3);
        let layout = compute(800, 600, &overlay);
        let media = media_rect(layout.media_slot, Some(Fit::Height(100.0)), 1.0);

        let c = layout.close_button;
        assert_eq!(hit_test(&layout, &overlay, media, c.x + 1.0, c.y + 1.0), Some(Gesture::Close));
        let n = layout.next_arrow;
        assert_eq!(hit_test(&layout, &overlay, media, n.x + 1.0, n.y + 1.0), Some(Gesture::Next));
        let p = layout.prev_arrow;
        assert_eq!(hit_test(&layout, &overlay, media, p.x + 1.0, p.y + 1.0), None);
        let mut nav = Navigation::new(3);
        nav.set_index(1);
        overlay.controls = controls_for(&nav);
        assert_eq!(
            hit_test(&layout, &overlay, media, p.x + 1.0, p.y + 1.0),
            Some(Gesture::Previous)
        );

        let t = layout.thumbs[2];
        assert_eq!(
            hit_test(&layout, &overlay, media, t.x + 1.0, t.y + 1.0),
            Some(Gesture::Thumbnail(2))
        );

        let m = media.unwrap();
        assert_eq!(hit_test(&layout, &overlay, media, m.x + 1.0, m.y + 1.0), Some(Gesture::Media));
        let s = layout.media_slot;
        assert_eq!(
            hit_test(&layout, &overlay, media, s.x + 1.0, s.y + 1.0),
            Some(Gesture::Backdrop)
        );
    }
}
