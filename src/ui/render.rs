use crate::loader::{CacheState, DecodedImage};
use crate::ui::layout::{self, OverlayLayout, Rect};
use crate::ui::scene::{Display, MainElement, Overlay, Surface, Visibility};

// Constants
const BACKDROP: (u8, u8, u8, u8) = (12, 12, 12, 235);
const BG_COLOR: [u8; 3] = [31, 31, 31];
const CONTROL: (u8, u8, u8, u8) = (230, 230, 230, 255);
const ACTIVE: (u8, u8, u8, u8) = (255, 196, 0, 255);
const DIM: (u8, u8, u8, u8) = (150, 150, 150, 255);
const ERROR: (u8, u8, u8, u8) = (255, 80, 80, 255);

// 5x7 bitmap font covering ASCII 32..127. Each glyph is 5 columns x 7 rows
// packed into 5 bytes (one byte per column, LSB = top row).
static FONT_5X7: [[u8; 5]; 96] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], [0x00, 0x00, 0x5F, 0x00, 0x00], [0x00, 0x07, 0x00, 0x07, 0x00],
    [0x14, 0x7F, 0x14, 0x7F, 0x14], [0x24, 0x2A, 0x7F, 0x2A, 0x12], [0x23, 0x13, 0x08, 0x64, 0x62],
    [0x36, 0x49, 0x55, 0x22, 0x50], [0x00, 0x05, 0x03, 0x00, 0x00], [0x00, 0x1C, 0x22, 0x41, 0x00],
    [0x00, 0x41, 0x22, 0x1C, 0x00], [0x14, 0x08, 0x3E, 0x08, 0x14], [0x08, 0x08, 0x3E, 0x08, 0x08],
    [0x00, 0x50, 0x30, 0x00, 0x00], [0x08, 0x08, 0x08, 0x08, 0x08], [0x00, 0x60, 0x60, 0x00, 0x00],
    [0x20, 0x10, 0x08, 0x04, 0x02], [0x3E, 0x51, 0x49, 0x45, 0x3E], [0x00, 0x42, 0x7F, 0x40, 0x00],
    [0x42, 0x61, 0x51, 0x49, 0x46], [0x21, 0x41, 0x45, 0x4B, 0x31], [0x18, 0x14, 0x12, 0x7F, 0x10],
    [0x27, 0x45, 0x45, 0x45, 0x39], [0x3C, 0x4A, 0x49, 0x49, 0x30], [0x01, 0x71, 0x09, 0x05, 0x03],
    [0x36, 0x49, 0x49, 0x49, 0x36], [0x06, 0x49, 0x49, 0x29, 0x1E], [0x00, 0x36, 0x36, 0x00, 0x00],
    [0x00, 0x56, 0x36, 0x00, 0x00], [0x08, 0x14, 0x22, 0x41, 0x00], [0x14, 0x14, 0x14, 0x14, 0x14],
    [0x00, 0x41, 0x22, 0x14, 0x08], [0x02, 0x01, 0x51, 0x09, 0x06], [0x3E, 0x41, 0x5D, 0x55, 0x1E],
    [0x7E, 0x11, 0x11, 0x11, 0x7E], [0x7F, 0x49, 0x49, 0x49, 0x36], [0x3E, 0x41, 0x41, 0x41, 0x22],
    [0x7F, 0x41, 0x41, 0x22, 0x1C], [0x7F, 0x49, 0x49, 0x49, 0x41], [0x7F, 0x09, 0x09, 0x09, 0x01],
    [0x3E, 0x41, 0x49, 0x49, 0x7A], [0x7F, 0x08, 0x08, 0x08, 0x7F], [0x00, 0x41, 0x7F, 0x41, 0x00],
    [0x20, 0x40, 0x41, 0x3F, 0x01], [0x7F, 0x08, 0x14, 0x22, 0x41], [0x7F, 0x40, 0x40, 0x40, 0x40],
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], [0x7F, 0x04, 0x08, 0x10, 0x7F], [0x3E, 0x41, 0x41, 0x41, 0x3E],
    [0x7F, 0x09, 0x09, 0x09, 0x06], [0x3E, 0x41, 0x51, 0x21, 0x5E], [0x7F, 0x09, 0x19, 0x29, 0x46],
    [0x46, 0x49, 0x49, 0x49, 0x31], [0x01, 0x01, 0x7F, 0x01, 0x01], [0x3F, 0x40, 0x40, 0x40, 0x3F],
    [0x1F, 0x20, 0x40, 0x20, 0x1F], [0x3F, 0x40, 0x38, 0x40, 0x3F], [0x63, 0x14, 0x08, 0x14, 0x63],
    [0x07, 0x08, 0x70, 0x08, 0x07], [0x61, 0x51, 0x49, 0x45, 0x43], [0x00, 0x7F, 0x41, 0x41, 0x00],
    [0x02, 0x04, 0x08, 0x10, 0x20], [0x00, 0x41, 0x41, 0x7F, 0x00], [0x04, 0x02, 0x01, 0x02, 0x04],
    [0x40, 0x40, 0x40, 0x40, 0x40], [0x00, 0x01, 0x02, 0x04, 0x00], [0x20, 0x54, 0x54, 0x54, 0x78],
    [0x7F, 0x48, 0x44, 0x44, 0x38], [0x38, 0x44, 0x44, 0x44, 0x20], [0x38, 0x44, 0x44, 0x48, 0x7F],
    [0x38, 0x54, 0x54, 0x54, 0x18], [0x08, 0x7E, 0x09, 0x01, 0x02], [0x0C, 0x52, 0x52, 0x52, 0x3E],
    [0x7F, 0x08, 0x04, 0x04, 0x78], [0x00, 0x44, 0x7D, 0x40, 0x00], [0x20, 0x40, 0x44, 0x3D, 0x00],
    [0x7F, 0x10, 0x28, 0x44, 0x00], [0x00, 0x41, 0x7F, 0x40, 0x00], [0x7C, 0x04, 0x18, 0x04, 0x78],
    [0x7C, 0x08, 0x04, 0x04, 0x78], [0x38, 0x44, 0x44, 0x44, 0x38], [0x7C, 0x14, 0x14, 0x14, 0x08],
    [0x08, 0x14, 0x14, 0x18, 0x7C], [0x7C, 0x08, 0x04, 0x04, 0x08], [0x48, 0x54, 0x54, 0x54, 0x20],
    [0x04, 0x3F, 0x44, 0x40, 0x20], [0x3C, 0x40, 0x40, 0x20, 0x7C], [0x1C, 0x20, 0x40, 0x20, 0x1C],
    [0x3C, 0x40, 0x30, 0x40, 0x3C], [0x44, 0x28, 0x10, 0x28, 0x44], [0x0C, 0x50, 0x50, 0x50, 0x3C],
    [0x44, 0x64, 0x54, 0x4C, 0x44], [0x00, 0x08, 0x36, 0x41, 0x00], [0x00, 0x00, 0x7F, 0x00, 0x00],
    [0x00, 0x41, 0x36, 0x08, 0x00], [0x10, 0x08, 0x08, 0x10, 0x08], [0x00, 0x00, 0x00, 0x00, 0x00],
];

/// Pack RGB into softbuffer u32 format: 0x00RRGGBB.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

fn unpack_rgb(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

fn blend(dst: u32, color: (u8, u8, u8, u8)) -> u32 {
    let a = color.3 as u32;
    let (dr, dg, db) = unpack_rgb(dst);
    let r = ((color.0 as u32 * a + dr as u32 * (255 - a)) / 255) as u8;
    let g = ((color.1 as u32 * a + dg as u32 * (255 - a)) / 255) as u8;
    let b = ((color.2 as u32 * a + db as u32 * (255 - a)) / 255) as u8;
    rgb(r, g, b)
}

fn draw_char(
    buf: &mut [u32],
    stride: u32,
    buf_h: u32,
    ch: char,
    px: i32,
    py: i32,
    scale: u32,
    color: (u8, u8, u8, u8),
) {
    let idx = (ch as u32).wrapping_sub(32) as usize;
    let Some(glyph) = FONT_5X7.get(idx) else { return };
    for col in 0..5u32 {
        let bits = glyph[col as usize];
        for row in 0..7u32 {
            if bits & (1 << row) == 0 {
                continue;
            }
            let x = px + (col * scale) as i32;
            let y = py + (row * scale) as i32;
            fill_rect(buf, stride, buf_h, x, y, scale, scale, color);
        }
    }
}

pub fn text_width(text: &str, scale: u32) -> i32 {
    (text.chars().count() as u32 * 6 * scale) as i32
}

/// Draw a string. Returns the x position after the last character.
pub fn draw_text(
    buf: &mut [u32],
    stride: u32,
    buf_h: u32,
    text: &str,
    px: i32,
    py: i32,
    scale: u32,
    color: (u8, u8, u8, u8),
) -> i32 {
    let mut x = px;
    for ch in text.chars() {
        draw_char(buf, stride, buf_h, ch, x, py, scale, color);
        x += (6 * scale) as i32; // 5 pixels + 1 spacing
    }
    x
}

/// Draw `text` centered in `r`, cut to the characters that fit.
fn draw_text_in(
    buf: &mut [u32],
    stride: u32,
    buf_h: u32,
    text: &str,
    r: Rect,
    scale: u32,
    color: (u8, u8, u8, u8),
) {
    let max_chars = (r.w / (6 * scale) as f32).floor().max(0.0) as usize;
    let shown: String = text.chars().take(max_chars).collect();
    let x = r.x as i32 + (r.w as i32 - text_width(&shown, scale)) / 2;
    let y = r.y as i32 + (r.h as i32 - (7 * scale) as i32) / 2;
    draw_text(buf, stride, buf_h, &shown, x, y, scale, color);
}

/// Fill a rectangle with a color (with alpha blending).
pub fn fill_rect(
    buf: &mut [u32],
    stride: u32,
    buf_h: u32,
    rx: i32,
    ry: i32,
    rw: u32,
    rh: u32,
    color: (u8, u8, u8, u8),
) {
    let y0 = ry.max(0) as u32;
    let x0 = rx.max(0) as u32;
    let y1 = ((ry + rh as i32).max(0) as u32).min(buf_h);
    let x1 = ((rx + rw as i32).max(0) as u32).min(stride);
    for y in y0..y1 {
        let line = (y * stride) as usize;
        for x in x0..x1 {
            let off = line + x as usize;
            buf[off] = if color.3 == 255 {
                rgb(color.0, color.1, color.2)
            } else {
                blend(buf[off], color)
            };
        }
    }
}

fn fill(buf: &mut [u32], stride: u32, buf_h: u32, r: Rect, color: (u8, u8, u8, u8)) {
    fill_rect(buf, stride, buf_h, r.x as i32, r.y as i32, r.w as u32, r.h as u32, color);
}

fn stroke(buf: &mut [u32], stride: u32, buf_h: u32, r: Rect, width: u32, color: (u8, u8, u8, u8)) {
    let (x, y, w, h) = (r.x as i32, r.y as i32, r.w as u32, r.h as u32);
    let t = width as i32;
    fill_rect(buf, stride, buf_h, x - t, y - t, w + 2 * width, width, color);
    fill_rect(buf, stride, buf_h, x - t, y + h as i32, w + 2 * width, width, color);
    fill_rect(buf, stride, buf_h, x - t, y, width, h, color);
    fill_rect(buf, stride, buf_h, x + w as i32, y, width, h, color);
}

/// Nearest-neighbour blit of an RGBA image into `dst_rect`, stretched to it.
pub fn blit_scaled(dst: &mut [u32], dst_w: u32, dst_h: u32, img: &DecodedImage, dst_rect: Rect) {
    if img.width == 0 || img.height == 0 || dst_rect.w < 1.0 || dst_rect.h < 1.0 {
        return;
    }
    let sx_scale = img.width as f32 / dst_rect.w;
    let sy_scale = img.height as f32 / dst_rect.h;

    let dx_start = dst_rect.x.max(0.0) as u32;
    let dy_start = dst_rect.y.max(0.0) as u32;
    let dx_end = ((dst_rect.x + dst_rect.w).ceil().max(0.0) as u32).min(dst_w);
    let dy_end = ((dst_rect.y + dst_rect.h).ceil().max(0.0) as u32).min(dst_h);

    for dy in dy_start..dy_end {
        let sy = ((dy as f32 - dst_rect.y) * sy_scale) as u32;
        if sy >= img.height {
            continue;
        }
        for dx in dx_start..dx_end {
            let sx = ((dx as f32 - dst_rect.x) * sx_scale) as u32;
            if sx >= img.width {
                continue;
            }
            let si = (sy as usize * img.width as usize + sx as usize) * 4;
            let di = dy as usize * dst_w as usize + dx as usize;
            let px = &img.rgba_bytes[si..si + 4];
            dst[di] = match px[3] {
                255 => rgb(px[0], px[1], px[2]),
                0 => dst[di],
                a => blend(dst[di], (px[0], px[1], px[2], a)),
            };
        }
    }
}

/// Largest rect with the image's ratio that fits inside `r`, centered.
fn contain(r: Rect, img_w: u32, img_h: u32) -> Rect {
    let scale = (r.w / img_w as f32).min(r.h / img_h as f32);
    let (w, h) = (img_w as f32 * scale, img_h as f32 * scale);
    Rect::new(r.x + (r.w - w) / 2.0, r.y + (r.h - h) / 2.0, w, h)
}

/// Ratio used to size the main element: decoded pixels when available, the
/// item's natural dimensions otherwise.
pub fn media_ratio(cache: &CacheState, main: &MainElement, natural: Option<f32>) -> f32 {
    match cache.get(main.index) {
        Some(img) if img.height > 0 => img.width as f32 / img.height as f32,
        _ => natural.unwrap_or(1.0),
    }
}

// ---------------------------------------------------------------------------
// Overlay painting
// ---------------------------------------------------------------------------

pub fn paint_overlay(
    frame: &mut [u32],
    fb_w: u32,
    fb_h: u32,
    overlay: &Overlay,
    layout: &OverlayLayout,
    media: Option<Rect>,
    cache: &CacheState,
) {
    frame.fill(rgb(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2]));
    fill(frame, fb_w, fb_h, layout.main_region, BACKDROP);

    if let Some(ref main) = overlay.main {
        draw_text_in(frame, fb_w, fb_h, &main.label, layout.label_bar, 2, DIM);
        paint_main(frame, fb_w, fb_h, main, layout.media_slot, media, cache);
    }

    if overlay.controls.previous == Visibility::Visible {
        draw_text_in(frame, fb_w, fb_h, "<", layout.prev_arrow, 6, CONTROL);
    }
    if overlay.controls.next == Display::Shown {
        draw_text_in(frame, fb_w, fb_h, ">", layout.next_arrow, 6, CONTROL);
    }
    draw_text_in(frame, fb_w, fb_h, "X", layout.close_button, 4, CONTROL);

    if let Some(strip) = layout.thumb_strip {
        fill(frame, fb_w, fb_h, strip, (0, 0, 0, 255));
        for (thumb, rect) in overlay.thumbnails.iter().zip(&layout.thumbs) {
            fill(frame, fb_w, fb_h, *rect, (40, 40, 40, 255));
            match cache.get_thumbnail(thumb.index) {
                Some(img) => {
                    let fitted = contain(*rect, img.width, img.height);
                    blit_scaled(frame, fb_w, fb_h, &img, fitted);
                }
                None => draw_text_in(frame, fb_w, fb_h, "...", *rect, 2, DIM),
            }
            if thumb.active {
                stroke(frame, fb_w, fb_h, *rect, 3, ACTIVE);
            }
        }
    }
}

fn paint_main(
    frame: &mut [u32],
    fb_w: u32,
    fb_h: u32,
    main: &MainElement,
    slot: Rect,
    media: Option<Rect>,
    cache: &CacheState,
) {
    // Not fitted yet: nothing to place.
    let Some(rect) = media else { return };

    match main.surface {
        Surface::Video(flags) => {
            fill(frame, fb_w, fb_h, rect, (0, 0, 0, 255));
            let name = main.src.rsplit(['/', '\\']).next().unwrap_or(&main.src);
            let mut state = vec!["video"];
            if flags.autoplay {
                state.push("autoplay");
            }
            if flags.muted {
                state.push("muted");
            }
            if flags.looping {
                state.push("loop");
            }
            let top = Rect::new(rect.x, rect.y, rect.w, rect.h / 2.0);
            let bottom = Rect::new(rect.x, rect.y + rect.h / 2.0, rect.w, rect.h / 2.0);
            draw_text_in(frame, fb_w, fb_h, name, top, 2, CONTROL);
            draw_text_in(frame, fb_w, fb_h, &state.join(" | "), bottom, 2, DIM);
        }
        Surface::Image => {
            if let Some(img) = cache.get(main.index) {
                blit_scaled(frame, fb_w, fb_h, &img, rect);
            } else if let Some(err) = cache.errors.get(&main.index) {
                let text = format!("Could not load: {}", err);
                draw_text_in(frame, fb_w, fb_h, &text, slot, 2, ERROR);
            } else {
                draw_text_in(frame, fb_w, fb_h, "Loading...", slot, 2, CONTROL);
            }
        }
    }
}

/// Layout plus the fitted media rect for the overlay's main element.
pub fn layout_with_media(
    fb_w: u32,
    fb_h: u32,
    overlay: &Overlay,
    cache: &CacheState,
    natural: Option<f32>,
) -> (OverlayLayout, Option<Rect>) {
    let layout = layout::compute(fb_w, fb_h, overlay);
    let media = overlay.main.as_ref().and_then(|main| {
        let ratio = media_ratio(cache, main, natural);
        layout::media_rect(layout.media_slot, main.fit, ratio)
    });
    (layout, media)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(w: u32, h: u32, px: [u8; 4]) -> DecodedImage {
        DecodedImage {
            rgba_bytes: px.repeat((w * h) as usize),
            width: w,
            height: h,
        }
    }

    #[test]
    fn fill_rect_clips_to_the_buffer() {
        let mut buf = vec![0u32; 4 * 4];
        fill_rect(&mut buf, 4, 4, -2, -2, 4, 4, (255, 0, 0, 255));
        assert_eq!(buf[0], rgb(255, 0, 0));
        assert_eq!(buf[1], rgb(255, 0, 0));
        assert_eq!(buf[2], 0);
        assert_eq!(buf[4 * 2], 0);
    }

    #[test]
    fn blit_stretches_into_the_target_rect() {
        let mut buf = vec![0u32; 8 * 8];
        let img = image(2, 2, [0, 255, 0, 255]);
        blit_scaled(&mut buf, 8, 8, &img, Rect::new(2.0, 2.0, 4.0, 4.0));
        assert_eq!(buf[2 * 8 + 2], rgb(0, 255, 0));
        assert_eq!(buf[5 * 8 + 5], rgb(0, 255, 0));
        assert_eq!(buf[6 * 8 + 6], 0);
        assert_eq!(buf[1 * 8 + 1], 0);
    }

    #[test]
    fn contain_preserves_ratio() {
        let r = contain(Rect::new(0.0, 0.0, 100.0, 100.0), 200, 100);
        assert_eq!((r.w, r.h, r.y), (100.0, 50.0, 25.0));
    }

    #[test]
    fn text_is_clipped_to_its_box() {
        let mut buf = vec![0u32; 20 * 10];
        let white = (255, 255, 255, 255);
        draw_text_in(&mut buf, 20, 10, "WWWWWWWW", Rect::new(0.0, 0.0, 12.0, 10.0), 1, white);
        // Only two glyphs fit; nothing is drawn past x = 12.
        for y in 0..10 {
            for x in 12..20 {
                assert_eq!(buf[y * 20 + x], 0);
            }
        }
    }
}
