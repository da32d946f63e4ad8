use crate::error::GalleryError;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "wmv", "mpg", "mpeg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Parse an explicit kind tag. Anything other than "video" is an image.
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    /// Infer the kind from the extension of a source location.
    pub fn infer(src: &str) -> Self {
        let path = src.split(['?', '#']).next().unwrap_or(src);
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.contains('/'));
        match ext {
            Some(ext) if VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)) => {
                MediaKind::Video
            }
            _ => MediaKind::Image,
        }
    }
}

/// One entry of the collection handed to the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    pub src: String,
    pub thumb_src: Option<String>,
    /// Explicit kind; `None` means inferred from `src`.
    pub kind: Option<MediaKind>,
    pub caption: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl MediaItem {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            thumb_src: None,
            kind: None,
            caption: None,
            width: 0,
            height: 0,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_kind(mut self, kind: MediaKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn kind(&self) -> MediaKind {
        self.kind.unwrap_or_else(|| MediaKind::infer(&self.src))
    }

    pub fn is_video(&self) -> bool {
        self.kind() == MediaKind::Video
    }

    pub fn thumb(&self) -> &str {
        self.thumb_src.as_deref().unwrap_or(&self.src)
    }

    /// Natural width/height ratio, if both dimensions are known.
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.width as f32 / self.height as f32)
    }
}

/// Check that a collection can be shown: at least one item, and videos only
/// as the sole item.
pub fn validate(items: &[MediaItem]) -> Result<(), GalleryError> {
    if items.is_empty() {
        return Err(GalleryError::EmptyCollection);
    }
    if items.len() > 1 && items.iter().any(MediaItem::is_video) {
        return Err(GalleryError::UnsupportedMultiVideo);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_inferred_from_extension() {
        assert_eq!(MediaKind::infer("clip.mp4"), MediaKind::Video);
        assert_eq!(MediaKind::infer("dir/clip.MPEG"), MediaKind::Video);
        assert_eq!(MediaKind::infer("clip.wmv?t=3"), MediaKind::Video);
        assert_eq!(MediaKind::infer("photo.jpg"), MediaKind::Image);
        assert_eq!(MediaKind::infer("movie.mp4.png"), MediaKind::Image);
        assert_eq!(MediaKind::infer("mp4/readme"), MediaKind::Image);
        assert_eq!(MediaKind::infer("noext"), MediaKind::Image);
    }

    #[test]
    fn explicit_kind_wins_over_extension() {
        let item = MediaItem::new("still.jpg").with_kind(MediaKind::Video);
        assert!(item.is_video());
        let item = MediaItem::new("clip.mp4").with_kind(MediaKind::Image);
        assert!(!item.is_video());
        assert_eq!(MediaKind::from_tag(" Video "), MediaKind::Video);
        assert_eq!(MediaKind::from_tag("picture"), MediaKind::Image);
    }

    #[test]
    fn thumbnail_falls_back_to_src() {
        let mut item = MediaItem::new("a.jpg");
        assert_eq!(item.thumb(), "a.jpg");
        item.thumb_src = Some("a_small.jpg".into());
        assert_eq!(item.thumb(), "a_small.jpg");
    }

    #[test]
    fn unknown_dimensions_have_no_ratio() {
        assert_eq!(MediaItem::new("a.jpg").aspect_ratio(), None);
        assert_eq!(MediaItem::new("a.jpg").with_size(100, 0).aspect_ratio(), None);
        assert_eq!(MediaItem::new("a.jpg").with_size(100, 50).aspect_ratio(), Some(2.0));
    }

    #[test]
    fn validation_rejects_empty_and_mixed_video() {
        assert_eq!(validate(&[]), Err(GalleryError::EmptyCollection));
        let mixed = [MediaItem::new("a.jpg"), MediaItem::new("v.mp4")];
        assert_eq!(validate(&mixed), Err(GalleryError::UnsupportedMultiVideo));
        let two_videos = [MediaItem::new("v.mp4"), MediaItem::new("w.mp4")];
        assert_eq!(validate(&two_videos), Err(GalleryError::UnsupportedMultiVideo));
    }

    #[test]
    fn validation_accepts_images_and_a_lone_video() {
        assert!(validate(&[MediaItem::new("v.mp4")]).is_ok());
        assert!(validate(&[MediaItem::new("a.jpg"), MediaItem::new("b.png")]).is_ok());
    }
}
