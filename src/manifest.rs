//! TOML description of a gallery: title plus an ordered list of items.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ManifestError;
use crate::media::{MediaItem, MediaKind};
use crate::ui::viewer::ViewerOptions;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    images: Vec<ManifestItem>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestItem {
    src: String,
    #[serde(default)]
    thumb: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
}

/// Relative locations are taken relative to the manifest's directory.
fn resolve(base: &Path, location: &str) -> String {
    let path = Path::new(location);
    if path.is_absolute() || base.as_os_str().is_empty() {
        location.to_string()
    } else {
        base.join(path).to_string_lossy().into_owned()
    }
}

pub fn parse(text: &str, base: &Path) -> Result<ViewerOptions, ManifestError> {
    let manifest: Manifest = toml::from_str(text)?;
    let images = manifest
        .images
        .into_iter()
        .map(|entry| MediaItem {
            src: resolve(base, &entry.src),
            thumb_src: entry.thumb.as_deref().map(|t| resolve(base, t)),
            kind: entry.kind.as_deref().map(MediaKind::from_tag),
            caption: entry.caption,
            width: entry.width.unwrap_or(0),
            height: entry.height.unwrap_or(0),
        })
        .collect();
    Ok(ViewerOptions {
        title: manifest.title,
        images,
    })
}

pub fn load(path: &Path) -> Result<ViewerOptions, ManifestError> {
    let text = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or(Path::new(""));
    let options = parse(&text, base)?;
    log::info!(
        "Loaded manifest {} ({} items)",
        path.display(),
        options.images.len()
    );
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
title = "Holiday"

[[images]]
src = "a.jpg"
thumb = "thumbs/a.jpg"
caption = "Beach"
width = 100
height = 50

[[images]]
src = "/abs/b.jpg"
type = "Image"
"#;

    #[test]
    fn parses_items_and_resolves_paths() {
        let options = parse(SAMPLE, Path::new("/gallery")).expect("manifest should parse");
        assert_eq!(options.title.as_deref(), Some("Holiday"));
        assert_eq!(options.images.len(), 2);

        let a = &options.images[0];
        assert_eq!(a.src, "/gallery/a.jpg");
        assert_eq!(a.thumb_src.as_deref(), Some("/gallery/thumbs/a.jpg"));
        assert_eq!(a.caption.as_deref(), Some("Beach"));
        assert_eq!((a.width, a.height), (100, 50));
        assert_eq!(a.kind, None);

        let b = &options.images[1];
        assert_eq!(b.src, "/abs/b.jpg");
        assert_eq!(b.kind, Some(MediaKind::Image));
        assert_eq!((b.width, b.height), (0, 0));
    }

    #[test]
    fn explicit_video_type_is_honoured() {
        let options = parse("[[images]]\nsrc = \"still.jpg\"\ntype = \"VIDEO\"\n", Path::new(""))
            .expect("manifest should parse");
        assert_eq!(options.images[0].src, "still.jpg");
        assert!(options.images[0].is_video());
    }

    #[test]
    fn empty_manifest_yields_defaults() {
        let options = parse("", Path::new("")).expect("empty manifest is valid");
        assert!(options.title.is_none());
        assert!(options.images.is_empty());
    }

    #[test]
    fn malformed_manifest_is_a_parse_error() {
        let err = parse("[[images]]\ncaption = \"no src\"\n", Path::new("")).unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
        let err = parse("title = \"x\"\nbogus = 1\n", Path::new("")).unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.toml");
        fs::write(&path, SAMPLE).unwrap();
        let options = load(&path).expect("manifest should load");
        assert_eq!(
            options.images[0].src,
            dir.path().join("a.jpg").to_string_lossy()
        );
        let missing = load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, ManifestError::Io(_)));
    }
}
