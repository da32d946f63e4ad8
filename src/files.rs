use rayon::prelude::*;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::media::{MediaItem, VIDEO_EXTENSIONS};

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tga", "tiff", "tif", "webp", "ico", "pnm", "pbm",
    "pgm", "ppm", "pam", "dds", "hdr", "exr", "ff", "qoi",
];

pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            IMAGE_EXTENSIONS.contains(&e.as_str()) || VIDEO_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// Expand files and directories into an ordered list of media files.
/// Explicit files keep their command-line order; each directory contributes
/// its entries sorted by path.
pub fn collect_media(paths: &[PathBuf], recursive: bool, follow_links: bool) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for path in paths {
        if !follow_links && is_symlink(path) {
            continue;
        }
        if path.is_dir() {
            scan_dir(path, recursive, follow_links, &mut out);
        } else if path.is_file() && is_media_file(path) {
            out.push(path.clone());
        } else {
            log::warn!("Skipping {}: not a supported media file", path.display());
        }
    }
    out
}

fn scan_dir(dir: &Path, recursive: bool, follow_links: bool, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot read {}: {}", dir.display(), e);
            return;
        }
    };
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in entries.filter_map(|e| e.ok()) {
        let Ok(ft) = entry.file_type() else { continue };
        if ft.is_symlink() && !follow_links {
            continue;
        }
        let p = entry.path();
        if p.is_file() && is_media_file(&p) {
            files.push(p);
        } else if recursive && p.is_dir() {
            subdirs.push(p);
        }
    }

    files.sort();
    if !files.is_empty() {
        log::info!("Scanning {:?}... ({} media files)", dir, files.len());
    }
    out.extend(files);

    if recursive {
        subdirs.sort();
        for sub in subdirs {
            scan_dir(&sub, true, follow_links, out);
        }
    }
}

/// EXIF orientations 5..=8 store the image rotated by 90 degrees.
fn exif_swaps_axes(path: &Path) -> bool {
    let Ok(file) = fs::File::open(path) else { return false };
    let mut reader = BufReader::new(file);
    let Ok(exif) = exif::Reader::new().read_from_container(&mut reader) else {
        return false;
    };
    exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .is_some_and(|o| (5..=8).contains(&o))
}

/// Natural (display) dimensions of an image file. Videos and unreadable files
/// yield `None`.
pub fn probe_dimensions(path: &Path) -> Option<(u32, u32)> {
    let (w, h) = image::image_dimensions(path).ok()?;
    if exif_swaps_axes(path) {
        Some((h, w))
    } else {
        Some((w, h))
    }
}

/// Fill in unknown natural dimensions, probing files in parallel.
pub fn probe_missing_dimensions(items: &mut [MediaItem]) {
    let start = Instant::now();
    items
        .par_iter_mut()
        .filter(|item| (item.width == 0 || item.height == 0) && !item.is_video())
        .for_each(|item| match probe_dimensions(Path::new(&item.src)) {
            Some((w, h)) => {
                item.width = w;
                item.height = h;
            }
            None => log::debug!("No dimensions for {}", item.src),
        });
    log::debug!("Probed dimensions in {:.2}s", start.elapsed().as_secs_f64());
}

pub fn items_from_paths(paths: &[PathBuf]) -> Vec<MediaItem> {
    paths
        .iter()
        .map(|p| MediaItem::new(p.to_string_lossy().into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path, w: u32, h: u32) {
        image::RgbaImage::new(w, h).save(path).unwrap();
    }

    #[test]
    fn recognizes_images_and_videos() {
        assert!(is_media_file(Path::new("a.JPG")));
        assert!(is_media_file(Path::new("clip.mp4")));
        assert!(!is_media_file(Path::new("notes.txt")));
        assert!(!is_media_file(Path::new("README")));
        for ext in VIDEO_EXTENSIONS {
            let name = format!("clip.{}", ext.to_uppercase());
            assert!(is_media_file(Path::new(&name)));
            assert!(MediaItem::new(name).is_video());
        }
    }

    #[test]
    fn directories_are_scanned_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("b.png"), 2, 1);
        write_png(&dir.path().join("a.png"), 1, 2);
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_png(&dir.path().join("sub").join("c.png"), 1, 1);

        let flat = collect_media(&[dir.path().to_path_buf()], false, false);
        let names: Vec<_> = flat.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);

        let deep = collect_media(&[dir.path().to_path_buf()], true, false);
        assert_eq!(deep.len(), 3);
        assert!(deep[2].ends_with("sub/c.png"));
    }

    #[test]
    fn missing_dimensions_are_probed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        write_png(&path, 4, 2);
        let mut items = items_from_paths(&[path, dir.path().join("missing.png")]);
        items.push(MediaItem::new("clip.mp4"));
        probe_missing_dimensions(&mut items);
        assert_eq!((items[0].width, items[0].height), (4, 2));
        assert_eq!((items[1].width, items[1].height), (0, 0));
        assert_eq!((items[2].width, items[2].height), (0, 0));
    }

    #[test]
    fn known_dimensions_are_kept() {
        let mut items = vec![MediaItem::new("nowhere.png").with_size(10, 20)];
        probe_missing_dimensions(&mut items);
        assert_eq!((items[0].width, items[0].height), (10, 20));
    }
}
