use image::metadata::Orientation;
use image::{DynamicImage, GenericImageView, ImageDecoder, ImageReader};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use winit::event_loop::EventLoopProxy;

use crate::media::MediaItem;

const THUMBNAIL_SIZE: (u32, u32) = (200, 200);

// ---------------------------------------------------------------------------
// Decoded image data
// ---------------------------------------------------------------------------

pub struct DecodedImage {
    pub rgba_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub fn mem_size(&self) -> u64 {
        self.rgba_bytes.len() as u64
    }
}

/// Decode and turn upright according to the file's EXIF orientation, so the
/// pixel dimensions agree with `files::probe_dimensions`.
fn decode_image(path: &Path, target_size: Option<(u32, u32)>) -> Result<DecodedImage, String> {
    let mut decoder = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| e.to_string())?
        .into_decoder()
        .map_err(|e| e.to_string())?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder).map_err(|e| e.to_string())?;
    img.apply_orientation(orientation);

    let img = match target_size {
        Some((w, h)) => img.thumbnail(w, h),
        None => img,
    };
    let (width, height) = img.dimensions();

    Ok(DecodedImage {
        rgba_bytes: img.to_rgba8().into_raw(),
        width,
        height,
    })
}

// ---------------------------------------------------------------------------
// Cache state (shared between UI and worker threads via Mutex + Condvar)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkType {
    Full,
    Thumbnail,
}

pub struct CacheState {
    pub current_idx: usize,
    /// Which items can be decoded at all; videos are never decoded.
    decodable: Vec<bool>,
    want_thumbnails: bool,

    pub images: HashMap<usize, Arc<DecodedImage>>,
    pub thumbnails: HashMap<usize, Arc<DecodedImage>>,

    pub in_progress: HashSet<(usize, WorkType)>,
    pub errors: HashMap<usize, String>,
    pub thumbnail_errors: HashSet<usize>,

    pub used_bytes: u64,
    pub budget: u64,

    /// Indices that were decoded but couldn't be kept (cache full, too far).
    pub saturated: HashSet<usize>,
}

pub type SharedState = Arc<(Mutex<CacheState>, Condvar)>;

impl CacheState {
    pub fn new(budget: u64, items: &[MediaItem]) -> Self {
        Self {
            current_idx: 0,
            decodable: items.iter().map(|item| !item.is_video()).collect(),
            want_thumbnails: items.len() > 1,
            images: HashMap::new(),
            thumbnails: HashMap::new(),
            in_progress: HashSet::new(),
            errors: HashMap::new(),
            thumbnail_errors: HashSet::new(),
            used_bytes: 0,
            budget,
            saturated: HashSet::new(),
        }
    }

    fn item_count(&self) -> usize {
        self.decodable.len()
    }

    pub fn set_current_idx(&mut self, idx: usize) {
        if idx != self.current_idx {
            self.current_idx = idx;
            self.saturated.clear();
        }
    }

    pub fn get(&self, idx: usize) -> Option<Arc<DecodedImage>> {
        self.images.get(&idx).cloned()
    }

    pub fn get_thumbnail(&self, idx: usize) -> Option<Arc<DecodedImage>> {
        self.thumbnails.get(&idx).cloned()
    }

    fn distance(&self, idx: usize) -> usize {
        idx.abs_diff(self.current_idx)
    }

    pub fn is_available(&self, idx: usize, wtype: WorkType) -> bool {
        if !self.decodable.get(idx).copied().unwrap_or(false) {
            return false;
        }
        if self.in_progress.contains(&(idx, wtype)) {
            return false;
        }
        match wtype {
            WorkType::Full => {
                !self.images.contains_key(&idx)
                    && !self.errors.contains_key(&idx)
                    && !self.saturated.contains(&idx)
            }
            WorkType::Thumbnail => {
                self.want_thumbnails
                    && !self.thumbnails.contains_key(&idx)
                    && !self.thumbnail_errors.contains(&idx)
            }
        }
    }

    /// Average decoded image size in bytes (fallback: ~8 MB).
    fn avg_image_size(&self) -> u64 {
        if self.images.is_empty() {
            8 * 1024 * 1024
        } else {
            self.used_bytes.max(1) / self.images.len() as u64
        }
    }

    fn farthest_cached(&self) -> Option<usize> {
        self.images
            .keys()
            .filter(|&&i| i != self.current_idx)
            .map(|&i| self.distance(i))
            .max()
    }

    /// Next piece of work: the current image, then the thumbnail strip, then
    /// neighbours of the current image outward while the budget allows.
    pub fn find_work(&self) -> Option<(usize, WorkType)> {
        if self.is_available(self.current_idx, WorkType::Full) {
            return Some((self.current_idx, WorkType::Full));
        }

        let count = self.item_count();
        for dist in 0..count {
            let candidates = [self.current_idx.checked_sub(dist), Some(self.current_idx + dist)];
            for idx in candidates.into_iter().flatten() {
                if idx < count && self.is_available(idx, WorkType::Thumbnail) {
                    return Some((idx, WorkType::Thumbnail));
                }
            }
        }

        let pending = self
            .in_progress
            .iter()
            .filter(|(_, t)| *t == WorkType::Full)
            .count() as u64;
        let avg = self.avg_image_size();
        let over_budget = self.used_bytes + (pending + 1) * avg > self.budget;
        let limit = if over_budget {
            self.farthest_cached().unwrap_or(0)
        } else {
            usize::MAX
        };

        for dist in 1..count {
            if dist >= limit {
                break;
            }
            // Forward first: that is where the user usually goes next.
            let candidates = [Some(self.current_idx + dist), self.current_idx.checked_sub(dist)];
            for idx in candidates.into_iter().flatten() {
                if idx < count && self.is_available(idx, WorkType::Full) {
                    return Some((idx, WorkType::Full));
                }
            }
        }
        None
    }

    pub fn insert(&mut self, idx: usize, decoded: DecodedImage, wtype: WorkType) {
        match wtype {
            WorkType::Full => {
                if idx != self.current_idx && self.used_bytes + decoded.mem_size() > self.budget {
                    let farthest = self.farthest_cached().unwrap_or(0);
                    if self.distance(idx) >= farthest {
                        self.saturated.insert(idx);
                        return;
                    }
                }
                if let Some(old) = self.images.remove(&idx) {
                    self.used_bytes -= old.mem_size();
                }
                self.used_bytes += decoded.mem_size();
                self.images.insert(idx, Arc::new(decoded));
                self.evict_distant();
            }
            WorkType::Thumbnail => {
                self.thumbnails.insert(idx, Arc::new(decoded));
            }
        }
    }

    fn evict_distant(&mut self) {
        while self.used_bytes > self.budget && self.images.len() > 1 {
            let farthest = self
                .images
                .keys()
                .filter(|&&idx| idx != self.current_idx)
                .max_by_key(|&&idx| self.distance(idx))
                .copied();
            let Some(evict_idx) = farthest else { break };
            if let Some(img) = self.images.remove(&evict_idx) {
                self.used_bytes -= img.mem_size();
                log::debug!("[cache] evicted {}", evict_idx);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// User event for waking the UI from worker threads
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum UserEvent {
    ImageReady(usize),
    ThumbnailReady(usize),
}

// ---------------------------------------------------------------------------
// Background decode workers
// ---------------------------------------------------------------------------

pub fn spawn_decode_workers(
    shared: SharedState,
    items: Arc<[MediaItem]>,
    proxy: EventLoopProxy<UserEvent>,
    num_threads: usize,
) {
    for _ in 0..num_threads {
        let shared = Arc::clone(&shared);
        let items = Arc::clone(&items);
        let proxy = proxy.clone();
        thread::spawn(move || loop {
            let (idx, wtype) = {
                let (lock, cvar) = &*shared;
                let mut state = lock.lock().unwrap();
                loop {
                    if let Some(work) = state.find_work() {
                        state.in_progress.insert(work);
                        break work;
                    }
                    state = cvar.wait(state).unwrap();
                }
            };

            let item = &items[idx];
            let (path, target_size) = match wtype {
                WorkType::Full => (item.src.as_str(), None),
                WorkType::Thumbnail => (item.thumb(), Some(THUMBNAIL_SIZE)),
            };
            let result = decode_image(Path::new(path), target_size);

            {
                let (lock, cvar) = &*shared;
                let mut state = lock.lock().unwrap();
                state.in_progress.remove(&(idx, wtype));
                match result {
                    Ok(decoded) => state.insert(idx, decoded, wtype),
                    Err(e) => {
                        log::warn!("decode failed for {}: {}", path, e);
                        match wtype {
                            WorkType::Full => {
                                state.errors.insert(idx, format!("{}: {}", path, e));
                            }
                            WorkType::Thumbnail => {
                                state.thumbnail_errors.insert(idx);
                            }
                        }
                    }
                }
                cvar.notify_all();
            }

            let event = match wtype {
                WorkType::Full => UserEvent::ImageReady(idx),
                WorkType::Thumbnail => UserEvent::ThumbnailReady(idx),
            };
            if proxy.send_event(event).is_err() {
                // Event loop is gone; nothing left to decode for.
                return;
            }
        });
    }
}
