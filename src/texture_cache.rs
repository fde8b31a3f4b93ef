use log::{debug, warn};
use macroquad::prelude::*;
use std::cell::OnceCell;
use std::collections::HashMap;

/// Cache key of the image substituted for files that cannot be found.
pub const PLACEHOLDER_KEY: &str = "placeholder";
/// Edge length of the placeholder image.
pub const PLACEHOLDER_SIZE: u16 = 64;

/// Index of an image owned by a [`TextureCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

struct CachedTexture {
    key: String,
    image: Image,
    gpu: OnceCell<Texture2D>,
}

/// Owns every palette image decoded during a session.
///
/// Images are decoded on the CPU when first requested and uploaded to the
/// GPU the first time they are drawn. Entries are never evicted, so a
/// handle stays valid for the lifetime of the cache.
#[derive(Default)]
pub struct TextureCache {
    entries: Vec<CachedTexture>,
    keys: HashMap<String, TextureHandle>,
}

impl TextureCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves `filename` against `search_paths`.
    ///
    /// First pass: the first `prefix + filename` already cached wins.
    /// Second pass: the first `prefix + filename` that decodes is cached
    /// under that key. If both fail, a blank placeholder cached under
    /// [`PLACEHOLDER_KEY`] is returned instead.
    pub fn get_or_load(&mut self, search_paths: &[String], filename: &str) -> TextureHandle {
        for prefix in search_paths {
            let key = format!("{prefix}{filename}");
            if let Some(&handle) = self.keys.get(&key) {
                debug!("Texture cache hit for {key}");
                return handle;
            }
        }

        for prefix in search_paths {
            let path = format!("{prefix}{filename}");
            if let Some(image) = load_image(&path) {
                return self.insert(path, image);
            }
        }

        warn!("Image {filename} was not found. Creating a placeholder image.");
        if let Some(&handle) = self.keys.get(PLACEHOLDER_KEY) {
            return handle;
        }
        let blank = Image::gen_image_color(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, BLANK);
        self.insert(PLACEHOLDER_KEY.to_owned(), blank)
    }

    fn insert(&mut self, key: String, image: Image) -> TextureHandle {
        let handle = TextureHandle(self.entries.len() as u32);
        debug!("Caching {key} ({}x{}) as {handle:?}", image.width, image.height);
        self.keys.insert(key.clone(), handle);
        self.entries.push(CachedTexture {
            key,
            image,
            gpu: OnceCell::new(),
        });
        handle
    }

    /// Handle cached under an exact key.
    pub fn lookup(&self, key: &str) -> Option<TextureHandle> {
        self.keys.get(key).copied()
    }

    /// Key an entry was cached under.
    pub fn key(&self, handle: TextureHandle) -> Option<&str> {
        self.entries.get(handle.0 as usize).map(|e| e.key.as_str())
    }

    /// Decoded image of an entry.
    pub fn image(&self, handle: TextureHandle) -> Option<&Image> {
        self.entries.get(handle.0 as usize).map(|e| &e.image)
    }

    /// Pixel size of an entry.
    pub fn size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.image(handle)
            .map(|img| (img.width as u32, img.height as u32))
    }

    /// GPU texture of an entry, uploaded on first use.
    ///
    /// Requires a live macroquad context.
    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture2D> {
        let entry = self.entries.get(handle.0 as usize)?;
        Some(entry.gpu.get_or_init(|| {
            let tex = Texture2D::from_image(&entry.image);
            tex.set_filter(FilterMode::Nearest);
            tex
        }))
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` before the first image is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn load_image(path: &str) -> Option<Image> {
    let bytes = std::fs::read(path).ok()?;
    match Image::from_file_with_format(&bytes, None) {
        Ok(image) => Some(image),
        Err(err) => {
            warn!("Failed to decode image {path}: {err:?}");
            None
        }
    }
}
