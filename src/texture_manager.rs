use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;

use crate::shape::ShapeId;

#[derive(Error, Debug)]
pub enum TextureGenerationError {
    #[error("Failed to generate texture")]
    GenerationFailed,
    #[error("Texture would be empty ({0:?})")]
    InvalidDimensions([usize; 2]),
}

/// What a cached texture shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// The background image, by load generation.
    Surface(u64),
    /// The rasterized fill of a finished shape. Shapes never change, so the id is enough.
    Fill(ShapeId),
}

impl TextureKey {
    fn debug_name(&self) -> String {
        match self {
            Self::Surface(generation) => format!("surface_{generation}"),
            Self::Fill(id) => format!("fill_{}", id.0),
        }
    }
}

struct CachedTexture {
    handle: TextureHandle,
    last_used_frame: u64,
}

/// Uploaded canvas textures, evicted least-recently-used once over capacity.
pub struct TextureManager {
    entries: HashMap<TextureKey, CachedTexture>,
    frame: u64,
    capacity: usize,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("cached", &self.entries.len())
            .field("frame", &self.frame)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl TextureManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            frame: 0,
            capacity: capacity.max(1),
        }
    }

    /// Call once per painted frame, before any lookups.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Return the texture for `key`, running `generate` and uploading on a miss.
    pub fn get_or_create_texture<F>(
        &mut self,
        key: TextureKey,
        options: TextureOptions,
        generate: F,
        ctx: &Context,
    ) -> Result<TextureId, TextureGenerationError>
    where
        F: FnOnce() -> Result<ColorImage, TextureGenerationError>,
    {
        let frame = self.frame;
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_used_frame = frame;
            return Ok(entry.handle.id());
        }

        let image = generate()?;
        if image.size.contains(&0) {
            return Err(TextureGenerationError::InvalidDimensions(image.size));
        }

        let handle = ctx.load_texture(key.debug_name(), image, options);
        let id = handle.id();
        self.entries.insert(
            key,
            CachedTexture {
                handle,
                last_used_frame: frame,
            },
        );
        self.evict_over_capacity(key);

        Ok(id)
    }

    /// Drop every texture whose key fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&TextureKey) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }

    // `just_added` survives even if it shares the oldest frame.
    fn evict_over_capacity(&mut self, just_added: TextureKey) {
        let excess = self.entries.len().saturating_sub(self.capacity);
        if excess == 0 {
            return;
        }

        let mut candidates: Vec<(u64, TextureKey)> = self
            .entries
            .iter()
            .filter(|(key, _)| **key != just_added)
            .map(|(key, entry)| (entry.last_used_frame, *key))
            .collect();
        candidates.sort_by_key(|(frame, _)| *frame);

        for (_, key) in candidates.into_iter().take(excess) {
            self.entries.remove(&key);
        }
    }

    pub fn cache_size(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, key: &TextureKey) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(size: [usize; 2]) -> Result<ColorImage, TextureGenerationError> {
        Ok(ColorImage::new(size, egui::Color32::WHITE))
    }

    fn create(manager: &mut TextureManager, key: TextureKey, ctx: &Context) -> TextureId {
        manager
            .get_or_create_texture(key, TextureOptions::default(), || solid([10, 10]), ctx)
            .unwrap()
    }

    #[test]
    fn test_second_lookup_skips_generator() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);

        let first = create(&mut manager, TextureKey::Surface(1), &ctx);
        let second = manager
            .get_or_create_texture(
                TextureKey::Surface(1),
                TextureOptions::default(),
                || Err(TextureGenerationError::GenerationFailed),
                &ctx,
            )
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.cache_size(), 1);
    }

    #[test]
    fn test_least_recently_used_is_evicted() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(2);

        create(&mut manager, TextureKey::Surface(1), &ctx);
        manager.begin_frame();
        create(&mut manager, TextureKey::Surface(2), &ctx);
        manager.begin_frame();
        // Touching 1 makes 2 the oldest.
        create(&mut manager, TextureKey::Surface(1), &ctx);
        manager.begin_frame();
        create(&mut manager, TextureKey::Surface(3), &ctx);

        assert_eq!(manager.cache_size(), 2);
        assert!(manager.contains(&TextureKey::Surface(1)));
        assert!(!manager.contains(&TextureKey::Surface(2)));
        assert!(manager.contains(&TextureKey::Surface(3)));
    }

    #[test]
    fn test_new_texture_survives_same_frame_eviction() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(1);

        create(&mut manager, TextureKey::Surface(1), &ctx);
        create(&mut manager, TextureKey::Surface(2), &ctx);

        assert_eq!(manager.cache_size(), 1);
        assert!(manager.contains(&TextureKey::Surface(2)));
    }

    #[test]
    fn test_retain_drops_stale_fills() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let live = ShapeId::new();
        let deleted = ShapeId::new();

        create(&mut manager, TextureKey::Fill(live), &ctx);
        create(&mut manager, TextureKey::Fill(deleted), &ctx);
        manager.retain(|key| *key != TextureKey::Fill(deleted));

        assert_eq!(manager.cache_size(), 1);
        assert!(manager.contains(&TextureKey::Fill(live)));
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let ctx = Context::default();
        let mut manager = TextureManager::new(10);
        let result = manager.get_or_create_texture(
            TextureKey::Surface(1),
            TextureOptions::default(),
            || solid([0, 4]),
            &ctx,
        );

        assert!(matches!(
            result,
            Err(TextureGenerationError::InvalidDimensions([0, 4]))
        ));
        assert_eq!(manager.cache_size(), 0);
    }
}
