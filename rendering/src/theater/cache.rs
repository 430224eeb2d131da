use std::sync::Arc;

use formats::{FileProvider, FormatError, Palette};
use game_types::{Rules, Theater};
use thiserror::Error;

use super::{AssetSlots, ObjectArt, ObjectArtLoader, TileImage, TileSetLoader};

/// A theater could not be loaded at all. Per-asset problems never end up
/// here; they leave empty slots behind instead.
#[derive(Debug, Error)]
pub enum TheaterLoadError {
    #[error("palette {name} was not found")]
    MissingPalette { name: String },
    #[error("palette {name} is unreadable")]
    Palette {
        name: String,
        #[source]
        source: FormatError,
    },
}

fn load_palette(provider: &dyn FileProvider, name: &str) -> Result<Arc<Palette>, TheaterLoadError> {
    let data = provider
        .load_file(name)
        .ok_or_else(|| TheaterLoadError::MissingPalette {
            name: name.to_string(),
        })?;
    let palette = Palette::from_bytes(&data).map_err(|source| TheaterLoadError::Palette {
        name: name.to_string(),
        source,
    })?;
    Ok(Arc::new(palette))
}

/// Every decoded texture of one theater. Built in one go and never mutated
/// afterwards.
#[derive(Debug, PartialEq, Eq)]
pub struct TheaterAssetCache {
    theater: Theater,
    theater_palette: Arc<Palette>,
    unit_palette: Arc<Palette>,
    tiles: Vec<TileImage>,
    terrain: AssetSlots<ObjectArt>,
    overlays: AssetSlots<ObjectArt>,
    smudges: AssetSlots<ObjectArt>,
}

impl TheaterAssetCache {
    pub fn load(
        theater: &Theater,
        rules: &Rules,
        provider: &dyn FileProvider,
    ) -> Result<Self, TheaterLoadError> {
        tracing::info!("Loading theater {}", theater.name);

        let theater_palette = load_palette(provider, &theater.palette_name)?;
        let unit_palette = load_palette(provider, &theater.unit_palette_name)?;

        let tiles = TileSetLoader::new(theater, provider, &theater_palette).load_all();

        let objects = ObjectArtLoader::new(theater, provider, &theater_palette, &unit_palette);
        let terrain = objects.load(&rules.terrain_types);
        let overlays = objects.load(&rules.overlay_types);
        let smudges = objects.load(&rules.smudge_types);

        tracing::info!(
            "Theater {} loaded: {} tile images, {}/{} terrain, {}/{} overlays, {}/{} smudges",
            theater.name,
            tiles.len(),
            terrain.present_count(),
            rules.terrain_types.len(),
            overlays.present_count(),
            rules.overlay_types.len(),
            smudges.present_count(),
            rules.smudge_types.len(),
        );

        Ok(Self {
            theater: theater.clone(),
            theater_palette,
            unit_palette,
            tiles,
            terrain,
            overlays,
            smudges,
        })
    }

    pub fn theater(&self) -> &Theater {
        &self.theater
    }

    /// Looks up a tile image by its flat index: tile sets in declaration
    /// order, each tile followed by its lettered alternates.
    pub fn tile(&self, flat_index: usize) -> Option<&TileImage> {
        self.tiles.get(flat_index)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[TileImage] {
        &self.tiles
    }

    pub fn terrain(&self, index: usize) -> Option<&ObjectArt> {
        self.terrain.get(index)
    }

    pub fn overlay(&self, index: usize) -> Option<&ObjectArt> {
        self.overlays.get(index)
    }

    pub fn smudge(&self, index: usize) -> Option<&ObjectArt> {
        self.smudges.get(index)
    }

    pub fn terrain_art(&self) -> &AssetSlots<ObjectArt> {
        &self.terrain
    }

    pub fn overlay_art(&self) -> &AssetSlots<ObjectArt> {
        &self.overlays
    }

    pub fn smudge_art(&self) -> &AssetSlots<ObjectArt> {
        &self.smudges
    }

    pub fn theater_palette(&self) -> &Arc<Palette> {
        &self.theater_palette
    }

    pub fn unit_palette(&self) -> &Arc<Palette> {
        &self.unit_palette
    }
}

/// Holds the active theater's cache. Readers clone the `Arc` and keep a
/// consistent snapshot across a reload.
#[derive(Debug, Default)]
pub struct TheaterGraphics {
    active: Option<Arc<TheaterAssetCache>>,
}

impl TheaterGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<TheaterAssetCache>> {
        self.active.clone()
    }

    pub fn active(&self) -> Option<&TheaterAssetCache> {
        self.active.as_deref()
    }

    /// Builds a fresh cache for `theater` and swaps it in. On error the
    /// previous cache stays active.
    pub fn reload(
        &mut self,
        theater: &Theater,
        rules: &Rules,
        provider: &dyn FileProvider,
    ) -> Result<Arc<TheaterAssetCache>, TheaterLoadError> {
        let cache = Arc::new(TheaterAssetCache::load(theater, rules, provider)?);
        self.active = Some(cache.clone());
        Ok(cache)
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}
