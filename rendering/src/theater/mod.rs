mod cache;
mod objects;
mod slots;
mod tiles;

pub use cache::{TheaterAssetCache, TheaterGraphics, TheaterLoadError};
pub use objects::{
    ArtRequest, GENERIC_EXTENSION, ObjectArt, ObjectArtLoader, ObjectArtSource, PaletteKind,
    art_file_name, load_terrain_visuals,
};
pub use slots::AssetSlots;
pub use tiles::{MAX_TILE_VARIANTS, TileImage, TileSetLoader, tile_file_name};

#[cfg(test)]
pub(crate) mod test_support;
