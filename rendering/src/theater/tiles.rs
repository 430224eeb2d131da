use formats::{FileProvider, FormatError, Palette, tmp::TmpFile};
use game_types::{Theater, TileSet};

use super::AssetSlots;
use crate::texture::{RenderableTexture, assemble_container};

/// Lettered alternates probed after a tile's base file ('a' through 'f').
///
/// The limit matches the game's own lookup and may be a format constraint;
/// keep it rather than scanning further.
pub const MAX_TILE_VARIANTS: u8 = 6;

/// One tile file: the base image of a tile slot or one of its lettered
/// alternates. Alternates share the base's `(tile_set_id, tile_index)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    pub tile_set_id: usize,
    pub tile_index: usize,
    pub variant: Option<char>,
    pub images: AssetSlots<RenderableTexture>,
}

impl TileImage {
    fn empty(tile_set_id: usize, tile_index: usize) -> Self {
        Self {
            tile_set_id,
            tile_index,
            variant: None,
            images: AssetSlots::new(),
        }
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }
}

/// `clear` + tile 0 + no variant + `.tem` gives `clear01.tem`.
pub fn tile_file_name(
    tile_set: &TileSet,
    theater: &Theater,
    tile_index: usize,
    variant: Option<char>,
) -> String {
    let mut name = format!("{}{:02}", tile_set.file_name, tile_index + 1);
    if let Some(letter) = variant {
        name.push(letter);
    }
    name.push_str(tile_set.extension(theater));
    name
}

fn variant_letters() -> impl Iterator<Item = char> {
    (b'a'..b'a' + MAX_TILE_VARIANTS).map(char::from)
}

pub struct TileSetLoader<'a> {
    theater: &'a Theater,
    provider: &'a dyn FileProvider,
    palette: &'a Palette,
}

impl<'a> TileSetLoader<'a> {
    pub fn new(theater: &'a Theater, provider: &'a dyn FileProvider, palette: &'a Palette) -> Self {
        Self {
            theater,
            provider,
            palette,
        }
    }

    /// Loads every tile set of the theater in declaration order. The position
    /// of an entry in the result is its flat tile index.
    pub fn load_all(&self) -> Vec<TileImage> {
        let mut tiles = Vec::with_capacity(self.theater.declared_tile_count());
        for (tile_set_id, tile_set) in self.theater.tile_sets.iter().enumerate() {
            self.load_into(tile_set_id, tile_set, &mut tiles);
        }
        tiles
    }

    pub fn load_tile_set(&self, tile_set_id: usize, tile_set: &TileSet) -> Vec<TileImage> {
        let mut tiles = Vec::with_capacity(tile_set.tiles_in_set as usize);
        self.load_into(tile_set_id, tile_set, &mut tiles);
        tiles
    }

    fn load_into(&self, tile_set_id: usize, tile_set: &TileSet, tiles: &mut Vec<TileImage>) {
        tracing::info!("Loading tile set {}", tile_set.set_name);
        let start = tiles.len();

        for tile_index in 0..tile_set.tiles_in_set as usize {
            let base_name = tile_file_name(tile_set, self.theater, tile_index, None);
            let Some(data) = self.provider.load_file(&base_name) else {
                tracing::debug!("{} not found, keeping an empty tile", base_name);
                tiles.push(TileImage::empty(tile_set_id, tile_index));
                continue;
            };

            match self.read_images(&data) {
                Ok(images) => tiles.push(TileImage {
                    tile_set_id,
                    tile_index,
                    variant: None,
                    images,
                }),
                Err(e) => {
                    tracing::warn!("Skipping malformed tile {}: {}", base_name, e);
                    tiles.push(TileImage::empty(tile_set_id, tile_index));
                    continue;
                }
            }

            // Alternates are contiguous from 'a'; the first gap ends the scan.
            for letter in variant_letters() {
                let name = tile_file_name(tile_set, self.theater, tile_index, Some(letter));
                let Some(data) = self.provider.load_file(&name) else {
                    break;
                };

                match self.read_images(&data) {
                    Ok(images) => tiles.push(TileImage {
                        tile_set_id,
                        tile_index,
                        variant: Some(letter),
                        images,
                    }),
                    Err(e) => {
                        tracing::warn!("Skipping malformed tile variant {}: {}", name, e);
                        break;
                    }
                }
            }
        }

        tracing::debug!(
            "Tile set {} produced {} tile images",
            tile_set.set_name,
            tiles.len() - start
        );
    }

    fn read_images(&self, data: &[u8]) -> Result<AssetSlots<RenderableTexture>, FormatError> {
        let container = TmpFile::read_container(data)?;
        Ok(assemble_container(&container, self.palette))
    }
}
