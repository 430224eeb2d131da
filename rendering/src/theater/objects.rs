use formats::{FileProvider, FormatError, Palette, shp::ShpFile};
use game_types::{OverlayType, SmudgeType, TerrainType, Theater};

use super::AssetSlots;
use crate::texture::{RenderableTexture, assemble_container};

/// Extension of art that is shared by every theater.
pub const GENERIC_EXTENSION: &str = ".SHP";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    Theater,
    Unit,
}

/// What an object type needs loaded for its art.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtRequest<'a> {
    pub index: usize,
    pub name: &'a str,
    pub theater_specific: bool,
    pub palette: PaletteKind,
}

pub trait ObjectArtSource {
    fn art_request(&self) -> ArtRequest<'_>;
}

impl ObjectArtSource for TerrainType {
    fn art_request(&self) -> ArtRequest<'_> {
        ArtRequest {
            index: self.index,
            name: self.image_name(),
            theater_specific: self.theater,
            palette: if self.spawns_tiberium {
                PaletteKind::Unit
            } else {
                PaletteKind::Theater
            },
        }
    }
}

impl ObjectArtSource for OverlayType {
    fn art_request(&self) -> ArtRequest<'_> {
        ArtRequest {
            index: self.index,
            name: self.image_name(),
            theater_specific: self.theater,
            // Tiberium is remapped per field colour, which needs the unit palette.
            palette: if self.tiberium {
                PaletteKind::Unit
            } else {
                PaletteKind::Theater
            },
        }
    }
}

impl ObjectArtSource for SmudgeType {
    fn art_request(&self) -> ArtRequest<'_> {
        ArtRequest {
            index: self.index,
            name: self.image_name(),
            theater_specific: self.theater,
            palette: PaletteKind::Theater,
        }
    }
}

pub fn art_file_name(name: &str, theater_specific: bool, theater: &Theater) -> String {
    let extension = if theater_specific {
        theater.file_extension.as_str()
    } else {
        GENERIC_EXTENSION
    };
    format!("{name}{extension}")
}

/// Every frame of one object type's sprite. Typical objects only use frame 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectArt {
    pub frames: AssetSlots<RenderableTexture>,
}

impl ObjectArt {
    pub fn frame(&self, index: usize) -> Option<&RenderableTexture> {
        self.frames.get(index)
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

pub struct ObjectArtLoader<'a> {
    theater: &'a Theater,
    provider: &'a dyn FileProvider,
    theater_palette: &'a Palette,
    unit_palette: &'a Palette,
}

impl<'a> ObjectArtLoader<'a> {
    pub fn new(
        theater: &'a Theater,
        provider: &'a dyn FileProvider,
        theater_palette: &'a Palette,
        unit_palette: &'a Palette,
    ) -> Self {
        Self {
            theater,
            provider,
            theater_palette,
            unit_palette,
        }
    }

    /// Loads art for `types`, indexed by each type's catalog index. Types
    /// whose file is missing or unreadable leave their slot empty.
    pub fn load<T: ObjectArtSource>(&self, types: &[T]) -> AssetSlots<ObjectArt> {
        let mut slots = AssetSlots::with_len(types.len());

        for object_type in types {
            let request = object_type.art_request();
            let file_name = art_file_name(request.name, request.theater_specific, self.theater);

            let Some(data) = self.provider.load_file(&file_name) else {
                tracing::debug!("No art found for {} ({})", request.name, file_name);
                continue;
            };

            match self.read_art(&data, request.palette) {
                Ok(art) => slots.set(request.index, art),
                Err(e) => tracing::warn!("Skipping malformed art {}: {}", file_name, e),
            }
        }

        slots
    }

    fn read_art(&self, data: &[u8], palette: PaletteKind) -> Result<ObjectArt, FormatError> {
        let palette = match palette {
            PaletteKind::Theater => self.theater_palette,
            PaletteKind::Unit => self.unit_palette,
        };
        let container = ShpFile::read_container(data)?;
        Ok(ObjectArt {
            frames: assemble_container(&container, palette),
        })
    }
}

pub fn load_terrain_visuals(
    terrain_types: &[TerrainType],
    provider: &dyn FileProvider,
    theater: &Theater,
    theater_palette: &Palette,
    unit_palette: &Palette,
) -> AssetSlots<ObjectArt> {
    ObjectArtLoader::new(theater, provider, theater_palette, unit_palette).load(terrain_types)
}
