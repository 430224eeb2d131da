use serde::{Deserialize, Serialize};

/// A visual context (temperate, snow, ...) with its palettes and tile sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theater {
    pub name: String,
    pub palette_name: String,
    pub unit_palette_name: String,
    /// Extension of theater-specific files, including the dot (".tem").
    pub file_extension: String,
    #[serde(default, rename = "tile_set")]
    pub tile_sets: Vec<TileSet>,
}

impl Theater {
    /// Number of tile slots the tile sets declare, before sub-variants.
    pub fn declared_tile_count(&self) -> usize {
        self.tile_sets.iter().map(|ts| ts.tiles_in_set as usize).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSet {
    pub set_name: String,
    /// File name prefix; tile `i` lives in `{file_name}{i + 1:02}{extension}`.
    pub file_name: String,
    pub tiles_in_set: u32,
    #[serde(default)]
    pub file_extension: Option<String>,
}

impl TileSet {
    pub fn extension<'a>(&'a self, theater: &'a Theater) -> &'a str {
        self.file_extension
            .as_deref()
            .unwrap_or(&theater.file_extension)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheaterCatalog {
    #[serde(default, rename = "theater")]
    pub theaters: Vec<Theater>,
}

impl TheaterCatalog {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn find(&self, name: &str) -> Option<&Theater> {
        self.theaters
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.theaters.iter().map(|t| t.name.as_str())
    }
}
