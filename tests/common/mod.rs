use std::fs;
use std::path::{Path, PathBuf};

use game_types::{AssetSource, Settings};
use tempfile::TempDir;

const THEATERS: &str = r#"
[[theater]]
name = "Temperate"
palette_name = "isotem.pal"
unit_palette_name = "unittem.pal"
file_extension = ".tem"

[[theater.tile_set]]
set_name = "Clear"
file_name = "clear"
tiles_in_set = 2

[[theater]]
name = "Snow"
palette_name = "isosno.pal"
unit_palette_name = "unitsno.pal"
file_extension = ".sno"

[[theater.tile_set]]
set_name = "Clear"
file_name = "clear"
tiles_in_set = 2
"#;

const RULES: &str = r#"
[types]
terrain = ["TREE01", "TREE02"]
overlays = ["TIB01"]
smudges = ["CR1"]

[properties.TREE02]
theater = true

[properties.TIB01]
tiberium = true
"#;

/// Temporary editor setup: config files plus a loose-file asset directory.
/// Only the Temperate theater's palettes are present.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        fs::write(dir.path().join("theaters.toml"), THEATERS).unwrap();
        fs::write(dir.path().join("rules.toml"), RULES).unwrap();

        let workspace = Self { dir };
        fs::create_dir(workspace.assets_dir()).unwrap();
        workspace.add_asset("isotem.pal", palette(2));
        workspace.add_asset("unittem.pal", palette(30));
        workspace.add_asset("clear01.tem", tile_template(6));
        workspace.add_asset("clear01a.tem", tile_template(7));
        workspace.add_asset("TREE01.SHP", sprite(3, 2));
        workspace.add_asset("TREE02.tem", sprite(2, 2));
        workspace.add_asset("TIB01.SHP", sprite(1, 1));
        workspace
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.dir.path().join("assets")
    }

    pub fn add_asset(&self, name: &str, data: Vec<u8>) {
        fs::write(self.assets_dir().join(name), data).unwrap();
    }

    pub fn settings(&self) -> Settings {
        Settings {
            assets: AssetSource::Directory {
                path: PathBuf::from("assets"),
            },
            ..Settings::default()
        }
    }
}

pub fn palette(tint: u8) -> Vec<u8> {
    (0..256u32)
        .flat_map(|i| [(i % 64) as u8, tint % 64, 0])
        .collect()
}

/// One 8x4 diamond cell filled with `index`.
pub fn tile_template(index: u8) -> Vec<u8> {
    let mut out = Vec::new();
    for value in [1u32, 1, 8, 4, 20] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&[0; 52]);
    out.extend_from_slice(&[index; 16]);
    out
}

/// Single-frame raw SHP of `width` x `height` pixels, all set to 1.
pub fn sprite(width: u16, height: u16) -> Vec<u8> {
    let mut out = Vec::new();
    for value in [0, width, height, 1] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    for value in [0u16, 0, width, height] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0]);
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&32u32.to_le_bytes());
    out.extend(std::iter::repeat_n(1u8, width as usize * height as usize));
    out
}
