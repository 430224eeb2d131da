pub mod error;
pub mod game_files;
pub mod palette;
pub mod shp;
pub mod sprite;
pub mod tmp;

pub use error::FormatError;
pub use game_files::FileProvider;
pub use palette::{Palette, Rgb};
pub use sprite::{SpriteContainer, SpriteFrame};
