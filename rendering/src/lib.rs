pub mod constants;
pub mod depth;
pub mod texture;
pub mod theater;

pub use depth::{DepthCategory, DepthQuery, IsoGrid, MapGeometry, ScreenRect, compute_depth};
pub use texture::{RenderableTexture, Rgba8};
pub use theater::{
    AssetSlots, ObjectArt, TheaterAssetCache, TheaterGraphics, TheaterLoadError, TileImage,
};
