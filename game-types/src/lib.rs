pub mod catalog;
pub mod settings;
pub mod theater;

pub use catalog::{
    BridgeDirection, BuildingType, ObjectCategory, ObjectType, OverlayType, Rules, RulesConfig,
    SmudgeType, TechnoType, TerrainType,
};
pub use settings::{AssetSource, Settings};
pub use theater::{Theater, TheaterCatalog, TileSet};
