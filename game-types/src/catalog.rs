use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectCategory {
    Infantry,
    Vehicle,
    Aircraft,
    Building,
    Terrain,
    Overlay,
    Smudge,
}

/// Builds a catalog entry from its identifying name and catalog index.
pub type ObjectFactory = fn(String, usize) -> ObjectType;

impl ObjectCategory {
    pub const ALL: [ObjectCategory; 7] = [
        ObjectCategory::Infantry,
        ObjectCategory::Vehicle,
        ObjectCategory::Aircraft,
        ObjectCategory::Building,
        ObjectCategory::Terrain,
        ObjectCategory::Overlay,
        ObjectCategory::Smudge,
    ];

    pub fn section_name(self) -> &'static str {
        match self {
            Self::Infantry => "InfantryTypes",
            Self::Vehicle => "VehicleTypes",
            Self::Aircraft => "AircraftTypes",
            Self::Building => "BuildingTypes",
            Self::Terrain => "TerrainTypes",
            Self::Overlay => "OverlayTypes",
            Self::Smudge => "SmudgeTypes",
        }
    }

    /// Registry entry for this category.
    pub fn factory(self) -> ObjectFactory {
        match self {
            Self::Infantry => |name, index| ObjectType::Infantry(TechnoType::new(name, index)),
            Self::Vehicle => |name, index| ObjectType::Vehicle(TechnoType::new(name, index)),
            Self::Aircraft => |name, index| ObjectType::Aircraft(TechnoType::new(name, index)),
            Self::Building => |name, index| ObjectType::Building(BuildingType::new(name, index)),
            Self::Terrain => |name, index| ObjectType::Terrain(TerrainType::new(name, index)),
            Self::Overlay => |name, index| ObjectType::Overlay(OverlayType::new(name, index)),
            Self::Smudge => |name, index| ObjectType::Smudge(SmudgeType::new(name, index)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectType {
    Infantry(TechnoType),
    Vehicle(TechnoType),
    Aircraft(TechnoType),
    Building(BuildingType),
    Terrain(TerrainType),
    Overlay(OverlayType),
    Smudge(SmudgeType),
}

impl ObjectType {
    pub fn category(&self) -> ObjectCategory {
        match self {
            Self::Infantry(_) => ObjectCategory::Infantry,
            Self::Vehicle(_) => ObjectCategory::Vehicle,
            Self::Aircraft(_) => ObjectCategory::Aircraft,
            Self::Building(_) => ObjectCategory::Building,
            Self::Terrain(_) => ObjectCategory::Terrain,
            Self::Overlay(_) => ObjectCategory::Overlay,
            Self::Smudge(_) => ObjectCategory::Smudge,
        }
    }

    pub fn ini_name(&self) -> &str {
        match self {
            Self::Infantry(t) | Self::Vehicle(t) | Self::Aircraft(t) => &t.ini_name,
            Self::Building(t) => &t.ini_name,
            Self::Terrain(t) => &t.ini_name,
            Self::Overlay(t) => &t.ini_name,
            Self::Smudge(t) => &t.ini_name,
        }
    }

    fn apply(&mut self, props: &TypeProperties) {
        match self {
            Self::Infantry(_) | Self::Vehicle(_) | Self::Aircraft(_) => {}
            Self::Building(t) => {
                if let Some([w, h]) = props.foundation {
                    t.foundation = (w.max(1), h.max(1));
                }
            }
            Self::Terrain(t) => {
                t.image = props.image.clone().or(t.image.take());
                t.theater = props.theater.unwrap_or(t.theater);
                t.spawns_tiberium = props.spawns_tiberium.unwrap_or(t.spawns_tiberium);
            }
            Self::Overlay(t) => {
                t.image = props.image.clone().or(t.image.take());
                t.theater = props.theater.unwrap_or(t.theater);
                t.tiberium = props.tiberium.unwrap_or(t.tiberium);
                t.high_bridge_direction = props
                    .high_bridge_direction
                    .unwrap_or(t.high_bridge_direction);
            }
            Self::Smudge(t) => {
                t.image = props.image.clone().or(t.image.take());
                t.theater = props.theater.unwrap_or(t.theater);
                if let Some([w, h]) = props.foundation {
                    t.size = (w.max(1), h.max(1));
                }
            }
        }
    }
}

/// Infantry, vehicles and aircraft: only their identity matters here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnoType {
    pub ini_name: String,
    pub index: usize,
}

impl TechnoType {
    pub fn new(ini_name: String, index: usize) -> Self {
        Self { ini_name, index }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingType {
    pub ini_name: String,
    pub index: usize,
    /// Footprint in cells (width along x, height along y).
    pub foundation: (u32, u32),
}

impl BuildingType {
    pub fn new(ini_name: String, index: usize) -> Self {
        Self {
            ini_name,
            index,
            foundation: (1, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainType {
    pub ini_name: String,
    pub index: usize,
    /// Art name override; the INI name is used when absent.
    pub image: Option<String>,
    /// Art is theater-specific and uses the theater's file extension.
    pub theater: bool,
    pub spawns_tiberium: bool,
}

impl TerrainType {
    pub fn new(ini_name: String, index: usize) -> Self {
        Self {
            ini_name,
            index,
            image: None,
            theater: false,
            spawns_tiberium: false,
        }
    }

    pub fn image_name(&self) -> &str {
        self.image.as_deref().unwrap_or(&self.ini_name)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeDirection {
    #[default]
    None,
    EastWest,
    NorthSouth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayType {
    pub ini_name: String,
    pub index: usize,
    pub image: Option<String>,
    pub theater: bool,
    pub tiberium: bool,
    pub high_bridge_direction: BridgeDirection,
}

impl OverlayType {
    pub fn new(ini_name: String, index: usize) -> Self {
        Self {
            ini_name,
            index,
            image: None,
            theater: false,
            tiberium: false,
            high_bridge_direction: BridgeDirection::None,
        }
    }

    pub fn image_name(&self) -> &str {
        self.image.as_deref().unwrap_or(&self.ini_name)
    }

    pub fn is_high_bridge(&self) -> bool {
        self.high_bridge_direction != BridgeDirection::None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmudgeType {
    pub ini_name: String,
    pub index: usize,
    pub image: Option<String>,
    pub theater: bool,
    pub size: (u32, u32),
}

impl SmudgeType {
    pub fn new(ini_name: String, index: usize) -> Self {
        Self {
            ini_name,
            index,
            image: None,
            theater: false,
            size: (1, 1),
        }
    }

    pub fn image_name(&self) -> &str {
        self.image.as_deref().unwrap_or(&self.ini_name)
    }
}

/// Per-type keys; anything left out keeps the type's default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeProperties {
    pub image: Option<String>,
    pub theater: Option<bool>,
    pub spawns_tiberium: Option<bool>,
    pub tiberium: Option<bool>,
    pub high_bridge_direction: Option<BridgeDirection>,
    pub foundation: Option<[u32; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeLists {
    pub infantry: Vec<String>,
    pub vehicles: Vec<String>,
    pub aircraft: Vec<String>,
    pub buildings: Vec<String>,
    pub terrain: Vec<String>,
    pub overlays: Vec<String>,
    pub smudges: Vec<String>,
}

impl TypeLists {
    pub fn names(&self, category: ObjectCategory) -> &[String] {
        match category {
            ObjectCategory::Infantry => &self.infantry,
            ObjectCategory::Vehicle => &self.vehicles,
            ObjectCategory::Aircraft => &self.aircraft,
            ObjectCategory::Building => &self.buildings,
            ObjectCategory::Terrain => &self.terrain,
            ObjectCategory::Overlay => &self.overlays,
            ObjectCategory::Smudge => &self.smudges,
        }
    }
}

/// On-disk form of the object catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub types: TypeLists,
    pub properties: FxHashMap<String, TypeProperties>,
}

impl RulesConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// The object-type catalog. Indices are positions within each list and stay
/// stable for the lifetime of the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rules {
    pub infantry_types: Vec<TechnoType>,
    pub unit_types: Vec<TechnoType>,
    pub aircraft_types: Vec<TechnoType>,
    pub building_types: Vec<BuildingType>,
    pub terrain_types: Vec<TerrainType>,
    pub overlay_types: Vec<OverlayType>,
    pub smudge_types: Vec<SmudgeType>,
}

impl Rules {
    pub fn from_config(config: &RulesConfig) -> Self {
        let mut rules = Rules::default();

        for category in ObjectCategory::ALL {
            let factory = category.factory();
            for (index, name) in config.types.names(category).iter().enumerate() {
                let mut object = factory(name.clone(), index);
                if let Some(props) = config.properties.get(name) {
                    object.apply(props);
                }
                rules.insert(object);
            }
        }

        rules
    }

    fn insert(&mut self, object: ObjectType) {
        match object {
            ObjectType::Infantry(t) => self.infantry_types.push(t),
            ObjectType::Vehicle(t) => self.unit_types.push(t),
            ObjectType::Aircraft(t) => self.aircraft_types.push(t),
            ObjectType::Building(t) => self.building_types.push(t),
            ObjectType::Terrain(t) => self.terrain_types.push(t),
            ObjectType::Overlay(t) => self.overlay_types.push(t),
            ObjectType::Smudge(t) => self.smudge_types.push(t),
        }
    }

    pub fn count(&self, category: ObjectCategory) -> usize {
        match category {
            ObjectCategory::Infantry => self.infantry_types.len(),
            ObjectCategory::Vehicle => self.unit_types.len(),
            ObjectCategory::Aircraft => self.aircraft_types.len(),
            ObjectCategory::Building => self.building_types.len(),
            ObjectCategory::Terrain => self.terrain_types.len(),
            ObjectCategory::Overlay => self.overlay_types.len(),
            ObjectCategory::Smudge => self.smudge_types.len(),
        }
    }
}
