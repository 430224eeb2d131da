use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use crossbeam_channel::{Receiver, Sender};
use formats::FileProvider;
use game_types::{Rules, RulesConfig, Settings, TheaterCatalog};
use rendering::{AssetSlots, ObjectArt, TheaterAssetCache, TheaterGraphics};
use tracing::{info, warn};

use crate::game_files::open_provider;

/// Requests from the UI side, applied between frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorIntent {
    ChangeTheater(String),
    ReloadTheater,
}

/// Owns everything needed to (re)load theater graphics for an open map.
pub struct EditorSession {
    provider: Box<dyn FileProvider>,
    catalog: TheaterCatalog,
    rules: Rules,
    graphics: TheaterGraphics,
    intent_tx: Sender<EditorIntent>,
    intent_rx: Receiver<EditorIntent>,
}

impl EditorSession {
    pub fn new(provider: Box<dyn FileProvider>, catalog: TheaterCatalog, rules: Rules) -> Self {
        let (intent_tx, intent_rx) = crossbeam_channel::unbounded();
        Self {
            provider,
            catalog,
            rules,
            graphics: TheaterGraphics::new(),
            intent_tx,
            intent_rx,
        }
    }

    /// Reads the theater and rules files named by `settings` and opens its
    /// asset source. Relative paths are resolved against `base_dir`.
    pub fn from_settings(settings: &Settings, base_dir: &Path) -> anyhow::Result<Self> {
        let theaters_path = base_dir.join(&settings.theaters_file);
        let content = fs::read_to_string(&theaters_path)
            .with_context(|| format!("Failed to read {:?}", theaters_path))?;
        let catalog = TheaterCatalog::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {:?}", theaters_path))?;

        let rules_path = base_dir.join(&settings.rules_file);
        let content = fs::read_to_string(&rules_path)
            .with_context(|| format!("Failed to read {:?}", rules_path))?;
        let config = RulesConfig::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {:?}", rules_path))?;

        let provider = open_provider(&settings.assets, base_dir)?;
        Ok(Self::new(provider, catalog, Rules::from_config(&config)))
    }

    /// Sender half for UI code; intents queue until [`Self::process_intents`].
    pub fn intents(&self) -> Sender<EditorIntent> {
        self.intent_tx.clone()
    }

    pub fn catalog(&self) -> &TheaterCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn graphics(&self) -> &TheaterGraphics {
        &self.graphics
    }

    pub fn current(&self) -> Option<Arc<TheaterAssetCache>> {
        self.graphics.current()
    }

    /// Loads `name` and makes it the active theater. Unknown names and failed
    /// loads leave the active theater as it was.
    pub fn change_theater(&mut self, name: &str) -> anyhow::Result<Arc<TheaterAssetCache>> {
        let theater = self.catalog.find(name).ok_or_else(|| {
            anyhow!(
                "Unknown theater {} (known: {})",
                name,
                self.catalog.names().collect::<Vec<_>>().join(", ")
            )
        })?;

        self.graphics
            .reload(theater, &self.rules, self.provider.as_ref())
            .with_context(|| format!("Failed to load theater {}", theater.name))
    }

    pub fn reload_theater(&mut self) -> anyhow::Result<Arc<TheaterAssetCache>> {
        let name = self
            .graphics
            .active()
            .map(|cache| cache.theater().name.clone())
            .context("No theater is loaded")?;
        self.change_theater(&name)
    }

    /// Applies every queued intent. Returns how many succeeded.
    pub fn process_intents(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(intent) = self.intent_rx.try_recv() {
            let result = match &intent {
                EditorIntent::ChangeTheater(name) => self.change_theater(name),
                EditorIntent::ReloadTheater => self.reload_theater(),
            };

            match result {
                Ok(cache) => {
                    info!("{}", TheaterSummary::of(&cache));
                    applied += 1;
                }
                Err(e) => warn!("{:?} failed: {:#}", intent, e),
            }
        }
        applied
    }
}

/// Counts of what a theater load produced, for logs and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheaterSummary {
    pub theater: String,
    pub tile_images: usize,
    pub empty_tiles: usize,
    pub terrain: (usize, usize),
    pub overlays: (usize, usize),
    pub smudges: (usize, usize),
}

fn coverage(slots: &AssetSlots<ObjectArt>) -> (usize, usize) {
    (slots.present_count(), slots.len())
}

impl TheaterSummary {
    pub fn of(cache: &TheaterAssetCache) -> Self {
        Self {
            theater: cache.theater().name.clone(),
            tile_images: cache.tile_count(),
            empty_tiles: cache
                .tiles()
                .iter()
                .filter(|tile| tile.image_count() == 0)
                .count(),
            terrain: coverage(cache.terrain_art()),
            overlays: coverage(cache.overlay_art()),
            smudges: coverage(cache.smudge_art()),
        }
    }
}

impl fmt::Display for TheaterSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} tile images ({} empty), terrain {}/{}, overlays {}/{}, smudges {}/{}",
            self.theater,
            self.tile_images,
            self.empty_tiles,
            self.terrain.0,
            self.terrain.1,
            self.overlays.0,
            self.overlays.1,
            self.smudges.0,
            self.smudges.1,
        )
    }
}
