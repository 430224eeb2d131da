pub mod game_files;
pub mod logging;
pub mod session;
pub mod settings;

pub use session::{EditorIntent, EditorSession, TheaterSummary};
pub use settings::SettingsStore;

pub fn storage_dir() -> std::path::PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    path.push("tsmap");
    let _ = std::fs::create_dir_all(&path);
    path
}
