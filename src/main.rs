use anyhow::Context;
use tsmap_lib::{EditorSession, SettingsStore, TheaterSummary, logging};

fn main() -> anyhow::Result<()> {
    let log_filter = logging::init();

    let store = SettingsStore::default();
    let settings = store.load();
    log_filter.apply_setting(&settings.log_filter);

    // Optional first argument overrides the configured theater.
    let theater = std::env::args()
        .nth(1)
        .unwrap_or_else(|| settings.theater.clone());

    let mut session = EditorSession::from_settings(&settings, store.dir())
        .context("Failed to start editor session")?;
    let cache = session.change_theater(&theater)?;

    tracing::info!("{}", TheaterSummary::of(&cache));
    Ok(())
}
