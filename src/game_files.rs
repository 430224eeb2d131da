use std::path::Path;

use anyhow::Context;
use formats::FileProvider;
use formats::game_files::DirectoryArchive;
use game_types::AssetSource;

/// Opens the configured asset source. Relative paths are resolved against
/// `base_dir`.
pub fn open_provider(
    source: &AssetSource,
    base_dir: &Path,
) -> anyhow::Result<Box<dyn FileProvider>> {
    match source {
        AssetSource::Directory { path } => {
            let path = base_dir.join(path);
            let archive = DirectoryArchive::new(&path)
                .with_context(|| format!("Failed to index asset directory {:?}", path))?;
            tracing::info!("Reading game files from directory {:?}", path);
            Ok(Box::new(archive))
        }
        #[cfg(not(target_arch = "wasm32"))]
        AssetSource::Arx { path } => {
            let path = base_dir.join(path);
            let archive = formats::game_files::ArxArchive::new(&path)
                .with_context(|| format!("Failed to open archive {:?}", path))?;
            tracing::info!("Reading game files from archive {:?}", path);
            Ok(Box::new(archive))
        }
        #[cfg(target_arch = "wasm32")]
        AssetSource::Arx { .. } => {
            anyhow::bail!("{} sources are not supported here", source.label())
        }
    }
}
