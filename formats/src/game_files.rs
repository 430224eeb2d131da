use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Source of named game files (archives, loose directories, test fixtures).
///
/// Lookups are by bare file name. Absence is not an error at this level: the
/// caller decides whether a missing file is fatal.
pub trait FileProvider {
    fn load_file(&self, name: &str) -> Option<Vec<u8>>;
}

impl<T: FileProvider + ?Sized> FileProvider for &T {
    fn load_file(&self, name: &str) -> Option<Vec<u8>> {
        (**self).load_file(name)
    }
}

impl<T: FileProvider + ?Sized> FileProvider for Box<T> {
    fn load_file(&self, name: &str) -> Option<Vec<u8>> {
        (**self).load_file(name)
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone)]
pub struct ArxArchive {
    archive: std::sync::Arc<libarx::Arx>,
}

#[cfg(not(target_arch = "wasm32"))]
impl ArxArchive {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ArxError> {
        let archive =
            libarx::Arx::new(path).map_err(|e| ArxError::ArchiveError(e.to_string()))?;
        Ok(Self {
            archive: std::sync::Arc::new(archive),
        })
    }

    pub fn get_file(&self, path: &str) -> Result<Vec<u8>, ArxError> {
        use jubako as jbk;
        use libarx::{self as arx, FullBuilder};
        use std::io::Read;

        if let Ok(arx::Entry::File(content_address)) =
            self.archive.get_entry::<FullBuilder>(arx::Path::new(path))
        {
            if let jbk::Result::Ok(Some(jbk::reader::MayMissPack::FOUND(Some(bytes)))) =
                self.archive.get_bytes(content_address.content())
            {
                let mut buf = vec![];
                bytes.stream().read_to_end(&mut buf)?;
                return Ok(buf);
            }
        }

        Err(ArxError::FileNotFound(path.to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl FileProvider for ArxArchive {
    fn load_file(&self, name: &str) -> Option<Vec<u8>> {
        match self.get_file(name) {
            Ok(data) => Some(data),
            Err(ArxError::FileNotFound(_)) => {
                // Packed archives keep the game's casing; fall back to lowercase.
                let lower = name.to_ascii_lowercase();
                (lower != name).then(|| self.get_file(&lower).ok()).flatten()
            }
            Err(e) => {
                tracing::warn!("Failed to read '{}' from archive: {}", name, e);
                None
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ArxError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Archive error: {0}")]
    ArchiveError(String),
}

/// Loose files in one directory, matched without regard to case the way the
/// game resolves names.
pub struct DirectoryArchive {
    root: PathBuf,
    index: FxHashMap<String, PathBuf>,
}

impl DirectoryArchive {
    pub fn new<P: AsRef<Path>>(root: P) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        let mut index = FxHashMap::default();

        for entry in std::fs::read_dir(&root)?.flatten() {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                index.insert(name.to_ascii_lowercase(), entry.path());
            }
        }

        tracing::debug!("Indexed {} files under {:?}", index.len(), root);
        Ok(Self { root, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileProvider for DirectoryArchive {
    fn load_file(&self, name: &str) -> Option<Vec<u8>> {
        let path = self.index.get(&name.to_ascii_lowercase())?;
        match std::fs::read(path) {
            Ok(data) => Some(data),
            Err(e) => {
                tracing::warn!("Failed to read {:?}: {}", path, e);
                None
            }
        }
    }
}

/// In-memory file set, keyed case-insensitively.
#[derive(Default, Clone)]
pub struct MemoryArchive {
    files: FxHashMap<String, Vec<u8>>,
}

impl MemoryArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, data: Vec<u8>) {
        self.files.insert(name.to_ascii_lowercase(), data);
    }

    pub fn with_file(mut self, name: &str, data: Vec<u8>) -> Self {
        self.insert(name, data);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.files.remove(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileProvider for MemoryArchive {
    fn load_file(&self, name: &str) -> Option<Vec<u8>> {
        self.files.get(&name.to_ascii_lowercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_archive_ignores_case() {
        let archive = MemoryArchive::new().with_file("ISOTEM.PAL", vec![1, 2, 3]);
        assert_eq!(archive.load_file("isotem.pal"), Some(vec![1, 2, 3]));
        assert_eq!(archive.load_file("unittem.pal"), None);
    }

    #[test]
    fn directory_archive_reads_loose_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Clear01.TEM"), [9u8, 8, 7]).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let archive = DirectoryArchive::new(dir.path()).unwrap();
        assert_eq!(archive.load_file("clear01.tem"), Some(vec![9, 8, 7]));
        assert_eq!(archive.load_file("nested"), None);
        assert_eq!(archive.root(), dir.path());
    }

    #[test]
    fn archive_errors_keep_their_cause() {
        let err = ArxError::from(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "stream ended",
        ));
        assert_eq!(err.to_string(), "IO error: stream ended");
        assert!(std::error::Error::source(&err).is_some());

        let missing = ArxError::FileNotFound("clear01.tem".into());
        assert_eq!(missing.to_string(), "File not found: clear01.tem");
    }

    #[test]
    fn providers_work_through_references() {
        fn count(provider: &dyn FileProvider, names: &[&str]) -> usize {
            names.iter().filter(|n| provider.load_file(n).is_some()).count()
        }

        let archive: Box<dyn FileProvider> =
            Box::new(MemoryArchive::new().with_file("a.shp", vec![]));
        assert_eq!(count(&archive, &["a.shp", "b.shp"]), 1);
    }
}
