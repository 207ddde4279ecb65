//! High score storage
//!
//! One key-value slot holding a single non-negative integer, stored as its
//! decimal text:
//! - `FileSlot`: a file under the platform data directory (native)
//! - `LocalStorageSlot`: browser LocalStorage (wasm32)
//! - `MemorySlot`: in-process only, for tests and fallbacks

use crate::error::StoreError;

/// A place to keep the high score between sessions
pub trait ScoreSlot {
    /// Stored score, `None` if nothing has been stored yet
    fn load(&self) -> Result<Option<u64>, StoreError>;

    fn save(&mut self, score: u64) -> Result<(), StoreError>;
}

/// Parse stored text; blank means absent
pub fn parse_score(raw: &str) -> Result<Option<u64>, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| StoreError::Corrupt {
            value: trimmed.to_string(),
        })
}

/// In-memory slot
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<u64>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score(score: u64) -> Self {
        Self { value: Some(score) }
    }

    pub fn value(&self) -> Option<u64> {
        self.value
    }
}

impl ScoreSlot for MemorySlot {
    fn load(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.value)
    }

    fn save(&mut self, score: u64) -> Result<(), StoreError> {
        self.value = Some(score);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::io::ErrorKind;
    use std::path::{Path, PathBuf};

    use super::{ScoreSlot, parse_score};
    use crate::error::StoreError;

    /// File name used inside the data directory
    const FILE_NAME: &str = "highscore";

    /// Slot backed by a text file
    #[derive(Debug, Clone)]
    pub struct FileSlot {
        path: PathBuf,
    }

    impl FileSlot {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// Slot in the platform data directory, if one can be determined
        pub fn in_data_dir() -> Option<Self> {
            let dirs = directories::ProjectDirs::from("com", "paulrobello", "mountain-runner")?;
            Some(Self::new(dirs.data_dir().join(FILE_NAME)))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl ScoreSlot for FileSlot {
        fn load(&self) -> Result<Option<u64>, StoreError> {
            match std::fs::read_to_string(&self.path) {
                Ok(raw) => parse_score(&raw),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn save(&mut self, score: u64) -> Result<(), StoreError> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            // Write aside, then swap in, so a crash never leaves a torn file
            let tmp = self.path.with_extension("tmp");
            std::fs::write(&tmp, score.to_string())?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileSlot;

#[cfg(target_arch = "wasm32")]
mod local_storage {
    use super::{ScoreSlot, parse_score};
    use crate::error::StoreError;

    /// Slot backed by browser LocalStorage
    #[derive(Debug, Clone)]
    pub struct LocalStorageSlot {
        key: String,
    }

    impl LocalStorageSlot {
        /// Key shared with earlier browser builds
        pub const DEFAULT_KEY: &'static str = "highScore";

        pub fn new(key: impl Into<String>) -> Self {
            Self { key: key.into() }
        }

        fn storage() -> Result<web_sys::Storage, StoreError> {
            web_sys::window()
                .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
                .local_storage()
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
                .ok_or_else(|| StoreError::Unavailable("LocalStorage disabled".to_string()))
        }
    }

    impl Default for LocalStorageSlot {
        fn default() -> Self {
            Self::new(Self::DEFAULT_KEY)
        }
    }

    impl ScoreSlot for LocalStorageSlot {
        fn load(&self) -> Result<Option<u64>, StoreError> {
            let raw = Self::storage()?
                .get_item(&self.key)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?;
            match raw {
                Some(raw) => parse_score(&raw),
                None => Ok(None),
            }
        }

        fn save(&mut self, score: u64) -> Result<(), StoreError> {
            Self::storage()?
                .set_item(&self.key, &score.to_string())
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageSlot;

/// Platform default slot
#[cfg(not(target_arch = "wasm32"))]
pub fn default_slot() -> Box<dyn ScoreSlot> {
    match FileSlot::in_data_dir() {
        Some(slot) => {
            log::info!("High score file: {}", slot.path().display());
            Box::new(slot)
        }
        None => {
            log::warn!("No data directory available, high score will not persist");
            Box::new(MemorySlot::new())
        }
    }
}

/// Platform default slot
#[cfg(target_arch = "wasm32")]
pub fn default_slot() -> Box<dyn ScoreSlot> {
    Box::new(LocalStorageSlot::default())
}
