use std::path::{Path, PathBuf};

use crate::{CONFIGS_DIR, DOT_CATDASH_DIR, LOGS_DIR, SETTINGS_CONFIG, STORAGE_FILE};

/// Locations of everything the application keeps on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::new(DOT_CATDASH_DIR)
    }
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn configs(&self) -> PathBuf {
        self.root.join(CONFIGS_DIR)
    }

    pub fn settings(&self) -> PathBuf {
        self.configs().join(SETTINGS_CONFIG)
    }

    pub fn storage(&self) -> PathBuf {
        self.root.join(STORAGE_FILE)
    }

    pub fn logs(&self) -> PathBuf {
        self.root.join(LOGS_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_test() {
        let paths = DataPaths::new("/tmp/data");
        assert_eq!(PathBuf::from("/tmp/data/configs/Settings.toml"), paths.settings());
        assert_eq!(PathBuf::from("/tmp/data/storage.toml"), paths.storage());
        assert_eq!(PathBuf::from("/tmp/data/logs"), paths.logs());
    }
}
