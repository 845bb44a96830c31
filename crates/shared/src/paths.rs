//! File path utilities for the workbooks the tools produce.

use std::path::{Path, PathBuf};

/// Extension of the workbooks the tools read and write
pub const WORKBOOK_EXTENSION: &str = "xlsx";

/// File path manager for data files
#[derive(Debug, Clone)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// Create a new DataPaths with the given root directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the anime list workbook path for a user
    pub fn anime_list(&self, user: &str) -> PathBuf {
        self.root
            .join(format!("{}_anime_list.{}", user, WORKBOOK_EXTENSION))
    }

    /// Whether a path names a workbook this tool can read
    pub fn is_workbook(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext == WORKBOOK_EXTENSION)
    }
}
