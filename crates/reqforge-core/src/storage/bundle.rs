//! Generated bundle snapshot storage
//!
//! The refined import file is saved to `issues.json` in the data dir so a
//! creation run can be repeated (or inspected) without re-generating.

use crate::{models::ImportFile, Error, Result};
use std::path::PathBuf;

pub struct BundleStorage {
    data_dir: PathBuf,
}

impl BundleStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn bundle_path(&self) -> PathBuf {
        self.data_dir.join("issues.json")
    }

    pub fn save(&self, file: &ImportFile) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;

        let content = file.to_json_pretty()?;
        std::fs::write(self.bundle_path(), content)?;

        Ok(())
    }

    pub fn load(&self) -> Result<ImportFile> {
        let path = self.bundle_path();

        if !path.exists() {
            return Err(Error::NotFound(format!(
                "No saved bundle at {} (run `reqforge generate` first)",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        ImportFile::from_json(&content)
    }
}
