use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::models::{Document, Liquor};

const BOM: char = '\u{feff}';

/// JSON file holding `{"data": [...]}`, UTF-8 with a byte-order mark
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Store for `<name>.json`
    pub fn new(name: impl AsRef<Path>) -> Self {
        let mut path = name.as_ref().as_os_str().to_owned();
        path.push(".json");

        Self {
            path: PathBuf::from(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self, liquors: &[Liquor]) -> Result<()> {
        let document = Document {
            data: liquors.to_vec(),
        };
        let json = serde_json::to_string(&document)?;

        fs::write(&self.path, format!("{BOM}{json}"))
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        info!("Saved {} entries to {}", liquors.len(), self.path.display());
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<Liquor>> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let document: Document = serde_json::from_str(text.trim_start_matches(BOM))
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;

        info!(
            "Loaded {} entries from {}",
            document.data.len(),
            self.path.display()
        );
        Ok(document.data)
    }
}
