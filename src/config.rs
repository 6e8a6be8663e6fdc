//! Deployment configuration loader for locating the asset manifest.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::manifest::{FsManifestSource, MANIFEST_PATH, ManifestStore};

const DEFAULT_CONFIG_FILE: &str = "assets.config.json";

/// Discoverable configuration describing where fingerprinted assets live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory served as the web root, holding the manifest and the assets.
    pub public_root: String,
    /// Manifest location relative to the public root.
    pub manifest_path: String,
    /// Whether rendered tags should carry `integrity` attributes.
    pub use_hash: bool,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            public_root: "public".into(),
            manifest_path: MANIFEST_PATH.into(),
            use_hash: false,
        }
    }
}

impl AssetConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// When the configuration file does not exist or fails to parse we fallback to default
    /// values so downstream callers can continue operating with sensible assumptions.
    pub fn discover(base_dir: &Path) -> Self {
        let candidate = base_dir.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl AssetConfig {
    /// Full path of the manifest file described by this configuration.
    pub fn manifest_file(&self) -> PathBuf {
        Path::new(&self.public_root).join(&self.manifest_path)
    }

    /// Build the manifest store this configuration points at.
    pub fn store(&self) -> ManifestStore {
        let source =
            FsManifestSource::new(&self.public_root).with_manifest_path(&self.manifest_path);
        ManifestStore::new(source)
    }
}
