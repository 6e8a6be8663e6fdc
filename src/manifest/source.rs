//! Read seam between the manifest store and its backing storage.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Manifest location relative to the public root, as written by the build pipeline.
pub const MANIFEST_PATH: &str = "assets/manifest.json";

/// A source the manifest document can be read from.
///
/// The store reads through this seam at most once per lifetime, so implementations
/// only need to produce the raw JSON text. Failures are folded into
/// [`ManifestError::Read`](crate::manifest::ManifestError) by the store.
pub trait ManifestSource {
    /// Path-like description of the manifest location, used in errors and logs.
    fn describe(&self) -> PathBuf;

    /// Read the entire manifest document.
    fn load(&self) -> Result<String>;
}

/// Filesystem source reading the manifest from underneath a public root directory.
#[derive(Debug, Clone)]
pub struct FsManifestSource {
    public_root: PathBuf,
    manifest_path: PathBuf,
}

impl FsManifestSource {
    /// Create a source rooted at the directory holding the publicly served files.
    ///
    /// The manifest is expected at [`MANIFEST_PATH`] under the root.
    pub fn new(public_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
            manifest_path: PathBuf::from(MANIFEST_PATH),
        }
    }

    /// Override the manifest location relative to the public root.
    pub fn with_manifest_path(mut self, manifest_path: impl Into<PathBuf>) -> Self {
        self.manifest_path = manifest_path.into();
        self
    }

    /// Full path of the manifest file under the public root.
    pub fn manifest_file(&self) -> PathBuf {
        self.public_root.join(&self.manifest_path)
    }
}

impl ManifestSource for FsManifestSource {
    fn describe(&self) -> PathBuf {
        self.manifest_file()
    }

    fn load(&self) -> Result<String> {
        let path = self.manifest_file();
        fs::read_to_string(&path)
            .with_context(|| format!("manifest not found at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_manifest_from_public_root() {
        let dir = tempdir().unwrap();
        let assets_dir = dir.path().join("assets");
        fs::create_dir_all(&assets_dir).unwrap();
        fs::write(assets_dir.join("manifest.json"), "{}").unwrap();

        let source = FsManifestSource::new(dir.path());
        assert_eq!(source.load().unwrap(), "{}");
        assert_eq!(source.describe(), dir.path().join("assets/manifest.json"));
    }

    #[test]
    fn missing_manifest_reports_its_path() {
        let dir = tempdir().unwrap();
        let source = FsManifestSource::new(dir.path());

        let err = source.load().unwrap_err();
        assert!(err.to_string().contains("manifest not found"));
    }

    #[test]
    fn manifest_path_can_be_overridden() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("rev-manifest.json"), r#"{"a": 1}"#).unwrap();

        let source = FsManifestSource::new(dir.path()).with_manifest_path("rev-manifest.json");
        assert_eq!(source.load().unwrap(), r#"{"a": 1}"#);
    }
}
