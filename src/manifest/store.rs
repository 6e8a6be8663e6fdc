//! Load-once caching of the parsed asset manifest.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::manifest::model::AssetManifest;
use crate::manifest::source::{FsManifestSource, ManifestSource};

/// Error raised when the asset manifest cannot be provided.
///
/// Either variant means the manifest is missing or unusable, which indicates a
/// broken build; the host application decides the user-visible behavior. A missing
/// manifest *entry* is never an error: resolvers fall back to the unhashed
/// filename instead.
#[derive(Debug, Clone)]
pub enum ManifestError {
    /// The manifest could not be read from its source.
    Read {
        /// Location the source reported for the manifest.
        path: PathBuf,
        /// Underlying source failure.
        source: Arc<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// The manifest was read but did not parse to a usable mapping.
    Parse {
        /// Location the source reported for the manifest.
        path: PathBuf,
        /// Source parse error.
        source: Arc<serde_json::Error>,
    },
}

impl ManifestError {
    fn read(path: PathBuf, source: anyhow::Error) -> Self {
        let source: Box<dyn std::error::Error + Send + Sync + 'static> = source.into();
        Self::Read {
            path,
            source: Arc::from(source),
        }
    }

    /// Manifest location the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read asset manifest at {}: {}", path.display(), source)
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse asset manifest at {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source.as_ref()),
            Self::Parse { source, .. } => Some(source.as_ref()),
        }
    }
}

/// Load-once cache for the parsed asset manifest.
///
/// Created unset by the application's composition root and shared by reference
/// with resolvers. The backing source is read on first access and the outcome,
/// success or failure, is cached for the life of the store: a broken manifest
/// keeps failing with the same [`ManifestError`] until the store is recreated.
pub struct ManifestStore {
    source: Box<dyn ManifestSource + Send + Sync>,
    cell: OnceLock<Result<AssetManifest, ManifestError>>,
}

impl ManifestStore {
    /// Create a store reading through the provided source.
    pub fn new(source: impl ManifestSource + Send + Sync + 'static) -> Self {
        Self {
            source: Box::new(source),
            cell: OnceLock::new(),
        }
    }

    /// Convenience constructor for the common filesystem layout.
    ///
    /// Equivalent to wrapping an [`FsManifestSource`] for the given public root.
    pub fn from_public_root(public_root: impl Into<PathBuf>) -> Self {
        Self::new(FsManifestSource::new(public_root))
    }

    /// Location the backing source reports for the manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.source.describe()
    }

    /// The parsed manifest, loading it on first access.
    ///
    /// At most one read and parse happens per store; concurrent first callers wait
    /// for the in-flight load rather than issuing their own.
    pub fn get(&self) -> Result<&AssetManifest, ManifestError> {
        self.cell
            .get_or_init(|| self.load())
            .as_ref()
            .map_err(|err| err.clone())
    }

    fn load(&self) -> Result<AssetManifest, ManifestError> {
        let path = self.source.describe();
        let document = match self.source.load() {
            Ok(document) => document,
            Err(source) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "asset manifest unreadable"
                );
                return Err(ManifestError::read(path, source));
            }
        };

        match serde_json::from_str::<AssetManifest>(&document) {
            Ok(manifest) => {
                tracing::debug!(
                    path = %path.display(),
                    entries = manifest.len(),
                    "asset manifest loaded"
                );
                Ok(manifest)
            }
            Err(source) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %source,
                    "asset manifest is not a usable mapping"
                );
                Err(ManifestError::Parse {
                    path,
                    source: Arc::new(source),
                })
            }
        }
    }
}

impl fmt::Debug for ManifestStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManifestStore")
            .field("source", &self.source.describe())
            .field("loaded", &self.cell.get().is_some())
            .finish()
    }
}
