//! Loading, modelling and linting of the build-time asset manifest.
//!
//! The responsibilities are split into focused submodules so that the read seam,
//! the load-once store and the lint checks can be tested independently.

mod model;
mod source;
mod store;
mod validate;

pub use model::{AssetManifest, ManifestEntry, ManifestRecord, RawManifestValue};
pub use source::{FsManifestSource, MANIFEST_PATH, ManifestSource};
pub use store::{ManifestError, ManifestStore};
pub use validate::{ManifestFinding, ManifestProblem, validate_manifest};
