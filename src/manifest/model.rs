//! Deserialised representation of the build-time asset manifest.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Fingerprint record emitted by the build pipeline for one source file.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestRecord {
    /// Hashed output filename that replaces the original in URLs.
    #[serde(default)]
    pub src: Option<String>,
    /// Subresource-integrity digest for the hashed output, when the build emits one.
    #[serde(default)]
    pub integrity: Option<String>,
}

/// One manifest value exactly as written by the build pipeline.
///
/// Pipelines normally write `{"src": .., "integrity": ..}` records, but lookups
/// tolerate any other JSON shape by treating the entry as absent. The raw value is
/// kept so [`validate_manifest`](crate::manifest::validate_manifest) can report it.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawManifestValue {
    /// Well-formed fingerprint record.
    Record(ManifestRecord),
    /// Any other JSON shape; lookups treat the entry as unmapped.
    Other(serde_json::Value),
}

/// Parsed manifest mapping original filenames to their fingerprint values.
///
/// Keys are exact basenames as referenced in templates. The mapping is immutable
/// for the life of the owning store.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    values: BTreeMap<String, RawManifestValue>,
}

/// Outcome of a manifest lookup for a single file name.
#[derive(Debug, Clone, Copy)]
pub enum ManifestEntry<'a> {
    /// The file has a fingerprint record in the manifest.
    Hashed(&'a ManifestRecord),
    /// The file is not covered by the manifest; callers fall back to the original name.
    Unmapped,
}

impl AssetManifest {
    /// Resolve the entry for a template-referenced file name.
    pub fn entry(&self, file_name: &str) -> ManifestEntry<'_> {
        match self.values.get(file_name) {
            Some(RawManifestValue::Record(record)) => ManifestEntry::Hashed(record),
            Some(RawManifestValue::Other(_)) | None => ManifestEntry::Unmapped,
        }
    }

    /// Number of entries in the manifest.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the manifest holds no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate entries in deterministic (sorted by filename) order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawManifestValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
