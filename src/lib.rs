#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod manifest;
pub mod resolver;

pub use config::AssetConfig;
pub use manifest::{AssetManifest, FsManifestSource, ManifestError, ManifestSource, ManifestStore};
pub use resolver::AssetResolver;
