//! Translation of template resource paths into URLs, digests and HTML tags.

mod paths;
mod tags;

use crate::manifest::{ManifestEntry, ManifestError, ManifestStore};
use paths::{file_name_of, rewrite_resource};
use tags::open_tag;

/// Resolves template asset references against the build manifest.
///
/// Holds a borrow of the [`ManifestStore`] injected by the application's
/// composition root plus the flag controlling integrity emission, so it is cheap
/// to construct per template render.
#[derive(Debug, Clone, Copy)]
pub struct AssetResolver<'a> {
    store: &'a ManifestStore,
    use_hash: bool,
}

impl<'a> AssetResolver<'a> {
    /// Create a resolver over the provided store.
    ///
    /// `use_hash` controls whether rendered tags attempt an `integrity` attribute
    /// at all; the per-entry digest controls whether its value is non-empty.
    pub fn new(store: &'a ManifestStore, use_hash: bool) -> Self {
        Self { store, use_hash }
    }

    /// Cache-busted URL for a resource path.
    ///
    /// Only the file name (the segment after the last `/`) is looked up; the
    /// directory prefix is preserved. Resources without a manifest entry come back
    /// unchanged, which is the expected state for files the pipeline never
    /// fingerprinted.
    pub fn url(&self, resource: &str) -> Result<String, ManifestError> {
        let manifest = self.store.get()?;
        let file_name = file_name_of(resource);
        let hashed = match manifest.entry(file_name) {
            ManifestEntry::Hashed(record) => record.src.as_deref().unwrap_or(file_name),
            ManifestEntry::Unmapped => {
                tracing::trace!(resource, "resource not in asset manifest");
                file_name
            }
        };

        Ok(rewrite_resource(resource, file_name, hashed))
    }

    /// Subresource-integrity digest for a resource path.
    ///
    /// Returns the manifest digest verbatim, or the empty string when the resource
    /// or its digest is not in the manifest. Only a missing manifest is an error.
    pub fn integrity(&self, resource: &str) -> Result<String, ManifestError> {
        let manifest = self.store.get()?;
        let digest = match manifest.entry(file_name_of(resource)) {
            ManifestEntry::Hashed(record) => record.integrity.as_deref().unwrap_or(""),
            ManifestEntry::Unmapped => "",
        };

        Ok(digest.to_string())
    }

    /// Stylesheet `<link>` tag for a resource.
    pub fn css_tag(&self, resource: &str) -> Result<String, ManifestError> {
        let href = self.url(resource)?;
        let digest = self.integrity_attribute(resource)?;

        let mut attributes = vec![
            ("href", href.as_str()),
            ("rel", "stylesheet preload"),
            ("as", "style"),
            ("crossorigin", "anonymous"),
            ("referrerpolicy", "no-referrer"),
        ];
        if let Some(digest) = digest.as_deref() {
            attributes.push(("integrity", digest));
        }

        Ok(open_tag("link", &attributes))
    }

    /// Script `<script>` tag for a resource, always explicitly closed.
    pub fn js_tag(&self, resource: &str) -> Result<String, ManifestError> {
        let src = self.url(resource)?;
        let digest = self.integrity_attribute(resource)?;

        let mut attributes = vec![("src", src.as_str()), ("crossorigin", "anonymous")];
        if let Some(digest) = digest.as_deref() {
            attributes.push(("integrity", digest));
        }

        Ok(format!("{}</script>", open_tag("script", &attributes)))
    }

    fn integrity_attribute(&self, resource: &str) -> Result<Option<String>, ManifestError> {
        if self.use_hash {
            Ok(Some(self.integrity(resource)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestSource;
    use std::path::PathBuf;

    struct StaticSource(&'static str);

    impl ManifestSource for StaticSource {
        fn describe(&self) -> PathBuf {
            PathBuf::from("assets/manifest.json")
        }

        fn load(&self) -> anyhow::Result<String> {
            Ok(self.0.to_string())
        }
    }

    fn store(document: &'static str) -> ManifestStore {
        ManifestStore::new(StaticSource(document))
    }

    fn broken_store() -> ManifestStore {
        struct BrokenSource;

        impl ManifestSource for BrokenSource {
            fn describe(&self) -> PathBuf {
                PathBuf::from("assets/manifest.json")
            }

            fn load(&self) -> anyhow::Result<String> {
                Err(anyhow::anyhow!("permission denied"))
            }
        }

        ManifestStore::new(BrokenSource)
    }

    const FIXTURE: &str =
        r#"{"app.js": {"src": "app.abc123.js", "integrity": "sha384-XYZ"}}"#;

    #[test]
    fn rewrites_mapped_resources_and_keeps_the_prefix() {
        let store = store(FIXTURE);
        let resolver = AssetResolver::new(&store, false);

        assert_eq!(resolver.url("js/app.js").unwrap(), "js/app.abc123.js");
        assert_eq!(resolver.url("app.js").unwrap(), "app.abc123.js");
    }

    #[test]
    fn unmapped_resources_pass_through_unchanged() {
        let store = store(FIXTURE);
        let resolver = AssetResolver::new(&store, false);

        assert_eq!(resolver.url("css/site.css").unwrap(), "css/site.css");
        assert_eq!(resolver.integrity("css/site.css").unwrap(), "");
    }

    #[test]
    fn empty_manifests_resolve_without_errors() {
        let store = store("{}");
        let resolver = AssetResolver::new(&store, false);

        assert_eq!(resolver.url("css/site.css").unwrap(), "css/site.css");
    }

    #[test]
    fn integrity_is_returned_verbatim() {
        let store = store(FIXTURE);
        let resolver = AssetResolver::new(&store, true);

        assert_eq!(resolver.integrity("js/app.js").unwrap(), "sha384-XYZ");
    }

    #[test]
    fn records_without_src_keep_the_url_but_serve_integrity() {
        let store = store(r#"{"app.js": {"integrity": "sha384-XYZ"}}"#);
        let resolver = AssetResolver::new(&store, true);

        assert_eq!(resolver.url("js/app.js").unwrap(), "js/app.js");
        assert_eq!(resolver.integrity("js/app.js").unwrap(), "sha384-XYZ");
    }

    #[test]
    fn bare_string_values_behave_as_unmapped() {
        let store = store(r#"{"app.js": "app.abc123.js"}"#);
        let resolver = AssetResolver::new(&store, true);

        assert_eq!(resolver.url("js/app.js").unwrap(), "js/app.js");
        assert_eq!(resolver.integrity("js/app.js").unwrap(), "");
    }

    #[test]
    fn directory_segments_equal_to_the_file_name_are_rewritten_first() {
        let store = store(r#"{"app.css": {"src": "app.abc123.css"}}"#);
        let resolver = AssetResolver::new(&store, false);

        assert_eq!(
            resolver.url("app.css/app.css").unwrap(),
            "app.abc123.css/app.css"
        );
    }

    #[test]
    fn css_tags_carry_the_fixed_attribute_order() {
        let store = store(r#"{"app.css": {"src": "app.9ad6c9d1.css", "integrity": "sha384-CSS"}}"#);
        let resolver = AssetResolver::new(&store, true);

        assert_eq!(
            resolver.css_tag("css/app.css").unwrap(),
            r#"<link href="css/app.9ad6c9d1.css" rel="stylesheet preload" as="style" crossorigin="anonymous" referrerpolicy="no-referrer" integrity="sha384-CSS">"#
        );
    }

    #[test]
    fn css_tags_omit_integrity_when_hashing_is_disabled() {
        let store = store(r#"{"app.css": {"src": "app.9ad6c9d1.css", "integrity": "sha384-CSS"}}"#);
        let resolver = AssetResolver::new(&store, false);

        assert_eq!(
            resolver.css_tag("css/app.css").unwrap(),
            r#"<link href="css/app.9ad6c9d1.css" rel="stylesheet preload" as="style" crossorigin="anonymous" referrerpolicy="no-referrer">"#
        );
    }

    #[test]
    fn js_tags_close_explicitly() {
        let store = store(FIXTURE);
        let resolver = AssetResolver::new(&store, true);

        assert_eq!(
            resolver.js_tag("js/app.js").unwrap(),
            r#"<script src="js/app.abc123.js" crossorigin="anonymous" integrity="sha384-XYZ"></script>"#
        );
    }

    #[test]
    fn unmapped_resources_render_an_empty_integrity_when_hashing_is_on() {
        let store = store("{}");
        let resolver = AssetResolver::new(&store, true);

        assert_eq!(
            resolver.js_tag("js/vendor.js").unwrap(),
            r#"<script src="js/vendor.js" crossorigin="anonymous" integrity=""></script>"#
        );
    }

    #[test]
    fn every_operation_fails_when_the_manifest_is_unavailable() {
        let store = broken_store();
        let resolver = AssetResolver::new(&store, true);

        assert!(matches!(
            resolver.url("js/app.js"),
            Err(ManifestError::Read { .. })
        ));
        assert!(matches!(
            resolver.integrity("js/app.js"),
            Err(ManifestError::Read { .. })
        ));
        assert!(matches!(
            resolver.css_tag("css/app.css"),
            Err(ManifestError::Read { .. })
        ));
        assert!(matches!(
            resolver.js_tag("js/app.js"),
            Err(ManifestError::Read { .. })
        ));
    }
}
