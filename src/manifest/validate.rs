//! Lint checks for manifests produced by the build pipeline.

use std::fmt;

use base64::{Engine as _, engine::general_purpose};
use regex::Regex;

use crate::manifest::model::{AssetManifest, ManifestRecord, RawManifestValue};

fn sri_pattern() -> &'static Regex {
    use std::sync::OnceLock;

    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(sha256|sha384|sha512)-([A-Za-z0-9+/]+={0,2})$")
            .expect("invalid SRI regex")
    })
}

fn expected_digest_len(algorithm: &str) -> usize {
    match algorithm {
        "sha256" => 32,
        "sha384" => 48,
        _ => 64,
    }
}

/// Problems [`validate_manifest`] can report for a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestProblem {
    /// The value is not a fingerprint record.
    UnexpectedShape,
    /// The record carries no usable `src`, so URLs for this file never rewrite.
    MissingSrc,
    /// `src` holds a path rather than a bare output filename.
    SrcNotBasename,
    /// The integrity value does not follow the `<algorithm>-<base64>` SRI form.
    MalformedIntegrity,
    /// The decoded digest length does not match the declared algorithm.
    DigestLength {
        /// Algorithm named by the digest prefix.
        algorithm: String,
        /// Digest length the algorithm produces.
        expected: usize,
        /// Length the base64 payload actually decodes to.
        found: usize,
    },
}

impl fmt::Display for ManifestProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedShape => write!(f, "value is not a fingerprint record"),
            Self::MissingSrc => write!(f, "record has no src, URLs will not rewrite"),
            Self::SrcNotBasename => write!(f, "src contains a path separator"),
            Self::MalformedIntegrity => write!(f, "integrity is not a well-formed SRI digest"),
            Self::DigestLength {
                algorithm,
                expected,
                found,
            } => write!(
                f,
                "{algorithm} digest decodes to {found} bytes, expected {expected}"
            ),
        }
    }
}

/// A single problem found while linting a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFinding {
    /// Manifest key the finding refers to.
    pub file: String,
    /// Problem detected for the entry.
    pub problem: ManifestProblem,
}

impl fmt::Display for ManifestFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file, self.problem)
    }
}

/// Lint a parsed manifest, reporting entries that will degrade at resolution time.
///
/// Findings are diagnostics rather than errors: resolution keeps working (with
/// fallbacks) in their presence. An empty result means the build output is clean.
/// Entries are reported in filename order.
pub fn validate_manifest(manifest: &AssetManifest) -> Vec<ManifestFinding> {
    let mut findings = Vec::new();

    for (file, value) in manifest.iter() {
        match value {
            RawManifestValue::Record(record) => {
                check_record(file, record, &mut findings);
            }
            RawManifestValue::Other(_) => {
                findings.push(ManifestFinding {
                    file: file.to_string(),
                    problem: ManifestProblem::UnexpectedShape,
                });
            }
        }
    }

    findings
}

fn check_record(file: &str, record: &ManifestRecord, findings: &mut Vec<ManifestFinding>) {
    match record.src.as_deref() {
        None | Some("") => findings.push(ManifestFinding {
            file: file.to_string(),
            problem: ManifestProblem::MissingSrc,
        }),
        Some(src) if src.contains('/') || src.contains('\\') => {
            findings.push(ManifestFinding {
                file: file.to_string(),
                problem: ManifestProblem::SrcNotBasename,
            });
        }
        Some(_) => {}
    }

    if let Some(integrity) = record.integrity.as_deref() {
        if let Some(problem) = check_integrity(integrity) {
            findings.push(ManifestFinding {
                file: file.to_string(),
                problem,
            });
        }
    }
}

fn check_integrity(integrity: &str) -> Option<ManifestProblem> {
    let Some(captures) = sri_pattern().captures(integrity) else {
        return Some(ManifestProblem::MalformedIntegrity);
    };

    let algorithm = &captures[1];
    let Ok(digest) = general_purpose::STANDARD.decode(&captures[2]) else {
        return Some(ManifestProblem::MalformedIntegrity);
    };

    let expected = expected_digest_len(algorithm);
    if digest.len() != expected {
        return Some(ManifestProblem::DigestLength {
            algorithm: algorithm.to_string(),
            expected,
            found: digest.len(),
        });
    }

    None
}
