//! # Ingestor Module
//!
//! Record parsing and validation for the capsule registry.
//!
//! - Parse one JSON document into one capsule
//! - Ignore unknown fields, reject only what cannot be registered
//! - Validate slugs before registration
//! - Read a content directory at build time

use crate::primitives::{MAX_RECORD_FILE_SIZE, MAX_SLUG_LENGTH, RECORD_EXTENSION};
use crate::schema::Capsule;
use crate::types::CapsuleError;
use std::path::{Path, PathBuf};

/// The Ingestor turns static content records into capsules.
pub struct Ingestor;

impl Ingestor {
    /// Validate a capsule before registration.
    ///
    /// A slug is valid if it is:
    /// - non-empty and within `MAX_SLUG_LENGTH`
    /// - free of `/` and whitespace (it is a URL path segment)
    /// - free of `[` and `]` (it must be addressable as `[[slug]]`)
    ///
    /// Returns `CapsuleError::InvalidSlug` if validation fails.
    pub fn validate(capsule: &Capsule) -> Result<(), CapsuleError> {
        let slug = capsule.slug.as_str();

        if slug.is_empty() || slug.len() > MAX_SLUG_LENGTH {
            return Err(CapsuleError::InvalidSlug(slug.to_owned()));
        }

        if slug
            .chars()
            .any(|ch| ch == '/' || ch == '[' || ch == ']' || ch.is_whitespace())
        {
            return Err(CapsuleError::InvalidSlug(slug.to_owned()));
        }

        Ok(())
    }

    /// Parse one JSON document into a capsule.
    ///
    /// Unknown fields are ignored. Only `type` and `slug` are required.
    pub fn parse_record(json: &str) -> Result<Capsule, CapsuleError> {
        serde_json::from_str(json).map_err(|e| CapsuleError::InvalidRecord(e.to_string()))
    }

    /// Read and parse one record file.
    pub fn read_record(path: &Path) -> Result<Capsule, CapsuleError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            CapsuleError::IoError(format!("Cannot read metadata of {}: {}", path.display(), e))
        })?;

        if metadata.len() > MAX_RECORD_FILE_SIZE {
            return Err(CapsuleError::InvalidRecord(format!(
                "{}: file size {} bytes exceeds maximum allowed {} bytes",
                path.display(),
                metadata.len(),
                MAX_RECORD_FILE_SIZE
            )));
        }

        let contents = std::fs::read_to_string(path)
            .map_err(|e| CapsuleError::IoError(format!("Read {}: {}", path.display(), e)))?;

        Self::parse_record(&contents).map_err(|e| match e {
            CapsuleError::InvalidRecord(msg) => {
                CapsuleError::InvalidRecord(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Load every `*.json` record under `dir`, recursively.
    ///
    /// Files are read in sorted path order so the resulting sequence, and
    /// with it the outcome of duplicate-slug overwrites, is reproducible.
    pub fn load_dir(dir: &Path) -> Result<Vec<Capsule>, CapsuleError> {
        let mut paths = Vec::new();
        collect_record_paths(dir, &mut paths)?;
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in &paths {
            tracing::debug!(path = %path.display(), "reading capsule record");
            records.push(Self::read_record(path)?);
        }

        tracing::info!(dir = %dir.display(), count = records.len(), "capsule records loaded");
        Ok(records)
    }
}

fn collect_record_paths(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), CapsuleError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| CapsuleError::IoError(format!("Cannot read directory {}: {}", dir.display(), e)))?;

    for entry in entries {
        let entry = entry.map_err(|e| CapsuleError::IoError(e.to_string()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| CapsuleError::IoError(format!("{}: {}", path.display(), e)))?;

        if file_type.is_dir() {
            collect_record_paths(&path, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(RECORD_EXTENSION))
        {
            out.push(path);
        }
    }

    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn with_slug(slug: &str) -> Capsule {
        Ingestor::parse_record(&format!(r#"{{"type":"place","slug":{:?}}}"#, slug)).expect("parse")
    }

    #[test]
    fn validate_rejects_empty_slug() {
        assert!(Ingestor::validate(&with_slug("")).is_err());
    }

    #[test]
    fn validate_rejects_unsafe_slug() {
        for slug in ["a/b", "a b", "[[x]]", "tab\there"] {
            assert!(
                matches!(Ingestor::validate(&with_slug(slug)), Err(CapsuleError::InvalidSlug(_))),
                "{slug:?} should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_overlong_slug() {
        let slug = "a".repeat(MAX_SLUG_LENGTH + 1);
        assert!(Ingestor::validate(&with_slug(&slug)).is_err());
    }

    #[test]
    fn validate_accepts_kebab_slug() {
        assert!(Ingestor::validate(&with_slug("lake-ritsa")).is_ok());
        assert!(Ingestor::validate(&with_slug("озеро-рица")).is_ok());
    }

    #[test]
    fn parse_record_requires_type_and_slug() {
        assert!(Ingestor::parse_record(r#"{"slug":"a"}"#).is_err());
        assert!(Ingestor::parse_record(r#"{"type":"tour"}"#).is_err());
        assert!(Ingestor::parse_record("not json").is_err());
    }

    #[test]
    fn load_dir_reads_nested_json_in_sorted_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tours = dir.path().join("tours");
        let places = dir.path().join("places");
        std::fs::create_dir_all(&tours).expect("mkdir");
        std::fs::create_dir_all(&places).expect("mkdir");
        std::fs::write(tours.join("t.json"), r#"{"type":"tour","slug":"t"}"#).expect("write");
        std::fs::write(places.join("b.json"), r#"{"type":"place","slug":"b"}"#).expect("write");
        std::fs::write(places.join("a.json"), r#"{"type":"place","slug":"a"}"#).expect("write");
        std::fs::write(places.join("notes.txt"), "ignored").expect("write");

        let records = Ingestor::load_dir(dir.path()).expect("load");
        let slugs: Vec<_> = records.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "t"]);
    }

    #[test]
    fn load_dir_names_the_broken_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("broken.json"), "{").expect("write");

        let err = Ingestor::load_dir(dir.path()).expect_err("broken record");
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn load_dir_missing_directory_is_io_error() {
        let result = Ingestor::load_dir(Path::new("/definitely/not/here"));
        assert!(matches!(result, Err(CapsuleError::IoError(_))));
    }
}
