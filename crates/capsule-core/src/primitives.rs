//! # Catalog Primitives
//!
//! Compiled-in constants for the capsule core.
//!
//! The catalog starts with zero records but fixed rules. These values are
//! immutable at runtime.

// =============================================================================
// ROUTES
// =============================================================================

/// Section under which tour capsules are published.
pub const TOUR_ROUTE_PREFIX: &str = "/tours";

/// Section under which place capsules are published.
pub const PLACE_ROUTE_PREFIX: &str = "/places";

/// Section under which guide capsules are published.
pub const GUIDE_ROUTE_PREFIX: &str = "/guides";

// =============================================================================
// RECORD DEFAULTS
// =============================================================================

/// Language assumed when a record omits `lang`.
pub const DEFAULT_LANG: &str = "ru";

/// Separator between the type prefix and the slug in ids and v2 link targets.
///
/// `"place-gagra"` is the place `gagra`.
pub const ID_SEPARATOR: char = '-';

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length of a slug in bytes.
///
/// Slugs become URL path segments; longer ones are rejected at ingestion.
pub const MAX_SLUG_LENGTH: usize = 128;

/// Maximum size of a single record file (4 MiB).
///
/// Records are small hand-authored JSON documents; anything larger is a
/// content-authoring mistake.
pub const MAX_RECORD_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// File extension of capsule records on disk.
pub const RECORD_EXTENSION: &str = "json";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_prefixes_are_absolute() {
        for prefix in [TOUR_ROUTE_PREFIX, PLACE_ROUTE_PREFIX, GUIDE_ROUTE_PREFIX] {
            assert!(prefix.starts_with('/'));
            assert!(!prefix.ends_with('/'));
        }
    }
}
