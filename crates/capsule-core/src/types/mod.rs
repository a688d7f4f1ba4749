//! # Core Type Definitions
//!
//! This module contains the closed vocabularies shared by every other module:
//! - Capsule variants (`CapsuleKind`)
//! - Link relations (`Relation`)
//! - Normalized scalar vocabularies (`Season`, `Difficulty`)
//! - Error types (`CapsuleError`)
//!
//! ## Loose Input
//!
//! Record fields are parsed leniently. A relation or variant name that is
//! not part of the known vocabulary is kept (`Relation::Other`,
//! `CapsuleKind::Other`) rather than rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::primitives::{GUIDE_ROUTE_PREFIX, PLACE_ROUTE_PREFIX, TOUR_ROUTE_PREFIX};

// =============================================================================
// CAPSULE KIND
// =============================================================================

/// The `type` discriminant of a capsule.
///
/// Determines which specialized fields are meaningful and which route prefix
/// the capsule is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapsuleKind {
    /// A multi-stop trip (`duration`, `priceFrom`, `difficulty`).
    Tour,
    /// A destination (`altitude`, `bestTime`).
    Place,
    /// A long-form article.
    Guide,
    /// Reserved for future catalog items. Never populated today.
    Product,
    /// Any variant name outside the known set.
    #[serde(other)]
    Other,
}

impl CapsuleKind {
    /// The variant name as written in records and id prefixes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tour => "tour",
            Self::Place => "place",
            Self::Guide => "guide",
            Self::Product => "product",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CapsuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Published path of a capsule.
///
/// Tours, places and guides live under their own section; anything else is
/// published at the site root.
#[must_use]
pub fn route_path(kind: CapsuleKind, slug: &str) -> String {
    let prefix = match kind {
        CapsuleKind::Tour => TOUR_ROUTE_PREFIX,
        CapsuleKind::Place => PLACE_ROUTE_PREFIX,
        CapsuleKind::Guide => GUIDE_ROUTE_PREFIX,
        CapsuleKind::Product | CapsuleKind::Other => "",
    };
    format!("{}/{}", prefix, slug)
}

// =============================================================================
// RELATION
// =============================================================================

/// The `rel` of a directed link between two capsules.
///
/// The vocabulary is extensible: relations the resolver does not act upon
/// are preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Relation {
    /// Tour -> place it visits.
    Contains,
    /// Place -> tour it belongs to.
    PartOf,
    /// Place -> place close by.
    Nearby,
    /// Loose association between any two capsules.
    Related,
    /// Editorial recommendation, optionally weighted.
    Recommends,
    /// v2 relevance relation, not traversed.
    IncludedIn,
    /// v2 relevance relation, not traversed.
    HasTopic,
    /// v2 relevance relation, not traversed.
    AppliesTo,
    /// v2 relevance relation, not traversed.
    EmotionalResonance,
    /// Anything else.
    Other(String),
}

impl Relation {
    /// The relation name as written in records.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Contains => "contains",
            Self::PartOf => "part_of",
            Self::Nearby => "nearby",
            Self::Related => "related",
            Self::Recommends => "recommends",
            Self::IncludedIn => "included_in",
            Self::HasTopic => "has_topic",
            Self::AppliesTo => "applies_to",
            Self::EmotionalResonance => "emotional_resonance",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for Relation {
    fn from(s: String) -> Self {
        match s.as_str() {
            "contains" => Self::Contains,
            "part_of" => Self::PartOf,
            "nearby" => Self::Nearby,
            "related" => Self::Related,
            "recommends" => Self::Recommends,
            "included_in" => Self::IncludedIn,
            "has_topic" => Self::HasTopic,
            "applies_to" => Self::AppliesTo,
            "emotional_resonance" => Self::EmotionalResonance,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for Relation {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<Relation> for String {
    fn from(rel: Relation) -> Self {
        match rel {
            Relation::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// NORMALIZED VOCABULARIES
// =============================================================================

/// Season in which a capsule is relevant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
    /// Year-round (`"all"` in records).
    All,
}

impl Season {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::All => "all",
        }
    }

    /// Parse a season name. Returns `None` for unknown names.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winter" => Some(Self::Winter),
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "autumn" | "fall" => Some(Self::Autumn),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// Tour difficulty.
///
/// The flat era wrote `moderate`, the v2 era `medium`; both mean the same.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Moderate,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Hard => "hard",
        }
    }

    /// Parse a difficulty name. Returns `None` for unknown names.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "moderate" | "medium" => Some(Self::Moderate),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while building or loading a catalog.
///
/// Query-time reads never fail: a missing capsule is `None` and a missing
/// relation is an empty result. These variants cover construction, file I/O
/// and configuration only.
#[derive(Debug, Error)]
pub enum CapsuleError {
    /// A record could not be parsed into a capsule.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A slug is empty or not route-safe.
    #[error("Invalid slug: {0:?}")]
    InvalidSlug(String),

    /// Two records share a slug and the registry is in strict mode.
    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),

    /// A requested capsule does not exist.
    #[error("Capsule not found: {0}")]
    NotFound(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// A configuration file or value is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A catalog audit found dangling links or unresolved references.
    #[error("Catalog check failed: {0} issue(s)")]
    CheckFailed(usize),
}

// =============================================================================
// TESTS
// =============================================================================
