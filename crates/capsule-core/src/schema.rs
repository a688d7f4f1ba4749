//! # Capsule Schema
//!
//! Record shapes for tours, places and guides as they appear in content JSON.
//!
//! Two schema eras coexist on one record type:
//! - the flat era: `content: { surface, body }` and top-level scalars
//!   (`region`, `duration`, `priceFrom`, `season`, ...)
//! - the v2 era: layered `content: { surface, middle, deep }`, a nested
//!   `meta` object and weighted links with type-prefixed `target`s
//!
//! Both may be present on the same record. This module only models what was
//! written; choosing which era wins for a field is the job of
//! [`crate::normalize`].
//!
//! ## Loose Validation
//!
//! Only `type` and `slug` can fail a record. Unknown fields are ignored, and
//! an optional field holding a value of the wrong shape reads as absent. A
//! link that cannot be parsed at all (no `rel`, or not an object) is dropped
//! from the record's link list.

use crate::primitives::{DEFAULT_LANG, ID_SEPARATOR};
use crate::types::{CapsuleKind, Relation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::borrow::Cow;
use std::collections::BTreeMap;

// =============================================================================
// LENIENT FIELD READERS
// =============================================================================

/// Read an optional field; a value of the wrong shape becomes `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Read a text field; anything but a string becomes the empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient(deserializer).map(Option::unwrap_or_default)
}

fn lenient_lang<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient(deserializer).map(|lang: Option<String>| lang.unwrap_or_else(default_lang))
}

/// Read a link list, keeping every entry that parses as a [`Link`].
fn lenient_links<'de, D>(deserializer: D) -> Result<Option<Vec<Link>>, D::Error>
where
    D: Deserializer<'de>,
{
    let serde_json::Value::Array(items) = serde_json::Value::deserialize(deserializer)? else {
        return Ok(None);
    };

    let links = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(link) => Some(link),
            Err(e) => {
                tracing::debug!(error = %e, "unparseable link dropped");
                None
            }
        })
        .collect();

    Ok(Some(links))
}

// =============================================================================
// CAPSULE
// =============================================================================

/// The atomic content unit.
///
/// Only `type` and `slug` are required; everything else degrades to an empty
/// or absent value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capsule {
    /// Stable identifier, `"<type>-<slug>"` by convention.
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    /// Variant discriminant.
    #[serde(rename = "type")]
    pub kind: CapsuleKind,
    /// Unique, route-safe primary key.
    pub slug: String,
    /// Language tag.
    #[serde(default = "default_lang", deserialize_with = "lenient_lang")]
    pub lang: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient")]
    pub hero_image: Option<String>,
    /// Narrative content in whichever shape the record was authored.
    #[serde(default, deserialize_with = "lenient")]
    pub content: Option<Content>,
    /// v2 metadata.
    #[serde(default, deserialize_with = "lenient")]
    pub meta: Option<Meta>,
    /// Outgoing links in authored order. `None` when the record has none.
    #[serde(default, deserialize_with = "lenient_links")]
    pub links: Option<Vec<Link>>,
    /// Flat-era top-level fields.
    #[serde(flatten)]
    pub legacy: LegacyFields,
}

fn default_lang() -> String {
    DEFAULT_LANG.to_owned()
}

impl Capsule {
    /// The capsule id, derived as `"<type>-<slug>"` when the record has none.
    #[must_use]
    pub fn id(&self) -> Cow<'_, str> {
        if self.id.is_empty() {
            Cow::Owned(format!("{}{}{}", self.kind, ID_SEPARATOR, self.slug))
        } else {
            Cow::Borrowed(&self.id)
        }
    }

    /// Outgoing links; empty when the record has no `links` array.
    #[must_use]
    pub fn links(&self) -> &[Link] {
        self.links.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn is_tour(&self) -> bool {
        self.kind == CapsuleKind::Tour
    }

    #[must_use]
    pub fn is_place(&self) -> bool {
        self.kind == CapsuleKind::Place
    }
}

// =============================================================================
// CONTENT
// =============================================================================

/// Narrative content, resolved once into one of its authored shapes.
///
/// An object with `middle`, or with `deep` but no `body`, is `Layered`. Any
/// other object is `Flat`, including one holding only `surface`. The surface
/// is a hook and never stands in for the body, so such a capsule's body
/// falls back to its `summary`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawContent")]
pub enum Content {
    /// Content written directly as a Markdown string.
    Text(String),
    /// Flat era: a short hook and a Markdown body.
    Flat {
        surface: Option<String>,
        body: Option<String>,
        deep: Option<String>,
    },
    /// v2 era: three depths of the same narrative. `middle` is the body.
    Layered {
        surface: Option<String>,
        middle: Option<String>,
        deep: Option<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawContent {
    Text(String),
    Fields(ContentFields),
}

#[derive(Deserialize)]
struct ContentFields {
    #[serde(default, deserialize_with = "lenient")]
    surface: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    body: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    middle: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    deep: Option<String>,
}

impl From<RawContent> for Content {
    fn from(raw: RawContent) -> Self {
        match raw {
            RawContent::Text(text) => Self::Text(text),
            RawContent::Fields(f) => {
                // `middle` marks the layered shape; a lone `deep` without a
                // `body` is layered too.
                if f.middle.is_some() || (f.body.is_none() && f.deep.is_some()) {
                    Self::Layered {
                        surface: f.surface,
                        middle: f.middle,
                        deep: f.deep,
                    }
                } else {
                    Self::Flat {
                        surface: f.surface,
                        body: f.body,
                        deep: f.deep,
                    }
                }
            }
        }
    }
}

// =============================================================================
// METADATA
// =============================================================================

/// A field written either as a single value or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// View as a slice; a single value becomes a one-element slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

/// v2 nested metadata.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Meta {
    #[serde(default, deserialize_with = "lenient")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_from: Option<f64>,
    /// Some v2 records spell the nested price in camelCase.
    #[serde(default, rename = "priceFrom", deserialize_with = "lenient")]
    pub price_from_camel: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub season: Option<OneOrMany<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<Vec<String>>,
    /// `[lat, lng]`.
    #[serde(default, deserialize_with = "lenient")]
    pub coordinates: Option<[f64; 2]>,
}

/// Geographic point in the flat era.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Flat-era top-level fields.
///
/// Which of these are meaningful depends on the capsule's kind; the
/// normalizer hides the wrong-variant ones.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFields {
    #[serde(default, deserialize_with = "lenient")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub highlights: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub emoji: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub updated_at: Option<String>,

    // Tour fields
    #[serde(default, deserialize_with = "lenient")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_from: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_currency: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub season: Option<OneOrMany<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_group_size: Option<u32>,
    #[serde(default, deserialize_with = "lenient")]
    pub meeting_point: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub includes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub included: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub excludes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub not_included: Option<Vec<String>>,

    // Place fields
    #[serde(default, deserialize_with = "lenient")]
    pub geo: Option<GeoPoint>,
    #[serde(default, deserialize_with = "lenient")]
    pub altitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub best_time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub visit_duration: Option<String>,
}

// =============================================================================
// LINKS
// =============================================================================

/// A directed, typed edge to another capsule.
///
/// Flat records name the target with `targetSlug`; v2 records use a
/// type-prefixed `target` (`"place-gagra"`) and may carry weights.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub rel: Relation,
    #[serde(default, deserialize_with = "lenient")]
    pub target_slug: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub target: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub weights: Option<BTreeMap<String, f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub note: Option<String>,
}

impl Link {
    /// Flat-era link to a slug.
    #[must_use]
    pub fn to_slug(rel: Relation, slug: impl Into<String>) -> Self {
        Self {
            rel,
            target_slug: Some(slug.into()),
            target: None,
            weight: None,
            weights: None,
            note: None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
