//! # Format Normalizer
//!
//! One canonical value per logical field, whichever schema era authored it.
//!
//! Every accessor is pure and total. The fallback order is part of the
//! contract and differs per field:
//!
//! | field      | first                   | then                          |
//! |------------|-------------------------|-------------------------------|
//! | body       | layered `middle`        | layered `surface`, flat `body`, text, `summary` |
//! | surface    | layered `surface`       | flat `surface`, `summary`     |
//! | price      | legacy `priceFrom`      | `meta.price_from` (tours only) |
//! | region     | `meta.region`           | legacy `region`               |
//! | duration   | legacy `duration`       | `meta.duration` (tours); `meta.duration` only otherwise |
//! | tags       | `meta.tags`             | legacy `tags`                 |
//! | seasons    | legacy `season`         | `meta.season`                 |
//! | difficulty | legacy `difficulty`     | `meta.difficulty`, `Moderate` (tours only) |
//!
//! Reading a field that belongs to another variant (a price on a place, an
//! altitude on a tour) yields `None` or an empty slice.
//!
//! Other modules read capsules through these functions only, never through
//! raw record fields.

use crate::schema::{Capsule, Content};
use crate::types::{CapsuleKind, Difficulty, Season};
use serde::Serialize;

/// Treat blank strings as absent.
fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// CONTENT
// =============================================================================

/// Main Markdown body.
///
/// Layered `middle`, then layered `surface`; flat `body`; a plain-string
/// content; then `summary`; then the empty string.
#[must_use]
pub fn body(capsule: &Capsule) -> &str {
    let from_content = match &capsule.content {
        Some(Content::Layered {
            surface, middle, ..
        }) => non_empty(middle.as_deref()).or_else(|| non_empty(surface.as_deref())),
        Some(Content::Flat { body, .. }) => non_empty(body.as_deref()),
        Some(Content::Text(text)) => non_empty(Some(text.as_str())),
        None => None,
    };

    from_content
        .or_else(|| non_empty(Some(capsule.summary.as_str())))
        .unwrap_or("")
}

/// Short hook for cards and previews.
#[must_use]
pub fn surface(capsule: &Capsule) -> &str {
    let from_content = match &capsule.content {
        Some(Content::Layered { surface, .. } | Content::Flat { surface, .. }) => {
            non_empty(surface.as_deref())
        }
        Some(Content::Text(_)) | None => None,
    };

    from_content
        .or_else(|| non_empty(Some(capsule.summary.as_str())))
        .unwrap_or("")
}

/// Optional wiki-like depth, in either content shape.
#[must_use]
pub fn deep(capsule: &Capsule) -> Option<&str> {
    match &capsule.content {
        Some(Content::Layered { deep, .. } | Content::Flat { deep, .. }) => {
            non_empty(deep.as_deref())
        }
        Some(Content::Text(_)) | None => None,
    }
}

/// Display title; the slug when the record has none.
#[must_use]
pub fn title(capsule: &Capsule) -> &str {
    non_empty(Some(capsule.title.as_str())).unwrap_or(&capsule.slug)
}

// =============================================================================
// SHARED METADATA
// =============================================================================

/// Region, v2 first.
#[must_use]
pub fn region(capsule: &Capsule) -> Option<&str> {
    non_empty(capsule.meta.as_ref().and_then(|m| m.region.as_deref()))
        .or_else(|| non_empty(capsule.legacy.region.as_deref()))
}

/// Human-readable duration.
///
/// Tours prefer the legacy top-level value; every other variant only has the
/// v2 nested one.
#[must_use]
pub fn duration(capsule: &Capsule) -> Option<&str> {
    let nested = || non_empty(capsule.meta.as_ref().and_then(|m| m.duration.as_deref()));

    if capsule.is_tour() {
        non_empty(capsule.legacy.duration.as_deref()).or_else(nested)
    } else {
        nested()
    }
}

/// Free-form tags, v2 first. Possibly empty.
#[must_use]
pub fn tags(capsule: &Capsule) -> &[String] {
    capsule
        .meta
        .as_ref()
        .and_then(|m| m.tags.as_deref())
        .or(capsule.legacy.tags.as_deref())
        .unwrap_or_default()
}

/// Seasons, always as a list.
///
/// The legacy field may be a scalar or a list; so may `meta.season`. Unknown
/// names are skipped and repeats collapse to their first occurrence.
#[must_use]
pub fn seasons(capsule: &Capsule) -> Vec<Season> {
    let raw = capsule
        .legacy
        .season
        .as_ref()
        .or_else(|| capsule.meta.as_ref().and_then(|m| m.season.as_ref()))
        .map(|s| s.as_slice())
        .unwrap_or_default();

    let mut seasons = Vec::with_capacity(raw.len());
    for name in raw {
        match Season::parse(name) {
            Some(season) if !seasons.contains(&season) => seasons.push(season),
            Some(_) => {}
            None => tracing::debug!(slug = %capsule.slug, season = %name, "unknown season skipped"),
        }
    }
    seasons
}

/// Highlights. Possibly empty.
#[must_use]
pub fn highlights(capsule: &Capsule) -> &[String] {
    capsule.legacy.highlights.as_deref().unwrap_or_default()
}

/// Decorative emoji.
#[must_use]
pub fn emoji(capsule: &Capsule) -> Option<&str> {
    non_empty(capsule.legacy.emoji.as_deref())
}

/// Coordinates as `(lat, lng)`, v2 `meta.coordinates` first, then legacy `geo`.
#[must_use]
pub fn coordinates(capsule: &Capsule) -> Option<(f64, f64)> {
    capsule
        .meta
        .as_ref()
        .and_then(|m| m.coordinates)
        .map(|[lat, lng]| (lat, lng))
        .or_else(|| capsule.legacy.geo.map(|g| (g.lat, g.lng)))
}

// =============================================================================
// TOUR-ONLY FIELDS
// =============================================================================

/// Starting price. Tours only.
///
/// Either era may be authoritative for price, so both are read; the legacy
/// top-level value wins when both are set. Fractional amounts are kept as
/// written.
#[must_use]
pub fn price(capsule: &Capsule) -> Option<f64> {
    tour_only(capsule, |c| {
        c.legacy.price_from.or_else(|| {
            c.meta
                .as_ref()
                .and_then(|m| m.price_from.or(m.price_from_camel))
        })
    })
}

/// Currency of [`price`]. Tours only.
#[must_use]
pub fn price_currency(capsule: &Capsule) -> Option<&str> {
    tour_only(capsule, |c| non_empty(c.legacy.price_currency.as_deref()))
}

/// Difficulty. Tours only; `Moderate` when the record says nothing usable.
#[must_use]
pub fn difficulty(capsule: &Capsule) -> Option<Difficulty> {
    tour_only(capsule, |c| {
        let parsed = c
            .legacy
            .difficulty
            .as_deref()
            .and_then(Difficulty::parse)
            .or_else(|| {
                c.meta
                    .as_ref()
                    .and_then(|m| m.difficulty.as_deref())
                    .and_then(Difficulty::parse)
            });
        Some(parsed.unwrap_or_default())
    })
}

/// Items included in the price. Tours only.
#[must_use]
pub fn includes(capsule: &Capsule) -> &[String] {
    tour_only(capsule, |c| {
        c.legacy
            .includes
            .as_deref()
            .or(c.legacy.included.as_deref())
    })
    .unwrap_or_default()
}

/// Items not included in the price. Tours only.
#[must_use]
pub fn excludes(capsule: &Capsule) -> &[String] {
    tour_only(capsule, |c| {
        c.legacy
            .excludes
            .as_deref()
            .or(c.legacy.not_included.as_deref())
    })
    .unwrap_or_default()
}

/// Maximum group size. Tours only.
#[must_use]
pub fn max_group_size(capsule: &Capsule) -> Option<u32> {
    tour_only(capsule, |c| c.legacy.max_group_size)
}

/// Meeting point. Tours only.
#[must_use]
pub fn meeting_point(capsule: &Capsule) -> Option<&str> {
    tour_only(capsule, |c| non_empty(c.legacy.meeting_point.as_deref()))
}

fn tour_only<'a, T>(capsule: &'a Capsule, read: impl FnOnce(&'a Capsule) -> Option<T>) -> Option<T> {
    if capsule.is_tour() {
        read(capsule)
    } else {
        None
    }
}

// =============================================================================
// PLACE-ONLY FIELDS
// =============================================================================

/// Altitude in meters. Places only.
#[must_use]
pub fn altitude(capsule: &Capsule) -> Option<f64> {
    place_only(capsule, |c| c.legacy.altitude)
}

/// Best time to visit. Places only.
#[must_use]
pub fn best_time(capsule: &Capsule) -> Option<&str> {
    place_only(capsule, |c| non_empty(c.legacy.best_time.as_deref()))
}

/// How long a visit takes. Places only; legacy `visitDuration`, then
/// `meta.duration`.
#[must_use]
pub fn visit_duration(capsule: &Capsule) -> Option<&str> {
    place_only(capsule, |c| {
        non_empty(c.legacy.visit_duration.as_deref())
            .or_else(|| non_empty(c.meta.as_ref().and_then(|m| m.duration.as_deref())))
    })
}

fn place_only<'a, T>(
    capsule: &'a Capsule,
    read: impl FnOnce(&'a Capsule) -> Option<T>,
) -> Option<T> {
    if capsule.is_place() {
        read(capsule)
    } else {
        None
    }
}

// =============================================================================
// NORMALIZED VIEW
// =============================================================================

/// Every normalized field of one capsule, ready for a template or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedCapsule<'a> {
    pub id: String,
    pub kind: CapsuleKind,
    pub slug: &'a str,
    pub lang: &'a str,
    pub title: &'a str,
    pub summary: &'a str,
    pub hero_image: Option<&'a str>,
    pub surface: &'a str,
    pub body: &'a str,
    pub deep: Option<&'a str>,
    pub region: Option<&'a str>,
    pub duration: Option<&'a str>,
    pub tags: &'a [String],
    pub seasons: Vec<Season>,
    pub highlights: &'a [String],
    pub emoji: Option<&'a str>,
    pub coordinates: Option<(f64, f64)>,
    pub price: Option<f64>,
    pub price_currency: Option<&'a str>,
    pub difficulty: Option<Difficulty>,
    pub includes: &'a [String],
    pub excludes: &'a [String],
    pub max_group_size: Option<u32>,
    pub meeting_point: Option<&'a str>,
    pub altitude: Option<f64>,
    pub best_time: Option<&'a str>,
    pub visit_duration: Option<&'a str>,
}

impl<'a> NormalizedCapsule<'a> {
    /// Normalize every field of `capsule`.
    #[must_use]
    pub fn of(capsule: &'a Capsule) -> Self {
        Self {
            id: capsule.id().into_owned(),
            kind: capsule.kind,
            slug: &capsule.slug,
            lang: &capsule.lang,
            title: title(capsule),
            summary: &capsule.summary,
            hero_image: non_empty(capsule.hero_image.as_deref()),
            surface: surface(capsule),
            body: body(capsule),
            deep: deep(capsule),
            region: region(capsule),
            duration: duration(capsule),
            tags: tags(capsule),
            seasons: seasons(capsule),
            highlights: highlights(capsule),
            emoji: emoji(capsule),
            coordinates: coordinates(capsule),
            price: price(capsule),
            price_currency: price_currency(capsule),
            difficulty: difficulty(capsule),
            includes: includes(capsule),
            excludes: excludes(capsule),
            max_group_size: max_group_size(capsule),
            meeting_point: meeting_point(capsule),
            altitude: altitude(capsule),
            best_time: best_time(capsule),
            visit_duration: visit_duration(capsule),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
