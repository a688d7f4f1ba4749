//! # Graph Resolver
//!
//! Relationship queries over the capsule link graph.
//!
//! Links are directed, typed edges stored on the source capsule in authored
//! order. Every query:
//! - resolves targets through the [`Registry`]
//! - silently drops targets that do not resolve, or resolve to the wrong kind
//! - preserves link order
//! - never fails; a capsule without links yields an empty result

use crate::primitives::ID_SEPARATOR;
use crate::registry::Registry;
use crate::schema::{Capsule, Link};
use crate::types::{CapsuleKind, Relation};
use serde::Serialize;
use std::cmp::Ordering;

/// Kind prefixes a v2 `target` may carry.
const TARGET_KIND_PREFIXES: [CapsuleKind; 4] = [
    CapsuleKind::Tour,
    CapsuleKind::Place,
    CapsuleKind::Guide,
    CapsuleKind::Product,
];

/// Slug a link points at.
///
/// `targetSlug` is used as-is. Otherwise a v2 `target` has its type prefix
/// stripped (`"place-gagra"` -> `"gagra"`); a `target` without a known prefix
/// is taken as a slug. Returns `None` when the link names no target.
#[must_use]
pub fn target_slug(link: &Link) -> Option<&str> {
    if let Some(slug) = link.target_slug.as_deref().filter(|s| !s.is_empty()) {
        return Some(slug);
    }

    let target = link.target.as_deref().filter(|s| !s.is_empty())?;
    let stripped = TARGET_KIND_PREFIXES.iter().find_map(|kind| {
        target
            .strip_prefix(kind.as_str())
            .and_then(|rest| rest.strip_prefix(ID_SEPARATOR))
    });

    match stripped {
        Some("") => None,
        Some(slug) => Some(slug),
        None => Some(target),
    }
}

/// A link that points nowhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingLink {
    /// Slug of the capsule carrying the link.
    pub source: String,
    /// Relation of the link.
    pub rel: Relation,
    /// Target as written (`targetSlug` or `target`), `None` if missing.
    pub target: Option<String>,
}

/// An incoming edge: `source` links to the queried capsule with `rel`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backlink<'a> {
    pub source: &'a Capsule,
    pub rel: &'a Relation,
}

/// Read-only traversal over a registry.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a Registry,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over `registry`.
    #[must_use]
    pub const fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Resolved targets of `capsule`'s links with relation `rel`, in link
    /// order. Unresolved targets are skipped.
    pub fn targets<'c>(
        &self,
        capsule: &'c Capsule,
        rel: &'c Relation,
    ) -> impl Iterator<Item = &'a Capsule> + 'c
    where
        'a: 'c,
    {
        let registry = self.registry;
        capsule
            .links()
            .iter()
            .filter(move |link| &link.rel == rel)
            .filter_map(target_slug)
            .filter_map(move |slug| registry.get(slug))
    }

    fn targets_of_kind(&self, capsule: &Capsule, rel: &Relation, kind: CapsuleKind) -> Vec<&'a Capsule> {
        self.targets(capsule, rel).filter(|c| c.kind == kind).collect()
    }

    /// Places a tour visits (`contains` links).
    #[must_use]
    pub fn children_of(&self, tour: &Capsule) -> Vec<&'a Capsule> {
        self.targets_of_kind(tour, &Relation::Contains, CapsuleKind::Place)
    }

    /// Tour a place belongs to.
    ///
    /// Only the first `part_of` link is considered; later ones are ignored
    /// even if the first does not resolve to a tour.
    #[must_use]
    pub fn parent_of(&self, place: &Capsule) -> Option<&'a Capsule> {
        place
            .links()
            .iter()
            .find(|link| link.rel == Relation::PartOf)
            .and_then(target_slug)
            .and_then(|slug| self.registry.find_tour(slug))
    }

    /// Places near a place (`nearby` links).
    #[must_use]
    pub fn neighbors_of(&self, place: &Capsule) -> Vec<&'a Capsule> {
        self.targets_of_kind(place, &Relation::Nearby, CapsuleKind::Place)
    }

    /// Capsules of any kind linked with `related`.
    #[must_use]
    pub fn related_of(&self, capsule: &Capsule) -> Vec<&'a Capsule> {
        self.targets(capsule, &Relation::Related).collect()
    }

    /// Capsules linked with `recommends`, heaviest weight first.
    ///
    /// The sort is stable; links without a weight keep their relative order
    /// after all weighted ones.
    #[must_use]
    pub fn recommendations_of(&self, capsule: &Capsule) -> Vec<&'a Capsule> {
        let mut weighted: Vec<(Option<f64>, &'a Capsule)> = capsule
            .links()
            .iter()
            .filter(|link| link.rel == Relation::Recommends)
            .filter_map(|link| {
                let target = self.registry.get(target_slug(link)?)?;
                Some((link.weight, target))
            })
            .collect();

        weighted.sort_by(|(a, _), (b, _)| match (a, b) {
            (Some(a), Some(b)) => b.total_cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        weighted.into_iter().map(|(_, c)| c).collect()
    }

    /// Backlinks: capsules whose `rel` links point at `slug`, in registry
    /// order.
    #[must_use]
    pub fn linked_by(&self, slug: &str, rel: &Relation) -> Vec<&'a Capsule> {
        self.registry
            .all()
            .iter()
            .filter(|source| {
                source
                    .links()
                    .iter()
                    .any(|link| &link.rel == rel && target_slug(link) == Some(slug))
            })
            .collect()
    }

    /// Every link pointing at `slug`, whatever its relation.
    ///
    /// One entry per link, in registry order and then link order. A source
    /// linking twice appears twice.
    #[must_use]
    pub fn backlinks_of(&self, slug: &str) -> Vec<Backlink<'a>> {
        self.registry
            .all()
            .iter()
            .flat_map(|source| {
                source
                    .links()
                    .iter()
                    .filter(move |link| target_slug(link) == Some(slug))
                    .map(move |link| Backlink {
                        source,
                        rel: &link.rel,
                    })
            })
            .collect()
    }

    /// Every link in the catalog whose target is missing or unregistered.
    ///
    /// In a correctly populated catalog this is empty.
    #[must_use]
    pub fn dangling_links(&self) -> Vec<DanglingLink> {
        let mut dangling = Vec::new();

        for source in self.registry.all() {
            for link in source.links() {
                let resolved = target_slug(link).is_some_and(|slug| self.registry.contains(slug));
                if !resolved {
                    let target = link
                        .target_slug
                        .clone()
                        .or_else(|| link.target.clone());
                    tracing::warn!(
                        source = %source.slug,
                        rel = %link.rel,
                        target = target.as_deref().unwrap_or("<none>"),
                        "dangling capsule link"
                    );
                    dangling.push(DanglingLink {
                        source: source.slug.clone(),
                        rel: link.rel.clone(),
                        target,
                    });
                }
            }
        }

        dangling
    }
}

// =============================================================================
// TESTS
// =============================================================================
