//! # Catalog Module
//!
//! The read API handed to the presentation layer.
//!
//! A `Catalog` owns a [`Registry`] and exposes lookups, normalized field
//! accessors, graph queries and deep-link rewriting behind one value. Page
//! components call these methods and never touch raw records.
//!
//! Nothing here mutates after construction, so a `Catalog` can be shared
//! across concurrent renders by reference.

use crate::deeplink;
use crate::ingestor::Ingestor;
use crate::normalize;
use crate::registry::{DuplicatePolicy, Registry};
use crate::resolver::{Backlink, DanglingLink, Resolver};
use crate::schema::Capsule;
use crate::types::{CapsuleError, CapsuleKind, route_path};
use serde::Serialize;
use std::path::Path;

/// An unresolved `[[slug]]` reference found in a capsule body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    /// Slug of the capsule whose body contains the reference.
    pub source: String,
    /// The token inside the brackets.
    pub token: String,
}

/// Immutable, queryable capsule catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    registry: Registry,
}

impl Catalog {
    /// Wrap an already built registry.
    #[must_use]
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Build a catalog from capsule records.
    pub fn from_records(
        records: impl IntoIterator<Item = Capsule>,
        policy: DuplicatePolicy,
    ) -> Result<Self, CapsuleError> {
        Registry::build(records, policy).map(Self::new)
    }

    /// Load every record under `dir` and build a catalog.
    pub fn load_dir(dir: impl AsRef<Path>, policy: DuplicatePolicy) -> Result<Self, CapsuleError> {
        let records = Ingestor::load_dir(dir.as_ref())?;
        Self::from_records(records, policy)
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// A resolver over this catalog.
    #[must_use]
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.registry)
    }

    // =========================================================================
    // LISTING & LOOKUP
    // =========================================================================

    /// Every capsule, in registration order.
    #[must_use]
    pub fn all(&self) -> &[Capsule] {
        self.registry.all()
    }

    /// Capsule of any kind by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Capsule> {
        self.registry.get(slug)
    }

    #[must_use]
    pub fn list_tours(&self) -> Vec<&Capsule> {
        self.registry.tours()
    }

    #[must_use]
    pub fn list_places(&self) -> Vec<&Capsule> {
        self.registry.places()
    }

    #[must_use]
    pub fn list_guides(&self) -> Vec<&Capsule> {
        self.registry.guides()
    }

    #[must_use]
    pub fn find_tour(&self, slug: &str) -> Option<&Capsule> {
        self.registry.find_tour(slug)
    }

    #[must_use]
    pub fn find_place(&self, slug: &str) -> Option<&Capsule> {
        self.registry.find_place(slug)
    }

    #[must_use]
    pub fn find_guide(&self, slug: &str) -> Option<&Capsule> {
        self.registry.find_guide(slug)
    }

    /// Slugs of every capsule of `kind`, for static-params generation.
    #[must_use]
    pub fn slugs_of_kind(&self, kind: CapsuleKind) -> Vec<&str> {
        self.registry
            .all_of_kind(kind)
            .map(|c| c.slug.as_str())
            .collect()
    }

    #[must_use]
    pub fn tour_slugs(&self) -> Vec<&str> {
        self.slugs_of_kind(CapsuleKind::Tour)
    }

    #[must_use]
    pub fn place_slugs(&self) -> Vec<&str> {
        self.slugs_of_kind(CapsuleKind::Place)
    }

    #[must_use]
    pub fn guide_slugs(&self) -> Vec<&str> {
        self.slugs_of_kind(CapsuleKind::Guide)
    }

    /// Published path of every capsule, in registration order.
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.all()
            .iter()
            .map(|c| route_path(c.kind, &c.slug))
            .collect()
    }

    // =========================================================================
    // GRAPH
    // =========================================================================

    #[must_use]
    pub fn children_of(&self, tour: &Capsule) -> Vec<&Capsule> {
        self.resolver().children_of(tour)
    }

    #[must_use]
    pub fn parent_of(&self, place: &Capsule) -> Option<&Capsule> {
        self.resolver().parent_of(place)
    }

    #[must_use]
    pub fn neighbors_of(&self, place: &Capsule) -> Vec<&Capsule> {
        self.resolver().neighbors_of(place)
    }

    /// Incoming links of every relation.
    #[must_use]
    pub fn backlinks_of(&self, slug: &str) -> Vec<Backlink<'_>> {
        self.resolver().backlinks_of(slug)
    }

    // =========================================================================
    // NORMALIZED FIELDS
    // =========================================================================

    #[must_use]
    pub fn body<'c>(&self, capsule: &'c Capsule) -> &'c str {
        normalize::body(capsule)
    }

    #[must_use]
    pub fn surface<'c>(&self, capsule: &'c Capsule) -> &'c str {
        normalize::surface(capsule)
    }

    #[must_use]
    pub fn price(&self, capsule: &Capsule) -> Option<f64> {
        normalize::price(capsule)
    }

    #[must_use]
    pub fn region<'c>(&self, capsule: &'c Capsule) -> Option<&'c str> {
        normalize::region(capsule)
    }

    #[must_use]
    pub fn duration<'c>(&self, capsule: &'c Capsule) -> Option<&'c str> {
        normalize::duration(capsule)
    }

    #[must_use]
    pub fn tags<'c>(&self, capsule: &'c Capsule) -> &'c [String] {
        normalize::tags(capsule)
    }

    // =========================================================================
    // DEEP LINKS
    // =========================================================================

    /// Rewrite `[[slug]]` references in `markdown`.
    #[must_use]
    pub fn rewrite_deep_links(&self, markdown: &str) -> String {
        deeplink::rewrite_deep_links(&self.registry, markdown)
    }

    /// The capsule's body with deep links rewritten, ready to render.
    #[must_use]
    pub fn render_body(&self, capsule: &Capsule) -> String {
        self.rewrite_deep_links(normalize::body(capsule))
    }

    // =========================================================================
    // AUDIT
    // =========================================================================

    /// Links whose targets are missing or unregistered.
    #[must_use]
    pub fn dangling_links(&self) -> Vec<DanglingLink> {
        self.resolver().dangling_links()
    }

    /// `[[slug]]` references in bodies that do not resolve.
    #[must_use]
    pub fn unresolved_references(&self) -> Vec<UnresolvedReference> {
        self.all()
            .iter()
            .flat_map(|capsule| {
                deeplink::references(normalize::body(capsule))
                    .filter(move |token| !self.registry.contains(token))
                    .map(move |token| UnresolvedReference {
                        source: capsule.slug.clone(),
                        token: token.to_owned(),
                    })
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
