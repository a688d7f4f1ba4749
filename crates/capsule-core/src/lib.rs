//! # capsule-core
//!
//! Content model and resolver for a statically rendered travel catalog.
//!
//! A capsule is a self-describing content unit (tour, place, guide). This
//! crate defines the capsule schema, reads records authored in either of two
//! schema eras into one consistent read API, indexes them by slug, traverses
//! the typed links between them, and rewrites inline `[[slug]]` references.
//!
//! ## Layers
//!
//! ```text
//!   types / schema      record shapes and vocabularies
//!         │
//!   ingestor            JSON records -> validated capsules
//!         │
//!   registry            slug -> capsule, built once
//!      ┌──┴───────────┬──────────────┐
//!   normalize      resolver       deeplink
//!      └──────────────┴──────┬───────┘
//!                         catalog     read API for the presentation layer
//! ```
//!
//! ## Architectural Constraints
//!
//! - No async, no network, no writes: records are static build-time data
//! - The registry is immutable after construction
//! - Reads are total: absence is `None`, missing relations are empty

// =============================================================================
// MODULES
// =============================================================================

pub mod catalog;
pub mod deeplink;
pub mod ingestor;
pub mod normalize;
pub mod primitives;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use schema::{Capsule, Content, GeoPoint, LegacyFields, Link, Meta, OneOrMany};
pub use types::{CapsuleError, CapsuleKind, Difficulty, Relation, Season, route_path};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use catalog::{Catalog, UnresolvedReference};
pub use deeplink::{Rewrite, rewrite_deep_links};
pub use ingestor::Ingestor;
pub use normalize::NormalizedCapsule;
pub use registry::{DuplicatePolicy, Registry};
pub use resolver::{Backlink, DanglingLink, Resolver, target_slug};
