//! # Capsule Registry
//!
//! The immutable, slug-keyed in-memory index of every capsule.
//!
//! Construction is the only mutation point. A registry is an owned value:
//! callers decide its lifetime, and tests build fresh ones from synthetic
//! records. Lookups by slug hash into an index; no query scans the whole
//! catalog except the per-kind listings.

use crate::ingestor::Ingestor;
use crate::schema::Capsule;
use crate::types::{CapsuleError, CapsuleKind};
use std::collections::HashMap;

// =============================================================================
// DUPLICATE POLICY
// =============================================================================

/// What to do when two records share a slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The later record replaces the earlier one. A warning is logged.
    #[default]
    Overwrite,
    /// Construction fails with `CapsuleError::DuplicateSlug`.
    Reject,
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Slug-keyed index of capsules.
///
/// `capsules` keeps registration order. An overwritten slug keeps the
/// position of its first registration.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    capsules: Vec<Capsule>,
    index: HashMap<String, usize>,
}

impl Registry {
    /// Build a registry from records.
    ///
    /// Every record is validated first. With `DuplicatePolicy::Overwrite`
    /// the last record for a slug wins.
    pub fn build(
        records: impl IntoIterator<Item = Capsule>,
        policy: DuplicatePolicy,
    ) -> Result<Self, CapsuleError> {
        let records = records.into_iter();
        let mut registry = Self {
            capsules: Vec::with_capacity(records.size_hint().0),
            index: HashMap::with_capacity(records.size_hint().0),
        };

        for capsule in records {
            Ingestor::validate(&capsule)?;
            registry.register(capsule, policy)?;
        }

        tracing::debug!(count = registry.len(), "capsule registry built");
        Ok(registry)
    }

    /// Build a registry from JSON documents, one capsule each.
    pub fn from_json_documents<I, S>(documents: I, policy: DuplicatePolicy) -> Result<Self, CapsuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let records = documents
            .into_iter()
            .map(|doc| Ingestor::parse_record(doc.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::build(records, policy)
    }

    fn register(&mut self, capsule: Capsule, policy: DuplicatePolicy) -> Result<(), CapsuleError> {
        if let Some(&position) = self.index.get(&capsule.slug) {
            return match policy {
                DuplicatePolicy::Reject => Err(CapsuleError::DuplicateSlug(capsule.slug)),
                DuplicatePolicy::Overwrite => {
                    tracing::warn!(
                        slug = %capsule.slug,
                        previous = %self.capsules[position].id(),
                        replacement = %capsule.id(),
                        "duplicate slug, later record overwrites earlier one"
                    );
                    self.capsules[position] = capsule;
                    Ok(())
                }
            };
        }

        self.index.insert(capsule.slug.clone(), self.capsules.len());
        self.capsules.push(capsule);
        Ok(())
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Every capsule, in registration order.
    #[must_use]
    pub fn all(&self) -> &[Capsule] {
        &self.capsules
    }

    /// Capsule by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Capsule> {
        self.index.get(slug).map(|&i| &self.capsules[i])
    }

    /// Check if a slug is registered.
    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.index.contains_key(slug)
    }

    /// Capsule by slug, only if it is of `kind`.
    #[must_use]
    pub fn get_of_kind(&self, slug: &str, kind: CapsuleKind) -> Option<&Capsule> {
        self.get(slug).filter(|c| c.kind == kind)
    }

    /// Every capsule of `kind`, in registration order.
    pub fn all_of_kind(&self, kind: CapsuleKind) -> impl Iterator<Item = &Capsule> + '_ {
        self.capsules.iter().filter(move |c| c.kind == kind)
    }

    /// Number of capsules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.capsules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capsules.is_empty()
    }

    // =========================================================================
    // CONVENIENCE WRAPPERS
    // =========================================================================

    #[must_use]
    pub fn tours(&self) -> Vec<&Capsule> {
        self.all_of_kind(CapsuleKind::Tour).collect()
    }

    #[must_use]
    pub fn places(&self) -> Vec<&Capsule> {
        self.all_of_kind(CapsuleKind::Place).collect()
    }

    #[must_use]
    pub fn guides(&self) -> Vec<&Capsule> {
        self.all_of_kind(CapsuleKind::Guide).collect()
    }

    #[must_use]
    pub fn find_tour(&self, slug: &str) -> Option<&Capsule> {
        self.get_of_kind(slug, CapsuleKind::Tour)
    }

    #[must_use]
    pub fn find_place(&self, slug: &str) -> Option<&Capsule> {
        self.get_of_kind(slug, CapsuleKind::Place)
    }

    #[must_use]
    pub fn find_guide(&self, slug: &str) -> Option<&Capsule> {
        self.get_of_kind(slug, CapsuleKind::Guide)
    }
}

// =============================================================================
// TESTS
// =============================================================================
