//! # Deep-Link Rewriter
//!
//! Turns inline `[[slug]]` references in a Markdown body into Markdown links.
//!
//! - Single left-to-right pass over the text
//! - A resolved reference becomes `[<title>](<route>)`
//! - An unresolved reference is left untouched and reported via `tracing`
//! - The token is the slug exactly as written; `[[ slug ]]` does not match
//!   `slug`
//! - Nested or overlapping brackets are outside the supported input

use crate::normalize;
use crate::registry::Registry;
use crate::types::route_path;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static DEEP_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").expect("deep-link pattern is valid"));

/// Result of a rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rewrite {
    /// The rewritten text.
    pub text: String,
    /// Tokens that did not resolve, in order of appearance.
    pub unresolved: Vec<String>,
}

/// Rewrite `[[slug]]` references and report the ones that did not resolve.
#[must_use]
pub fn rewrite(registry: &Registry, markdown: &str) -> Rewrite {
    let mut unresolved = Vec::new();

    let text = DEEP_LINK.replace_all(markdown, |caps: &Captures<'_>| {
        let token = &caps[1];
        match registry.get(token) {
            Some(target) => format!(
                "[{}]({})",
                normalize::title(target),
                route_path(target.kind, &target.slug)
            ),
            None => {
                tracing::warn!(slug = token, "deep-link reference not found");
                unresolved.push(token.to_owned());
                caps[0].to_owned()
            }
        }
    });

    Rewrite {
        text: text.into_owned(),
        unresolved,
    }
}

/// Rewrite `[[slug]]` references; unresolved ones stay as written.
#[must_use]
pub fn rewrite_deep_links(registry: &Registry, markdown: &str) -> String {
    rewrite(registry, markdown).text
}

/// Every `[[token]]` in `markdown`, in order of appearance.
pub fn references(markdown: &str) -> impl Iterator<Item = &str> {
    DEEP_LINK
        .captures_iter(markdown)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::DuplicatePolicy;

    fn registry() -> Registry {
        Registry::from_json_documents(
            [
                r#"{"type":"place","slug":"lake-ritsa","title":"Озеро Рица"}"#,
                r#"{"type":"tour","slug":"lake-ritsa-winter","title":"Winter Ritsa"}"#,
                r#"{"type":"guide","slug":"packing","title":"What to pack"}"#,
                r#"{"type":"product","slug":"gift-card","title":"Gift card"}"#,
                r#"{"type":"place","slug":"untitled"}"#,
            ],
            DuplicatePolicy::Overwrite,
        )
        .expect("build")
    }

    #[test]
    fn resolves_place_reference() {
        let out = rewrite_deep_links(&registry(), "See [[lake-ritsa]] for details");
        assert_eq!(out, "See [Озеро Рица](/places/lake-ritsa) for details");
    }

    #[test]
    fn route_follows_target_kind() {
        let out = rewrite_deep_links(
            &registry(),
            "[[lake-ritsa-winter]] [[packing]] [[gift-card]]",
        );
        assert_eq!(
            out,
            "[Winter Ritsa](/tours/lake-ritsa-winter) [What to pack](/guides/packing) [Gift card](/gift-card)"
        );
    }

    #[test]
    fn unresolved_reference_is_left_unchanged() {
        let input = "See [[missing-slug]]";
        let result = rewrite(&registry(), input);
        assert_eq!(result.text, input);
        assert_eq!(result.unresolved, vec!["missing-slug".to_owned()]);
    }

    #[test]
    fn unresolved_reference_does_not_stop_the_scan() {
        let result = rewrite(&registry(), "[[nope]] then [[packing]]");
        assert_eq!(result.text, "[[nope]] then [What to pack](/guides/packing)");
        assert_eq!(result.unresolved, vec!["nope".to_owned()]);
    }

    #[test]
    fn untitled_target_uses_slug_as_label() {
        let out = rewrite_deep_links(&registry(), "[[untitled]]");
        assert_eq!(out, "[untitled](/places/untitled)");
    }

    #[test]
    fn text_without_references_is_unchanged() {
        let input = "Plain [markdown](https://example.com) text";
        assert_eq!(rewrite_deep_links(&registry(), input), input);
    }

    #[test]
    fn references_lists_tokens() {
        let found: Vec<_> = references("a [[x]] b [[ y ]] c [[]]").collect();
        assert_eq!(found, vec!["x", " y "]);
    }

    #[test]
    fn padded_token_is_not_resolved() {
        let input = "See [[ lake-ritsa ]]";
        let result = rewrite(&registry(), input);
        assert_eq!(result.text, input);
        assert_eq!(result.unresolved, vec![" lake-ritsa ".to_owned()]);
    }
}
