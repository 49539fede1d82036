//! Text canonicalization for keyword matching.

use crate::dom::{Document, NodeId};

/// Collapse whitespace runs to single spaces, trim, and case-fold.
///
/// Total and pure: any input produces a canonical form, and the function is
/// idempotent (`normalize(normalize(s)) == normalize(s)`).
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalized visible text of an element and its whole subtree.
pub fn element_text(doc: &Document, id: NodeId) -> String {
    normalize(&doc.raw_text(id))
}

/// True when the normalized text contains any of the given keywords.
///
/// Keywords are expected to already be lowercase; empty keyword lists never
/// match.
pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}
