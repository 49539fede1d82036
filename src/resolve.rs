//! Target resolution: find the most specific carrier of a keyword match.
//!
//! Detectors usually trip on a large candidate region (a button, a label, a
//! whole card). The resolver walks the region's text nodes in document order
//! and picks the element whose own visible text is the shortest while still
//! containing one of the keywords, so the finding points at the phrase
//! rather than its container.

use crate::dom::{Document, NodeId};
use crate::text::{self, element_text};

/// Resolve the smallest matching descendant of `root`.
///
/// Candidates are the parent elements of keyword-bearing text nodes; the
/// winner has the shortest non-empty normalized text, with ties broken by
/// document order (first seen wins). Falls back to `root` when nothing
/// matches or the keyword list is empty. Returns `None` only when `root`
/// itself is no longer attached.
pub fn resolve(doc: &Document, root: NodeId, keywords: &[&str]) -> Option<NodeId> {
    if !doc.contains(root) {
        return None;
    }
    if keywords.is_empty() {
        return Some(root);
    }

    let mut best: Option<NodeId> = None;
    let mut best_len = usize::MAX;

    for node in doc.descendants(root) {
        let Some(value) = doc.text_value(node) else {
            continue;
        };
        let normalized = text::normalize(value);
        if normalized.is_empty() || !text::contains_any(&normalized, keywords) {
            continue;
        }
        let Some(parent) = doc.parent(node) else {
            continue;
        };
        let len = element_text(doc, parent).len();
        if len > 0 && len < best_len {
            best_len = len;
            best = Some(parent);
        }
    }

    Some(best.unwrap_or(root))
}
