//! In-place visual marking of flagged elements.
//!
//! Marks are tracked in an identity-keyed side table rather than on the node
//! itself, so annotation state survives snapshot replacement: a node flagged
//! in one scan cycle is never re-outlined by a later one. Node ids are never
//! reused by the arena, which keeps the table sound across removals.

use std::collections::HashSet;

use crate::dom::{Document, NodeId};

/// Advisory text appended to the element's tooltip.
pub const TOOLTIP_NOTE: &str = "Possible dark pattern detected";

/// Idempotent per-node highlighter.
#[derive(Debug, Default)]
pub struct Annotator {
    marked: HashSet<NodeId>,
}

impl Annotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a persistent outline and tooltip note to a node, once.
    ///
    /// Later calls for the same node are no-ops for the node's entire
    /// lifetime, whatever color they ask for. Stale handles are skipped.
    pub fn annotate(&mut self, doc: &mut Document, id: NodeId, color: &str) {
        if self.marked.contains(&id) {
            return;
        }
        if !doc.contains(id) {
            tracing::trace!("annotation target no longer attached, skipping");
            return;
        }
        self.marked.insert(id);

        let outline = format!("outline: 2px solid {color}; outline-offset: 2px");
        let style = match doc.attr(id, "style") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{}; {outline}", existing.trim_end_matches([' ', ';']))
            }
            _ => outline,
        };
        doc.set_attr(id, "style", &style);

        let title = match doc.attr(id, "title") {
            Some(existing) if !existing.is_empty() => format!("{existing} | {TOOLTIP_NOTE}"),
            _ => TOOLTIP_NOTE.to_string(),
        };
        doc.set_attr(id, "title", &title);
    }

    pub fn is_marked(&self, id: NodeId) -> bool {
        self.marked.contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Viewport};

    fn doc(html: &str) -> Document {
        Document::parse(html, "https://example.com/", Viewport::default())
    }

    #[test]
    fn test_annotate_sets_outline_and_tooltip() {
        let mut d = doc("<body><button id=\"b\" title=\"Decline\">No thanks</button></body>");
        let b = d.element_by_id("b").unwrap();
        let mut annotator = Annotator::new();
        annotator.annotate(&mut d, b, "orange");

        let style = d.attr(b, "style").unwrap();
        assert!(style.contains("outline: 2px solid orange"));
        assert_eq!(d.attr(b, "title"), Some("Decline | Possible dark pattern detected"));
        assert!(annotator.is_marked(b));
    }

    #[test]
    fn test_annotate_is_idempotent() {
        let mut d = doc("<body><button id=\"b\">No thanks</button></body>");
        let b = d.element_by_id("b").unwrap();
        let mut annotator = Annotator::new();
        annotator.annotate(&mut d, b, "orange");
        let style_once = d.attr(b, "style").unwrap().to_string();
        let title_once = d.attr(b, "title").unwrap().to_string();

        annotator.annotate(&mut d, b, "red");
        assert_eq!(d.attr(b, "style"), Some(style_once.as_str()));
        assert_eq!(d.attr(b, "title"), Some(title_once.as_str()));
    }

    #[test]
    fn test_annotate_preserves_existing_style() {
        let mut d = doc("<body><div id=\"x\" style=\"color: red;\">deal</div></body>");
        let x = d.element_by_id("x").unwrap();
        Annotator::new().annotate(&mut d, x, "green");
        let style = d.attr(x, "style").unwrap();
        assert!(style.starts_with("color: red"));
        assert!(style.contains("outline: 2px solid green"));
    }

    #[test]
    fn test_annotate_stale_handle_is_noop() {
        let mut d = doc("<body><div id=\"x\">deal</div></body>");
        let x = d.element_by_id("x").unwrap();
        d.remove(x);
        let mut annotator = Annotator::new();
        annotator.annotate(&mut d, x, "green");
        assert!(!annotator.is_marked(x));
    }
}
