//! Pre-checked consent boxes.
//!
//! Flags checkboxes that arrive already checked and whose associated label
//! talks about newsletters, marketing, data sharing, and the like. Label
//! text resolution follows the platform's association rules: an explicit
//! `for` binding first, then an enclosing label, then the parent's text.

use crate::detectors::{describe_element, keywords, Detection, Skip};
use crate::dom::{Document, NodeId};
use crate::finding::{FindingFactory, PatternKind, Severity};
use crate::resolve::resolve;
use crate::text::{contains_any, element_text};

const COLOR: &str = "purple";

pub fn scan(doc: &Document, factory: &mut FindingFactory, budget: usize) -> Vec<Detection> {
    let mut out = Vec::new();
    for id in doc.elements() {
        if out.len() >= budget {
            break;
        }
        if !is_checked_checkbox(doc, id) {
            continue;
        }
        match evaluate(doc, id) {
            Ok(Some(target)) => {
                let description =
                    format!("Pre-checked consent box on {}", describe_element(doc, target));
                out.push(Detection {
                    finding: factory.create(
                        PatternKind::PreselectedOptIn,
                        Severity::High,
                        description,
                        target,
                    ),
                    color: COLOR,
                });
            }
            Ok(None) => {}
            Err(skip) => {
                tracing::trace!(
                    element = %describe_element(doc, id),
                    reason = skip.as_str(),
                    "preselected_opt_in candidate skipped"
                );
            }
        }
    }
    out
}

fn is_checked_checkbox(doc: &Document, id: NodeId) -> bool {
    doc.tag(id) == Some("input")
        && doc.attr(id, "type").map(str::to_lowercase).as_deref() == Some("checkbox")
        && doc.attr(id, "checked").is_some()
}

fn evaluate(doc: &Document, input: NodeId) -> Result<Option<NodeId>, Skip> {
    if !doc.contains(input) {
        return Err(Skip::Detached);
    }

    let mut label_text = String::new();
    if let Some(html_id) = doc.attr(input, "id") {
        if let Some(label) = bound_label(doc, html_id) {
            label_text = element_text(doc, label);
        }
    }
    let enclosing = enclosing_label(doc, input);
    if label_text.is_empty() {
        if let Some(label) = enclosing {
            label_text = element_text(doc, label);
        }
    }
    if label_text.is_empty() {
        if let Some(parent) = doc.parent(input) {
            label_text = element_text(doc, parent);
        }
    }

    if !contains_any(&label_text, keywords::CONSENT) {
        return Ok(None);
    }

    let region = enclosing.or_else(|| doc.parent(input)).unwrap_or(input);
    let target = resolve(doc, region, keywords::CONSENT).unwrap_or(region);
    Ok(Some(target))
}

/// First `<label for="...">` bound to the given element id.
fn bound_label(doc: &Document, html_id: &str) -> Option<NodeId> {
    doc.elements()
        .into_iter()
        .find(|&el| doc.tag(el) == Some("label") && doc.attr(el, "for") == Some(html_id))
}

fn enclosing_label(doc: &Document, id: NodeId) -> Option<NodeId> {
    let mut current = doc.parent(id);
    while let Some(node) = current {
        if doc.tag(node) == Some("label") {
            return Some(node);
        }
        current = doc.parent(node);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::testutil::doc;
    use crate::finding::FindingFactory;

    fn run(html: &str) -> Vec<Detection> {
        let d = doc(html);
        scan(&d, &mut FindingFactory::new(), usize::MAX)
    }

    #[test]
    fn test_checked_marketing_box_is_high() {
        let found = run(
            "<body><label><input type=\"checkbox\" checked> \
             Send me marketing offers and newsletters</label></body>",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].finding.kind, PatternKind::PreselectedOptIn);
        assert_eq!(found[0].finding.severity, Severity::High);
    }

    #[test]
    fn test_explicit_for_binding() {
        let found = run(
            "<body><input id=\"nl\" type=\"checkbox\" checked>\
             <label for=\"nl\">Subscribe to our newsletter</label></body>",
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_parent_text_fallback() {
        let found = run(
            "<body><div><input type=\"checkbox\" checked> Share my data with partners</div></body>",
        );
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_unchecked_box_ignored() {
        let found = run(
            "<body><label><input type=\"checkbox\"> Send me marketing offers</label></body>",
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_checked_box_without_consent_wording_ignored() {
        let found =
            run("<body><label><input type=\"checkbox\" checked> Remember me</label></body>");
        assert!(found.is_empty());
    }
}
