//! Ads disguised as organic content.
//!
//! Flags card-like containers that carry sponsorship wording, where the
//! disclosure itself sits in a sub-11px label, and the card otherwise looks
//! like content (a hyperlink plus an image). The finding points at the tiny
//! disclosure when one was found.

use crate::detectors::{describe_element, keywords, Detection, Skip};
use crate::dom::{style, Document, NodeId};
use crate::finding::{FindingFactory, PatternKind, Severity};
use crate::resolve::resolve;
use crate::text::{contains_any, element_text};

const COLOR: &str = "blue";
const TINY_FONT_PX: f32 = 11.0;
const CARD_TAGS: &[&str] = &["article", "div", "li", "section"];
const LABEL_TAGS: &[&str] = &["small", "span", "div"];

pub fn scan(doc: &Document, factory: &mut FindingFactory, budget: usize) -> Vec<Detection> {
    let mut out = Vec::new();
    for id in doc.elements() {
        if out.len() >= budget {
            break;
        }
        if !matches!(doc.tag(id), Some(tag) if CARD_TAGS.contains(&tag)) {
            continue;
        }
        match evaluate(doc, id) {
            Ok(Some(target)) => {
                let description = format!(
                    "Content card ({}) appears to be sponsored but the label may be hard to notice.",
                    describe_element(doc, target)
                );
                out.push(Detection {
                    finding: factory.create(
                        PatternKind::DisguisedAd,
                        Severity::Medium,
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
                    "disguised_ad candidate skipped"
                );
            }
        }
    }
    out
}

fn evaluate(doc: &Document, card: NodeId) -> Result<Option<NodeId>, Skip> {
    let card_text = element_text(doc, card);
    if card_text.is_empty() {
        return Err(Skip::EmptyText);
    }
    if !contains_any(&card_text, keywords::SPONSOR) {
        return Ok(None);
    }

    let descendants = doc.descendants(card);

    let mut tiny_label: Option<NodeId> = None;
    for &d in &descendants {
        if !matches!(doc.tag(d), Some(tag) if LABEL_TAGS.contains(&tag)) {
            continue;
        }
        let label_text = element_text(doc, d);
        if label_text.is_empty() || !contains_any(&label_text, keywords::SPONSOR) {
            continue;
        }
        if matches!(style::font_size(doc, d), Some(px) if px < TINY_FONT_PX) {
            tiny_label = Some(d);
        }
    }

    let has_link = descendants
        .iter()
        .any(|&d| doc.tag(d) == Some("a") && doc.attr(d, "href").is_some());
    let has_image = descendants.iter().any(|&d| doc.tag(d) == Some("img"));

    let Some(label) = tiny_label else {
        return Ok(None);
    };
    if !(has_link && has_image) {
        return Ok(None);
    }

    let target = resolve(doc, label, keywords::SPONSOR).unwrap_or(label);
    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::testutil::doc;
    use crate::finding::FindingFactory;

    const CARD: &str = "<article id=\"card\">\
        <img src=\"promo.jpg\">\
        <a href=\"/offer\">Amazing widget</a>\
        <span id=\"tag\" style=\"font-size: 9px\">Sponsored</span>\
        </article>";

    fn run(html: &str) -> Vec<Detection> {
        let d = doc(html);
        scan(&d, &mut FindingFactory::new(), usize::MAX)
    }

    #[test]
    fn test_tiny_sponsored_label_flagged() {
        let found = run(&format!("<body>{CARD}</body>"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].finding.kind, PatternKind::DisguisedAd);
        assert_eq!(found[0].finding.severity, Severity::Medium);
    }

    #[test]
    fn test_target_is_tiny_label() {
        let d = doc(&format!("<body>{CARD}</body>"));
        let found = scan(&d, &mut FindingFactory::new(), usize::MAX);
        let tag = d.element_by_id("tag").unwrap();
        assert_eq!(found[0].finding.target, tag);
    }

    #[test]
    fn test_readable_label_not_flagged() {
        let html = "<body><article>\
            <img src=\"promo.jpg\"><a href=\"/offer\">Widget</a>\
            <span style=\"font-size: 14px\">Sponsored</span>\
            </article></body>";
        assert!(run(html).is_empty());
    }

    #[test]
    fn test_unsized_label_not_flagged() {
        let html = "<body><article>\
            <img src=\"promo.jpg\"><a href=\"/offer\">Widget</a>\
            <span>Sponsored</span>\
            </article></body>";
        assert!(run(html).is_empty());
    }

    #[test]
    fn test_no_image_not_flagged() {
        let html = "<body><article>\
            <a href=\"/offer\">Widget</a>\
            <span style=\"font-size: 9px\">Sponsored</span>\
            </article></body>";
        assert!(run(html).is_empty());
    }

    #[test]
    fn test_no_link_not_flagged() {
        let html = "<body><article>\
            <img src=\"promo.jpg\">\
            <span style=\"font-size: 9px\">Sponsored</span>\
            </article></body>";
        assert!(run(html).is_empty());
    }
}
