//! Confusingly worded consent labels.
//!
//! Flags labels carrying explicit confusion phrasing ("uncheck if...",
//! "opt-out"), or labels in a consent context whose text co-occurs negation
//! and action words over more than six tokens, a coarse proxy for double
//! negatives ("Do not uncheck this box if you don't want to stop
//! receiving emails").

use crate::detectors::{describe_element, keywords, Detection, Skip};
use crate::dom::{Document, NodeId};
use crate::finding::{FindingFactory, PatternKind, Severity};
use crate::resolve::resolve;
use crate::text::{contains_any, element_text};

const COLOR: &str = "brown";
const DOUBLE_NEGATIVE_MIN_TOKENS: usize = 6;

pub fn scan(doc: &Document, factory: &mut FindingFactory, budget: usize) -> Vec<Detection> {
    let mut out = Vec::new();
    for id in doc.elements() {
        if out.len() >= budget {
            break;
        }
        if doc.tag(id) != Some("label") {
            continue;
        }
        match evaluate(doc, id) {
            Ok(Some((target, described))) => {
                let description = format!(
                    "Potentially confusing consent text on {}",
                    describe_element(doc, described)
                );
                out.push(Detection {
                    finding: factory.create(
                        PatternKind::TrickQuestion,
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
                    "trick_question candidate skipped"
                );
            }
        }
    }
    out
}

/// Returns `(finding target, element the description names)`.
///
/// The finding points at the label's bound control when one resolves, while
/// the description keeps naming the text carrier.
fn evaluate(doc: &Document, label: NodeId) -> Result<Option<(NodeId, NodeId)>, Skip> {
    let text = element_text(doc, label);
    if text.is_empty() {
        return Err(Skip::EmptyText);
    }

    let has_confusion = contains_any(&text, keywords::CONFUSION);
    let has_consent_context = contains_any(&text, keywords::CONSENT_CONTEXT);
    let has_negation = contains_any(&text, keywords::NEGATION);
    let has_action = contains_any(&text, keywords::ACTION);
    let looks_double_negative = has_negation
        && has_action
        && text.split_whitespace().count() > DOUBLE_NEGATIVE_MIN_TOKENS;

    if !(has_confusion || (has_consent_context && looks_double_negative)) {
        return Ok(None);
    }

    let all = keywords::trick_question_all();
    let resolved = resolve(doc, label, &all).ok_or(Skip::Detached)?;
    let target = bound_control(doc, label).unwrap_or(resolved);
    Ok(Some((target, resolved)))
}

/// The label's control: an explicit `for` binding, else the first checkbox
/// or radio descendant.
fn bound_control(doc: &Document, label: NodeId) -> Option<NodeId> {
    if let Some(for_id) = doc.attr(label, "for") {
        if let Some(el) = doc.element_by_id(for_id) {
            if doc.tag(el) == Some("input") {
                return Some(el);
            }
        }
    }
    doc.descendants(label).into_iter().find(|&d| {
        doc.tag(d) == Some("input")
            && matches!(
                doc.attr(d, "type").map(str::to_lowercase).as_deref(),
                Some("checkbox") | Some("radio")
            )
    })
}
