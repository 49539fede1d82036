//! Guilt or shame framed opt-out controls.
//!
//! Flags actionable controls whose copy pairs an opt-out phrase with guilt
//! or self-deprecating wording ("No thanks, I hate saving money"), or pairs
//! guilt with self-deprecation outright.

use crate::detectors::{describe_element, is_actionable, keywords, Detection, Skip};
use crate::dom::{Document, NodeId};
use crate::finding::{FindingFactory, PatternKind, Severity};
use crate::resolve::resolve;
use crate::text::{contains_any, element_text};

const COLOR: &str = "orange";

pub fn scan(doc: &Document, factory: &mut FindingFactory, budget: usize) -> Vec<Detection> {
    let mut out = Vec::new();
    for id in doc.elements() {
        if out.len() >= budget {
            break;
        }
        if !is_actionable(doc, id) {
            continue;
        }
        match evaluate(doc, id) {
            Ok(Some(target)) => out.push(Detection {
                finding: factory.create(
                    PatternKind::ConfirmShaming,
                    Severity::High,
                    "Possibly manipulative opt-out copy".to_string(),
                    target,
                ),
                color: COLOR,
            }),
            Ok(None) => {}
            Err(skip) => {
                tracing::trace!(
                    element = %describe_element(doc, id),
                    reason = skip.as_str(),
                    "confirm_shaming candidate skipped"
                );
            }
        }
    }
    out
}

fn evaluate(doc: &Document, control: NodeId) -> Result<Option<NodeId>, Skip> {
    let text = element_text(doc, control);
    if text.is_empty() {
        return Err(Skip::EmptyText);
    }

    let has_guilt = contains_any(&text, keywords::GUILT);
    let has_self_deprecating = contains_any(&text, keywords::SELF_DEPRECATING);
    let has_opt_out = contains_any(&text, keywords::OPT_OUT);

    let looks_like_shaming =
        (has_opt_out && (has_guilt || has_self_deprecating)) || (has_guilt && has_self_deprecating);
    if !looks_like_shaming {
        return Ok(None);
    }

    let all = keywords::confirm_shaming_all();
    let target = resolve(doc, control, &all).ok_or(Skip::Detached)?;
    Ok(Some(target))
}
