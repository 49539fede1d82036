//! Interface-blocking overlays.
//!
//! Flags fixed or absolutely positioned containers with a high stacking
//! order that cover most of the viewport and hold at least one actionable
//! control. The finding targets the container itself, not each control
//! inside it.

use crate::detectors::{describe_element, is_overlay_control, Detection, Skip};
use crate::dom::style::{self, Position};
use crate::dom::{Document, NodeId};
use crate::finding::{FindingFactory, PatternKind, Severity};

const COLOR: &str = "red";
const MIN_Z_INDEX: i32 = 1000;
const VIEWPORT_SHARE: f32 = 0.7;

const CONTAINER_TAGS: &[&str] = &["div", "section", "aside"];

pub fn scan(doc: &Document, factory: &mut FindingFactory, budget: usize) -> Vec<Detection> {
    let mut out = Vec::new();
    for id in doc.elements() {
        if out.len() >= budget {
            break;
        }
        if !matches!(doc.tag(id), Some(tag) if CONTAINER_TAGS.contains(&tag)) {
            continue;
        }
        match evaluate(doc, id) {
            Ok(true) => {
                let description = format!(
                    "Large overlay ({}) with high z-index that might block the interface.",
                    describe_element(doc, id)
                );
                out.push(Detection {
                    finding: factory.create(
                        PatternKind::ObscuredInterface,
                        Severity::Medium,
                        description,
                        id,
                    ),
                    color: COLOR,
                });
            }
            Ok(false) => {}
            Err(skip) => {
                tracing::trace!(
                    element = %describe_element(doc, id),
                    reason = skip.as_str(),
                    "obscured_interface candidate skipped"
                );
            }
        }
    }
    out
}

fn evaluate(doc: &Document, container: NodeId) -> Result<bool, Skip> {
    if !doc.contains(container) {
        return Err(Skip::Detached);
    }
    if !matches!(
        style::position(doc, container),
        Position::Fixed | Position::Absolute
    ) {
        return Ok(false);
    }
    let Some(z) = style::z_index(doc, container) else {
        return Ok(false);
    };
    if z < MIN_Z_INDEX {
        return Ok(false);
    }

    let viewport = doc.viewport();
    let huge_area = match (style::width(doc, container), style::height(doc, container)) {
        (Some(w), Some(h)) => {
            w > viewport.width * VIEWPORT_SHARE && h > viewport.height * VIEWPORT_SHARE
        }
        _ => false,
    };
    if !huge_area {
        return Ok(false);
    }

    let has_control = doc
        .descendants(container)
        .into_iter()
        .any(|d| is_overlay_control(doc, d));
    Ok(has_control)
}
