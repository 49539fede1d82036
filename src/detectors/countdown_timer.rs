//! Countdown timers and urgency wording.
//!
//! Flags text-bearing elements showing an `H:MM[:SS]` clock or urgency
//! vocabulary. A bare clock that also mentions AM/PM reads as a
//! time-of-day and is suppressed unless urgency wording is present too;
//! only whole-word AM/PM mentions count, so "am" or "pm" buried inside a
//! longer word ("exam", "campaign") never suppresses a match.
//! Within one scan cycle the detector reports each resolved target at most
//! once; across cycles a stable element is re-flagged every time, which is
//! intentional.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::detectors::{describe_element, keywords, Detection, Skip};
use crate::dom::{Document, NodeId};
use crate::finding::{FindingFactory, PatternKind, Severity};
use crate::resolve::resolve;
use crate::text::{self, contains_any};

const COLOR: &str = "green";
const CANDIDATE_TAGS: &[&str] = &["span", "div", "p", "strong", "time"];

fn clock_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d{1,2}:\d{2}(?::\d{2})?\b").expect("clock regex is valid"))
}

fn meridiem_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:am|pm)\b").expect("meridiem regex is valid"))
}

pub fn scan(doc: &Document, factory: &mut FindingFactory, budget: usize) -> Vec<Detection> {
    let mut out = Vec::new();
    let mut seen_targets: HashSet<NodeId> = HashSet::new();

    for id in doc.elements() {
        if out.len() >= budget {
            break;
        }
        if !matches!(doc.tag(id), Some(tag) if CANDIDATE_TAGS.contains(&tag)) {
            continue;
        }
        match evaluate(doc, id) {
            Ok(Some((target, urgent))) => {
                if !seen_targets.insert(target) {
                    continue;
                }
                let severity = if urgent { Severity::High } else { Severity::Low };
                let description = format!(
                    "Potential urgency timer on {}",
                    describe_element(doc, target)
                );
                out.push(Detection {
                    finding: factory.create(
                        PatternKind::CountdownTimer,
                        severity,
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
                    "countdown_timer candidate skipped"
                );
            }
        }
    }
    out
}

/// Returns `(resolved target, urgency keyword present)`.
fn evaluate(doc: &Document, candidate: NodeId) -> Result<Option<(NodeId, bool)>, Skip> {
    let raw = doc.raw_text(candidate);
    let normalized = text::normalize(&raw);
    if normalized.is_empty() {
        return Err(Skip::EmptyText);
    }

    let has_clock = clock_re().is_match(&raw);
    let has_urgency = contains_any(&normalized, keywords::URGENCY);
    if !has_clock && !has_urgency {
        return Ok(None);
    }
    // A clock next to an AM/PM mention is probably just the time of day.
    if meridiem_re().is_match(&raw) && !has_urgency {
        return Ok(None);
    }

    let target = resolve(doc, candidate, keywords::URGENCY).ok_or(Skip::Detached)?;
    Ok(Some((target, has_urgency)))
}
