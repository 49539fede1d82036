//! The six pattern detectors.
//!
//! Each detector scans the same document tree and reports [`Detection`]s:
//! a finding plus the outline color its target should be marked with. All
//! detectors are budget-aware so the coordinator's lifetime cap interrupts
//! them mid-iteration, and per-candidate evaluation is contained: a faulty
//! element is skipped with a [`Skip`] reason while the detector keeps
//! whatever it already found.
//!
//! The scan order below is fixed and load-bearing: when the cap lands
//! mid-cycle, earlier detectors keep their results and later ones never run.

pub mod confirm_shaming;
pub mod countdown_timer;
pub mod disguised_ad;
pub mod keywords;
pub mod obscured_interface;
pub mod preselected_opt_in;
pub mod trick_question;

use crate::dom::{Document, NodeId};
use crate::finding::{Finding, FindingFactory};

/// One detector hit: the finding and the highlight color for its target.
#[derive(Debug)]
pub struct Detection {
    pub finding: Finding,
    pub color: &'static str,
}

/// Why a candidate element was skipped instead of evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// The node disappeared from the tree between enumeration and evaluation.
    Detached,
    /// The candidate carries no visible text to match against.
    EmptyText,
}

impl Skip {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Detached => "detached",
            Self::EmptyText => "empty_text",
        }
    }
}

pub type DetectorFn = fn(&Document, &mut FindingFactory, usize) -> Vec<Detection>;

/// All detectors in their fixed execution order.
pub const DETECTORS: &[(&str, DetectorFn)] = &[
    ("confirm_shaming", confirm_shaming::scan),
    ("obscured_interface", obscured_interface::scan),
    ("preselected_opt_in", preselected_opt_in::scan),
    ("trick_question", trick_question::scan),
    ("countdown_timer", countdown_timer::scan),
    ("disguised_ad", disguised_ad::scan),
];

/// Short structural summary of an element for finding descriptions,
/// e.g. `button#accept.btn.btn-primary`.
pub(crate) fn describe_element(doc: &Document, id: NodeId) -> String {
    let Some(tag) = doc.tag(id) else {
        return "unknown element".to_string();
    };
    let mut out = tag.to_string();
    if let Some(html_id) = doc.attr(id, "id") {
        if !html_id.is_empty() {
            out.push('#');
            out.push_str(html_id);
        }
    }
    if let Some(class) = doc.attr(id, "class") {
        let classes: Vec<&str> = class.split_whitespace().take(3).collect();
        if !classes.is_empty() {
            out.push('.');
            out.push_str(&classes.join("."));
        }
    }
    out
}

/// Actionable controls: buttons, links, button-like roles, button/submit
/// inputs.
pub(crate) fn is_actionable(doc: &Document, id: NodeId) -> bool {
    match doc.tag(id) {
        Some("button") | Some("a") => true,
        Some("input") => matches!(
            doc.attr(id, "type").map(str::to_lowercase).as_deref(),
            Some("button") | Some("submit")
        ),
        Some(_) => doc.attr(id, "role") == Some("button"),
        None => false,
    }
}

/// Controls counted when deciding whether an overlay blocks the interface.
pub(crate) fn is_overlay_control(doc: &Document, id: NodeId) -> bool {
    matches!(doc.tag(id), Some("button") | Some("a"))
        || doc.attr(id, "role") == Some("button")
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::dom::{Document, Viewport};

    /// Route `tracing` output through the test harness. Safe to call from
    /// every test; only the first call installs the subscriber.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    pub fn doc(html: &str) -> Document {
        init_tracing();
        Document::parse(html, "https://example.com/", Viewport::default())
    }
}
