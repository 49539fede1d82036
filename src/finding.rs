//! Finding records, ids, and the per-cycle snapshot.

use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

/// The six detected pattern categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    ConfirmShaming,
    ObscuredInterface,
    PreselectedOptIn,
    TrickQuestion,
    CountdownTimer,
    DisguisedAd,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfirmShaming => "confirm_shaming",
            Self::ObscuredInterface => "obscured_interface",
            Self::PreselectedOptIn => "preselected_opt_in",
            Self::TrickQuestion => "trick_question",
            Self::CountdownTimer => "countdown_timer",
            Self::DisguisedAd => "disguised_ad",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    High,
    Medium,
    Low,
    Unknown,
}

/// One detection result.
///
/// `target` is a weak reference: it never implies ownership, and the node it
/// names may have been removed from the tree by the time anyone looks. It is
/// stripped before findings cross the query boundary.
#[derive(Debug, Clone)]
pub struct Finding {
    pub id: String,
    pub kind: PatternKind,
    pub severity: Severity,
    pub description: String,
    pub target: NodeId,
}

/// Builds uniquely identified findings.
///
/// Ids combine a millisecond timestamp with a monotonic sequence number, so
/// they stay unique even when many findings share one timestamp. Fresh ids
/// are minted every cycle: they are not stable identifiers of "the same"
/// finding across scans.
#[derive(Debug, Default)]
pub struct FindingFactory {
    seq: u64,
}

impl FindingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(
        &mut self,
        kind: PatternKind,
        severity: Severity,
        description: String,
        target: NodeId,
    ) -> Finding {
        let id = format!("dp-{}-{}", chrono::Utc::now().timestamp_millis(), self.seq);
        self.seq += 1;
        Finding {
            id,
            kind,
            severity,
            description,
            target,
        }
    }
}

/// The ordered findings of one scan cycle.
///
/// A new snapshot replaces the previous one wholesale; findings are never
/// merged across cycles.
#[derive(Debug, Default)]
pub struct Snapshot {
    findings: Vec<Finding>,
}

impl Snapshot {
    pub fn new(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}
