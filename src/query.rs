//! Sanitized read access for the external consumer.
//!
//! Queries cross an execution-context boundary: the consumer holds a
//! [`QueryClient`] and the engine task answers over a reply channel. The
//! report type carries no node references at all, so sanitization is
//! structural rather than by convention. A missing reply surfaces as
//! [`QueryError::Unreachable`], which callers must treat as distinct from a
//! report with zero findings.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::finding::{Finding, PatternKind, Severity};

/// One finding as seen from outside the engine: no target reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: PatternKind,
    pub severity: Severity,
    pub description: String,
}

impl From<&Finding> for FindingView {
    fn from(finding: &Finding) -> Self {
        Self {
            id: finding.id.clone(),
            kind: finding.kind,
            severity: finding.severity,
            description: finding.description.clone(),
        }
    }
}

/// The full query response: current-snapshot findings plus page location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingsReport {
    pub findings: Vec<FindingView>,
    pub location: String,
}

#[derive(thiserror::Error, Debug)]
pub enum QueryError {
    /// The engine task is gone or did not answer. Not the same thing as a
    /// response carrying zero findings.
    #[error("detection engine is unreachable")]
    Unreachable,
}

pub(crate) struct QueryRequest {
    pub(crate) reply: oneshot::Sender<FindingsReport>,
}

/// Cloneable handle for pulling the current findings snapshot.
///
/// Reading never triggers a scan, and keeps working after the findings cap
/// permanently stops scanning.
#[derive(Clone)]
pub struct QueryClient {
    pub(crate) tx: mpsc::Sender<QueryRequest>,
}

impl QueryClient {
    pub async fn get_findings(&self) -> Result<FindingsReport, QueryError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(QueryRequest { reply })
            .await
            .map_err(|_| QueryError::Unreachable)?;
        rx.await.map_err(|_| QueryError::Unreachable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Viewport};
    use crate::finding::FindingFactory;

    #[test]
    fn test_view_strips_target() {
        let doc = Document::parse("<body></body>", "https://example.com/", Viewport::default());
        let mut factory = FindingFactory::new();
        let finding = factory.create(
            PatternKind::ConfirmShaming,
            Severity::High,
            "Possibly manipulative opt-out copy".to_string(),
            doc.root(),
        );
        let view = FindingView::from(&finding);
        let json = serde_json::to_value(&view).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["description", "id", "severity", "type"]);
        assert_eq!(obj["type"], "confirm_shaming");
        assert_eq!(obj["severity"], "high");
    }

    #[tokio::test]
    async fn test_dropped_engine_is_unreachable() {
        let (tx, rx) = mpsc::channel(4);
        drop(rx);
        let client = QueryClient { tx };
        assert!(matches!(
            client.get_findings().await,
            Err(QueryError::Unreachable)
        ));
    }
}
