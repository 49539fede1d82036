// Copyright 2026 Murk Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scan coordination and engine lifecycle.
//!
//! [`Engine`] is the explicit per-page context object: it owns the finding
//! factory, the annotation side table, the current snapshot, and the
//! lifetime findings counter. One engine is constructed per page load and
//! everything rebuilds from empty on the next load; nothing persists.
//!
//! [`install`] wires an engine to a document and spawns the driver task
//! that owns the debounce timer, answers queries, and reacts to the
//! document's observer channel. The driver is the single logical thread of
//! the system: detector execution, mutation handling, and query replies all
//! serialize through it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::annotate::Annotator;
use crate::config::EngineConfig;
use crate::detectors::DETECTORS;
use crate::dom::{Document, PageEvent, ReadyState};
use crate::events::{EngineEvent, EventBus};
use crate::finding::{Finding, FindingFactory, Snapshot};
use crate::query::{FindingsReport, FindingView, QueryClient, QueryRequest};
use crate::scheduler::Scheduler;

#[derive(thiserror::Error, Debug)]
pub enum InstallError {
    /// The load-time guard: one engine per page context.
    #[error("a detection engine is already installed in this document")]
    AlreadyInstalled,
}

/// Per-page detection context and scan coordinator.
pub struct Engine {
    doc: Arc<Mutex<Document>>,
    location: String,
    config: EngineConfig,
    factory: FindingFactory,
    annotator: Annotator,
    snapshot: Snapshot,
    total_findings: usize,
    bus: EventBus,
}

impl Engine {
    pub fn new(doc: Arc<Mutex<Document>>, config: EngineConfig, bus: EventBus) -> Self {
        let location = lock(&doc).location().to_string();
        Self {
            doc,
            location,
            config,
            factory: FindingFactory::new(),
            annotator: Annotator::new(),
            snapshot: Snapshot::default(),
            total_findings: 0,
            bus,
        }
    }

    /// Run one scan cycle: all detectors in fixed order, capped.
    ///
    /// Replaces the snapshot wholesale and advances the lifetime counter by
    /// exactly the number of findings this cycle produced. A no-op once the
    /// cap has been reached.
    pub fn run_scan(&mut self) {
        let cap = self.config.findings_cap;
        if self.total_findings >= cap {
            tracing::debug!("findings cap reached, scan skipped");
            return;
        }

        let started = std::time::Instant::now();
        self.bus.emit(EngineEvent::ScanStarted {
            location: self.location.clone(),
        });

        let mut produced: Vec<Finding> = Vec::new();
        {
            let mut doc = lock(&self.doc);
            for (name, detector) in DETECTORS {
                let used = self.total_findings + produced.len();
                if used >= cap {
                    tracing::info!("findings cap hit mid-cycle, remaining detectors skipped");
                    break;
                }
                let detections = detector(&doc, &mut self.factory, cap - used);
                if !detections.is_empty() {
                    tracing::debug!(detector = name, found = detections.len(), "detector hits");
                }
                for detection in detections {
                    self.annotator
                        .annotate(&mut doc, detection.finding.target, detection.color);
                    produced.push(detection.finding);
                }
            }
        }

        let count = produced.len();
        self.total_findings += count;
        self.snapshot = Snapshot::new(produced);

        self.bus.emit(EngineEvent::ScanComplete {
            produced: count,
            total: self.total_findings,
            elapsed_ms: started.elapsed().as_millis() as u64,
        });
        self.bus.emit(EngineEvent::SnapshotReplaced {
            findings: self.snapshot.len(),
        });
        tracing::info!(
            produced = count,
            total = self.total_findings,
            "scan cycle complete"
        );
        if self.cap_reached() {
            self.bus.emit(EngineEvent::CapReached {
                total: self.total_findings,
            });
        }
    }

    pub fn cap_reached(&self) -> bool {
        self.total_findings >= self.config.findings_cap
    }

    /// Lifetime findings counter; monotonic, never reset.
    pub fn total_findings(&self) -> usize {
        self.total_findings
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Sanitized view of the current snapshot for the query boundary.
    pub fn report(&self) -> FindingsReport {
        FindingsReport {
            findings: self
                .snapshot
                .findings()
                .iter()
                .map(FindingView::from)
                .collect(),
            location: self.location.clone(),
        }
    }

    fn document(&self) -> Arc<Mutex<Document>> {
        Arc::clone(&self.doc)
    }
}

/// Handle to a running engine: query client, event bus, shutdown.
pub struct EngineHandle {
    events: EventBus,
    query_tx: mpsc::Sender<QueryRequest>,
    shutdown: Arc<Notify>,
    task: tokio::task::JoinHandle<()>,
}

impl EngineHandle {
    pub fn query(&self) -> QueryClient {
        QueryClient {
            tx: self.query_tx.clone(),
        }
    }

    pub fn events(&self) -> EventBus {
        self.events.clone()
    }

    /// Request driver shutdown (page navigation/teardown).
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Attach a detection engine to a document and start its driver task.
///
/// Registers the mutation observer, applies the one-engine-per-page guard,
/// and schedules the initial scan if the page is already interactive or
/// complete (otherwise the document's readiness signal schedules it).
pub fn install(
    doc: Arc<Mutex<Document>>,
    config: EngineConfig,
) -> Result<EngineHandle, InstallError> {
    let (page_tx, page_rx) = mpsc::unbounded_channel();
    let ready = {
        let mut d = lock(&doc);
        if d.scanner_installed() {
            return Err(InstallError::AlreadyInstalled);
        }
        d.set_scanner_installed();
        d.observe(page_tx);
        matches!(
            d.ready_state(),
            ReadyState::Interactive | ReadyState::Complete
        )
    };

    let bus = EventBus::new(64);
    let (query_tx, query_rx) = mpsc::channel(16);
    let shutdown = Arc::new(Notify::new());
    let debounce = config.debounce;
    let engine = Engine::new(doc, config, bus.clone());

    tracing::info!(ready, "detection engine installed");
    let task = spawn_driver(engine, page_rx, query_rx, shutdown.clone(), ready, debounce);

    Ok(EngineHandle {
        events: bus,
        query_tx,
        shutdown,
        task,
    })
}

fn spawn_driver(
    mut engine: Engine,
    mut page_events: mpsc::UnboundedReceiver<PageEvent>,
    mut queries: mpsc::Receiver<QueryRequest>,
    shutdown: Arc<Notify>,
    ready: bool,
    debounce: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut scheduler = Scheduler::new(debounce);
        let mut observing = true;
        if ready {
            scheduler.schedule(Instant::now());
        }

        loop {
            let deadline = scheduler.deadline();
            tokio::select! {
                _ = shutdown.notified() => {
                    tracing::info!("engine driver stopping");
                    break;
                }
                Some(request) = queries.recv() => {
                    let _ = request.reply.send(engine.report());
                }
                event = page_events.recv(), if observing => {
                    match event {
                        Some(PageEvent::Ready) => {
                            scheduler.schedule(Instant::now());
                        }
                        Some(PageEvent::Mutation(record)) => {
                            if record.added + record.removed > 0 {
                                scheduler.schedule(Instant::now());
                            }
                        }
                        None => observing = false,
                    }
                }
                _ = sleep_until(deadline), if deadline.is_some() => {
                    scheduler.fire();
                    engine.run_scan();
                    if engine.cap_reached() {
                        // One-way circuit breaker: tear down observation for
                        // the rest of the page's lifetime.
                        scheduler.disable();
                        lock(&engine.document()).disconnect_observer();
                        observing = false;
                        tracing::info!(
                            total = engine.total_findings(),
                            "findings cap reached, observation torn down"
                        );
                    }
                }
            }
        }
    })
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(instant) => tokio::time::sleep_until(instant).await,
        None => std::future::pending().await,
    }
}

/// Poison-tolerant lock: the engine has no fatal-error path, so a panicked
/// writer elsewhere must not take detection down with it.
fn lock(doc: &Arc<Mutex<Document>>) -> MutexGuard<'_, Document> {
    match doc.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
