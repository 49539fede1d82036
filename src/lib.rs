// Copyright 2026 Murk Contributors
// SPDX-License-Identifier: Apache-2.0

//! Murk: a dark pattern detection engine.
//!
//! Murk inspects a live, mutating document tree for manipulative interface
//! patterns across six fixed categories, marks matching elements in place,
//! and exposes a sanitized read-only snapshot of findings to an external
//! consumer. Detection is heuristic and best effort: false positives and
//! false negatives are expected, and a hard lifetime cap on total findings
//! acts as a one-way circuit breaker for the page.
//!
//! The entry point is [`engine::install`], which attaches an engine to a
//! [`dom::Document`] and returns a handle carrying the query client and the
//! event bus.

pub mod annotate;
pub mod config;
pub mod detectors;
pub mod dom;
pub mod engine;
pub mod events;
pub mod finding;
pub mod query;
pub mod resolve;
pub mod scheduler;
pub mod text;

pub use config::EngineConfig;
pub use dom::{Document, NodeId, Viewport};
pub use engine::{install, Engine, EngineHandle, InstallError};
pub use events::{EngineEvent, EventBus};
pub use finding::{Finding, PatternKind, Severity};
pub use query::{FindingsReport, QueryClient, QueryError};
