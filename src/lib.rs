//! Resilient interaction layer for UI test automation
//!
//! This crate wraps already-resolved element handles with bounded-time
//! retry combinators and buffers a human-readable step trace per test
//! execution, inspired by Playwright's web automation model. It is not a
//! browser engine: DOM querying, network interception, and session
//! lifecycle stay with the driving collaborator, which hands elements in
//! through the [`ElementImpl`] seam.

pub mod element;
pub mod errors;
pub mod fixture;
pub mod trace;
pub mod types;
#[cfg(test)]
mod tests;

pub use element::{Element, ElementImpl};
pub use errors::InteractionError;
pub use fixture::{cleanup, init_telemetry, BrowserContext, BrowserSession, TestRun};
pub use trace::{StepRecord, TraceLog};
pub use types::{BoundingBox, RunStatus};
