//! Per-execution wiring: trace lifecycle, telemetry install, cleanup
//!
//! The pieces here are what a test-runner fixture layer composes around
//! each execution body: a fresh [`TraceLog`] whose flush is guaranteed on
//! every exit path, a process-wide telemetry install, and a session
//! cleanup helper.

use crate::errors::InteractionError;
use crate::trace::{StepRecord, TraceLog};
use crate::types::RunStatus;
use async_trait::async_trait;
use futures::future;
use once_cell::sync::OnceCell;
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

static TELEMETRY: OnceCell<()> = OnceCell::new();

/// Install the process-wide tracing subscriber.
///
/// Idempotent: repeated fixture setup across many executions hits the
/// `OnceCell` guard and returns immediately, so concurrent executions can
/// all call this safely. Filtering follows `RUST_LOG`.
pub fn init_telemetry() {
    TELEMETRY.get_or_init(|| {
        use tracing_subscriber::{fmt, EnvFilter};
        let _ = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(true)
            .try_init();
    });
}

/// A closable isolated browsing context, owned by the external session.
#[async_trait]
pub trait BrowserContext: Send + Sync {
    async fn close(&self) -> Result<(), InteractionError>;
}

/// The external collaborator's browser session, reduced to the one
/// capability cleanup needs: enumerating its open contexts.
pub trait BrowserSession: Send + Sync {
    fn contexts(&self) -> Vec<Arc<dyn BrowserContext>>;
}

/// One test execution's trace lifecycle: construct, record, flush once.
///
/// The flush is tied to `Drop`, so it runs on every exit path of the
/// owning execution (normal return, `?` propagation, panic unwind) with
/// the recorded terminal status, defaulting to
/// [`RunStatus::Unknown`] when the runner reported nothing.
pub struct TestRun {
    trace: Option<TraceLog>,
    status: Option<RunStatus>,
}

impl TestRun {
    pub fn new(title: impl Into<String>) -> Self {
        Self::from_trace(TraceLog::new(title))
    }

    pub fn with_sink(title: impl Into<String>, sink: impl Write + Send + 'static) -> Self {
        Self::from_trace(TraceLog::with_sink(title, sink))
    }

    fn from_trace(trace: TraceLog) -> Self {
        Self {
            trace: Some(trace),
            status: None,
        }
    }

    /// Record a step in the underlying trace. A no-op after an explicit
    /// early flush; losing a late step is better than a second frame.
    pub fn step(&mut self, description: impl Into<String>) {
        if let Some(trace) = self.trace.as_mut() {
            trace.step(description);
        }
    }

    /// Steps recorded so far.
    pub fn steps(&self) -> &[StepRecord] {
        self.trace.as_ref().map_or(&[], TraceLog::records)
    }

    /// Record the execution's terminal status for the eventual flush.
    pub fn set_status(&mut self, status: RunStatus) {
        self.status = Some(status);
    }

    /// Map an execution body's outcome onto a terminal status.
    pub fn record_outcome<T, E>(&mut self, outcome: &Result<T, E>) {
        self.set_status(match outcome {
            Ok(_) => RunStatus::Passed,
            Err(_) => RunStatus::Failed,
        });
    }

    /// Flush the trace now instead of at drop. Subsequent drops (and any
    /// repeated call) are no-ops, preserving the exactly-once guarantee.
    pub fn flush_now(&mut self) {
        if let Some(trace) = self.trace.take() {
            trace.flush(self.status.unwrap_or_default());
        }
    }
}

impl Drop for TestRun {
    fn drop(&mut self) {
        self.flush_now();
    }
}

/// Close every open context of the session, concurrently.
///
/// Logs a single `Close browser.` step before touching the session, even
/// when no context is open. All closures are awaited to completion; the
/// first failure is surfaced only afterward, so one stuck context cannot
/// leave its siblings leaked.
pub async fn cleanup(
    run: &mut TestRun,
    session: &dyn BrowserSession,
) -> Result<(), InteractionError> {
    run.step("Close browser.");

    let contexts = session.contexts();
    debug!(count = contexts.len(), "closing browser contexts");

    let results = future::join_all(contexts.iter().map(|context| context.close())).await;
    results.into_iter().collect()
}
