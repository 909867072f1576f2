//! Ordered, human-readable step trace for one test execution
//!
//! Steps are buffered in memory and emitted in a single framed block when
//! the execution reaches its terminal status, so traces from concurrent
//! executions never interleave line by line.

use crate::types::RunStatus;
use std::io::{self, Write};

/// One recorded step. Append-only; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// 1-based position of the step within its execution.
    pub index: u32,
    pub text: String,
}

/// Step buffer scoped to a single test execution.
///
/// One instance per execution, never shared across concurrent executions;
/// sharing would corrupt the index sequence. Flushing consumes the log,
/// making `Recording -> Flushed` terminal in the type system.
pub struct TraceLog {
    title: String,
    next_index: u32,
    records: Vec<StepRecord>,
    sink: Box<dyn Write + Send>,
}

impl TraceLog {
    /// Create a log for the execution with the given title, writing to
    /// stdout at flush time.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_sink(title, io::stdout())
    }

    /// Create a log writing its flushed trace to an arbitrary sink.
    pub fn with_sink(title: impl Into<String>, sink: impl Write + Send + 'static) -> Self {
        Self {
            title: title.into(),
            next_index: 1,
            records: Vec::new(),
            sink: Box::new(sink),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Steps recorded so far, in call order.
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    /// Record a step. In-memory append only; no I/O happens until
    /// [`flush`](Self::flush), so this is cheap to call on every action.
    pub fn step(&mut self, description: impl Into<String>) {
        self.records.push(StepRecord {
            index: self.next_index,
            text: description.into(),
        });
        self.next_index += 1;
    }

    /// Emit the buffered trace, framed with the execution title and its
    /// terminal status. A log with zero steps emits nothing at all.
    ///
    /// Consumes the log: this is the terminal operation of its lifecycle,
    /// invoked exactly once by the owning fixture. Writes are best-effort;
    /// a failing sink must not fail the execution being observed.
    pub fn flush(mut self, status: RunStatus) {
        if self.records.is_empty() {
            return;
        }

        let _ = writeln!(self.sink);
        let _ = writeln!(self.sink, "==== START: {} [{}] ====", self.title, status);
        for record in &self.records {
            // Width 2 keeps single-digit step numbers aligned with the rest.
            let _ = writeln!(self.sink, "Step # {:>2}: {}", record.index, record.text);
        }
        let _ = writeln!(self.sink, "==== END:   {} [{}] ====", self.title, status);
        let _ = self.sink.flush();
    }
}

impl std::fmt::Debug for TraceLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLog")
            .field("title", &self.title)
            .field("next_index", &self.next_index)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}
