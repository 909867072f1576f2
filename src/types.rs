//! Common value types shared across the interaction and trace layers

use serde::{Deserialize, Serialize};
use std::fmt;

/// On-screen rectangle of a laid-out element, in CSS pixels.
///
/// Layout engines may report no box at all while an element is attached
/// but not yet laid out, which is why geometry probes return
/// `Option<BoundingBox>` rather than a bare value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Vertical midpoint, the usual grab point for drag gestures.
    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// Terminal status of one test execution, as reported by the test runner.
///
/// This is the closed set the runner boundary can produce. `Unknown` is
/// the default when the runner reports nothing at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    Passed,
    Failed,
    TimedOut,
    Skipped,
    #[default]
    Unknown,
}

impl fmt::Display for RunStatus {
    /// Renders the uppercased token used in trace framing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            RunStatus::Passed => "PASSED",
            RunStatus::Failed => "FAILED",
            RunStatus::TimedOut => "TIMEDOUT",
            RunStatus::Skipped => "SKIPPED",
            RunStatus::Unknown => "UNKNOWN",
        };
        f.write_str(token)
    }
}
