use crate::errors::InteractionError;
use crate::types::BoundingBox;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, instrument, warn};

/// Default wait budget for text population.
pub const DEFAULT_TEXT_TIMEOUT: Duration = Duration::from_secs(5);
/// Fixed interval between text probes.
pub const TEXT_POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Default attempt budget for the set-then-verify cycle.
pub const DEFAULT_FILL_ATTEMPTS: u32 = 3;
/// Fixed delay between set-then-verify attempts.
pub const FILL_RETRY_DELAY: Duration = Duration::from_millis(500);
/// Default probe budget for layout geometry.
pub const DEFAULT_BOX_RETRIES: u32 = 10;
/// Default delay between geometry probes.
pub const DEFAULT_BOX_DELAY: Duration = Duration::from_millis(250);

/// Interface for the underlying element implementation supplied by the
/// driving collaborator (a browser binding, a remote session, a fake).
///
/// Every probe is fallible: the collaborator may lose its session or the
/// element may detach mid-run. Such faults surface as
/// [`InteractionError::PlatformError`] and are never retried here.
#[async_trait]
pub trait ElementImpl: Send + Sync + Debug {
    /// Human-readable identification of the target, used in error
    /// messages and trace output.
    fn selector(&self) -> String;

    /// Current rendered text content of the element.
    async fn text(&self) -> Result<String, InteractionError>;

    /// Current value of the element, when it is an input.
    async fn input_value(&self) -> Result<String, InteractionError>;

    /// Replace the element's value.
    async fn set_value(&self, value: &str) -> Result<(), InteractionError>;

    /// Layout geometry, or `None` while the element has no box yet.
    async fn bounding_box(&self) -> Result<Option<BoundingBox>, InteractionError>;
}

/// An element handle with resilient interaction operations layered on top.
///
/// Wraps an already-resolved collaborator handle and adds the polling
/// combinators; the wrapper is the capability extension, so there is no
/// runtime patching to install or guard.
#[derive(Debug)]
pub struct Element {
    inner: Box<dyn ElementImpl>,
}

impl Element {
    pub fn new(inner: impl ElementImpl + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }

    pub fn selector(&self) -> String {
        self.inner.selector()
    }

    pub async fn text(&self) -> Result<String, InteractionError> {
        self.inner.text().await
    }

    pub async fn input_value(&self) -> Result<String, InteractionError> {
        self.inner.input_value().await
    }

    pub async fn set_value(&self, value: &str) -> Result<(), InteractionError> {
        self.inner.set_value(value).await
    }

    pub async fn bounding_box(&self) -> Result<Option<BoundingBox>, InteractionError> {
        self.inner.bounding_box().await
    }

    /// Wait until the element's trimmed text content is non-empty.
    ///
    /// Probes every [`TEXT_POLL_INTERVAL`] and succeeds on the first
    /// non-empty observation. The bound is hard wall-clock time, not an
    /// attempt count: once `timeout` has elapsed the wait fails with
    /// [`InteractionError::Timeout`] even if the next probe would have
    /// succeeded. If no timeout is provided, uses [`DEFAULT_TEXT_TIMEOUT`].
    #[instrument(level = "debug", skip(self, timeout), fields(selector = %self.inner.selector()))]
    pub async fn wait_for_text(&self, timeout: Option<Duration>) -> Result<(), InteractionError> {
        let timeout = timeout.unwrap_or(DEFAULT_TEXT_TIMEOUT);
        if timeout.is_zero() {
            return Err(InteractionError::InvalidArgument(
                "text wait timeout must be positive".to_string(),
            ));
        }

        let start = Instant::now();
        loop {
            if !self.inner.text().await?.trim().is_empty() {
                debug!(elapsed = ?start.elapsed(), "text populated");
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(InteractionError::Timeout(format!(
                    "timed out after {timeout:?} waiting for text in {:?}",
                    self.inner.selector()
                )));
            }
            sleep(TEXT_POLL_INTERVAL).await;
        }
    }

    /// Set the element's value and verify it stuck.
    ///
    /// A single set is not trustworthy: input events can be dropped or
    /// coalesced by the UI layer, so each attempt re-runs the full
    /// set-then-read-back cycle and compares byte for byte. Bounded by
    /// attempt count rather than time, because waiting without re-setting
    /// does not help when the set itself was lost. Fails with
    /// [`InteractionError::VerificationFailed`] after `max_attempts`
    /// consecutive mismatches, leaving the field with the last-attempted
    /// value.
    #[instrument(level = "debug", skip(self, value, max_attempts), fields(selector = %self.inner.selector()))]
    pub async fn fill_safely(
        &self,
        value: &str,
        max_attempts: Option<u32>,
    ) -> Result<(), InteractionError> {
        let max_attempts = max_attempts.unwrap_or(DEFAULT_FILL_ATTEMPTS);
        if max_attempts == 0 {
            return Err(InteractionError::InvalidArgument(
                "fill attempt budget must be positive".to_string(),
            ));
        }

        for attempt in 1..=max_attempts {
            self.inner.set_value(value).await?;
            if self.inner.input_value().await? == value {
                debug!(attempt, "value verified");
                return Ok(());
            }
            warn!(attempt, max_attempts, "read-back mismatch after set");
            if attempt < max_attempts {
                sleep(FILL_RETRY_DELAY).await;
            }
        }

        Err(InteractionError::VerificationFailed(format!(
            "value never verified in {:?} after {max_attempts} attempts",
            self.inner.selector()
        )))
    }

    /// Wait until the element reports layout geometry.
    ///
    /// An attached element can legitimately have no box for several render
    /// passes, so the probe returning `None` is an expected intermediate
    /// state here, not a fault. Bounded by probe count since the number of
    /// render passes, not elapsed time, determines convergence. Returns
    /// the first present box; fails with [`InteractionError::NotFound`]
    /// after `retries` consecutive absent results.
    #[instrument(level = "debug", skip(self, retries, delay), fields(selector = %self.inner.selector()))]
    pub async fn wait_for_bounding_box(
        &self,
        retries: Option<u32>,
        delay: Option<Duration>,
    ) -> Result<BoundingBox, InteractionError> {
        let retries = retries.unwrap_or(DEFAULT_BOX_RETRIES);
        let delay = delay.unwrap_or(DEFAULT_BOX_DELAY);
        if retries == 0 {
            return Err(InteractionError::InvalidArgument(
                "bounding box retry budget must be positive".to_string(),
            ));
        }

        for attempt in 1..=retries {
            if let Some(bounds) = self.inner.bounding_box().await? {
                debug!(attempt, ?bounds, "bounding box present");
                return Ok(bounds);
            }
            if attempt < retries {
                sleep(delay).await;
            }
        }

        Err(InteractionError::NotFound(format!(
            "no bounding box for {:?} after {retries} probes",
            self.inner.selector()
        )))
    }
}
