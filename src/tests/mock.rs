//! Scripted in-memory collaborators for exercising the retry loops
//! without a live browser.

use crate::element::ElementImpl;
use crate::errors::InteractionError;
use crate::fixture::{BrowserContext, BrowserSession};
use crate::types::BoundingBox;
use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// An element whose probes follow a fixed script: a number of unready
/// responses, then a steady final answer. Counters record how often each
/// probe ran so tests can assert exact attempt counts.
#[derive(Debug, Default)]
pub struct ScriptedElement {
    pub selector: String,
    /// Probes that report whitespace-only text before `final_text` shows.
    pub empty_text_probes: u32,
    pub final_text: String,
    /// When set, every text probe fails with this platform error.
    pub text_error: Option<String>,
    /// Leading `set_value` calls the fake swallows without storing.
    pub dropped_sets: u32,
    /// Probes that report no layout before `final_box` shows.
    pub absent_box_probes: u32,
    pub final_box: Option<BoundingBox>,
    pub value: Mutex<String>,
    pub text_probes: AtomicU32,
    pub set_calls: AtomicU32,
    pub box_probes: AtomicU32,
}

impl ScriptedElement {
    pub fn named(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ElementImpl for Arc<ScriptedElement> {
    fn selector(&self) -> String {
        self.selector.clone()
    }

    async fn text(&self) -> Result<String, InteractionError> {
        if let Some(message) = &self.text_error {
            return Err(InteractionError::PlatformError(message.clone()));
        }
        let probe = self.text_probes.fetch_add(1, Ordering::SeqCst);
        if probe < self.empty_text_probes {
            Ok("  \n ".to_string())
        } else {
            Ok(self.final_text.clone())
        }
    }

    async fn input_value(&self) -> Result<String, InteractionError> {
        Ok(self.value.lock().unwrap().clone())
    }

    async fn set_value(&self, value: &str) -> Result<(), InteractionError> {
        let call = self.set_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call > self.dropped_sets {
            *self.value.lock().unwrap() = value.to_string();
        }
        Ok(())
    }

    async fn bounding_box(&self) -> Result<Option<BoundingBox>, InteractionError> {
        let probe = self.box_probes.fetch_add(1, Ordering::SeqCst);
        if probe < self.absent_box_probes {
            Ok(None)
        } else {
            Ok(self.final_box)
        }
    }
}

pub struct FakeContext {
    pub name: String,
    pub fail: bool,
    pub closed: AtomicU32,
}

impl FakeContext {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail: false,
            closed: AtomicU32::new(0),
        })
    }

    pub fn failing(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            fail: true,
            closed: AtomicU32::new(0),
        })
    }
}

#[async_trait]
impl BrowserContext for FakeContext {
    async fn close(&self) -> Result<(), InteractionError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(InteractionError::PlatformError(format!(
                "context {:?} refused to close",
                self.name
            )))
        } else {
            Ok(())
        }
    }
}

pub struct FakeSession {
    pub contexts: Vec<Arc<FakeContext>>,
}

impl BrowserSession for FakeSession {
    fn contexts(&self) -> Vec<Arc<dyn BrowserContext>> {
        self.contexts
            .iter()
            .map(|context| context.clone() as Arc<dyn BrowserContext>)
            .collect()
    }
}

/// Clonable in-memory sink so a test can hand a writer to a trace and
/// still read what was emitted afterward.
#[derive(Clone, Default)]
pub struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("trace output is UTF-8")
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
