// tests/common/mod.rs
#![allow(dead_code)] // Not every test binary uses every helper.

use futures_util::stream::{self, Stream, StreamExt};
use reflow::{ContextData, ReflowError, PipelineControl};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing::Level;

// --- Common Context Structs ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Reflow framework error: {0}")]
  Reflow(String), // Debug-formatted ReflowError, so variants can be matched by name

  #[error("Test handler failed: {0}")]
  Handler(String),

  #[error("Test source failed: {0}")]
  Source(String),
}

impl From<ReflowError> for TestError {
  fn from(err: ReflowError) -> Self {
    TestError::Reflow(format!("{:?}", err))
  }
}

// --- Common Handler Creators ---
pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> reflow::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    let step_name_owned = step_name.to_string();
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name_owned.clone());
      tracing::debug!(target: "test_handlers", step = %step_name_owned, "executed, counter: {}", guard.counter);
      if guard.should_stop_at.as_deref() == Some(step_name_owned.as_str()) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> reflow::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    let step_name_owned = step_name.to_string();
    let error_message_owned = error_message.to_string();
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name_owned.clone());
      tracing::warn!(target: "test_handlers", step = %step_name_owned, "failing with: '{}'", error_message_owned);
      Err(TestError::Handler(error_message_owned))
    })
  })
}

// --- Instrumented sources for stream tests ---

/// A source of `0..len` that counts how many elements have been pulled from it.
pub fn counting_source(len: usize, pulled: Arc<AtomicUsize>) -> impl Stream<Item = usize> + Send + 'static {
  stream::iter(0..len).map(move |n| {
    pulled.fetch_add(1, Ordering::SeqCst);
    n
  })
}

pub fn ok_source(items: Vec<&'static str>) -> impl Stream<Item = Result<&'static str, TestError>> + Unpin {
  stream::iter(items.into_iter().map(Ok))
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
