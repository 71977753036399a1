// reflow/src/stream/mod.rs

//! Reactive-style operators over `futures` streams.
//!
//! Pipelines that produce sequences (rather than a single value) compose these
//! operators lazily while their steps run; nothing is pulled from the source until
//! the final consumer starts polling.

pub mod lookahead;
pub mod repeat;

pub use lookahead::BoundedLookahead;
pub use repeat::RepeatCycles;

use crate::error::ReflowResult;
use futures_util::stream::{Stream, StreamExt};
use std::time::Duration;

/// Extension operators available on every `Stream`.
pub trait FluxExt: Stream {
  /// Emits the source, then replays its successful elements `extra` more times.
  /// See [`RepeatCycles`].
  fn repeat_cycles<T, E>(self, extra: usize) -> RepeatCycles<Self, T>
  where
    Self: Stream<Item = Result<T, E>> + Sized + Unpin,
    T: Clone,
  {
    RepeatCycles::new(self, extra)
  }

  /// Holds every element back for `interval` before yielding it.
  ///
  /// Elements are delayed one after another, so `n` elements take at least `n * interval`.
  /// The timer lives inside the stream and is dropped with it.
  fn delay_elements(self, interval: Duration) -> impl Stream<Item = Self::Item> + Send
  where
    Self: Sized + Send,
    Self::Item: Send,
  {
    self.then(move |item| async move {
      tokio::time::sleep(interval).await;
      item
    })
  }

  /// Moves the stream behind a producer task that stays at most `capacity` elements ahead.
  /// Must be called from within a tokio runtime. See [`BoundedLookahead`].
  fn bounded_lookahead(self, capacity: usize) -> ReflowResult<BoundedLookahead<Self::Item>>
  where
    Self: Sized + Send + 'static,
    Self::Item: Send + 'static,
  {
    BoundedLookahead::spawn(self, capacity)
  }
}

impl<S: Stream + ?Sized> FluxExt for S {}
