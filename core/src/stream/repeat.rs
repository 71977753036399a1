// reflow/src/stream/repeat.rs

use futures_util::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Emits a fallible source once and then replays its successful elements `extra` more times.
///
/// The source is pulled lazily and only during the first cycle; later cycles are served
/// from the recorded copy, so the source is never re-subscribed. An error in the first
/// cycle is forwarded and ends the stream without any repetition.
pub struct RepeatCycles<S, T> {
  source: Option<S>,
  recorded: Vec<T>,
  remaining_cycles: usize,
  replay_pos: usize,
  failed: bool,
}

impl<S, T> RepeatCycles<S, T> {
  pub(crate) fn new(source: S, extra: usize) -> Self {
    Self {
      source: Some(source),
      recorded: Vec::new(),
      remaining_cycles: extra,
      replay_pos: 0,
      failed: false,
    }
  }
}

// `recorded` is never pinned; only the source is polled through a pin.
impl<S: Unpin, T> Unpin for RepeatCycles<S, T> {}

impl<S, T, E> Stream for RepeatCycles<S, T>
where
  S: Stream<Item = Result<T, E>> + Unpin,
  T: Clone,
{
  type Item = Result<T, E>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let this = self.get_mut();
    if this.failed {
      return Poll::Ready(None);
    }

    if let Some(source) = this.source.as_mut() {
      match ready!(source.poll_next_unpin(cx)) {
        Some(Ok(item)) => {
          this.recorded.push(item.clone());
          return Poll::Ready(Some(Ok(item)));
        }
        Some(Err(e)) => {
          this.failed = true;
          this.source = None;
          return Poll::Ready(Some(Err(e)));
        }
        None => {
          this.source = None;
        }
      }
    }

    loop {
      if this.remaining_cycles == 0 || this.recorded.is_empty() {
        return Poll::Ready(None);
      }
      if let Some(item) = this.recorded.get(this.replay_pos) {
        this.replay_pos += 1;
        return Poll::Ready(Some(Ok(item.clone())));
      }
      this.remaining_cycles -= 1;
      this.replay_pos = 0;
    }
  }
}
