// reflow/src/stream/lookahead.rs

//! Bounded-lookahead delivery: an eager producer task that runs ahead of its consumer
//! by at most `capacity` elements.

use crate::error::{ReflowError, ReflowResult};
use futures_util::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tracing::{event, Level};

/// Consumer side of a bounded-lookahead pipe.
///
/// Every element the producer pulls from the source holds one semaphore permit until
/// the consumer receives it, so at no instant are more than `capacity` elements pulled
/// but not yet consumed. The producer checks for a permit *before* pulling, which means
/// it suspends without touching the source once the window is full.
///
/// Dropping this value aborts the producer task: the source is not polled again.
pub struct BoundedLookahead<T> {
  receiver: mpsc::UnboundedReceiver<(T, OwnedSemaphorePermit)>,
  producer: JoinHandle<()>,
  capacity: usize,
}

impl<T: Send + 'static> BoundedLookahead<T> {
  /// Spawns the producer on the current tokio runtime.
  pub fn spawn<S>(source: S, capacity: usize) -> ReflowResult<Self>
  where
    S: Stream<Item = T> + Send + 'static,
  {
    if capacity == 0 {
      return Err(ReflowError::ConfigurationError {
        scope: "bounded_lookahead".to_string(),
        message: "lookahead capacity must be at least 1".to_string(),
      });
    }

    let permits = Arc::new(Semaphore::new(capacity));
    let (tx, receiver) = mpsc::unbounded_channel();
    let producer = tokio::spawn(produce(source, permits, tx));

    Ok(Self {
      receiver,
      producer,
      capacity,
    })
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }
}

async fn produce<S, T>(source: S, permits: Arc<Semaphore>, tx: mpsc::UnboundedSender<(T, OwnedSemaphorePermit)>)
where
  S: Stream<Item = T> + Send + 'static,
  T: Send + 'static,
{
  let mut source = Box::pin(source);
  let mut produced: u64 = 0;

  loop {
    let permit = tokio::select! {
      biased;
      _ = tx.closed() => break,
      permit = permits.clone().acquire_owned() => match permit {
        Ok(permit) => permit,
        Err(_) => break,
      },
    };

    let next = tokio::select! {
      biased;
      _ = tx.closed() => break,
      next = source.next() => next,
    };

    let Some(item) = next else { break };
    if tx.send((item, permit)).is_err() {
      break;
    }
    produced += 1;
  }

  event!(Level::DEBUG, produced, consumer_gone = tx.is_closed(), "Lookahead producer finished.");
}

impl<T> Stream for BoundedLookahead<T> {
  type Item = T;

  fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
    // The permit is released as soon as the element changes hands.
    self.receiver.poll_recv(cx).map(|received| received.map(|(item, _permit)| item))
  }
}

impl<T> Drop for BoundedLookahead<T> {
  fn drop(&mut self) {
    self.producer.abort();
  }
}
