// reflow/examples/paced_lookahead.rs

use futures_util::stream::{self, StreamExt};
use reflow::{FluxExt, ReflowError};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ReflowError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

  info!("--- Repeat, pace and look ahead ---");

  // Three readings, replayed twice more, each held back 50ms.
  let readings = stream::iter(vec![Ok::<_, ReflowError>(21.5_f64), Ok(22.0), Ok(21.8)])
    .repeat_cycles(2)
    .delay_elements(Duration::from_millis(50));

  // The producer never gets more than two readings ahead of this loop.
  let mut delivered = readings.bounded_lookahead(2)?;
  let mut seen = 0;
  while let Some(reading) = delivered.next().await {
    let reading = reading?;
    seen += 1;
    info!(seen, reading, "Consumed reading.");
    tokio::time::sleep(Duration::from_millis(120)).await;
  }

  assert_eq!(seen, 9);
  Ok(())
}
