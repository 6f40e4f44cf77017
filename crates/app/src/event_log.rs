//! Subscriber that records every bus event in the trace log.

use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;

use minipilot_domain::event::{Event, EventKind};

/// Log events from `rx` until a [`EventKind::Shutdown`] event arrives or the
/// bus is dropped. Returns the number of events seen.
pub async fn run(rx: broadcast::Receiver<Event>) -> usize {
    let mut stream = BroadcastStream::new(rx);
    let mut seen = 0;
    while let Some(item) = stream.next().await {
        match item {
            Ok(event) => {
                seen += 1;
                tracing::debug!(kind = %event.kind, payload = %event.payload, "bus event");
                if event.kind == EventKind::Shutdown {
                    break;
                }
            }
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event log lagged, some events were dropped");
            }
        }
    }
    seen
}
