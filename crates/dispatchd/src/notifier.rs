//! Notification bus - fans dispatch events out to live subscribers
//!
//! Publishing never fails the workflow that produced the event: with no
//! subscribers the event is dropped and logged at debug.

use dispatch_shared::DispatchEvent;
use tokio::sync::broadcast;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<DispatchEvent>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: DispatchEvent) {
        let kind = event.kind();
        match self.tx.send(event) {
            Ok(receivers) => debug!("Published {} to {} subscriber(s)", kind, receivers),
            Err(_) => debug!("Dropped {}: no subscribers", kind),
        }
    }

    pub fn subscribe(&self, station_id: Option<String>) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
            station_id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(256)
    }
}

/// A receiver, optionally filtered to events concerning one station
pub struct Subscription {
    rx: broadcast::Receiver<DispatchEvent>,
    station_id: Option<String>,
}

impl Subscription {
    /// Next matching event; `None` once the bus is gone.
    /// A lagging subscriber skips what it missed and keeps going.
    pub async fn recv(&mut self) -> Option<DispatchEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => {
                    if self.wants(&event) {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(skipped = n, "Notification subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking variant used by tests and drains
    pub fn try_recv(&mut self) -> Option<DispatchEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    if self.wants(&event) {
                        return Some(event);
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    warn!(skipped = n, "Notification subscriber lagged");
                }
                Err(_) => return None,
            }
        }
    }

    fn wants(&self, event: &DispatchEvent) -> bool {
        match &self.station_id {
            Some(id) => event.concerns(id),
            None => true,
        }
    }
}
