use tokio::sync::mpsc;
use tracing::debug;

use super::types::{WifiState, WifiStateChanged};

pub type NotificationReceiver = mpsc::UnboundedReceiver<WifiStateChanged>;

/// Fans public wifi state changes out to every registered observer.
///
/// Emission is synchronous: a notification is queued to all observers before
/// `emit` returns, so two notifications from one transition always arrive
/// back to back and in order.
#[derive(Debug, Default)]
pub struct StateNotifier {
    observers: Vec<mpsc::UnboundedSender<WifiStateChanged>>,
    last: Option<WifiStateChanged>,
}

impl StateNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new observer. It sees notifications emitted from now on.
    pub fn subscribe(&mut self) -> NotificationReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    pub fn emit(&mut self, current: WifiState, previous: WifiState) {
        let notification = WifiStateChanged::new(current, previous);
        debug!("Broadcasting {}", notification);

        // Drop observers whose receiver is gone
        self.observers
            .retain(|observer| observer.send(notification).is_ok());
        self.last = Some(notification);
    }

    /// Last notification emitted, if any
    pub fn last(&self) -> Option<WifiStateChanged> {
        self.last
    }

    #[cfg(test)]
    fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
