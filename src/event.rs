use tokio::sync::{mpsc, oneshot};
use tracing::trace;

use crate::wifi::types::{ControllerStatus, Role};

/// Requests issued by the owner of the controller
#[derive(Debug)]
pub enum ControllerCommand {
    /// Bring the interface up in scan-only mode
    Start,
    /// Tear the interface down
    Stop,
    /// Move to the mode matching the role
    SetRole(Role),
    /// Reply with the current snapshot once everything queued before it is processed
    QueryStatus(oneshot::Sender<ControllerStatus>),
    /// Stop any active session and end the event loop
    Shutdown,
}

/// Interface lifecycle events delivered by the radio driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    Up(String),
    Down(String),
    Destroyed(String),
}

impl DriverEvent {
    pub fn interface_name(&self) -> &str {
        match self {
            Self::Up(name) | Self::Down(name) | Self::Destroyed(name) => name,
        }
    }
}

/// Everything the controller reacts to, serialized onto one queue
#[derive(Debug)]
pub enum Message {
    Command(ControllerCommand),
    /// Driver event tagged with the session whose callback delivered it
    Driver { session: u64, event: DriverEvent },
}

pub type MessageSender = mpsc::UnboundedSender<Message>;
pub type MessageReceiver = mpsc::UnboundedReceiver<Message>;

/// Create the controller's message queue
pub fn channel() -> (MessageSender, MessageReceiver) {
    mpsc::unbounded_channel()
}

/// Callback registered with the driver at setup time.
///
/// Driver threads may call it at any moment; every call is turned into a
/// [`Message::Driver`] on the controller queue so it is handled in arrival
/// order with the owner's commands. Each callback is bound to the session
/// that created it, so events still in flight from a torn-down interface
/// cannot be mistaken for events of a later one reusing the same name.
#[derive(Debug, Clone)]
pub struct InterfaceCallback {
    tx: MessageSender,
    session: u64,
}

impl InterfaceCallback {
    pub fn new(tx: MessageSender, session: u64) -> Self {
        Self { tx, session }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn on_up(&self, name: &str) {
        self.deliver(DriverEvent::Up(name.to_string()));
    }

    pub fn on_down(&self, name: &str) {
        self.deliver(DriverEvent::Down(name.to_string()));
    }

    pub fn on_destroyed(&self, name: &str) {
        self.deliver(DriverEvent::Destroyed(name.to_string()));
    }

    fn deliver(&self, event: DriverEvent) {
        // Closed queue means the controller is gone; nothing left to notify.
        let message = Message::Driver {
            session: self.session,
            event,
        };
        if let Err(e) = self.tx.send(message) {
            trace!("Dropping driver event after controller exit: {:?}", e.0);
        }
    }
}
