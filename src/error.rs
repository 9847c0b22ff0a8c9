use thiserror::Error;

use crate::wifi::types::OperationalMode;

/// Failures reported by the radio interface driver.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("Interface setup failed: {0}")]
    SetupFailed(String),

    #[error("Switch to {mode} mode failed on {interface}")]
    SwitchFailed {
        interface: String,
        mode: OperationalMode,
    },

    #[error("Unknown interface: {0}")]
    InterfaceMismatch(String),

    #[error("Driver unavailable: {0}")]
    Unavailable(String),
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Unified error type for the controller handle
#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Controller event loop has exited")]
    ChannelClosed,

    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),
}

pub type ControllerResult<T> = Result<T, ControllerError>;

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for ControllerError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        Self::ChannelClosed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for ControllerError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::ChannelClosed
    }
}
