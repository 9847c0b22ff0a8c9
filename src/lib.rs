//! Client-mode interface controller for a single wireless interface.
//!
//! The controller owns the interface lifecycle, moves it between scan-only
//! and connect mode on request, and publishes the ordered public wifi state
//! notifications that downstream consumers treat as authoritative.
//!
//! - [`wifi::controller`] - the state machine, its event loop and handle
//! - [`wifi::driver`] / [`wifi::coordinator`] - collaborator contracts
//! - [`wifi::notifier`] - public notification fan-out
//! - [`event`] - queue messages and the driver callback adapter
//! - [`config`] - layered TOML configuration
//! - [`error`] - error types

pub mod config;
pub mod error;
pub mod event;
pub mod wifi;

pub use error::{ControllerError, ControllerResult, DriverError, DriverResult};
pub use wifi::{ClientModeController, ClientModeManager};
