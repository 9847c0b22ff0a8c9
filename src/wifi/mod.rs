pub mod controller;
pub mod coordinator;
pub mod driver;
pub mod notifier;
pub mod sim;
pub mod types;

pub use controller::{ClientModeController, ClientModeManager, ClientModeStateMachine};
pub use types::*;
