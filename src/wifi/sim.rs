//! In-process radio used by the binary.
//!
//! [`SimulatedDriver`] answers driver commands according to
//! [`SimulationConfig`] and reports lifecycle events the way hardware does:
//! a created interface comes up right away and a torn-down one reports
//! destroyed. [`SimulatedRadio`] lets the caller inject further events.

use std::sync::{Arc, Mutex};

use clap::ValueEnum;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::error::{ControllerResult, DriverError, DriverResult};
use crate::event::InterfaceCallback;

use super::controller::ClientModeManager;
use super::coordinator::{
    Collaborators, InterfaceFaultHandler, ModeListener, SarManager, WakeupController,
};
use super::driver::InterfaceDriver;
use super::types::{LossReason, OperationalMode, Role};

#[derive(Debug, Default)]
struct RadioState {
    interface: Option<String>,
    callback: Option<InterfaceCallback>,
}

/// Injects hardware events for the interface the simulated driver created
#[derive(Debug, Clone, Default)]
pub struct SimulatedRadio {
    state: Arc<Mutex<RadioState>>,
}

impl SimulatedRadio {
    pub fn interface_down(&self) -> ControllerResult<()> {
        self.fire(|callback, name| callback.on_down(name))
    }

    pub fn interface_destroyed(&self) -> ControllerResult<()> {
        self.fire(|callback, name| callback.on_destroyed(name))
    }

    fn fire(&self, deliver: impl FnOnce(&InterfaceCallback, &str)) -> ControllerResult<()> {
        let state = self
            .state
            .lock()
            .map_err(|_| DriverError::Unavailable("radio state poisoned".into()))?;
        match (&state.callback, &state.interface) {
            (Some(callback), Some(name)) => {
                deliver(callback, name);
                Ok(())
            }
            _ => Err(DriverError::InterfaceMismatch("no interface created".into()).into()),
        }
    }
}

pub struct SimulatedDriver {
    config: SimulationConfig,
    radio: SimulatedRadio,
}

impl SimulatedDriver {
    pub fn new(config: SimulationConfig) -> (Self, SimulatedRadio) {
        let radio = SimulatedRadio::default();
        let driver = Self {
            config,
            radio: radio.clone(),
        };
        (driver, radio)
    }

    fn check_interface(&self, interface: &str) -> DriverResult<()> {
        let state = self
            .radio
            .state
            .lock()
            .map_err(|_| DriverError::Unavailable("radio state poisoned".into()))?;
        if state.interface.as_deref() == Some(interface) {
            Ok(())
        } else {
            Err(DriverError::InterfaceMismatch(interface.to_string()))
        }
    }
}

impl InterfaceDriver for SimulatedDriver {
    fn setup_interface_for_scan_mode(
        &mut self,
        callback: InterfaceCallback,
    ) -> DriverResult<String> {
        if self.config.fail_setup {
            return Err(DriverError::SetupFailed("simulated setup failure".into()));
        }

        let mut state = self
            .radio
            .state
            .lock()
            .map_err(|_| DriverError::Unavailable("radio state poisoned".into()))?;

        let name = self.config.interface_name.clone();
        info!("[driver] created {} in scan mode", name);
        callback.on_up(&name);
        state.interface = Some(name.clone());
        state.callback = Some(callback);
        Ok(name)
    }

    fn switch_to_connectivity_mode(&mut self, interface: &str) -> DriverResult<()> {
        self.check_interface(interface)?;
        if self.config.fail_switch_to_connect {
            return Err(DriverError::SwitchFailed {
                interface: interface.to_string(),
                mode: OperationalMode::Connect,
            });
        }
        info!("[driver] {} switched to connectivity mode", interface);
        Ok(())
    }

    fn switch_to_scan_mode(&mut self, interface: &str) -> DriverResult<()> {
        self.check_interface(interface)?;
        if self.config.fail_switch_to_scan {
            return Err(DriverError::SwitchFailed {
                interface: interface.to_string(),
                mode: OperationalMode::ScanOnly,
            });
        }
        info!("[driver] {} switched to scan mode", interface);
        Ok(())
    }

    fn teardown_interface(&mut self, interface: &str) {
        let Ok(mut state) = self.radio.state.lock() else {
            warn!("[driver] radio state poisoned, cannot tear down {}", interface);
            return;
        };
        if state.interface.as_deref() != Some(interface) {
            warn!("[driver] teardown of unknown interface {}", interface);
            return;
        }
        info!("[driver] tore down {}", interface);
        state.interface = None;
        if let Some(callback) = state.callback.take() {
            callback.on_destroyed(interface);
        }
    }
}

// ── Logging collaborators ─────────────────────────────────────────────

struct TracingSar;

impl SarManager for TracingSar {
    fn set_scan_only_state(&mut self, enabled: bool) {
        info!("[sar] scan-only state enabled={}", enabled);
    }

    fn set_client_state(&mut self, enabled: bool) {
        info!("[sar] client state enabled={}", enabled);
    }
}

struct TracingWakeup;

impl WakeupController for TracingWakeup {
    fn start(&mut self) {
        info!("[wakeup] started");
    }

    fn stop(&mut self) {
        info!("[wakeup] stopped");
    }
}

struct TracingFaultHandler;

impl InterfaceFaultHandler for TracingFaultHandler {
    fn on_interface_lost(&mut self, interface: &str, reason: LossReason) {
        warn!("[recovery] {} lost: {}", interface, reason);
    }
}

struct TracingListener;

impl ModeListener for TracingListener {
    fn on_started(&mut self) {
        info!("[listener] started");
    }

    fn on_stopped(&mut self) {
        info!("[listener] stopped");
    }

    fn on_start_failure(&mut self) {
        warn!("[listener] start failure");
    }
}

/// Collaborators that only log what they are told
pub fn tracing_collaborators() -> Collaborators {
    Collaborators {
        sar: Box::new(TracingSar),
        wakeup: Box::new(TracingWakeup),
        fault_handler: Box::new(TracingFaultHandler),
        listener: Box::new(TracingListener),
    }
}

// ── Scripted steps ────────────────────────────────────────────────────

/// One step of a scripted session
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Step {
    Start,
    Stop,
    /// Request the client-primary role
    Client,
    /// Request the scan-only role
    ScanOnly,
    /// Report the interface down
    Down,
    /// Report the interface destroyed
    Destroyed,
    /// Print the status snapshot
    Status,
}

/// Queue one step. `Status` is handled by the caller.
pub fn apply_step(
    step: Step,
    manager: &ClientModeManager,
    radio: &SimulatedRadio,
) -> ControllerResult<()> {
    debug!("Applying step {:?}", step);
    match step {
        Step::Start => manager.start(),
        Step::Stop => manager.stop(),
        Step::Client => manager.set_role(Role::ClientPrimary),
        Step::ScanOnly => manager.set_role(Role::ScanOnly),
        Step::Down => radio.interface_down(),
        Step::Destroyed => radio.interface_destroyed(),
        Step::Status => Ok(()),
    }
}
