use super::types::LossReason;

/// Transmit-power limiting coordinator
pub trait SarManager: Send {
    fn set_scan_only_state(&mut self, enabled: bool);
    fn set_client_state(&mut self, enabled: bool);
}

/// Opportunistic reconnection scanning, active only in scan-only mode
pub trait WakeupController: Send {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Receives unexpected interface loss, e.g. to kick off self recovery
pub trait InterfaceFaultHandler: Send {
    fn on_interface_lost(&mut self, interface: &str, reason: LossReason);
}

/// High-level outcome listener
pub trait ModeListener: Send {
    fn on_started(&mut self);
    fn on_stopped(&mut self);
    fn on_start_failure(&mut self);
}

/// Everything the controller talks to besides the driver, injected at construction
pub struct Collaborators {
    pub sar: Box<dyn SarManager>,
    pub wakeup: Box<dyn WakeupController>,
    pub fault_handler: Box<dyn InterfaceFaultHandler>,
    pub listener: Box<dyn ModeListener>,
}
