use crate::error::DriverResult;
use crate::event::InterfaceCallback;

/// Synchronous command surface of the radio interface driver.
///
/// Lifecycle events for the created interface come back later through the
/// [`InterfaceCallback`] handed over in [`setup_interface_for_scan_mode`].
///
/// [`setup_interface_for_scan_mode`]: InterfaceDriver::setup_interface_for_scan_mode
pub trait InterfaceDriver: Send {
    /// Create a client interface in scan-only mode, returning its name
    fn setup_interface_for_scan_mode(&mut self, callback: InterfaceCallback)
        -> DriverResult<String>;

    fn switch_to_connectivity_mode(&mut self, interface: &str) -> DriverResult<()>;

    fn switch_to_scan_mode(&mut self, interface: &str) -> DriverResult<()>;

    fn teardown_interface(&mut self, interface: &str);
}
