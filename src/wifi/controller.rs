//! Client-mode interface controller.
//!
//! [`ClientModeStateMachine`] owns one wireless interface and moves it between
//! scan-only and connect mode. Every input, owner commands and driver
//! callbacks alike, arrives as a [`Message`] on one queue and is handled to
//! completion before the next one is looked at, so commands never race with
//! callbacks.
//!
//! [`ClientModeController`] pairs the machine with its queue and runs it on a
//! tokio task; [`ClientModeManager`] is the cheap, cloneable handle used to
//! talk to it.

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::FeaturesConfig;
use crate::error::ControllerResult;
use crate::event::{
    self, ControllerCommand, DriverEvent, InterfaceCallback, Message, MessageReceiver,
    MessageSender,
};

use super::coordinator::Collaborators;
use super::driver::InterfaceDriver;
use super::notifier::{NotificationReceiver, StateNotifier};
use super::types::{
    ControllerState, ControllerStatus, LossReason, OperationalMode, Role, WifiState,
};

pub struct ClientModeStateMachine {
    driver: Box<dyn InterfaceDriver>,
    collaborators: Collaborators,
    notifier: StateNotifier,
    features: FeaturesConfig,
    /// Handed to the driver so its callbacks land on our own queue
    queue: MessageSender,
    status_tx: watch::Sender<ControllerStatus>,

    state: ControllerState,
    interface_name: Option<String>,
    interface_up: bool,
    requested_role: Role,
    /// Bumped on every start; callbacks from earlier sessions carry an older value
    session: u64,
}

impl ClientModeStateMachine {
    pub fn new(
        driver: Box<dyn InterfaceDriver>,
        collaborators: Collaborators,
        features: FeaturesConfig,
        queue: MessageSender,
    ) -> Self {
        let (status_tx, _) = watch::channel(ControllerStatus::default());
        Self {
            driver,
            collaborators,
            notifier: StateNotifier::new(),
            features,
            queue,
            status_tx,
            state: ControllerState::NotStarted,
            interface_name: None,
            interface_up: false,
            requested_role: Role::Unknown,
            session: 0,
        }
    }

    /// Register an observer for public wifi state notifications
    pub fn subscribe(&mut self) -> NotificationReceiver {
        self.notifier.subscribe()
    }

    /// Snapshot receiver, refreshed after every processed message
    pub fn status_receiver(&self) -> watch::Receiver<ControllerStatus> {
        self.status_tx.subscribe()
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            state: self.state,
            interface_name: self.interface_name.clone(),
            mode: self.state.mode(),
            interface_up: self.interface_up,
            wifi_state: self.wifi_state(),
            requested_role: self.requested_role,
        }
    }

    /// Public state as last broadcast; `Disabled` before the first broadcast
    fn wifi_state(&self) -> WifiState {
        self.notifier
            .last()
            .map_or(WifiState::Disabled, |n| n.current_state)
    }

    /// Process one message to completion
    pub fn handle(&mut self, message: Message) {
        match message {
            Message::Command(ControllerCommand::Start) => self.handle_start(),
            Message::Command(ControllerCommand::Stop | ControllerCommand::Shutdown) => {
                self.handle_stop()
            }
            Message::Command(ControllerCommand::SetRole(role)) => self.handle_set_role(role),
            Message::Command(ControllerCommand::QueryStatus(reply)) => {
                if reply.send(self.status()).is_err() {
                    debug!("Status requester went away");
                }
            }
            Message::Driver { session, event } => self.handle_driver_event(session, event),
        }
        self.status_tx.send_replace(self.status());
    }

    // ── Commands ──────────────────────────────────────────────────────

    fn handle_start(&mut self) {
        if self.state.is_active() {
            debug!("Start requested while {}, ignoring", self.state);
            return;
        }

        self.session += 1;
        info!("Starting client mode in scan-only mode (session {})", self.session);
        let callback = InterfaceCallback::new(self.queue.clone(), self.session);
        match self.driver.setup_interface_for_scan_mode(callback) {
            Ok(name) => {
                info!("Created client interface {}, waiting for it to come up", name);
                self.interface_name = Some(name);
                self.interface_up = false;
                self.state = ControllerState::InterfaceSetup;
            }
            Err(e) => {
                error!("Failed to create client interface: {}", e);
                self.requested_role = Role::Unknown;
                self.collaborators.listener.on_start_failure();
            }
        }
    }

    fn handle_stop(&mut self) {
        if !self.state.is_active() {
            debug!("Stop requested while {}, ignoring", self.state);
            return;
        }

        info!(
            "Stopping client mode on {}",
            self.interface_name.as_deref().unwrap_or("-")
        );
        self.exit_active_mode();
        self.release_interface(true);
        self.collaborators.listener.on_stopped();
    }

    fn handle_set_role(&mut self, role: Role) {
        self.requested_role = role;
        match self.state {
            ControllerState::ScanOnlyModeActive | ControllerState::ConnectModeActive => {
                self.apply_requested_role()
            }
            state => debug!("Role {} queued until setup completes ({})", role, state),
        }
    }

    fn apply_requested_role(&mut self) {
        let Some(current) = self.state.mode() else {
            return;
        };
        if current.role() == self.requested_role {
            debug!("Already in {} mode", current);
            return;
        }
        let Some(target) = self.requested_role.target_mode() else {
            return;
        };
        let Some(name) = self.interface_name.clone() else {
            return;
        };

        match target {
            OperationalMode::Connect => self.switch_to_connect_mode(&name),
            OperationalMode::ScanOnly => self.switch_to_scan_only_mode(&name),
        }
    }

    // ── Mode switches ─────────────────────────────────────────────────

    fn switch_to_connect_mode(&mut self, name: &str) {
        info!("Switching {} to connect mode", name);
        self.broadcast(WifiState::Enabling);

        if let Err(e) = self.driver.switch_to_connectivity_mode(name) {
            error!("Failed to switch {} to connect mode: {}", name, e);
            // Enabling was never confirmed, so the previous state is unknown
            self.notifier.emit(WifiState::Disabled, WifiState::Unknown);
            self.exit_scan_only_mode();
            self.release_interface(true);
            self.collaborators.listener.on_start_failure();
            return;
        }

        self.exit_scan_only_mode();
        self.enter_connect_mode();
    }

    fn switch_to_scan_only_mode(&mut self, name: &str) {
        info!("Switching {} to scan-only mode", name);
        self.exit_connect_mode();

        if let Err(e) = self.driver.switch_to_scan_mode(name) {
            error!("Failed to switch {} to scan-only mode: {}", name, e);
            self.release_interface(true);
            self.collaborators.listener.on_start_failure();
            return;
        }

        self.enter_scan_only_mode();
    }

    // ── Entry / exit actions ──────────────────────────────────────────

    fn enter_scan_only_mode(&mut self) {
        self.state = ControllerState::ScanOnlyModeActive;
        self.collaborators.wakeup.start();
        self.collaborators.sar.set_scan_only_state(true);
        info!("Scan-only mode active");
        self.collaborators.listener.on_started();
    }

    fn exit_scan_only_mode(&mut self) {
        self.collaborators.wakeup.stop();
        self.collaborators.sar.set_scan_only_state(false);
    }

    fn enter_connect_mode(&mut self) {
        self.state = ControllerState::ConnectModeActive;
        self.collaborators.sar.set_client_state(true);
        self.broadcast(OperationalMode::Connect.public_state());
        info!("Connect mode active");
        self.collaborators.listener.on_started();
    }

    fn exit_connect_mode(&mut self) {
        self.broadcast(WifiState::Disabling);
        self.broadcast(WifiState::Disabled);
        self.collaborators.sar.set_client_state(false);
    }

    fn exit_active_mode(&mut self) {
        match self.state {
            ControllerState::ScanOnlyModeActive => self.exit_scan_only_mode(),
            ControllerState::ConnectModeActive => self.exit_connect_mode(),
            _ => {}
        }
    }

    /// Forget the interface and go idle, tearing it down in the driver if asked
    fn release_interface(&mut self, teardown: bool) {
        if let Some(name) = self.interface_name.take() {
            if teardown {
                debug!("Tearing down {}", name);
                self.driver.teardown_interface(&name);
            }
        }
        self.interface_up = false;
        self.requested_role = Role::Unknown;
        self.state = ControllerState::Stopped;
    }

    fn broadcast(&mut self, state: WifiState) {
        let previous = self.wifi_state();
        self.notifier.emit(state, previous);
    }

    // ── Driver callbacks ──────────────────────────────────────────────

    fn handle_driver_event(&mut self, session: u64, event: DriverEvent) {
        if session != self.session {
            debug!(
                "Ignoring {:?} from session {}, current session is {}",
                event, session, self.session
            );
            return;
        }
        let name = event.interface_name();
        if self.interface_name.as_deref() != Some(name) {
            debug!("Ignoring {:?}, current interface is {:?}", event, self.interface_name);
            return;
        }

        match event {
            DriverEvent::Up(_) => {
                self.interface_up = true;
                if self.state == ControllerState::InterfaceSetup {
                    self.enter_scan_only_mode();
                    self.apply_requested_role();
                }
            }
            DriverEvent::Down(name) => {
                self.interface_up = false;
                if self.state != ControllerState::ConnectModeActive {
                    debug!("{} went down while {}", name, self.state);
                } else if self.features.connected_mac_randomization {
                    debug!("{} went down, expected with connected MAC randomization", name);
                } else {
                    self.handle_interface_down(&name);
                }
            }
            DriverEvent::Destroyed(name) => self.handle_interface_destroyed(&name),
        }
    }

    fn handle_interface_down(&mut self, name: &str) {
        warn!("Detected {} down in connect mode, reporting failure", name);
        self.collaborators
            .fault_handler
            .on_interface_lost(name, LossReason::InterfaceDown);
        self.exit_connect_mode();
        self.release_interface(true);
        self.collaborators.listener.on_stopped();
    }

    fn handle_interface_destroyed(&mut self, name: &str) {
        if !self.state.is_active() {
            return;
        }

        warn!("Interface {} destroyed while {}", name, self.state);
        self.exit_active_mode();
        self.release_interface(false);
        self.collaborators
            .fault_handler
            .on_interface_lost(name, LossReason::InterfaceDestroyed);
        self.collaborators.listener.on_stopped();
    }
}

/// The state machine bound to its message queue, ready to be spawned
pub struct ClientModeController {
    machine: ClientModeStateMachine,
    rx: MessageReceiver,
    tx: MessageSender,
}

impl ClientModeController {
    pub fn new(
        driver: Box<dyn InterfaceDriver>,
        collaborators: Collaborators,
        features: FeaturesConfig,
    ) -> Self {
        let (tx, rx) = event::channel();
        let machine = ClientModeStateMachine::new(driver, collaborators, features, tx.clone());
        Self { machine, rx, tx }
    }

    pub fn subscribe(&mut self) -> NotificationReceiver {
        self.machine.subscribe()
    }

    pub fn manager(&self) -> ClientModeManager {
        ClientModeManager {
            tx: self.tx.clone(),
            status_rx: self.machine.status_receiver(),
        }
    }

    /// Process messages in arrival order until a shutdown request
    pub async fn run(mut self) {
        debug!("Client mode controller running");
        while let Some(message) = self.rx.recv().await {
            let shutdown = matches!(message, Message::Command(ControllerCommand::Shutdown));
            self.machine.handle(message);
            if shutdown {
                break;
            }
        }
        debug!("Client mode controller exiting");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

/// Handle for issuing requests to a running controller.
///
/// Requests never wait on hardware; they are queued and the call returns
/// immediately.
#[derive(Debug, Clone)]
pub struct ClientModeManager {
    tx: MessageSender,
    status_rx: watch::Receiver<ControllerStatus>,
}

impl ClientModeManager {
    pub fn start(&self) -> ControllerResult<()> {
        self.send(ControllerCommand::Start)
    }

    pub fn stop(&self) -> ControllerResult<()> {
        self.send(ControllerCommand::Stop)
    }

    pub fn set_role(&self, role: Role) -> ControllerResult<()> {
        self.send(ControllerCommand::SetRole(role))
    }

    pub fn shutdown(&self) -> ControllerResult<()> {
        self.send(ControllerCommand::Shutdown)
    }

    /// Latest published snapshot, without touching the queue
    pub fn status(&self) -> ControllerStatus {
        self.status_rx.borrow().clone()
    }

    /// Snapshot taken after every message queued before this call is processed
    pub async fn query_status(&self) -> ControllerResult<ControllerStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(ControllerCommand::QueryStatus(reply_tx))?;
        Ok(reply_rx.await?)
    }

    fn send(&self, command: ControllerCommand) -> ControllerResult<()> {
        self.tx.send(Message::Command(command))?;
        Ok(())
    }
}
