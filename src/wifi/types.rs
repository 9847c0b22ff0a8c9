use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Internal operating mode of the interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OperationalMode {
    ScanOnly,
    Connect,
}

impl OperationalMode {
    /// Public state implied by a settled mode. Scan-only mode does not
    /// participate in the public state, so it reads as `Disabled`.
    pub fn public_state(self) -> WifiState {
        match self {
            Self::ScanOnly => WifiState::Disabled,
            Self::Connect => WifiState::Enabled,
        }
    }

    /// Role that is satisfied by this mode
    pub fn role(self) -> Role {
        match self {
            Self::ScanOnly => Role::ScanOnly,
            Self::Connect => Role::ClientPrimary,
        }
    }
}

impl fmt::Display for OperationalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScanOnly => write!(f, "scan-only"),
            Self::Connect => write!(f, "connect"),
        }
    }
}

/// Role requested by the owner of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Role {
    #[default]
    Unknown,
    ScanOnly,
    ClientPrimary,
}

impl Role {
    /// Mode needed to satisfy this role, `None` for `Unknown`
    pub fn target_mode(self) -> Option<OperationalMode> {
        match self {
            Self::Unknown => None,
            Self::ScanOnly => Some(OperationalMode::ScanOnly),
            Self::ClientPrimary => Some(OperationalMode::Connect),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::ScanOnly => write!(f, "scan-only"),
            Self::ClientPrimary => write!(f, "client-primary"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "unknown" => Ok(Self::Unknown),
            "scan-only" | "scan_only" | "scan" => Ok(Self::ScanOnly),
            "client-primary" | "client_primary" | "client" => Ok(Self::ClientPrimary),
            other => Err(format!("invalid role: \"{other}\"")),
        }
    }
}

/// Externally broadcast wifi state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum WifiState {
    #[default]
    Disabled,
    Disabling,
    Enabling,
    Enabled,
    Unknown,
}

impl fmt::Display for WifiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::Disabling => write!(f, "disabling"),
            Self::Enabling => write!(f, "enabling"),
            Self::Enabled => write!(f, "enabled"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

pub const WIFI_STATE_CHANGED_ACTION: &str = "WIFI_STATE_CHANGED";

/// One public notification: the new state paired with the state it replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiStateChanged {
    pub action: &'static str,
    pub current_state: WifiState,
    pub previous_state: WifiState,
}

impl WifiStateChanged {
    pub fn new(current_state: WifiState, previous_state: WifiState) -> Self {
        Self {
            action: WIFI_STATE_CHANGED_ACTION,
            current_state,
            previous_state,
        }
    }
}

impl fmt::Display for WifiStateChanged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.action, self.previous_state, self.current_state
        )
    }
}

/// Why the interface was lost outside of an explicit stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LossReason {
    /// Driver reported the interface down while in connect mode
    InterfaceDown,
    /// Driver reported the interface destroyed
    InterfaceDestroyed,
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InterfaceDown => write!(f, "interface down"),
            Self::InterfaceDestroyed => write!(f, "interface destroyed"),
        }
    }
}

/// States of the mode controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ControllerState {
    #[default]
    NotStarted,
    InterfaceSetup,
    ScanOnlyModeActive,
    ConnectModeActive,
    Stopped,
}

impl ControllerState {
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Self::InterfaceSetup | Self::ScanOnlyModeActive | Self::ConnectModeActive
        )
    }

    /// Settled operational mode, if any
    pub fn mode(self) -> Option<OperationalMode> {
        match self {
            Self::ScanOnlyModeActive => Some(OperationalMode::ScanOnly),
            Self::ConnectModeActive => Some(OperationalMode::Connect),
            _ => None,
        }
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not started"),
            Self::InterfaceSetup => write!(f, "interface setup"),
            Self::ScanOnlyModeActive => write!(f, "scan-only mode active"),
            Self::ConnectModeActive => write!(f, "connect mode active"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Read-only snapshot of the controller, safe to hand to other threads
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ControllerStatus {
    pub state: ControllerState,
    pub interface_name: Option<String>,
    pub mode: Option<OperationalMode>,
    pub interface_up: bool,
    pub wifi_state: WifiState,
    pub requested_role: Role,
}

impl ControllerStatus {
    pub fn is_connect_mode(&self) -> bool {
        self.mode == Some(OperationalMode::Connect)
    }

    pub fn is_scan_only_mode(&self) -> bool {
        self.mode == Some(OperationalMode::ScanOnly)
    }
}

impl fmt::Display for ControllerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "State:          {}", self.state)?;
        writeln!(
            f,
            "Interface:      {}",
            self.interface_name.as_deref().unwrap_or("(none)")
        )?;
        match self.mode {
            Some(mode) => writeln!(f, "Mode:           {mode}")?,
            None => writeln!(f, "Mode:           (none)")?,
        }
        writeln!(f, "Interface up:   {}", self.interface_up)?;
        writeln!(f, "Wifi state:     {}", self.wifi_state)?;
        write!(f, "Requested role: {}", self.requested_role)
    }
}
