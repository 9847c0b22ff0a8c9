use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;
use tracing::info;

use crate::wifi::sim::Step;

// ─── Embedded Default ────────────────────────────────────────────────────
/// Baked into the binary at compile time so a missing config file is never fatal.
const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

// ─── CLI Arguments (override layer) ─────────────────────────────────────
/// wlan-clientmode — drive a client-mode interface controller over a simulated radio
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "wlan-clientmode", version, about, long_about = None)]
pub struct CliArgs {
    /// Steps to apply in order
    #[arg(value_enum)]
    pub steps: Vec<Step>,

    /// Interface name for the simulated driver (overrides config file)
    #[arg(short, long)]
    pub interface: Option<String>,

    /// Log level filter (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Treat interface-down in connect mode as expected (overrides config file)
    #[arg(long)]
    pub mac_randomization: bool,

    /// Make the simulated driver refuse the switch to connect mode
    #[arg(long)]
    pub fail_switch_to_connect: bool,

    /// Print notifications and status as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to a custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the default config to stdout and exit
    #[arg(long)]
    pub print_default_config: bool,
}

// ─── TOML Structs ───────────────────────────────────────────────────────

/// Root configuration — parsed from TOML, then overridden by CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log file (empty string = stderr)
    #[serde(default)]
    pub log_file: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Interface-down in connect mode is expected while the MAC is randomized
    pub connected_mac_randomization: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    #[serde(default = "default_interface_name")]
    pub interface_name: String,
    pub fail_setup: bool,
    pub fail_switch_to_connect: bool,
    pub fail_switch_to_scan: bool,
}

// ─── Defaults ───────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        // Parse the embedded TOML — this cannot fail since we control it
        toml::from_str(DEFAULT_CONFIG_TOML)
            .expect("BUG: embedded default_config.toml is invalid TOML")
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interface_name: default_interface_name(),
            fail_setup: false,
            fail_switch_to_connect: false,
            fail_switch_to_scan: false,
        }
    }
}

// ─── Serde Default Helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".into()
}
fn default_interface_name() -> String {
    "wlan0".into()
}

// ─── Path Resolution ────────────────────────────────────────────────────

impl Config {
    /// Standard config file path: ~/.config/wlan-clientmode/config.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wlan-clientmode")
            .join("config.toml")
    }

    /// Convenience: log file as Option<&Path> (empty = None)
    pub fn log_file(&self) -> Option<&Path> {
        let path = self.general.log_file.trim();
        if path.is_empty() { None } else { Some(Path::new(path)) }
    }
}

// ─── Bootloader ─────────────────────────────────────────────────────────

/// The single entry point for configuration. Called exactly once at startup.
///
/// 1. Resolve config file path (CLI override or default)
/// 2. If config file doesn't exist, create directory tree + write defaults
/// 3. Parse TOML from disk into Config
/// 4. Apply CLI overrides on top
pub fn load(cli: &CliArgs) -> Result<Config> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&config_path, DEFAULT_CONFIG_TOML).wrap_err_with(|| {
            format!(
                "Failed to write default config to {}",
                config_path.display()
            )
        })?;
        info!("Created default config at {}", config_path.display());
    }

    let toml_str = std::fs::read_to_string(&config_path)
        .wrap_err_with(|| format!("Failed to read config from {}", config_path.display()))?;

    let mut config: Config = toml::from_str(&toml_str).wrap_err_with(|| {
        format!(
            "Failed to parse config at {}.\n\
             Delete the file to regenerate defaults, or run:\n  \
             wlan-clientmode --print-default-config > {:?}",
            config_path.display(),
            config_path
        )
    })?;

    // ── CLI overrides ───────────────────────────────────────────────
    if let Some(ref iface) = cli.interface {
        config.simulation.interface_name = iface.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.general.log_level = level.clone();
    }
    if cli.mac_randomization {
        config.features.connected_mac_randomization = true;
    }
    if cli.fail_switch_to_connect {
        config.simulation.fail_switch_to_connect = true;
    }

    Ok(config)
}

/// Returns the embedded default config TOML string.
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}
