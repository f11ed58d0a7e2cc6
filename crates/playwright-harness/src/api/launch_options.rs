// Launch options for the browser engine
//
// Layered configuration: the session manager merges the base options
// derived from harness configuration with caller-supplied overrides, the
// override's fields winning. Serialized form (camelCase, None-skipping) is
// also what gets forwarded as the x-playwright-launch-options header in
// remote-connect mode.

use serde::{Deserialize, Serialize};

/// Options for launching a browser engine process.
///
/// All options are optional and fall back to the engine's defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOptions {
    /// Additional arguments to pass to the browser instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,

    /// Browser distribution channel (e.g., "chrome", "msedge")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Run in headless mode (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headless: Option<bool>,

    /// Slow down engine-level operations by N milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_mo: Option<f64>,

    /// Timeout for browser launch in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,

    /// Path to a custom browser executable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executable_path: Option<String>,
}

impl LaunchOptions {
    /// Creates a new LaunchOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set additional arguments to pass to the browser instance
    pub fn args(mut self, args: Vec<String>) -> Self {
        self.args = Some(args);
        self
    }

    /// Set browser distribution channel
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Run in headless mode
    pub fn headless(mut self, enabled: bool) -> Self {
        self.headless = Some(enabled);
        self
    }

    /// Slow down operations by N milliseconds
    pub fn slow_mo(mut self, ms: f64) -> Self {
        self.slow_mo = Some(ms);
        self
    }

    /// Set timeout for browser launch in milliseconds
    pub fn timeout(mut self, ms: f64) -> Self {
        self.timeout = Some(ms);
        self
    }

    /// Set path to a custom browser executable
    pub fn executable_path(mut self, path: impl Into<String>) -> Self {
        self.executable_path = Some(path.into());
        self
    }

    /// Overlays `overrides` on top of `self`; fields set in the override
    /// win, unset fields keep the base value.
    pub fn merge(mut self, overrides: Self) -> Self {
        if overrides.args.is_some() {
            self.args = overrides.args;
        }
        if overrides.channel.is_some() {
            self.channel = overrides.channel;
        }
        if overrides.headless.is_some() {
            self.headless = overrides.headless;
        }
        if overrides.slow_mo.is_some() {
            self.slow_mo = overrides.slow_mo;
        }
        if overrides.timeout.is_some() {
            self.timeout = overrides.timeout;
        }
        if overrides.executable_path.is_some() {
            self.executable_path = overrides.executable_path;
        }
        self
    }
}
