// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Harness configuration.
//
// All knobs are resolved into one immutable HarnessConfig before the
// session starts; components receive it by reference and never consult
// process-global state afterwards.

use crate::api::{ConnectOptions, ContextOptions, LaunchOptions, RecordVideo};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Capture policy for traces and video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureMode {
    /// Never capture
    #[default]
    Off,
    /// Capture and keep for every test
    On,
    /// Capture for every test, keep only when the test failed
    RetainOnFailure,
}

impl CaptureMode {
    /// Whether capture should be running at all (keep decision comes later).
    pub fn captures(self) -> bool {
        matches!(self, CaptureMode::On | CaptureMode::RetainOnFailure)
    }

    /// Whether captured artifacts should be kept given the test outcome.
    pub fn keeps(self, failed: bool) -> bool {
        match self {
            CaptureMode::Off => false,
            CaptureMode::On => true,
            CaptureMode::RetainOnFailure => failed,
        }
    }
}

impl FromStr for CaptureMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "off" => Ok(CaptureMode::Off),
            "on" => Ok(CaptureMode::On),
            "retain-on-failure" => Ok(CaptureMode::RetainOnFailure),
            other => Err(Error::Configuration(format!(
                "invalid capture mode '{other}' (expected off, on, or retain-on-failure)"
            ))),
        }
    }
}

/// Capture policy for end-of-context screenshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenshotMode {
    /// Never capture
    #[default]
    Off,
    /// Capture and keep for every test
    On,
    /// Capture for every test, keep only when the test failed
    OnlyOnFailure,
}

impl ScreenshotMode {
    /// Whether capture should be running at all.
    pub fn captures(self) -> bool {
        matches!(self, ScreenshotMode::On | ScreenshotMode::OnlyOnFailure)
    }

    /// Whether captured screenshots should be kept given the test outcome.
    pub fn keeps(self, failed: bool) -> bool {
        match self {
            ScreenshotMode::Off => false,
            ScreenshotMode::On => true,
            ScreenshotMode::OnlyOnFailure => failed,
        }
    }
}

impl FromStr for ScreenshotMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "off" => Ok(ScreenshotMode::Off),
            "on" => Ok(ScreenshotMode::On),
            "only-on-failure" => Ok(ScreenshotMode::OnlyOnFailure),
            other => Err(Error::Configuration(format!(
                "invalid screenshot mode '{other}' (expected off, on, or only-on-failure)"
            ))),
        }
    }
}

/// Immutable harness configuration, resolved once at session start.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Browser engines parametrizing the test matrix. Empty means the
    /// default engine (chromium).
    pub browsers: Vec<String>,
    /// Disable headless launch
    pub headed: bool,
    /// Browser release channel (e.g., "chrome", "msedge")
    pub channel: Option<String>,
    /// Delay between engine-level actions, in milliseconds
    pub slow_mo: Option<f64>,
    /// Named device emulation preset applied to context configuration
    pub device: Option<String>,
    /// Root directory for promoted artifacts, wiped at session start
    pub output_dir: PathBuf,
    /// Trace capture policy
    pub tracing: CaptureMode,
    /// Video capture policy
    pub video: CaptureMode,
    /// Screenshot capture policy
    pub screenshot: ScreenshotMode,
    /// Capture the entire scrollable area instead of the viewport
    pub full_page_screenshot: bool,
    /// Base URL for relative navigation
    pub base_url: Option<String>,
    /// When set, connect to a remote engine endpoint instead of spawning
    /// a local process.
    pub connect: Option<ConnectOptions>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            browsers: Vec::new(),
            headed: false,
            channel: None,
            slow_mo: None,
            device: None,
            output_dir: PathBuf::from("test-results"),
            tracing: CaptureMode::Off,
            video: CaptureMode::Off,
            screenshot: ScreenshotMode::Off,
            full_page_screenshot: false,
            base_url: None,
            connect: None,
        }
    }
}

impl HarnessConfig {
    /// Creates a configuration with all defaults (headless, all capture off,
    /// output to `test-results`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a browser engine to the test matrix.
    pub fn browser(mut self, name: impl Into<String>) -> Self {
        self.browsers.push(name.into());
        self
    }

    /// Run browsers in headed mode.
    pub fn headed(mut self, headed: bool) -> Self {
        self.headed = headed;
        self
    }

    /// Selects a browser release channel.
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Inserts a delay between engine-level actions.
    pub fn slow_mo(mut self, ms: f64) -> Self {
        self.slow_mo = Some(ms);
        self
    }

    /// Applies a named device emulation preset to every context.
    pub fn device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    /// Sets the root output directory for promoted artifacts.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Sets the trace capture policy.
    pub fn tracing(mut self, mode: CaptureMode) -> Self {
        self.tracing = mode;
        self
    }

    /// Sets the video capture policy.
    pub fn video(mut self, mode: CaptureMode) -> Self {
        self.video = mode;
        self
    }

    /// Sets the screenshot capture policy.
    pub fn screenshot(mut self, mode: ScreenshotMode) -> Self {
        self.screenshot = mode;
        self
    }

    /// Capture full-page screenshots instead of the viewport.
    pub fn full_page_screenshot(mut self, full_page: bool) -> Self {
        self.full_page_screenshot = full_page;
        self
    }

    /// Sets the base URL for relative navigation.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Connect to a remote engine endpoint instead of launching locally.
    pub fn connect(mut self, options: ConnectOptions) -> Self {
        self.connect = Some(options);
        self
    }

    /// Base launch options derived from this configuration.
    ///
    /// Headless unless headed mode was requested or an interactive
    /// debugger is attached to this process (tests being stepped through
    /// get a visible browser).
    pub fn base_launch_options(&self) -> LaunchOptions {
        let mut options = LaunchOptions::new();
        if self.headed || is_debugger_attached() {
            options = options.headless(false);
        }
        if let Some(channel) = &self.channel {
            options = options.channel(channel.clone());
        }
        if let Some(slow_mo) = self.slow_mo {
            options = options.slow_mo(slow_mo);
        }
        options
    }

    /// Base context options derived from this configuration.
    ///
    /// `device_preset` is the engine's descriptor for the configured
    /// device, already looked up by the caller; `staging_dir` receives
    /// per-page video files when video capture is enabled.
    pub fn base_context_options(
        &self,
        device_preset: Option<ContextOptions>,
        staging_dir: &Path,
    ) -> ContextOptions {
        let mut options = device_preset.unwrap_or_default();
        if let Some(base_url) = &self.base_url {
            options = options.base_url(base_url.clone());
        }
        if self.video.captures() {
            options = options.record_video(RecordVideo {
                dir: staging_dir.to_path_buf(),
                size: None,
            });
        }
        options
    }
}

/// Best-effort detection of an attached interactive debugger.
///
/// On Linux a nonzero TracerPid in /proc/self/status means a ptrace-based
/// debugger (gdb, lldb-server, an IDE) is attached. Other platforms
/// report false.
#[cfg(target_os = "linux")]
fn is_debugger_attached() -> bool {
    let Ok(status) = std::fs::read_to_string("/proc/self/status") else {
        return false;
    };
    status
        .lines()
        .find_map(|line| line.strip_prefix("TracerPid:"))
        .map(|pid| pid.trim() != "0")
        .unwrap_or(false)
}

#[cfg(not(target_os = "linux"))]
fn is_debugger_attached() -> bool {
    false
}
