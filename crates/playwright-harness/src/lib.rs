//! playwright-harness: test-runner plumbing for browser automation
//!
//! This crate wires a Playwright-style browser engine into a host test
//! runner: per-test browser context lifecycle, browser selection and skip
//! policy, and outcome-aware capture of diagnostic artifacts
//! (screenshots, video, execution traces).
//!
//! The engine itself is out of scope: it lives behind the traits in
//! [`engine`], and the harness only coordinates it.
//!
//! # Driving one test unit
//!
//! ```ignore
//! use playwright_harness_rs::{
//!     CaptureMode, HarnessConfig, ScreenshotMode, TestMarkers, TestOutcome, TestSession,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = my_playwright_engine(); // implements engine::BrowserEngine
//!     let config = HarnessConfig::new()
//!         .browser("chromium")
//!         .tracing(CaptureMode::RetainOnFailure)
//!         .screenshot(ScreenshotMode::OnlyOnFailure)
//!         .output_dir("test-results");
//!
//!     let session = TestSession::start(engine, config)?;
//!     let markers = TestMarkers::none();
//!     if let Some(reason) = session.check_skip(&markers) {
//!         println!("{reason}");
//!         return Ok(());
//!     }
//!
//!     let unit = session.begin_test("tests/login.rs::test_login[chromium]", markers);
//!     let page = unit.page().await?;
//!     // ... run the test body against `page` ...
//!
//!     // The runner reports phase outcomes; teardown receives them explicitly.
//!     unit.finish(&TestOutcome::passed()).await?;
//!     session.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Extra contexts
//!
//! Tests that need more than the default context create them through the
//! unit's factory; the registry force-closes anything still open at
//! teardown, and every context's artifacts are harvested at its close:
//!
//! ```ignore
//! let first = unit.context().await?;
//! let second = unit.new_context(ContextOptions::new().locale("de-DE")).await?;
//! second.close().await?; // trace + screenshots harvested here
//! ```
//!
//! # Blocking style
//!
//! Runners without an executor use [`sync::BlockingTestSession`], a thin
//! facade over the same lifecycle state machine.

pub mod api;
pub mod engine;
pub mod sync;

mod config;
mod error;
mod harness;
mod markers;
mod outcome;
mod output;
mod paths;
mod policy;
mod recorder;
mod registry;
mod session;

// Re-export error types
pub use error::{Error, Result};

// Re-export configuration
pub use config::{CaptureMode, HarnessConfig, ScreenshotMode};

// Re-export option types
pub use api::{ConnectOptions, ContextOptions, LaunchOptions, RecordVideo, Viewport};

// Re-export the per-test surface
pub use harness::{TestSession, TestUnit};
pub use markers::TestMarkers;
pub use outcome::{PhaseOutcome, TestOutcome, TestPhase};
pub use registry::{ContextRegistry, ManagedContext};

// Re-export recorder and session internals for embedders that wire the
// pieces themselves
pub use recorder::ArtifactsRecorder;
pub use session::{LAUNCH_OPTIONS_HEADER, SessionManager};

// Re-export selection policy
pub use policy::{DEFAULT_BROWSER, KNOWN_BROWSERS, resolve_browser_name, should_skip, skip_list};

// Re-export path helpers
pub use output::{StagingArea, prepare_output_dir, wipe_output_dir};
pub use paths::{build_output_path, slugify, truncate_file_name};
