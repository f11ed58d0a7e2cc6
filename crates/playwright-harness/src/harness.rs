// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Fixture wiring: session setup and per-test lifecycle.
//
// TestSession is the session-scoped fixture graph (config, engine,
// staging, browser handle); TestUnit is everything scoped to one concrete
// (test × browser) unit. The host runner drives: check_skip, begin_test,
// run the body against the unit's fixtures, then finish with the phase
// outcomes it collected.

use crate::api::ContextOptions;
use crate::config::HarnessConfig;
use crate::engine::{BrowserEngine, EnginePage};
use crate::error::{Error, Result};
use crate::markers::TestMarkers;
use crate::outcome::TestOutcome;
use crate::output::{StagingArea, prepare_output_dir};
use crate::paths::build_output_path;
use crate::policy;
use crate::recorder::ArtifactsRecorder;
use crate::registry::{ContextRegistry, ManagedContext};
use crate::session::SessionManager;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Session-scoped harness state for one browser engine.
///
/// Create one per engine in the configured matrix; each worker process
/// gets its own instance.
pub struct TestSession {
    config: Arc<HarnessConfig>,
    session: Arc<SessionManager>,
    staging: Arc<StagingArea>,
}

impl TestSession {
    /// Starts a session: validates the configured browser names and
    /// device preset, wipes the output root (first session of the run
    /// only), and creates the staging area. The browser itself launches
    /// lazily on first use.
    pub fn start(engine: Arc<dyn BrowserEngine>, config: HarnessConfig) -> Result<Self> {
        for name in &config.browsers {
            policy::validate_browser_name(name)?;
        }
        if let Some(device) = &config.device {
            if engine.device(device).is_none() {
                return Err(Error::Configuration(format!("unknown device '{device}'")));
            }
        }
        prepare_output_dir(&config.output_dir)?;
        let staging = Arc::new(StagingArea::new()?);
        let config = Arc::new(config);
        let session = Arc::new(SessionManager::new(engine, config.clone()));
        Ok(Self {
            config,
            session,
            staging,
        })
    }

    /// The resolved harness configuration.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Name of the engine this session drives.
    pub fn browser_name(&self) -> &str {
        self.session.engine().name()
    }

    /// The session manager (context factory shared by all test units).
    pub fn session_manager(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Whether this (test × browser) unit should be skipped, per the
    /// allow/deny markers. Returns the skip message to surface to the
    /// runner. Decided after parametrization, per concrete unit.
    pub fn check_skip(&self, markers: &TestMarkers) -> Option<String> {
        policy::should_skip(self.browser_name(), markers)
    }

    /// Begins one test unit. `test_id` is the runner's node id for this
    /// concrete (test × browser × parametrization) unit.
    pub fn begin_test(&self, test_id: &str, markers: TestMarkers) -> TestUnit {
        let device_preset = self
            .config
            .device
            .as_deref()
            .and_then(|name| self.session.engine().device(name));
        let mut base_options = self
            .config
            .base_context_options(device_preset, self.staging.path());
        if let Some(marker_options) = markers.context_options.clone() {
            base_options = base_options.merge(marker_options);
        }

        let output_path = build_output_path(&self.config.output_dir, test_id);
        let recorder = Arc::new(ArtifactsRecorder::new(
            self.config.clone(),
            output_path,
            self.staging.clone(),
            test_id,
        ));
        let registry = ContextRegistry::new(self.session.clone(), recorder.clone(), base_options);
        TestUnit {
            browser_name: self.browser_name().to_string(),
            recorder,
            registry,
            default_context: Mutex::new(None),
        }
    }

    /// Ends the session: closes the browser handle (idempotent; always
    /// attempted even after a partial launch failure). The staging area
    /// is discarded when the session is dropped.
    pub async fn close(&self) -> Result<()> {
        self.session.close().await
    }
}

/// Per-test fixture surface.
///
/// Owns the context registry and artifact recorder for one test unit.
/// Not shared between concurrently running test units.
pub struct TestUnit {
    browser_name: String,
    recorder: Arc<ArtifactsRecorder>,
    registry: ContextRegistry,
    default_context: Mutex<Option<Arc<ManagedContext>>>,
}

impl TestUnit {
    /// The explicit multi-context factory: creates and registers a new
    /// context with per-call overrides (highest precedence).
    pub async fn new_context(&self, overrides: ContextOptions) -> Result<Arc<ManagedContext>> {
        self.registry.create_context(overrides).await
    }

    /// The default single-context fixture: the unit's first context,
    /// created on demand with no overrides.
    pub async fn context(&self) -> Result<Arc<ManagedContext>> {
        let mut slot = self.default_context.lock().await;
        if let Some(context) = slot.as_ref() {
            return Ok(context.clone());
        }
        let context = self.registry.create_context(ContextOptions::new()).await?;
        *slot = Some(context.clone());
        Ok(context)
    }

    /// The default single-page fixture: one page on the default context.
    pub async fn page(&self) -> Result<Arc<dyn EnginePage>> {
        self.context().await?.new_page().await
    }

    /// Final artifact folder for this test unit.
    pub fn output_path(&self) -> &std::path::Path {
        self.recorder.output_path()
    }

    /// Engine name this unit runs under.
    pub fn browser_name(&self) -> &str {
        &self.browser_name
    }

    /// Whether this unit runs under chromium.
    pub fn is_chromium(&self) -> bool {
        self.browser_name == "chromium"
    }

    /// Whether this unit runs under firefox.
    pub fn is_firefox(&self) -> bool {
        self.browser_name == "firefox"
    }

    /// Whether this unit runs under webkit.
    pub fn is_webkit(&self) -> bool {
        self.browser_name == "webkit"
    }

    /// Tears the unit down with the outcome the runner collected.
    ///
    /// Force-closes every still-registered context (harvesting traces and
    /// screenshots through the will-close hooks), then finalizes the
    /// recorder with the reduced failed flag. An outcome whose call phase
    /// was never reported finalizes as failed.
    pub async fn finish(self, outcome: &TestOutcome) -> Result<()> {
        self.registry.close_all().await;
        self.recorder.did_finish_test(outcome.failed()).await
    }
}
