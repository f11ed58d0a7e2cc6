// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Blocking facade over the async harness.
//
// Some host runners drive tests on a plain thread with no executor. The
// lifecycle state machine is implemented once, async, in the sibling
// modules; this facade owns a current-thread runtime and blocks on each
// operation, so both styles produce identical artifact outcomes for
// identical event sequences.

use crate::api::ContextOptions;
use crate::config::HarnessConfig;
use crate::engine::{BrowserEngine, EnginePage};
use crate::error::Result;
use crate::harness::{TestSession, TestUnit};
use crate::markers::TestMarkers;
use crate::outcome::TestOutcome;
use crate::registry::ManagedContext;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Blocking counterpart of [`TestSession`].
pub struct BlockingTestSession {
    runtime: Arc<Runtime>,
    inner: TestSession,
}

impl BlockingTestSession {
    /// Starts a session and the runtime that will drive it.
    pub fn start(engine: Arc<dyn BrowserEngine>, config: HarnessConfig) -> Result<Self> {
        let runtime = Arc::new(
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?,
        );
        let inner = TestSession::start(engine, config)?;
        Ok(Self { runtime, inner })
    }

    /// See [`TestSession::config`].
    pub fn config(&self) -> &HarnessConfig {
        self.inner.config()
    }

    /// See [`TestSession::browser_name`].
    pub fn browser_name(&self) -> &str {
        self.inner.browser_name()
    }

    /// See [`TestSession::check_skip`].
    pub fn check_skip(&self, markers: &TestMarkers) -> Option<String> {
        self.inner.check_skip(markers)
    }

    /// See [`TestSession::begin_test`].
    pub fn begin_test(&self, test_id: &str, markers: TestMarkers) -> BlockingTestUnit {
        BlockingTestUnit {
            runtime: self.runtime.clone(),
            inner: self.inner.begin_test(test_id, markers),
        }
    }

    /// See [`TestSession::close`].
    pub fn close(&self) -> Result<()> {
        self.runtime.block_on(self.inner.close())
    }
}

/// Blocking counterpart of [`TestUnit`].
pub struct BlockingTestUnit {
    runtime: Arc<Runtime>,
    inner: TestUnit,
}

impl BlockingTestUnit {
    /// See [`TestUnit::new_context`].
    pub fn new_context(&self, overrides: ContextOptions) -> Result<BlockingContext> {
        let context = self.runtime.block_on(self.inner.new_context(overrides))?;
        Ok(BlockingContext {
            runtime: self.runtime.clone(),
            inner: context,
        })
    }

    /// See [`TestUnit::context`].
    pub fn context(&self) -> Result<BlockingContext> {
        let context = self.runtime.block_on(self.inner.context())?;
        Ok(BlockingContext {
            runtime: self.runtime.clone(),
            inner: context,
        })
    }

    /// See [`TestUnit::page`].
    pub fn page(&self) -> Result<Arc<dyn EnginePage>> {
        self.runtime.block_on(self.inner.page())
    }

    /// See [`TestUnit::output_path`].
    pub fn output_path(&self) -> &std::path::Path {
        self.inner.output_path()
    }

    /// See [`TestUnit::browser_name`].
    pub fn browser_name(&self) -> &str {
        self.inner.browser_name()
    }

    /// See [`TestUnit::finish`].
    pub fn finish(self, outcome: &TestOutcome) -> Result<()> {
        self.runtime.block_on(self.inner.finish(outcome))
    }
}

/// Blocking counterpart of [`ManagedContext`].
pub struct BlockingContext {
    runtime: Arc<Runtime>,
    inner: Arc<ManagedContext>,
}

impl BlockingContext {
    /// See [`ManagedContext::new_page`].
    pub fn new_page(&self) -> Result<Arc<dyn EnginePage>> {
        self.runtime.block_on(self.inner.new_page())
    }

    /// See [`ManagedContext::pages`].
    pub fn pages(&self) -> Vec<Arc<dyn EnginePage>> {
        self.inner.pages()
    }

    /// See [`ManagedContext::is_closed`].
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// See [`ManagedContext::close`].
    pub fn close(&self) -> Result<()> {
        self.runtime.block_on(self.inner.close())
    }
}
