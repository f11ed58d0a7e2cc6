// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Per-test context tracking.
//
// Every context a test creates, whether through the default fixture or
// the explicit factory, is wrapped so that closing it keeps the registry
// accounting correct and gives the artifact recorder its will-close hook
// while the context is still live. The interception is an explicit
// wrapper type rather than patched-in behavior on the context itself.

use crate::api::ContextOptions;
use crate::engine::{EngineContext, EnginePage};
use crate::error::Result;
use crate::recorder::ArtifactsRecorder;
use crate::session::SessionManager;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type LiveSet = Mutex<Vec<Arc<ManagedContext>>>;

/// A context owned by the registry, with close interception.
///
/// `close` runs three steps in order: remove from the registry's live
/// set, fire the recorder's will-close hook (trace stop and screenshot
/// capture need the context alive), then the real engine close.
pub struct ManagedContext {
    id: u64,
    inner: Arc<dyn EngineContext>,
    recorder: Arc<ArtifactsRecorder>,
    live_set: Weak<LiveSet>,
    closed: AtomicBool,
}

impl ManagedContext {
    /// Opens a new page in this context.
    pub async fn new_page(&self) -> Result<Arc<dyn EnginePage>> {
        self.inner.new_page().await
    }

    /// Snapshot of the pages currently open in this context.
    pub fn pages(&self) -> Vec<Arc<dyn EnginePage>> {
        self.inner.pages()
    }

    /// The underlying engine context, for operations the wrapper does not
    /// mediate (navigation, cookies, ...).
    pub fn engine_context(&self) -> &Arc<dyn EngineContext> {
        &self.inner
    }

    /// Whether this context has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Closes this context. Idempotent. Registry removal happens before
    /// the underlying close; the recorder hook runs in between, on the
    /// still-live context.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if let Some(live) = self.live_set.upgrade() {
            live.lock().retain(|context| context.id != self.id);
        }
        self.recorder
            .on_will_close_browser_context(&self.inner)
            .await?;
        self.inner.close().await
    }
}

impl std::fmt::Debug for ManagedContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedContext")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Tracks the contexts of one test unit.
pub struct ContextRegistry {
    session: Arc<SessionManager>,
    recorder: Arc<ArtifactsRecorder>,
    /// Base plus marker context options, resolved once per test unit.
    base_options: ContextOptions,
    /// Live contexts in creation order, unique by identity.
    live: Arc<LiveSet>,
    next_id: AtomicU64,
}

impl ContextRegistry {
    /// Creates a registry for one test unit. `base_options` already has
    /// the marker overrides folded in.
    pub fn new(
        session: Arc<SessionManager>,
        recorder: Arc<ArtifactsRecorder>,
        base_options: ContextOptions,
    ) -> Self {
        Self {
            session,
            recorder,
            base_options,
            live: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Creates, registers, and wraps a new context. Per-call overrides
    /// win over the registry's base options.
    pub async fn create_context(&self, overrides: ContextOptions) -> Result<Arc<ManagedContext>> {
        let options = self.base_options.clone().merge(overrides);
        let browser = self.session.browser().await?;
        let inner = browser.new_context(options).await?;
        let managed = Arc::new(ManagedContext {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            inner: inner.clone(),
            recorder: self.recorder.clone(),
            live_set: Arc::downgrade(&self.live),
            closed: AtomicBool::new(false),
        });
        self.live.lock().push(managed.clone());
        self.recorder.on_did_create_browser_context(&inner).await?;
        Ok(managed)
    }

    /// Number of contexts currently live.
    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    /// Force-closes every context still registered. Closing one context
    /// is independent of the others; a failure is logged and does not
    /// prevent the remaining closes.
    pub async fn close_all(&self) {
        let remaining: Vec<Arc<ManagedContext>> = self.live.lock().clone();
        for context in remaining {
            if let Err(err) = context.close().await {
                tracing::warn!(error = %err, "failed to close leaked context at teardown");
            }
        }
    }
}
