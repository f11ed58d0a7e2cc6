// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Browser-engine abstraction.
//
// The harness coordinates lifecycle and artifacts; the engine itself
// (process management, protocol, DOM) lives behind these traits. A
// playwright-rs backed implementation satisfies them directly; the
// in-memory mock drives the test-suite.

pub mod mock;

use crate::api::{ConnectOptions, ContextOptions, LaunchOptions};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Subscriber invoked for every page a context ever opens.
pub type PageCallback = Box<dyn Fn(Arc<dyn EnginePage>) + Send + Sync>;

/// Options for starting trace recording on a context.
#[derive(Debug, Clone, Default)]
pub struct TraceStartOptions {
    /// Trace title shown in the trace viewer
    pub title: Option<String>,
    /// Capture screenshots into the trace
    pub screenshots: bool,
    /// Capture DOM snapshots into the trace
    pub snapshots: bool,
    /// Include source files in the trace
    pub sources: bool,
}

impl TraceStartOptions {
    /// The capture settings the harness always records with.
    pub fn full(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            screenshots: true,
            snapshots: true,
            sources: true,
        }
    }
}

/// One browser engine kind (chromium, firefox, webkit).
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Engine name ("chromium", "firefox", or "webkit")
    fn name(&self) -> &str;

    /// Spawns a local engine process.
    async fn launch(&self, options: LaunchOptions) -> Result<Arc<dyn EngineBrowser>>;

    /// Dials a pre-existing engine endpoint.
    async fn connect(&self, options: ConnectOptions) -> Result<Arc<dyn EngineBrowser>>;

    /// Looks up a named device emulation preset.
    fn device(&self, name: &str) -> Option<ContextOptions>;
}

/// A live engine process handle; factory for isolated contexts.
#[async_trait]
pub trait EngineBrowser: Send + Sync {
    /// Creates a new isolated browsing context.
    async fn new_context(&self, options: ContextOptions) -> Result<Arc<dyn EngineContext>>;

    /// Closes the engine process. Idempotent.
    async fn close(&self) -> Result<()>;
}

/// An isolated browsing session (cookie/storage/permission boundary).
#[async_trait]
pub trait EngineContext: Send + Sync {
    /// Opens a new page (tab) in this context.
    async fn new_page(&self) -> Result<Arc<dyn EnginePage>>;

    /// Snapshot of the pages currently open in this context.
    fn pages(&self) -> Vec<Arc<dyn EnginePage>>;

    /// Registers a subscriber for every page this context opens, including
    /// popups the test never sees directly.
    fn on_page(&self, callback: PageCallback);

    /// Starts trace recording on this context.
    async fn tracing_start(&self, options: TraceStartOptions) -> Result<()>;

    /// Stops trace recording; saves the trace to `path` when given,
    /// discards it otherwise.
    async fn tracing_stop(&self, path: Option<&Path>) -> Result<()>;

    /// Closes this context and all its pages.
    async fn close(&self) -> Result<()>;
}

/// A single tab/document within a context.
#[async_trait]
pub trait EnginePage: Send + Sync {
    /// Captures a screenshot of this page into `path`. The harness bounds
    /// the call with its own timeout; implementations should not retry
    /// indefinitely.
    async fn screenshot_to_file(&self, path: &Path, full_page: bool) -> Result<()>;

    /// Video recording of this page, if the context records video.
    fn video(&self) -> Option<Arc<dyn EngineVideo>>;

    /// Whether this page has been closed.
    fn is_closed(&self) -> bool;

    /// Closes this page.
    async fn close(&self) -> Result<()>;
}

/// Handle to a page's video recording.
#[async_trait]
pub trait EngineVideo: Send + Sync {
    /// Saves the finished recording to `path`. Fails for zero-frame
    /// recordings; callers treat that as best-effort.
    async fn save_as(&self, path: &Path) -> Result<()>;

    /// Deletes the underlying recording resource.
    async fn delete(&self) -> Result<()>;
}
