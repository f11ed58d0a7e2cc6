// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// In-memory engine used by the harness test-suite.
//
// Writes well-formed stub artifact files (PNG magic for screenshots, zip
// magic for traces, webm files for video) so the promotion/discard logic
// exercises real filesystem moves. Behavior knobs simulate the failure
// modes the recorder must swallow.

use super::{
    BrowserEngine, EngineBrowser, EngineContext, EnginePage, EngineVideo, PageCallback,
    TraceStartOptions,
};
use crate::api::{ConnectOptions, ContextOptions, LaunchOptions};
use crate::error::{Error, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Failure knobs for the mock engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBehavior {
    /// Every page screenshot call fails (page navigated away / closed race)
    pub fail_screenshots: bool,
    /// Every video save fails (zero-frame recording)
    pub zero_frame_video: bool,
}

/// Shared observable state, for assertions in tests.
#[derive(Debug, Default)]
pub struct MockStats {
    pub contexts_created: AtomicUsize,
    pub contexts_open: AtomicUsize,
    pub pages_created: AtomicUsize,
    pub traces_started: AtomicUsize,
    pub traces_stopped: AtomicUsize,
    pub browsers_launched: AtomicUsize,
    pub browser_closes: AtomicUsize,
}

/// A mock browser engine.
pub struct MockEngine {
    name: String,
    behavior: MockBehavior,
    stats: Arc<MockStats>,
    devices: HashMap<String, ContextOptions>,
    last_launch_options: Mutex<Option<LaunchOptions>>,
    last_connect_options: Mutex<Option<ConnectOptions>>,
    page_counter: Arc<AtomicUsize>,
}

impl MockEngine {
    /// A well-behaved chromium-flavored engine.
    pub fn new() -> Arc<Self> {
        Self::with_behavior("chromium", MockBehavior::default())
    }

    /// An engine with the given name and failure behavior.
    pub fn with_behavior(name: &str, behavior: MockBehavior) -> Arc<Self> {
        let mut devices = HashMap::new();
        devices.insert(
            "iPhone 12".to_string(),
            ContextOptions::new()
                .viewport(390, 844)
                .device_scale_factor(3.0)
                .is_mobile(true)
                .has_touch(true)
                .user_agent("Mozilla/5.0 (iPhone; CPU iPhone OS 14_4 like Mac OS X)"),
        );
        Arc::new(Self {
            name: name.to_string(),
            behavior,
            stats: Arc::new(MockStats::default()),
            devices,
            last_launch_options: Mutex::new(None),
            last_connect_options: Mutex::new(None),
            page_counter: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Observable counters for assertions.
    pub fn stats(&self) -> &MockStats {
        &self.stats
    }

    /// Launch options from the most recent launch, for assertions.
    pub fn last_launch_options(&self) -> Option<LaunchOptions> {
        self.last_launch_options.lock().clone()
    }

    /// Connect options from the most recent connect, for assertions.
    pub fn last_connect_options(&self) -> Option<ConnectOptions> {
        self.last_connect_options.lock().clone()
    }
}

#[async_trait]
impl BrowserEngine for MockEngine {
    fn name(&self) -> &str {
        &self.name
    }

    async fn launch(&self, options: LaunchOptions) -> Result<Arc<dyn EngineBrowser>> {
        *self.last_launch_options.lock() = Some(options);
        self.stats.browsers_launched.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockBrowser {
            behavior: self.behavior,
            stats: self.stats.clone(),
            page_counter: self.page_counter.clone(),
            closed: AtomicBool::new(false),
        }))
    }

    async fn connect(&self, options: ConnectOptions) -> Result<Arc<dyn EngineBrowser>> {
        *self.last_connect_options.lock() = Some(options);
        self.stats.browsers_launched.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockBrowser {
            behavior: self.behavior,
            stats: self.stats.clone(),
            page_counter: self.page_counter.clone(),
            closed: AtomicBool::new(false),
        }))
    }

    fn device(&self, name: &str) -> Option<ContextOptions> {
        self.devices.get(name).cloned()
    }
}

struct MockBrowser {
    behavior: MockBehavior,
    stats: Arc<MockStats>,
    page_counter: Arc<AtomicUsize>,
    closed: AtomicBool,
}

#[async_trait]
impl EngineBrowser for MockBrowser {
    async fn new_context(&self, options: ContextOptions) -> Result<Arc<dyn EngineContext>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::TargetClosed {
                target_type: "browser".to_string(),
                context: "new_context after close".to_string(),
            });
        }
        self.stats.contexts_created.fetch_add(1, Ordering::SeqCst);
        self.stats.contexts_open.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockContext {
            options,
            behavior: self.behavior,
            stats: self.stats.clone(),
            page_counter: self.page_counter.clone(),
            pages: Mutex::new(Vec::new()),
            callbacks: Mutex::new(Vec::new()),
            trace_title: Mutex::new(None),
            tracing_active: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }))
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.stats.browser_closes.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

struct MockContext {
    options: ContextOptions,
    behavior: MockBehavior,
    stats: Arc<MockStats>,
    page_counter: Arc<AtomicUsize>,
    pages: Mutex<Vec<Arc<MockPage>>>,
    callbacks: Mutex<Vec<PageCallback>>,
    trace_title: Mutex<Option<String>>,
    tracing_active: AtomicBool,
    closed: AtomicBool,
}

#[async_trait]
impl EngineContext for MockContext {
    async fn new_page(&self) -> Result<Arc<dyn EnginePage>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::TargetClosed {
                target_type: "context".to_string(),
                context: "new_page after close".to_string(),
            });
        }
        let index = self.page_counter.fetch_add(1, Ordering::SeqCst);
        let video = match &self.options.record_video {
            Some(record) => {
                // The engine records continuously into the configured dir;
                // the file exists from page creation onward.
                let source = record.dir.join(format!("mock-page-{index}.webm"));
                std::fs::create_dir_all(&record.dir)?;
                std::fs::write(&source, b"\x1a\x45\xdf\xa3 mock webm")?;
                Some(Arc::new(MockVideo {
                    source,
                    zero_frames: self.behavior.zero_frame_video,
                }))
            }
            None => None,
        };
        let page = Arc::new(MockPage {
            fail_screenshots: self.behavior.fail_screenshots,
            video,
            closed: AtomicBool::new(false),
        });
        self.stats.pages_created.fetch_add(1, Ordering::SeqCst);
        self.pages.lock().push(page.clone());
        for callback in self.callbacks.lock().iter() {
            callback(page.clone());
        }
        Ok(page)
    }

    fn pages(&self) -> Vec<Arc<dyn EnginePage>> {
        self.pages
            .lock()
            .iter()
            .filter(|page| !page.is_closed())
            .map(|page| page.clone() as Arc<dyn EnginePage>)
            .collect()
    }

    fn on_page(&self, callback: PageCallback) {
        self.callbacks.lock().push(callback);
    }

    async fn tracing_start(&self, options: TraceStartOptions) -> Result<()> {
        *self.trace_title.lock() = options.title;
        self.tracing_active.store(true, Ordering::SeqCst);
        self.stats.traces_started.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn tracing_stop(&self, path: Option<&Path>) -> Result<()> {
        self.tracing_active.store(false, Ordering::SeqCst);
        self.stats.traces_stopped.fetch_add(1, Ordering::SeqCst);
        if let Some(path) = path {
            let title = self.trace_title.lock().clone().unwrap_or_default();
            let mut contents = b"PK\x03\x04".to_vec();
            contents.extend_from_slice(title.as_bytes());
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        for page in self.pages.lock().iter() {
            page.closed.store(true, Ordering::SeqCst);
        }
        self.stats.contexts_open.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

struct MockPage {
    fail_screenshots: bool,
    video: Option<Arc<MockVideo>>,
    closed: AtomicBool,
}

#[async_trait]
impl EnginePage for MockPage {
    async fn screenshot_to_file(&self, path: &Path, _full_page: bool) -> Result<()> {
        if self.fail_screenshots {
            return Err(Error::Engine("screenshot failed: page crashed".to_string()));
        }
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::TargetClosed {
                target_type: "page".to_string(),
                context: "screenshot after close".to_string(),
            });
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, [0x89, b'P', b'N', b'G'])?;
        Ok(())
    }

    fn video(&self) -> Option<Arc<dyn EngineVideo>> {
        self.video
            .as_ref()
            .map(|video| video.clone() as Arc<dyn EngineVideo>)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct MockVideo {
    source: PathBuf,
    zero_frames: bool,
}

#[async_trait]
impl EngineVideo for MockVideo {
    async fn save_as(&self, path: &Path) -> Result<()> {
        if self.zero_frames {
            return Err(Error::Engine(
                "video save failed: no frames were recorded".to_string(),
            ));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(&self.source, path)?;
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        match std::fs::remove_file(&self.source) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
