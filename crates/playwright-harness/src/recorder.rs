// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Outcome-aware artifact recording.
//
// The pass/fail outcome of a test is only knowable after its body (and
// any of its own cleanup) has run, but traces, screenshots and video must
// be captured while contexts and pages are still live. So capture happens
// eagerly into the staging area as contexts close, and the keep/discard
// decision is deferred to finalization, when the outcome arrives. Nothing
// partial ever lands under the final output tree.

use crate::config::HarnessConfig;
use crate::engine::{EngineContext, EnginePage, TraceStartOptions};
use crate::error::Result;
use crate::output::StagingArea;
use crate::paths::slugify;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on a single end-of-context screenshot. Pages may be
/// navigating or half-closed at that point; waiting longer than this
/// buys nothing.
const SCREENSHOT_TIMEOUT: Duration = Duration::from_secs(5);

/// Lifecycle of one recorder instance (one per test unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecorderState {
    /// Consuming context/page events, outcome unknown
    Active,
    /// Outcome known, artifacts being resolved
    Finalizing,
    /// Finalization complete
    Done,
}

/// Tracks every context and page one test unit touches and resolves the
/// captured artifacts once the outcome is known.
///
/// Bookkeeping is scoped to a single test unit; concurrent test units
/// each get their own recorder.
pub struct ArtifactsRecorder {
    config: Arc<HarnessConfig>,
    staging: Arc<StagingArea>,
    /// Final artifact folder for this test unit
    output_path: PathBuf,
    /// Slug of the test identity, used as the trace title
    test_slug: String,
    /// Every page of every context, in creation order, across the whole
    /// test unit. Video is resolved from here at finalization.
    all_pages: Arc<Mutex<Vec<Arc<dyn EnginePage>>>>,
    /// Pending screenshot files in the staging area, capture order
    screenshots: Mutex<Vec<PathBuf>>,
    /// Pending trace files in the staging area, context-close order
    traces: Mutex<Vec<PathBuf>>,
    state: Mutex<RecorderState>,
}

impl ArtifactsRecorder {
    /// Creates a recorder for one test unit.
    pub fn new(
        config: Arc<HarnessConfig>,
        output_path: PathBuf,
        staging: Arc<StagingArea>,
        test_id: &str,
    ) -> Self {
        Self {
            config,
            staging,
            output_path,
            test_slug: slugify(test_id),
            all_pages: Arc::new(Mutex::new(Vec::new())),
            screenshots: Mutex::new(Vec::new()),
            traces: Mutex::new(Vec::new()),
            state: Mutex::new(RecorderState::Active),
        }
    }

    /// Final artifact folder for this test unit.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Hook: a context was created for this test unit.
    ///
    /// Subscribes the all-pages log to the context and begins trace
    /// capture when tracing is enabled.
    pub async fn on_did_create_browser_context(&self, context: &Arc<dyn EngineContext>) -> Result<()> {
        let all_pages = self.all_pages.clone();
        context.on_page(Box::new(move |page| {
            all_pages.lock().push(page);
        }));
        if self.config.tracing.captures() {
            context
                .tracing_start(TraceStartOptions::full(self.test_slug.clone()))
                .await?;
        }
        Ok(())
    }

    /// Hook: a context is about to close (the context is still live).
    ///
    /// Stops trace capture into the staging area and takes a best-effort
    /// screenshot of every page still open in the context. A screenshot
    /// failure on one page never aborts the others.
    pub async fn on_will_close_browser_context(&self, context: &Arc<dyn EngineContext>) -> Result<()> {
        if self.config.tracing.captures() {
            let trace_path = self.staging.unique_path();
            context.tracing_stop(Some(&trace_path)).await?;
            self.traces.lock().push(trace_path);
        } else {
            context.tracing_stop(None).await?;
        }

        if self.config.screenshot.captures() {
            for page in context.pages() {
                let screenshot_path = self.staging.unique_path();
                let capture = tokio::time::timeout(
                    SCREENSHOT_TIMEOUT,
                    page.screenshot_to_file(&screenshot_path, self.config.full_page_screenshot),
                )
                .await;
                match capture {
                    Ok(Ok(())) => self.screenshots.lock().push(screenshot_path),
                    Ok(Err(err)) => {
                        tracing::debug!(error = %err, "end-of-context screenshot failed; skipping page");
                    }
                    Err(_) => {
                        tracing::debug!("end-of-context screenshot timed out; skipping page");
                    }
                }
            }
        }
        Ok(())
    }

    /// Finalizes the test unit with its outcome.
    ///
    /// Reads `failed` exactly once and resolves every held artifact:
    /// promote into the output folder or discard. Safe to call at most
    /// once; later calls are no-ops.
    pub async fn did_finish_test(&self, failed: bool) -> Result<()> {
        {
            let mut state = self.state.lock();
            if *state != RecorderState::Active {
                return Ok(());
            }
            *state = RecorderState::Finalizing;
        }

        self.resolve_screenshots(failed).await?;
        self.resolve_traces(failed).await?;
        self.resolve_video(failed).await;

        *self.state.lock() = RecorderState::Done;
        Ok(())
    }

    async fn resolve_screenshots(&self, failed: bool) -> Result<()> {
        let screenshots: Vec<PathBuf> = std::mem::take(&mut *self.screenshots.lock());
        if self.config.screenshot.keeps(failed) {
            let status = if failed { "failed" } else { "finished" };
            for (index, screenshot) in screenshots.iter().enumerate() {
                let dest = self
                    .output_path
                    .join(format!("test-{status}-{}.png", index + 1));
                promote(screenshot, &dest).await?;
            }
        } else {
            for screenshot in &screenshots {
                discard(screenshot).await;
            }
        }
        Ok(())
    }

    async fn resolve_traces(&self, failed: bool) -> Result<()> {
        let traces: Vec<PathBuf> = std::mem::take(&mut *self.traces.lock());
        if self.config.tracing.keeps(failed) {
            for (index, trace) in traces.iter().enumerate() {
                let file_name = if traces.len() == 1 {
                    "trace.zip".to_string()
                } else {
                    format!("trace-{}.zip", index + 1)
                };
                promote(trace, &self.output_path.join(file_name)).await?;
            }
        } else {
            for trace in &traces {
                discard(trace).await;
            }
        }
        Ok(())
    }

    /// Video is resolved lazily per page, not pre-staged: the engine owns
    /// the recording until it is saved or deleted. Save and delete
    /// failures (zero-frame recordings, already-gone files) are swallowed.
    async fn resolve_video(&self, failed: bool) {
        let pages: Vec<Arc<dyn EnginePage>> = self.all_pages.lock().clone();
        if self.config.video.keeps(failed) {
            let single = pages.len() == 1;
            let mut video_index = 0usize;
            for page in &pages {
                let Some(video) = page.video() else {
                    continue;
                };
                video_index += 1;
                let file_name = if single {
                    "video.webm".to_string()
                } else {
                    format!("video-{video_index}.webm")
                };
                if let Err(err) = video.save_as(&self.output_path.join(file_name)).await {
                    // Empty videos fail to save; nothing useful was lost.
                    tracing::debug!(error = %err, "video save failed; skipping page");
                }
            }
        } else if self.config.video.captures() {
            for page in &pages {
                if let Some(video) = page.video() {
                    if let Err(err) = video.delete().await {
                        tracing::debug!(error = %err, "video delete failed");
                    }
                }
            }
        }
    }
}

/// Moves a staged artifact into the output tree, creating intermediate
/// directories. Tolerates the source vanishing between staging and
/// promotion; falls back to copy+remove when the rename crosses
/// filesystems.
async fn promote(source: &Path, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    match tokio::fs::rename(source, dest).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(source = %source.display(), "staged artifact vanished before promotion");
            Ok(())
        }
        Err(_) => match tokio::fs::copy(source, dest).await {
            Ok(_) => {
                let _ = tokio::fs::remove_file(source).await;
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        },
    }
}

/// Removes a staged artifact that was not kept. Best-effort.
async fn discard(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!(path = %path.display(), error = %err, "failed to discard staged artifact");
        }
    }
}
