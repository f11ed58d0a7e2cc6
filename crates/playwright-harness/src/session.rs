// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Browser session management.
//
// One engine-process handle per browser kind per test session. The handle
// is launched lazily on first use, shared by every test unit as a context
// factory, and closed exactly once at session end.

use crate::api::LaunchOptions;
use crate::config::HarnessConfig;
use crate::engine::{BrowserEngine, EngineBrowser};
use crate::error::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Header carrying the effective launch options to a remote engine.
///
/// Forwarded on connect so the remote side can report what configuration
/// was requested; diagnostic only, it does not change remote behavior.
pub const LAUNCH_OPTIONS_HEADER: &str = "x-playwright-launch-options";

/// Owns the one browser handle for a session.
pub struct SessionManager {
    engine: Arc<dyn BrowserEngine>,
    config: Arc<HarnessConfig>,
    browser: Mutex<Option<Arc<dyn EngineBrowser>>>,
    closed: AtomicBool,
}

impl SessionManager {
    /// Creates a manager for the given engine. Nothing is launched until
    /// the first call to [`browser`](Self::browser) or
    /// [`launch`](Self::launch).
    pub fn new(engine: Arc<dyn BrowserEngine>, config: Arc<HarnessConfig>) -> Self {
        Self {
            engine,
            config,
            browser: Mutex::new(None),
            closed: AtomicBool::new(false),
        }
    }

    /// The engine this session drives.
    pub fn engine(&self) -> &Arc<dyn BrowserEngine> {
        &self.engine
    }

    /// Launches (or connects to) a browser with the merged configuration:
    /// base launch options from the harness configuration, overlaid with
    /// the caller's overrides.
    ///
    /// In remote mode the effective options are serialized into the
    /// [`LAUNCH_OPTIONS_HEADER`] handshake header; caller-configured
    /// connect headers take precedence on name collisions.
    pub async fn launch(&self, overrides: LaunchOptions) -> Result<Arc<dyn EngineBrowser>> {
        let launch_options = self.config.base_launch_options().merge(overrides);
        match &self.config.connect {
            Some(connect) => {
                let mut headers = std::collections::HashMap::new();
                headers.insert(
                    LAUNCH_OPTIONS_HEADER.to_string(),
                    serde_json::to_string(&launch_options)?,
                );
                if let Some(configured) = &connect.headers {
                    headers.extend(configured.clone());
                }
                let mut connect = connect.clone();
                connect.headers = Some(headers);
                tracing::debug!(endpoint = %connect.ws_endpoint, "connecting to remote engine");
                self.engine.connect(connect).await
            }
            None => {
                tracing::debug!(engine = self.engine.name(), "launching local engine");
                self.engine.launch(launch_options).await
            }
        }
    }

    /// The shared session browser, launched lazily on first use.
    pub async fn browser(&self) -> Result<Arc<dyn EngineBrowser>> {
        let mut slot = self.browser.lock().await;
        if let Some(browser) = slot.as_ref() {
            return Ok(browser.clone());
        }
        let browser = self.launch(LaunchOptions::default()).await?;
        *slot = Some(browser.clone());
        Ok(browser)
    }

    /// Closes the session browser. Idempotent; safe to call even when the
    /// launch never happened or failed partway.
    pub async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let browser = self.browser.lock().await.take();
        if let Some(browser) = browser {
            browser.close().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ConnectOptions;
    use crate::engine::mock::MockEngine;

    fn manager(engine: Arc<MockEngine>, config: HarnessConfig) -> SessionManager {
        SessionManager::new(engine, Arc::new(config))
    }

    #[tokio::test]
    async fn test_browser_is_launched_once_and_cached() {
        let engine = MockEngine::new();
        let session = manager(engine.clone(), HarnessConfig::new());

        let first = session.browser().await.unwrap();
        let second = session.browser().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            engine
                .stats()
                .browsers_launched
                .load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn test_launch_merges_base_and_overrides() {
        let engine = MockEngine::new();
        let session = manager(engine.clone(), HarnessConfig::new().headed(true));

        session
            .launch(LaunchOptions::new().slow_mo(250.0))
            .await
            .unwrap();
        let seen = engine.last_launch_options().unwrap();
        assert_eq!(seen.headless, Some(false));
        assert_eq!(seen.slow_mo, Some(250.0));
    }

    #[tokio::test]
    async fn test_connect_forwards_launch_options_header() {
        let engine = MockEngine::new();
        let config = HarnessConfig::new()
            .headed(true)
            .connect(ConnectOptions::new("ws://localhost:3000"));
        let session = manager(engine.clone(), config);

        session.launch(LaunchOptions::default()).await.unwrap();
        let connect = engine.last_connect_options().unwrap();
        let header = connect
            .headers
            .as_ref()
            .and_then(|h| h.get(LAUNCH_OPTIONS_HEADER))
            .expect("launch options header should be set");
        let forwarded: serde_json::Value = serde_json::from_str(header).unwrap();
        assert_eq!(forwarded["headless"], false);
        assert!(engine.last_launch_options().is_none());
    }

    #[tokio::test]
    async fn test_configured_connect_headers_win() {
        let mut headers = std::collections::HashMap::new();
        headers.insert(LAUNCH_OPTIONS_HEADER.to_string(), "custom".to_string());
        let config = HarnessConfig::new()
            .connect(ConnectOptions::new("ws://localhost:3000").headers(headers));
        let engine = MockEngine::new();
        let session = manager(engine.clone(), config);

        session.launch(LaunchOptions::default()).await.unwrap();
        let connect = engine.last_connect_options().unwrap();
        assert_eq!(
            connect
                .headers
                .unwrap()
                .get(LAUNCH_OPTIONS_HEADER)
                .map(String::as_str),
            Some("custom")
        );
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let engine = MockEngine::new();
        let session = manager(engine.clone(), HarnessConfig::new());
        session.browser().await.unwrap();

        session.close().await.unwrap();
        session.close().await.unwrap();
        assert_eq!(
            engine
                .stats()
                .browser_closes
                .load(std::sync::atomic::Ordering::SeqCst),
            1
        );
    }

    #[tokio::test]
    async fn test_close_without_launch_is_ok() {
        let engine = MockEngine::new();
        let session = manager(engine, HarnessConfig::new());
        session.close().await.unwrap();
    }
}
