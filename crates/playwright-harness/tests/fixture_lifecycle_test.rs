// Integration tests for session and test-unit lifecycle
//
// Covers browser reuse across test units, forced cleanup of contexts a
// test forgot to close, skip decisions across the browser matrix, and
// option forwarding into launch and connect.

use playwright_harness_rs::engine::mock::MockEngine;
use playwright_harness_rs::{
    ConnectOptions, ContextOptions, HarnessConfig, TestMarkers, TestOutcome, TestSession,
    LAUNCH_OPTIONS_HEADER,
};
use std::sync::atomic::Ordering;

fn plain_config(scratch: &tempfile::TempDir) -> HarnessConfig {
    HarnessConfig::new().output_dir(scratch.path().join("test-results"))
}

#[tokio::test]
async fn test_browser_is_launched_once_and_reused() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let engine = MockEngine::new();
    let session = TestSession::start(engine.clone(), plain_config(&scratch)).expect("session");

    for n in 0..3 {
        let unit = session.begin_test(&format!("suite::test_{n}[chromium]"), TestMarkers::none());
        unit.page().await.expect("page");
        unit.finish(&TestOutcome::passed()).await.expect("finish");
    }
    session.close().await.expect("close");

    assert_eq!(engine.stats().browsers_launched.load(Ordering::SeqCst), 1);
    assert_eq!(engine.stats().browser_closes.load(Ordering::SeqCst), 1);
    assert_eq!(engine.stats().contexts_created.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_forgotten_contexts_are_closed_at_finish() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let engine = MockEngine::new();
    let session = TestSession::start(engine.clone(), plain_config(&scratch)).expect("session");

    let unit = session.begin_test("suite::test_leaky[chromium]", TestMarkers::none());
    let default = unit.context().await.expect("default context");
    let extra = unit
        .new_context(ContextOptions::new())
        .await
        .expect("extra context");
    // The test never closes either context.
    unit.finish(&TestOutcome::passed()).await.expect("finish");

    assert!(default.is_closed());
    assert!(extra.is_closed());
    assert_eq!(engine.stats().contexts_open.load(Ordering::SeqCst), 0);

    session.close().await.expect("close");
}

#[tokio::test]
async fn test_default_context_is_cached() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let engine = MockEngine::new();
    let session = TestSession::start(engine.clone(), plain_config(&scratch)).expect("session");

    let unit = session.begin_test("suite::test_cached[chromium]", TestMarkers::none());
    let a = unit.context().await.expect("context");
    let b = unit.context().await.expect("context again");
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert_eq!(engine.stats().contexts_created.load(Ordering::SeqCst), 1);

    // The page helper reuses the same default context.
    unit.page().await.expect("page");
    assert_eq!(engine.stats().contexts_created.load(Ordering::SeqCst), 1);

    unit.finish(&TestOutcome::passed()).await.expect("finish");
    session.close().await.expect("close");
}

#[tokio::test]
async fn test_manual_context_close_is_idempotent() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let engine = MockEngine::new();
    let session = TestSession::start(engine.clone(), plain_config(&scratch)).expect("session");

    let unit = session.begin_test("suite::test_double_close[chromium]", TestMarkers::none());
    let context = unit.new_context(ContextOptions::new()).await.expect("context");
    context.close().await.expect("first close");
    context.close().await.expect("second close");
    assert_eq!(engine.stats().contexts_open.load(Ordering::SeqCst), 0);

    unit.finish(&TestOutcome::passed()).await.expect("finish");
    session.close().await.expect("close");
}

#[test]
fn test_skip_markers_across_browser_matrix() {
    let markers = TestMarkers::none().skip_browser("firefox");
    for (browser, expect_skip) in [("chromium", false), ("firefox", true), ("webkit", false)] {
        let scratch = tempfile::tempdir().expect("tempdir");
        let engine = MockEngine::with_behavior(browser, Default::default());
        let session = TestSession::start(engine, plain_config(&scratch)).expect("session");
        let skip = session.check_skip(&markers);
        assert_eq!(skip.is_some(), expect_skip, "browser {browser}");
        if let Some(reason) = skip {
            assert_eq!(reason, "skipped for this browser: firefox");
        }
    }
}

#[test]
fn test_only_browser_marker_skips_everything_else() {
    let markers = TestMarkers::none().only_browser("webkit");
    for (browser, expect_skip) in [("chromium", true), ("firefox", true), ("webkit", false)] {
        let scratch = tempfile::tempdir().expect("tempdir");
        let engine = MockEngine::with_behavior(browser, Default::default());
        let session = TestSession::start(engine, plain_config(&scratch)).expect("session");
        assert_eq!(session.check_skip(&markers).is_some(), expect_skip);
    }
}

#[test]
fn test_unknown_configured_browser_is_rejected() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let config = plain_config(&scratch).browser("safari");
    let result = TestSession::start(MockEngine::new(), config);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_launch_options_reach_the_engine() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let engine = MockEngine::new();
    let config = plain_config(&scratch)
        .headed(true)
        .channel("chrome")
        .slow_mo(150.0);
    let session = TestSession::start(engine.clone(), config).expect("session");

    let unit = session.begin_test("suite::test_opts[chromium]", TestMarkers::none());
    unit.page().await.expect("page");
    unit.finish(&TestOutcome::passed()).await.expect("finish");
    session.close().await.expect("close");

    let launch = engine.last_launch_options().expect("launch recorded");
    assert_eq!(launch.headless, Some(false));
    assert_eq!(launch.channel.as_deref(), Some("chrome"));
    assert_eq!(launch.slow_mo, Some(150.0));
}

#[tokio::test]
async fn test_connect_forwards_launch_options_header() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let engine = MockEngine::new();
    let config = plain_config(&scratch)
        .channel("msedge")
        .connect(ConnectOptions::new("ws://127.0.0.1:4444/playwright"));
    let session = TestSession::start(engine.clone(), config).expect("session");

    let unit = session.begin_test("suite::test_remote[chromium]", TestMarkers::none());
    unit.page().await.expect("page");
    unit.finish(&TestOutcome::passed()).await.expect("finish");
    session.close().await.expect("close");

    assert!(engine.last_launch_options().is_none());
    let connect = engine.last_connect_options().expect("connect recorded");
    assert_eq!(connect.ws_endpoint, "ws://127.0.0.1:4444/playwright");
    let headers = connect.headers.expect("headers");
    let payload = headers.get(LAUNCH_OPTIONS_HEADER).expect("options header");
    let options: playwright_harness_rs::LaunchOptions =
        serde_json::from_str(payload).expect("valid json");
    assert_eq!(options.channel.as_deref(), Some("msedge"));
}

#[tokio::test]
async fn test_device_preset_shapes_default_context() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let engine = MockEngine::new();
    let config = plain_config(&scratch).device("iPhone 12");
    let session = TestSession::start(engine.clone(), config).expect("session");

    let unit = session.begin_test("suite::test_mobile[chromium]", TestMarkers::none());
    let context = unit.context().await.expect("context");
    assert!(!context.is_closed());
    unit.finish(&TestOutcome::passed()).await.expect("finish");
    session.close().await.expect("close");
}

#[tokio::test]
async fn test_later_matrix_leg_preserves_earlier_artifacts() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let output = scratch.path().join("test-results");
    let config = HarnessConfig::new()
        .browser("chromium")
        .browser("firefox")
        .output_dir(&output)
        .tracing(playwright_harness_rs::CaptureMode::On)
        .screenshot(playwright_harness_rs::ScreenshotMode::On);

    let chromium = TestSession::start(MockEngine::new(), config.clone()).expect("chromium leg");
    let unit = chromium.begin_test("suite::test_a[chromium]", TestMarkers::none());
    unit.page().await.expect("page");
    unit.finish(&TestOutcome::failed_call()).await.expect("finish");
    chromium.close().await.expect("close");
    assert!(output.join("suite-test-a-chromium").join("trace.zip").exists());

    // Second engine of the same run, same output root. Its start must
    // not wipe what the chromium leg already promoted.
    let firefox = TestSession::start(
        MockEngine::with_behavior("firefox", Default::default()),
        config,
    )
    .expect("firefox leg");
    let unit = firefox.begin_test("suite::test_a[firefox]", TestMarkers::none());
    unit.page().await.expect("page");
    unit.finish(&TestOutcome::failed_call()).await.expect("finish");
    firefox.close().await.expect("close");

    let chromium_dir = output.join("suite-test-a-chromium");
    assert!(chromium_dir.join("trace.zip").exists());
    assert!(chromium_dir.join("test-failed-1.png").exists());
    assert!(output.join("suite-test-a-firefox").join("trace.zip").exists());
}

#[test]
fn test_unknown_device_is_rejected() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let config = plain_config(&scratch).device("Nokia 3310");
    let result = TestSession::start(MockEngine::new(), config);
    assert!(matches!(
        result,
        Err(playwright_harness_rs::Error::Configuration(_))
    ));
}

#[tokio::test]
async fn test_output_path_reflects_sanitized_test_id() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let session = TestSession::start(MockEngine::new(), plain_config(&scratch)).expect("session");

    let unit = session.begin_test("Suite::Test Login! [chromium]", TestMarkers::none());
    let name = unit
        .output_path()
        .file_name()
        .and_then(|n| n.to_str())
        .expect("dir name");
    assert_eq!(name, "suite-test-login-chromium");

    unit.finish(&TestOutcome::passed()).await.expect("finish");
    session.close().await.expect("close");
}
