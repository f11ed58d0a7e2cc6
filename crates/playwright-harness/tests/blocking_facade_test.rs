// Integration tests for the blocking facade
//
// Drives the same lifecycle as the async surface from plain synchronous
// test functions, the way a non-async test runner would.

use playwright_harness_rs::engine::mock::MockEngine;
use playwright_harness_rs::engine::EnginePage;
use playwright_harness_rs::sync::BlockingTestSession;
use playwright_harness_rs::{
    CaptureMode, ContextOptions, HarnessConfig, ScreenshotMode, TestMarkers, TestOutcome,
};
use std::sync::atomic::Ordering;

#[test]
fn test_blocking_session_runs_a_full_unit() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let output = scratch.path().join("test-results");
    let engine = MockEngine::new();
    let config = HarnessConfig::new()
        .output_dir(&output)
        .screenshot(ScreenshotMode::OnlyOnFailure)
        .tracing(CaptureMode::RetainOnFailure);
    let session = BlockingTestSession::start(engine.clone(), config).expect("session");
    assert_eq!(session.browser_name(), "chromium");

    let unit = session.begin_test("suite::test_fail[chromium]", TestMarkers::none());
    let page = unit.page().expect("page");
    assert!(!page.is_closed());
    unit.finish(&TestOutcome::failed_call()).expect("finish");
    session.close().expect("close");

    let dir = output.join("suite-test-fail-chromium");
    assert!(dir.join("test-failed-1.png").exists());
    assert!(dir.join("trace.zip").exists());
    assert_eq!(engine.stats().contexts_open.load(Ordering::SeqCst), 0);
}

#[test]
fn test_blocking_contexts_close_explicitly() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let config = HarnessConfig::new().output_dir(scratch.path().join("test-results"));
    let engine = MockEngine::new();
    let session = BlockingTestSession::start(engine.clone(), config).expect("session");

    let unit = session.begin_test("suite::test_two_contexts[chromium]", TestMarkers::none());
    let first = unit.context().expect("default context");
    first.new_page().expect("page");
    let second = unit
        .new_context(ContextOptions::new().locale("en-GB"))
        .expect("second context");
    second.new_page().expect("page");
    assert_eq!(first.pages().len(), 1);

    second.close().expect("close");
    assert!(second.is_closed());
    assert!(!first.is_closed());

    unit.finish(&TestOutcome::passed()).expect("finish");
    session.close().expect("close");
    assert_eq!(engine.stats().contexts_created.load(Ordering::SeqCst), 2);
}

#[test]
fn test_blocking_skip_check() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let config = HarnessConfig::new().output_dir(scratch.path().join("test-results"));
    let engine = MockEngine::with_behavior("firefox", Default::default());
    let session = BlockingTestSession::start(engine, config).expect("session");

    let markers = TestMarkers::none().only_browser("chromium");
    let reason = session.check_skip(&markers).expect("should skip");
    assert_eq!(reason, "skipped for this browser: firefox");
    session.close().expect("close");
}
