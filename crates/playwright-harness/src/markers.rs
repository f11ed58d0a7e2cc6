// Per-test markers supplied by the host runner.

use crate::api::ContextOptions;

/// Static per-test markers, read once before the test unit runs.
///
/// The host runner resolves its marker syntax into this struct; the
/// harness never inspects runner internals.
#[derive(Debug, Clone, Default)]
pub struct TestMarkers {
    /// Run this test only on the named engine; every other known engine
    /// is skipped.
    pub only_browser: Option<String>,
    /// Skip this test on the named engine. Applied after `only_browser`,
    /// so a deny on the allowed engine still skips it.
    pub skip_browser: Option<String>,
    /// Context-option overrides applied with highest precedence over the
    /// base and per-call configuration.
    pub context_options: Option<ContextOptions>,
}

impl TestMarkers {
    /// No markers.
    pub fn none() -> Self {
        Self::default()
    }

    /// Marks the test to run only on `name`.
    pub fn only_browser(mut self, name: impl Into<String>) -> Self {
        self.only_browser = Some(name.into());
        self
    }

    /// Marks the test to be skipped on `name`.
    pub fn skip_browser(mut self, name: impl Into<String>) -> Self {
        self.skip_browser = Some(name.into());
        self
    }

    /// Supplies additional context options for this test.
    pub fn context_options(mut self, options: ContextOptions) -> Self {
        self.context_options = Some(options);
        self
    }
}
