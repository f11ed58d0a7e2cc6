// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Per-phase test outcome reporting.
//
// The host runner reports each phase (setup, call, teardown) as it
// completes. The recorder only ever consumes the reduction to a single
// "failed" flag, and that reduction is deliberately conservative: a test
// whose call phase never got reported (abrupt interrupt, runner crash
// during the body) counts as failed so artifacts are retained rather than
// silently dropped.

/// Execution phase of one test unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPhase {
    /// Fixture setup
    Setup,
    /// The test body
    Call,
    /// Fixture teardown
    Teardown,
}

/// Result of a single phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Phase completed without failure
    Passed,
    /// Phase raised an assertion or error
    Failed,
    /// Phase was skipped
    Skipped,
}

/// Outcome of one test unit, accumulated phase by phase.
///
/// Threaded explicitly into [`TestUnit::finish`](crate::harness::TestUnit::finish)
/// rather than read back from shared runner state.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestOutcome {
    setup: Option<PhaseOutcome>,
    call: Option<PhaseOutcome>,
    teardown: Option<PhaseOutcome>,
}

impl TestOutcome {
    /// Creates an empty outcome with no phases reported yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the result of one phase. Later reports for the same phase
    /// overwrite earlier ones, mirroring the runner's report hook.
    pub fn report(&mut self, phase: TestPhase, outcome: PhaseOutcome) {
        match phase {
            TestPhase::Setup => self.setup = Some(outcome),
            TestPhase::Call => self.call = Some(outcome),
            TestPhase::Teardown => self.teardown = Some(outcome),
        }
    }

    /// Convenience constructor for a test whose call phase passed.
    pub fn passed() -> Self {
        let mut outcome = Self::new();
        outcome.report(TestPhase::Call, PhaseOutcome::Passed);
        outcome
    }

    /// Convenience constructor for a test whose call phase failed.
    pub fn failed_call() -> Self {
        let mut outcome = Self::new();
        outcome.report(TestPhase::Call, PhaseOutcome::Failed);
        outcome
    }

    /// Reported result of the given phase, if any.
    pub fn phase(&self, phase: TestPhase) -> Option<PhaseOutcome> {
        match phase {
            TestPhase::Setup => self.setup,
            TestPhase::Call => self.call,
            TestPhase::Teardown => self.teardown,
        }
    }

    /// Reduces the outcome to the artifact-retention verdict.
    ///
    /// True unless the call phase is known and reported as passed. A
    /// missing call report means something prevented the runner from
    /// reporting at all, which still counts as a failure here.
    pub fn failed(&self) -> bool {
        !matches!(self.call, Some(PhaseOutcome::Passed))
    }
}
