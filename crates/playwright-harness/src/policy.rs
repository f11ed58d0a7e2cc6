// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Browser-selection and skip policy.
//
// Two call paths exist: the parametrized one, where every configured
// engine becomes its own test unit, and the legacy single-browser one
// (unittest-style suites), where only one engine can be honored.

use crate::error::{Error, Result};
use crate::markers::TestMarkers;
use std::collections::HashSet;

/// Engines this harness knows how to drive.
pub const KNOWN_BROWSERS: [&str; 3] = ["chromium", "firefox", "webkit"];

/// Default engine when none is configured.
pub const DEFAULT_BROWSER: &str = "chromium";

/// Resolves the single browser name for the legacy (non-parametrized)
/// call path.
///
/// Empty selection falls back to chromium. A single valid name is used
/// as-is; an unknown name is a configuration error. When several names
/// are configured only the first can be honored on this path; the rest
/// are reported as unsupported via a warning, not an error.
pub fn resolve_browser_name(requested: &[String]) -> Result<String> {
    match requested {
        [] => Ok(DEFAULT_BROWSER.to_string()),
        [name] => validate_browser_name(name).map(str::to_string),
        [first, rest @ ..] => {
            tracing::warn!(
                ignored = ?rest,
                "specifying multiple browsers is not supported on the non-parametrized path; using the first"
            );
            validate_browser_name(first).map(str::to_string)
        }
    }
}

/// Checks a browser name against the known engines.
pub fn validate_browser_name(name: &str) -> Result<&str> {
    if KNOWN_BROWSERS.contains(&name) {
        Ok(name)
    } else {
        Err(Error::Configuration(format!(
            "unsupported browser '{name}' (expected one of {KNOWN_BROWSERS:?})"
        )))
    }
}

/// Computes the set of engines this test is skipped on.
///
/// An allow-marker first fills the set with every known engine except the
/// allowed one; a deny-marker then adds its engine. The ordering makes
/// deny win when both markers target the same engine (the set absorbs
/// the duplicate).
pub fn skip_list(markers: &TestMarkers) -> HashSet<String> {
    let mut skipped: HashSet<String> = HashSet::new();
    if let Some(only) = &markers.only_browser {
        skipped.extend(
            KNOWN_BROWSERS
                .iter()
                .filter(|name| *name != only)
                .map(|name| (*name).to_string()),
        );
    }
    if let Some(skip) = &markers.skip_browser {
        skipped.insert(skip.clone());
    }
    skipped
}

/// Whether this concrete (test × browser) unit should be skipped, and the
/// message to surface to the runner if so. Decided after parametrization,
/// per unit; a skip is a skip, never a failure.
pub fn should_skip(browser_name: &str, markers: &TestMarkers) -> Option<String> {
    if skip_list(markers).contains(browser_name) {
        Some(format!("skipped for this browser: {browser_name}"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_empty_defaults_to_chromium() {
        assert_eq!(resolve_browser_name(&[]).unwrap(), "chromium");
    }

    #[test]
    fn test_resolve_single_name() {
        let names = vec!["webkit".to_string()];
        assert_eq!(resolve_browser_name(&names).unwrap(), "webkit");
    }

    #[test]
    fn test_resolve_unknown_name_is_configuration_error() {
        let names = vec!["netscape".to_string()];
        let err = resolve_browser_name(&names).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_resolve_multiple_uses_first() {
        let names = vec!["firefox".to_string(), "webkit".to_string()];
        assert_eq!(resolve_browser_name(&names).unwrap(), "firefox");
    }

    #[test]
    fn test_skip_list_empty_without_markers() {
        assert!(skip_list(&TestMarkers::none()).is_empty());
    }

    #[test]
    fn test_only_marker_skips_everything_else() {
        let markers = TestMarkers::none().only_browser("firefox");
        let skipped = skip_list(&markers);
        assert_eq!(skipped.len(), 2);
        assert!(skipped.contains("chromium"));
        assert!(skipped.contains("webkit"));
        assert!(!skipped.contains("firefox"));
    }

    #[test]
    fn test_skip_marker_adds_engine() {
        let markers = TestMarkers::none().skip_browser("webkit");
        let skipped = skip_list(&markers);
        assert_eq!(skipped.len(), 1);
        assert!(skipped.contains("webkit"));
    }

    #[test]
    fn test_deny_wins_over_allow_on_same_engine() {
        let markers = TestMarkers::none()
            .only_browser("firefox")
            .skip_browser("firefox");
        let skipped = skip_list(&markers);
        // All three engines end up skipped: the set absorbs the overlap.
        assert_eq!(skipped.len(), 3);
        assert!(should_skip("firefox", &markers).is_some());
    }

    #[test]
    fn test_should_skip_message_names_the_browser() {
        let markers = TestMarkers::none().skip_browser("firefox");
        assert_eq!(
            should_skip("firefox", &markers).as_deref(),
            Some("skipped for this browser: firefox")
        );
        assert!(should_skip("chromium", &markers).is_none());
    }
}
