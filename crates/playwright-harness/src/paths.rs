// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Filesystem-safe naming for per-test artifact folders.
//
// Test identities (runner node ids) can be arbitrarily long once
// parametrization gets involved, so folder names are hard-capped: short
// names pass through unchanged, long ones keep their head and tail with a
// content hash in between so collisions stay impossible in practice.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Names shorter than this pass through `truncate_file_name` unchanged.
const MAX_FILE_NAME_LEN: usize = 256;

/// Characters kept from each end of an over-long name.
const KEPT_CHARS: usize = 100;

/// Bounds a file or folder name to a portable length.
///
/// Names under 256 characters are returned as-is. Longer names become
/// `{first 100 chars}-{7 hex chars of the SHA-256 of the full name}-{last
/// 100 chars}`, which is deterministic, total, and idempotent once the
/// result is short enough to pass through.
///
/// Slicing is by character, not by byte, so multi-byte identities never
/// split a code point.
pub fn truncate_file_name(file_name: &str) -> String {
    let chars: Vec<char> = file_name.chars().collect();
    if chars.len() < MAX_FILE_NAME_LEN {
        return file_name.to_string();
    }
    let digest = Sha256::digest(file_name.as_bytes());
    let hash: String = digest
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
        .chars()
        .take(7)
        .collect();
    let head: String = chars.iter().take(KEPT_CHARS).collect();
    let tail: String = chars[chars.len() - KEPT_CHARS..].iter().collect();
    format!("{head}-{hash}-{tail}")
}

/// Turns a test identity into a filesystem-safe slug.
///
/// Lowercases, maps every run of non-alphanumeric characters to a single
/// `-`, and trims leading/trailing dashes.
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Builds the final artifact folder for one test unit:
/// `{root}/{truncated slug of the test identity}`.
pub fn build_output_path(root: &Path, test_id: &str) -> PathBuf {
    root.join(truncate_file_name(&slugify(test_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_name_is_identity() {
        assert_eq!(truncate_file_name("abc"), "abc");
        let name = "a".repeat(255);
        assert_eq!(truncate_file_name(&name), name);
    }

    #[test]
    fn test_truncate_long_name_is_bounded() {
        let name = "x".repeat(1000);
        let truncated = truncate_file_name(&name);
        // 100 + 1 + 7 + 1 + 100
        assert_eq!(truncated.chars().count(), 209);
        assert!(truncated.starts_with(&"x".repeat(100)));
        assert!(truncated.ends_with(&"x".repeat(100)));
    }

    #[test]
    fn test_truncate_is_deterministic() {
        let name = "y".repeat(300);
        assert_eq!(truncate_file_name(&name), truncate_file_name(&name));
    }

    #[test]
    fn test_truncate_distinguishes_same_ends() {
        // Same head and tail, different middle: only the hash differs.
        let a = format!("{}{}{}", "a".repeat(100), "1".repeat(200), "b".repeat(100));
        let b = format!("{}{}{}", "a".repeat(100), "2".repeat(200), "b".repeat(100));
        assert_ne!(truncate_file_name(&a), truncate_file_name(&b));
    }

    #[test]
    fn test_truncate_exactly_at_boundary() {
        let name = "z".repeat(256);
        let truncated = truncate_file_name(&name);
        assert_ne!(truncated, name);
        assert_eq!(truncated.chars().count(), 209);
    }

    #[test]
    fn test_truncate_multibyte_input() {
        let name = "ü".repeat(300);
        let truncated = truncate_file_name(&name);
        assert_eq!(truncated.chars().count(), 209);
    }

    #[test]
    fn test_slugify_node_id() {
        assert_eq!(
            slugify("tests/test_foo.py::test_bar[chromium]"),
            "tests-test-foo-py-test-bar-chromium"
        );
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("__init__"), "init");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_build_output_path() {
        let path = build_output_path(Path::new("test-results"), "test_a[chromium]");
        assert_eq!(path, Path::new("test-results").join("test-a-chromium"));
    }
}
