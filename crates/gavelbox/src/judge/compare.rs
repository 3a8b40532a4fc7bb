//! Output comparison
//!
//! The sole correctness oracle: both expected and actual output are
//! canonicalized by trimming and collapsing whitespace runs to a single
//! space, then compared for exact, case-sensitive equality. Lenient to
//! formatting, strict on content.

/// Canonicalize output for comparison
pub fn normalize_output(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compare expected and actual output after normalization
pub fn outputs_match(expected: &str, actual: &str) -> bool {
    normalize_output(expected) == normalize_output(actual)
}
