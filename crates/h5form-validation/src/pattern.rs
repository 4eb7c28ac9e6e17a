//! HTML5 `pattern` attribute matching

use regex::Regex;

/// Compiles a `pattern` attribute. The pattern must match the whole value,
/// so it is wrapped as `^(?:pattern)$`. Returns `None` for patterns the
/// regex engine rejects.
pub fn compile_pattern(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("^(?:{})$", pattern)).ok()
}

/// Tests `value` against `pattern`.
///
/// `None` means the pattern itself is malformed; callers treat that as "no
/// constraint" rather than as a failure.
pub fn matches_pattern(value: &str, pattern: &str) -> Option<bool> {
    compile_pattern(pattern).map(|regex| regex.is_match(value))
}
