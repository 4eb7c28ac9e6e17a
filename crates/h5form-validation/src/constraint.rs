//! Length bounds embedded in a pattern quantifier
//!
//! A pattern such as `^[a-z]{2,10}$` carries the field's length bounds in its
//! trailing `{min,max}` quantifier. The rule evaluator uses these bounds to
//! pick a more helpful message than "does not match the format".

/// Bounds read from the first `{...}` group of a pattern.
///
/// A bound written as an empty string (`{,10}`) or as something that is not
/// a non-negative integer is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LengthBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl LengthBounds {
    /// True when neither bound is present.
    pub fn is_empty(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Extracts `{min,max}` length bounds from a pattern.
///
/// Only patterns ending in a quantifier are considered: the closing `}` must
/// be the last character or the one before it (`{2,10}`, `.{2,10}$`).
/// Returns `None` when that guard fails or no `{...}` group is found.
/// Malformed input never panics.
pub fn extract_length_bounds(constraint: &str) -> Option<LengthBounds> {
    if !constraint.chars().rev().take(2).any(|c| c == '}') {
        return None;
    }

    let open = constraint.find('{')?;
    let close = open + constraint[open..].find('}')?;
    let group = &constraint[open + 1..close];

    let mut parts = group.split(',');
    let min = parts.next().and_then(parse_bound);
    let max = parts.next().and_then(parse_bound);

    Some(LengthBounds { min, max })
}

fn parse_bound(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}
