//! h5form validation core
//!
//! Pure validation helpers shared by the h5form rule evaluator: the email
//! pattern, HTML5 `pattern` matching, length bounds embedded in a pattern's
//! quantifier, and lenient integer parsing for `type=number` controls.

pub mod constraint;
pub mod email;
pub mod numeric;
pub mod pattern;

pub use constraint::{extract_length_bounds, LengthBounds};
pub use email::is_valid_email;
pub use numeric::{parse_int, BoundViolation, NumberBounds};
pub use pattern::{compile_pattern, matches_pattern};
