/// Display fallbacks for profile fields.
pub mod formatting;
/// Shared time helpers.
pub mod time;
/// Session token normalization and structural checks.
pub mod token;
