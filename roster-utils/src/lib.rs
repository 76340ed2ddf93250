/// Pure parser helpers.
pub mod parse;
/// Shared time helpers.
pub mod time;
