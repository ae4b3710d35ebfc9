//! Raw table rows for the tracker.
//!
//! Rows are ordered sequences of trimmed cell strings in page order. They come
//! either from the live advisory page ([`page`]) or from a JSON rows file
//! ([`rows_file`]) for offline runs.

pub mod page;
pub mod rows_file;

/// One table row: the text of each `td` cell.
pub type Row = Vec<String>;
