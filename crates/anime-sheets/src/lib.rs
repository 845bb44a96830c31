//! Spreadsheet utilities for anime lists.
//!
//! - Merge a folder of workbooks into one multi-sheet workbook, keeping the
//!   formatting of every cell
//! - Write a user's scored anime list as a workbook

pub mod format;
pub mod merge;
pub mod report;

pub use format::{copy_cell, copy_format};
pub use merge::{combine_sheets_keeping_format, combine_workbooks, MergeError};
pub use report::{build_anime_list, load_scored_entries};
