//! Search API constants and paging arithmetic.
//!
//! The Europeana API counts result offsets from 1; everything else in this
//! workspace counts from 0. Convert only through the two functions below.

pub const DEFAULT_ROWS: u64 = 10;

pub const MATCH_ALL_QUERY: &str = "*:*";

/// 1-based `start` parameter for a page. Pages are counted from 1; page 0 is
/// treated as the first page.
pub fn one_based_start(page: u64, rows: u64) -> u64 {
    let start = page.max(1).saturating_sub(1).saturating_mul(rows).saturating_add(1);
    start.max(1)
}

/// 0-based offset for an API `start` value. An unknown start (0) yields -1.
pub fn zero_based_offset(start: i64) -> i64 {
    start.saturating_sub(1)
}
