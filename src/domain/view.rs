//! Derived views over the record collection.
//!
//! All functions here are pure. The table is paginated over the full
//! collection; the chart is filtered by trade code.

use crate::domain::record::Record;
use std::collections::HashSet;
use std::ops::Range;

/// Rows per table page.
pub const PAGE_SIZE: usize = 50;

/// ceil(len / PAGE_SIZE); zero for an empty collection.
pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Index range shown on 1-based `page`. Pages past the end yield an empty range.
pub fn page_range(len: usize, page: usize) -> Range<usize> {
    let page = page.max(1);
    let start = ((page - 1) * PAGE_SIZE).min(len);
    let end = (page * PAGE_SIZE).min(len);
    start..end
}

pub fn page_slice(records: &[Record], page: usize) -> &[Record] {
    &records[page_range(records.len(), page)]
}

/// One category on the combined chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub date: String,
    /// Line series, left axis.
    pub close: f64,
    /// Bar series, right axis.
    pub volume: f64,
}

/// Records whose trade code exactly matches `trade_code`, in collection order.
///
/// An empty selection matches nothing.
pub fn filter_by_trade_code<'a>(records: &'a [Record], trade_code: &str) -> Vec<&'a Record> {
    if trade_code.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| r.trade_code == trade_code)
        .collect()
}

pub fn chart_series(records: &[Record], trade_code: &str) -> Vec<ChartPoint> {
    filter_by_trade_code(records, trade_code)
        .into_iter()
        .map(|r| ChartPoint {
            date: r.date.clone(),
            close: coerce_number(&r.close),
            volume: coerce_number(&r.volume),
        })
        .collect()
}

/// Numeric-string coercion: trimmed, empty is 0, anything unparsable is NaN.
///
/// Infinity is only recognised as the exact word `Infinity` with an optional
/// sign; other spellings such as `inf` or `nan` are NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    if unsigned
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Distinct trade codes across the whole collection, first-seen order.
pub fn trade_code_options(records: &[Record]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut options = Vec::new();
    for record in records {
        if seen.insert(record.trade_code.as_str()) {
            options.push(record.trade_code.clone());
        }
    }
    options
}
