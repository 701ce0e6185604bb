//! Property tests for the derived views.

mod common;

use approx::assert_relative_eq;
use common::*;
use proptest::prelude::*;
use stockdesk::domain::record::Record;
use stockdesk::domain::view::{
    chart_series, coerce_number, page_count, page_range, page_slice, trade_code_options, PAGE_SIZE,
};
use std::collections::HashSet;

fn records_with_codes(codes: &[u8]) -> Vec<Record> {
    codes
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let code = format!("C{c}");
            make_record(i as u64 + 1, &code, "2020-01-01", &format!("{}.25", i))
        })
        .collect()
}

proptest! {
    #[test]
    fn pages_partition_the_collection(len in 0usize..400) {
        let count = page_count(len);
        prop_assert_eq!(count, len.div_ceil(PAGE_SIZE));

        let mut covered = Vec::new();
        for page in 1..=count {
            let range = page_range(len, page);
            prop_assert!(range.len() <= PAGE_SIZE);
            if page < count {
                prop_assert_eq!(range.len(), PAGE_SIZE);
            }
            covered.extend(range);
        }
        prop_assert_eq!(covered, (0..len).collect::<Vec<_>>());
    }

    #[test]
    fn pages_past_the_end_are_empty(len in 0usize..400, extra in 1usize..5) {
        let range = page_range(len, page_count(len) + extra);
        prop_assert!(range.is_empty());
    }

    #[test]
    fn page_slice_preserves_order(len in 1u64..200, page in 1usize..5) {
        let records = sample_records(len);
        let slice = page_slice(&records, page);
        let start = (page - 1) * PAGE_SIZE;
        for (offset, record) in slice.iter().enumerate() {
            prop_assert_eq!(record.id, records[start + offset].id);
        }
    }

    #[test]
    fn chart_series_is_exact_filter(codes in prop::collection::vec(0u8..5, 0..120), pick in 0u8..6) {
        let records = records_with_codes(&codes);
        let selected = format!("C{pick}");
        let series = chart_series(&records, &selected);
        let expected: Vec<&Record> = records.iter().filter(|r| r.trade_code == selected).collect();
        prop_assert_eq!(series.len(), expected.len());
        for (point, record) in series.iter().zip(expected) {
            prop_assert_eq!(&point.date, &record.date);
            prop_assert_eq!(point.close, coerce_number(&record.close));
        }
    }

    #[test]
    fn trade_code_options_are_distinct_and_complete(codes in prop::collection::vec(0u8..8, 0..150)) {
        let records = records_with_codes(&codes);
        let options = trade_code_options(&records);
        let unique: HashSet<&String> = options.iter().collect();
        prop_assert_eq!(unique.len(), options.len());
        let all: HashSet<String> = records.iter().map(|r| r.trade_code.clone()).collect();
        prop_assert_eq!(options.into_iter().collect::<HashSet<_>>(), all);
    }
}

#[test]
fn hundred_twenty_records_make_three_pages() {
    let records = sample_records(120);
    assert_eq!(page_count(records.len()), 3);
    assert_eq!(page_slice(&records, 1).len(), 50);
    assert_eq!(page_slice(&records, 3).len(), 20);
    assert_eq!(page_slice(&records, 3)[0].id.0, 101);
}

#[test]
fn numeric_strings_coerce_like_the_chart_expects() {
    assert_relative_eq!(coerce_number(" 4.20 "), 4.2);
    assert_relative_eq!(coerce_number(""), 0.0);
    assert_relative_eq!(coerce_number("2285416"), 2_285_416.0);
    assert!(coerce_number("2,285,416").is_nan());
}
