//! Turns a table of monthly donation activity into the ordered, enriched
//! series the donation charts are drawn from: parse, sort, running totals,
//! then a linear projection over the most recent donation-bearing months.

use csv::{ReaderBuilder, Trim};
use log::{info, warn};
use std::io;

mod aggregate;
mod chart;
mod entry;
mod error;
mod project;
mod row;
mod settings;

pub use aggregate::accumulate;
pub use chart::{shortfall, ChartKind, CsvFeed, Renderer};
pub use entry::{month_label, period_label, period_of, Entry};
pub use error::{Error, Result};
pub use project::{project, Trend};
pub use row::{parse_row, RawRow};
pub use settings::{Anchor, DonationRule, Settings, BASE_YEAR, WINDOW};

/// Reads every row of a CSV table with a header line.
///
/// The schema is picked once from the header: when `received` or `pledged`
/// is a column, any `donated` column is ignored for every row.
pub fn read_rows<R: io::Read>(source: R) -> Result<Vec<RawRow>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);
    let headers = reader.headers()?.clone();
    let split = headers.iter().any(|h| h == "received" || h == "pledged");
    if split && headers.iter().any(|h| h == "donated") {
        warn!("ignoring 'donated' column, table has received/pledged columns");
    }

    reader
        .deserialize::<RawRow>()
        .map(|row| -> Result<RawRow> {
            let mut row = row?;
            if split {
                row.donated = None;
            }
            Ok(row)
        })
        .collect()
}

/// Runs the whole pipeline. The first malformed row aborts the batch.
pub fn process(rows: &[RawRow], settings: &Settings) -> Result<Vec<Entry>> {
    let parsed = rows
        .iter()
        .enumerate()
        .map(|(i, raw)| parse_row(i + 1, raw, settings))
        .collect::<Result<Vec<_>>>()?;
    let entries = project(&accumulate(&parsed)?, settings)?;
    info!("processed {} periods", entries.len());
    Ok(entries)
}

#[cfg(test)]
use rust_decimal::Decimal;
#[cfg(test)]
use rust_decimal_macros::dec;

#[cfg(test)]
fn scenario() -> Vec<RawRow> {
    vec![
        RawRow::new("2025-03", "4", "900", "100", "1000"),
        RawRow::new("2025-01", "5", "600", "200", "1000"),
        RawRow::new("2025-02", "3", "800", "0", "1000"),
    ]
}

#[test]
fn sanity() {
    let entries = process(&scenario(), &Settings::default()).unwrap();

    let donated: Vec<Decimal> = entries.iter().map(|e| e.donated).collect();
    assert_eq!(donated, [dec!(800), dec!(800), dec!(1000)]);
    let sum_donated: Vec<Decimal> = entries.iter().map(|e| e.sum_donated).collect();
    assert_eq!(sum_donated, [dec!(800), dec!(1600), dec!(2600)]);
    let sum_needed: Vec<Decimal> = entries.iter().map(|e| e.sum_needed).collect();
    assert_eq!(sum_needed, [dec!(1000), dec!(2000), dec!(3000)]);
    assert_eq!(entries[0].sum_projected_donations, Some(dec!(800)));
    assert!(entries.iter().all(|e| e.sum_projected_donations.is_some()));
}

#[test]
fn invariants_hold() {
    let rows = vec![
        RawRow::new("2024-11", "1", "0", "0", "300"),
        RawRow::new("2025-02", "2", "40", "10", "300"),
        RawRow::new("2024-12", "0", "120", "0", "300"),
        RawRow::new("2025-01", "6", "0", "25", "300"),
        RawRow::new("2025-03", "3", "75.5", "0", "300"),
    ];
    let entries = process(&rows, &Settings::default()).unwrap();

    assert_eq!(entries.len(), rows.len());
    assert!(entries.windows(2).all(|w| w[0].period < w[1].period));
    assert_eq!(entries[0].sum_donated, entries[0].donated);
    for w in entries.windows(2) {
        assert_eq!(w[1].sum_donated, w[0].sum_donated + w[1].donated);
        assert_eq!(w[1].sum_needed, w[0].sum_needed + w[1].needed);
    }
    for e in &entries {
        assert_eq!(e.donated, e.received + e.pledged);
        assert_eq!(e.has_donation, e.received > Decimal::ZERO);
    }

    // bearing periods are Dec, Feb and Mar; Jan's pledge alone does not count
    let start = entries
        .iter()
        .position(|e| e.sum_projected_donations.is_some())
        .unwrap();
    assert_eq!(entries[start].label, "Dec");
    assert!(entries[start..].iter().all(|e| e.sum_projected_donations.is_some()));
    assert!(entries[..start].iter().all(|e| e.sum_projected_donations.is_none()));
}

#[test]
fn empty_input() {
    let entries = process(&[], &Settings::default()).unwrap();
    assert!(entries.is_empty());
}

#[test]
fn single_row_without_donation() {
    let rows = vec![RawRow::new("2025-01", "0", "0", "0", "500")];
    let entries = process(&rows, &Settings::default()).unwrap();

    assert_eq!(entries.len(), 1);
    assert!(!entries[0].has_donation);
    assert_eq!(entries[0].sum_projected_donations, None);
}

#[test]
fn malformed_row_aborts_batch() {
    let mut rows = scenario();
    rows.push(RawRow::new("2025-04", "1", "NaN?", "0", "1000"));

    let err = process(&rows, &Settings::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidNumber { row: 4, .. }));
}

#[test]
fn huge_amounts_are_an_error_not_a_panic() {
    let max = Decimal::MAX.to_string();
    let rows = vec![
        RawRow::new("2025-01", "1", &max, "0", "1"),
        RawRow::new("2025-02", "1", &max, "0", "1"),
    ];

    let err = process(&rows, &Settings::default()).unwrap_err();
    assert!(matches!(err, Error::Overflow { field: "sum_donated", .. }));
}

#[test]
fn process_is_repeatable() {
    let rows = scenario();
    let before = rows.clone();

    let first = process(&rows, &Settings::default()).unwrap();
    let second = process(&rows, &Settings::default()).unwrap();

    assert_eq!(first, second);
    assert_eq!(rows, before);
}
