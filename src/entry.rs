use chrono::Month;
use rust_decimal::Decimal;

/// One reporting period, enriched for the charts.
///
/// The Row Parser fills everything up to `has_donation`; `sum_donated` and
/// `sum_needed` stay zero until the entries go through [`crate::accumulate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub period: i32,
    pub label: String,
    pub donors: u32,
    pub received: Decimal,
    pub pledged: Decimal,
    pub donated: Decimal,
    pub needed: Decimal,
    pub has_donation: bool,
    pub sum_donated: Decimal,
    pub sum_needed: Decimal,
    /// Only set from the start of the projection window onwards.
    pub sum_projected_donations: Option<Decimal>,
}

/// Chronological index: months elapsed since January of `base_year`.
/// `None` when the index does not fit an `i32`.
pub fn period_of(year: i32, month: u32, base_year: i32) -> Option<i32> {
    let months = (i64::from(year) - i64::from(base_year)) * 12 + i64::from(month) - 1;
    i32::try_from(months).ok()
}

/// Three-letter month name, or the bare number when `month` is not 1-12.
pub fn month_label(month: u32) -> String {
    match u8::try_from(month).ok().and_then(|m| Month::try_from(m).ok()) {
        Some(m) => m.name()[..3].to_string(),
        None => month.to_string(),
    }
}

/// January carries its year so the axis shows where a new year begins.
pub fn period_label(year: i32, month: u32) -> String {
    let label = month_label(month);
    if month == 1 {
        format!("{label} {year}")
    } else {
        label
    }
}

#[test]
fn periods_are_gap_consistent() {
    let period = |year, month| period_of(year, month, 2000).unwrap();
    assert_eq!(period(2000, 1), 0);
    assert_eq!(period(2025, 1) - period(2024, 12), 1);
    assert_eq!(period(2025, 3) - period(2025, 1), 2);
    assert_eq!(period(1999, 12), -1);
    assert_eq!(period_of(2025, 1, i32::MIN), None);
    assert_eq!(period_of(2025, 1, i32::MAX), None);
}

#[test]
fn labels() {
    assert_eq!(month_label(2), "Feb");
    assert_eq!(month_label(12), "Dec");
    assert_eq!(month_label(0), "0");
    assert_eq!(month_label(13), "13");
    assert_eq!(month_label(300), "300");
    assert_eq!(period_label(2025, 1), "Jan 2025");
    assert_eq!(period_label(2025, 9), "Sep");
}
