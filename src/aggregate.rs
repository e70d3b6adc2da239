use log::warn;
use rust_decimal::Decimal;

use crate::entry::Entry;
use crate::error::{Error, Result};

fn add(total: Decimal, entry: &Entry, field: &'static str, value: Decimal) -> Result<Decimal> {
    total.checked_add(value).ok_or_else(|| Error::Overflow {
        period: entry.period,
        label: entry.label.clone(),
        field,
    })
}

/// Sorts entries chronologically and fills in the running totals.
///
/// Returns a new sequence; ties on `period` keep their input order.
pub fn accumulate(entries: &[Entry]) -> Result<Vec<Entry>> {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|entry| entry.period);

    for pair in sorted.windows(2) {
        if pair[0].period == pair[1].period {
            warn!("period '{}' appears more than once", pair[1].label);
        }
    }

    let mut sum_donated = Decimal::ZERO;
    let mut sum_needed = Decimal::ZERO;
    sorted
        .into_iter()
        .map(|entry| -> Result<Entry> {
            sum_donated = add(sum_donated, &entry, "sum_donated", entry.donated)?;
            sum_needed = add(sum_needed, &entry, "sum_needed", entry.needed)?;
            Ok(Entry {
                sum_donated,
                sum_needed,
                ..entry
            })
        })
        .collect()
}
