use log::{debug, warn};
use rust_decimal::Decimal;
use std::num::NonZeroUsize;

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::settings::{Anchor, Settings};

/// Linear fit through the most recent donation-bearing periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    /// First period that receives a projected value.
    pub start: i32,
    pub avg_donated: Decimal,
    pub reference_sum: Decimal,
    pub reference_period: Decimal,
}

fn overflow(entry: &Entry, field: &'static str) -> Error {
    Error::Overflow {
        period: entry.period,
        label: entry.label.clone(),
        field,
    }
}

fn mean<'a>(
    window: &[&'a Entry],
    field: &'static str,
    value: impl Fn(&'a Entry) -> Decimal,
) -> Result<Decimal> {
    let total = window.iter().try_fold(Decimal::ZERO, |total, &entry| {
        total
            .checked_add(value(entry))
            .ok_or_else(|| overflow(entry, field))
    })?;
    Ok(total / Decimal::from(window.len()))
}

impl Trend {
    /// Estimates the trend from entries already sorted by period and
    /// carrying running totals. `Ok(None)` when no period is donation-bearing.
    pub fn estimate(
        entries: &[Entry],
        window: NonZeroUsize,
        anchor: Anchor,
    ) -> Result<Option<Trend>> {
        let bearing: Vec<&Entry> = entries.iter().filter(|e| e.has_donation).collect();
        let recent = &bearing[bearing.len().saturating_sub(window.get())..];
        let Some(first) = recent.first() else {
            return Ok(None);
        };

        let avg_donated = mean(recent, "donated", |e| e.donated)?;
        let (reference_sum, reference_period) = match anchor {
            Anchor::WindowStart => (first.sum_donated, Decimal::from(first.period)),
            Anchor::WindowMean => (
                mean(recent, "sum_donated", |e| e.sum_donated)?,
                mean(recent, "period", |e| Decimal::from(e.period))?,
            ),
        };

        debug!(
            "trend window of {} periods starting at '{}', average {}",
            recent.len(),
            first.label,
            avg_donated
        );
        Ok(Some(Trend {
            start: first.period,
            avg_donated,
            reference_sum,
            reference_period,
        }))
    }

    /// Projected cumulative donations at `period`, `None` on overflow.
    pub fn at(&self, period: i32) -> Option<Decimal> {
        self.avg_donated
            .checked_mul(Decimal::from(period) - self.reference_period)
            .and_then(|rise| self.reference_sum.checked_add(rise))
    }
}

/// Adds `sum_projected_donations` to every entry from the start of the trend
/// window onwards. Expects the output of [`crate::accumulate`].
pub fn project(entries: &[Entry], settings: &Settings) -> Result<Vec<Entry>> {
    debug_assert!(entries.windows(2).all(|w| w[0].period <= w[1].period));

    let trend = Trend::estimate(entries, settings.window, settings.anchor)?;
    if trend.is_none() && !entries.is_empty() {
        warn!("no donation-bearing periods, skipping projection");
    }

    entries
        .iter()
        .map(|entry| -> Result<Entry> {
            let projected = match trend.filter(|t| entry.period >= t.start) {
                Some(t) => Some(
                    t.at(entry.period)
                        .ok_or_else(|| overflow(entry, "sum_projected_donations"))?,
                ),
                None => None,
            };
            Ok(Entry {
                sum_projected_donations: projected,
                ..entry.clone()
            })
        })
        .collect()
}
