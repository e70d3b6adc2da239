use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use crate::entry::{period_label, period_of, Entry};
use crate::error::{Error, Result};
use crate::settings::Settings;

/// One period as it appears in the source table, before any typing.
///
/// Either `received`/`pledged` or the older single `donated` column may be
/// present. `donated` is only read when a row has neither `received` nor
/// `pledged`; [`crate::read_rows`] clears it for tables whose header carries
/// the split columns, so one file never mixes both schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRow {
    pub month: String,
    #[serde(default)]
    pub donors: Option<String>,
    #[serde(default)]
    pub received: Option<String>,
    #[serde(default)]
    pub pledged: Option<String>,
    #[serde(default)]
    pub donated: Option<String>,
    #[serde(default)]
    pub needed: Option<String>,
}

impl RawRow {
    pub fn new(month: &str, donors: &str, received: &str, pledged: &str, needed: &str) -> Self {
        RawRow {
            month: month.to_string(),
            donors: Some(donors.to_string()),
            received: Some(received.to_string()),
            pledged: Some(pledged.to_string()),
            donated: None,
            needed: Some(needed.to_string()),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_month(row: usize, value: &str) -> Result<(i32, u32)> {
    let invalid = || Error::InvalidMonth {
        row,
        value: value.to_string(),
    };
    let trimmed = value.trim();
    let bytes = trimmed.as_bytes();
    let well_formed = bytes.len() == 7
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5..].iter().all(u8::is_ascii_digit);
    if !well_formed {
        return Err(invalid());
    }
    let date = NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d")
        .map_err(|_| invalid())?;
    Ok((date.year(), date.month()))
}

fn parse_amount(row: usize, field: &'static str, value: Option<&str>) -> Result<Decimal> {
    let Some(value) = value else {
        return Ok(Decimal::ZERO);
    };
    let amount = Decimal::from_str(value).map_err(|_| Error::InvalidNumber {
        row,
        field,
        value: value.to_string(),
    })?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::NegativeAmount {
            row,
            field,
            value: amount,
        });
    }
    Ok(amount)
}

/// Turns one raw row into an [`Entry`] without cumulative or projected values.
///
/// `row` is the 1-based position used in error messages.
pub fn parse_row(row: usize, raw: &RawRow, settings: &Settings) -> Result<Entry> {
    let (year, month) = parse_month(row, &raw.month)?;

    let donors = match present(&raw.donors) {
        Some(value) => value.parse::<u32>().map_err(|_| Error::InvalidNumber {
            row,
            field: "donors",
            value: value.to_string(),
        })?,
        None => 0,
    };

    let (received, pledged) = if raw.received.is_none() && raw.pledged.is_none() {
        // single-amount schema
        (
            parse_amount(row, "donated", present(&raw.donated))?,
            Decimal::ZERO,
        )
    } else {
        (
            parse_amount(row, "received", present(&raw.received))?,
            parse_amount(row, "pledged", present(&raw.pledged))?,
        )
    };

    let needed = match present(&raw.needed) {
        Some(value) => parse_amount(row, "needed", Some(value))?,
        None => return Err(Error::MissingField { row, field: "needed" }),
    };

    let period = period_of(year, month, settings.base_year).ok_or_else(|| {
        Error::PeriodOutOfRange {
            row,
            value: raw.month.clone(),
            base_year: settings.base_year,
        }
    })?;
    let label = period_label(year, month);
    let donated = received.checked_add(pledged).ok_or_else(|| Error::Overflow {
        period,
        label: label.clone(),
        field: "donated",
    })?;

    let entry = Entry {
        period,
        label,
        donors,
        received,
        pledged,
        donated,
        needed,
        has_donation: settings.donation_rule.has_donation(received, pledged),
        sum_donated: Decimal::ZERO,
        sum_needed: Decimal::ZERO,
        sum_projected_donations: None,
    };
    debug!("row {row}: {} -> period {}", raw.month.trim(), entry.period);
    Ok(entry)
}
