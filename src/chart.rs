use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::io;

use crate::entry::Entry;
use crate::error::Result;

/// Anything that turns the processed entries into a chart.
pub trait Renderer {
    fn render(&mut self, entries: &[Entry]) -> Result<()>;
}

/// Which of the two charts a feed is shaped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Stacked received/pledged bars against the monthly need.
    Monthly,
    /// Running totals with the projected donation line.
    Cumulative,
}

fn amount(value: Decimal) -> String {
    value.round_dp(2).normalize().to_string()
}

struct MonthlyPoint<'a>(&'a Entry);

impl Serialize for MonthlyPoint<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entry = self.0;
        let mut state = serializer.serialize_struct("MonthlyPoint", 7)?;
        state.serialize_field("period", &entry.period)?;
        state.serialize_field("label", &entry.label)?;
        state.serialize_field("donors", &entry.donors)?;
        state.serialize_field("received", &amount(entry.received))?;
        state.serialize_field("pledged", &amount(entry.pledged))?;
        state.serialize_field("donated", &amount(entry.donated))?;
        state.serialize_field("needed", &amount(entry.needed))?;
        state.end()
    }
}

struct CumulativePoint<'a>(&'a Entry);

impl Serialize for CumulativePoint<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let entry = self.0;
        let mut state = serializer.serialize_struct("CumulativePoint", 6)?;
        state.serialize_field("period", &entry.period)?;
        state.serialize_field("label", &entry.label)?;
        state.serialize_field("sum_donated", &amount(entry.sum_donated))?;
        state.serialize_field("sum_needed", &amount(entry.sum_needed))?;
        state.serialize_field(
            "sum_projected_donations",
            &entry.sum_projected_donations.map(amount),
        )?;
        state.serialize_field("has_donation", &entry.has_donation)?;
        state.end()
    }
}

/// Writes the entries as CSV, one row per period, for an external plotter.
pub struct CsvFeed<W: io::Write> {
    kind: ChartKind,
    target: W,
}

impl<W: io::Write> CsvFeed<W> {
    pub fn new(kind: ChartKind, target: W) -> Self {
        CsvFeed { kind, target }
    }

    pub fn into_inner(self) -> W {
        self.target
    }
}

impl<W: io::Write> Renderer for CsvFeed<W> {
    fn render(&mut self, entries: &[Entry]) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(&mut self.target);
        for entry in entries {
            match self.kind {
                ChartKind::Monthly => writer.serialize(MonthlyPoint(entry))?,
                ChartKind::Cumulative => writer.serialize(CumulativePoint(entry))?,
            }
        }
        writer.flush()?;
        Ok(())
    }
}

/// How far the projected total at the last period falls short of the
/// cumulative need. `None` when on track or when nothing was projected.
pub fn shortfall(entries: &[Entry]) -> Option<Decimal> {
    let last = entries.last()?;
    let projected = last.sum_projected_donations?;
    if projected < last.sum_needed {
        last.sum_needed.checked_sub(projected)
    } else {
        None
    }
}
