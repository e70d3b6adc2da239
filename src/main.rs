use clap::{Parser, ValueEnum};
use log::{error, info};
use std::fs::File;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use trend::{Anchor, ChartKind, CsvFeed, DonationRule, Renderer, Settings};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Chart {
    Monthly,
    Cumulative,
}

impl From<Chart> for ChartKind {
    fn from(chart: Chart) -> Self {
        match chart {
            Chart::Monthly => ChartKind::Monthly,
            Chart::Cumulative => ChartKind::Cumulative,
        }
    }
}

/// Builds a donation chart feed from a monthly activity table.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// CSV with month, donors, received, pledged (or donated) and needed columns
    input: PathBuf,

    #[arg(long, value_enum, default_value_t = Chart::Cumulative)]
    chart: Chart,

    /// Number of recent donation-bearing months the trend is estimated from
    #[arg(long, default_value_t = NonZeroUsize::new(trend::WINDOW).unwrap_or(NonZeroUsize::MIN))]
    window: NonZeroUsize,

    /// Where the projected line is pinned: `start` or `mean` of the window
    #[arg(long, default_value = "start")]
    anchor: Anchor,

    /// `received` or `received-or-pledged`
    #[arg(long, default_value = "received")]
    donation_rule: DonationRule,

    /// Year whose January is period 0
    #[arg(long, default_value_t = trend::BASE_YEAR, value_parser = clap::value_parser!(i32).range(0..=9999))]
    base_year: i32,
}

fn run(args: &Args) -> trend::Result<()> {
    let settings = Settings {
        base_year: args.base_year,
        donation_rule: args.donation_rule,
        window: args.window,
        anchor: args.anchor,
    };

    let rows = trend::read_rows(File::open(&args.input)?)?;
    let entries = trend::process(&rows, &settings)?;

    if let Some(gap) = trend::shortfall(&entries) {
        info!("projected donations fall short of need by {}", gap.round_dp(2));
    }

    let mut feed = CsvFeed::new(args.chart.into(), io::stdout().lock());
    feed.render(&entries)
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if !args.input.exists() {
        error!("File path does not exist: {}", args.input.display());
        std::process::exit(1);
    }

    if let Err(err) = run(&args) {
        error!("{err}");
        std::process::exit(1);
    }
}
