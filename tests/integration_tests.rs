use rust_decimal_macros::dec;
use trend::{process, read_rows, Anchor, ChartKind, CsvFeed, DonationRule, Error, Renderer, Settings};

fn render(kind: ChartKind, input: &str, settings: &Settings) -> String {
    let rows = read_rows(input.as_bytes()).unwrap();
    let entries = process(&rows, settings).unwrap();

    let mut feed = CsvFeed::new(kind, Vec::new());
    feed.render(&entries).unwrap();
    String::from_utf8(feed.into_inner()).unwrap()
}

const ACTIVITY: &str = "\
month,donors,received,pledged,needed
2025-03,4,900,100,1000
2025-01,5,600,200,1000
2025-02,3,800,,1000
";

#[test]
fn sanity() {
    let output = render(ChartKind::Cumulative, ACTIVITY, &Settings::default());

    assert_eq!(
        output,
        "period,label,sum_donated,sum_needed,sum_projected_donations,has_donation\n\
         300,Jan 2025,800,1000,800,true\n\
         301,Feb,1600,2000,1666.67,true\n\
         302,Mar,2600,3000,2533.33,true\n"
    );
}

#[test]
fn monthly_chart() {
    let output = render(ChartKind::Monthly, ACTIVITY, &Settings::default());

    assert_eq!(
        output,
        "period,label,donors,received,pledged,donated,needed\n\
         300,Jan 2025,5,600,200,800,1000\n\
         301,Feb,3,800,0,800,1000\n\
         302,Mar,4,900,100,1000,1000\n"
    );
}

#[test]
fn legacy_donated_column() {
    let input = "\
month,donors,donated,needed
2024-12, 2, 250.00, 400
2025-01, 1, 0, 400
";
    let rows = read_rows(input.as_bytes()).unwrap();
    let entries = process(&rows, &Settings::default()).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].received, dec!(250));
    assert_eq!(entries[1].sum_donated, dec!(250));
    assert_eq!(entries[1].sum_needed, dec!(800));
    assert_eq!(entries[0].sum_projected_donations, Some(dec!(250)));
    assert_eq!(entries[1].sum_projected_donations, Some(dec!(500)));
}

#[test]
fn header_only_is_empty() {
    let output = render(ChartKind::Cumulative, "month,donors,received,pledged,needed\n", &Settings::default());
    assert!(output.is_empty());
}

#[test]
fn nothing_received_means_no_projection() {
    let input = "\
month,donors,received,pledged,needed
2025-01,0,0,0,500
";
    let output = render(ChartKind::Cumulative, input, &Settings::default());

    assert_eq!(
        output,
        "period,label,sum_donated,sum_needed,sum_projected_donations,has_donation\n\
         300,Jan 2025,0,500,,false\n"
    );
}

#[test]
fn pledges_can_open_the_window() {
    let input = "\
month,donors,received,pledged,needed
2025-05,1,0,0,100
2025-06,1,0,60,100
2025-07,2,90,0,100
";
    let default = process(&read_rows(input.as_bytes()).unwrap(), &Settings::default()).unwrap();
    assert_eq!(default[1].sum_projected_donations, None);
    assert_eq!(default[2].sum_projected_donations, Some(dec!(150)));

    let settings = Settings {
        donation_rule: DonationRule::ReceivedOrPledged,
        anchor: Anchor::WindowMean,
        ..Settings::default()
    };
    let any = process(&read_rows(input.as_bytes()).unwrap(), &settings).unwrap();
    assert_eq!(any[0].sum_projected_donations, None);
    // mean of 60 and 150 at the midpoint between Jun and Jul, rising 75 a month
    assert_eq!(any[1].sum_projected_donations, Some(dec!(67.5)));
    assert_eq!(any[2].sum_projected_donations, Some(dec!(142.5)));
}

#[test]
fn malformed_month_is_reported_with_its_row() {
    let input = "\
month,donors,received,pledged,needed
2025-01,1,10,0,100
2025-1x,1,10,0,100
";
    let rows = read_rows(input.as_bytes()).unwrap();
    let err = process(&rows, &Settings::default()).unwrap_err();

    assert!(matches!(err, Error::InvalidMonth { row: 2, .. }));
    assert_eq!(err.to_string(), "row 2: month '2025-1x' is not a valid YYYY-MM period");
}

#[test]
fn split_columns_win_over_donated_for_every_row() {
    let input = "\
month,received,pledged,donated,needed
2025-01,,,500,100
2025-02,10,,500,100
";
    let rows = read_rows(input.as_bytes()).unwrap();
    let entries = process(&rows, &Settings::default()).unwrap();

    assert_eq!(entries[0].donated, dec!(0));
    assert!(!entries[0].has_donation);
    assert_eq!(entries[1].donated, dec!(10));
    assert_eq!(entries[1].sum_donated, dec!(10));
}

#[test]
fn overflowing_amounts_are_reported() {
    let input = "\
month,donors,received,pledged,needed
2025-01,1,79228162514264337593543950335,0,1
2025-02,1,79228162514264337593543950335,0,1
";
    let rows = read_rows(input.as_bytes()).unwrap();
    let err = process(&rows, &Settings::default()).unwrap_err();

    assert!(matches!(err, Error::Overflow { period: 301, .. }));
    assert_eq!(
        err.to_string(),
        "amount overflow in 'sum_donated' at period 301 (Feb)"
    );
}
