use rust_decimal::Decimal;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Year whose January is period 0.
pub const BASE_YEAR: i32 = 2000;

/// Number of trailing donation-bearing periods the trend is estimated from.
pub const WINDOW: usize = 3;

/// Decides which periods count as donation-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DonationRule {
    /// Only money actually received counts.
    #[default]
    Received,
    /// A pledge alone is enough.
    ReceivedOrPledged,
}

impl DonationRule {
    pub fn has_donation(&self, received: Decimal, pledged: Decimal) -> bool {
        match self {
            DonationRule::Received => received > Decimal::ZERO,
            DonationRule::ReceivedOrPledged => {
                received > Decimal::ZERO || pledged > Decimal::ZERO
            }
        }
    }
}

impl FromStr for DonationRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(DonationRule::Received),
            "received-or-pledged" => Ok(DonationRule::ReceivedOrPledged),
            other => Err(format!(
                "unknown donation rule '{other}', expected 'received' or 'received-or-pledged'"
            )),
        }
    }
}

/// Point the projected cumulative line is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Cumulative total and period of the window's first entry.
    #[default]
    WindowStart,
    /// Mean cumulative total and mean period across the window.
    WindowMean,
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Anchor::WindowStart),
            "mean" => Ok(Anchor::WindowMean),
            other => Err(format!("unknown anchor '{other}', expected 'start' or 'mean'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub base_year: i32,
    pub donation_rule: DonationRule,
    pub window: NonZeroUsize,
    pub anchor: Anchor,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_year: BASE_YEAR,
            donation_rule: DonationRule::default(),
            window: NonZeroUsize::new(WINDOW).unwrap_or(NonZeroUsize::MIN),
            anchor: Anchor::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn pledge_only_counts_when_asked() {
        assert!(!DonationRule::Received.has_donation(dec!(0), dec!(50)));
        assert!(DonationRule::ReceivedOrPledged.has_donation(dec!(0), dec!(50)));
        assert!(DonationRule::Received.has_donation(dec!(1), dec!(0)));
        assert!(!DonationRule::ReceivedOrPledged.has_donation(dec!(0), dec!(0)));
    }

    #[test]
    fn parse_policies() {
        assert_eq!("mean".parse::<Anchor>(), Ok(Anchor::WindowMean));
        assert_eq!("start".parse::<Anchor>(), Ok(Anchor::WindowStart));
        assert_eq!(
            "received-or-pledged".parse::<DonationRule>(),
            Ok(DonationRule::ReceivedOrPledged)
        );
        assert!("median".parse::<Anchor>().is_err());
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.window.get(), 3);
        assert_eq!(settings.base_year, 2000);
        assert_eq!(settings.anchor, Anchor::WindowStart);
        assert_eq!(settings.donation_rule, DonationRule::Received);
    }
}
