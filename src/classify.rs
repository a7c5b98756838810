use crate::money::Money;
use crate::projection::{DaySchedule, Projection};
use serde::Serialize;
use std::fmt;

/// Balances below this are critical.
pub const CRITICAL_BELOW: i64 = 100_000;
/// Balances below this, and not critical, are on watch.
pub const WATCH_BELOW: i64 = 200_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    Critical,
    Watch,
    Healthy,
}

impl Tier {
    /// Critical balances are flagged next to the figure.
    pub fn is_alert(&self) -> bool {
        *self == Tier::Critical
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Critical => f.pad("Critical"),
            Tier::Watch => f.pad("Watch"),
            Tier::Healthy => f.pad("Healthy"),
        }
    }
}

pub fn classify(balance: Money) -> Tier {
    if balance < Money::from(CRITICAL_BELOW) {
        Tier::Critical
    } else if balance < Money::from(WATCH_BELOW) {
        Tier::Watch
    } else {
        Tier::Healthy
    }
}

/// Days of a projection whose running balance is critical, in schedule order.
pub fn critical_days(projection: &Projection) -> impl Iterator<Item = &DaySchedule> {
    projection
        .schedule
        .iter()
        .filter(|day| classify(day.running_balance).is_alert())
}

pub fn has_critical(projection: &Projection) -> bool {
    critical_days(projection).next().is_some()
}

#[cfg(test)]
mod classify_tests {
    use super::*;
    use crate::entry::CashFlowEntry;
    use crate::projection::{Day, project};
    use anyhow::Result;
    use chrono::NaiveDate;
    use itertools::Itertools;

    #[test]
    fn boundaries() {
        assert_eq!(classify(Money::from(99_999)), Tier::Critical);
        assert_eq!(classify(Money::from(100_000)), Tier::Watch);
        assert_eq!(classify(Money::from(199_999)), Tier::Watch);
        assert_eq!(classify(Money::from(200_000)), Tier::Healthy);
    }

    #[test]
    fn fractions_and_negatives() -> Result<()> {
        assert_eq!(classify("99999.99".parse()?), Tier::Critical);
        assert_eq!(classify("199999.999".parse()?), Tier::Watch);
        assert_eq!(classify(Money::from(-5)), Tier::Critical);
        assert_eq!(classify(Money::from(765_000)), Tier::Healthy);
        Ok(())
    }

    #[test]
    fn only_critical_alerts() {
        assert!(Tier::Critical.is_alert());
        assert!(!Tier::Watch.is_alert());
        assert!(!Tier::Healthy.is_alert());
    }

    #[test]
    fn tiers_follow_running_balance() -> Result<()> {
        let flows = [
            ("2025-01-06", 0, 300_000),
            ("2025-01-07", 0, 60_000),
            ("2025-01-08", 500_000, 0),
        ];
        let mut days = Vec::new();
        for (d, inflow, outflow) in flows {
            let date: NaiveDate = d.parse()?;
            let mut day = Day::new(date);
            day.push(CashFlowEntry::inflow(date, "in", Money::from(inflow)));
            day.push(CashFlowEntry::outflow(date, "out", Money::from(outflow)));
            days.push(day);
        }
        let projection = project(days, Money::from(450_000));
        let tiers = projection
            .schedule
            .iter()
            .map(|day| classify(day.running_balance))
            .collect_vec();
        assert_eq!(tiers, vec![Tier::Watch, Tier::Critical, Tier::Healthy]);
        assert!(has_critical(&projection));
        assert_eq!(
            critical_days(&projection).map(|day| day.date).collect_vec(),
            vec!["2025-01-07".parse::<NaiveDate>()?]
        );
        Ok(())
    }

    #[test]
    fn empty_schedule_has_no_critical_days() {
        let projection = project(Vec::new(), Money::from(50_000));
        assert!(!has_critical(&projection));
    }
}
