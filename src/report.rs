use crate::classify::{CRITICAL_BELOW, Tier, classify, critical_days};
use crate::entry::CashFlowEntry;
use crate::money::Money;
use crate::projection::{DaySchedule, Projection};
use serde::Serialize;
use std::fmt;

const AMT_PAD: usize = 12;
const LABEL_PAD: usize = 16;

impl DaySchedule {
    pub fn to_row_string(&self, pad: usize) -> String {
        let tier = classify(self.running_balance);
        let marker = if tier.is_alert() { " !" } else { "" };
        format!(
            "{} | {:>pad$} | {:>pad$} | {:>pad$} | {:>pad$} | {}{}",
            self.date,
            self.inflow_total,
            self.outflow_total,
            self.net_flow,
            self.running_balance,
            tier,
            marker
        )
    }
}

fn header_row(pad: usize) -> String {
    format!(
        "{:10} | {:>pad$} | {:>pad$} | {:>pad$} | {:>pad$} | {}",
        "Date", "Inflows", "Outflows", "Net", "Balance", "Status"
    )
}

fn entry_row(entry: &CashFlowEntry, pad: usize) -> String {
    let sign = if entry.is_inflow() { '+' } else { '-' };
    let badge = if entry.confirmed { "" } else { " [Expected]" };
    format!(
        "  {} {:>pad$}  {}{}",
        sign, entry.amount, entry.description, badge
    )
}

fn write_summary(f: &mut fmt::Formatter<'_>, projection: &Projection) -> fmt::Result {
    let lines = [
        ("Opening Balance", projection.starting_balance),
        ("Total Inflows", projection.total_inflows),
        ("Total Outflows", projection.total_outflows),
        ("Net Position", projection.net_position()),
        ("Ending Balance", projection.ending_balance),
    ];
    for (label, amount) in lines {
        writeln!(f, "{:LABEL_PAD$}{:>AMT_PAD$}", label, amount)?;
    }
    for day in critical_days(projection) {
        writeln!(
            f,
            "ALERT {} balance {} is below {}",
            day.date,
            day.running_balance,
            Money::from(CRITICAL_BELOW)
        )?;
    }
    Ok(())
}

/// Table of days followed by the summary strip and any alerts.
impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", header_row(AMT_PAD))?;
        for day in &self.schedule {
            writeln!(f, "{}", day.to_row_string(AMT_PAD))?;
        }
        writeln!(f)?;
        write_summary(f, self)
    }
}

/// Day by day listing of every entry behind a projection.
pub struct Detail<'a>(pub &'a Projection);

impl fmt::Display for Detail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for day in &self.0.schedule {
            let tier = classify(day.running_balance);
            let marker = if tier.is_alert() { " !" } else { "" };
            writeln!(
                f,
                "{} | balance {} | {}{}",
                day.date, day.running_balance, tier, marker
            )?;
            if day.inflows.is_empty() && day.outflows.is_empty() {
                writeln!(f, "  (no movements)")?;
            }
            for entry in day.inflows.iter().chain(day.outflows.iter()) {
                writeln!(f, "{}", entry_row(entry, AMT_PAD))?;
            }
        }
        writeln!(f)?;
        write_summary(f, self.0)
    }
}

#[derive(Serialize)]
struct DayView<'a> {
    #[serde(flatten)]
    day: &'a DaySchedule,
    tier: Tier,
}

/// Serializable view of a projection with each day's tier alongside its balance.
#[derive(Serialize)]
pub struct Json<'a> {
    starting_balance: Money,
    schedule: Vec<DayView<'a>>,
    total_inflows: Money,
    total_outflows: Money,
    ending_balance: Money,
}

impl<'a> From<&'a Projection> for Json<'a> {
    fn from(projection: &'a Projection) -> Self {
        Json {
            starting_balance: projection.starting_balance,
            schedule: projection
                .schedule
                .iter()
                .map(|day| DayView {
                    day,
                    tier: classify(day.running_balance),
                })
                .collect(),
            total_inflows: projection.total_inflows,
            total_outflows: projection.total_outflows,
            ending_balance: projection.ending_balance,
        }
    }
}

#[cfg(test)]
mod report_tests {
    use super::*;
    use crate::projection::{Day, project};
    use anyhow::Result;
    use chrono::NaiveDate;
    use indoc::indoc;

    fn week() -> Result<Vec<Day>> {
        let d1: NaiveDate = "2025-01-06".parse()?;
        let d2: NaiveDate = "2025-01-07".parse()?;
        let mut day1 = Day::new(d1);
        day1.push(
            CashFlowEntry::inflow(d1, "INV-2025-001 - Lion Group", Money::from(245_000)).expected(),
        );
        day1.push(CashFlowEntry::inflow(d1, "INV-2025-002", Money::from(125_000)));
        day1.push(CashFlowEntry::outflow(d1, "Steel coil", Money::from(85_000)));
        day1.push(CashFlowEntry::outflow(d1, "Payroll", Money::from(92_000)));
        let mut day2 = Day::new(d2);
        day2.push(CashFlowEntry::inflow(d2, "INV-2025-003", Money::from(167_000)));
        day2.push(CashFlowEntry::outflow(d2, "Utilities", Money::from(45_000)));
        Ok(vec![day1, day2])
    }

    #[test]
    fn table() -> Result<()> {
        let projection = project(week()?, Money::from(450_000));
        assert_eq!(
            projection.to_string(),
            indoc! {"
                Date       |      Inflows |     Outflows |          Net |      Balance | Status
                2025-01-06 |   $370000.00 |   $177000.00 |   $193000.00 |   $643000.00 | Healthy
                2025-01-07 |   $167000.00 |    $45000.00 |   $122000.00 |   $765000.00 | Healthy

                Opening Balance   $450000.00
                Total Inflows     $537000.00
                Total Outflows    $222000.00
                Net Position      $315000.00
                Ending Balance    $765000.00
            "}
        );
        Ok(())
    }

    #[test]
    fn alerts() -> Result<()> {
        let projection = project(week()?, Money::from(-103_000));
        let table = projection.to_string();
        assert!(table.contains("2025-01-06 |   $370000.00 |   $177000.00 |   $193000.00 |    $90000.00 | Critical !\n"));
        assert!(table.contains("$212000.00 | Healthy\n"));
        assert!(table.contains("Opening Balance ($103000.00)\n"));
        assert!(table.contains("ALERT 2025-01-06 balance $90000.00 is below $100000.00\n"));
        assert!(!table.contains("ALERT 2025-01-07"));
        Ok(())
    }

    #[test]
    fn detail() -> Result<()> {
        let mut days = week()?;
        days.push(Day::new("2025-01-08".parse()?));
        let projection = project(days, Money::from(450_000));
        let detail = Detail(&projection).to_string();
        assert!(detail.starts_with(indoc! {"
            2025-01-06 | balance $643000.00 | Healthy
              +   $245000.00  INV-2025-001 - Lion Group [Expected]
              +   $125000.00  INV-2025-002
              -    $85000.00  Steel coil
              -    $92000.00  Payroll
            2025-01-07 | balance $765000.00 | Healthy
        "}));
        assert!(detail.contains("2025-01-08 | balance $765000.00 | Healthy\n  (no movements)\n"));
        assert!(detail.contains("Ending Balance    $765000.00\n"));
        Ok(())
    }

    #[test]
    fn json() -> Result<()> {
        let projection = project(week()?, Money::from(450_000));
        let json: serde_json::Value = serde_json::to_value(Json::from(&projection))?;
        assert_eq!(json["ending_balance"], "765000");
        assert_eq!(json["schedule"][0]["running_balance"], "643000");
        assert_eq!(json["schedule"][0]["tier"], "Healthy");
        assert_eq!(json["schedule"][0]["inflows"][0]["confirmed"], false);
        assert_eq!(json["schedule"][1]["date"], "2025-01-07");
        Ok(())
    }

    #[test]
    fn json_tiers_follow_balance() -> Result<()> {
        let projection = project(week()?, Money::from(-103_000));
        let json: serde_json::Value = serde_json::to_value(Json::from(&projection))?;
        assert_eq!(json["starting_balance"], "-103000");
        assert_eq!(json["schedule"][0]["tier"], "Critical");
        assert_eq!(json["schedule"][1]["tier"], "Healthy");
        assert!(serde_json::to_value(&projection)?["schedule"][0].get("tier").is_none());
        Ok(())
    }
}
