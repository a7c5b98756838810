pub mod raw;

use crate::money::Money;
use anyhow::{Context, Error, Result, bail};
use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use rrule::RRuleSet;
use serde::Serialize;
use std::convert::TryFrom;
use std::fmt;
use std::iter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Inflow,
    Outflow,
}

impl Direction {
    /// Maps an entry `type` onto the way the money moves.
    fn from_type(r#type: &str) -> Result<Self> {
        match r#type {
            "Inflow" | "Payment Received" | "Sales Invoice" => Ok(Direction::Inflow),
            "Outflow" | "Payment Sent" | "Purchase Invoice" | "Payroll" => Ok(Direction::Outflow),
            _ => bail!("{} not a valid entry type", r#type),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inflow => f.pad("Inflow"),
            Direction::Outflow => f.pad("Outflow"),
        }
    }
}

/// A single movement of money on a definite date.
///
/// `amount` is expected to be non-negative, `direction` alone decides whether it adds
/// to or subtracts from a balance. `confirmed` is informational only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowEntry {
    pub id: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub direction: Direction,
    pub confirmed: bool,
}

impl CashFlowEntry {
    pub fn new(
        date: NaiveDate,
        description: &str,
        amount: Money,
        direction: Direction,
        confirmed: bool,
    ) -> Self {
        CashFlowEntry {
            id: format!("{}-{}-{}", date, direction, description),
            date,
            description: description.to_owned(),
            amount,
            direction,
            confirmed,
        }
    }

    pub fn inflow(date: NaiveDate, description: &str, amount: Money) -> Self {
        Self::new(date, description, amount, Direction::Inflow, true)
    }

    pub fn outflow(date: NaiveDate, description: &str, amount: Money) -> Self {
        Self::new(date, description, amount, Direction::Outflow, true)
    }

    /// Marks the entry as forecast rather than committed.
    pub fn expected(mut self) -> Self {
        self.confirmed = false;
        self
    }

    pub fn is_inflow(&self) -> bool {
        self.direction == Direction::Inflow
    }
}

impl From<&CashFlowEntry> for raw::Entry {
    fn from(entry: &CashFlowEntry) -> Self {
        raw::Entry {
            id: Some(entry.id.clone()),
            r#type: entry.direction.to_string(),
            date: entry.date.to_string(),
            description: entry.description.clone(),
            amount: Some(entry.amount),
            confirmed: entry.confirmed,
            ..Default::default()
        }
    }
}

/// This is a fully valid entry as read from the source documents.
/// A repeating entry produces one `CashFlowEntry` per occurrence.
#[derive(Debug, Clone)]
pub struct Entry {
    id: String,
    date: EntryDate,
    description: String,
    amount: Money,
    direction: Direction,
    confirmed: bool,
}

#[derive(Debug, Clone)]
enum EntryDate {
    SingleDate(NaiveDate),
    Recurring {
        rule: RRuleSet,
        end: Option<NaiveDate>,
    },
}

impl EntryDate {
    fn iter(&self) -> Box<dyn Iterator<Item = NaiveDate> + '_> {
        match self {
            EntryDate::SingleDate(date) => Box::new(iter::once(*date)),
            EntryDate::Recurring { rule, end } => {
                let end = *end;
                Box::new(
                    rule.into_iter()
                        .map(|d| d.date_naive())
                        .take_while(move |d| end.is_none_or(|end| *d <= end)),
                )
            }
        }
    }
}

/// Builds the recurrence for `repeat` starting on `date`.
/// `monthly` keeps the day of month of the first date, or the last day of shorter months.
fn rrule_set(date: NaiveDate, repeat: &str) -> Result<RRuleSet> {
    let rule = match repeat.trim().to_uppercase().as_str() {
        "DAILY" => "FREQ=DAILY".to_owned(),
        "WEEKLY" => "FREQ=WEEKLY".to_owned(),
        "MONTHLY" if date.day() > 28 => {
            let days = (28..=date.day()).map(|d| d.to_string()).join(",");
            format!("FREQ=MONTHLY;BYMONTHDAY={};BYSETPOS=-1", days)
        }
        "MONTHLY" => format!("FREQ=MONTHLY;BYMONTHDAY={}", date.day()),
        full if full.contains("DTSTART") => {
            return repeat
                .trim()
                .parse()
                .with_context(|| format!("Invalid repeat rule '{}'", repeat));
        }
        body => body.trim_start_matches("RRULE:").to_owned(),
    };
    format!("DTSTART:{}T000000Z\nRRULE:{}", date.format("%Y%m%d"), rule)
        .parse()
        .with_context(|| format!("Invalid repeat rule '{}'", repeat))
}

impl Entry {
    pub fn id(&self) -> String {
        self.id.clone()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self.date, EntryDate::Recurring { .. })
    }

    /// Concrete entries dated within `from..=until`.
    pub fn occurrences(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> impl Iterator<Item = CashFlowEntry> + '_ {
        self.date
            .iter()
            .skip_while(move |d| *d < from)
            .take_while(move |d| *d <= until)
            .map(move |date| self.on(date))
    }

    fn on(&self, date: NaiveDate) -> CashFlowEntry {
        let id = if self.is_recurring() {
            format!("{}@{}", self.id, date)
        } else {
            self.id.clone()
        };
        CashFlowEntry {
            id,
            date,
            description: self.description.clone(),
            amount: self.amount,
            direction: self.direction,
            confirmed: self.confirmed,
        }
    }
}

impl TryFrom<raw::Entry> for Entry {
    type Error = Error;

    fn try_from(
        raw::Entry {
            id,
            r#type,
            date,
            description,
            amount,
            confirmed,
            repeat,
            end,
        }: raw::Entry,
    ) -> Result<Self> {
        let date: NaiveDate = date
            .parse()
            .with_context(|| format!("Invalid date '{}' for entry '{}'", date, description))?;
        let id = id.unwrap_or_else(|| format!("{}-{}-{}", date, r#type, description));
        let direction = Direction::from_type(&r#type).with_context(|| format!("In entry {}", id))?;
        let amount = amount.with_context(|| format!("Amount required for entry {}", id))?;
        let end: Option<NaiveDate> = end
            .map(|s| s.parse())
            .transpose()
            .with_context(|| format!("Invalid end date for entry {}", id))?;
        let date = match (repeat, end) {
            (None, None) => EntryDate::SingleDate(date),
            (None, Some(_)) => bail!("End given without repeat in entry {}", id),
            (Some(repeat), end) => EntryDate::Recurring {
                rule: rrule_set(date, &repeat).with_context(|| format!("In entry {}", id))?,
                end,
            },
        };
        Ok(Entry {
            id,
            date,
            description,
            amount,
            direction,
            confirmed,
        })
    }
}
