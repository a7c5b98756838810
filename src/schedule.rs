use crate::entry::CashFlowEntry;
use crate::projection::Day;
use anyhow::{Result, bail};
use chrono::{Days, NaiveDate};
use itertools::Itertools;

/// A run of consecutive calendar days starting at `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub from: NaiveDate,
    pub days: u32,
}

impl Window {
    pub fn new(from: NaiveDate, days: u32) -> Result<Self> {
        if days == 0 {
            bail!("Forecast window must cover at least one day");
        }
        if from.checked_add_days(Days::new(u64::from(days))).is_none() {
            bail!("Forecast window starting {} is out of range", from);
        }
        Ok(Window { from, days })
    }

    /// Last day of the window, inclusive.
    pub fn until(&self) -> NaiveDate {
        self.from
            .checked_add_days(Days::new(u64::from(self.days.saturating_sub(1))))
            .unwrap_or(self.from)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.until()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.from.iter_days().take(self.days as usize)
    }
}

/// Lays entries out over every day of the window in calendar order, empty days included.
/// Entries outside the window are dropped, those sharing a day keep their given order.
pub fn days(entries: impl IntoIterator<Item = CashFlowEntry>, window: &Window) -> Vec<Day> {
    let mut by_date = entries
        .into_iter()
        .filter(|entry| window.contains(entry.date))
        .into_group_map_by(|entry| entry.date);
    window
        .dates()
        .map(|date| {
            let mut day = Day::new(date);
            by_date
                .remove(&date)
                .unwrap_or_default()
                .into_iter()
                .for_each(|entry| day.push(entry));
            day
        })
        .collect()
}
