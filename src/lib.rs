pub mod classify;
pub mod config;
pub mod docs;
pub mod entry;
pub mod money;
pub mod projection;
pub mod report;
pub mod schedule;

use anyhow::{Context, Error, Result};
use entry::{CashFlowEntry, Entry, raw};
use futures::stream::{TryStream, TryStreamExt};
use money::Money;
use projection::{Projection, project};
use schedule::Window;
use std::borrow::ToOwned;
use std::convert::TryInto;
use tracing::{debug, info};

/// Source of cash flow entries: a file, a directory of files, or stdin.
pub struct Ledger {
    path: Option<String>,
}

impl Ledger {
    pub fn new(path: Option<&str>) -> Self {
        Ledger {
            path: path.map(ToOwned::to_owned),
        }
    }

    pub fn entries(&self) -> impl TryStream<Ok = Entry, Error = Error> + use<> {
        docs::documents(self.path.clone())
            .map_err(Error::new) // map to anyhow::Error from here on
            .and_then(|doc: String| async move {
                let raw_entry: raw::Entry = serde_yaml::from_str(doc.as_str())
                    .with_context(|| format!("Failed to deserialize entry:\n{}", doc))?;
                let entry: Entry = raw_entry.try_into()?;
                anyhow::Ok(entry)
            })
    }

    /// Every concrete entry dated inside the window, in date order.
    pub async fn occurrences(&self, window: &Window) -> Result<Vec<CashFlowEntry>> {
        let entries: Vec<Entry> = self.entries().try_collect().await?;
        let mut occurrences: Vec<CashFlowEntry> = entries
            .iter()
            .flat_map(|entry| entry.occurrences(window.from, window.until()))
            .collect();
        // stable, so entries on the same day keep source order
        occurrences.sort_by_key(|entry| entry.date);
        debug!(
            entries = entries.len(),
            occurrences = occurrences.len(),
            from = %window.from,
            until = %window.until(),
            "expanded entries"
        );
        Ok(occurrences)
    }

    pub async fn forecast(&self, window: &Window, opening_balance: Money) -> Result<Projection> {
        let occurrences = self.occurrences(window).await?;
        let projection = project(schedule::days(occurrences, window), opening_balance);
        info!(
            days = projection.schedule.len(),
            ending_balance = %projection.ending_balance,
            critical_days = classify::critical_days(&projection).count(),
            "projected cash flow"
        );
        Ok(projection)
    }
}
