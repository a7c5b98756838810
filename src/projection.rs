use crate::entry::CashFlowEntry;
use crate::money::Money;
use chrono::NaiveDate;
use num_traits::Zero;
use serde::Serialize;

/// The entries falling on one calendar day, as handed to [`project`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Day {
    pub date: NaiveDate,
    pub inflows: Vec<CashFlowEntry>,
    pub outflows: Vec<CashFlowEntry>,
}

impl Day {
    pub fn new(date: NaiveDate) -> Self {
        Day {
            date,
            inflows: Vec::new(),
            outflows: Vec::new(),
        }
    }

    /// Files the entry under inflows or outflows by its direction.
    pub fn push(&mut self, entry: CashFlowEntry) {
        if entry.is_inflow() {
            self.inflows.push(entry)
        } else {
            self.outflows.push(entry)
        }
    }
}

/// One projected day: the day's entries plus the figures derived from them.
/// `running_balance` is the balance after this day's flows are applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub inflows: Vec<CashFlowEntry>,
    pub outflows: Vec<CashFlowEntry>,
    pub inflow_total: Money,
    pub outflow_total: Money,
    pub net_flow: Money,
    pub running_balance: Money,
}

impl DaySchedule {
    fn after(day: Day, previous_balance: Money) -> Self {
        let Day {
            date,
            inflows,
            outflows,
        } = day;
        let inflow_total: Money = inflows.iter().map(|e| e.amount).sum();
        let outflow_total: Money = outflows.iter().map(|e| e.amount).sum();
        let net_flow = inflow_total - outflow_total;
        let running_balance = previous_balance + net_flow;
        DaySchedule {
            date,
            inflows,
            outflows,
            inflow_total,
            outflow_total,
            net_flow,
            running_balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub starting_balance: Money,
    pub schedule: Vec<DaySchedule>,
    pub total_inflows: Money,
    pub total_outflows: Money,
    pub ending_balance: Money,
}

impl Projection {
    pub fn net_position(&self) -> Money {
        self.total_inflows - self.total_outflows
    }
}

/// Folds `days` left to right into a running balance starting at `starting_balance`.
///
/// Days are taken in the order given and never sorted, each balance depends on the one
/// before it. Every entry counts toward the totals whether confirmed or not, and amounts
/// are not checked for sign.
///
/// Panics if a sum overflows `Decimal`, as `Money` addition does.
pub fn project(days: impl IntoIterator<Item = Day>, starting_balance: Money) -> Projection {
    let schedule: Vec<DaySchedule> = days
        .into_iter()
        .scan(starting_balance, |balance, day| {
            let scheduled = DaySchedule::after(day, *balance);
            *balance = scheduled.running_balance;
            Some(scheduled)
        })
        .collect();
    let (total_inflows, total_outflows) = schedule.iter().fold(
        (Money::zero(), Money::zero()),
        |(mut inflows, mut outflows), day| {
            inflows += day.inflow_total;
            outflows += day.outflow_total;
            (inflows, outflows)
        },
    );
    let ending_balance = schedule
        .last()
        .map_or(starting_balance, |day| day.running_balance);
    Projection {
        starting_balance,
        schedule,
        total_inflows,
        total_outflows,
        ending_balance,
    }
}
