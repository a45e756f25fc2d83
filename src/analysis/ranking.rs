use getset::{CopyGetters, Getters};
use serde::Serialize;

use super::{sum_settled_by, ChartData};
use crate::bill::transaction::Transaction;
use crate::bill::ParseError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCounterparty {
    pub name: String,
    pub value: i64,
}

/// Counterparties ordered by total spend, largest first.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct CounterpartyRanking {
    #[getset(get = "pub")]
    entries: Vec<RankedCounterparty>,
    #[getset(get_copy = "pub")]
    limit: usize,
}

impl CounterpartyRanking {
    /// Ranks every counterparty; ties keep the order they were first seen in.
    pub fn from_transactions(transactions: &[Transaction], limit: usize) -> Result<CounterpartyRanking, ParseError> {
        let mut sums = sum_settled_by(transactions, |tx| Ok(tx.pay_for_name().trim()))?;
        sums.sort_by(|a, b| b.1.cmp(&a.1));

        let entries = sums
            .into_iter()
            .map(|(name, value)| RankedCounterparty { name, value })
            .collect();

        Ok(CounterpartyRanking { entries, limit })
    }

    /// The first `limit` entries.
    pub fn top(&self) -> &[RankedCounterparty] {
        &self.entries[..self.limit.min(self.entries.len())]
    }

    pub fn legend(&self) -> Vec<&str> {
        self.top().iter().map(|entry| entry.name.as_str()).collect()
    }
}

impl ChartData for CounterpartyRanking {
    fn arguments(&self) -> Result<Vec<String>, serde_json::Error> {
        Ok(vec![
            serde_json::to_string(&self.legend())?,
            serde_json::to_string(self.top())?,
        ])
    }
}
