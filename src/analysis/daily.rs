use getset::Getters;

use super::{sum_settled_by, ChartData};
use crate::bill::transaction::Transaction;
use crate::bill::ParseError;
use crate::config::DayOrder;

/// Whole-unit spend per calendar day, as two parallel sequences.
#[derive(Debug, Clone, Default, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct DailySpendSeries {
    days: Vec<String>,
    totals: Vec<i64>,
}

impl DailySpendSeries {
    pub fn from_transactions(transactions: &[Transaction], order: DayOrder) -> Result<DailySpendSeries, ParseError> {
        let mut sums = sum_settled_by(transactions, Transaction::deal_date)?;

        if order == DayOrder::Chronological {
            // Dates are ISO formatted, so lexical order is chronological.
            sums.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let (days, totals) = sums.into_iter().unzip();
        Ok(DailySpendSeries { days, totals })
    }
}

impl ChartData for DailySpendSeries {
    fn arguments(&self) -> Result<Vec<String>, serde_json::Error> {
        Ok(vec![
            serde_json::to_string(&self.days)?,
            serde_json::to_string(&self.totals)?,
        ])
    }
}
