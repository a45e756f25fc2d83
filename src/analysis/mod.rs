use std::collections::HashMap;

use enum_dispatch::enum_dispatch;
use log::debug;

pub mod daily;
pub mod ranking;

#[cfg(test)]
mod analysis_tests;

use daily::DailySpendSeries;
use ranking::CounterpartyRanking;

use crate::bill::transaction::Transaction;
use crate::bill::ParseError;

pub const EXPENSE_MARKER: &str = "支出";
pub const SUCCEEDED_MARKER: &str = "支付成功";

/// Only outflows whose payment went through count towards spend.
pub fn is_settled_expense(tx: &Transaction) -> bool {
    tx.income_or_pay() == EXPENSE_MARKER && tx.status() == SUCCEEDED_MARKER
}

/// Sums the rounded price of every settled expense per key.
///
/// Keys come back in the order they were first seen.
pub(crate) fn sum_settled_by<'a, I, F>(transactions: I, key_of: F) -> Result<Vec<(String, i64)>, ParseError>
where
    I: IntoIterator<Item = &'a Transaction>,
    F: Fn(&'a Transaction) -> Result<&'a str, ParseError>,
{
    let (sums, _) = transactions
        .into_iter()
        .filter(|tx| {
            let settled = is_settled_expense(tx);
            if !settled {
                debug!("row {} is not a settled expense, skipped", tx.row());
            }
            settled
        })
        .try_fold(
            (Vec::<(String, i64)>::new(), HashMap::<String, usize>::new()),
            |(mut sums, mut index), tx| {
                let key = key_of(tx)?;
                let amount = tx.rounded_price()?;

                match index.get(key) {
                    Some(&slot) => {
                        sums[slot].1 = sums[slot]
                            .1
                            .checked_add(amount)
                            .ok_or(ParseError::SumOverflow { row: tx.row() })?;
                    },
                    None => {
                        index.insert(key.to_string(), sums.len());
                        sums.push((key.to_string(), amount));
                    },
                }

                Ok::<_, ParseError>((sums, index))
            },
        )?;

    Ok(sums)
}

/// Data behind one chart of the report.
#[enum_dispatch]
pub trait ChartData {
    /// Values for the chart template's `${0}`, `${1}`, ... placeholders, in order.
    fn arguments(&self) -> Result<Vec<String>, serde_json::Error>;
}

#[enum_dispatch(ChartData)]
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    DailySpendSeries,
    CounterpartyRanking,
}
