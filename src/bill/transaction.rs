use std::str::FromStr;

use csv::StringRecord;
use getset::{CopyGetters, Getters};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::ParseError;

pub const CELL_COUNT: usize = 8;
pub const CURRENCY_GLYPH: char = '¥';

/// One ledger row from the transaction region.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Transaction {
    #[getset(get_copy = "pub")]
    row: usize,
    #[getset(get = "pub")]
    deal_time: String,
    #[getset(get = "pub")]
    deal_type: String,
    #[getset(get = "pub")]
    pay_for_name: String,
    #[getset(get = "pub")]
    name: String,
    #[getset(get = "pub")]
    income_or_pay: String,
    #[getset(get = "pub")]
    price: String,
    #[getset(get = "pub")]
    pay_method: String,
    #[getset(get = "pub")]
    status: String,
}

impl Transaction {
    /// Decodes the first eight cells of `record` in ledger column order.
    /// Cells past the eighth are ignored.
    pub fn from_record(row: usize, record: &StringRecord) -> Result<Transaction, ParseError> {
        if record.len() < CELL_COUNT {
            return Err(ParseError::ShortRow {
                row,
                expected: CELL_COUNT,
                found: record.len(),
            });
        }

        let cell = |idx: usize| record[idx].to_string();
        Ok(Transaction {
            row,
            deal_time: cell(0),
            deal_type: cell(1),
            pay_for_name: cell(2),
            name: cell(3),
            income_or_pay: cell(4),
            price: record[5].replace(CURRENCY_GLYPH, ""),
            pay_method: cell(6),
            status: cell(7),
        })
    }

    /// The date part of the deal time, i.e. everything before the first whitespace.
    pub fn deal_date(&self) -> Result<&str, ParseError> {
        self.deal_time
            .split_whitespace()
            .next()
            .ok_or_else(|| ParseError::MissingDate {
                row: self.row,
                deal_time: self.deal_time.clone(),
            })
    }

    /// The price rounded by [`round_to_units`].
    pub fn rounded_price(&self) -> Result<i64, ParseError> {
        let invalid = || ParseError::InvalidPrice {
            row: self.row,
            price: self.price.clone(),
        };

        let text = self.price.trim();
        let amount = Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|_| invalid())?;

        round_to_units(amount).ok_or_else(invalid)
    }
}

/// Rounds to whole units with ties going to the even neighbour.
pub fn round_to_units(amount: Decimal) -> Option<i64> {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
        .to_i64()
}
