use std::collections::HashMap;

use getset::Getters;
use thiserror::Error;

pub mod transaction;

use transaction::Transaction;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: expected at least {expected} cells, found {found}")]
    ShortRow { row: usize, expected: usize, found: usize },
    #[error("row {row}: price {price:?} is not a number")]
    InvalidPrice { row: usize, price: String },
    #[error("row {row}: deal time {deal_time:?} has no date")]
    MissingDate { row: usize, deal_time: String },
    #[error("row {row}: running spend total overflows")]
    SumOverflow { row: usize },
}

/// Summary metadata pulled from the header region, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderFields {
    fields: HashMap<String, String>,
}

impl HeaderFields {
    pub fn new() -> HeaderFields {
        HeaderFields::default()
    }

    /// Later cells mapped to the same field overwrite earlier ones.
    pub fn insert(&mut self, field: &str, value: &str) {
        self.fields.insert(field.to_string(), value.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

#[derive(Debug, Clone, Default, Getters)]
#[getset(get = "pub")]
pub struct BillDocument {
    header: HeaderFields,
    transactions: Vec<Transaction>,
}

impl BillDocument {
    pub fn new(header: HeaderFields, transactions: Vec<Transaction>) -> BillDocument {
        BillDocument { header, transactions }
    }
}
