use csv::StringRecord;
use log::debug;

use crate::bill::transaction::Transaction;
use crate::bill::{BillDocument, HeaderFields, ParseError};
use crate::config::ConfigMap;

/// Rows `1..=HEADER_ROWS` carry summary metadata, later rows are transactions.
pub const HEADER_ROWS: usize = 17;

const BOM: char = '\u{feff}';

/// Reads a ledger export into its header fields and transactions.
///
/// Every physical line is a row, numbered from 1. A blank line counts as a
/// row with no cells. Any malformed transaction row aborts the whole read.
pub fn read_bill(text: &str, cells: &ConfigMap) -> Result<BillDocument, ParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut header = HeaderFields::new();
    let mut transactions = Vec::new();
    let mut classify = |row: usize, record: &StringRecord| -> Result<(), ParseError> {
        if row <= HEADER_ROWS {
            extract_header_row(record, row, cells, &mut header);
        } else {
            transactions.push(Transaction::from_record(row, record)?);
        }
        Ok(())
    };

    let blank = StringRecord::new();
    let mut record = StringRecord::new();
    let mut row = 0;
    loop {
        // The reader drops blank lines, so count them before it gets there.
        let consumed = csv_reader.position().byte() as usize;
        for _ in 0..blank_lines_after(text, consumed) {
            row += 1;
            debug!("row {} is blank", row);
            classify(row, &blank)?;
        }

        if !csv_reader.read_record(&mut record)? {
            break;
        }
        row += 1;
        classify(row, &record)?;
    }

    debug!(
        "read {} header fields and {} transactions",
        header.len(),
        transactions.len()
    );

    Ok(BillDocument::new(header, transactions))
}

/// Number of empty lines starting at byte `offset`, the end of the last record read.
fn blank_lines_after(text: &str, offset: usize) -> usize {
    let (read, mut rest) = text.as_bytes().split_at(offset.min(text.len()));

    // A record ended by `\r` leaves the `\n` of its CRLF behind.
    if read.ends_with(b"\r") {
        if let [b'\n', tail @ ..] = rest {
            rest = tail;
        }
    }

    let mut count = 0;
    loop {
        rest = match rest {
            [b'\r', b'\n', tail @ ..] | [b'\r' | b'\n', tail @ ..] => tail,
            _ => return count,
        };
        count += 1;
    }
}

/// Stores every mapped cell of a header row into `header`.
///
/// Only non-blank cells are counted, so the column in a `"col,row"` key is the
/// position among the populated cells of the row, not the physical column.
pub fn extract_header_row(record: &StringRecord, row: usize, cells: &ConfigMap, header: &mut HeaderFields) {
    let populated = record
        .iter()
        .map(|cell| cell.trim_start_matches(BOM))
        .filter(|cell| !cell.trim().is_empty());

    for (idx, cell) in populated.enumerate() {
        let col = idx + 1;
        match cells.field_at(col, row) {
            Some(field) => header.insert(field, cell),
            None => debug!("unmapped header cell {},{}", col, row),
        }
    }
}
