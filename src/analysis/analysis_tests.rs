use anyhow::{bail, Result};
use csv::StringRecord;
use pretty_assertions::assert_eq;

use super::*;
use crate::config::DayOrder;

const FAILED: &str = "支付失败";
const INCOME: &str = "收入";

fn tx(row: usize, deal_time: &str, counterparty: &str, direction: &str, price: &str, status: &str) -> Transaction {
    let cells = vec![deal_time, "商户消费", counterparty, "/", direction, price, "零钱", status];
    Transaction::from_record(row, &StringRecord::from(cells)).unwrap()
}

fn spend(row: usize, deal_time: &str, counterparty: &str, price: &str) -> Transaction {
    tx(row, deal_time, counterparty, EXPENSE_MARKER, price, SUCCEEDED_MARKER)
}

fn mixed_ledger() -> Vec<Transaction> {
    vec![
        spend(18, "2019-03-02 08:10:00", "Bakery", "¥6.50"),
        spend(19, "2019-03-01 12:00:00", " Canteen ", "¥15.40"),
        tx(20, "2019-03-01 13:00:00", "Canteen", EXPENSE_MARKER, "¥99.00", FAILED),
        tx(21, "2019-03-01 18:00:00", "Bob", INCOME, "¥200.00", SUCCEEDED_MARKER),
        spend(22, "2019-03-02 19:30:00", "Canteen", "¥13.50"),
        spend(23, "2019-03-03 09:00:00", "Bakery", "¥2.49"),
    ]
}

#[test]
fn test_settled_expense_filter() -> Result<()> {
    let ledger = mixed_ledger();
    let kept: Vec<usize> = ledger.iter().filter(|t| is_settled_expense(t)).map(|t| t.row()).collect();

    assert_eq!(kept, vec![18, 19, 22, 23]);

    Ok(())
}

#[test]
fn test_daily_spend_first_seen_order() -> Result<()> {
    let series = DailySpendSeries::from_transactions(&mixed_ledger(), DayOrder::FirstSeen)?;

    // 6.50 -> 6, 15.40 -> 15, 13.50 -> 14, 2.49 -> 2
    assert_eq!(series.days(), &vec!["2019-03-02", "2019-03-01", "2019-03-03"]);
    assert_eq!(series.totals(), &vec![20, 15, 2]);

    Ok(())
}

#[test]
fn test_daily_spend_chronological_order() -> Result<()> {
    let series = DailySpendSeries::from_transactions(&mixed_ledger(), DayOrder::Chronological)?;

    assert_eq!(series.days(), &vec!["2019-03-01", "2019-03-02", "2019-03-03"]);
    assert_eq!(series.totals(), &vec![15, 20, 2]);

    Ok(())
}

#[test]
fn test_ranking_trims_names_and_sorts_descending() -> Result<()> {
    let ranking = CounterpartyRanking::from_transactions(&mixed_ledger(), 10)?;

    assert_eq!(
        ranking.entries(),
        &vec![
            ranking::RankedCounterparty { name: "Canteen".to_string(), value: 29 },
            ranking::RankedCounterparty { name: "Bakery".to_string(), value: 8 },
        ]
    );
    assert_eq!(ranking.legend(), vec!["Canteen", "Bakery"]);

    Ok(())
}

#[test]
fn test_ranking_ties_keep_first_seen_order() -> Result<()> {
    let ledger = vec![
        spend(18, "2019-03-01 08:00:00", "Kiosk", "5"),
        spend(19, "2019-03-01 09:00:00", "Market", "9"),
        spend(20, "2019-03-01 10:00:00", "Pharmacy", "5"),
        spend(21, "2019-03-01 11:00:00", "Arcade", "5"),
    ];

    let ranking = CounterpartyRanking::from_transactions(&ledger, 10)?;

    assert_eq!(ranking.legend(), vec!["Market", "Kiosk", "Pharmacy", "Arcade"]);

    Ok(())
}

fn fifteen_counterparties() -> Vec<Transaction> {
    (0..15)
        .map(|i| spend(18 + i, "2019-03-01 08:00:00", &format!("Shop {:02}", i), &format!("{}.00", 100 - i)))
        .collect()
}

#[test]
fn test_ranking_keeps_top_ten() -> Result<()> {
    let ranking = CounterpartyRanking::from_transactions(&fifteen_counterparties(), 10)?;

    assert_eq!(ranking.entries().len(), 15);
    assert_eq!(ranking.top().len(), 10);
    assert_eq!(ranking.legend().first(), Some(&"Shop 00"));
    assert_eq!(ranking.legend().last(), Some(&"Shop 09"));

    Ok(())
}

#[test]
fn test_ranking_limit_twelve_matches_legacy_output() -> Result<()> {
    let ranking = CounterpartyRanking::from_transactions(&fifteen_counterparties(), 12)?;

    assert_eq!(ranking.top().len(), 12);

    Ok(())
}

#[test]
fn test_ranking_limit_above_entry_count() -> Result<()> {
    let ranking = CounterpartyRanking::from_transactions(&mixed_ledger(), 10)?;

    assert_eq!(ranking.top().len(), 2);

    Ok(())
}

fn daily_total(series: &DailySpendSeries) -> i64 {
    series.totals().iter().sum()
}

fn ranking_total(ranking: &CounterpartyRanking) -> i64 {
    ranking.entries().iter().map(|entry| entry.value).sum()
}

#[test]
fn test_totals_agree() -> Result<()> {
    for ledger in [mixed_ledger(), fifteen_counterparties(), Vec::new()] {
        let daily = DailySpendSeries::from_transactions(&ledger, DayOrder::FirstSeen)?;
        let ranking = CounterpartyRanking::from_transactions(&ledger, 3)?;

        assert_eq!(daily_total(&daily), ranking_total(&ranking));
    }

    Ok(())
}

#[test]
fn test_invalid_price_only_checked_on_settled_expenses() -> Result<()> {
    let ledger = vec![
        tx(18, "2019-03-01 08:00:00", "Bob", INCOME, "n/a", SUCCEEDED_MARKER),
        spend(19, "2019-03-01 09:00:00", "Kiosk", "3"),
    ];
    assert_eq!(daily_total(&DailySpendSeries::from_transactions(&ledger, DayOrder::FirstSeen)?), 3);

    let ledger = vec![spend(18, "2019-03-01 08:00:00", "Kiosk", "n/a")];
    match CounterpartyRanking::from_transactions(&ledger, 10) {
        Err(ParseError::InvalidPrice { row, .. }) => assert_eq!(row, 18),
        _ => bail!("an unparseable settled expense must fail the aggregation"),
    }

    Ok(())
}

#[test]
fn test_running_total_overflow() -> Result<()> {
    let half = (i64::MAX / 2 + 1).to_string();
    let ledger = vec![
        spend(18, "2019-03-01 08:00:00", "Kiosk", &half),
        spend(19, "2019-03-01 09:00:00", "Kiosk", &half),
    ];

    match DailySpendSeries::from_transactions(&ledger, DayOrder::FirstSeen) {
        Err(ParseError::SumOverflow { row }) => assert_eq!(row, 19),
        _ => bail!("a daily total past i64::MAX must fail"),
    }
    match CounterpartyRanking::from_transactions(&ledger, 10) {
        Err(ParseError::SumOverflow { row }) => assert_eq!(row, 19),
        _ => bail!("a counterparty total past i64::MAX must fail"),
    }

    Ok(())
}

#[test]
fn test_chart_arguments() -> Result<()> {
    let ledger = mixed_ledger();

    let daily = Chart::from(DailySpendSeries::from_transactions(&ledger, DayOrder::FirstSeen)?);
    assert_eq!(
        daily.arguments()?,
        vec![r#"["2019-03-02","2019-03-01","2019-03-03"]"#.to_string(), "[20,15,2]".to_string()]
    );

    let ranking = Chart::from(CounterpartyRanking::from_transactions(&ledger, 1)?);
    assert_eq!(
        ranking.arguments()?,
        vec![r#"["Canteen"]"#.to_string(), r#"[{"name":"Canteen","value":29}]"#.to_string()]
    );

    Ok(())
}
