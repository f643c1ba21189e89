use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::date_utils::YearMonth;
use crate::models::ExpenditureRecord;

/// Total spend per day. Days without records are absent from the map.
pub fn spend_by_date<'a, I>(records: I) -> BTreeMap<NaiveDate, i64>
where
    I: IntoIterator<Item = &'a ExpenditureRecord>,
{
    let mut totals: BTreeMap<NaiveDate, i64> = BTreeMap::new();

    for record in records {
        *totals.entry(record.date).or_insert(0) += record.amount;
    }

    totals
}

pub fn records_in_month(records: &[ExpenditureRecord], ym: YearMonth) -> Vec<ExpenditureRecord> {
    records
        .iter()
        .filter(|r| ym.contains(r.date))
        .cloned()
        .collect()
}

/// Records logged on `date`, in the order they were given.
pub fn records_on(records: &[ExpenditureRecord], date: NaiveDate) -> Vec<ExpenditureRecord> {
    records.iter().filter(|r| r.date == date).cloned().collect()
}

pub fn total_spend(spend_by_date: &BTreeMap<NaiveDate, i64>) -> i64 {
    spend_by_date.values().sum()
}
