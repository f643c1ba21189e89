use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::calendar::Weekday;

/// One day of the allowance ledger. Derived on demand, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceRow {
    #[serde(rename = "dateStr")]
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub base: i64,
    pub allowed_today: i64,
    pub spend: i64,
    pub end_carry: i64,
}

impl AllowanceRow {
    /// Carry that flowed in from the previous day.
    pub fn carry_in(&self) -> i64 {
        self.allowed_today - self.base
    }

    pub fn is_overspent(&self) -> bool {
        self.end_carry < 0
    }
}
