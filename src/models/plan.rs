use serde::{Deserialize, Serialize};

use crate::date_utils::YearMonth;

/// Spending plan for one calendar month, in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPlan {
    pub ym: YearMonth,
    #[serde(default)]
    pub amount: i64,
}

impl MonthlyPlan {
    /// Plan amount for the ledger; a month without a plan counts as zero.
    pub fn amount_or_zero(plan: Option<&MonthlyPlan>) -> i64 {
        plan.map(|p| p.amount).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanInput {
    pub ym: YearMonth,
    pub amount: i64,
}
