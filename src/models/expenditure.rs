use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::date_utils::deserialize_day;
use crate::error::{AppError, AppResult};

/// Either the backend's id or a temporary id given to a record that has
/// not been acknowledged yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpenditureId {
    Server(i64),
    Temporary(Uuid),
}

impl ExpenditureId {
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary(_))
    }

    pub fn server_id(&self) -> Option<i64> {
        match self {
            Self::Server(id) => Some(*id),
            Self::Temporary(_) => None,
        }
    }
}

impl fmt::Display for ExpenditureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => write!(f, "{}", id),
            Self::Temporary(uuid) => write!(f, "tmp-{}", uuid),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureRecord {
    pub id: ExpenditureId,
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    pub category_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub memo: String,
}

/// Payload for logging a new expenditure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpenditure {
    pub date: NaiveDate,
    pub category_id: i64,
    pub amount: i64,
    #[serde(default)]
    pub memo: String,
}

impl NewExpenditure {
    pub fn validate(&self) -> AppResult<()> {
        validate_amount(self.amount)
    }

    /// The record as it is shown before the backend has acknowledged it.
    pub fn pending_record(&self, id: ExpenditureId) -> ExpenditureRecord {
        ExpenditureRecord {
            id,
            date: self.date,
            category_id: self.category_id,
            category_name: None,
            amount: self.amount,
            memo: self.memo.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenditureUpdate {
    pub id: i64,
    pub date: NaiveDate,
    pub category_id: i64,
    pub amount: i64,
    #[serde(default)]
    pub memo: String,
}

impl ExpenditureUpdate {
    pub fn validate(&self) -> AppResult<()> {
        validate_amount(self.amount)
    }
}

fn validate_amount(amount: i64) -> AppResult<()> {
    if amount < 0 {
        return Err(AppError::Validation(format!(
            "Amount must not be negative, got {}",
            amount
        )));
    }
    Ok(())
}
