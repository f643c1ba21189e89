//! Optimistic view of expenditures that were submitted but are not yet part
//! of the backend's month listing.
//!
//! A pending entry is created with a temporary id when a record is submitted.
//! When the backend acknowledges it, the entry remembers the server id and
//! stays visible until a server listing that contains that id is merged in.
//! A rejected submission discards the entry. Deleting an acknowledged spend
//! forgets its entry, and editing one rewrites the pending copy.
//!
//! While the submission is in flight the entry has no server id yet, so a
//! listing fetched in that window shows the spend twice until the backend
//! answers. The window is accepted: it closes on the next listing.

use std::collections::HashSet;

use uuid::Uuid;

use crate::date_utils::YearMonth;
use crate::models::{ExpenditureId, ExpenditureRecord, ExpenditureUpdate, NewExpenditure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSpend {
    pub temp_id: Uuid,
    pub record: ExpenditureRecord,
    pub server_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct PendingSpends {
    entries: Vec<PendingSpend>,
}

impl PendingSpends {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a submitted expenditure and return its temporary id.
    pub fn push(&mut self, spend: &NewExpenditure) -> Uuid {
        let temp_id = Uuid::new_v4();
        self.entries.push(PendingSpend {
            temp_id,
            record: spend.pending_record(ExpenditureId::Temporary(temp_id)),
            server_id: None,
        });
        temp_id
    }

    /// Mark a pending entry as acknowledged by the backend.
    pub fn resolve(&mut self, temp_id: Uuid, server_id: i64) -> bool {
        match self.entries.iter_mut().find(|e| e.temp_id == temp_id) {
            Some(entry) => {
                entry.server_id = Some(server_id);
                true
            }
            None => false,
        }
    }

    pub fn discard(&mut self, temp_id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.temp_id != temp_id);
        self.entries.len() != before
    }

    /// Drop the entry acknowledged as `server_id`, if any.
    pub fn forget(&mut self, server_id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.server_id != Some(server_id));
        self.entries.len() != before
    }

    /// Apply an edit to the entry acknowledged as `update.id`, if any.
    pub fn amend(&mut self, update: &ExpenditureUpdate) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| e.server_id == Some(update.id))
        {
            Some(entry) => {
                entry.record.date = update.date;
                entry.record.category_id = update.category_id;
                entry.record.category_name = None;
                entry.record.amount = update.amount;
                entry.record.memo = update.memo.clone();
                true
            }
            None => false,
        }
    }

    /// Drop acknowledged entries whose server copy is present in `server`.
    pub fn prune(&mut self, server: &[ExpenditureRecord]) -> usize {
        let known = server_ids(server);
        let before = self.entries.len();
        self.entries.retain(|e| !is_delivered(e, &known));
        before - self.entries.len()
    }

    /// Pending records for one month that the server listing does not cover yet.
    pub fn visible_for(&self, ym: YearMonth, server: &[ExpenditureRecord]) -> Vec<ExpenditureRecord> {
        let known = server_ids(server);
        self.entries
            .iter()
            .filter(|e| ym.contains(e.record.date) && !is_delivered(e, &known))
            .map(|e| e.record.clone())
            .collect()
    }
}

/// Unified view of server records and pending entries, without double counting.
pub fn merge(pending: &PendingSpends, ym: YearMonth, server: &[ExpenditureRecord]) -> Vec<ExpenditureRecord> {
    let mut merged = server.to_vec();
    merged.extend(pending.visible_for(ym, server));
    merged
}

fn server_ids(server: &[ExpenditureRecord]) -> HashSet<i64> {
    server.iter().filter_map(|r| r.id.server_id()).collect()
}

fn is_delivered(entry: &PendingSpend, known: &HashSet<i64>) -> bool {
    entry.server_id.is_some_and(|id| known.contains(&id))
}
