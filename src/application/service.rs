use chrono::{DateTime, Utc};
use std::path::Path;

use crate::domain::{
    Amount, BalanceMap, ExpenseLedger, ExpenseRecord, ParticipantSet, SettlementPlan, TOLERANCE,
    compute_balances, compute_settlements,
};
use crate::storage::{Snapshot, SnapshotError, SnapshotStore};

use super::{AppError, LedgerSummary, build_summary};

/// Application service providing the operations exposed to clients.
/// Balances and settlements are recomputed from the full ledger on every call.
pub struct SplitService {
    ledger: ExpenseLedger,
    store: Option<SnapshotStore>,
}

impl SplitService {
    /// Create an in-memory service with nothing persisted.
    pub fn new() -> Self {
        Self {
            ledger: ExpenseLedger::new(),
            store: None,
        }
    }

    /// Open the snapshot at the given path, starting empty if there is none.
    ///
    /// A corrupt snapshot is logged and discarded rather than reported as an error;
    /// only I/O failures are returned.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let store = SnapshotStore::new(path.as_ref());

        let ledger = match Self::restore(&store) {
            Ok(ledger) => ledger,
            Err(AppError::CorruptSnapshot(reason)) => {
                tracing::warn!(
                    path = %store.path().display(),
                    "ignoring corrupt snapshot, starting with an empty ledger: {reason}"
                );
                ExpenseLedger::new()
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            path = %store.path().display(),
            expenses = ledger.len(),
            "opened expense ledger"
        );

        Ok(Self {
            ledger,
            store: Some(store),
        })
    }

    fn restore(store: &SnapshotStore) -> Result<ExpenseLedger, AppError> {
        let snapshot = match store.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return Ok(ExpenseLedger::new()),
            Err(SnapshotError::Malformed(e)) => {
                return Err(AppError::CorruptSnapshot(e.to_string()));
            }
            Err(SnapshotError::Io(e)) => {
                return Err(AppError::Storage(
                    anyhow::Error::new(e).context("Failed to read snapshot"),
                ));
            }
        };

        let ledger = ExpenseLedger::from_records(snapshot.expenses)
            .map_err(|e| AppError::CorruptSnapshot(e.to_string()))?;

        // Stored balances are only a cached projection; note when they have drifted
        let balances = compute_balances(ledger.expenses());
        let drifted = snapshot.balances.len() != balances.len()
            || balances.iter().any(|(name, balance)| {
                snapshot
                    .balances
                    .get(name)
                    .is_none_or(|stored| (stored - balance).abs() >= TOLERANCE)
            });
        if drifted {
            tracing::debug!("persisted balances differ from recomputed ones, using recomputed");
        }

        Ok(ledger)
    }

    // ========================
    // Ledger operations
    // ========================

    /// Append an expense to the ledger and persist it.
    /// Invalid records are rejected and nothing changes.
    pub fn append_expense(&mut self, record: ExpenseRecord) -> Result<(), AppError> {
        record.validate()?;

        if let Some(store) = &self.store {
            let mut expenses = self.ledger.expenses().to_vec();
            expenses.push(record.clone());
            let balances = compute_balances(&expenses);
            store.save(&Snapshot { expenses, balances })?;
        }

        tracing::debug!(
            id = %record.id,
            payer = %record.payer,
            amount = record.amount,
            participants = record.participants.len(),
            "recorded expense"
        );
        self.ledger.append(record)?;
        Ok(())
    }

    /// Build and append an expense from form input.
    pub fn record_expense(
        &mut self,
        payer: &str,
        amount: Amount,
        description: &str,
        participants: ParticipantSet,
        timestamp: DateTime<Utc>,
    ) -> Result<ExpenseRecord, AppError> {
        let payer = payer.trim();
        if payer.is_empty() {
            return Err(AppError::MissingPayer);
        }

        let record = ExpenseRecord::new(payer, amount, description.trim(), participants, timestamp);
        self.append_expense(record.clone())?;
        Ok(record)
    }

    /// Remove every expense and the persisted snapshot.
    pub fn clear_ledger(&mut self) -> Result<(), AppError> {
        if let Some(store) = &self.store {
            store.remove()?;
        }
        let cleared = self.ledger.len();
        self.ledger.clear();
        tracing::info!(expenses = cleared, "cleared expense ledger");
        Ok(())
    }

    /// All expenses in the order they were recorded.
    pub fn expenses(&self) -> &[ExpenseRecord] {
        self.ledger.expenses()
    }

    // ========================
    // Derived views
    // ========================

    /// Current balance of every participant.
    pub fn get_balances(&self) -> BalanceMap {
        compute_balances(self.ledger.expenses())
    }

    /// Payments that settle the current balances.
    pub fn get_settlement_plan(&self) -> SettlementPlan {
        compute_settlements(&self.get_balances())
    }

    /// Totals over the whole ledger.
    pub fn summary(&self) -> LedgerSummary {
        build_summary(self.ledger.expenses(), &self.get_balances())
    }

    /// The state as it would be persisted.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            expenses: self.ledger.expenses().to_vec(),
            balances: self.get_balances(),
        }
    }
}

impl Default for SplitService {
    fn default() -> Self {
        Self::new()
    }
}
