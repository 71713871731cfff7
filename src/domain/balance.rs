use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Amount, ExpenseRecord, is_negligible};

/// Net balance per participant.
/// Positive: the participant is owed money. Negative: the participant owes money.
///
/// Keys keep the order in which participants first appear in the ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BalanceMap(IndexMap<String, Amount>);

impl BalanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Amount> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.0.iter().map(|(name, balance)| (name.as_str(), *balance))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of every balance. Zero (within tolerance) for any ledger.
    pub fn total(&self) -> Amount {
        self.0.values().sum()
    }

    /// Returns true if nobody owes or is owed a meaningful amount.
    pub fn is_settled(&self) -> bool {
        self.0.values().all(|balance| is_negligible(*balance))
    }

    /// Balances ordered by absolute value, largest first.
    /// Ties keep first-appearance order.
    pub fn by_magnitude(&self) -> Vec<(&str, Amount)> {
        let mut entries: Vec<(&str, Amount)> = self.iter().collect();
        entries.sort_by(|(_, a), (_, b)| b.abs().total_cmp(&a.abs()));
        entries
    }
}

impl FromIterator<(String, Amount)> for BalanceMap {
    fn from_iter<I: IntoIterator<Item = (String, Amount)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Compute every participant's net balance from the full list of expenses.
///
/// The payer is credited the full amount and each participant is debited their share.
/// Expenses are applied in ledger order so floating-point results are reproducible.
pub fn compute_balances(expenses: &[ExpenseRecord]) -> BalanceMap {
    let mut balances: IndexMap<String, Amount> = IndexMap::new();

    // Seed every name in order of first appearance
    for expense in expenses {
        balances.entry(expense.payer.clone()).or_insert(0.0);
        for name in &expense.participants {
            balances.entry(name.clone()).or_insert(0.0);
        }
    }

    for expense in expenses {
        if let Some(balance) = balances.get_mut(&expense.payer) {
            *balance += expense.amount;
        }
        for name in &expense.participants {
            if let Some(balance) = balances.get_mut(name) {
                *balance -= expense.per_participant_share;
            }
        }
    }

    BalanceMap(balances)
}
