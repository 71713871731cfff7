use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, BalanceMap, ExpenseRecord, is_negligible};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub expense_count: usize,
    pub total_spent: Amount,
    pub average_expense: Amount,
    pub largest_expense: Option<ExpenseHighlight>,
    pub first_expense_at: Option<DateTime<Utc>>,
    pub last_expense_at: Option<DateTime<Utc>>,
    /// One entry per participant, in order of first appearance
    pub participants: Vec<ParticipantSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseHighlight {
    pub description: String,
    pub payer: String,
    pub amount: Amount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantSummary {
    pub name: String,
    /// Total this participant paid for the group
    pub paid: Amount,
    /// Total of this participant's shares
    pub share: Amount,
    pub balance: Amount,
    pub status: BalanceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    WillReceive,
    Owes,
    Settled,
}

impl BalanceStatus {
    pub fn from_balance(balance: Amount) -> Self {
        if is_negligible(balance) {
            BalanceStatus::Settled
        } else if balance > 0.0 {
            BalanceStatus::WillReceive
        } else {
            BalanceStatus::Owes
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStatus::WillReceive => "will receive",
            BalanceStatus::Owes => "owes",
            BalanceStatus::Settled => "settled",
        }
    }
}

impl std::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Aggregate totals for a list of expenses and the balances derived from them.
pub fn build_summary(expenses: &[ExpenseRecord], balances: &BalanceMap) -> LedgerSummary {
    let total_spent: Amount = expenses.iter().map(|e| e.amount).sum();
    let average_expense = if expenses.is_empty() {
        0.0
    } else {
        total_spent / expenses.len() as Amount
    };

    // Earliest entry wins on ties
    let largest_expense = expenses
        .iter()
        .fold(None::<&ExpenseRecord>, |best, e| match best {
            Some(b) if b.amount >= e.amount => Some(b),
            _ => Some(e),
        })
        .map(|e| ExpenseHighlight {
            description: e.description.clone(),
            payer: e.payer.clone(),
            amount: e.amount,
        });

    let mut paid: IndexMap<&str, Amount> = IndexMap::new();
    let mut share: IndexMap<&str, Amount> = IndexMap::new();
    for expense in expenses {
        *paid.entry(expense.payer.as_str()).or_insert(0.0) += expense.amount;
        for name in &expense.participants {
            *share.entry(name.as_str()).or_insert(0.0) += expense.per_participant_share;
        }
    }

    let participants = balances
        .iter()
        .map(|(name, balance)| ParticipantSummary {
            name: name.to_string(),
            paid: paid.get(name).copied().unwrap_or(0.0),
            share: share.get(name).copied().unwrap_or(0.0),
            balance,
            status: BalanceStatus::from_balance(balance),
        })
        .collect();

    LedgerSummary {
        expense_count: expenses.len(),
        total_spent,
        average_expense,
        largest_expense,
        first_expense_at: expenses.iter().map(|e| e.timestamp).min(),
        last_expense_at: expenses.iter().map(|e| e.timestamp).max(),
        participants,
    }
}
