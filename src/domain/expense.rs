use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::{Amount, ParticipantSet, TOLERANCE};

pub type ExpenseId = Uuid;

/// Ids as found in stored data: UUIDs, or millisecond timestamps from older files.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredExpenseId {
    Uuid(Uuid),
    Millis(u64),
}

/// Legacy numeric ids map to a fixed UUID so they stay the same across saves.
fn deserialize_expense_id<'de, D>(deserializer: D) -> Result<ExpenseId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StoredExpenseId::deserialize(deserializer)? {
        StoredExpenseId::Uuid(id) => id,
        StoredExpenseId::Millis(millis) => Uuid::from_u64_pair(0, millis),
    })
}

/// A single shared expense: one person paid, a group splits it evenly.
/// Expenses are never edited once recorded; the ledger can only be cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(deserialize_with = "deserialize_expense_id")]
    pub id: ExpenseId,
    /// Who paid (may or may not be one of the participants)
    pub payer: String,
    /// Total paid, always positive
    pub amount: Amount,
    pub description: String,
    /// Who shares the cost
    #[serde(alias = "buddies")]
    pub participants: ParticipantSet,
    /// When the expense happened
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
    /// amount / number of participants
    #[serde(alias = "splitAmount")]
    pub per_participant_share: Amount,
}

impl ExpenseRecord {
    /// Create a new expense, deriving the per-participant share.
    /// The record is not validated here; the ledger rejects bad records on append.
    pub fn new(
        payer: impl Into<String>,
        amount: Amount,
        description: impl Into<String>,
        participants: ParticipantSet,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let per_participant_share = if participants.is_empty() {
            0.0
        } else {
            amount / participants.len() as Amount
        };

        Self {
            id: Uuid::new_v4(),
            payer: payer.into(),
            amount,
            description: description.into(),
            participants,
            timestamp,
            per_participant_share,
        }
    }

    /// Check the conditions every ledger entry must satisfy.
    pub fn validate(&self) -> Result<(), InvalidRecord> {
        if !self.amount.is_finite() {
            return Err(InvalidRecord::NonFiniteAmount);
        }
        if self.amount <= 0.0 {
            return Err(InvalidRecord::NonPositiveAmount(self.amount));
        }
        if !self.per_participant_share.is_finite() {
            return Err(InvalidRecord::NonFiniteShare);
        }
        if self.participants.is_empty() {
            return Err(InvalidRecord::NoParticipants);
        }

        let expected = self.amount / self.participants.len() as Amount;
        if (self.per_participant_share - expected).abs() > TOLERANCE {
            return Err(InvalidRecord::ShareMismatch {
                expected,
                actual: self.per_participant_share,
            });
        }
        Ok(())
    }

    /// Returns true if the payer is also splitting the cost
    pub fn payer_participates(&self) -> bool {
        self.participants.contains(&self.payer)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InvalidRecord {
    NonPositiveAmount(Amount),
    NonFiniteAmount,
    NonFiniteShare,
    NoParticipants,
    ShareMismatch { expected: Amount, actual: Amount },
}

impl std::fmt::Display for InvalidRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidRecord::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive, got {}", amount)
            }
            InvalidRecord::NonFiniteAmount => write!(f, "Expense amount is not a finite number"),
            InvalidRecord::NonFiniteShare => {
                write!(f, "Per-participant share is not a finite number")
            }
            InvalidRecord::NoParticipants => {
                write!(f, "Expense must be split with at least one participant")
            }
            InvalidRecord::ShareMismatch { expected, actual } => write!(
                f,
                "Per-participant share {} does not match amount split evenly ({})",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for InvalidRecord {}
