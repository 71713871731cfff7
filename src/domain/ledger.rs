use super::{ExpenseRecord, InvalidRecord};

/// Ordered, append-only list of expenses.
/// This is the single source of truth; balances and settlements are derived from it.
#[derive(Debug, Clone, Default)]
pub struct ExpenseLedger {
    expenses: Vec<ExpenseRecord>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from previously recorded expenses, keeping their order.
    /// Fails on the first record that would not be accepted by [`append`](Self::append).
    pub fn from_records(records: Vec<ExpenseRecord>) -> Result<Self, InvalidRecord> {
        for record in &records {
            record.validate()?;
        }
        Ok(Self { expenses: records })
    }

    /// Append an expense. Invalid records are rejected and leave the ledger untouched.
    pub fn append(&mut self, record: ExpenseRecord) -> Result<(), InvalidRecord> {
        record.validate()?;
        self.expenses.push(record);
        Ok(())
    }

    /// Drop every expense. This is the only way to remove records.
    pub fn clear(&mut self) {
        self.expenses.clear();
    }

    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::ParticipantSet;

    fn make_expense(payer: &str, amount: f64, participants: &[&str]) -> ExpenseRecord {
        let participants: ParticipantSet = participants.iter().collect();
        ExpenseRecord::new(payer, amount, "test", participants, Utc::now())
    }

    #[test]
    fn test_append_keeps_order() {
        let mut ledger = ExpenseLedger::new();
        ledger.append(make_expense("Al", 10.0, &["Bo"])).unwrap();
        ledger.append(make_expense("Bo", 20.0, &["Al"])).unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.expenses()[0].payer, "Al");
        assert_eq!(ledger.expenses()[1].payer, "Bo");
    }

    #[test]
    fn test_append_rejects_invalid_without_mutation() {
        let mut ledger = ExpenseLedger::new();
        ledger.append(make_expense("Al", 10.0, &["Bo"])).unwrap();

        let result = ledger.append(make_expense("Al", -5.0, &["Bo"]));
        assert!(matches!(result, Err(InvalidRecord::NonPositiveAmount(_))));

        let result = ledger.append(make_expense("Al", 5.0, &[]));
        assert_eq!(result, Err(InvalidRecord::NoParticipants));

        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut ledger = ExpenseLedger::new();
        ledger.append(make_expense("Al", 10.0, &["Bo"])).unwrap();
        ledger.clear();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_from_records_rejects_bad_entry() {
        let records = vec![
            make_expense("Al", 10.0, &["Bo"]),
            make_expense("Bo", 10.0, &[]),
        ];
        assert_eq!(
            ExpenseLedger::from_records(records).unwrap_err(),
            InvalidRecord::NoParticipants
        );
    }
}
