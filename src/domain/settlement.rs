use serde::{Deserialize, Serialize};

use super::{Amount, BalanceMap, TOLERANCE, is_negligible};

/// One payment that moves money from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub from: String,
    pub to: String,
    pub amount: Amount,
}

/// Payments in the order they should be made.
pub type SettlementPlan = Vec<SettlementRecord>;

/// Work out who pays whom so that every balance goes to zero.
///
/// Greedy matching: the largest debtor pays the largest creditor, then the
/// cursors move on as each side is paid off. The result is not guaranteed to
/// use the fewest possible payments.
///
/// The loop stops as soon as the current pair can only exchange a negligible
/// amount, even if later pairs still hold larger balances. Callers depend on
/// this exact output, so it is kept as is.
pub fn compute_settlements(balances: &BalanceMap) -> SettlementPlan {
    let mut debtors: Vec<(&str, Amount)> = balances
        .iter()
        .filter(|(_, balance)| *balance < 0.0 && !is_negligible(*balance))
        .collect();
    let mut creditors: Vec<(&str, Amount)> = balances
        .iter()
        .filter(|(_, balance)| *balance > 0.0 && !is_negligible(*balance))
        .collect();

    // Most negative first / largest credit first, ties keep map order
    debtors.sort_by(|(_, a), (_, b)| a.total_cmp(b));
    creditors.sort_by(|(_, a), (_, b)| b.total_cmp(a));

    let mut plan = SettlementPlan::new();
    let mut debtor_index = 0;
    let mut creditor_index = 0;

    while debtor_index < debtors.len() && creditor_index < creditors.len() {
        let (debtor, debt) = debtors[debtor_index];
        let (creditor, credit) = creditors[creditor_index];

        let amount = debt.abs().min(credit);
        if amount <= TOLERANCE {
            // TODO: skip to the next viable pair instead of ending the plan here
            // once downstream consumers no longer rely on the truncated output.
            break;
        }

        plan.push(SettlementRecord {
            from: debtor.to_string(),
            to: creditor.to_string(),
            amount,
        });

        debtors[debtor_index].1 += amount;
        creditors[creditor_index].1 -= amount;

        if debtors[debtor_index].1.abs() < TOLERANCE {
            debtor_index += 1;
        }
        if creditors[creditor_index].1 < TOLERANCE {
            creditor_index += 1;
        }
    }

    tracing::debug!(
        debtors = debtors.len(),
        creditors = creditors.len(),
        payments = plan.len(),
        "computed settlement plan"
    );

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(&str, Amount)]) -> BalanceMap {
        entries
            .iter()
            .map(|(name, balance)| (name.to_string(), *balance))
            .collect()
    }

    fn payment(from: &str, to: &str, amount: Amount) -> SettlementRecord {
        SettlementRecord {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }

    #[test]
    fn test_empty_balances() {
        assert!(compute_settlements(&BalanceMap::new()).is_empty());
    }

    #[test]
    fn test_near_zero_balances_produce_no_payments() {
        let plan = compute_settlements(&balances(&[
            ("Al", 0.004),
            ("Bo", -0.009),
            ("Cy", 0.005),
        ]));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_single_creditor() {
        let plan = compute_settlements(&balances(&[("Al", 60.0), ("Bo", -30.0), ("Cy", -30.0)]));

        assert_eq!(
            plan,
            vec![payment("Bo", "Al", 30.0), payment("Cy", "Al", 30.0)]
        );
    }

    #[test]
    fn test_largest_debtor_pays_largest_creditor_first() {
        let plan = compute_settlements(&balances(&[
            ("Al", 10.0),
            ("Bo", -50.0),
            ("Cy", 40.0),
        ]));

        assert_eq!(
            plan,
            vec![payment("Bo", "Cy", 40.0), payment("Bo", "Al", 10.0)]
        );
    }

    #[test]
    fn test_debtor_split_across_creditors() {
        let plan = compute_settlements(&balances(&[
            ("Al", 25.0),
            ("Bo", 25.0),
            ("Cy", -20.0),
            ("Dee", -30.0),
        ]));

        assert_eq!(
            plan,
            vec![
                payment("Dee", "Al", 25.0),
                payment("Dee", "Bo", 5.0),
                payment("Cy", "Bo", 20.0),
            ]
        );
    }

    #[test]
    fn test_stops_at_first_negligible_pair() {
        // Al is owed 0.02, but the first pair can only move 0.01,
        // so nothing is paid at all.
        let input = balances(&[("Al", 0.02), ("Bo", -0.01), ("Cy", -0.01)]);
        let plan = compute_settlements(&input);

        assert!(plan.is_empty());
        assert!(!input.is_settled());
    }

    #[test]
    fn test_payment_count_bound() {
        let input = balances(&[
            ("Al", 12.5),
            ("Bo", -7.25),
            ("Cy", 3.0),
            ("Dee", -20.0),
            ("Ed", 11.75),
        ]);
        let plan = compute_settlements(&input);

        assert!(plan.len() <= 2 + 3 - 1);
        assert!(plan.iter().all(|p| p.amount > TOLERANCE));
    }
}
