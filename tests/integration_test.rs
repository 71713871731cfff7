mod common;

use anyhow::Result;
use buddysplit::application::AppError;
use buddysplit::domain::{InvalidRecord, SettlementRecord, TOLERANCE};
use common::{WeekendTrip, assert_close, expense, participants, test_service};

#[test]
fn test_single_payer_split_three_ways() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    service.append_expense(expense("Al", 90.0, &["Al", "Bo", "Cy"]))?;

    let balances = service.get_balances();
    let entries: Vec<(&str, f64)> = balances.iter().collect();
    assert_eq!(entries, vec![("Al", 60.0), ("Bo", -30.0), ("Cy", -30.0)]);

    let plan = service.get_settlement_plan();
    assert_eq!(
        plan,
        vec![
            SettlementRecord {
                from: "Bo".into(),
                to: "Al".into(),
                amount: 30.0
            },
            SettlementRecord {
                from: "Cy".into(),
                to: "Al".into(),
                amount: 30.0
            },
        ]
    );

    Ok(())
}

#[test]
fn test_mutual_expenses_need_no_settlement() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    service.append_expense(expense("Al", 100.0, &["Al", "Bo"]))?;
    service.append_expense(expense("Bo", 100.0, &["Bo", "Al"]))?;

    let balances = service.get_balances();
    assert!(balances.get("Al").unwrap().abs() < TOLERANCE);
    assert!(balances.get("Bo").unwrap().abs() < TOLERANCE);
    assert!(service.get_settlement_plan().is_empty());

    Ok(())
}

#[test]
fn test_clear_resets_everything() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    WeekendTrip::record(&mut service)?;
    assert!(!service.get_settlement_plan().is_empty());

    service.clear_ledger()?;

    assert!(service.expenses().is_empty());
    assert!(service.get_balances().is_empty());
    assert!(service.get_settlement_plan().is_empty());

    Ok(())
}

#[test]
fn test_invalid_records_are_rejected() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    service.append_expense(expense("Al", 10.0, &["Bo"]))?;

    let result = service.append_expense(expense("Al", -5.0, &["Bo"]));
    assert!(matches!(
        result,
        Err(AppError::InvalidRecord(InvalidRecord::NonPositiveAmount(_)))
    ));

    let result = service.append_expense(expense("Al", 5.0, &[]));
    assert!(matches!(
        result,
        Err(AppError::InvalidRecord(InvalidRecord::NoParticipants))
    ));

    let result = service.append_expense(expense("Al", f64::NAN, &["Bo"]));
    assert!(matches!(
        result,
        Err(AppError::InvalidRecord(InvalidRecord::NonFiniteAmount))
    ));

    assert_eq!(service.expenses().len(), 1);
    Ok(())
}

#[test]
fn test_share_must_match_even_split() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    let mut record = expense("Al", 90.0, &["Al", "Bo", "Cy"]);
    record.per_participant_share = 10.0;

    let result = service.append_expense(record);
    assert!(matches!(
        result,
        Err(AppError::InvalidRecord(InvalidRecord::ShareMismatch { .. }))
    ));
    assert!(service.expenses().is_empty());
    assert!(service.get_balances().total().abs() < TOLERANCE);
    Ok(())
}

#[test]
fn test_record_expense_requires_payer() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    let result = service.record_expense(
        "   ",
        10.0,
        "Nobody paid",
        participants(&["Al"]),
        chrono::Utc::now(),
    );

    assert!(matches!(result, Err(AppError::MissingPayer)));
    assert!(service.expenses().is_empty());
    Ok(())
}

#[test]
fn test_duplicate_participants_collapse() -> Result<()> {
    let (mut service, _temp) = test_service()?;

    let record = service.record_expense(
        "Al",
        60.0,
        "Lunch",
        participants(&["Bo", "Bo", " Bo ", "Cy"]),
        chrono::Utc::now(),
    )?;

    assert_eq!(record.participants.len(), 2);
    assert_close(record.per_participant_share, 30.0);

    let balances = service.get_balances();
    assert_close(balances.get("Al").unwrap(), 60.0);
    assert_close(balances.get("Bo").unwrap(), -30.0);
    Ok(())
}

#[test]
fn test_weekend_trip_balances() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    WeekendTrip::record(&mut service)?;

    // Cabin: 60 each, groceries: 15 each, fuel: 15 each (no Bo), coffee: 10 each (Al, Bo)
    let balances = service.get_balances();
    assert_close(balances.get("Al").unwrap(), 240.0 - 60.0 - 15.0 - 15.0 - 10.0);
    assert_close(balances.get("Bo").unwrap(), 60.0 - 60.0 - 15.0 - 10.0);
    assert_close(balances.get("Cy").unwrap(), 45.0 - 60.0 - 15.0 - 15.0);
    assert_close(balances.get("Dee").unwrap(), 20.0 - 60.0 - 15.0 - 15.0);
    assert!(balances.total().abs() < TOLERANCE);

    let plan = service.get_settlement_plan();
    assert_eq!(plan.len(), 3);
    assert!(plan.iter().all(|p| p.to == "Al"));
    assert_eq!(plan[0].from, "Dee");
    assert_close(plan[0].amount, 70.0);

    Ok(())
}

#[test]
fn test_summary() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    WeekendTrip::record(&mut service)?;

    let summary = service.summary();
    assert_eq!(summary.expense_count, 4);
    assert_close(summary.total_spent, 365.0);
    assert_close(summary.average_expense, 91.25);
    assert_eq!(summary.largest_expense.unwrap().description, "Cabin");
    assert_eq!(
        summary.first_expense_at.unwrap().date_naive().to_string(),
        "2024-06-01"
    );
    assert_eq!(
        summary.last_expense_at.unwrap().date_naive().to_string(),
        "2024-06-02"
    );

    let names: Vec<&str> = summary.participants.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Al", "Bo", "Cy", "Dee"]);

    Ok(())
}
