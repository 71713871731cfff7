use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::{BalanceStatus, SplitService};
use crate::domain::{BalanceMap, ExpenseRecord, SettlementRecord, format_amount};

/// Full export: the persisted snapshot plus the settlement plan at export time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub expenses: Vec<ExpenseRecord>,
    pub balances: BalanceMap,
    pub settlements: Vec<SettlementRecord>,
}

/// Exporter for writing ledger data as CSV or JSON
pub struct Exporter<'a> {
    service: &'a SplitService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a SplitService) -> Self {
        Self { service }
    }

    /// Export expenses to CSV format
    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "timestamp",
            "payer",
            "amount",
            "description",
            "participants",
            "share",
        ])?;

        let mut count = 0;
        for expense in self.service.expenses() {
            let participants: Vec<&str> = expense.participants.iter().collect();
            csv_writer.write_record([
                expense.id.to_string(),
                expense.timestamp.to_rfc3339(),
                expense.payer.clone(),
                format_amount(expense.amount),
                expense.description.clone(),
                participants.join(";"),
                format_amount(expense.per_participant_share),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export balances to CSV format, largest first
    pub fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let balances = self.service.get_balances();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["participant", "balance", "status"])?;

        let mut count = 0;
        for (name, balance) in balances.by_magnitude() {
            let amount = format_amount(balance);
            csv_writer.write_record([
                name,
                amount.as_str(),
                BalanceStatus::from_balance(balance).as_str(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the settlement plan to CSV format, in payment order
    pub fn export_settlements_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let plan = self.service.get_settlement_plan();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["step", "from", "to", "amount"])?;

        for (index, payment) in plan.iter().enumerate() {
            csv_writer.write_record([
                &(index + 1).to_string(),
                &payment.from,
                &payment.to,
                &format_amount(payment.amount),
            ])?;
        }

        csv_writer.flush()?;
        Ok(plan.len())
    }

    /// Export expenses as a JSON array
    pub fn export_expenses_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let expenses = self.service.expenses();
        serde_json::to_writer_pretty(&mut writer, expenses)?;
        writer.flush()?;
        Ok(expenses.len())
    }

    /// Export balances as a JSON object keyed by participant
    pub fn export_balances_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let balances = self.service.get_balances();
        serde_json::to_writer_pretty(&mut writer, &balances)?;
        writer.flush()?;
        Ok(balances.len())
    }

    /// Export the settlement plan as a JSON array
    pub fn export_settlements_json<W: Write>(&self, mut writer: W) -> Result<usize> {
        let plan = self.service.get_settlement_plan();
        serde_json::to_writer_pretty(&mut writer, &plan)?;
        writer.flush()?;
        Ok(plan.len())
    }

    /// Export everything as a single JSON document
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<ExportSnapshot> {
        let snapshot = self.service.snapshot();

        let export = ExportSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            settlements: self.service.get_settlement_plan(),
            expenses: snapshot.expenses,
            balances: snapshot.balances,
        };

        let json = serde_json::to_string_pretty(&export)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(export)
    }
}
