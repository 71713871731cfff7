use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::{BalanceStatus, SplitService};
use crate::domain::{ParticipantSet, format_amount, parse_amount};

/// BuddySplit - Shared Expense Splitter
#[derive(Parser)]
#[command(name = "buddysplit")]
#[command(about = "Track shared expenses and work out who owes whom")]
#[command(version)]
pub struct Cli {
    /// Data file path
    #[arg(long, env = "BUDDYSPLIT_DATA", default_value = "buddysplit.json")]
    pub data: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a shared expense
    Add {
        /// Amount paid (e.g., "50.00" or "50")
        amount: String,

        /// Who paid
        #[arg(short, long)]
        payer: String,

        /// Who splits the cost (repeat the flag or separate names with commas)
        #[arg(short, long = "with", value_delimiter = ',', required = true)]
        with: Vec<String>,

        /// What it was for
        #[arg(short, long, default_value = "")]
        description: String,

        /// Date of the expense (ISO 8601 format: YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// List recorded expenses
    Expenses,

    /// Show everyone's balance
    Balances,

    /// Show the payments that settle all balances
    Settle,

    /// Show totals for the whole group
    Summary,

    /// Delete every expense
    Clear {
        /// Confirm that all data should be deleted
        #[arg(long)]
        yes: bool,
    },

    /// Export data to CSV or JSON
    Export {
        /// What to export: expenses, balances, settlements, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv, always json for full)
        #[arg(short, long)]
        format: Option<String>,
    },
}

impl Cli {
    /// Install the log subscriber. `RUST_LOG` takes precedence over `--verbose`.
    pub fn init_logging(&self) {
        let level = if self.verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("buddysplit={level}")));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn run(self) -> Result<()> {
        let mut service = SplitService::open(&self.data)
            .with_context(|| format!("Failed to open data file: {}", self.data))?;

        match self.command {
            Commands::Add {
                amount,
                payer,
                with,
                description,
                date,
            } => {
                let amount =
                    parse_amount(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

                // Parse date or use now
                let timestamp = match date {
                    Some(date_str) => parse_date(&date_str).with_context(|| {
                        format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)
                    })?,
                    None => Utc::now(),
                };

                let participants: ParticipantSet = with.iter().collect();
                let expense =
                    service.record_expense(&payer, amount, &description, participants, timestamp)?;

                println!(
                    "Recorded expense: {} paid by {}, {} each for {} people ({})",
                    format_amount(expense.amount),
                    expense.payer,
                    format_amount(expense.per_participant_share),
                    expense.participants.len(),
                    expense.id
                );
            }

            Commands::Expenses => run_expenses_command(&service),

            Commands::Balances => run_balances_command(&service),

            Commands::Settle => run_settle_command(&service),

            Commands::Summary => run_summary_command(&service),

            Commands::Clear { yes } => {
                if !yes {
                    anyhow::bail!(
                        "This deletes all {} expenses. Re-run with --yes to confirm.",
                        service.expenses().len()
                    );
                }
                service.clear_ledger()?;
                println!("All expenses cleared.");
            }

            Commands::Export {
                export_type,
                output,
                format,
            } => {
                run_export_command(&service, &export_type, output.as_deref(), format.as_deref())?;
            }
        }

        Ok(())
    }
}

fn run_expenses_command(service: &SplitService) {
    let expenses = service.expenses();
    if expenses.is_empty() {
        println!("No expenses yet.");
        return;
    }

    println!(
        "{:<12} {:>10} {:<15} {:>10} {:<25} DESCRIPTION",
        "DATE", "AMOUNT", "PAID BY", "EACH", "SPLIT"
    );
    println!("{}", "-".repeat(95));

    for expense in expenses {
        let split: Vec<&str> = expense.participants.iter().collect();
        println!(
            "{:<12} {:>10} {:<15} {:>10} {:<25} {}",
            expense.timestamp.format("%Y-%m-%d"),
            format_amount(expense.amount),
            truncate(&expense.payer, 15),
            format_amount(expense.per_participant_share),
            truncate(&split.join(", "), 25),
            truncate(&expense.description, 30)
        );
    }
}

fn run_balances_command(service: &SplitService) {
    let balances = service.get_balances();
    if balances.is_empty() {
        println!("No balances yet. Add an expense first.");
        return;
    }

    println!("{:<20} {:>12} STATUS", "NAME", "BALANCE");
    println!("{}", "-".repeat(46));
    for (name, balance) in balances.by_magnitude() {
        println!(
            "{:<20} {:>12} {}",
            truncate(name, 20),
            format_amount(balance),
            BalanceStatus::from_balance(balance)
        );
    }
}

fn run_settle_command(service: &SplitService) {
    let plan = service.get_settlement_plan();
    if plan.is_empty() {
        println!("All debts are already settled. No payments needed.");
        return;
    }

    for (index, payment) in plan.iter().enumerate() {
        println!(
            "Step {} of {}: {} pays {} {}",
            index + 1,
            plan.len(),
            payment.from,
            payment.to,
            format_amount(payment.amount)
        );
    }
}

fn run_summary_command(service: &SplitService) {
    let summary = service.summary();

    println!("Expenses:     {}", summary.expense_count);
    println!("Total spent:  {}", format_amount(summary.total_spent));
    println!("Average:      {}", format_amount(summary.average_expense));
    if let Some(largest) = &summary.largest_expense {
        println!(
            "Largest:      {} ({} by {})",
            format_amount(largest.amount),
            largest.description,
            largest.payer
        );
    }
    if let (Some(first), Some(last)) = (summary.first_expense_at, summary.last_expense_at) {
        println!(
            "Period:       {} to {}",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        );
    }

    if !summary.participants.is_empty() {
        println!();
        println!(
            "{:<20} {:>10} {:>10} {:>10} STATUS",
            "NAME", "PAID", "SHARE", "BALANCE"
        );
        println!("{}", "-".repeat(66));
        for p in &summary.participants {
            println!(
                "{:<20} {:>10} {:>10} {:>10} {}",
                truncate(&p.name, 20),
                format_amount(p.paid),
                format_amount(p.share),
                format_amount(p.balance),
                p.status
            );
        }
    }
}

fn run_export_command(
    service: &SplitService,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let json = match format.unwrap_or("csv") {
        "csv" => false,
        "json" => true,
        other => anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", other),
    };

    let exporter = Exporter::new(service);

    // Determine output writer
    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match (export_type, json) {
        ("expenses", false) => exporter.export_expenses_csv(writer)?,
        ("expenses", true) => exporter.export_expenses_json(writer)?,
        ("balances", false) => exporter.export_balances_csv(writer)?,
        ("balances", true) => exporter.export_balances_json(writer)?,
        ("settlements", false) => exporter.export_settlements_csv(writer)?,
        ("settlements", true) => exporter.export_settlements_json(writer)?,
        ("full", _) => {
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported {} expenses, {} balances, {} settlements",
                    snapshot.expenses.len(),
                    snapshot.balances.len(),
                    snapshot.settlements.len()
                );
            }
            return Ok(());
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: expenses, balances, settlements, full",
                export_type
            );
        }
    };

    if output.is_some() {
        eprintln!("Exported {} {}", count, export_type);
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<DateTime<Utc>> {
    use chrono::NaiveDate;

    // Parse YYYY-MM-DD format
    let naive_date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .context("Date must be in YYYY-MM-DD format")?;

    // Convert to UTC datetime at midnight
    let naive_datetime = naive_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("Invalid date"))?;

    Ok(DateTime::from_naive_utc_and_offset(naive_datetime, Utc))
}
