//! Ledger management command implementations (list, delete, clear, dashboard)

use std::io::{self, BufRead, Write};

use anyhow::Result;
use bolso_core::{LedgerReport, LedgerStore};

use super::{format_brl, truncate};

pub fn cmd_expenses_list(store: &LedgerStore) -> Result<()> {
    let expenses = store.load();
    if expenses.is_empty() {
        println!("No expenses recorded yet.");
        return Ok(());
    }

    println!();
    println!(
        "{:<36}  {:>10}  {:<16}  {:<24}  {}",
        "ID", "AMOUNT", "CATEGORY", "DESCRIPTION", "DATE"
    );
    for expense in &expenses {
        let date = expense
            .timestamp
            .parse::<chrono::DateTime<chrono::Utc>>()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|_| expense.timestamp.clone());
        println!(
            "{:<36}  {:>10}  {:<16}  {:<24}  {}",
            expense.id,
            format_brl(expense.amount),
            truncate(&expense.category, 16),
            truncate(&expense.description, 24),
            date
        );
    }
    println!();
    println!("Total: {} expenses", expenses.len());
    Ok(())
}

pub fn cmd_expenses_delete(store: &LedgerStore, id: &str) -> Result<()> {
    let mut expenses = store.load();
    let before = expenses.len();
    expenses.retain(|e| e.id != id);

    if expenses.len() == before {
        println!("❌ No expense with id {}", id);
        return Ok(());
    }

    store.save(&expenses)?;
    println!("🗑️  Expense {} deleted", id);
    Ok(())
}

pub fn cmd_expenses_clear(store: &LedgerStore, yes: bool) -> Result<()> {
    let expenses = store.load();
    if expenses.is_empty() {
        println!("Ledger is already empty.");
        return Ok(());
    }

    if !yes {
        print!(
            "Delete all {} expenses? This cannot be undone. [y/N] ",
            expenses.len()
        );
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.save(&[])?;
    println!("🗑️  {} expenses deleted", expenses.len());
    Ok(())
}

pub fn cmd_dashboard(store: &LedgerStore) -> Result<()> {
    let expenses = store.load();
    let report = LedgerReport::from_expenses(&expenses);

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│           💰 Bolso Dashboard            │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Total spent:     {}", format_brl(report.total));
    println!("  Expenses:        {}", report.count);
    if let Some(largest) = &report.largest {
        println!(
            "  Largest:         {} — {}",
            format_brl(largest.amount),
            truncate(&largest.description, 24)
        );
    }

    if !report.by_category.is_empty() {
        println!();
        println!("  By category:");
        for entry in &report.by_category {
            println!(
                "    {:<16} {}",
                truncate(&entry.category, 16),
                format_brl(entry.total)
            );
        }
    }
    println!();
    Ok(())
}
