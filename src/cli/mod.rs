use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::TrackerService;
use crate::domain::{TransactionKind, format_cents, parse_cents};
use crate::io::Importer;

/// Tally - Income and outcome tracker
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A local-first income and outcome tracker for the command line")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "tally.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Record a new transaction
    Add {
        /// Transaction title
        title: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Transaction kind: income or outcome
        #[arg(short = 't', long = "type")]
        kind: String,

        /// Category title (created on first use)
        #[arg(short, long)]
        category: String,
    },

    /// Show the current balance
    Balance {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recorded transactions
    Transactions {
        /// Maximum number of transactions to show (most recent last)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List categories
    Categories,

    /// Import transactions from a CSV file in the upload directory
    Import {
        /// File name inside the upload directory
        file_name: String,

        /// Directory where uploaded CSV files are placed
        #[arg(long, default_value = "uploads")]
        upload_dir: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                TrackerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Add {
                title,
                amount,
                kind,
                category,
            } => {
                let service = TrackerService::connect(&self.database).await?;
                let kind: TransactionKind = kind.parse()?;
                let value_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;

                let result = service
                    .create_transaction(title, kind, value_cents, category)
                    .await?;

                println!(
                    "Recorded {}: {} \"{}\" in {} ({})",
                    result.transaction.kind,
                    format_cents(result.transaction.value_cents),
                    result.transaction.title,
                    result.category.title,
                    result.transaction.id
                );
            }

            Commands::Balance { json } => {
                let service = TrackerService::connect(&self.database).await?;
                let balance = service.get_balance().await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&balance)?);
                } else {
                    println!("Income:  {:>12}", format_cents(balance.income));
                    println!("Outcome: {:>12}", format_cents(balance.outcome));
                    println!("Total:   {:>12}", format_cents(balance.total));
                }
            }

            Commands::Transactions { limit, json } => {
                let service = TrackerService::connect(&self.database).await?;
                run_transactions_command(&service, limit, json).await?;
            }

            Commands::Categories => {
                let service = TrackerService::connect(&self.database).await?;
                let categories = service.list_categories().await?;

                if categories.is_empty() {
                    println!("No categories found.");
                } else {
                    for category in categories {
                        println!("{}", category.title);
                    }
                }
            }

            Commands::Import {
                file_name,
                upload_dir,
            } => {
                let service = TrackerService::connect(&self.database).await?;
                let importer = Importer::new(&service, upload_dir);
                let transactions = importer.import(&file_name).await?;

                println!(
                    "Imported {} transaction(s) from {}",
                    transactions.len(),
                    file_name
                );
            }
        }

        Ok(())
    }
}

async fn run_transactions_command(
    service: &TrackerService,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut transactions = service.list_transactions().await?;
    if let Some(limit) = limit {
        let skip = transactions.len().saturating_sub(limit);
        transactions.drain(..skip);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&transactions)?);
        return Ok(());
    }

    if transactions.is_empty() {
        println!("No transactions found.");
        return Ok(());
    }

    let category_titles = service.get_category_titles().await?;

    println!(
        "{:<12} {:<24} {:<8} {:>12}  {}",
        "DATE", "TITLE", "KIND", "VALUE", "CATEGORY"
    );
    println!("{}", "-".repeat(70));
    for transaction in transactions {
        let category = category_titles
            .get(&transaction.category_id)
            .map(String::as_str)
            .unwrap_or("?");
        println!(
            "{:<12} {:<24} {:<8} {:>12}  {}",
            transaction.created_at.date_naive().to_string(),
            transaction.title,
            transaction.kind,
            format_cents(transaction.value_cents),
            category
        );
    }

    Ok(())
}
