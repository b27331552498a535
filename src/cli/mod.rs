use std::env;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::LedgerService;
use crate::domain::{
    Transaction, TransactionKind, format_cents, parse_cents, total_of_kind,
};
use crate::storage::DEFAULT_DATA_FILE;

/// Default port for the HTTP API
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address for the HTTP API
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Tally - a single-account ledger backed by a JSON file
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Records deposits and withdrawals in a JSON file and serves them over HTTP")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(short = 'f', long, env = "LEDGER_DATA_FILE", default_value = DEFAULT_DATA_FILE, global = true)]
    pub data_file: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub serve: ServeArgs,

    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API
    Serve,

    /// Create the ledger file if it doesn't exist
    Init,

    /// Show the current balance
    Balance,

    /// List transactions, most recent first
    Transactions {
        /// Maximum number of transactions to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Record a deposit
    Deposit {
        /// Amount to deposit (e.g., "50.00" or "50")
        amount: String,

        /// Description of the deposit
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Record a withdrawal
    Withdraw {
        /// Amount to withdraw (e.g., "50.00" or "50")
        amount: String,

        /// Description of the withdrawal
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Export the ledger as CSV or a JSON snapshot
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json
        #[arg(long, default_value = "csv")]
        format: String,
    },
}

/// HTTP settings, accepted before or after the `serve` subcommand
#[derive(clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = DEFAULT_HOST, global = true)]
    pub host: IpAddr,
}

impl ServeArgs {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Cli {
    /// Configure `pretty_env_logger`, keeping an explicit `RUST_LOG` if one is set.
    pub fn init_logging(&self) {
        let filter = match env::var("RUST_LOG") {
            Ok(filter) => filter,
            Err(_) if self.verbose => "tally=debug".to_string(),
            Err(_) => "tally=info".to_string(),
        };
        pretty_env_logger::formatted_builder()
            .parse_filters(&filter)
            .init();
    }

    pub async fn run(self) -> Result<()> {
        let service = LedgerService::init(&self.data_file)
            .await
            .with_context(|| format!("Failed to open ledger file {}", self.data_file))?;

        match self.command.unwrap_or(Commands::Serve) {
            Commands::Serve => {
                crate::web::serve(Arc::new(service), self.serve.socket_addr()).await;
            }

            Commands::Init => {
                println!("Ledger initialized: {}", self.data_file);
            }

            Commands::Balance => {
                println!("Balance:     {}", format_cents(service.get_balance().await?));
                if self.verbose {
                    let transactions = service.list_transactions().await?;
                    println!(
                        "Deposits:    {}",
                        format_cents(total_of_kind(TransactionKind::Credit, &transactions)?)
                    );
                    println!(
                        "Withdrawals: {}",
                        format_cents(total_of_kind(TransactionKind::Debit, &transactions)?)
                    );
                }
            }

            Commands::Transactions { limit } => {
                let transactions = service.list_transactions().await?;
                print_transactions(&transactions, limit);
            }

            Commands::Deposit {
                amount,
                description,
            } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let tx = service.deposit(description, Some(amount_cents)).await?;
                println!(
                    "Recorded deposit: {} \"{}\" ({})",
                    format_cents(tx.amount),
                    tx.description,
                    tx.id
                );
            }

            Commands::Withdraw {
                amount,
                description,
            } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let tx = service.withdraw(description, Some(amount_cents)).await?;
                println!(
                    "Recorded withdrawal: {} \"{}\" ({})",
                    format_cents(tx.amount),
                    tx.description,
                    tx.id
                );
            }

            Commands::Export { output, format } => {
                run_export_command(&service, output.as_deref(), &format).await?;
            }
        }

        Ok(())
    }
}

fn print_transactions(transactions: &[Transaction], limit: Option<usize>) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    println!(
        "{:<24} {:<6} {:>12}  {:<24} {}",
        "DATE", "KIND", "AMOUNT", "DESCRIPTION", "ID"
    );
    println!("{}", "-".repeat(100));
    for tx in transactions.iter().take(limit.unwrap_or(usize::MAX)) {
        println!(
            "{:<24} {:<6} {:>12}  {:<24} {}",
            tx.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            tx.kind.as_str(),
            format_cents(tx.signed_amount()),
            tx.description,
            tx.id
        );
    }
}

async fn run_export_command(
    service: &LedgerService,
    output: Option<&str>,
    format: &str,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match format {
        "csv" => {
            let count = exporter.export_transactions_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} transactions", count);
            }
        }
        "json" => {
            let snapshot = exporter.export_snapshot_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported ledger: {} transactions, balance {}",
                    snapshot.transactions.len(),
                    format_cents(snapshot.balance)
                );
            }
        }
        _ => {
            anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format);
        }
    }

    Ok(())
}
