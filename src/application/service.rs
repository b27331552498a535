use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{
    BalanceOverflow, Cents, Clock, IdGenerator, MAX_CENTS, SystemClock, Transaction,
    TransactionKind, UuidGenerator, compute_balance, format_cents, sort_most_recent_first,
    validate_withdrawal,
};
use crate::storage::Repository;

use super::AppError;

/// Application service providing the ledger's operations.
/// This is the primary interface for any client (HTTP, CLI, ...).
///
/// No lock is taken between reading the balance and appending a withdrawal:
/// concurrent writers may lose updates or overdraw the ledger.
pub struct LedgerService {
    repo: Repository,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    /// Create a new ledger service with random ids and the system clock.
    pub fn new(repo: Repository) -> Self {
        Self::with_sources(repo, Arc::new(UuidGenerator), Arc::new(SystemClock))
    }

    /// Create a ledger service with custom id and time sources.
    pub fn with_sources(
        repo: Repository,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { repo, ids, clock }
    }

    /// Open the ledger at the given path, creating the file if it doesn't exist.
    pub async fn init(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let repo = Repository::init(path).await?;
        Ok(Self::new(repo))
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Current balance: credits minus debits over the whole history.
    pub async fn get_balance(&self) -> Result<Cents, AppError> {
        let transactions = self.repo.list_transactions().await?;
        let balance = compute_balance(&transactions)?;
        if balance.unsigned_abs() > MAX_CENTS as u64 {
            return Err(BalanceOverflow.into());
        }
        Ok(balance)
    }

    /// All transactions, most recent first.
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        let transactions = self.repo.list_transactions().await?;
        Ok(sort_most_recent_first(transactions))
    }

    /// Record a deposit (CREDIT), refused if it would take the balance past `MAX_CENTS`.
    pub async fn deposit(
        &self,
        description: Option<String>,
        amount: Option<Cents>,
    ) -> Result<Transaction, AppError> {
        let amount =
            validate_amount(amount).inspect_err(|e| log::warn!("Deposit refused: {}", e))?;

        let balance = self.get_balance().await?;
        if balance.checked_add(amount).is_none_or(|total| total > MAX_CENTS) {
            let err = AppError::InvalidAmount(format!(
                "Deposit of {} would take the balance of {} past {}",
                format_cents(amount),
                format_cents(balance),
                format_cents(MAX_CENTS)
            ));
            log::warn!("Deposit refused: {}", err);
            return Err(err);
        }

        self.record(TransactionKind::Credit, description, amount)
            .await
    }

    /// Record a withdrawal (DEBIT), refused if it exceeds the current balance.
    pub async fn withdraw(
        &self,
        description: Option<String>,
        amount: Option<Cents>,
    ) -> Result<Transaction, AppError> {
        let amount =
            validate_amount(amount).inspect_err(|e| log::warn!("Withdrawal refused: {}", e))?;

        let balance = self.get_balance().await?;
        validate_withdrawal(balance, amount)
            .inspect_err(|e| log::warn!("Withdrawal refused: {}", e))?;

        self.record(TransactionKind::Debit, description, amount)
            .await
    }

    async fn record(
        &self,
        kind: TransactionKind,
        description: Option<String>,
        amount: Cents,
    ) -> Result<Transaction, AppError> {
        let mut transaction = Transaction::new(self.ids.next_id(), kind, amount, self.clock.now());
        if let Some(desc) = description.filter(|d| !d.is_empty()) {
            transaction = transaction.with_description(desc);
        }

        self.repo.append_transaction(&transaction).await?;

        log::info!(
            "Recorded {} {} of {} ({})",
            transaction.kind,
            transaction.id,
            format_cents(transaction.amount),
            transaction.description
        );
        Ok(transaction)
    }
}

/// An amount must be present, strictly positive and at most `MAX_CENTS`.
fn validate_amount(amount: Option<Cents>) -> Result<Cents, AppError> {
    match amount {
        None => Err(AppError::InvalidAmount("Amount is required".to_string())),
        Some(cents) if cents <= 0 => Err(AppError::InvalidAmount(
            "Amount must be positive".to_string(),
        )),
        Some(cents) if cents > MAX_CENTS => Err(AppError::InvalidAmount(format!(
            "Amount must not exceed {}",
            format_cents(MAX_CENTS)
        ))),
        Some(cents) => Ok(cents),
    }
}
