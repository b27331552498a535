use super::{Cents, Transaction, TransactionKind};

/// Compute the ledger balance from a list of transactions.
/// Balance = sum of credits - sum of debits
pub fn compute_balance(transactions: &[Transaction]) -> Result<Cents, BalanceOverflow> {
    transactions.iter().try_fold(0, |balance: Cents, transaction| {
        balance
            .checked_add(transaction.signed_amount())
            .ok_or(BalanceOverflow)
    })
}

/// Sum of the amounts of a single kind.
pub fn total_of_kind(
    kind: TransactionKind,
    transactions: &[Transaction],
) -> Result<Cents, BalanceOverflow> {
    transactions
        .iter()
        .filter(|t| t.kind == kind)
        .try_fold(0, |total: Cents, t| {
            total.checked_add(t.amount).ok_or(BalanceOverflow)
        })
}

/// The transactions sum to more than a `Cents` can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceOverflow;

impl std::fmt::Display for BalanceOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ledger balance overflows")
    }
}

impl std::error::Error for BalanceOverflow {}

/// Order transactions by timestamp, most recent first.
/// Transactions sharing a timestamp keep reverse insertion order, so the last one
/// appended is listed first.
pub fn sort_most_recent_first(mut transactions: Vec<Transaction>) -> Vec<Transaction> {
    transactions.reverse();
    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    transactions
}

/// Check that a withdrawal of `amount` is covered by `balance`.
pub fn validate_withdrawal(balance: Cents, amount: Cents) -> Result<(), WithdrawalError> {
    if amount > balance {
        return Err(WithdrawalError::InsufficientFunds {
            balance,
            requested: amount,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalError {
    InsufficientFunds { balance: Cents, requested: Cents },
}

impl std::fmt::Display for WithdrawalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WithdrawalError::InsufficientFunds { balance, requested } => write!(
                f,
                "Cannot withdraw {} with a balance of {}",
                super::format_cents(*requested),
                super::format_cents(*balance)
            ),
        }
    }
}

impl std::error::Error for WithdrawalError {}
