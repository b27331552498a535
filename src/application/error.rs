use thiserror::Error;

use crate::domain::{BalanceOverflow, Cents, WithdrawalError, format_cents};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient funds: balance {}, required {}", money(.balance), money(.required))]
    InsufficientFunds { balance: Cents, required: Cents },

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl From<WithdrawalError> for AppError {
    fn from(err: WithdrawalError) -> Self {
        match err {
            WithdrawalError::InsufficientFunds { balance, requested } => {
                AppError::InsufficientFunds {
                    balance,
                    required: requested,
                }
            }
        }
    }
}

impl From<BalanceOverflow> for AppError {
    fn from(err: BalanceOverflow) -> Self {
        AppError::Storage(anyhow::Error::new(err).context("Ledger file holds an unusable balance"))
    }
}

fn money(cents: &Cents) -> String {
    format_cents(*cents)
}
