use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::{Cents, json_number};

pub type TransactionId = String;

/// Direction of a money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    /// Money entering the ledger (deposit)
    Credit,
    /// Money leaving the ledger (withdrawal)
    Debit,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "CREDIT",
            TransactionKind::Debit => "DEBIT",
        }
    }

    /// Description used when the caller doesn't provide one.
    pub fn default_description(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "Deposit",
            TransactionKind::Debit => "Withdrawal",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction records a single movement of money in or out of the ledger.
/// Transactions are immutable: they are never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub description: String,
    pub kind: TransactionKind,
    /// Amount in cents (always positive)
    #[serde(with = "json_number")]
    pub amount: Cents,
    /// When the transaction was recorded, kept at millisecond precision
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction carrying the kind's default description.
    pub fn new(
        id: impl Into<TransactionId>,
        kind: TransactionKind,
        amount: Cents,
        timestamp: DateTime<Utc>,
    ) -> Self {
        assert!(amount > 0, "Transaction amount must be positive");
        Self {
            id: id.into(),
            description: kind.default_description().to_string(),
            kind,
            amount,
            timestamp: timestamp.trunc_subsecs(3),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Amount with the sign it contributes to the balance.
    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            TransactionKind::Credit => self.amount,
            TransactionKind::Debit => -self.amount,
        }
    }
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix.
mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
