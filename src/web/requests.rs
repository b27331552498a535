use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Cents, json_number, parse_cents};

/// Body of `POST /deposit` and `POST /withdraw`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TransactionRequest {
    #[serde(default)]
    pub description: Option<String>,
    /// Kept loose so that a wrong type reads as an invalid amount, not a malformed body
    #[serde(default)]
    pub amount: Option<Value>,
}

impl TransactionRequest {
    /// The requested amount in cents, if it's a number or a numeric string.
    pub fn amount_cents(&self) -> Option<Cents> {
        match self.amount.as_ref()? {
            Value::Number(n) => parse_cents(&n.to_string()).ok(),
            Value::String(s) => parse_cents(s).ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    #[serde(with = "json_number")]
    pub balance: Cents,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
