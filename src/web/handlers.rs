//! Handler functions

use std::convert::Infallible;
use std::sync::Arc;

use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::application::{AppError, LedgerService};

use super::errors::WebServiceAppError;
use super::requests::{BalanceResponse, HealthResponse, TransactionRequest};

fn reject(err: AppError) -> Rejection {
    warp::reject::custom(WebServiceAppError(err))
}

/// The `health` handler
///
/// GET / and GET /health
pub async fn health() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&HealthResponse { status: "ok" }))
}

/// The `balance` handler
///
/// Responds with the current balance.
///
/// GET /balance
pub async fn balance(service: Arc<LedgerService>) -> Result<impl Reply, Rejection> {
    log::debug!("balance");
    match service.get_balance().await {
        Ok(balance) => Ok(warp::reply::json(&BalanceResponse { balance })),
        Err(err) => Err(reject(err)),
    }
}

/// The `transactions` handler
///
/// Responds with the entire ledger, most recent transaction first.
///
/// GET /transactions
pub async fn transactions(service: Arc<LedgerService>) -> Result<impl Reply, Rejection> {
    log::debug!("transactions");
    match service.list_transactions().await {
        Ok(transactions) => Ok(warp::reply::json(&transactions)),
        Err(err) => Err(reject(err)),
    }
}

/// The `deposit` handler
///
/// POST /deposit
pub async fn deposit(
    request: TransactionRequest,
    service: Arc<LedgerService>,
) -> Result<impl Reply, Rejection> {
    log::debug!("deposit; request = {:?}", request);
    let amount = request.amount_cents();
    match service.deposit(request.description, amount).await {
        Ok(tx) => Ok(warp::reply::with_status(
            warp::reply::json(&tx),
            StatusCode::CREATED,
        )),
        Err(err) => Err(reject(err)),
    }
}

/// The `withdraw` handler
///
/// POST /withdraw
pub async fn withdraw(
    request: TransactionRequest,
    service: Arc<LedgerService>,
) -> Result<impl Reply, Rejection> {
    log::debug!("withdraw; request = {:?}", request);
    let amount = request.amount_cents();
    match service.withdraw(request.description, amount).await {
        Ok(tx) => Ok(warp::reply::with_status(
            warp::reply::json(&tx),
            StatusCode::CREATED,
        )),
        Err(err) => Err(reject(err)),
    }
}
