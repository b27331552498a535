//! HTTP front end of the ledger.

pub mod errors;
pub mod handlers;
pub mod requests;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use warp::{Filter, Rejection, Reply};

use crate::application::LedgerService;

pub use requests::*;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: u64 = 1024 * 16;

fn with_service(
    service: Arc<LedgerService>,
) -> impl Filter<Extract = (Arc<LedgerService>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

/// All routes, with JSON error recovery and request logging.
pub fn routes(
    service: Arc<LedgerService>,
) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
    api(service)
        .recover(errors::handle_rejection)
        .with(warp::log("tally"))
}

fn api(
    service: Arc<LedgerService>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path::end()
        .or(warp::path!("health"))
        .unify()
        .and(warp::get())
        .and_then(handlers::health);

    let balance = warp::path!("balance")
        .and(warp::get())
        .and(with_service(service.clone()))
        .and_then(handlers::balance);

    let transactions = warp::path!("transactions")
        .and(warp::get())
        .and(with_service(service.clone()))
        .and_then(handlers::transactions);

    let deposit = warp::path!("deposit")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_service(service.clone()))
        .and_then(handlers::deposit);

    let withdraw = warp::path!("withdraw")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_service(service))
        .and_then(handlers::withdraw);

    health.or(balance).or(transactions).or(deposit).or(withdraw)
}

/// Serve the API until the process is stopped.
pub async fn serve(service: Arc<LedgerService>, addr: SocketAddr) {
    log::info!(
        "Ledger API listening on http://{} (ledger file: {})",
        addr,
        service.repository().path().display()
    );
    warp::serve(routes(service)).run(addr).await;
}
