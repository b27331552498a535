use std::convert::Infallible;

use warp::http::StatusCode;
use warp::reject::Reject;
use warp::{Rejection, Reply};

use crate::application::AppError;

use super::requests::ErrorResponse;

pub const INVALID_AMOUNT_MSG: &str = "Invalid amount";
pub const INSUFFICIENT_BALANCE_MSG: &str = "Insufficient balance";
pub const INVALID_BODY_MSG: &str = "Invalid request body";
pub const INTERNAL_ERROR_MSG: &str = "Internal server error";

#[derive(Debug)]
pub struct WebServiceAppError(pub AppError);

impl Reject for WebServiceAppError {}

impl WebServiceAppError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match &self.0 {
            AppError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, INVALID_AMOUNT_MSG),
            AppError::InsufficientFunds { .. } => {
                (StatusCode::BAD_REQUEST, INSUFFICIENT_BALANCE_MSG)
            }
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MSG),
        }
    }
}

/// Turns every rejection into a JSON `{ "error": ... }` body.
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found")
    } else if let Some(app_err) = err.find::<WebServiceAppError>() {
        if let AppError::Storage(e) = &app_err.0 {
            log::error!("{:#}", e);
        }
        app_err.status_and_message()
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        log::warn!("Rejected request body: {}", e);
        (StatusCode::BAD_REQUEST, INVALID_BODY_MSG)
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "Payload too large")
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported media type")
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MSG)
    };

    let body = warp::reply::json(&ErrorResponse {
        error: message.to_string(),
    });
    Ok(warp::reply::with_status(body, status))
}
