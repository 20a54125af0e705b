use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use cart_engine::{CartApiError, OrderApiError};
use log::*;
use thiserror::Error;

use crate::envelope::Envelope;

const GENERIC_SERVER_ERROR: &str = "Something went wrong in our servers!";

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    NoRecordFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Content type must be application/json. {0}")]
    UnsupportedMediaType(String),
    #[error("{message}")]
    UpstreamUnavailable { message: String, details: String },
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ServerError {
    fn message_and_details(&self) -> (String, Option<String>) {
        match self {
            Self::InvalidInput(msg) |
            Self::InvalidRequestBody(msg) |
            Self::Unauthenticated(msg) |
            Self::NoRecordFound(msg) |
            Self::Conflict(msg) => (msg.clone(), None),
            Self::UnsupportedMediaType(_) => (self.to_string(), None),
            Self::UpstreamUnavailable { message, details } => (message.clone(), Some(details.clone())),
            Self::InitializeError(e) | Self::BackendError(e) | Self::Unspecified(e) => {
                (GENERIC_SERVER_ERROR.to_string(), Some(e.clone()))
            },
            Self::IOError(e) => (GENERIC_SERVER_ERROR.to_string(), Some(e.to_string())),
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::UpstreamUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        }
        let (message, details) = self.message_and_details();
        Envelope::failure(status, &message, details).into_response()
    }
}

impl From<CartApiError> for ServerError {
    fn from(e: CartApiError) -> Self {
        match e {
            CartApiError::InvalidInput(msg) => Self::InvalidInput(msg),
            CartApiError::ProductNotFound(_) => Self::NoRecordFound("Product was not found.".into()),
            CartApiError::CatalogUnavailable(details) => Self::UpstreamUnavailable {
                message: "Something went wrong whilst fetching the product.".into(),
                details,
            },
            CartApiError::CartNotFound(_) => Self::NoRecordFound("Cart not found.".into()),
            CartApiError::ItemNotInCart(_) => Self::NoRecordFound("Product not found in cart.".into()),
            CartApiError::DatabaseError(e) => Self::BackendError(e),
        }
    }
}

impl From<OrderApiError> for ServerError {
    fn from(e: OrderApiError) -> Self {
        match e {
            OrderApiError::InvalidInput(msg) => Self::InvalidInput(msg),
            OrderApiError::CartNotFound(_) => Self::NoRecordFound("Cart was not found.".into()),
            OrderApiError::CartAlreadyOrdered { .. } => Self::Conflict("Cart already exists in an existing order.".into()),
            OrderApiError::CartStoreUnavailable(details) => {
                Self::UpstreamUnavailable { message: "Something went wrong whilst fetching cart.".into(), details }
            },
            OrderApiError::OrderNotFound(_) => Self::NoRecordFound("Order not found.".into()),
            OrderApiError::NoOrdersFound(_) => Self::NoRecordFound("Orders not found.".into()),
            e @ OrderApiError::ForbiddenStatusChange { .. } => Self::Conflict(e.to_string()),
            OrderApiError::DatabaseError(e) => Self::BackendError(e),
        }
    }
}
