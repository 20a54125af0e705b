//! The uniform response body returned by every endpoint.
use actix_web::{http::StatusCode, HttpResponse};
use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub success: bool,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

fn to_value<T: Serialize>(data: T) -> Value {
    serde_json::to_value(data).unwrap_or_else(|e| {
        error!("💻️ Could not serialize response data. {e}");
        Value::Null
    })
}

impl Envelope {
    pub fn success<T: Serialize>(status: StatusCode, data: T) -> Self {
        Self { success: true, status_code: status.as_u16(), data: Some(to_value(data)), metadata: None, error: None }
    }

    pub fn failure(status: StatusCode, message: &str, details: Option<String>) -> Self {
        let error = ErrorBody { code: status.as_u16(), message: message.to_string(), details: details.map(Value::String) };
        Self { success: false, status_code: status.as_u16(), data: None, metadata: None, error: Some(error) }
    }

    pub fn with_metadata<T: Serialize>(mut self, metadata: T) -> Self {
        self.metadata = Some(to_value(metadata));
        self
    }

    /// Renders the envelope with its own status code as the HTTP status.
    pub fn into_response(self) -> HttpResponse {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.into_response_with_status(status)
    }

    /// Renders the envelope under an HTTP status that differs from the one it reports.
    pub fn into_response_with_status(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}
