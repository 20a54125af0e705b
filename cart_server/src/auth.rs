//! Caller identity.
//!
//! Tokens are verified by the gateway in front of this service. The gateway forwards the user id in the
//! `X-User-Id` header and passes the original `Authorization` header through untouched, so that the bearer token can
//! be forwarded to a remote cart service.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, FromRequest, HttpRequest};
use cart_engine::{cart_source::Credentials, db_types::UserId};
use log::*;

use crate::errors::ServerError;

pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    access_token: String,
}

impl AuthenticatedUser {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.user_id.clone(), &self.access_token)
    }

    fn from_headers(req: &HttpRequest) -> Result<Self, ServerError> {
        let user_id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| UserId::from(s.trim()))
            .filter(|id| !id.is_blank())
            .ok_or_else(|| {
                debug!("💻️ Request to {} carried no user identity", req.path());
                ServerError::Unauthenticated("Access denied. No user identity was provided.".into())
            })?;
        // A missing token is not an error here. Only a remote cart service needs it, and it will refuse the call.
        let access_token = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        Ok(Self { user_id, access_token })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_headers(req))
    }
}
