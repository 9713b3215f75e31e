//! Actor identity extraction.
//!
//! The authentication collaborator lives upstream; by the time a request
//! reaches this service the gateway has resolved the session and injected
//! the caller's identity as a header. This module is the narrow interface
//! to that collaborator: extractors that read the identity headers and
//! nothing else. Credentials never reach this service.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use common::{BuyerId, PartnerId};
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the authenticated buyer's id.
pub const BUYER_ID_HEADER: &str = "x-buyer-id";

/// Header carrying the authenticated partner's id.
pub const PARTNER_ID_HEADER: &str = "x-partner-id";

/// The authenticated caller, either side of the marketplace.
#[derive(Debug, Clone, Copy)]
pub enum Actor {
    Buyer(BuyerId),
    Partner(PartnerId),
}

fn header_uuid(parts: &Parts, name: &'static str) -> Result<Option<Uuid>, ApiError> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiError::BadRequest(format!("invalid {name} header")))?;
    let uuid = Uuid::parse_str(value)
        .map_err(|e| ApiError::BadRequest(format!("invalid {name} header: {e}")))?;
    Ok(Some(uuid))
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let buyer = header_uuid(parts, BUYER_ID_HEADER)?;
        let partner = header_uuid(parts, PARTNER_ID_HEADER)?;

        match (buyer, partner) {
            (Some(b), None) => Ok(Actor::Buyer(BuyerId::from_uuid(b))),
            (None, Some(p)) => Ok(Actor::Partner(PartnerId::from_uuid(p))),
            (Some(_), Some(_)) => Err(ApiError::BadRequest(
                "request carries both buyer and partner identity".to_string(),
            )),
            (None, None) => Err(ApiError::Unauthorized),
        }
    }
}

/// Extractor for routes only a buyer may call.
#[derive(Debug, Clone, Copy)]
pub struct Buyer(pub BuyerId);

impl<S> FromRequestParts<S> for Buyer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Actor::from_request_parts(parts, state).await? {
            Actor::Buyer(id) => Ok(Buyer(id)),
            Actor::Partner(_) => Err(ApiError::Forbidden("buyer identity required".to_string())),
        }
    }
}

/// Extractor for routes only a partner may call.
#[derive(Debug, Clone, Copy)]
pub struct Partner(pub PartnerId);

impl<S> FromRequestParts<S> for Partner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Actor::from_request_parts(parts, state).await? {
            Actor::Partner(id) => Ok(Partner(id)),
            Actor::Buyer(_) => Err(ApiError::Forbidden("partner identity required".to_string())),
        }
    }
}
