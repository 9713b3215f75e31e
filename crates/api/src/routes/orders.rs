//! Order lifecycle endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{ItemId, Money, OrderId};
use domain::{
    ConfirmOrder, CreateOrder, MarkDelivered, OrderService, PartnerCancelOrder, ReceiveOrder,
    ShipOrder, UserCancelOrder,
};
use order_store::{OrderRecord, OrderStore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{Actor, Buyer, Partner};
use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: OrderStore> {
    pub orders: OrderService<S>,
}

// -- Request types --

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub item_id: Uuid,
    pub price_cents: i64,
}

#[derive(Deserialize)]
pub struct ShipOrderRequest {
    pub waybill_number: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub buyer_id: String,
    pub partner_id: String,
    pub item_id: String,
    pub price_cents: i64,
    pub state: String,
    pub waybill_number: Option<String>,
}

impl From<OrderRecord> for OrderResponse {
    fn from(record: OrderRecord) -> Self {
        Self {
            id: record.id.to_string(),
            buyer_id: record.buyer_id.to_string(),
            partner_id: record.partner_id.to_string(),
            item_id: record.item_id.to_string(),
            price_cents: record.price.cents(),
            state: record.state.to_string(),
            waybill_number: record.waybill_number,
        }
    }
}

// -- Handlers --

/// POST /orders — place a new order (buyer).
#[tracing::instrument(skip(state, req))]
pub async fn create<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Buyer(buyer_id): Buyer,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let cmd = CreateOrder::for_buyer(
        buyer_id,
        ItemId::from_uuid(req.item_id),
        Money::from_cents(req.price_cents),
    );
    let order = state.orders.create_order(cmd).await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// GET /orders/:id — load an order by ID.
#[tracing::instrument(skip(state))]
pub async fn get<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .get_order(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {id} not found")))?;

    Ok(Json(order.into()))
}

/// GET /orders/incoming — the partner's orders awaiting receipt.
#[tracing::instrument(skip(state))]
pub async fn incoming<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Partner(partner_id): Partner,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.orders.orders_awaiting_receipt(partner_id).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// POST /orders/:id/cancel — cancel as whichever side the caller is on.
#[tracing::instrument(skip(state))]
pub async fn cancel<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    actor: Actor,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;

    let order = match actor {
        Actor::Buyer(buyer_id) => {
            state
                .orders
                .user_cancel(UserCancelOrder::new(order_id, buyer_id))
                .await?
        }
        Actor::Partner(partner_id) => {
            state
                .orders
                .partner_cancel(PartnerCancelOrder::new(order_id, partner_id))
                .await?
        }
    };

    Ok(Json(order.into()))
}

/// POST /orders/:id/receive — acknowledge receipt (partner).
#[tracing::instrument(skip(state))]
pub async fn receive<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Partner(partner_id): Partner,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .receive_order(ReceiveOrder::new(order_id, partner_id))
        .await?;

    Ok(Json(order.into()))
}

/// POST /orders/:id/ship — start delivery with a waybill number (partner).
#[tracing::instrument(skip(state, req))]
pub async fn ship<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Partner(partner_id): Partner,
    Json(req): Json<ShipOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .ship_order(ShipOrder::new(order_id, partner_id, req.waybill_number))
        .await?;

    Ok(Json(order.into()))
}

/// POST /orders/:id/delivered — mark the shipment delivered (partner).
#[tracing::instrument(skip(state))]
pub async fn delivered<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Partner(partner_id): Partner,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .mark_delivered(MarkDelivered::new(order_id, partner_id))
        .await?;

    Ok(Json(order.into()))
}

/// POST /orders/:id/confirm — confirm a delivered order (buyer).
#[tracing::instrument(skip(state))]
pub async fn confirm<S: OrderStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Buyer(buyer_id): Buyer,
) -> Result<Json<OrderResponse>, ApiError> {
    let order_id = parse_order_id(&id)?;
    let order = state
        .orders
        .confirm_order(ConfirmOrder::new(order_id, buyer_id))
        .await?;

    Ok(Json(order.into()))
}

fn parse_order_id(id: &str) -> Result<OrderId, ApiError> {
    let uuid = Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(OrderId::from_uuid(uuid))
}
