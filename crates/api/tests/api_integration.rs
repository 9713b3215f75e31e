//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{BuyerId, ItemId, Money, PartnerId};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{InMemoryOrderStore, ItemRecord};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct Fixture {
    app: Router,
    buyer_id: BuyerId,
    partner_id: PartnerId,
    item_id: ItemId,
}

async fn setup() -> Fixture {
    let store = InMemoryOrderStore::new();
    let buyer_id = BuyerId::new();
    let partner_id = PartnerId::new();
    let item_id = ItemId::new();
    store
        .put_item(ItemRecord::new(
            item_id,
            "Widget",
            Money::from_cents(10_000),
            Some(partner_id),
        ))
        .await;

    let state = api::create_state(store);
    let app = api::create_app(state, get_metrics_handle());

    Fixture {
        app,
        buyer_id,
        partner_id,
        item_id,
    }
}

impl Fixture {
    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    /// Places an order as the fixture buyer and returns its id.
    async fn place_order(&self) -> String {
        let (status, json) = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri("/orders")
                    .header("content-type", "application/json")
                    .header("x-buyer-id", self.buyer_id.to_string())
                    .body(Body::from(
                        serde_json::json!({
                            "item_id": self.item_id.as_uuid(),
                            "price_cents": 10_000
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        json["id"].as_str().unwrap().to_string()
    }

    async fn post_as_partner(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("x-partner-id", self.partner_id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    async fn post_as_buyer(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("x-buyer-id", self.buyer_id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }
}

#[tokio::test]
async fn test_health_check() {
    let fx = setup().await;

    let (status, json) = fx
        .send(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_create_order() {
    let fx = setup().await;

    let (status, json) = fx
        .send(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .header("x-buyer-id", fx.buyer_id.to_string())
                .body(Body::from(
                    serde_json::json!({
                        "item_id": fx.item_id.as_uuid(),
                        "price_cents": 10_000
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["state"], "receiving");
    assert_eq!(json["buyer_id"], fx.buyer_id.to_string());
    assert_eq!(json["partner_id"], fx.partner_id.to_string());
    assert!(json["waybill_number"].is_null());
}

#[tokio::test]
async fn test_create_requires_identity() {
    let fx = setup().await;

    let (status, json) = fx
        .send(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "item_id": fx.item_id.as_uuid(),
                        "price_cents": 10_000
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_create_rejects_partner_identity() {
    let fx = setup().await;

    let (status, _) = fx
        .send(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .header("x-partner-id", fx.partner_id.to_string())
                .body(Body::from(
                    serde_json::json!({
                        "item_id": fx.item_id.as_uuid(),
                        "price_cents": 10_000
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_with_wrong_price_is_rejected() {
    let fx = setup().await;

    let (status, json) = fx
        .send(
            Request::builder()
                .method("POST")
                .uri("/orders")
                .header("content-type", "application/json")
                .header("x-buyer-id", fx.buyer_id.to_string())
                .body(Body::from(
                    serde_json::json!({
                        "item_id": fx.item_id.as_uuid(),
                        "price_cents": 9_999
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn test_get_order() {
    let fx = setup().await;
    let order_id = fx.place_order().await;

    let (status, json) = fx
        .send(
            Request::builder()
                .uri(format!("/orders/{order_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], order_id);
    assert_eq!(json["state"], "receiving");
    assert_eq!(json["price_cents"], 10_000);
}

#[tokio::test]
async fn test_get_unknown_order_is_not_found() {
    let fx = setup().await;

    let (status, _) = fx
        .send(
            Request::builder()
                .uri(format!("/orders/{}", uuid::Uuid::new_v4()))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_order_id_is_bad_request() {
    let fx = setup().await;

    let (status, _) = fx
        .send(
            Request::builder()
                .uri("/orders/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let fx = setup().await;
    let order_id = fx.place_order().await;

    let (status, json) = fx.post_as_partner(&format!("/orders/{order_id}/receive")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "receiptCompleted");

    let (status, json) = fx
        .send(
            Request::builder()
                .method("POST")
                .uri(format!("/orders/{order_id}/ship"))
                .header("content-type", "application/json")
                .header("x-partner-id", fx.partner_id.to_string())
                .body(Body::from(
                    serde_json::json!({ "waybill_number": "X1" }).to_string(),
                ))
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "deliveryProgress");
    assert_eq!(json["waybill_number"], "X1");

    let (status, json) = fx
        .post_as_partner(&format!("/orders/{order_id}/delivered"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "deliveryCompleted");

    let (status, json) = fx.post_as_buyer(&format!("/orders/{order_id}/confirm")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "confirmation");
    assert_eq!(json["waybill_number"], "X1");
}

#[tokio::test]
async fn test_foreign_partner_is_forbidden() {
    let fx = setup().await;
    let order_id = fx.place_order().await;

    let (status, _) = fx
        .send(
            Request::builder()
                .method("POST")
                .uri(format!("/orders/{order_id}/receive"))
                .header("x-partner-id", PartnerId::new().to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cancel_dispatches_on_actor_kind() {
    let fx = setup().await;

    // Buyer cancels a fresh order.
    let order_id = fx.place_order().await;
    let (status, json) = fx.post_as_buyer(&format!("/orders/{order_id}/cancel")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "canceled");

    // Partner cancels after acknowledging.
    let order_id = fx.place_order().await;
    fx.post_as_partner(&format!("/orders/{order_id}/receive"))
        .await;
    let (status, json) = fx
        .post_as_partner(&format!("/orders/{order_id}/cancel"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "canceled");
}

#[tokio::test]
async fn test_user_cancel_after_receipt_conflicts() {
    let fx = setup().await;
    let order_id = fx.place_order().await;
    fx.post_as_partner(&format!("/orders/{order_id}/receive"))
        .await;

    let (status, json) = fx.post_as_buyer(&format!("/orders/{order_id}/cancel")).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("receiptCompleted"));

    // The stored state is untouched.
    let (_, json) = fx
        .send(
            Request::builder()
                .uri(format!("/orders/{order_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(json["state"], "receiptCompleted");
}

#[tokio::test]
async fn test_incoming_lists_orders_awaiting_receipt() {
    let fx = setup().await;
    let first = fx.place_order().await;
    let second = fx.place_order().await;

    fx.post_as_partner(&format!("/orders/{first}/receive")).await;

    let (status, json) = fx
        .send(
            Request::builder()
                .uri("/orders/incoming")
                .header("x-partner-id", fx.partner_id.to_string())
                .body(Body::empty())
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], second);
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    let fx = setup().await;

    let response = fx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
