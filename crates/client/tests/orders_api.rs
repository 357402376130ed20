use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chrono::Utc;
use stockflow_client::{ClientError, OrderFilter, OrderServiceClient};
use stockflow_core::{CompanyId, LineItemId, OrderId, ProductId, UserId};
use stockflow_orders::{
    line_subtotal, CompanyRef, CreateOrder, NewLineItem, ProductRef, PurchaseOrderStatus,
    ReceiptLine, UserRef,
};

fn create_payload() -> CreateOrder {
    CreateOrder {
        po_number: "PO-1".to_string(),
        company: CompanyRef::by_id(CompanyId::new(1)),
        created_by: UserRef {
            id: UserId::new(7),
        },
        supplier: "Beans Inc".to_string(),
        order_date: Utc::now(),
        expected_delivery_date: None,
        status: PurchaseOrderStatus::Pending,
        notes: None,
        items: vec![NewLineItem {
            product: ProductRef::by_id(ProductId::new(5)),
            quantity: 10,
            unit_price: dec!(2.5),
            subtotal: line_subtotal(10, dec!(2.5)),
            received_quantity: 0,
        }],
    }
}

fn order_body(status: &str, received: i64) -> serde_json::Value {
    json!({
        "id": 9,
        "poNumber": "PO-1",
        "company": {"id": 1, "name": "Acme"},
        "createdBy": {"id": 7},
        "supplier": "Beans Inc",
        "orderDate": "2026-01-05T00:00:00Z",
        "status": status,
        "items": [{
            "id": 100,
            "product": {"id": 5, "name": "Beans"},
            "quantity": 10,
            "unitPrice": 2.5,
            "subtotal": 25.0,
            "receivedQuantity": received
        }],
        "totalAmount": 25.0
    })
}

#[tokio::test]
async fn create_order_posts_full_item_list_and_decodes_total() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/purchase-orders"))
        .and(body_partial_json(json!({
            "poNumber": "PO-1",
            "company": {"id": 1},
            "createdBy": {"id": 7},
            "items": [{"product": {"id": 5}, "quantity": 10, "receivedQuantity": 0}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(order_body("PENDING", 0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = OrderServiceClient::new(server.uri());
    let created = client.create_order(&create_payload()).await.unwrap();

    assert_eq!(created.id, OrderId::new(9));
    assert_eq!(created.total_amount, dec!(25.00));
    assert_eq!(created.items_total(), dec!(25.00));
}

#[tokio::test]
async fn delete_of_non_pending_order_surfaces_business_rule() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/purchase-orders/9"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("Can only delete PENDING purchase orders"),
        )
        .mount(&server)
        .await;

    let client = OrderServiceClient::new(server.uri());
    let err = client.delete_order(OrderId::new(9)).await.unwrap_err();

    assert!(err.is_business_rule());
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("PENDING"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn receive_inventory_sends_batch_and_returns_refreshed_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/purchase-orders/9/receive-inventory"))
        .and(body_partial_json(json!([{"itemId": 100, "quantity": 4}])))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_body("PENDING", 4)))
        .expect(1)
        .mount(&server)
        .await;

    let client = OrderServiceClient::new(server.uri());
    let refreshed = client
        .receive_inventory(
            OrderId::new(9),
            &[ReceiptLine {
                item_id: LineItemId::new(100),
                quantity: 4,
            }],
        )
        .await
        .unwrap();

    // quantity 10, received 4 after the server applied the batch.
    assert_eq!(refreshed.items[0].remaining(), 6);
    assert!(refreshed.is_pending());
}

#[tokio::test]
async fn list_orders_passes_company_and_status_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/purchase-orders"))
        .and(query_param("companyId", "1"))
        .and(query_param("status", "PENDING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([order_body("PENDING", 0)])))
        .expect(1)
        .mount(&server)
        .await;

    let client = OrderServiceClient::new(server.uri());
    let orders = client
        .list_orders(OrderFilter {
            company_id: Some(CompanyId::new(1)),
            status: Some(PurchaseOrderStatus::Pending),
        })
        .await
        .unwrap();

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].po_number, "PO-1");
}

#[tokio::test]
async fn requests_carry_bearer_token_and_request_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/purchase-orders/9"))
        .and(wiremock::matchers::header("authorization", "Bearer tok-1"))
        .and(header_exists("x-request-id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_body("PENDING", 0)))
        .expect(1)
        .mount(&server)
        .await;

    let client = OrderServiceClient::with_token(server.uri(), "tok-1");
    client.get_order(OrderId::new(9)).await.unwrap();
}

#[tokio::test]
async fn reference_data_endpoints_decode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "name": "Beans", "company": {"id": 1, "name": "Acme"}}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/companies"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Acme"}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/7/companies"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Acme"}])),
        )
        .mount(&server)
        .await;

    let client = OrderServiceClient::new(server.uri());
    assert_eq!(client.list_products().await.unwrap().len(), 1);
    assert_eq!(client.list_companies().await.unwrap().len(), 1);
    assert_eq!(
        client.user_companies(UserId::new(7)).await.unwrap()[0].name,
        "Acme"
    );
}
