use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, OrderForm};
use serde_json::Value;
use tower::ServiceExt;

const BASE: &str = "/api/checkout/pub";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn with_cookie(mut request: Request<String>, cookie: &str) -> Request<String> {
    request
        .headers_mut()
        .insert(http::header::COOKIE, cookie.parse().unwrap());
    request
}

// --- order form ---

#[tokio::test]
async fn order_form_is_created_with_cookie() {
    let resp = app()
        .oneshot(json_request("POST", &format!("{BASE}/orderForm"), "{}"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .headers()
        .get(http::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let form: OrderForm = body_json(resp).await;
    assert!(!form.order_form_id.is_empty());
    assert!(cookie.starts_with(&format!("checkout.vtex.com=__ofid={}", form.order_form_id)));
    assert!(form.items.is_empty());
}

#[tokio::test]
async fn order_form_unknown_cookie_creates_new() {
    let resp = app()
        .oneshot(with_cookie(
            json_request("POST", &format!("{BASE}/orderForm"), "{}"),
            "checkout.vtex.com=__ofid=missing;vtex_segment=;vtex_session=;",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let form: OrderForm = body_json(resp).await;
    assert_ne!(form.order_form_id, "missing");
}

// --- items ---

#[tokio::test]
async fn add_items_unknown_order_form_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("{BASE}/orderForm/nope/items"),
            r#"{"orderItems":[{"id":"1","quantity":1,"seller":"1"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"]["message"], "orderForm not found");
}

#[tokio::test]
async fn add_items_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("{BASE}/orderForm/nope/items"),
            r#"{"items":[]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- simulation ---

#[tokio::test]
async fn simulation_prices_items_in_order() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("{BASE}/orderForms/simulation?sc=2"),
            r#"{"country":"BR","items":[{"id":"b","quantity":"3","seller":"1"},{"id":"a","quantity":1,"seller":"1"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["salesChannel"], "2");
    assert_eq!(body["items"][0]["id"], "b");
    assert_eq!(body["items"][0]["quantity"], 3);
    assert_eq!(body["items"][1]["id"], "a");
    assert_eq!(body["items"][1]["requestIndex"], 1);
}

#[tokio::test]
async fn simulation_rejects_bad_quantity() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("{BASE}/orderForms/simulation"),
            r#"{"country":"BR","items":[{"id":"a","quantity":"many","seller":"1"}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- orders ---

#[tokio::test]
async fn orders_start_empty() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri(format!("{BASE}/orders"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let orders: Vec<Value> = body_json(resp).await;
    assert!(orders.is_empty());
}

#[tokio::test]
async fn cancel_unknown_order_returns_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            &format!("{BASE}/orders/nope/user-cancel-request"),
            r#"{"reason":"x"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(!body_bytes(resp).await.is_empty());
}

// --- full cart lifecycle ---

#[tokio::test]
async fn cart_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // Create.
    let req = json_request("POST", &format!("{BASE}/orderForm"), "{}");
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    let form: OrderForm = body_json(resp).await;
    let id = form.order_form_id;

    // Add an item on channel 3.
    let req = json_request(
        "POST",
        &format!("{BASE}/orderForm/{id}/items?sc=3"),
        r#"{"orderItems":[{"id":"sku1","quantity":2,"seller":"1"}]}"#,
    );
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let form: OrderForm = body_json(resp).await;
    assert_eq!(form.sales_channel, "3");
    assert_eq!(form.items.len(), 1);
    assert_eq!(form.items[0].quantity, 2);

    // Attach and detach an assembly option; DELETE carries the body.
    let option = r#"{"composition":{"items":[{"id":"gift","quantity":1,"seller":"1"}]}}"#;
    let req = json_request(
        "POST",
        &format!("{BASE}/orderForm/{id}/items/0/assemblyOptions/wrap"),
        option,
    );
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    let form: OrderForm = body_json(resp).await;
    assert_eq!(form.items[0].assembly_options.len(), 1);

    let req = json_request(
        "DELETE",
        &format!("{BASE}/orderForm/{id}/items/0/assemblyOptions/wrap"),
        option,
    );
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let form: OrderForm = body_json(resp).await;
    assert!(form.items[0].assembly_options.is_empty());

    // Invalid coupon leaves a message; clearing removes it.
    let req = json_request("POST", &format!("{BASE}/orderForm/{id}/coupons"), r#"{"text":"BOGUS"}"#);
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    let form: OrderForm = body_json(resp).await;
    assert_eq!(form.messages.len(), 1);

    let req = json_request("POST", &format!("{BASE}/orderForm/{id}/messages/clear"), "{}");
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    let form: OrderForm = body_json(resp).await;
    assert!(form.messages.is_empty());

    // Remove the item by setting quantity to zero.
    let req = json_request(
        "POST",
        &format!("{BASE}/orderForm/{id}/items/update"),
        r#"{"orderItems":[{"index":0,"quantity":0}]}"#,
    );
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    let form: OrderForm = body_json(resp).await;
    assert!(form.items.is_empty());

    // Cancel, then it shows up in orders.
    let req = json_request(
        "POST",
        &format!("{BASE}/orders/{id}/user-cancel-request"),
        r#"{"reason":"test"}"#,
    );
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::builder()
        .uri(format!("{BASE}/orders"))
        .body(String::new())
        .unwrap();
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(req)
        .await
        .unwrap();
    let orders: Vec<Value> = body_json(resp).await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["orderId"], id.as_str());
    assert_eq!(orders[0]["reason"], "test");
}
