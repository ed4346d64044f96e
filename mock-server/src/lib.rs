use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const BASE: &str = "/api/checkout/pub";

/// Price charged for every unit in this backend, in cents.
pub const UNIT_PRICE: u64 = 1000;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub quantity: u64,
    pub seller: String,
    pub price: u64,
    #[serde(default)]
    pub assembly_options: Vec<Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub code: String,
    pub text: String,
    pub status: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    pub order_form_id: String,
    pub sales_channel: String,
    pub items: Vec<Item>,
    pub client_profile_data: Option<Value>,
    pub shipping_data: Option<Value>,
    pub payment_data: Option<Value>,
    pub marketing_data: Option<Value>,
    pub custom_data: BTreeMap<String, BTreeMap<String, Value>>,
    pub messages: Vec<Message>,
    pub ignore_profile_data: bool,
    pub is_checked_in: bool,
    pub checked_in_pickup_point_id: Option<String>,
}

#[derive(Default)]
pub struct Store {
    pub order_forms: HashMap<String, OrderForm>,
    pub orders: Vec<Value>,
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

#[derive(Deserialize)]
pub struct ChannelQuery {
    pub sc: Option<String>,
}

#[derive(Deserialize)]
pub struct NewItem {
    pub id: String,
    pub quantity: u64,
    pub seller: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItems {
    pub order_items: Vec<NewItem>,
}

#[derive(Deserialize)]
pub struct ItemUpdate {
    pub index: usize,
    pub quantity: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItems {
    pub order_items: Vec<ItemUpdate>,
}

#[derive(Deserialize)]
pub struct CustomValue {
    pub value: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreProfile {
    pub ignore_profile_data: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkin {
    pub is_checked_in: bool,
    pub pickup_point_id: Option<String>,
}

#[derive(Deserialize)]
pub struct Coupon {
    pub text: String,
}

#[derive(Deserialize)]
pub struct Cancel {
    pub reason: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub country: String,
    pub items: Vec<SimulationItem>,
    pub postal_code: Option<String>,
}

#[derive(Deserialize)]
pub struct SimulationItem {
    pub id: String,
    pub quantity: Value,
    pub seller: String,
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route(&format!("{BASE}/orderForm"), post(order_form))
        .route(&format!("{BASE}/orderForm/{{id}}/items"), post(add_items))
        .route(&format!("{BASE}/orderForm/{{id}}/items/update"), post(update_items))
        .route(
            &format!("{BASE}/orderForm/{{id}}/items/{{index}}/assemblyOptions/{{assembly}}"),
            post(add_assembly).delete(remove_assembly),
        )
        .route(&format!("{BASE}/orderForm/{{id}}/attachments/{{field}}"), post(attachment))
        .route(
            &format!("{BASE}/orderForm/{{id}}/customData/{{app}}/{{field}}"),
            put(custom_data),
        )
        .route(&format!("{BASE}/orderForm/{{id}}/profile"), patch(ignore_profile))
        .route(&format!("{BASE}/orderForm/{{id}}/checkIn"), post(checkin))
        .route(&format!("{BASE}/orderForm/{{id}}/coupons"), post(coupon))
        .route(&format!("{BASE}/orderForm/{{id}}/messages/clear"), post(clear_messages))
        .route(&format!("{BASE}/orders/{{id}}/user-cancel-request"), post(cancel_order))
        .route(&format!("{BASE}/orders"), get(list_orders))
        .route(&format!("{BASE}/orderForms/simulation"), post(simulation))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Order form id pinned by the `checkout.vtex.com=__ofid=<id>;` cookie.
pub fn order_form_id_from_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie = headers.get(header::COOKIE)?.to_str().ok()?;
    let start = cookie.find("__ofid=")? + "__ofid=".len();
    let id = cookie[start..].split(';').next()?;
    (!id.is_empty()).then(|| id.to_string())
}

fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": {"code": "CHK0001", "message": "orderForm not found"}})),
    )
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": {"code": "CHK0002", "message": message}})),
    )
}

/// Apply `change` to a stored order form and return the updated copy.
async fn with_form<F>(db: &Db, id: &str, change: F) -> ApiResult<OrderForm>
where
    F: FnOnce(&mut OrderForm) -> Result<(), (StatusCode, Json<Value>)>,
{
    let mut store = db.write().await;
    let form = store.order_forms.get_mut(id).ok_or_else(not_found)?;
    change(form)?;
    Ok(Json(form.clone()))
}

async fn order_form(State(db): State<Db>, headers: HeaderMap) -> impl IntoResponse {
    let mut store = db.write().await;
    let existing = order_form_id_from_cookie(&headers).and_then(|id| store.order_forms.get(&id).cloned());
    let form = match existing {
        Some(form) => form,
        None => {
            let form = OrderForm {
                order_form_id: Uuid::new_v4().simple().to_string(),
                sales_channel: "1".to_string(),
                ..OrderForm::default()
            };
            store.order_forms.insert(form.order_form_id.clone(), form.clone());
            form
        }
    };
    let cookie = format!("checkout.vtex.com=__ofid={}; Path=/", form.order_form_id);
    ([(header::SET_COOKIE, cookie)], Json(form))
}

async fn add_items(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(query): Query<ChannelQuery>,
    Json(input): Json<AddItems>,
) -> ApiResult<OrderForm> {
    with_form(&db, &id, |form| {
        if let Some(sc) = query.sc {
            form.sales_channel = sc;
        }
        form.items.extend(input.order_items.into_iter().map(|item| Item {
            id: item.id,
            quantity: item.quantity,
            seller: item.seller,
            price: UNIT_PRICE,
            assembly_options: Vec::new(),
        }));
        Ok(())
    })
    .await
}

async fn update_items(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<UpdateItems>,
) -> ApiResult<OrderForm> {
    with_form(&db, &id, |form| {
        for update in &input.order_items {
            let item = form
                .items
                .get_mut(update.index)
                .ok_or_else(|| bad_request("item index out of range"))?;
            item.quantity = update.quantity;
        }
        form.items.retain(|item| item.quantity > 0);
        Ok(())
    })
    .await
}

async fn add_assembly(
    State(db): State<Db>,
    Path((id, index, assembly)): Path<(String, usize, String)>,
    Json(body): Json<Value>,
) -> ApiResult<OrderForm> {
    with_form(&db, &id, |form| {
        let item = form
            .items
            .get_mut(index)
            .ok_or_else(|| bad_request("item index out of range"))?;
        item.assembly_options.push(json!({"id": assembly, "body": body}));
        Ok(())
    })
    .await
}

async fn remove_assembly(
    State(db): State<Db>,
    Path((id, index, assembly)): Path<(String, usize, String)>,
    Json(body): Json<Value>,
) -> ApiResult<OrderForm> {
    with_form(&db, &id, |form| {
        let item = form
            .items
            .get_mut(index)
            .ok_or_else(|| bad_request("item index out of range"))?;
        let before = item.assembly_options.len();
        item.assembly_options
            .retain(|option| !(option["id"] == assembly.as_str() && option["body"] == body));
        if item.assembly_options.len() == before {
            return Err(bad_request("assembly option not attached"));
        }
        Ok(())
    })
    .await
}

async fn attachment(
    State(db): State<Db>,
    Path((id, field)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> ApiResult<OrderForm> {
    with_form(&db, &id, |form| {
        let slot = match field.as_str() {
            "clientProfileData" => &mut form.client_profile_data,
            "shippingData" => &mut form.shipping_data,
            "paymentData" => &mut form.payment_data,
            "marketingData" => &mut form.marketing_data,
            _ => return Err(bad_request("unknown attachment")),
        };
        *slot = Some(body);
        Ok(())
    })
    .await
}

async fn custom_data(
    State(db): State<Db>,
    Path((id, app, field)): Path<(String, String, String)>,
    Json(input): Json<CustomValue>,
) -> ApiResult<OrderForm> {
    with_form(&db, &id, |form| {
        form.custom_data.entry(app).or_default().insert(field, input.value);
        Ok(())
    })
    .await
}

async fn ignore_profile(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<IgnoreProfile>,
) -> ApiResult<OrderForm> {
    with_form(&db, &id, |form| {
        form.ignore_profile_data = input.ignore_profile_data;
        Ok(())
    })
    .await
}

async fn checkin(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<Checkin>,
) -> ApiResult<OrderForm> {
    with_form(&db, &id, |form| {
        form.is_checked_in = input.is_checked_in;
        form.checked_in_pickup_point_id = input.pickup_point_id;
        Ok(())
    })
    .await
}

/// Codes starting with `SAVE` are accepted; anything else adds an error
/// message to the order form, as the real backend does.
async fn coupon(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<Coupon>,
) -> ApiResult<OrderForm> {
    with_form(&db, &id, |form| {
        if input.text.starts_with("SAVE") {
            form.marketing_data = Some(json!({"coupon": input.text}));
        } else {
            form.messages.push(Message {
                code: "couponNotFound".to_string(),
                text: format!("O código de cupom {} não é válido", input.text),
                status: "error".to_string(),
            });
        }
        Ok(())
    })
    .await
}

async fn clear_messages(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(_): Json<Value>,
) -> ApiResult<OrderForm> {
    with_form(&db, &id, |form| {
        form.messages.clear();
        Ok(())
    })
    .await
}

async fn cancel_order(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<Cancel>,
) -> ApiResult<Value> {
    let mut store = db.write().await;
    if !store.order_forms.contains_key(&id) {
        return Err(not_found());
    }
    let entry = json!({
        "orderId": id,
        "status": "cancellation-requested",
        "reason": input.reason,
    });
    store.orders.push(entry.clone());
    Ok(Json(entry))
}

async fn list_orders(State(db): State<Db>) -> Json<Vec<Value>> {
    Json(db.read().await.orders.clone())
}

async fn simulation(
    Query(query): Query<ChannelQuery>,
    Json(input): Json<Simulation>,
) -> ApiResult<Value> {
    let mut items = Vec::with_capacity(input.items.len());
    for (index, item) in input.items.iter().enumerate() {
        let quantity = match &item.quantity {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
        .ok_or_else(|| bad_request("invalid quantity"))?;
        items.push(json!({
            "id": item.id,
            "requestIndex": index,
            "quantity": quantity,
            "seller": item.seller,
            "price": UNIT_PRICE,
        }));
    }
    Ok(Json(json!({
        "items": items,
        "country": input.country,
        "postalCode": input.postal_code,
        "salesChannel": query.sc.unwrap_or_else(|| "1".to_string()),
    })))
}
