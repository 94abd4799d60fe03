//! In-memory stand-in for the Linker API.
//!
//! Serves `/orders`, `/supplierorders` and `/stocks` with the same paths,
//! verbs and query parameters as the real service. Records are kept as raw
//! JSON objects so any field a client sends is echoed back unchanged.
//! Every route requires the API key, either as the `apikey` header or the
//! `apikey` query parameter.

use std::{cmp::Ordering, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_KEY: &str = "test-api-key";

const DEFAULT_LIMIT: usize = 10;

pub type Record = Map<String, Value>;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackingNumber {
    pub carrier: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    orders: Vec<Record>,
    supplier_orders: Vec<Record>,
    stocks: Vec<Record>,
    seq: u64,
}

impl Store {
    fn seeded() -> Self {
        let stocks = [("A-1", "T-shirt", 12, 2), ("B-2", "Mug", 40, 0)]
            .into_iter()
            .map(|(sku, name, quantity, reserved)| {
                object(serde_json::json!({
                    "sku": sku,
                    "name": name,
                    "quantity": quantity,
                    "available": quantity - reserved,
                    "reserved": reserved,
                    "warehouse": "PRG",
                }))
            })
            .collect();
        Self {
            stocks,
            ..Self::default()
        }
    }

    /// Deterministic, strictly increasing timestamps.
    fn next_timestamp(&mut self) -> String {
        self.seq += 1;
        format!(
            "2026-01-01T{:02}:{:02}:{:02}Z",
            self.seq / 3600 % 24,
            self.seq / 60 % 60,
            self.seq % 60
        )
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
struct AppState {
    db: Db,
    api_key: Arc<str>,
}

/// One of the entity collections served by the mock.
trait Collection: Send + Sync + 'static {
    fn records(store: &Store) -> &Vec<Record>;
    fn records_mut(store: &mut Store) -> &mut Vec<Record>;
}

struct Orders;
struct SupplierOrders;

impl Collection for Orders {
    fn records(store: &Store) -> &Vec<Record> {
        &store.orders
    }

    fn records_mut(store: &mut Store) -> &mut Vec<Record> {
        &mut store.orders
    }
}

impl Collection for SupplierOrders {
    fn records(store: &Store) -> &Vec<Record> {
        &store.supplier_orders
    }

    fn records_mut(store: &mut Store) -> &mut Vec<Record> {
        &mut store.supplier_orders
    }
}

pub fn app() -> Router {
    app_with_api_key(API_KEY)
}

pub fn app_with_api_key(api_key: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::seeded())),
        api_key: Arc::from(api_key),
    };
    Router::new()
        .route("/orders", get(list::<Orders>).post(create::<Orders>))
        .route("/orders/{id}", get(fetch::<Orders>).post(update::<Orders>))
        .route("/orders/{id}/trackingnumber", put(set_tracking_number))
        .route(
            "/supplierorders",
            get(list::<SupplierOrders>).post(create::<SupplierOrders>),
        )
        .route(
            "/supplierorders/{id}",
            get(fetch::<SupplierOrders>).post(update::<SupplierOrders>),
        )
        .route("/stocks", get(list_stocks))
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_api_key(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_api_key(api_key)).await
}

async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let from_header = request
        .headers()
        .get("apikey")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == &*state.api_key);
    let from_query = Query::<Vec<(String, String)>>::try_from_uri(request.uri())
        .map(|Query(params)| {
            params
                .iter()
                .any(|(k, v)| k == "apikey" && v == &*state.api_key)
        })
        .unwrap_or(false);

    if from_header || from_query {
        next.run(request).await
    } else {
        tracing::debug!(path = request.uri().path(), "rejected request without API key");
        StatusCode::UNAUTHORIZED.into_response()
    }
}

/// Parsed `limit`, `offset`, `sortCol`, `sortDir` and `filters[..]` params.
#[derive(Debug, PartialEq)]
struct ListParams {
    limit: usize,
    offset: usize,
    sort_column: String,
    descending: bool,
    filters: Vec<(String, String)>,
}

impl ListParams {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = ListParams {
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort_column: "created_at".to_string(),
            descending: false,
            filters: Vec::new(),
        };
        for (key, value) in pairs {
            match key.as_str() {
                "limit" => params.limit = value.parse().unwrap_or(DEFAULT_LIMIT),
                "offset" => params.offset = value.parse().unwrap_or(0),
                "sortCol" => params.sort_column = value,
                "sortDir" => params.descending = value != "ASC",
                _ => {
                    if let Some(field) = key
                        .strip_prefix("filters[")
                        .and_then(|rest| rest.strip_suffix(']'))
                    {
                        params.filters.push((field.to_string(), value));
                    }
                }
            }
        }
        params
    }

    fn apply(&self, records: &[Record]) -> Vec<Record> {
        let mut matching: Vec<&Record> = records
            .iter()
            .filter(|record| {
                self.filters.iter().all(|(field, expected)| {
                    record.get(field).is_some_and(|v| scalar(v) == *expected)
                })
            })
            .collect();
        matching.sort_by(|a, b| {
            let ordering = compare(a.get(&self.sort_column), b.get(&self.sort_column));
            if self.descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
        matching
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .cloned()
            .collect()
    }
}

fn object(value: Value) -> Record {
    match value {
        Value::Object(record) => record,
        _ => Record::new(),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => scalar(x).cmp(&scalar(y)),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn has_items(record: &Record) -> bool {
    record
        .get("items")
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty())
}

async fn list<C: Collection>(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Json<Vec<Record>> {
    let store = state.db.read().await;
    Json(ListParams::from_pairs(pairs).apply(C::records(&store)))
}

async fn create<C: Collection>(
    State(state): State<AppState>,
    Json(mut record): Json<Record>,
) -> Result<(StatusCode, Json<Record>), StatusCode> {
    if !has_items(&record) {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let mut store = state.db.write().await;
    let now = store.next_timestamp();
    record.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    record.insert("created_at".to_string(), Value::String(now));
    record
        .entry("status")
        .or_insert_with(|| Value::String("new".to_string()));
    C::records_mut(&mut store).push(record.clone());
    Ok((StatusCode::CREATED, Json(record)))
}

async fn fetch<C: Collection>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, StatusCode> {
    let store = state.db.read().await;
    C::records(&store)
        .iter()
        .find(|record| record.get("id").and_then(Value::as_str) == Some(id.as_str()))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update<C: Collection>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<Record>,
) -> Result<Json<Record>, StatusCode> {
    let mut store = state.db.write().await;
    let now = store.next_timestamp();
    let record = C::records_mut(&mut store)
        .iter_mut()
        .find(|record| record.get("id").and_then(Value::as_str) == Some(id.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;
    for (key, value) in patch {
        if key != "id" && key != "created_at" {
            record.insert(key, value);
        }
    }
    record.insert("updated_at".to_string(), Value::String(now));
    Ok(Json(record.clone()))
}

async fn set_tracking_number(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(tracking): Json<TrackingNumber>,
) -> Result<StatusCode, StatusCode> {
    let mut store = state.db.write().await;
    let record = store
        .orders
        .iter_mut()
        .find(|record| record.get("id").and_then(Value::as_str) == Some(id.as_str()))
        .ok_or(StatusCode::NOT_FOUND)?;
    record.insert("carrier".to_string(), Value::String(tracking.carrier.clone()));
    let tracking = serde_json::to_value(&tracking).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    record.insert("tracking_number".to_string(), tracking);
    Ok(StatusCode::NO_CONTENT)
}

async fn list_stocks(State(state): State<AppState>) -> Json<Vec<Record>> {
    Json(state.db.read().await.stocks.clone())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn list_params_defaults() {
        let params = ListParams::from_pairs(Vec::new());
        assert_eq!(params.limit, 10);
        assert_eq!(params.offset, 0);
        assert_eq!(params.sort_column, "created_at");
        assert!(!params.descending);
        assert!(params.filters.is_empty());
    }

    #[test]
    fn list_params_parses_filters() {
        let params = ListParams::from_pairs(pairs(&[
            ("limit", "2"),
            ("sortDir", "desc"),
            ("filters[status]", "new"),
            ("apikey", "x"),
        ]));
        assert_eq!(params.limit, 2);
        assert!(params.descending);
        assert_eq!(params.filters, pairs(&[("status", "new")]));
    }

    #[test]
    fn apply_filters_sorts_and_pages() {
        let records = vec![
            object(json!({"id": "a", "status": "new", "total_price": 30})),
            object(json!({"id": "b", "status": "shipped", "total_price": 10})),
            object(json!({"id": "c", "status": "new", "total_price": 20})),
        ];
        let params = ListParams::from_pairs(pairs(&[
            ("filters[status]", "new"),
            ("sortCol", "total_price"),
            ("sortDir", "ASC"),
        ]));
        let ids: Vec<_> = params
            .apply(&records)
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, ["c", "a"]);

        let params = ListParams::from_pairs(pairs(&[
            ("sortCol", "total_price"),
            ("sortDir", "DESC"),
            ("offset", "1"),
            ("limit", "1"),
        ]));
        let page = params.apply(&records);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0]["id"], "c");
    }

    #[test]
    fn numeric_filters_match_by_text() {
        let records = vec![object(json!({"id": "a", "priority": 2}))];
        let params = ListParams::from_pairs(pairs(&[("filters[priority]", "2")]));
        assert_eq!(params.apply(&records).len(), 1);
    }

    #[test]
    fn timestamps_increase() {
        let mut store = Store::default();
        let first = store.next_timestamp();
        let second = store.next_timestamp();
        assert!(second > first);
    }

    #[test]
    fn tracking_number_rejects_missing_carrier() {
        let result: Result<TrackingNumber, _> = serde_json::from_str(r#"{"number":"1"}"#);
        assert!(result.is_err());
    }
}
