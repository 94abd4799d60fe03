//! `HttpApiClient` against an in-process stub transport.
//!
//! The stub records every request and replays canned responses, which pins
//! down the exact wire shape of each operation and the error translation
//! without a server.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::error::Error as _;

use linker_core::{
    ApiError, ClientConfig, HttpApiClient, HttpMethod, HttpRequest, HttpResponse, LinkerApi,
    ListQuery, Order, OrderItem, SupplierOrder, TrackingNumber, Transport, TransportError, ORIGIN,
};

const BASE_URL: &str = "http://linker.test/api";

#[derive(Default)]
struct StubTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl StubTransport {
    fn reply(self, status: u16, reason: &str, body: &str) -> Self {
        self.responses.borrow_mut().push_back(Ok(HttpResponse {
            status,
            reason: reason.to_string(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }));
        self
    }

    fn fail(self, message: &str) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(TransportError::new(message)));
        self
    }

    fn last_request(&self) -> HttpRequest {
        self.requests.borrow().last().cloned().expect("no request sent")
    }
}

impl Transport for StubTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .expect("stub has no response queued")
    }
}

fn api(stub: &StubTransport) -> HttpApiClient<&StubTransport> {
    HttpApiClient::new(ClientConfig::new(BASE_URL, "secret").unwrap(), stub)
}

fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_str(request.body.as_deref().unwrap()).unwrap()
}

#[test]
fn get_order_deserializes_stub_payload() {
    let stub = StubTransport::default().reply(200, "OK", r#"{"id":"123","status":"new"}"#);
    let order = api(&stub).get_order("123").unwrap();
    assert_eq!(order.id.as_deref(), Some("123"));
    assert_eq!(order.status.as_deref(), Some("new"));

    let req = stub.last_request();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.path, format!("{BASE_URL}/orders/123"));
    assert_eq!(req.header("apikey"), Some("secret"));
    assert_eq!(req.header("Accept"), Some("application/json"));
}

#[test]
fn create_order_unprocessable_raises_api_exception() {
    let stub = StubTransport::default().reply(422, "Unprocessable Entity", r#"{"error":"items"}"#);
    let order = Order {
        items: vec![OrderItem::new("A-1", 1)],
        ..Order::default()
    };
    let err = api(&stub).create_order(&order).unwrap_err();

    let ApiError::Api(exception) = &err else {
        panic!("expected ApiException, got {err:?}");
    };
    assert_eq!(exception.code, 422);
    assert_eq!(exception.message, "Unprocessable Entity");
    assert_eq!(err.status(), Some(422));

    let cause = exception.source().expect("original error is chained");
    assert!(cause.to_string().contains("422"));
    assert_eq!(exception.source.body, r#"{"error":"items"}"#);
}

#[test]
fn api_exception_carries_the_transport_reason_phrase() {
    let stub = StubTransport::default().reply(422, "Validation Failed", "");
    let order = Order {
        items: vec![OrderItem::new("A-1", 1)],
        ..Order::default()
    };
    let err = api(&stub).create_order(&order).unwrap_err();
    assert!(
        matches!(err, ApiError::Api(ref e) if e.code == 422 && e.message == "Validation Failed")
    );
}

#[test]
fn create_order_overrides_caller_origin() {
    let stub = StubTransport::default().reply(
        201,
        "Created",
        r#"{"id":"9","origin":"LinkerAPI","items":[{"sku":"A-1","quantity":1}]}"#,
    );
    let order = Order {
        origin: Some("eshop".to_string()),
        items: vec![OrderItem::new("A-1", 1)],
        ..Order::default()
    };
    let created = api(&stub).create_order(&order).unwrap();
    assert_eq!(created.id.as_deref(), Some("9"));

    let req = stub.last_request();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.path, format!("{BASE_URL}/orders?apikey=secret"));
    assert_eq!(body_json(&req)["origin"], ORIGIN);
}

#[test]
fn get_orders_sends_normalized_query() {
    let stub = StubTransport::default().reply(200, "OK", r#"[{"id":"1"},{"id":"2"}]"#);
    let query = ListQuery::new()
        .limit(-1)
        .offset(5)
        .filter("status", "new")
        .filter("country", "CZ")
        .sort("updated_at", "sideways");
    let orders = api(&stub).get_orders(&query).unwrap();
    let ids: Vec<_> = orders.iter().filter_map(|o| o.id.as_deref()).collect();
    assert_eq!(ids, ["1", "2"]);

    assert_eq!(
        stub.last_request().path,
        format!(
            "{BASE_URL}/orders?limit=10&offset=5&sortCol=updated_at&sortDir=DESC\
             &filters[status]=new&filters[country]=CZ&apikey=secret"
        )
    );
}

#[test]
fn read_errors_are_not_translated() {
    let stub = StubTransport::default()
        .reply(404, "Not Found", "")
        .reply(500, "Internal Server Error", "")
        .reply(401, "Unauthorized", "");
    let api = api(&stub);

    let err = api.get_order("missing").unwrap_err();
    assert!(matches!(err, ApiError::Status(ref e) if e.status == 404));

    let err = api.get_orders(&ListQuery::new()).unwrap_err();
    assert!(matches!(err, ApiError::Status(ref e) if e.status == 500));

    let err = api.get_stocks().unwrap_err();
    assert!(matches!(err, ApiError::Status(ref e) if e.reason == "Unauthorized"));
}

#[test]
fn transport_failures_pass_through() {
    let stub = StubTransport::default()
        .fail("connection refused")
        .fail("dns lookup failed");
    let api = api(&stub);

    let err = api.get_stocks().unwrap_err();
    assert!(matches!(err, ApiError::Transport(ref e) if e.message == "connection refused"));

    let err = api.create_order(&Order::default()).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[test]
fn update_order_returns_raw_response() {
    let stub = StubTransport::default()
        .reply(200, "OK", r#"{"id":"7","status":"cancelled"}"#)
        .reply(400, "Bad Request", "");
    let order = Order {
        status: Some("cancelled".to_string()),
        ..Order::default()
    };
    let api = api(&stub);

    let response = api.update_order("7", &order).unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, r#"{"id":"7","status":"cancelled"}"#);
    let req = stub.last_request();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.path, format!("{BASE_URL}/orders/7?apikey=secret"));
    assert!(body_json(&req).get("origin").is_none());

    let err = api.update_order("7", &order).unwrap_err();
    assert!(matches!(err, ApiError::Api(ref e) if e.code == 400 && e.message == "Bad Request"));
}

#[test]
fn set_tracking_number_puts_payload() {
    let stub = StubTransport::default()
        .reply(204, "No Content", "")
        .reply(404, "Not Found", "");
    let api = api(&stub);
    let tracking = TrackingNumber::new("Zasilkovna", "Z123");

    let response = api.set_tracking_number("7", &tracking).unwrap();
    assert_eq!(response.status, 204);
    let req = stub.last_request();
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(
        req.path,
        format!("{BASE_URL}/orders/7/trackingnumber?apikey=secret")
    );
    assert_eq!(
        body_json(&req),
        serde_json::json!({"carrier": "Zasilkovna", "number": "Z123"})
    );

    let err = api.set_tracking_number("8", &tracking).unwrap_err();
    assert!(matches!(err, ApiError::Api(ref e) if e.code == 404));
}

#[test]
fn get_stocks_lists_snapshots() {
    let stub = StubTransport::default().reply(
        200,
        "OK",
        r#"[{"sku":"A-1","quantity":10,"available":7,"reserved":3,"warehouse":"PRG"}]"#,
    );
    let stocks = api(&stub).get_stocks().unwrap();
    assert_eq!(stocks.len(), 1);
    assert_eq!(stocks[0].reserved, 3);
    assert_eq!(stocks[0].warehouse.as_deref(), Some("PRG"));
    assert_eq!(stub.last_request().path, format!("{BASE_URL}/stocks?apikey=secret"));
}

#[test]
fn supplier_orders_mirror_orders() {
    let stub = StubTransport::default()
        .reply(200, "OK", r#"[{"id":"s-1","supplier":"ACME"}]"#)
        .reply(200, "OK", r#"{"id":"s-1","supplier":"ACME"}"#)
        .reply(201, "Created", r#"{"id":"s-2","supplier":"Globex"}"#)
        .reply(422, "Unprocessable Entity", "")
        .reply(404, "Not Found", "");
    let api = api(&stub);

    let list = api
        .get_supplier_orders(&ListQuery::new().limit(-3).sort("id", "ASC"))
        .unwrap();
    assert_eq!(list[0].supplier.as_deref(), Some("ACME"));
    assert_eq!(
        stub.last_request().path,
        format!("{BASE_URL}/supplierorders?limit=10&offset=0&sortCol=id&sortDir=ASC&apikey=secret")
    );

    let order = api.get_supplier_order("s-1").unwrap();
    assert_eq!(order.id.as_deref(), Some("s-1"));
    assert_eq!(
        stub.last_request().path,
        format!("{BASE_URL}/supplierorders/s-1?apikey=secret")
    );

    let new_order = SupplierOrder {
        supplier: Some("Globex".to_string()),
        items: vec![OrderItem::new("B-2", 100)],
        ..SupplierOrder::default()
    };
    let created = api.create_supplier_order(&new_order).unwrap();
    assert_eq!(created.id.as_deref(), Some("s-2"));
    assert!(body_json(&stub.last_request()).get("origin").is_none());

    let err = api.update_supplier_order("s-2", &new_order).unwrap_err();
    assert!(matches!(err, ApiError::Api(ref e) if e.code == 422));
    assert_eq!(
        stub.last_request().path,
        format!("{BASE_URL}/supplierorders/s-2?apikey=secret")
    );

    let err = api.get_supplier_order("nope").unwrap_err();
    assert!(matches!(err, ApiError::Status(_)));
}

#[test]
fn malformed_body_is_deserialization_error() {
    let stub = StubTransport::default().reply(200, "OK", "<html>maintenance</html>");
    let err = api(&stub).get_order("1").unwrap_err();
    assert!(matches!(err, ApiError::Deserialization(_)));
}

#[test]
fn client_is_usable_as_trait_object() {
    let stub = StubTransport::default().reply(200, "OK", "[]");
    let client = api(&stub);
    let dyn_api: &dyn LinkerApi = &client;
    assert!(dyn_api.get_stocks().unwrap().is_empty());
}
