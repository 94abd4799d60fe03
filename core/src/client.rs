//! Stateless HTTP request builder and response parser for the Linker API.
//!
//! # Design
//! `LinkerClient` holds only its `ClientConfig` and an object mapper. It
//! carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. The caller (or `HttpApiClient`) executes the
//! HTTP round-trip in between.
//!
//! Order and supplier-order operations share generic helpers over `Entity`.
//! Where the two resources differ on the wire (apikey placement on the
//! single-item GET, origin stamping on create) the public methods say so.

use std::borrow::Cow;

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiException, HttpStatusError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::mapper::{JsonMapper, ObjectMapper};
use crate::query::ListQuery;
use crate::types::{
    Entity, Order, OrderList, StockList, SupplierOrder, SupplierOrderList, TrackingNumber,
};

/// Value written into `Order::origin` by `build_create_order`.
pub const ORIGIN: &str = "LinkerAPI";

const JSON: &str = "application/json";

/// Synchronous, stateless client for the Linker API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct LinkerClient<M = JsonMapper> {
    config: ClientConfig,
    mapper: M,
}

impl LinkerClient<JsonMapper> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_mapper(config, JsonMapper)
    }
}

impl<M: ObjectMapper> LinkerClient<M> {
    pub fn with_mapper(config: ClientConfig, mapper: M) -> Self {
        Self { config, mapper }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------------

    pub fn build_get_orders(&self, query: &ListQuery) -> HttpRequest {
        self.build_list::<Order>(query)
    }

    /// The API key travels in the header only.
    pub fn build_get_order(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, self.item_url::<Order>(id), None)
    }

    /// Stamps `origin` with `ORIGIN` before serializing. The caller's order
    /// is left untouched.
    pub fn build_create_order(&self, order: &Order) -> Result<HttpRequest, ApiError> {
        let order = Order {
            origin: Some(ORIGIN.to_string()),
            ..order.clone()
        };
        self.build_create(&order)
    }

    pub fn build_update_order(&self, id: &str, order: &Order) -> Result<HttpRequest, ApiError> {
        self.build_update(id, order)
    }

    pub fn build_set_tracking_number(
        &self,
        id: &str,
        tracking_number: &TrackingNumber,
    ) -> Result<HttpRequest, ApiError> {
        let body = self.mapper.to_json(tracking_number)?;
        let url = format!(
            "{}/trackingnumber?apikey={}",
            self.item_url::<Order>(id),
            self.encoded_key()
        );
        Ok(self.request(HttpMethod::Put, url, Some(body)))
    }

    pub fn parse_get_orders(&self, response: HttpResponse) -> Result<OrderList, ApiError> {
        self.parse_list::<Order>(response)
    }

    pub fn parse_get_order(&self, response: HttpResponse) -> Result<Order, ApiError> {
        self.parse_read(response)
    }

    pub fn parse_create_order(&self, response: HttpResponse) -> Result<Order, ApiError> {
        self.parse_write(response)
    }

    /// Returns the raw response. The body is not deserialized.
    pub fn parse_update_order(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        check_write(response)
    }

    /// Returns the raw response. The body is not deserialized.
    pub fn parse_set_tracking_number(
        &self,
        response: HttpResponse,
    ) -> Result<HttpResponse, ApiError> {
        check_write(response)
    }

    // -----------------------------------------------------------------------
    // Stocks
    // -----------------------------------------------------------------------

    pub fn build_get_stocks(&self) -> HttpRequest {
        let url = format!("{}/stocks?apikey={}", self.config.endpoint(), self.encoded_key());
        self.request(HttpMethod::Get, url, None)
    }

    pub fn parse_get_stocks(&self, response: HttpResponse) -> Result<StockList, ApiError> {
        self.parse_read(response)
    }

    // -----------------------------------------------------------------------
    // Supplier orders
    // -----------------------------------------------------------------------

    pub fn build_get_supplier_orders(&self, query: &ListQuery) -> HttpRequest {
        self.build_list::<SupplierOrder>(query)
    }

    /// Unlike `build_get_order`, the API key is also sent in the query.
    pub fn build_get_supplier_order(&self, id: &str) -> HttpRequest {
        let url = format!(
            "{}?apikey={}",
            self.item_url::<SupplierOrder>(id),
            self.encoded_key()
        );
        self.request(HttpMethod::Get, url, None)
    }

    /// Sent as given; no origin is stamped.
    pub fn build_create_supplier_order(
        &self,
        order: &SupplierOrder,
    ) -> Result<HttpRequest, ApiError> {
        self.build_create(order)
    }

    pub fn build_update_supplier_order(
        &self,
        id: &str,
        order: &SupplierOrder,
    ) -> Result<HttpRequest, ApiError> {
        self.build_update(id, order)
    }

    pub fn parse_get_supplier_orders(
        &self,
        response: HttpResponse,
    ) -> Result<SupplierOrderList, ApiError> {
        self.parse_list::<SupplierOrder>(response)
    }

    pub fn parse_get_supplier_order(
        &self,
        response: HttpResponse,
    ) -> Result<SupplierOrder, ApiError> {
        self.parse_read(response)
    }

    pub fn parse_create_supplier_order(
        &self,
        response: HttpResponse,
    ) -> Result<SupplierOrder, ApiError> {
        self.parse_write(response)
    }

    /// Returns the raw response. The body is not deserialized.
    pub fn parse_update_supplier_order(
        &self,
        response: HttpResponse,
    ) -> Result<HttpResponse, ApiError> {
        check_write(response)
    }

    // -----------------------------------------------------------------------
    // Shared helpers
    // -----------------------------------------------------------------------

    fn build_list<E: Entity>(&self, query: &ListQuery) -> HttpRequest {
        let url = format!(
            "{}/{}?{}&apikey={}",
            self.config.endpoint(),
            E::RESOURCE,
            query.to_query_string(),
            self.encoded_key()
        );
        self.request(HttpMethod::Get, url, None)
    }

    fn build_create<E: Entity>(&self, entity: &E) -> Result<HttpRequest, ApiError> {
        let body = self.mapper.to_json(entity)?;
        let url = format!(
            "{}/{}?apikey={}",
            self.config.endpoint(),
            E::RESOURCE,
            self.encoded_key()
        );
        Ok(self.request(HttpMethod::Post, url, Some(body)))
    }

    fn build_update<E: Entity>(&self, id: &str, entity: &E) -> Result<HttpRequest, ApiError> {
        let body = self.mapper.to_json(entity)?;
        let url = format!("{}?apikey={}", self.item_url::<E>(id), self.encoded_key());
        Ok(self.request(HttpMethod::Post, url, Some(body)))
    }

    fn item_url<E: Entity>(&self, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.endpoint(),
            E::RESOURCE,
            urlencoding::encode(id)
        )
    }

    fn encoded_key(&self) -> Cow<'_, str> {
        urlencoding::encode(self.config.api_key())
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: self.headers(),
            body,
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Accept".to_string(), JSON.to_string()),
            ("Content-Type".to_string(), JSON.to_string()),
            ("apikey".to_string(), self.config.api_key().to_string()),
        ]
    }

    fn parse_list<E: Entity>(&self, response: HttpResponse) -> Result<E::List, ApiError> {
        self.parse_read(response)
    }

    fn parse_read<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        let response = check_read(response)?;
        self.mapper.from_json(&response.body)
    }

    fn parse_write<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        let response = check_write(response)?;
        self.mapper.from_json(&response.body)
    }
}

/// Reads surface the status error as-is.
fn check_read(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    status_error(response).map_err(ApiError::Status)
}

/// Writes translate the status error into an `ApiException`.
fn check_write(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    status_error(response).map_err(|e| ApiError::Api(ApiException::from(e)))
}

fn status_error(response: HttpResponse) -> Result<HttpResponse, HttpStatusError> {
    if response.is_success() {
        return Ok(response);
    }
    Err(HttpStatusError {
        status: response.status,
        reason: response.reason,
        body: response.body,
    })
}
