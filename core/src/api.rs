//! Blocking API client: `LinkerClient` plus an injected `Transport`.
//!
//! Each method builds the request, executes it once through the transport
//! and parses the response. Nothing is retried and nothing is cached.

use tracing::{debug, warn};

use crate::client::LinkerClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::mapper::{JsonMapper, ObjectMapper};
use crate::query::ListQuery;
use crate::transport::Transport;
use crate::types::{
    Order, OrderList, StockList, SupplierOrder, SupplierOrderList, TrackingNumber,
};

/// Every operation of the Linker API.
///
/// `update_*` and `set_tracking_number` return the raw response, while
/// `create_*` return the entity echoed by the server.
pub trait LinkerApi {
    fn get_orders(&self, query: &ListQuery) -> Result<OrderList, ApiError>;

    fn get_order(&self, id: &str) -> Result<Order, ApiError>;

    fn create_order(&self, order: &Order) -> Result<Order, ApiError>;

    fn update_order(&self, id: &str, order: &Order) -> Result<HttpResponse, ApiError>;

    fn set_tracking_number(
        &self,
        id: &str,
        tracking_number: &TrackingNumber,
    ) -> Result<HttpResponse, ApiError>;

    fn get_stocks(&self) -> Result<StockList, ApiError>;

    fn get_supplier_orders(&self, query: &ListQuery) -> Result<SupplierOrderList, ApiError>;

    fn get_supplier_order(&self, id: &str) -> Result<SupplierOrder, ApiError>;

    fn create_supplier_order(&self, order: &SupplierOrder) -> Result<SupplierOrder, ApiError>;

    fn update_supplier_order(
        &self,
        id: &str,
        order: &SupplierOrder,
    ) -> Result<HttpResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpApiClient<T, M = JsonMapper> {
    client: LinkerClient<M>,
    transport: T,
}

impl<T: Transport> HttpApiClient<T, JsonMapper> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self::from_parts(LinkerClient::new(config), transport)
    }
}

#[cfg(feature = "ureq")]
impl HttpApiClient<crate::transport::UreqTransport, JsonMapper> {
    /// ureq-backed client configured from `LINKER_API_KEY` and
    /// `LINKER_API_ENDPOINT`.
    pub fn from_env() -> Result<Self, crate::error::ConfigError> {
        let config = ClientConfig::from_env()?;
        Ok(Self::new(config, crate::transport::UreqTransport::new()))
    }
}

impl<T: Transport, M: ObjectMapper> HttpApiClient<T, M> {
    pub fn from_parts(client: LinkerClient<M>, transport: T) -> Self {
        Self { client, transport }
    }

    /// The underlying request builder / response parser.
    pub fn client(&self) -> &LinkerClient<M> {
        &self.client
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            method = %request.method,
            path = request.path_without_query(),
            "sending Linker API request"
        );
        let response = self.transport.execute(&request)?;
        if response.is_success() {
            debug!(status = response.status, "Linker API request succeeded");
        } else {
            warn!(
                method = %request.method,
                path = request.path_without_query(),
                status = response.status,
                reason = %response.reason,
                "Linker API returned an error status"
            );
        }
        Ok(response)
    }
}

impl<T: Transport, M: ObjectMapper> LinkerApi for HttpApiClient<T, M> {
    fn get_orders(&self, query: &ListQuery) -> Result<OrderList, ApiError> {
        let response = self.send(self.client.build_get_orders(query))?;
        self.client.parse_get_orders(response)
    }

    fn get_order(&self, id: &str) -> Result<Order, ApiError> {
        let response = self.send(self.client.build_get_order(id))?;
        self.client.parse_get_order(response)
    }

    fn create_order(&self, order: &Order) -> Result<Order, ApiError> {
        let response = self.send(self.client.build_create_order(order)?)?;
        self.client.parse_create_order(response)
    }

    fn update_order(&self, id: &str, order: &Order) -> Result<HttpResponse, ApiError> {
        let response = self.send(self.client.build_update_order(id, order)?)?;
        self.client.parse_update_order(response)
    }

    fn set_tracking_number(
        &self,
        id: &str,
        tracking_number: &TrackingNumber,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.client.build_set_tracking_number(id, tracking_number)?;
        let response = self.send(request)?;
        self.client.parse_set_tracking_number(response)
    }

    fn get_stocks(&self) -> Result<StockList, ApiError> {
        let response = self.send(self.client.build_get_stocks())?;
        self.client.parse_get_stocks(response)
    }

    fn get_supplier_orders(&self, query: &ListQuery) -> Result<SupplierOrderList, ApiError> {
        let response = self.send(self.client.build_get_supplier_orders(query))?;
        self.client.parse_get_supplier_orders(response)
    }

    fn get_supplier_order(&self, id: &str) -> Result<SupplierOrder, ApiError> {
        let response = self.send(self.client.build_get_supplier_order(id))?;
        self.client.parse_get_supplier_order(response)
    }

    fn create_supplier_order(&self, order: &SupplierOrder) -> Result<SupplierOrder, ApiError> {
        let response = self.send(self.client.build_create_supplier_order(order)?)?;
        self.client.parse_create_supplier_order(response)
    }

    fn update_supplier_order(
        &self,
        id: &str,
        order: &SupplierOrder,
    ) -> Result<HttpResponse, ApiError> {
        let response = self.send(self.client.build_update_supplier_order(id, order)?)?;
        self.client.parse_update_supplier_order(response)
    }
}
