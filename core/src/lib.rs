//! Synchronous client for the Linker order-management API.
//!
//! # Overview
//! Lists, fetches, creates and updates sales orders and supplier orders,
//! sets tracking numbers and reads stock snapshots. Every operation is one
//! HTTP request and one JSON deserialization.
//!
//! # Design
//! - `LinkerClient` is the sans-IO core. It holds only static configuration
//!   (endpoint, API key) and an `ObjectMapper`, and splits each operation into
//!   `build_*` (produces an `HttpRequest`) and `parse_*` (consumes an
//!   `HttpResponse`).
//! - `HttpApiClient` pairs a `LinkerClient` with an injected `Transport` and
//!   implements `LinkerApi`. `UreqTransport` is the bundled blocking transport
//!   (feature `ureq`, on by default).
//! - HTTP error statuses on reads come back as `ApiError::Status`. On writes
//!   they are translated into `ApiError::Api(ApiException)`.
//!
//! ```no_run
//! use linker_core::{HttpApiClient, LinkerApi, ListQuery};
//!
//! let api = HttpApiClient::from_env()?;
//! let orders = api.get_orders(&ListQuery::new().filter("status", "new"))?;
//! for order in &orders {
//!     println!("{:?} {:?}", order.id, order.status);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mapper;
pub mod query;
pub mod transport;
pub mod types;

pub use api::{HttpApiClient, LinkerApi};
pub use client::{LinkerClient, ORIGIN};
pub use config::ClientConfig;
pub use error::{ApiError, ApiException, ConfigError, HttpStatusError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mapper::{JsonMapper, ObjectMapper};
pub use query::{ListQuery, SortDirection};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use transport::Transport;
pub use types::{
    Entity, Order, OrderItem, OrderList, Stock, StockList, SupplierOrder, SupplierOrderList,
    TrackingNumber,
};
