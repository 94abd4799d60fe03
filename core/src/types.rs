//! Domain model for the Linker API.
//!
//! # Design
//! Plain data holders with no behavior beyond serde. Every entity flattens
//! unknown JSON fields into `extra`, so a payload echoed by the server
//! deserializes and serializes back without losing fields this crate does not
//! name. Optional fields are omitted from the JSON when `None`.
//!
//! `Order` and `SupplierOrder` share the `Entity` trait, which lets the client
//! build and parse their requests through one set of generic helpers.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Unknown JSON fields preserved across round-trips.
pub type Extra = Map<String, Value>;

/// Reads an explicit JSON `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A resource the API exposes under `/<resource>` and `/<resource>/{id}`.
pub trait Entity: Serialize + DeserializeOwned {
    /// Path segment of the collection, without slashes.
    const RESOURCE: &'static str;

    /// Wrapper produced by deserializing the collection endpoint.
    type List: DeserializeOwned;

    fn id(&self) -> Option<&str>;
}

/// A sales order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    /// Set to `ORIGIN` by `create_order`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_street: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub items: Vec<OrderItem>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A line item of an `Order` or `SupplierOrder`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl OrderItem {
    pub fn new(sku: impl Into<String>, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            quantity,
            ..Self::default()
        }
    }
}

/// An order placed with a supplier (inbound stock).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub items: Vec<OrderItem>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Carrier tracking reference attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingNumber {
    pub carrier: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TrackingNumber {
    pub fn new(carrier: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            carrier: carrier.into(),
            number: number.into(),
            url: None,
        }
    }
}

/// Inventory snapshot for one SKU.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub available: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reserved: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

macro_rules! list_wrapper {
    ($(#[$meta:meta])* $name:ident, $item:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Vec<$item>);

        impl $name {
            pub fn into_inner(self) -> Vec<$item> {
                self.0
            }
        }

        impl Deref for $name {
            type Target = [$item];

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl From<Vec<$item>> for $name {
            fn from(items: Vec<$item>) -> Self {
                Self(items)
            }
        }

        impl IntoIterator for $name {
            type Item = $item;
            type IntoIter = std::vec::IntoIter<$item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.into_iter()
            }
        }

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a $item;
            type IntoIter = std::slice::Iter<'a, $item>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

list_wrapper!(
    /// Orders returned by `GET /orders`, in server order.
    OrderList,
    Order
);
list_wrapper!(
    /// Supplier orders returned by `GET /supplierorders`, in server order.
    SupplierOrderList,
    SupplierOrder
);
list_wrapper!(
    /// Stock snapshots returned by `GET /stocks`.
    StockList,
    Stock
);

impl Entity for Order {
    const RESOURCE: &'static str = "orders";
    type List = OrderList;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Entity for SupplierOrder {
    const RESOURCE: &'static str = "supplierorders";
    type List = SupplierOrderList;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
