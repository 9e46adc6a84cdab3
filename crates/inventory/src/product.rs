use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use storefront_core::{DomainError, DomainResult};

/// Catalog key of a product. Any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> DomainResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(DomainError::invalid_id("ProductId: cannot be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProductId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(value: ProductId) -> Self {
        value.0
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A strictly positive number of stock units (what an order takes).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(units: i64) -> DomainResult<Self> {
        if units <= 0 {
            return Err(DomainError::validation(format!(
                "quantity must be a positive integer (got {units})"
            )));
        }
        Ok(Self(units))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

/// Catalog product: stock level plus free-form descriptive metadata.
///
/// On the wire the metadata is flattened next to `product_id` and `quantity`,
/// so `{"product_id": "p1", "quantity": 5, "name": "Widget"}` round-trips.
/// Deserialization rejects negative stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProduct")]
pub struct Product {
    product_id: ProductId,
    quantity: i64,
    #[serde(flatten)]
    metadata: Map<String, JsonValue>,
}

#[derive(Deserialize)]
struct RawProduct {
    product_id: ProductId,
    #[serde(default)]
    quantity: i64,
    #[serde(flatten)]
    metadata: Map<String, JsonValue>,
}

impl TryFrom<RawProduct> for Product {
    type Error = DomainError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        Product::new(raw.product_id, raw.quantity, raw.metadata)
    }
}

impl Product {
    pub fn new(
        product_id: ProductId,
        quantity: i64,
        metadata: Map<String, JsonValue>,
    ) -> DomainResult<Self> {
        if quantity < 0 {
            return Err(DomainError::invariant(format!(
                "stock cannot go negative (product {product_id}, quantity {quantity})"
            )));
        }
        Ok(Self {
            product_id,
            quantity,
            metadata,
        })
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Stock level at the time this record was read.
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn metadata(&self) -> &Map<String, JsonValue> {
        &self.metadata
    }

    pub fn into_parts(self) -> (ProductId, i64, Map<String, JsonValue>) {
        (self.product_id, self.quantity, self.metadata)
    }
}
