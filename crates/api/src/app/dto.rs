use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use storefront_sales::Order;

// -------------------------
// Request DTOs
// -------------------------

/// `POST /order` body.
///
/// Fields are kept as raw JSON so the handler can apply the lenient rules
/// clients rely on (missing quantity is 0, `"3"` is 3) and still answer
/// anything else with a 400 in the usual error shape.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    #[serde(default)]
    pub product_id: JsonValue,
    #[serde(default)]
    pub quantity: JsonValue,
}

impl PlaceOrderRequest {
    pub fn parse(body: &[u8]) -> Result<Self, String> {
        serde_json::from_slice(body).map_err(|e| format!("request body must be a JSON object: {e}"))
    }

    /// Missing or `null` becomes the empty string, which order validation rejects.
    pub fn product_id(&self) -> Result<&str, String> {
        match &self.product_id {
            JsonValue::Null => Ok(""),
            JsonValue::String(s) => Ok(s),
            other => Err(format!("product_id must be a string (got {other})")),
        }
    }

    pub fn quantity(&self) -> Result<i64, String> {
        match &self.quantity {
            JsonValue::Null => Ok(0),
            JsonValue::Number(n) => {
                if let Some(units) = n.as_i64() {
                    return Ok(units);
                }
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Ok(f as i64)
                    }
                    _ => Err(format!("quantity must be an integer (got {n})")),
                }
            }
            JsonValue::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("quantity must be an integer (got {s:?})")),
            other => Err(format!("quantity must be an integer (got {other})")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    pub product_id: Option<String>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn order_created_json(order: &Order) -> JsonValue {
    json!({
        "message": "Order created",
        "order_id": order.order_id().to_string(),
        "product_id": order.product_id(),
        "quantity": order.quantity(),
    })
}
