use serde::Deserialize;
use serde_json::Value;

// Entries stay untyped here so that one odd record can be skipped on its own
// instead of failing the whole page.

/// `GET /api/woo/get-orders` → `{ "data": { "orders": [...] } }`
#[derive(Debug, Deserialize)]
pub struct StorefrontEnvelope {
    #[serde(default)]
    pub data: Option<StorefrontPage>,
}

#[derive(Debug, Deserialize)]
pub struct StorefrontPage {
    #[serde(default)]
    pub orders: Option<Vec<Value>>,
}

impl StorefrontEnvelope {
    pub fn into_orders(self) -> Vec<Value> {
        self.data.and_then(|d| d.orders).unwrap_or_default()
    }
}

/// `GET /api/wp/get-orders` → `{ "orders": { "orders": [...] } }`
#[derive(Debug, Deserialize)]
pub struct CmsEnvelope {
    #[serde(default)]
    pub orders: Option<CmsPage>,
}

#[derive(Debug, Deserialize)]
pub struct CmsPage {
    #[serde(default)]
    pub orders: Option<Vec<Value>>,
}

impl CmsEnvelope {
    pub fn into_orders(self) -> Vec<Value> {
        self.orders.and_then(|o| o.orders).unwrap_or_default()
    }
}
