use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

// ── Storefront (List A) ──────────────────────────────────────────────────────

/// Order as reported by the storefront platform.
///
/// The upstream JSON object is kept as received and serialized back unchanged;
/// the typed fields are a read-only view decoded from it.
#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontOrder {
    id: i64,
    status: Option<String>,
    total: Option<String>,
    raw: Map<String, Value>,
}

/// Metadata keys that carry the computed order total when `total` is absent.
const TOTAL_META_KEYS: [&str; 2] = ["_order_total", "total"];

impl StorefrontOrder {
    /// Decode the view from an upstream object. Only a missing or non-integer
    /// `id` is an error; every other field is read leniently.
    pub fn from_map(raw: Map<String, Value>) -> Result<Self, String> {
        let id = raw
            .get("id")
            .ok_or_else(|| "order has no id".to_string())
            .and_then(lenient::id_of)?;
        Ok(Self {
            id,
            status: raw.get("status").and_then(lenient::text_of),
            total: raw.get("total").and_then(lenient::amount_of),
            raw,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// The `total` field as sent, numbers rendered as decimal strings.
    pub fn total(&self) -> Option<&str> {
        self.total.as_deref()
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Metadata value for `key`. Accepts both the `[{key, value}]` list form
    /// and a plain `{key: value}` object.
    pub fn meta(&self, key: &str) -> Option<&Value> {
        match self.raw.get("meta_data")? {
            Value::Array(entries) => entries
                .iter()
                .find(|entry| entry.get("key").and_then(Value::as_str) == Some(key))
                .and_then(|entry| entry.get("value")),
            Value::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// The order total, falling back to the computed total in metadata.
    pub fn order_total(&self) -> Option<String> {
        if let Some(total) = &self.total {
            return Some(total.clone());
        }
        TOTAL_META_KEYS
            .iter()
            .find_map(|key| self.meta(key).and_then(lenient::amount_of))
    }
}

impl<'de> Deserialize<'de> for StorefrontOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Map::<String, Value>::deserialize(deserializer)?;
        StorefrontOrder::from_map(raw).map_err(de::Error::custom)
    }
}

impl Serialize for StorefrontOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

// ── Content management (List B) ──────────────────────────────────────────────

/// Order as reported by the content-management backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmsOrder {
    #[serde(deserialize_with = "lenient::id")]
    pub id: i64,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::text",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_created: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient::url_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub fotos_garantia: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub correo_enviado: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient::flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub pago_completo: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A content-management order after normalization: the warranty photo list and
/// both flags always have a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryData {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Value>,
    pub fotos_garantia: Vec<String>,
    pub correo_enviado: bool,
    pub pago_completo: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<CmsOrder> for SecondaryData {
    fn from(order: CmsOrder) -> Self {
        SecondaryData {
            id: order.id,
            status: order.status,
            date_created: order.date_created,
            total: order.total,
            customer: order.customer,
            fotos_garantia: order.fotos_garantia.unwrap_or_default(),
            correo_enviado: order.correo_enviado.unwrap_or(false),
            pago_completo: order.pago_completo.unwrap_or(false),
            extra: order.extra,
        }
    }
}

// ── Merged ───────────────────────────────────────────────────────────────────

/// Which upstream(s) supplied a merged order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderSource {
    Both,
    Primary,
    Secondary,
}

/// One order id after reconciliation. At least one side is always present.
#[derive(Debug, Clone, PartialEq)]
pub enum MergedOrder {
    Both {
        primary: StorefrontOrder,
        secondary: SecondaryData,
    },
    PrimaryOnly(StorefrontOrder),
    SecondaryOnly(SecondaryData),
}

impl MergedOrder {
    pub fn id(&self) -> i64 {
        match self {
            MergedOrder::Both { primary, .. } | MergedOrder::PrimaryOnly(primary) => primary.id(),
            MergedOrder::SecondaryOnly(secondary) => secondary.id,
        }
    }

    pub fn source(&self) -> OrderSource {
        match self {
            MergedOrder::Both { .. } => OrderSource::Both,
            MergedOrder::PrimaryOnly(_) => OrderSource::Primary,
            MergedOrder::SecondaryOnly(_) => OrderSource::Secondary,
        }
    }

    pub fn primary(&self) -> Option<&StorefrontOrder> {
        match self {
            MergedOrder::Both { primary, .. } | MergedOrder::PrimaryOnly(primary) => Some(primary),
            MergedOrder::SecondaryOnly(_) => None,
        }
    }

    pub fn secondary(&self) -> Option<&SecondaryData> {
        match self {
            MergedOrder::Both { secondary, .. } | MergedOrder::SecondaryOnly(secondary) => {
                Some(secondary)
            }
            MergedOrder::PrimaryOnly(_) => None,
        }
    }

    /// Storefront status when present, otherwise the content-management one.
    pub fn status(&self) -> Option<&str> {
        self.primary()
            .and_then(StorefrontOrder::status)
            .or_else(|| self.secondary().and_then(|s| s.status.as_deref()))
    }

    pub fn total(&self) -> Option<String> {
        self.primary()
            .and_then(StorefrontOrder::order_total)
            .or_else(|| self.secondary().and_then(|s| s.total.clone()))
    }
}

/// Storefront fields as received plus a `secondary_data` entry. An upstream
/// `secondary_data` key is dropped so the output never carries it twice.
struct WithSecondary<'a> {
    primary: &'a StorefrontOrder,
    secondary_data: Option<&'a SecondaryData>,
}

impl Serialize for WithSecondary<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.primary.raw() {
            if key != SECONDARY_DATA_KEY {
                map.serialize_entry(key, value)?;
            }
        }
        map.serialize_entry(SECONDARY_DATA_KEY, &self.secondary_data)?;
        map.end()
    }
}

const SECONDARY_DATA_KEY: &str = "secondary_data";

#[derive(Serialize)]
struct Synthesized<'a> {
    id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_created: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    customer: Option<&'a Value>,
    primary_data: Option<&'a StorefrontOrder>,
    secondary_data: &'a SecondaryData,
}

impl Serialize for MergedOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MergedOrder::Both { primary, secondary } => WithSecondary {
                primary,
                secondary_data: Some(secondary),
            }
            .serialize(serializer),
            MergedOrder::PrimaryOnly(primary) => WithSecondary {
                primary,
                secondary_data: None,
            }
            .serialize(serializer),
            MergedOrder::SecondaryOnly(secondary) => Synthesized {
                id: secondary.id,
                status: secondary.status.as_deref(),
                date_created: secondary.date_created.as_deref(),
                total: secondary.total.as_deref(),
                customer: secondary.customer.as_ref(),
                primary_data: None,
                secondary_data: secondary,
            }
            .serialize(serializer),
        }
    }
}
