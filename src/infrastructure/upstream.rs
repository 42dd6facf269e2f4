use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::errors::{DomainError, SourceKind};
use crate::domain::order::{CmsOrder, StorefrontOrder};
use crate::domain::pagination::PageRequest;
use crate::domain::ports::OrderSources;

use super::models::{CmsEnvelope, StorefrontEnvelope};

const STOREFRONT_PATH: &str = "/api/woo/get-orders";
const CMS_PATH: &str = "/api/wp/get-orders";

// ── Sources ──────────────────────────────────────────────────────────────────

/// Fetches order pages from the storefront and content-management services,
/// both served under a common origin.
pub struct HttpOrderSources {
    client: reqwest::Client,
    origin: String,
}

impl HttpOrderSources {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(origin: &str, timeout: Option<Duration>) -> Result<Self, DomainError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| DomainError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            origin: origin.trim_end_matches('/').to_string(),
        })
    }

    /// GET `path` and parse the body as JSON. Non-2xx statuses, transport
    /// errors and non-JSON bodies are failures.
    async fn fetch_json(
        &self,
        source_kind: SourceKind,
        path: &str,
        page: PageRequest,
    ) -> Result<Value, DomainError> {
        let url = format!("{}{}", self.origin, path);
        log::debug!(
            "Fetching {} orders from {} (page {}, per_page {})",
            source_kind,
            url,
            page.page,
            page.per_page
        );

        let resp = self
            .client
            .get(&url)
            .query(&[("page", page.page), ("per_page", page.per_page)])
            .send()
            .await
            .map_err(|e| DomainError::UpstreamTransport {
                source_kind,
                message: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let body = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                text
            };
            return Err(DomainError::UpstreamStatus {
                source_kind,
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| DomainError::UpstreamDecode {
                source_kind,
                message: e.to_string(),
            })
    }
}

/// Decode an upstream envelope, then each order in it. A body whose shape does
/// not match degrades to an empty list, and an order that does not decode is
/// skipped, instead of failing the request.
fn orders_or_empty<E, T>(
    source_kind: SourceKind,
    body: Value,
    into_orders: fn(E) -> Vec<Value>,
) -> Vec<T>
where
    E: DeserializeOwned,
    T: DeserializeOwned,
{
    let entries = match serde_json::from_value::<E>(body) {
        Ok(envelope) => into_orders(envelope),
        Err(e) => {
            log::warn!("Ignoring malformed {} orders payload: {}", source_kind, e);
            return Vec::new();
        }
    };

    let received = entries.len();
    let orders: Vec<T> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<T>(entry) {
            Ok(order) => Some(order),
            Err(e) => {
                log::warn!("Skipping {} order at index {}: {}", source_kind, index, e);
                None
            }
        })
        .collect();
    if orders.len() < received {
        log::warn!(
            "Kept {} of {} {} orders",
            orders.len(),
            received,
            source_kind
        );
    }
    orders
}

impl OrderSources for HttpOrderSources {
    fn storefront_orders(
        &self,
        page: PageRequest,
    ) -> BoxFuture<'_, Result<Vec<StorefrontOrder>, DomainError>> {
        async move {
            let body = self
                .fetch_json(SourceKind::Storefront, STOREFRONT_PATH, page)
                .await?;
            Ok(orders_or_empty(
                SourceKind::Storefront,
                body,
                StorefrontEnvelope::into_orders,
            ))
        }
        .boxed()
    }

    fn cms_orders(&self, page: PageRequest) -> BoxFuture<'_, Result<Vec<CmsOrder>, DomainError>> {
        async move {
            let body = self
                .fetch_json(SourceKind::ContentManagement, CMS_PATH, page)
                .await?;
            Ok(orders_or_empty(
                SourceKind::ContentManagement,
                body,
                CmsEnvelope::into_orders,
            ))
        }
        .boxed()
    }
}
