use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::order::MergedOrder;
use crate::domain::pagination::{total_pages, PageRequest};
use crate::domain::ports::OrderSources;
use crate::domain::reconcile::reconcile;
use crate::domain::stats::OrderStats;

/// Per-source counts reported alongside the merged orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchCounts {
    pub storefront: usize,
    pub cms: usize,
    pub unique: usize,
}

#[derive(Debug, Clone)]
pub struct AllOrdersReport {
    pub orders: Vec<MergedOrder>,
    pub total: usize,
    pub total_pages: i64,
    pub page: PageRequest,
    pub counts: FetchCounts,
}

pub struct OrderService {
    sources: Arc<dyn OrderSources>,
}

impl OrderService {
    pub fn new(sources: Arc<dyn OrderSources>) -> Self {
        Self { sources }
    }

    /// Fetch one page from each upstream concurrently and reconcile them.
    /// The first upstream failure aborts the whole call.
    async fn fetch_merged(
        &self,
        page: PageRequest,
    ) -> Result<(Vec<MergedOrder>, FetchCounts), DomainError> {
        let (storefront, cms) = tokio::try_join!(
            self.sources.storefront_orders(page),
            self.sources.cms_orders(page)
        )?;

        let storefront_count = storefront.len();
        let cms_count = cms.len();
        let orders = reconcile(storefront, cms);
        let counts = FetchCounts {
            storefront: storefront_count,
            cms: cms_count,
            unique: orders.len(),
        };
        log::debug!(
            "Reconciled {} storefront and {} content-management orders into {}",
            counts.storefront,
            counts.cms,
            counts.unique
        );
        Ok((orders, counts))
    }

    /// The full merged set plus pagination metadata. The orders are not
    /// sliced; `total_pages` is informational.
    pub async fn all_orders(&self, page: PageRequest) -> Result<AllOrdersReport, DomainError> {
        let (orders, counts) = self.fetch_merged(page).await?;
        let total = orders.len();
        Ok(AllOrdersReport {
            total_pages: total_pages(total, page.per_page),
            orders,
            total,
            page,
            counts,
        })
    }

    pub async fn order_stats(&self, page: PageRequest) -> Result<OrderStats, DomainError> {
        let (orders, _) = self.fetch_merged(page).await?;
        Ok(OrderStats::from_orders(&orders))
    }
}
