use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::order_service::{AllOrdersReport, OrderService};
use crate::domain::order::MergedOrder;
use crate::domain::pagination::PageRequest;
use crate::domain::stats::OrderStats;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Both values are parsed leniently: absent, non-numeric or non-positive
/// values fall back to page 1 and 20 orders per page.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrdersQuery {
    /// Page number (1-based). Defaults to 1.
    pub page: Option<String>,
    /// Orders per page requested from each upstream. Defaults to 20.
    pub per_page: Option<String>,
}

impl OrdersQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest::from_query(self.page.as_deref(), self.per_page.as_deref())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DebugCounts {
    #[serde(rename = "wooOrdersCount")]
    pub woo_orders_count: usize,
    #[serde(rename = "wpOrdersCount")]
    pub wp_orders_count: usize,
    #[serde(rename = "uniqueOrdersCount")]
    pub unique_orders_count: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AllOrdersData {
    /// Merged orders: storefront fields plus `secondary_data`, or a record
    /// synthesized from the content-management side with `primary_data: null`.
    #[schema(value_type = Vec<Object>)]
    pub orders: Vec<MergedOrder>,
    pub total: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
    pub page: i64,
    pub per_page: i64,
    pub debug: DebugCounts,
}

impl From<AllOrdersReport> for AllOrdersData {
    fn from(report: AllOrdersReport) -> Self {
        Self {
            orders: report.orders,
            total: report.total,
            total_pages: report.total_pages,
            page: report.page.page,
            per_page: report.page.per_page,
            debug: DebugCounts {
                woo_orders_count: report.counts.storefront,
                wp_orders_count: report.counts.cms,
                unique_orders_count: report.counts.unique,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AllOrdersResponse {
    pub success: bool,
    pub message: String,
    pub data: AllOrdersData,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SourceBreakdownResponse {
    pub both: usize,
    pub primary_only: usize,
    pub secondary_only: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatsData {
    pub total_orders: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_source: SourceBreakdownResponse,
    /// Sum of order totals, excluding cancelled, failed and refunded orders.
    pub revenue: String,
    pub emails_sent: usize,
    pub payments_complete: usize,
    pub with_warranty_photos: usize,
}

impl From<OrderStats> for OrderStatsData {
    fn from(stats: OrderStats) -> Self {
        Self {
            total_orders: stats.total_orders,
            by_status: stats.by_status,
            by_source: SourceBreakdownResponse {
                both: stats.by_source.both,
                primary_only: stats.by_source.primary_only,
                secondary_only: stats.by_source.secondary_only,
            },
            revenue: stats.revenue.normalized().to_string(),
            emails_sent: stats.emails_sent,
            payments_complete: stats.payments_complete,
            with_warranty_photos: stats.with_warranty_photos,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatsResponse {
    pub success: bool,
    pub message: String,
    pub data: OrderStatsData,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/get-all-orders
///
/// Fetches the requested page from the storefront and content-management
/// services and returns every order id found on either side. `total` and
/// `totalPages` describe the merged set; the orders themselves are not sliced.
#[utoipa::path(
    get,
    path = "/api/get-all-orders",
    params(OrdersQuery),
    responses(
        (status = 200, description = "Merged orders", body = AllOrdersResponse),
        (status = 500, description = "Upstream or internal failure", body = crate::errors::ErrorEnvelope),
    ),
    tag = "orders"
)]
pub async fn get_all_orders(
    service: web::Data<OrderService>,
    query: web::Query<OrdersQuery>,
) -> Result<HttpResponse, AppError> {
    let page = query.page_request();

    let report = service
        .all_orders(page)
        .await
        .map_err(|e| AppError::with_context("Error fetching orders", e))?;

    log::info!(
        "Merged {} storefront and {} content-management orders into {} (page {}, per_page {})",
        report.counts.storefront,
        report.counts.cms,
        report.counts.unique,
        page.page,
        page.per_page
    );

    Ok(HttpResponse::Ok().json(AllOrdersResponse {
        success: true,
        message: "Orders fetched successfully".to_string(),
        data: report.into(),
    }))
}

/// GET /api/order-stats
///
/// Status, source and payment statistics over the same merged set that
/// `/api/get-all-orders` returns for the given page.
#[utoipa::path(
    get,
    path = "/api/order-stats",
    params(OrdersQuery),
    responses(
        (status = 200, description = "Order statistics", body = OrderStatsResponse),
        (status = 500, description = "Upstream or internal failure", body = crate::errors::ErrorEnvelope),
    ),
    tag = "orders"
)]
pub async fn get_order_stats(
    service: web::Data<OrderService>,
    query: web::Query<OrdersQuery>,
) -> Result<HttpResponse, AppError> {
    let stats = service
        .order_stats(query.page_request())
        .await
        .map_err(|e| AppError::with_context("Error computing order statistics", e))?;

    Ok(HttpResponse::Ok().json(OrderStatsResponse {
        success: true,
        message: "Order statistics computed successfully".to_string(),
        data: stats.into(),
    }))
}
