use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::order::{MergedOrder, OrderSource};

/// Statuses whose totals are not counted as revenue.
const NON_REVENUE_STATUSES: [&str; 3] = ["cancelled", "failed", "refunded"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBreakdown {
    pub both: usize,
    pub primary_only: usize,
    pub secondary_only: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderStats {
    pub total_orders: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_source: SourceBreakdown,
    pub revenue: BigDecimal,
    pub emails_sent: usize,
    pub payments_complete: usize,
    pub with_warranty_photos: usize,
}

impl OrderStats {
    pub fn from_orders(orders: &[MergedOrder]) -> Self {
        let mut stats = OrderStats {
            total_orders: orders.len(),
            ..Default::default()
        };

        for order in orders {
            let status = order.status().unwrap_or("unknown");
            *stats.by_status.entry(status.to_string()).or_default() += 1;

            match order.source() {
                OrderSource::Both => stats.by_source.both += 1,
                OrderSource::Primary => stats.by_source.primary_only += 1,
                OrderSource::Secondary => stats.by_source.secondary_only += 1,
            }

            if let Some(secondary) = order.secondary() {
                stats.emails_sent += usize::from(secondary.correo_enviado);
                stats.payments_complete += usize::from(secondary.pago_completo);
                stats.with_warranty_photos += usize::from(!secondary.fotos_garantia.is_empty());
            }

            if NON_REVENUE_STATUSES.contains(&status) {
                continue;
            }
            if let Some(total) = order.total() {
                match BigDecimal::from_str(total.trim()) {
                    Ok(amount) => stats.revenue += amount,
                    Err(e) => log::warn!("Order {} has unparsable total {:?}: {}", order.id(), total, e),
                }
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::domain::order::{CmsOrder, StorefrontOrder};
    use crate::domain::reconcile::reconcile;

    fn storefront(value: Value) -> StorefrontOrder {
        serde_json::from_value(value).expect("storefront")
    }

    fn cms(value: Value) -> CmsOrder {
        serde_json::from_value(value).expect("cms")
    }

    #[test]
    fn empty_set_has_zero_stats() {
        let stats = OrderStats::from_orders(&[]);
        assert_eq!(stats, OrderStats::default());
    }

    #[test]
    fn counts_statuses_sources_and_flags() {
        let orders = reconcile(
            vec![
                storefront(json!({ "id": 1, "status": "completed", "total": "10.50" })),
                storefront(json!({ "id": 2, "status": "cancelled", "total": "99.00" })),
                storefront(json!({ "id": 3, "status": "processing", "total": "4.50" })),
            ],
            vec![
                cms(json!({ "id": 3, "correo_enviado": true, "fotos_garantia": ["u"] })),
                cms(json!({ "id": 4, "status": "pending", "total": 5, "pago_completo": "1" })),
            ],
        );

        let stats = OrderStats::from_orders(&orders);

        assert_eq!(stats.total_orders, 4);
        assert_eq!(stats.by_status.get("completed"), Some(&1));
        assert_eq!(stats.by_status.get("cancelled"), Some(&1));
        assert_eq!(stats.by_status.get("processing"), Some(&1));
        assert_eq!(stats.by_status.get("pending"), Some(&1));
        assert_eq!(
            stats.by_source,
            SourceBreakdown {
                both: 1,
                primary_only: 2,
                secondary_only: 1
            }
        );
        assert_eq!(stats.emails_sent, 1);
        assert_eq!(stats.payments_complete, 1);
        assert_eq!(stats.with_warranty_photos, 1);
        assert_eq!(stats.revenue, BigDecimal::from_str("20.00").expect("decimal"));
    }

    #[test]
    fn unparsable_totals_are_skipped() {
        let orders = reconcile(
            vec![
                storefront(json!({ "id": 1, "status": "completed", "total": "n/a" })),
                storefront(json!({ "id": 2, "status": "completed", "total": "3" })),
            ],
            vec![],
        );

        let stats = OrderStats::from_orders(&orders);

        assert_eq!(stats.revenue, BigDecimal::from(3));
    }

    #[test]
    fn missing_status_is_counted_as_unknown() {
        let orders = reconcile(vec![storefront(json!({ "id": 1 }))], vec![]);
        let stats = OrderStats::from_orders(&orders);
        assert_eq!(stats.by_status.get("unknown"), Some(&1));
    }
}
