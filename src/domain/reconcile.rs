use std::collections::{HashMap, HashSet};

use super::order::{CmsOrder, MergedOrder, SecondaryData, StorefrontOrder};

/// Join the storefront and content-management pages into one record per id.
///
/// Output order is the first-encounter order of ids in `storefront`, followed
/// by the ids only present in `cms`, in their first-encounter order. When an
/// id repeats inside one list, its first occurrence is used.
pub fn reconcile(storefront: Vec<StorefrontOrder>, cms: Vec<CmsOrder>) -> Vec<MergedOrder> {
    let mut secondary_by_id: HashMap<i64, SecondaryData> = HashMap::with_capacity(cms.len());
    let mut cms_ids = Vec::with_capacity(cms.len());
    for order in cms {
        if !secondary_by_id.contains_key(&order.id) {
            cms_ids.push(order.id);
            secondary_by_id.insert(order.id, order.into());
        }
    }

    let mut merged = Vec::with_capacity(storefront.len() + cms_ids.len());
    let mut seen = HashSet::with_capacity(storefront.len());
    for primary in storefront {
        if !seen.insert(primary.id()) {
            continue;
        }
        merged.push(match secondary_by_id.remove(&primary.id()) {
            Some(secondary) => MergedOrder::Both { primary, secondary },
            None => MergedOrder::PrimaryOnly(primary),
        });
    }

    merged.extend(
        cms_ids
            .into_iter()
            .filter_map(|id| secondary_by_id.remove(&id))
            .map(MergedOrder::SecondaryOnly),
    );
    merged
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use serde_json::{json, Value};

    use super::*;
    use crate::domain::order::OrderSource;

    fn storefront(id: i64) -> StorefrontOrder {
        serde_json::from_value(json!({ "id": id, "status": "completed" })).expect("storefront")
    }

    fn cms(id: i64) -> CmsOrder {
        serde_json::from_value(json!({ "id": id, "status": "processing" })).expect("cms")
    }

    fn ids(merged: &[MergedOrder]) -> Vec<i64> {
        merged.iter().map(MergedOrder::id).collect()
    }

    #[test]
    fn empty_inputs_give_empty_output() {
        assert!(reconcile(vec![], vec![]).is_empty());
    }

    #[test]
    fn disjoint_ids_keep_every_record() {
        let a: Vec<_> = (1..=4).map(storefront).collect();
        let b: Vec<_> = (10..=12).map(cms).collect();

        let merged = reconcile(a, b);

        assert_eq!(merged.len(), 7);
        assert!(merged[..4].iter().all(|m| m.source() == OrderSource::Primary));
        assert!(merged[4..].iter().all(|m| m.source() == OrderSource::Secondary));
    }

    #[test]
    fn overlapping_ids_appear_once_with_secondary_data() {
        let a = vec![storefront(1), storefront(2), storefront(3)];
        let b = vec![cms(2), cms(3), cms(4)];

        let merged = reconcile(a, b);

        assert_eq!(ids(&merged), vec![1, 2, 3, 4]);
        for order in merged.iter().filter(|m| m.id() == 2 || m.id() == 3) {
            assert_eq!(order.source(), OrderSource::Both);
            assert!(order.secondary().is_some());
        }
    }

    #[test]
    fn order_is_storefront_then_cms_only_in_encounter_order() {
        let a = vec![storefront(9), storefront(2), storefront(5)];
        let b = vec![cms(8), cms(5), cms(1)];

        assert_eq!(ids(&reconcile(a, b)), vec![9, 2, 5, 8, 1]);
    }

    #[test]
    fn duplicate_ids_within_a_list_collapse_to_first() {
        let first: StorefrontOrder =
            serde_json::from_value(json!({ "id": 1, "status": "on-hold" })).expect("storefront");
        let a = vec![first, storefront(1)];
        let b = vec![cms(2), cms(2)];

        let merged = reconcile(a, b);

        assert_eq!(ids(&merged), vec![1, 2]);
        assert_eq!(merged[0].status(), Some("on-hold"));
    }

    #[test]
    fn reconciling_twice_gives_the_same_membership() {
        let a = vec![storefront(1), storefront(2)];
        let b = vec![cms(2), cms(3)];

        let first: BTreeSet<i64> = reconcile(a.clone(), b.clone()).iter().map(MergedOrder::id).collect();
        let second: BTreeSet<i64> = reconcile(a, b).iter().map(MergedOrder::id).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn storefront_only_order_is_passed_through_with_null_secondary() {
        let a: Vec<StorefrontOrder> = vec![serde_json::from_value(json!({
            "id": 1,
            "status": "completed",
            "billing": { "email": "a@b.c" }
        }))
        .expect("storefront")];

        let merged = reconcile(a, vec![]);
        let value = serde_json::to_value(&merged).expect("serialize");

        assert_eq!(
            value,
            json!([{
                "id": 1,
                "status": "completed",
                "billing": { "email": "a@b.c" },
                "secondary_data": null
            }])
        );
    }

    #[test]
    fn cms_only_order_is_synthesized_and_normalized() {
        let b: Vec<CmsOrder> = vec![serde_json::from_value(json!({
            "id": 7,
            "status": "processing",
            "fotos_garantia": null
        }))
        .expect("cms")];

        let merged = reconcile(vec![], b);
        let value = serde_json::to_value(&merged).expect("serialize");

        assert_eq!(
            value,
            json!([{
                "id": 7,
                "status": "processing",
                "primary_data": null,
                "secondary_data": {
                    "id": 7,
                    "status": "processing",
                    "fotos_garantia": [],
                    "correo_enviado": false,
                    "pago_completo": false
                }
            }])
        );
    }

    #[test]
    fn shared_id_uses_storefront_record_as_base() {
        let a: Vec<StorefrontOrder> =
            vec![serde_json::from_value(json!({ "id": 3, "status": "completed", "total": "12.00" }))
                .expect("storefront")];
        let b: Vec<CmsOrder> = vec![serde_json::from_value(json!({
            "id": 3,
            "status": "pending",
            "correo_enviado": true
        }))
        .expect("cms")];

        let merged = reconcile(a, b);
        assert_eq!(merged.len(), 1);

        let value: Value = serde_json::to_value(&merged[0]).expect("serialize");
        assert_eq!(value["status"], "completed");
        assert_eq!(value["total"], "12.00");
        assert_eq!(value["secondary_data"]["status"], "pending");
        assert_eq!(value["secondary_data"]["correo_enviado"], true);
        assert_eq!(value["secondary_data"]["pago_completo"], false);
        assert_eq!(value["secondary_data"]["fotos_garantia"], json!([]));
    }
}
