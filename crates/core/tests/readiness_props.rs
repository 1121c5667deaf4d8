#![forbid(unsafe_code)]

use cspy_core::{is_ready, normalize, Condition, ConditionStatus, RawObject, ResourceKind, Scope};
use proptest::prelude::*;
use serde_json::json;

fn status() -> impl Strategy<Value = ConditionStatus> {
    prop_oneof![Just(ConditionStatus::True), Just(ConditionStatus::False), Just(ConditionStatus::Unknown)]
}

fn condition(type_: impl Strategy<Value = String>) -> impl Strategy<Value = Condition> {
    (type_, status()).prop_map(|(type_, status)| Condition {
        type_,
        status,
        last_transition_time: None,
        reason: String::new(),
        message: String::new(),
    })
}

fn non_ready_type() -> impl Strategy<Value = String> {
    "[A-Za-z]{1,12}".prop_filter("not Ready", |t| t != "Ready")
}

proptest! {
    #[test]
    fn ready_true_entry_always_wins(
        mut others in prop::collection::vec(condition("[A-Za-z]{1,12}"), 0..8),
        at in 0usize..8,
    ) {
        let ready = Condition {
            type_: "Ready".into(),
            status: ConditionStatus::True,
            last_transition_time: None,
            reason: String::new(),
            message: String::new(),
        };
        let at = at.min(others.len());
        others.insert(at, ready);
        prop_assert!(is_ready(&others));
    }

    #[test]
    fn without_ready_type_never_ready(conds in prop::collection::vec(condition(non_ready_type()), 0..8)) {
        prop_assert!(!is_ready(&conds));
    }

    #[test]
    fn readiness_is_order_independent(conds in prop::collection::vec(condition("(Ready|Synced|Healthy)"), 0..8)) {
        let mut reversed = conds.clone();
        reversed.reverse();
        prop_assert_eq!(is_ready(&conds), is_ready(&reversed));
    }

    #[test]
    fn objects_without_conditions_are_not_ready(name in "[a-z][a-z0-9-]{0,20}", with_status in any::<bool>()) {
        let mut v = json!({ "kind": "Provider", "metadata": { "name": name } });
        if with_status {
            v["status"] = json!({ "currentRevision": "rev-1" });
        }
        let n = normalize(&RawObject::new(v), ResourceKind::Provider, Scope::Cluster);
        prop_assert!(n.status.conditions.is_empty());
        prop_assert!(!n.status.ready);
    }
}
