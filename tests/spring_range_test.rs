// ==========================================
// 弹簧复位选型集成测试
// ==========================================
// 测试目标: SR 匹配 → 同本体弹簧变体裁决 → 定价
// ==========================================

mod helpers;

use actuator_selection::config::EngineConfig;
use actuator_selection::domain::selection::{FailureKind, SelectionRequirement, SpringRangePolicy};
use actuator_selection::engine::{BatchOptions, BatchSelector, SelectionError};
use actuator_selection::repository::InMemoryCatalogStore;
use helpers::fixtures::standard_store;

fn selector() -> BatchSelector<InMemoryCatalogStore> {
    BatchSelector::new(standard_store(), &EngineConfig::default())
}

fn sr_row(policy: Option<SpringRangePolicy>) -> SelectionRequirement {
    // 300 × 1.25 = 375 N·m @ 6 bar
    SelectionRequirement::new("XV-2001", "ball", 300.0, 6.0, 1.25, 1).spring_return(policy)
}

#[test]
fn test_min_fail_safe_picks_smallest_adequate_spring() {
    let s = selector();
    let result = s
        .select_row(
            &sr_row(Some(SpringRangePolicy::MinFailSafeTorque(200.0))),
            &BatchOptions::default(),
        )
        .unwrap();
    assert_eq!(result.model_code, "AT100-SR-K10");
    assert_eq!(result.spring_range.as_deref(), Some("K10"));
    assert_eq!(result.actual_torque, 450.0);
    assert_eq!(result.unit_price, 1950.0);

    let result = s
        .select_row(
            &sr_row(Some(SpringRangePolicy::MinFailSafeTorque(150.0))),
            &BatchOptions::default(),
        )
        .unwrap();
    assert_eq!(result.model_code, "AT100-SR-K8");
    assert_eq!(result.actual_torque, 500.0);
}

#[test]
fn test_exact_policy() {
    let result = selector()
        .select_row(
            &sr_row(Some(SpringRangePolicy::Exact("K8".to_string()))),
            &BatchOptions::default(),
        )
        .unwrap();
    assert_eq!(result.model_code, "AT100-SR-K8");
}

#[test]
fn test_policy_miss_moves_to_next_body_size() {
    // AT100 的 K8/K10 失效安全扭矩均 < 300, AT125-SR-K8 为 350
    let result = selector()
        .select_row(
            &sr_row(Some(SpringRangePolicy::MinFailSafeTorque(300.0))),
            &BatchOptions::default(),
        )
        .unwrap();
    assert_eq!(result.model_code, "AT125-SR-K8");
    assert_eq!(result.body_size, "AT125");
    assert_eq!(result.spring_range.as_deref(), Some("K8"));
    assert_eq!(result.actual_torque, 1000.0);
    assert_eq!(result.torque_margin, 625.0);
    assert_eq!(result.unit_price, 3200.0);
}

#[test]
fn test_exact_policy_missing_on_every_covering_body_is_not_found() {
    let k10 = || Some(SpringRangePolicy::Exact("K10".to_string()));
    // 900 N·m 只有 AT125 能覆盖, 而 AT125 没有 K10
    let heavy = SelectionRequirement::new("XV-2002", "ball", 900.0, 6.0, 1.0, 1).spring_return(k10());
    let batch = selector().select_batch(&[sr_row(k10()), heavy], &BatchOptions::default());
    assert_eq!(batch.results.len(), 1);
    assert_eq!(batch.results[0].model_code, "AT100-SR-K10");
    assert_eq!(batch.errors[0].tag_number, "XV-2002");
    assert_eq!(batch.errors[0].kind, FailureKind::NotFound);
}

#[test]
fn test_unsatisfiable_policy_is_not_found() {
    let err = selector()
        .select_row(
            &sr_row(Some(SpringRangePolicy::MinFailSafeTorque(400.0))),
            &BatchOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, SelectionError::NotFound(_)));
}

#[test]
fn test_batch_level_policy_applies_when_row_has_none() {
    let options = BatchOptions {
        spring_range_policy: Some(SpringRangePolicy::MinFailSafeTorque(200.0)),
        attach_spare_parts: false,
    };
    let batch = selector().select_batch(&[sr_row(None)], &options);
    assert_eq!(batch.results.len(), 1);
    assert_eq!(batch.results[0].spring_range.as_deref(), Some("K10"));
}

#[test]
fn test_missing_policy_is_invalid_input() {
    let batch = selector().select_batch(&[sr_row(None)], &BatchOptions::default());
    assert!(batch.results.is_empty());
    assert_eq!(batch.errors[0].kind, FailureKind::InvalidInput);
}
