// ==========================================
// 批量选型集成测试
// ==========================================
// 测试目标: 部分成功、顺序保持、行级错误分类、备件包、并行一致性
// ==========================================

mod helpers;

use actuator_selection::config::EngineConfig;
use actuator_selection::domain::selection::{FailureKind, SelectionRequirement, SpringRangePolicy};
use actuator_selection::engine::{BatchOptions, BatchSelector};
use actuator_selection::repository::InMemoryCatalogStore;
use helpers::fixtures::{reference_requirement, standard_store};
use serde_json::json;
use std::sync::Arc;

fn selector() -> BatchSelector<InMemoryCatalogStore> {
    BatchSelector::new(standard_store(), &EngineConfig::default())
}

fn mixed_rows() -> Vec<SelectionRequirement> {
    vec![
        reference_requirement(),
        SelectionRequirement::new("FV-1002", "蝶阀", 800.0, 6.0, 1.25, 3),
        // 阀门类型无法识别
        SelectionRequirement::new("FV-1003", "gate valve", 100.0, 6.0, 1.25, 1),
        SelectionRequirement::new("FV-1004", "ball", 60.0, 4.0, 1.5, 100),
    ]
}

#[test]
fn test_reference_row_priced_at_ten_to_forty_nine_tier() {
    let batch = selector().select_batch(&[reference_requirement()], &BatchOptions::default());
    assert!(batch.errors.is_empty());
    let row = &batch.results[0];
    assert_eq!(row.model_code, "AT100");
    assert_eq!(row.actual_torque, 650.0);
    assert_eq!(row.minimum_torque, 625.0);
    assert_eq!(row.unit_price, 1425.0);
    assert_eq!(row.total_price, 17100.0);
    assert!(row.stock_sufficient);
}

#[test]
fn test_one_malformed_row_yields_n_minus_one_results() {
    let rows = mixed_rows();
    let batch = selector().select_batch(&rows, &BatchOptions::default());

    assert_eq!(batch.results.len(), rows.len() - 1);
    assert_eq!(batch.errors.len(), 1);
    assert_eq!(batch.errors[0].tag_number, "FV-1003");
    assert_eq!(batch.errors[0].row_index, 2);
    assert_eq!(batch.errors[0].kind, FailureKind::InvalidInput);

    let tags: Vec<&str> = batch.results.iter().map(|r| r.tag_number.as_str()).collect();
    assert_eq!(tags, vec!["FV-1001", "FV-1002", "FV-1004"]);

    let export = batch.export_rows();
    assert_eq!(export.len(), 3);
    assert_eq!(export[0].model, "AT100");
    assert_eq!(export[0].price, 17100.0);
}

#[test]
fn test_error_kinds_per_row() {
    let rows = vec![
        SelectionRequirement::new("E-1", "ball", 100.0, 9.0, 1.25, 1),
        SelectionRequirement::new("E-2", "ball", 50_000.0, 6.0, 1.25, 1),
        SelectionRequirement::new("E-3", "ball", 100.0, 6.0, 0.8, 1),
        SelectionRequirement::new("E-4", "ball", 100.0, 6.0, 1.25, 0),
    ];
    let batch = selector().select_batch(&rows, &BatchOptions::default());
    let kinds: Vec<FailureKind> = batch.errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FailureKind::OutOfRange,
            FailureKind::NotFound,
            FailureKind::InvalidInput,
            FailureKind::InvalidInput,
        ]
    );
    assert_eq!(batch.summary.failed, 4);
    assert_eq!(batch.summary.grand_total_price, 0.0);
}

#[test]
fn test_stock_check() {
    // GY52 库存 2
    let row = SelectionRequirement::new("HV-1", "ball", 4000.0, 6.0, 1.25, 3);
    let batch = selector().select_batch(&[row], &BatchOptions::default());
    assert_eq!(batch.results[0].model_code, "GY52");
    assert!(!batch.results[0].stock_sufficient);
}

#[test]
fn test_attach_spare_parts() {
    let options = BatchOptions {
        attach_spare_parts: true,
        ..Default::default()
    };
    let batch = selector().select_batch(&[reference_requirement()], &options);
    let row = &batch.results[0];
    let kit = row.spare_parts.as_ref().unwrap();
    assert!(kit.find_part("AT-BRG-AT100").is_some());
    assert!(kit.find_part("AT-SPR-AT100").is_none());
    // (120 + 45 + 25) × 12
    assert_eq!(row.spare_parts_cost, 2280.0);
    assert_eq!(batch.summary.grand_total_price, 17100.0 + 2280.0);
}

#[test]
fn test_summary_counts() {
    let batch = selector().select_batch(&mixed_rows(), &BatchOptions::default());
    assert_eq!(batch.summary.total_rows, 4);
    assert_eq!(batch.summary.succeeded, 3);
    assert_eq!(batch.summary.failed, 1);
    assert!(!batch.summary.batch_id.is_empty());
    let expected: f64 = batch.results.iter().map(|r| r.total_price).sum();
    assert_eq!(batch.summary.grand_total_price, expected);
}

#[tokio::test]
async fn test_parallel_batch_matches_sequential() {
    let s = Arc::new(selector());
    let rows = mixed_rows();
    let options = BatchOptions {
        attach_spare_parts: true,
        ..Default::default()
    };
    let sequential = s.select_batch(&rows, &options);
    let parallel = s.clone().select_batch_parallel(rows, options).await;

    assert_eq!(sequential.results, parallel.results);
    assert_eq!(sequential.errors, parallel.errors);
    assert_ne!(sequential.summary.batch_id, parallel.summary.batch_id);
}

fn upstream_rows() -> Vec<serde_json::Value> {
    vec![
        json!({
            "tag_number": "FV-1001", "valve_type": "Ball Valve",
            "required_torque": 500.0, "working_pressure": 6.0,
            "safety_factor": 1.25, "quantity": 12
        }),
        // 中文作用方式标签 + 批次级策略
        json!({
            "tag_number": "XV-2001", "valve_type": "球阀",
            "required_torque": 300.0, "working_pressure": 6.0,
            "safety_factor": 1.25, "quantity": 1, "action_type": "单作用"
        }),
        json!({
            "tag_number": "FV-1003", "valve_type": "ball",
            "required_torque": 100.0, "working_pressure": 6.0,
            "safety_factor": 1.25, "quantity": -2
        }),
        // 缺 working_pressure
        json!({
            "tag_number": "FV-1004", "valve_type": "ball",
            "required_torque": 100.0, "safety_factor": 1.25, "quantity": 1
        }),
        json!({
            "tag_number": "FV-1005", "valve_type": "蝶阀",
            "required_torque": 800.0, "working_pressure": 6.0,
            "safety_factor": 1.25, "quantity": 3, "series": "sf"
        }),
    ]
}

fn sr_options() -> BatchOptions {
    BatchOptions {
        spring_range_policy: Some(SpringRangePolicy::MinFailSafeTorque(200.0)),
        attach_spare_parts: false,
    }
}

#[test]
fn test_malformed_upstream_rows_fail_individually() {
    let batch = selector().select_batch_values(&upstream_rows(), &sr_options());

    let tags: Vec<&str> = batch.results.iter().map(|r| r.tag_number.as_str()).collect();
    assert_eq!(tags, vec!["FV-1001", "XV-2001", "FV-1005"]);
    assert_eq!(batch.results[1].model_code, "AT100-SR-K10");
    assert_eq!(batch.results[2].model_code, "SF10");

    assert_eq!(batch.errors.len(), 2);
    assert_eq!(batch.errors[0].tag_number, "FV-1003");
    assert_eq!(batch.errors[0].row_index, 2);
    assert_eq!(batch.errors[0].kind, FailureKind::InvalidInput);
    assert!(batch.errors[0].reason.contains("-2"));
    assert_eq!(batch.errors[1].tag_number, "FV-1004");
    assert_eq!(batch.errors[1].kind, FailureKind::InvalidInput);
    assert_eq!(batch.summary.total_rows, 5);
}

#[test]
fn test_row_without_tag_still_reported() {
    let rows = vec![json!({"valve_type": "ball"}), json!("not an object")];
    let batch = selector().select_batch_values(&rows, &BatchOptions::default());
    assert!(batch.results.is_empty());
    assert_eq!(batch.errors.len(), 2);
    assert!(batch.errors.iter().all(|e| e.tag_number.is_empty()));
    assert!(batch.errors.iter().all(|e| e.kind == FailureKind::InvalidInput));
}

#[tokio::test]
async fn test_parallel_upstream_rows_match_sequential() {
    let s = Arc::new(selector());
    let sequential = s.select_batch_values(&upstream_rows(), &sr_options());
    let parallel = s
        .clone()
        .select_batch_values_parallel(upstream_rows(), sr_options())
        .await;
    assert_eq!(sequential.results, parallel.results);
    assert_eq!(sequential.errors, parallel.errors);
}
