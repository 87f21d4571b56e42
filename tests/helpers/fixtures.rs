// ==========================================
// 标准目录夹具
// ==========================================
// AT: 齿轮齿条, 阶梯定价, 发布气压至 7 bar
// SF: 拨叉式, 球阀/蝶阀两个变体, 固定价, 发布气压至 6 bar
// GY: 重载拨叉式, 宽温, 发布气压至 8 bar
// ==========================================

use super::catalog_builder::CatalogRecordBuilder;
use actuator_selection::domain::actuator::CatalogRecord;
use actuator_selection::domain::selection::SelectionRequirement;
use actuator_selection::domain::types::{LifecycleStatus, Series, ValveType};
use actuator_selection::repository::InMemoryCatalogStore;
use std::sync::Arc;

pub fn standard_catalog() -> Vec<CatalogRecord> {
    vec![
        // ===== AT 双作用 =====
        CatalogRecordBuilder::new("AT092", Series::At)
            .curve(&[(4.0, 400.0), (5.0, 500.0), (6.0, 600.0), (7.0, 700.0)])
            .temperature(-20.0, 80.0)
            .tiered(1300.0)
            .build(),
        CatalogRecordBuilder::new("AT100", Series::At)
            .curve(&[(4.0, 433.0), (5.0, 541.0), (6.0, 650.0), (7.0, 758.0)])
            .temperature(-20.0, 80.0)
            .tiered(1500.0)
            .inventory(20)
            .build(),
        CatalogRecordBuilder::new("AT125", Series::At)
            .curve(&[(4.0, 800.0), (5.0, 1000.0), (6.0, 1200.0), (7.0, 1400.0)])
            .temperature(-20.0, 80.0)
            .tiered(2500.0)
            .build(),
        // 草稿状态, 余量虽小但不可选
        CatalogRecordBuilder::new("AT096", Series::At)
            .curve(&[(6.0, 626.0)])
            .temperature(-20.0, 80.0)
            .tiered(1400.0)
            .status(LifecycleStatus::Draft)
            .build(),
        // ===== AT 弹簧复位 =====
        CatalogRecordBuilder::new("AT100-SR-K8", Series::At)
            .body_size("AT100")
            .spring_return("K8", 180.0)
            .curve(&[(4.0, 300.0), (5.0, 400.0), (6.0, 500.0), (7.0, 600.0)])
            .temperature(-20.0, 80.0)
            .tiered(1900.0)
            .build(),
        CatalogRecordBuilder::new("AT100-SR-K10", Series::At)
            .body_size("AT100")
            .spring_return("K10", 240.0)
            .curve(&[(4.0, 250.0), (5.0, 350.0), (6.0, 450.0), (7.0, 550.0)])
            .temperature(-20.0, 80.0)
            .tiered(1950.0)
            .build(),
        CatalogRecordBuilder::new("AT125-SR-K8", Series::At)
            .body_size("AT125")
            .spring_return("K8", 350.0)
            .curve(&[(4.0, 650.0), (5.0, 850.0), (6.0, 1000.0), (7.0, 1150.0)])
            .temperature(-20.0, 80.0)
            .tiered(3200.0)
            .build(),
        // ===== SF 阀门变体 =====
        CatalogRecordBuilder::new("SF10", Series::Sf)
            .valve(ValveType::Ball)
            .curve(&[(4.0, 1500.0), (6.0, 2200.0)])
            .temperature(-20.0, 80.0)
            .fixed(4200.0)
            .build(),
        CatalogRecordBuilder::new("SF10", Series::Sf)
            .valve(ValveType::Butterfly)
            .curve(&[(4.0, 1400.0), (6.0, 2000.0)])
            .temperature(-20.0, 80.0)
            .fixed(4100.0)
            .build(),
        // ===== GY 重载 =====
        CatalogRecordBuilder::new("GY52", Series::Gy)
            .curve(&[(4.0, 5000.0), (6.0, 7500.0), (8.0, 9800.0)])
            .temperature(-40.0, 120.0)
            .tiered(12000.0)
            .inventory(2)
            .build(),
    ]
}

pub fn standard_store() -> Arc<InMemoryCatalogStore> {
    Arc::new(InMemoryCatalogStore::with_records(standard_catalog()))
}

/// 500 N·m × 1.25 @ 6 bar, 数量 12
pub fn reference_requirement() -> SelectionRequirement {
    SelectionRequirement::new("FV-1001", "Ball Valve", 500.0, 6.0, 1.25, 12)
}
