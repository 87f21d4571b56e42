// ==========================================
// 气动执行器选型报价引擎 - 目录迁移层
// ==========================================
// 职责: 目录初始化(种子数据)与历史文档派生字段补齐
// 红线: 只做 update-if-absent, 可重复执行, 永不删除/覆盖已有字段
// 红线: 无需处理的记录计入 skipped, 不视为错误
// ==========================================

pub mod pricing_migration;
pub mod seed;
pub mod spare_parts_migration;

pub use pricing_migration::PricingMigration;
pub use seed::{CatalogSeeder, SeedReport};
pub use spare_parts_migration::SparePartsMigration;

use serde::{Deserialize, Serialize};

/// 单条记录迁移失败
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationFailure {
    pub key: String,
    pub reason: String,
}

/// 迁移执行报告
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationReport {
    pub migration: String,
    pub scanned: usize,
    pub migrated: usize,
    pub skipped: usize,
    pub failures: Vec<MigrationFailure>,
}

impl MigrationReport {
    pub fn new(migration: &str) -> Self {
        Self {
            migration: migration.to_string(),
            ..Default::default()
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn record_failure(&mut self, key: impl ToString, reason: impl Into<String>) {
        self.failures.push(MigrationFailure {
            key: key.to_string(),
            reason: reason.into(),
        });
    }
}
