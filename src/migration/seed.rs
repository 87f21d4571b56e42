// ==========================================
// 气动执行器选型报价引擎 - 目录种子数据
// ==========================================
// 职责: 将目录文档写入仓储, 主键已存在时跳过
// ==========================================

use crate::domain::actuator::CatalogRecord;
use crate::repository::catalog_store::CatalogStore;
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// 种子写入报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
    pub skipped_keys: Vec<String>,
}

pub struct CatalogSeeder<'a, S: CatalogStore> {
    store: &'a S,
}

impl<'a, S: CatalogStore> CatalogSeeder<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// 逐条 insert-if-absent
    #[instrument(skip(self, records))]
    pub fn seed(&self, records: Vec<CatalogRecord>) -> RepositoryResult<SeedReport> {
        let mut report = SeedReport::default();
        for record in records {
            if record.model_code.trim().is_empty() {
                return Err(RepositoryError::InternalError(
                    "种子记录缺少 model_code".to_string(),
                ));
            }
            let key = record.key();
            if self.store.insert_if_absent(record)? {
                report.inserted += 1;
            } else {
                debug!(key = %key, "主键已存在, 跳过");
                report.skipped += 1;
                report.skipped_keys.push(key.to_string());
            }
        }
        info!(
            inserted = report.inserted,
            skipped = report.skipped,
            "目录种子写入完成"
        );
        Ok(report)
    }

    /// 从 JSON 数组文件读取目录文档并写入
    pub fn seed_from_json_file(&self, path: impl AsRef<Path>) -> RepositoryResult<SeedReport> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::InternalError(format!("读取种子文件失败 {}: {}", path.display(), e))
        })?;
        let records: Vec<CatalogRecord> = serde_json::from_str(&content)?;
        self.seed(records)
    }
}
