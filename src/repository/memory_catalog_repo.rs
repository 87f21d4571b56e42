// ==========================================
// 气动执行器选型报价引擎 - 内存目录仓储
// ==========================================
// 用途: 单元测试/嵌入式调用的 CatalogStore 实现
// 并发: RwLock 保护, 写操作在写锁内完成 read-modify-write
// ==========================================

use crate::domain::actuator::{CatalogKey, CatalogRecord};
use crate::domain::types::LifecycleStatus;
use crate::repository::catalog_store::{
    CatalogFilter, CatalogStore, DerivedFieldPatch, PatchOutcome,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// 内存目录仓储
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    records: RwLock<BTreeMap<CatalogKey, CatalogRecord>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用一组记录初始化(主键重复时后者忽略)
    pub fn with_records(records: impl IntoIterator<Item = CatalogRecord>) -> Self {
        let mut map = BTreeMap::new();
        for record in records {
            map.entry(record.key()).or_insert(record);
        }
        Self {
            records: RwLock::new(map),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CatalogStore for InMemoryCatalogStore {
    fn query(&self, filter: &CatalogFilter) -> RepositoryResult<Vec<CatalogRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    fn get(&self, key: &CatalogKey) -> RepositoryResult<Option<CatalogRecord>> {
        let records = self
            .records
            .read()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(records.get(key).cloned())
    }

    fn insert_if_absent(&self, mut record: CatalogRecord) -> RepositoryResult<bool> {
        let mut records = self
            .records
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let key = record.key();
        if records.contains_key(&key) {
            return Ok(false);
        }
        let now = Utc::now();
        record.created_at.get_or_insert(now);
        record.updated_at.get_or_insert(now);
        records.insert(key, record);
        Ok(true)
    }

    fn apply_patch_if_absent(
        &self,
        key: &CatalogKey,
        patch: &DerivedFieldPatch,
    ) -> RepositoryResult<PatchOutcome> {
        let mut records = self
            .records
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let record = records.get_mut(key).ok_or_else(|| RepositoryError::NotFound {
            entity: "ActuatorModel".to_string(),
            id: key.to_string(),
        })?;
        Ok(patch.apply_if_absent(record))
    }

    fn update_status(&self, key: &CatalogKey, status: LifecycleStatus) -> RepositoryResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let record = records.get_mut(key).ok_or_else(|| RepositoryError::NotFound {
            entity: "ActuatorModel".to_string(),
            id: key.to_string(),
        })?;
        let current = record.lifecycle_status();
        if !current.can_transition_to(status) {
            return Err(RepositoryError::InvalidStateTransition {
                from: current.to_string(),
                to: status.to_string(),
            });
        }
        record.status = Some(status);
        record.updated_at = Some(Utc::now());
        Ok(())
    }
}
