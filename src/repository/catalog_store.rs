// ==========================================
// 气动执行器选型报价引擎 - 目录仓储接口
// ==========================================
// 职责: 定义目录读写接口，屏蔽存储技术细节
// 红线: 只允许写派生字段(pricing_model/price_tiers/base_price/spare_parts)
//       与生命周期状态; 永不删除记录, 永不覆盖已有字段
// ==========================================

use crate::domain::actuator::{CatalogKey, CatalogRecord};
use crate::domain::pricing::PriceTier;
use crate::domain::spare_parts::SparePartsKit;
use crate::domain::types::{ActionType, LifecycleStatus, Mechanism, PricingModel, Series, ValveType};
use crate::repository::error::RepositoryResult;
use chrono::Utc;

// ==========================================
// CatalogFilter - 查询条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub series: Option<Series>,
    /// 记录未区分阀门类型(None)时视为匹配任意阀门
    pub valve_type: Option<ValveType>,
    pub body_size: Option<String>,
    pub action_type: Option<ActionType>,
    pub mechanism: Option<Mechanism>,
    /// 默认只返回 published 记录
    pub include_unpublished: bool,
}

impl CatalogFilter {
    /// 不加任何过滤(含草稿/停产), 供迁移任务遍历
    pub fn all() -> Self {
        Self {
            include_unpublished: true,
            ..Default::default()
        }
    }

    pub fn matches(&self, record: &CatalogRecord) -> bool {
        if !self.include_unpublished && !record.lifecycle_status().is_selectable() {
            return false;
        }
        if let Some(series) = self.series {
            if record.series != Some(series) {
                return false;
            }
        }
        if let Some(valve) = self.valve_type {
            if record.valve_type.map_or(false, |v| v != valve) {
                return false;
            }
        }
        if let Some(body_size) = self.body_size.as_deref() {
            if record.body_size.as_deref().map(str::trim) != Some(body_size.trim()) {
                return false;
            }
        }
        if let Some(action) = self.action_type {
            if record.action_type != Some(action) {
                return false;
            }
        }
        if let Some(mechanism) = self.mechanism {
            let record_mechanism = record
                .mechanism
                .or_else(|| record.series.map(|s| s.default_mechanism()));
            if record_mechanism != Some(mechanism) {
                return false;
            }
        }
        true
    }
}

// ==========================================
// DerivedFieldPatch - 派生字段补丁(仅在缺失时写入)
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedFieldPatch {
    pub pricing_model: Option<PricingModel>,
    pub price_tiers: Option<Vec<PriceTier>>,
    pub base_price: Option<f64>,
    pub spare_parts: Option<SparePartsKit>,
}

/// 补丁实际写入的字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchOutcome {
    pub applied_fields: Vec<&'static str>,
}

impl PatchOutcome {
    pub fn is_noop(&self) -> bool {
        self.applied_fields.is_empty()
    }
}

impl DerivedFieldPatch {
    /// 对文档应用补丁: 每个字段仅在目标缺失时写入
    pub fn apply_if_absent(&self, record: &mut CatalogRecord) -> PatchOutcome {
        let mut outcome = PatchOutcome::default();

        if let (Some(model), None) = (self.pricing_model, record.pricing_model) {
            record.pricing_model = Some(model);
            outcome.applied_fields.push("pricing_model");
        }
        if let Some(tiers) = &self.price_tiers {
            if !record.has_price_tiers() && !tiers.is_empty() {
                record.price_tiers = Some(tiers.clone());
                outcome.applied_fields.push("price_tiers");
            }
        }
        if let (Some(price), None) = (self.base_price, record.base_price) {
            record.base_price = Some(price);
            outcome.applied_fields.push("base_price");
        }
        if let Some(kit) = &self.spare_parts {
            if record.spare_parts.is_none() {
                record.spare_parts = Some(kit.clone());
                outcome.applied_fields.push("spare_parts");
            }
        }

        if !outcome.is_noop() {
            record.updated_at = Some(Utc::now());
        }
        outcome
    }
}

// ==========================================
// CatalogStore Trait
// ==========================================
// 实现者: InMemoryCatalogStore / SqliteCatalogStore
pub trait CatalogStore: Send + Sync {
    /// 按条件查询, 结果按主键升序
    fn query(&self, filter: &CatalogFilter) -> RepositoryResult<Vec<CatalogRecord>>;

    /// 按主键读取
    fn get(&self, key: &CatalogKey) -> RepositoryResult<Option<CatalogRecord>>;

    /// 不存在时插入
    ///
    /// # 返回
    /// - Ok(true): 已插入
    /// - Ok(false): 主键已存在, 未做任何修改
    fn insert_if_absent(&self, record: CatalogRecord) -> RepositoryResult<bool>;

    /// 原子地对单条记录应用派生字段补丁(update-if-absent)
    fn apply_patch_if_absent(
        &self,
        key: &CatalogKey,
        patch: &DerivedFieldPatch,
    ) -> RepositoryResult<PatchOutcome>;

    /// 生命周期状态迁移(校验合法性)
    fn update_status(&self, key: &CatalogKey, status: LifecycleStatus) -> RepositoryResult<()>;

    /// 全量遍历(含草稿/停产)
    fn list_all(&self) -> RepositoryResult<Vec<CatalogRecord>> {
        self.query(&CatalogFilter::all())
    }
}
