// ==========================================
// 气动执行器选型报价引擎 - 定价模式迁移
// ==========================================
// 职责: 为缺少 pricing_model 的历史文档归类并补齐价格阶梯
// 规则: 已有 pricing_model → skipped
//       tiered 且无阶梯 → 由 base_price 生成标准阶梯
//       base_price 永不改写
// ==========================================

use crate::domain::actuator::CatalogRecord;
use crate::domain::types::PricingModel;
use crate::engine::pricing::{PricingClassification, TieredPricingCalculator};
use crate::migration::MigrationReport;
use crate::repository::catalog_store::{CatalogStore, DerivedFieldPatch};
use crate::repository::error::RepositoryResult;
use tracing::{debug, info, instrument, warn};

pub struct PricingMigration {
    pricing: TieredPricingCalculator,
}

impl PricingMigration {
    pub fn new(pricing: TieredPricingCalculator) -> Self {
        Self { pricing }
    }

    /// 为单条记录生成补丁
    ///
    /// # 返回
    /// - Ok(None): 无需迁移
    /// - Ok(Some(patch)): 待写入字段
    /// - Err(reason): 记录无法迁移
    pub fn plan(&self, record: &CatalogRecord) -> Result<Option<DerivedFieldPatch>, String> {
        let model = match self.pricing.classify(record) {
            PricingClassification::Skip(_) => return Ok(None),
            PricingClassification::Assign(model) => model,
        };

        let mut patch = DerivedFieldPatch {
            pricing_model: Some(model),
            ..Default::default()
        };

        match model {
            PricingModel::Fixed => {
                if record.base_price.is_none() {
                    return Err("fixed 定价缺少 base_price".to_string());
                }
            }
            PricingModel::Tiered => {
                if let Some(tiers) = record.price_tiers.as_deref().filter(|t| !t.is_empty()) {
                    self.pricing
                        .validate_tiers(tiers)
                        .map_err(|e| e.to_string())?;
                } else {
                    let base_price = record
                        .base_price
                        .ok_or_else(|| "tiered 定价缺少 base_price, 无法生成阶梯".to_string())?;
                    let tiers = self
                        .pricing
                        .build_tiers(base_price)
                        .map_err(|e| e.to_string())?;
                    patch.price_tiers = Some(tiers);
                }
            }
        }
        Ok(Some(patch))
    }

    /// 遍历目录执行迁移(可重复执行)
    #[instrument(skip(self, store))]
    pub fn run<S: CatalogStore>(&self, store: &S) -> RepositoryResult<MigrationReport> {
        let mut report = MigrationReport::new("pricing_model");

        for record in store.list_all()? {
            report.scanned += 1;
            let key = record.key();
            match self.plan(&record) {
                Ok(None) => report.skipped += 1,
                Ok(Some(patch)) => {
                    let outcome = store.apply_patch_if_absent(&key, &patch)?;
                    if outcome.is_noop() {
                        report.skipped += 1;
                    } else {
                        debug!(key = %key, fields = ?outcome.applied_fields, "定价字段已补齐");
                        report.migrated += 1;
                    }
                }
                Err(reason) => {
                    warn!(key = %key, reason = %reason, "定价迁移失败");
                    report.record_failure(&key, reason);
                }
            }
        }

        info!(
            scanned = report.scanned,
            migrated = report.migrated,
            skipped = report.skipped,
            failed = report.failed(),
            "定价模式迁移完成"
        );
        Ok(report)
    }
}
