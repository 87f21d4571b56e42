// ==========================================
// 气动执行器选型报价引擎 - 备件包迁移
// ==========================================
// 职责: 为缺少 spare_parts 的目录记录生成并写入备件包
// 红线: 已有备件包的记录一律跳过
// ==========================================

use crate::domain::actuator::CatalogRecord;
use crate::domain::spare_parts::SparePartsKit;
use crate::engine::spare_parts::SparePartsKitBuilder;
use crate::migration::MigrationReport;
use crate::repository::catalog_store::{CatalogStore, DerivedFieldPatch};
use crate::repository::error::RepositoryResult;
use tracing::{info, instrument, warn};

pub struct SparePartsMigration {
    builder: SparePartsKitBuilder,
}

impl SparePartsMigration {
    pub fn new(builder: SparePartsKitBuilder) -> Self {
        Self { builder }
    }

    fn kit_for(&self, record: &CatalogRecord) -> Result<SparePartsKit, String> {
        let series = record.series.ok_or("缺少 series")?;
        let action_type = record.action_type.ok_or("缺少 action_type")?;
        let body_size = record.body_size.as_deref().ok_or("缺少 body_size")?;
        self.builder
            .build_kit(series, action_type, body_size)
            .map_err(|e| e.to_string())
    }

    #[instrument(skip(self, store))]
    pub fn run<S: CatalogStore>(&self, store: &S) -> RepositoryResult<MigrationReport> {
        let mut report = MigrationReport::new("spare_parts");

        for record in store.list_all()? {
            report.scanned += 1;
            if record.spare_parts.is_some() {
                report.skipped += 1;
                continue;
            }
            let key = record.key();
            match self.kit_for(&record) {
                Ok(kit) => {
                    let patch = DerivedFieldPatch {
                        spare_parts: Some(kit),
                        ..Default::default()
                    };
                    if store.apply_patch_if_absent(&key, &patch)?.is_noop() {
                        report.skipped += 1;
                    } else {
                        report.migrated += 1;
                    }
                }
                Err(reason) => {
                    warn!(key = %key, reason = %reason, "备件包生成失败");
                    report.record_failure(&key, reason);
                }
            }
        }

        info!(
            scanned = report.scanned,
            migrated = report.migrated,
            skipped = report.skipped,
            failed = report.failed(),
            "备件包迁移完成"
        );
        Ok(report)
    }
}
