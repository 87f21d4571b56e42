// ==========================================
// 气动执行器选型报价引擎 - SQLite 目录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储: actuator_catalog 表, document 列保存 JSON 文档
// 并发: 单连接 + Mutex, 写操作使用 IMMEDIATE 事务, 保证每条记录至多一个写者
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::actuator::{CatalogKey, CatalogRecord};
use crate::domain::types::LifecycleStatus;
use crate::repository::catalog_store::{
    CatalogFilter, CatalogStore, DerivedFieldPatch, PatchOutcome,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::sync::{Arc, Mutex};
use tracing::debug;

// ==========================================
// SqliteCatalogStore - 目录仓储
// ==========================================
/// 职责: 管理 actuator_catalog 表的读取与派生字段写入
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogStore {
    /// 创建新的 SqliteCatalogStore 实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn load_document(conn: &Connection, key: &CatalogKey) -> RepositoryResult<Option<CatalogRecord>> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT document FROM actuator_catalog
                 WHERE model_code = ?1 AND series = ?2 AND valve_variant = ?3",
                params![key.model_code, key.series_key(), key.valve_variant()],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn write_document(conn: &Connection, record: &CatalogRecord) -> RepositoryResult<usize> {
        let key = record.key();
        let document = serde_json::to_string(record)?;
        let affected = conn.execute(
            r#"
            UPDATE actuator_catalog
            SET document = ?4, status = ?5, updated_at = ?6
            WHERE model_code = ?1 AND series = ?2 AND valve_variant = ?3
            "#,
            params![
                key.model_code,
                key.series_key(),
                key.valve_variant(),
                document,
                record.lifecycle_status().to_string(),
                record.updated_at.unwrap_or_else(Utc::now).to_rfc3339(),
            ],
        )?;
        Ok(affected)
    }

    fn not_found(key: &CatalogKey) -> RepositoryError {
        RepositoryError::NotFound {
            entity: "ActuatorModel".to_string(),
            id: key.to_string(),
        }
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn query(&self, filter: &CatalogFilter) -> RepositoryResult<Vec<CatalogRecord>> {
        let conn = self.get_conn()?;

        // 系列在 SQL 侧过滤, 其余条件(阀门通配/结构缺省)在文档上判定
        let series = filter.series.map(|s| s.as_str().to_string());
        let mut stmt = conn.prepare(
            r#"
            SELECT document FROM actuator_catalog
            WHERE (?1 IS NULL OR series = ?1)
            ORDER BY model_code, series, valve_variant
            "#,
        )?;
        let rows = stmt.query_map(params![series], |row| row.get::<_, String>(0))?;

        let mut records = Vec::new();
        for row in rows {
            let record: CatalogRecord = serde_json::from_str(&row?)?;
            if filter.matches(&record) {
                records.push(record);
            }
        }
        debug!(count = records.len(), "目录查询完成");
        Ok(records)
    }

    fn get(&self, key: &CatalogKey) -> RepositoryResult<Option<CatalogRecord>> {
        let conn = self.get_conn()?;
        Self::load_document(&conn, key)
    }

    fn insert_if_absent(&self, mut record: CatalogRecord) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let now = Utc::now();
        record.created_at.get_or_insert(now);
        record.updated_at.get_or_insert(now);

        let key = record.key();
        let document = serde_json::to_string(&record)?;
        let affected = conn.execute(
            r#"
            INSERT OR IGNORE INTO actuator_catalog (
                model_code, series, valve_variant, body_size, action_type, status,
                document, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                key.model_code,
                key.series_key(),
                key.valve_variant(),
                record.body_size,
                record.action_type.map(|a| a.as_str().to_string()),
                record.lifecycle_status().to_string(),
                document,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ],
        )?;
        Ok(affected == 1)
    }

    fn apply_patch_if_absent(
        &self,
        key: &CatalogKey,
        patch: &DerivedFieldPatch,
    ) -> RepositoryResult<PatchOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut record = Self::load_document(&tx, key)?.ok_or_else(|| Self::not_found(key))?;
        let outcome = patch.apply_if_absent(&mut record);
        if !outcome.is_noop() {
            Self::write_document(&tx, &record)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(outcome)
    }

    fn update_status(&self, key: &CatalogKey, status: LifecycleStatus) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut record = Self::load_document(&tx, key)?.ok_or_else(|| Self::not_found(key))?;
        let current = record.lifecycle_status();
        if !current.can_transition_to(status) {
            return Err(RepositoryError::InvalidStateTransition {
                from: current.to_string(),
                to: status.to_string(),
            });
        }
        record.status = Some(status);
        record.updated_at = Some(Utc::now());
        Self::write_document(&tx, &record)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }
}
