// ==========================================
// 气动执行器选型报价引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope), 缺省值取 EngineConfig::default()
// ==========================================

use crate::config::engine_config::{EngineConfig, SeriesSparePartsConfig, TierBreak};
use crate::config::engine_config_trait::EngineConfigReader;
use crate::db::{ensure_schema, open_sqlite_connection};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const TIER_LADDER: &str = "pricing.tier_ladder";
    pub const CURRENCY_MINOR_DIGITS: &str = "pricing.currency_minor_digits";
    pub const SPARE_PARTS_TABLE: &str = "spare_parts.series_table";
    pub const SPRING_KIT_PRICE: &str = "spare_parts.spring_kit_price";
    pub const PRESSURE_TOLERANCE_BAR: &str = "matcher.pressure_tolerance_bar";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    defaults: EngineConfig,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            defaults: EngineConfig::default(),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self {
            conn,
            defaults: EngineConfig::default(),
        })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取 JSON 结构配置, 不存在时返回 None
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<Option<T>> {
        match self.get_config_value(key)? {
            Some(raw) => {
                let parsed = serde_json::from_str(&raw)
                    .map_err(|e| format!("配置值格式错误 (key: {}): {}", key, e))?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// 读取标量配置, 不存在时返回 None
    fn get_scalar<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_config_value(key)? {
            Some(raw) => {
                let parsed = raw.trim().parse::<T>().map_err(|e| {
                    format!("配置值格式错误 (key: {}, value: {}): {}", key, raw, e)
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 在批次选型日志中记录生效配置, 便于复现报价
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

#[async_trait]
impl EngineConfigReader for ConfigManager {
    async fn get_tier_ladder(&self) -> ConfigResult<Vec<TierBreak>> {
        Ok(self
            .get_json(config_keys::TIER_LADDER)?
            .unwrap_or_else(|| self.defaults.tier_ladder.clone()))
    }

    async fn get_currency_minor_digits(&self) -> ConfigResult<u32> {
        Ok(self
            .get_scalar(config_keys::CURRENCY_MINOR_DIGITS)?
            .unwrap_or(self.defaults.currency_minor_digits))
    }

    async fn get_spare_parts_table(&self) -> ConfigResult<Vec<SeriesSparePartsConfig>> {
        Ok(self
            .get_json(config_keys::SPARE_PARTS_TABLE)?
            .unwrap_or_else(|| self.defaults.spare_parts.clone()))
    }

    async fn get_spring_kit_price(&self) -> ConfigResult<f64> {
        Ok(self
            .get_scalar(config_keys::SPRING_KIT_PRICE)?
            .unwrap_or(self.defaults.spring_kit_price))
    }

    async fn get_pressure_tolerance_bar(&self) -> ConfigResult<f64> {
        Ok(self
            .get_scalar(config_keys::PRESSURE_TOLERANCE_BAR)?
            .unwrap_or(self.defaults.pressure_tolerance_bar))
    }
}
