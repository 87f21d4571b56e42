// ==========================================
// 气动执行器选型报价引擎 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表语句集中维护（目录文档表 + 配置表）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 2;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// - actuator_catalog: 目录文档, 主键 (model_code, series, valve_variant)
/// - config_kv: 全局配置覆写
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    if read_schema_version(conn)? == Some(1) {
        upgrade_catalog_key_v1(conn)?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS actuator_catalog (
            model_code TEXT NOT NULL,
            series TEXT NOT NULL DEFAULT '',
            valve_variant TEXT NOT NULL DEFAULT '',
            body_size TEXT,
            action_type TEXT,
            status TEXT,
            document TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (model_code, series, valve_variant)
        );

        CREATE INDEX IF NOT EXISTS idx_actuator_catalog_series_size
            ON actuator_catalog (series, body_size);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// v1 → v2: 主键加入 series, 旧表的 NULL series 归一为空串
fn upgrade_catalog_key_v1(conn: &Connection) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        r#"
        ALTER TABLE actuator_catalog RENAME TO actuator_catalog_v1;
        DROP INDEX IF EXISTS idx_actuator_catalog_series_size;
        CREATE TABLE actuator_catalog (
            model_code TEXT NOT NULL,
            series TEXT NOT NULL DEFAULT '',
            valve_variant TEXT NOT NULL DEFAULT '',
            body_size TEXT,
            action_type TEXT,
            status TEXT,
            document TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (model_code, series, valve_variant)
        );
        INSERT INTO actuator_catalog (
            model_code, series, valve_variant, body_size, action_type, status,
            document, created_at, updated_at
        )
        SELECT model_code, COALESCE(series, ''), valve_variant, body_size, action_type, status,
               document, created_at, updated_at
        FROM actuator_catalog_v1;
        DROP TABLE actuator_catalog_v1;
        INSERT OR IGNORE INTO schema_version (version) VALUES (2);
        "#,
    )?;
    tx.commit()
}

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "ACTUATOR_SELECTION_DB_PATH";

/// 默认数据库路径
///
/// 优先级: 环境变量 ACTUATOR_SELECTION_DB_PATH → 用户数据目录 → 当前目录
pub fn default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./actuator_selection.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("actuator-selection");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("actuator_selection.db");
        }
    }
    path.to_string_lossy().to_string()
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), None);
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_v1_catalog_table_is_rekeyed() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE schema_version (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            INSERT INTO schema_version (version) VALUES (1);
            CREATE TABLE actuator_catalog (
                model_code TEXT NOT NULL,
                valve_variant TEXT NOT NULL DEFAULT '',
                series TEXT,
                body_size TEXT,
                action_type TEXT,
                status TEXT,
                document TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (model_code, valve_variant)
            );
            INSERT INTO actuator_catalog VALUES ('AT63', '', 'AT', NULL, NULL, NULL, '{}', 'x', 'x');
            INSERT INTO actuator_catalog VALUES ('X1', '', NULL, NULL, NULL, NULL, '{}', 'x', 'x');
            "#,
        )
        .unwrap();

        ensure_schema(&conn).unwrap();
        assert_eq!(read_schema_version(&conn).unwrap(), Some(CURRENT_SCHEMA_VERSION));

        let blank: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM actuator_catalog WHERE model_code = 'X1' AND series = ''",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(blank, 1);

        // 同型号不同系列可以并存
        conn.execute(
            "INSERT INTO actuator_catalog VALUES ('AT63', 'GY', '', NULL, NULL, NULL, '{}', 'x', 'x')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_default_db_path() {
        let path = default_db_path();
        assert!(!path.is_empty());
    }
}
