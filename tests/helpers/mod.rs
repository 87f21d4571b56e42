// ==========================================
// 集成测试共享辅助
// ==========================================
#![allow(dead_code)]

pub mod catalog_builder;
pub mod fixtures;

use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = actuator_selection::db::open_sqlite_connection(&db_path)?;
    actuator_selection::db::ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(actuator_selection::db::open_sqlite_connection(db_path)?)
}
