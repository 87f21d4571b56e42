// ==========================================
// 气动执行器选型报价引擎 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供目录读写接口,屏蔽存储细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod catalog_repo;
pub mod catalog_store;
pub mod error;
pub mod memory_catalog_repo;

// 重导出核心仓储
pub use catalog_repo::SqliteCatalogStore;
pub use catalog_store::{CatalogFilter, CatalogStore, DerivedFieldPatch, PatchOutcome};
pub use error::{RepositoryError, RepositoryResult};
pub use memory_catalog_repo::InMemoryCatalogStore;
