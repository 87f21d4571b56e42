// ==========================================
// 气动执行器选型报价引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 按扭矩/气压/温度为阀门位号选出最小满足型号并报价
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 目录实体与选型模型
pub mod domain;

// 数据仓储层 - 目录读写
pub mod repository;

// 引擎层 - 匹配/定价/备件/批量编排
pub mod engine;

// 迁移层 - 种子数据与派生字段补齐
pub mod migration;

// 配置层 - 引擎参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ActionType, LifecycleStatus, Mechanism, PricingModel, Series, ValveType,
};

// 领域实体
pub use domain::{
    ActuatorModel, BatchSelectionResult, CatalogKey, CatalogRecord, PriceTier, RowError,
    SelectionExportRow, SelectionRequirement, SelectionResult, SparePartsKit, SpringRangePolicy,
};

// 引擎
pub use engine::{
    BatchOptions, BatchSelector, SelectionError, SparePartsKitBuilder, SpringRangeResolver,
    TieredPricingCalculator, TorqueMatcher,
};

// 仓储
pub use repository::{CatalogStore, InMemoryCatalogStore, SqliteCatalogStore};

// 配置
pub use config::{ConfigManager, EngineConfig, EngineConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "气动执行器选型报价引擎";
