// ==========================================
// 气动执行器选型报价引擎 - 配置层
// ==========================================
// 职责: 引擎规则参数的定义、读取与覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod engine_config;
pub mod engine_config_trait;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use engine_config::{
    default_spare_parts_table, default_tier_ladder, EngineConfig, PartTemplate,
    SeriesSparePartsConfig, TierBreak,
};
pub use engine_config_trait::EngineConfigReader;
