// ==========================================
// 气动执行器选型报价引擎 - 引擎层
// ==========================================
// 职责: 扭矩匹配、弹簧范围解析、阶梯定价、备件包生成、批量编排
// 红线: 引擎不拼 SQL, 只经由 CatalogStore 读取目录
// 红线: 所有失败必须带可读原因, 不允许静默降级
// ==========================================

pub mod batch_selection;
pub mod error;
pub mod pricing;
pub mod spare_parts;
pub mod spring_range;
pub mod torque_matcher;

// 重导出核心引擎
pub use batch_selection::{BatchOptions, BatchSelector};
pub use error::{EngineResult, SelectionError};
pub use pricing::{PricingClassification, TieredPricingCalculator};
pub use spare_parts::{part_number, SparePartsKitBuilder, SPRING_PART_CODE};
pub use spring_range::{SpringRangeResolver, TorqueFloor};
pub use torque_matcher::{rated_torque_at, MatchQuery, TorqueLookup, TorqueMatch, TorqueMatcher};
