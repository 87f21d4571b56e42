// ==========================================
// 气动执行器选型报价引擎 - 领域模型层
// ==========================================
// 职责: 定义目录实体、价格阶梯、备件包、选型输入输出
// 红线: 不含数据访问逻辑, 不含引擎逻辑
// ==========================================

pub mod actuator;
pub mod pricing;
pub mod selection;
pub mod spare_parts;
pub mod types;

// 重导出核心类型
pub use actuator::{
    ActuatorModel, CatalogKey, CatalogRecord, Dimensions, IntegrityViolation, PressureRange,
    TemperatureRange, TorquePoint,
};
pub use pricing::{round_half_up, validate_price_schedule, PriceTier};
pub use selection::{
    BatchSelectionResult, BatchSummary, FailureKind, RowError, SelectionExportRow,
    SelectionRequirement, SelectionResult, SpringRangePolicy,
};
pub use spare_parts::{SparePart, SparePartsKit};
pub use types::{ActionType, LifecycleStatus, Mechanism, PricingModel, Series, ValveType};
