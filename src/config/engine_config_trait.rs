// ==========================================
// 气动执行器选型报价引擎 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义引擎所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::engine_config::{EngineConfig, SeriesSparePartsConfig, TierBreak};
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait EngineConfigReader: Send + Sync {
    // ===== 定价配置 =====

    /// 获取折扣阶梯
    ///
    /// # 默认值
    /// - [1,9]@1.00 [10,49]@0.95 [50,99]@0.90 [100,∞)@0.85
    async fn get_tier_ladder(&self) -> Result<Vec<TierBreak>, Box<dyn Error + Send + Sync>>;

    /// 获取货币最小单位小数位
    ///
    /// # 默认值
    /// - 2
    async fn get_currency_minor_digits(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    // ===== 备件配置 =====

    /// 获取各系列备件价格表
    async fn get_spare_parts_table(
        &self,
    ) -> Result<Vec<SeriesSparePartsConfig>, Box<dyn Error + Send + Sync>>;

    /// 获取弹簧组件单价
    ///
    /// # 默认值
    /// - 350.0
    async fn get_spring_kit_price(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    // ===== 匹配配置 =====

    /// 获取气压比较容差 (bar)
    async fn get_pressure_tolerance_bar(&self) -> Result<f64, Box<dyn Error + Send + Sync>>;

    /// 汇总为 EngineConfig 并自检
    async fn load_engine_config(&self) -> Result<EngineConfig, Box<dyn Error + Send + Sync>> {
        let config = EngineConfig {
            tier_ladder: self.get_tier_ladder().await?,
            currency_minor_digits: self.get_currency_minor_digits().await?,
            spare_parts: self.get_spare_parts_table().await?,
            spring_kit_price: self.get_spring_kit_price().await?,
            pressure_tolerance_bar: self.get_pressure_tolerance_bar().await?,
            ..EngineConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}
