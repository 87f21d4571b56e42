// ==========================================
// 气动执行器选型报价引擎 - 阶梯定价计算器
// ==========================================
// 职责: 基准价 → 数量阶梯; 按数量求单价; 历史文档定价模式归类
// 红线: 价格表缺口必须报 DataIntegrity, 不允许静默当作"无折扣"
// ==========================================

use crate::config::engine_config::{EngineConfig, TierBreak};
use crate::domain::actuator::{ActuatorModel, CatalogRecord};
use crate::domain::pricing::{round_half_up, validate_price_schedule, PriceTier};
use crate::domain::types::PricingModel;
use crate::engine::error::{EngineResult, SelectionError};

// ==========================================
// PricingClassification - 归类结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingClassification {
    /// 已有 pricing_model, 跳过(不覆盖)
    Skip(PricingModel),
    /// 需要写入的 pricing_model
    Assign(PricingModel),
}

impl PricingClassification {
    pub fn pricing_model(&self) -> PricingModel {
        match self {
            PricingClassification::Skip(m) | PricingClassification::Assign(m) => *m,
        }
    }
}

// ==========================================
// TieredPricingCalculator - 阶梯定价计算器
// ==========================================
#[derive(Debug, Clone)]
pub struct TieredPricingCalculator {
    ladder: Vec<TierBreak>,
    minor_digits: u32,
}

impl TieredPricingCalculator {
    /// 从引擎配置构造
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            ladder: config.tier_ladder.clone(),
            minor_digits: config.currency_minor_digits,
        }
    }

    /// 使用自定义折扣阶梯
    pub fn with_ladder(ladder: Vec<TierBreak>, minor_digits: u32) -> Self {
        Self {
            ladder,
            minor_digits,
        }
    }

    pub fn minor_digits(&self) -> u32 {
        self.minor_digits
    }

    /// 金额按货币最小单位取整
    pub fn round(&self, amount: f64) -> f64 {
        round_half_up(amount, self.minor_digits)
    }

    /// 由基准价生成数量阶梯
    ///
    /// # 规则
    /// - 第 i 档: [ladder[i].min, ladder[i+1].min - 1], 末档无上限
    /// - 单价 = round_half_up(base_price × price_factor)
    ///
    /// # 示例
    /// base_price=100 → [1-9]@100 [10-49]@95 [50-99]@90 [100+]@85
    pub fn build_tiers(&self, base_price: f64) -> EngineResult<Vec<PriceTier>> {
        if !base_price.is_finite() || base_price < 0.0 {
            return Err(SelectionError::InvalidInput(format!(
                "基准价非法: {}",
                base_price
            )));
        }
        if self.ladder.is_empty() {
            return Err(SelectionError::InvalidInput("折扣阶梯为空".to_string()));
        }

        let tiers: Vec<PriceTier> = self
            .ladder
            .iter()
            .enumerate()
            .map(|(i, brk)| {
                let max_quantity = self.ladder.get(i + 1).map(|next| next.min_quantity.saturating_sub(1));
                PriceTier::new(
                    brk.min_quantity,
                    max_quantity,
                    self.round(base_price * brk.price_factor),
                )
            })
            .collect();

        // 折扣阶梯本身配置错误时在此暴露
        validate_price_schedule(&tiers).map_err(|msg| {
            SelectionError::InvalidInput(format!("折扣阶梯配置无效: {}", msg))
        })?;
        Ok(tiers)
    }

    /// 求指定数量的单价
    ///
    /// # 规则
    /// - quantity < 1 → InvalidInput
    /// - fixed → base_price
    /// - tiered → 包含 quantity 的阶梯单价; 无阶梯覆盖 → DataIntegrity
    pub fn price_for(&self, model: &ActuatorModel, quantity: u32) -> EngineResult<f64> {
        if quantity < 1 {
            return Err(SelectionError::InvalidInput(format!(
                "数量必须 >= 1, 实际 {}",
                quantity
            )));
        }

        match model.pricing_model {
            PricingModel::Fixed => model.base_price.ok_or_else(|| {
                SelectionError::DataIntegrity(format!(
                    "{} 为 fixed 定价但缺少 base_price",
                    model.key()
                ))
            }),
            PricingModel::Tiered => model
                .price_tiers
                .iter()
                .find(|tier| tier.contains(quantity))
                .map(|tier| tier.unit_price)
                .ok_or_else(|| {
                    SelectionError::DataIntegrity(format!(
                        "{} 价格阶梯未覆盖数量 {}",
                        model.key(),
                        quantity
                    ))
                }),
        }
    }

    /// 校验价格表结构, 违反时报 DataIntegrity
    pub fn validate_tiers(&self, tiers: &[PriceTier]) -> EngineResult<()> {
        validate_price_schedule(tiers).map_err(SelectionError::DataIntegrity)
    }

    /// 历史文档定价模式归类
    ///
    /// # 规则
    /// - 已有 pricing_model → Skip(幂等, 不覆盖)
    /// - price_tiers 非空 或 存在低温/高温价格变体 → tiered
    /// - 否则 → fixed
    pub fn classify(&self, record: &CatalogRecord) -> PricingClassification {
        if let Some(existing) = record.pricing_model {
            return PricingClassification::Skip(existing);
        }
        if record.has_price_tiers() || record.has_temperature_price_variants() {
            PricingClassification::Assign(PricingModel::Tiered)
        } else {
            PricingClassification::Assign(PricingModel::Fixed)
        }
    }
}
