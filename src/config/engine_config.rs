// ==========================================
// 气动执行器选型报价引擎 - 引擎配置
// ==========================================
// 职责: 折扣阶梯、货币精度、系列备件价格表、弹簧组件价格
// 红线: 规则参数在构造时注入引擎, 核心逻辑内不写死常量
// ==========================================

use crate::domain::types::Series;
use serde::{Deserialize, Serialize};

// ==========================================
// TierBreak - 折扣阶梯断点
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBreak {
    pub min_quantity: u32,
    pub price_factor: f64, // 相对基准价的系数
}

impl TierBreak {
    pub fn new(min_quantity: u32, price_factor: f64) -> Self {
        Self {
            min_quantity,
            price_factor,
        }
    }
}

/// 默认折扣阶梯: [1,9]@1.00 [10,49]@0.95 [50,99]@0.90 [100,∞)@0.85
pub fn default_tier_ladder() -> Vec<TierBreak> {
    vec![
        TierBreak::new(1, 1.0),
        TierBreak::new(10, 0.95),
        TierBreak::new(50, 0.90),
        TierBreak::new(100, 0.85),
    ]
}

// ==========================================
// 备件价格表
// ==========================================

/// 系列专用备件模板, 料号按 {series}-{code}-{body_size} 生成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartTemplate {
    pub part_name: String,
    pub code: String,
    pub price: f64,
}

impl PartTemplate {
    pub fn new(part_name: &str, code: &str, price: f64) -> Self {
        Self {
            part_name: part_name.to_string(),
            code: code.to_string(),
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSparePartsConfig {
    pub series: Series,
    pub seal_kit_price: f64,
    pub other_parts: Vec<PartTemplate>,
}

pub fn default_spare_parts_table() -> Vec<SeriesSparePartsConfig> {
    vec![
        SeriesSparePartsConfig {
            series: Series::Sf,
            seal_kit_price: 180.0,
            other_parts: vec![
                PartTemplate::new("轴承组件", "BRG", 95.0),
                PartTemplate::new("导向块", "GB", 60.0),
            ],
        },
        SeriesSparePartsConfig {
            series: Series::At,
            seal_kit_price: 120.0,
            other_parts: vec![
                PartTemplate::new("轴承组件", "BRG", 45.0),
                PartTemplate::new("止推垫片", "TW", 25.0),
            ],
        },
        SeriesSparePartsConfig {
            series: Series::Gy,
            seal_kit_price: 260.0,
            other_parts: vec![
                PartTemplate::new("轴承组件", "BRG", 150.0),
                PartTemplate::new("拨叉衬套", "YB", 120.0),
                PartTemplate::new("活塞导向环", "PG", 80.0),
            ],
        },
    ]
}

/// 货币精度上限(小数位), 超出后 10^digits 的舍入失去意义
pub const MAX_CURRENCY_MINOR_DIGITS: u32 = 6;

// ==========================================
// EngineConfig - 引擎配置聚合
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tier_ladder: Vec<TierBreak>,
    pub currency_minor_digits: u32,
    pub spare_parts: Vec<SeriesSparePartsConfig>,
    pub spring_kit_price: f64,
    pub spring_part_name: String,
    pub pressure_tolerance_bar: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tier_ladder: default_tier_ladder(),
            currency_minor_digits: 2,
            spare_parts: default_spare_parts_table(),
            spring_kit_price: 350.0,
            spring_part_name: "弹簧组件".to_string(),
            pressure_tolerance_bar: 1e-9,
        }
    }
}

impl EngineConfig {
    pub fn spare_parts_for(&self, series: Series) -> Option<&SeriesSparePartsConfig> {
        self.spare_parts.iter().find(|c| c.series == series)
    }

    /// 配置自检
    ///
    /// # 规则
    /// - 折扣阶梯非空, 从 1 开始, 断点严格递增
    /// - 系数在 (0, 1] 内且随数量非递增
    /// - currency_minor_digits <= MAX_CURRENCY_MINOR_DIGITS
    /// - 价格非负; 每个系列至多一张备件表
    /// - 弹簧组件价格不得与任一系列密封件包价格相同
    pub fn validate(&self) -> Result<(), String> {
        let first = self
            .tier_ladder
            .first()
            .ok_or_else(|| "tier_ladder 为空".to_string())?;
        if first.min_quantity != 1 {
            return Err(format!(
                "tier_ladder 必须从 1 开始, 实际 {}",
                first.min_quantity
            ));
        }
        for tier in &self.tier_ladder {
            if !(tier.price_factor > 0.0 && tier.price_factor <= 1.0) {
                return Err(format!("price_factor 超出 (0,1]: {}", tier.price_factor));
            }
        }
        for pair in self.tier_ladder.windows(2) {
            if pair[1].min_quantity <= pair[0].min_quantity {
                return Err(format!(
                    "tier_ladder 断点未严格递增: {} -> {}",
                    pair[0].min_quantity, pair[1].min_quantity
                ));
            }
            if pair[1].price_factor > pair[0].price_factor {
                return Err(format!(
                    "tier_ladder 系数递增: {} -> {}",
                    pair[0].price_factor, pair[1].price_factor
                ));
            }
        }

        if self.currency_minor_digits > MAX_CURRENCY_MINOR_DIGITS {
            return Err(format!(
                "currency_minor_digits 超出上限 {}: {}",
                MAX_CURRENCY_MINOR_DIGITS, self.currency_minor_digits
            ));
        }

        if !self.spring_kit_price.is_finite() || self.spring_kit_price < 0.0 {
            return Err(format!("spring_kit_price 非法: {}", self.spring_kit_price));
        }
        let mut seen: Vec<Series> = Vec::with_capacity(self.spare_parts.len());
        for entry in &self.spare_parts {
            if seen.contains(&entry.series) {
                return Err(format!("{} 系列备件表重复", entry.series));
            }
            seen.push(entry.series);

            let valid_price = |price: f64| price.is_finite() && price >= 0.0;
            if !valid_price(entry.seal_kit_price)
                || entry.other_parts.iter().any(|p| !valid_price(p.price))
            {
                return Err(format!("{} 系列备件价格非法", entry.series));
            }
            if entry.seal_kit_price == self.spring_kit_price {
                return Err(format!(
                    "{} 系列密封件包价格与弹簧组件价格相同: {}",
                    entry.series, self.spring_kit_price
                ));
            }
        }
        Ok(())
    }
}
