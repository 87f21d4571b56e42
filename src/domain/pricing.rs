// ==========================================
// 气动执行器选型报价引擎 - 阶梯价格领域模型
// ==========================================
// 职责: PriceTier 定义与价格表结构校验
// 红线: 价格表必须从 1 起连续覆盖到无穷,单价随数量非递增
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// PriceTier - 数量阶梯
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTier {
    pub min_quantity: u32,         // 阶梯下限(含)
    pub max_quantity: Option<u32>, // 阶梯上限(含), None = 无上限
    pub unit_price: f64,           // 单价
}

impl PriceTier {
    pub fn new(min_quantity: u32, max_quantity: Option<u32>, unit_price: f64) -> Self {
        Self {
            min_quantity,
            max_quantity,
            unit_price,
        }
    }

    /// 数量是否落在本阶梯内
    pub fn contains(&self, quantity: u32) -> bool {
        quantity >= self.min_quantity
            && self.max_quantity.map_or(true, |max| quantity <= max)
    }
}

/// 校验价格表结构
///
/// # 规则
/// 1. 非空, 首阶梯从 1 开始
/// 2. 相邻阶梯首尾相接(无缺口、无重叠)
/// 3. 只有最后一个阶梯允许无上限, 且必须无上限
/// 4. 单价有限、非负、随数量非递增
///
/// # 返回
/// - Err(String): 第一条违反项的说明
pub fn validate_price_schedule(tiers: &[PriceTier]) -> Result<(), String> {
    let first = tiers.first().ok_or_else(|| "价格阶梯为空".to_string())?;
    if first.min_quantity != 1 {
        return Err(format!(
            "首个价格阶梯必须从 1 开始, 实际 min_quantity={}",
            first.min_quantity
        ));
    }

    let last_index = tiers.len() - 1;
    for (index, tier) in tiers.iter().enumerate() {
        if !tier.unit_price.is_finite() || tier.unit_price < 0.0 {
            return Err(format!("阶梯{} 单价非法: {}", index, tier.unit_price));
        }

        match tier.max_quantity {
            Some(max) if max < tier.min_quantity => {
                return Err(format!(
                    "阶梯{} 上下限倒置: [{}, {}]",
                    index, tier.min_quantity, max
                ));
            }
            Some(max) if index == last_index => {
                return Err(format!("最后一个阶梯必须无上限, 实际上限={}", max));
            }
            None if index != last_index => {
                return Err(format!("只有最后一个阶梯允许无上限, 阶梯{} 无上限", index));
            }
            _ => {}
        }

        if index > 0 {
            let prev = &tiers[index - 1];
            // prev.max_quantity 在非末阶梯已保证存在
            let prev_max = prev.max_quantity.unwrap_or(u32::MAX);
            if prev_max.checked_add(1) != Some(tier.min_quantity) {
                return Err(format!(
                    "阶梯{}与阶梯{}不连续: 上一阶梯止于 {}, 本阶梯始于 {}",
                    index - 1,
                    index,
                    prev_max,
                    tier.min_quantity
                ));
            }
            if tier.unit_price > prev.unit_price {
                return Err(format!(
                    "阶梯{} 单价 {} 高于上一阶梯 {}, 违反数量折扣",
                    index, tier.unit_price, prev.unit_price
                ));
            }
        }
    }

    Ok(())
}

/// 按货币最小单位四舍五入(round-half-up)
///
/// # 参数
/// - value: 金额
/// - minor_digits: 小数位数(人民币为 2)
pub fn round_half_up(value: f64, minor_digits: u32) -> f64 {
    let scale = 10f64.powi(minor_digits as i32);
    let scaled = value * scale;
    // 补偿二进制浮点误差, 避免 1.005 之类的值被向下舍入
    let adjusted = if scaled >= 0.0 {
        (scaled + 0.5 + 1e-7).floor()
    } else {
        (scaled - 0.5 - 1e-7).ceil()
    };
    adjusted / scale
}
