// ==========================================
// 气动执行器选型报价引擎 - 执行器目录领域模型
// ==========================================
// 职责: 目录文档(CatalogRecord)与校验后的型号(ActuatorModel)
// 红线: 存储边界必须校验, 不允许静默接受畸形文档
// ==========================================
// CatalogRecord: 存储层原样文档, 历史数据可能缺字段, 全部可选
// ActuatorModel: 通过 TryFrom 校验后的强类型型号, 引擎只消费它
// ==========================================

use crate::domain::pricing::{validate_price_schedule, PriceTier};
use crate::domain::spare_parts::SparePartsKit;
use crate::domain::types::{
    ActionType, LifecycleStatus, Mechanism, PricingModel, Series, ValveType,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ==========================================
// CatalogKey - 目录主键
// ==========================================
// 型号编码在 系列 + 阀门类型变体 内唯一
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CatalogKey {
    pub model_code: String,
    pub series: Option<Series>,
    pub valve_type: Option<ValveType>,
}

impl CatalogKey {
    pub fn new(
        model_code: impl Into<String>,
        series: Option<Series>,
        valve_type: Option<ValveType>,
    ) -> Self {
        Self {
            model_code: model_code.into(),
            series,
            valve_type,
        }
    }

    /// 系列字段的存储值(缺系列的历史文档为空串)
    pub fn series_key(&self) -> &'static str {
        self.series.map(|s| s.as_str()).unwrap_or("")
    }

    /// 阀门变体字段的存储值(无变体时为空串)
    pub fn valve_variant(&self) -> &'static str {
        self.valve_type.map(|v| v.as_str()).unwrap_or("")
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(series) = self.series {
            write!(f, "{}/", series)?;
        }
        write!(f, "{}", self.model_code)?;
        if let Some(valve) = self.valve_type {
            write!(f, "@{}", valve)?;
        }
        Ok(())
    }
}

// ==========================================
// 扭矩/压力/温度/尺寸 值对象
// ==========================================

/// 额定扭矩点: 某参考气压下的输出扭矩
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TorquePoint {
    pub pressure_bar: f64,
    pub torque_nm: f64,
}

impl TorquePoint {
    pub fn new(pressure_bar: f64, torque_nm: f64) -> Self {
        Self {
            pressure_bar,
            torque_nm,
        }
    }
}

/// 工作气压范围 (bar)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PressureRange {
    pub min_bar: f64,
    pub max_bar: f64,
}

/// 工作温度范围 (℃)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min_c: f64,
    pub max_c: f64,
}

impl TemperatureRange {
    pub fn contains(&self, temperature_c: f64) -> bool {
        temperature_c >= self.min_c && temperature_c <= self.max_c
    }
}

/// 外形/法兰/顶部安装/气源接口尺寸块
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub outline: Option<String>,
    pub flange: Option<String>,
    pub top_mounting: Option<String>,
    pub pneumatic_connection: Option<String>,
}

// ==========================================
// CatalogRecord - 目录存储文档
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogRecord {
    pub model_code: String,
    pub series: Option<Series>,
    pub mechanism: Option<Mechanism>,
    pub valve_type: Option<ValveType>,
    pub body_size: Option<String>,
    pub action_type: Option<ActionType>,
    pub spring_range: Option<String>,
    pub fail_safe_torque: Option<f64>,
    pub torque_curve: Vec<TorquePoint>,
    pub rotation_angle: Option<f64>,
    pub operating_pressure: Option<PressureRange>,
    pub temperature_range: Option<TemperatureRange>,
    pub weight_kg: Option<f64>,
    pub dimensions: Option<Dimensions>,

    // ===== 定价字段(由迁移补齐) =====
    pub pricing_model: Option<PricingModel>,
    pub base_price: Option<f64>,
    pub price_tiers: Option<Vec<PriceTier>>,
    pub low_temp_price: Option<f64>,  // 历史数据: 低温版价格
    pub high_temp_price: Option<f64>, // 历史数据: 高温版价格

    // ===== 派生字段 =====
    pub spare_parts: Option<SparePartsKit>,

    pub inventory_quantity: Option<u32>,
    pub status: Option<LifecycleStatus>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CatalogRecord {
    pub fn key(&self) -> CatalogKey {
        CatalogKey::new(self.model_code.clone(), self.series, self.valve_type)
    }

    /// 生命周期状态, 缺省视为已发布(历史种子数据未写 status)
    pub fn lifecycle_status(&self) -> LifecycleStatus {
        self.status.unwrap_or_default()
    }

    pub fn has_price_tiers(&self) -> bool {
        self.price_tiers.as_ref().map_or(false, |t| !t.is_empty())
    }

    pub fn has_temperature_price_variants(&self) -> bool {
        self.low_temp_price.is_some() || self.high_temp_price.is_some()
    }
}

// ==========================================
// IntegrityViolation - 目录数据违反不变量
// ==========================================
#[derive(Error, Debug, Clone, PartialEq)]
#[error("目录数据不一致 ({key}): {message}")]
pub struct IntegrityViolation {
    pub key: String,
    pub message: String,
}

impl IntegrityViolation {
    fn new(key: &CatalogKey, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

// ==========================================
// ActuatorModel - 校验后的执行器型号
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorModel {
    pub model_code: String,
    pub series: Series,
    pub mechanism: Mechanism,
    pub valve_type: Option<ValveType>,
    pub body_size: String,
    pub action_type: ActionType,
    pub spring_range: Option<String>,
    pub fail_safe_torque: Option<f64>,
    pub torque_curve: Vec<TorquePoint>, // 按气压升序
    pub rotation_angle: f64,
    pub operating_pressure: Option<PressureRange>,
    pub temperature_range: Option<TemperatureRange>,
    pub weight_kg: Option<f64>,
    pub dimensions: Option<Dimensions>,
    pub pricing_model: PricingModel,
    pub base_price: Option<f64>,
    pub price_tiers: Vec<PriceTier>,
    pub spare_parts: Option<SparePartsKit>,
    pub inventory_quantity: u32,
    pub status: LifecycleStatus,
}

impl ActuatorModel {
    pub fn key(&self) -> CatalogKey {
        CatalogKey::new(self.model_code.clone(), Some(self.series), self.valve_type)
    }

    /// 目录中发布的最高参考气压
    pub fn max_published_pressure(&self) -> f64 {
        self.torque_curve
            .last()
            .map(|p| p.pressure_bar)
            .unwrap_or(0.0)
    }
}

impl TryFrom<&CatalogRecord> for ActuatorModel {
    type Error = IntegrityViolation;

    fn try_from(record: &CatalogRecord) -> Result<Self, Self::Error> {
        let key = record.key();

        if record.model_code.trim().is_empty() {
            return Err(IntegrityViolation::new(&key, "model_code 为空"));
        }

        let series = record
            .series
            .ok_or_else(|| IntegrityViolation::new(&key, "缺少 series"))?;

        let body_size = record
            .body_size
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IntegrityViolation::new(&key, "缺少 body_size"))?
            .to_string();

        let action_type = record
            .action_type
            .ok_or_else(|| IntegrityViolation::new(&key, "缺少 action_type"))?;

        if record.valve_type.is_some() && series != Series::Sf {
            return Err(IntegrityViolation::new(
                &key,
                format!("只有 SF 系列区分阀门类型, 实际系列 {}", series),
            ));
        }

        // ===== 弹簧复位型号必须带弹簧范围 =====
        let spring_range = record
            .spring_range
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if action_type == ActionType::SpringReturn && spring_range.is_none() {
            return Err(IntegrityViolation::new(&key, "SR 型号缺少 spring_range"));
        }
        if let Some(t) = record.fail_safe_torque {
            if !t.is_finite() || t < 0.0 {
                return Err(IntegrityViolation::new(
                    &key,
                    format!("fail_safe_torque 非法: {}", t),
                ));
            }
        }

        // ===== 扭矩曲线 =====
        let mut torque_curve = record.torque_curve.clone();
        if torque_curve.is_empty() {
            return Err(IntegrityViolation::new(&key, "缺少额定扭矩数据"));
        }
        torque_curve.sort_by(|a, b| a.pressure_bar.total_cmp(&b.pressure_bar));
        for point in &torque_curve {
            if !point.pressure_bar.is_finite() || point.pressure_bar <= 0.0 {
                return Err(IntegrityViolation::new(
                    &key,
                    format!("参考气压非法: {}", point.pressure_bar),
                ));
            }
            if !point.torque_nm.is_finite() || point.torque_nm < 0.0 {
                return Err(IntegrityViolation::new(
                    &key,
                    format!("额定扭矩非法: {}", point.torque_nm),
                ));
            }
        }
        if torque_curve
            .windows(2)
            .any(|w| w[0].pressure_bar == w[1].pressure_bar)
        {
            return Err(IntegrityViolation::new(&key, "扭矩曲线存在重复气压点"));
        }

        if let Some(range) = record.operating_pressure {
            if range.min_bar > range.max_bar {
                return Err(IntegrityViolation::new(
                    &key,
                    format!("工作气压范围倒置: {}~{}", range.min_bar, range.max_bar),
                ));
            }
        }

        // ===== 定价 =====
        let price_tiers = record.price_tiers.clone().unwrap_or_default();
        let pricing_model = record.pricing_model.unwrap_or(if price_tiers.is_empty() {
            PricingModel::Fixed
        } else {
            PricingModel::Tiered
        });
        match pricing_model {
            PricingModel::Fixed => match record.base_price {
                Some(p) if p.is_finite() && p >= 0.0 => {}
                Some(p) => {
                    return Err(IntegrityViolation::new(&key, format!("base_price 非法: {}", p)))
                }
                None => return Err(IntegrityViolation::new(&key, "fixed 定价缺少 base_price")),
            },
            PricingModel::Tiered => {
                validate_price_schedule(&price_tiers)
                    .map_err(|msg| IntegrityViolation::new(&key, msg))?;
            }
        }

        Ok(ActuatorModel {
            model_code: record.model_code.trim().to_string(),
            series,
            mechanism: record.mechanism.unwrap_or_else(|| series.default_mechanism()),
            valve_type: record.valve_type,
            body_size,
            action_type,
            spring_range,
            fail_safe_torque: record.fail_safe_torque,
            torque_curve,
            rotation_angle: record.rotation_angle.unwrap_or(90.0),
            operating_pressure: record.operating_pressure,
            temperature_range: record.temperature_range,
            weight_kg: record.weight_kg,
            dimensions: record.dimensions.clone(),
            pricing_model,
            base_price: record.base_price,
            price_tiers,
            spare_parts: record.spare_parts.clone(),
            inventory_quantity: record.inventory_quantity.unwrap_or(0),
            status: record.lifecycle_status(),
        })
    }
}
