// ==========================================
// 气动执行器选型报价引擎 - 选型输入/输出模型
// ==========================================
// 职责: 批量选型的行输入、行结果、行错误与批次汇总
// 生命周期: 全部为瞬态对象, 不落库(由下游订单/BOM 协作方决定是否持久化)
// ==========================================

use crate::domain::spare_parts::SparePartsKit;
use crate::domain::types::{ActionType, Mechanism, Series, ValveType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// SpringRangePolicy - 弹簧范围选择策略
// ==========================================
// 同一本体规格存在多个弹簧范围时, 由调用方显式指定, 引擎不做隐式默认
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum SpringRangePolicy {
    /// 满足最小失效安全扭矩的最小弹簧范围
    MinFailSafeTorque(f64),
    /// 指定弹簧范围编码
    Exact(String),
}

impl fmt::Display for SpringRangePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpringRangePolicy::MinFailSafeTorque(t) => write!(f, "min_fail_safe_torque({})", t),
            SpringRangePolicy::Exact(code) => write!(f, "exact({})", code),
        }
    }
}

// ==========================================
// SelectionRequirement - 选型需求行
// ==========================================
// 一行对应一个位号(tag)
// 反序列化经 RawRequirement 逐字段解析, 枚举字段走 FromStr(兼容中英文标签)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequirement")]
pub struct SelectionRequirement {
    pub tag_number: String,
    pub valve_type: String,   // 上游原始字符串, 逐行解析
    pub required_torque: f64, // N·m
    pub working_pressure: f64, // bar
    pub temperature: Option<f64>, // ℃
    pub safety_factor: f64,
    pub quantity: u32,
    pub action_type: ActionType,
    pub spring_range_policy: Option<SpringRangePolicy>,
    pub series: Option<Series>,
    pub mechanism: Option<Mechanism>,
}

/// 上游需求行的原始形态: 数量允许带符号, 枚举保留原始字符串
#[derive(Debug, Deserialize)]
struct RawRequirement {
    tag_number: String,
    valve_type: String,
    required_torque: f64,
    working_pressure: f64,
    #[serde(default)]
    temperature: Option<f64>,
    safety_factor: f64,
    quantity: i64,
    #[serde(default)]
    action_type: Option<String>,
    #[serde(default)]
    spring_range_policy: Option<SpringRangePolicy>,
    #[serde(default)]
    series: Option<String>,
    #[serde(default)]
    mechanism: Option<String>,
}

impl TryFrom<RawRequirement> for SelectionRequirement {
    type Error = String;

    fn try_from(raw: RawRequirement) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(raw.quantity)
            .map_err(|_| format!("位号 {} 数量非法: {}", raw.tag_number, raw.quantity))?;
        let action_type = match raw.action_type.as_deref().map(str::trim) {
            None | Some("") => ActionType::default(),
            Some(label) => label.parse()?,
        };
        let series = parse_optional::<Series>(raw.series.as_deref())?;
        let mechanism = parse_optional::<Mechanism>(raw.mechanism.as_deref())?;

        Ok(Self {
            tag_number: raw.tag_number,
            valve_type: raw.valve_type,
            required_torque: raw.required_torque,
            working_pressure: raw.working_pressure,
            temperature: raw.temperature,
            safety_factor: raw.safety_factor,
            quantity,
            action_type,
            spring_range_policy: raw.spring_range_policy,
            series,
            mechanism,
        })
    }
}

fn parse_optional<T: FromStr<Err = String>>(label: Option<&str>) -> Result<Option<T>, String> {
    match label.map(str::trim) {
        None | Some("") => Ok(None),
        Some(label) => label.parse().map(Some),
    }
}

impl SelectionRequirement {
    /// 双作用需求的便捷构造
    pub fn new(
        tag_number: impl Into<String>,
        valve_type: impl Into<String>,
        required_torque: f64,
        working_pressure: f64,
        safety_factor: f64,
        quantity: u32,
    ) -> Self {
        Self {
            tag_number: tag_number.into(),
            valve_type: valve_type.into(),
            required_torque,
            working_pressure,
            temperature: None,
            safety_factor,
            quantity,
            action_type: ActionType::DoubleActing,
            spring_range_policy: None,
            series: None,
            mechanism: None,
        }
    }

    /// 从上游 JSON 行解析需求
    ///
    /// # 返回
    /// - Err: 缺字段、类型不符、数量为负、枚举标签无法识别
    pub fn from_value(value: &serde_json::Value) -> Result<Self, String> {
        serde_json::from_value(value.clone()).map_err(|e| e.to_string())
    }

    pub fn spring_return(mut self, policy: Option<SpringRangePolicy>) -> Self {
        self.action_type = ActionType::SpringReturn;
        self.spring_range_policy = policy;
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series = Some(series);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

// ==========================================
// SelectionResult - 选型结果行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub tag_number: String,
    pub model_code: String,
    pub series: Series,
    pub valve_type: Option<ValveType>,
    pub body_size: String,
    pub action_type: ActionType,
    pub spring_range: Option<String>,
    pub required_torque: f64,
    pub minimum_torque: f64, // required_torque × safety_factor
    pub actual_torque: f64,  // 工作气压下的有效额定扭矩
    pub torque_margin: f64,
    pub unit_price: f64,
    pub quantity: u32,
    pub total_price: f64,
    pub spare_parts: Option<SparePartsKit>,
    pub spare_parts_cost: f64,
    pub stock_sufficient: bool,
}

// ==========================================
// SelectionExportRow - 报表/导出协作方使用的行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionExportRow {
    pub tag_number: String,
    pub model: String,
    pub series: Series,
    pub actual_torque: f64,
    pub price: f64,
}

impl From<&SelectionResult> for SelectionExportRow {
    fn from(result: &SelectionResult) -> Self {
        Self {
            tag_number: result.tag_number.clone(),
            model: result.model_code.clone(),
            series: result.series,
            actual_torque: result.actual_torque,
            price: result.total_price,
        }
    }
}

// ==========================================
// FailureKind / RowError - 行级失败
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    InvalidInput,
    OutOfRange,
    NotFound,
    DataIntegrity,
    Store,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidInput => write!(f, "INVALID_INPUT"),
            FailureKind::OutOfRange => write!(f, "OUT_OF_RANGE"),
            FailureKind::NotFound => write!(f, "NOT_FOUND"),
            FailureKind::DataIntegrity => write!(f, "DATA_INTEGRITY"),
            FailureKind::Store => write!(f, "STORE"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub tag_number: String,
    pub row_index: usize,
    pub kind: FailureKind,
    pub reason: String,
}

// ==========================================
// BatchSelectionResult - 批次结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub batch_id: String,
    pub total_rows: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub grand_total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSelectionResult {
    pub results: Vec<SelectionResult>,
    pub errors: Vec<RowError>,
    pub summary: BatchSummary,
}

impl BatchSelectionResult {
    pub fn export_rows(&self) -> Vec<SelectionExportRow> {
        self.results.iter().map(SelectionExportRow::from).collect()
    }
}
