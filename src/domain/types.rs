// ==========================================
// 气动执行器选型报价引擎 - 领域类型定义
// ==========================================
// 职责: 系列/结构/阀门类型/作用方式/定价模式/生命周期等枚举
// 序列化格式: 与目录文档字段保持一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 产品系列 (Series)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Series {
    Sf, // 拨叉式(区分球阀/蝶阀)
    At, // 齿轮齿条式
    Gy, // 重载拨叉式
}

impl Series {
    pub fn as_str(&self) -> &'static str {
        match self {
            Series::Sf => "SF",
            Series::At => "AT",
            Series::Gy => "GY",
        }
    }

    /// 该系列默认的驱动结构
    pub fn default_mechanism(&self) -> Mechanism {
        match self {
            Series::At => Mechanism::RackAndPinion,
            Series::Sf | Series::Gy => Mechanism::ScotchYoke,
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Series {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SF" => Ok(Series::Sf),
            "AT" => Ok(Series::At),
            "GY" => Ok(Series::Gy),
            other => Err(format!("未知产品系列: {}", other)),
        }
    }
}

// ==========================================
// 驱动结构 (Mechanism)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    RackAndPinion, // 齿轮齿条
    ScotchYoke,    // 拨叉
}

impl fmt::Display for Mechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mechanism::RackAndPinion => write!(f, "rack_and_pinion"),
            Mechanism::ScotchYoke => write!(f, "scotch_yoke"),
        }
    }
}

impl FromStr for Mechanism {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "rack_and_pinion" | "齿轮齿条" => Ok(Mechanism::RackAndPinion),
            "scotch_yoke" | "拨叉" => Ok(Mechanism::ScotchYoke),
            other => Err(format!("未知驱动结构: {}", other)),
        }
    }
}

// ==========================================
// 阀门类型 (Valve Type)
// ==========================================
// 仅 SF 系列目录区分球阀/蝶阀
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValveType {
    Ball,      // 球阀
    Butterfly, // 蝶阀
}

impl ValveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValveType::Ball => "ball",
            ValveType::Butterfly => "butterfly",
        }
    }
}

impl fmt::Display for ValveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ValveType {
    type Err = String;

    /// 兼容上游抽取结果中的多种写法: "Ball Valve" / "ball" / "球阀"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        match normalized.as_str() {
            "ball" | "ball valve" | "ball_valve" | "球阀" => Ok(ValveType::Ball),
            "butterfly" | "butterfly valve" | "butterfly_valve" | "蝶阀" => {
                Ok(ValveType::Butterfly)
            }
            _ => Err(format!("未知阀门类型: {}", s.trim())),
        }
    }
}

// ==========================================
// 作用方式 (Action Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "DA")]
    DoubleActing, // 双作用
    #[serde(rename = "SR")]
    SpringReturn, // 单作用(弹簧复位)
}

impl Default for ActionType {
    fn default() -> Self {
        ActionType::DoubleActing
    }
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::DoubleActing => "DA",
            ActionType::SpringReturn => "SR",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DA" | "DOUBLE_ACTING" | "双作用" => Ok(ActionType::DoubleActing),
            "SR" | "SPRING_RETURN" | "单作用" | "弹簧复位" => Ok(ActionType::SpringReturn),
            other => Err(format!("未知作用方式: {}", other)),
        }
    }
}

// ==========================================
// 定价模式 (Pricing Model)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    Fixed,  // 固定单价
    Tiered, // 数量阶梯价
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingModel::Fixed => write!(f, "fixed"),
            PricingModel::Tiered => write!(f, "tiered"),
        }
    }
}

// ==========================================
// 生命周期状态 (Lifecycle Status)
// ==========================================
// 红线: 目录记录永不删除,只允许转为 discontinued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    Draft,        // 草稿
    Published,    // 已发布(可选型)
    Discontinued, // 已停产
}

impl Default for LifecycleStatus {
    fn default() -> Self {
        LifecycleStatus::Published
    }
}

impl LifecycleStatus {
    /// 状态迁移合法性
    ///
    /// draft → published → discontinued, draft → discontinued;
    /// discontinued 为终态
    pub fn can_transition_to(&self, next: LifecycleStatus) -> bool {
        matches!(
            (self, next),
            (LifecycleStatus::Draft, LifecycleStatus::Published)
                | (LifecycleStatus::Draft, LifecycleStatus::Discontinued)
                | (LifecycleStatus::Published, LifecycleStatus::Discontinued)
        )
    }

    pub fn is_selectable(&self) -> bool {
        *self == LifecycleStatus::Published
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleStatus::Draft => write!(f, "draft"),
            LifecycleStatus::Published => write!(f, "published"),
            LifecycleStatus::Discontinued => write!(f, "discontinued"),
        }
    }
}
