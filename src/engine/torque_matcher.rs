// ==========================================
// 气动执行器选型报价引擎 - 扭矩/气压匹配器
// ==========================================
// 职责: 在工作气压下筛选额定扭矩满足 需求扭矩×安全系数 的型号, 取最小余量者
// 红线: 不外推扭矩曲线; 不允许回退到扭矩不足的型号
// ==========================================
// 气压取值规则: 取 >= 工作气压的最近发布气压点的扭矩;
//              工作气压高于最高发布点 → 该型号超出包络
// 同分规则: 余量最小 → 数量1单价最低 → 型号编码升序
// ==========================================

use crate::domain::actuator::ActuatorModel;
use crate::domain::types::{ActionType, Mechanism, Series, ValveType};
use crate::engine::error::{EngineResult, SelectionError};
use crate::engine::pricing::TieredPricingCalculator;
use crate::repository::catalog_store::{CatalogFilter, CatalogStore};
use std::sync::Arc;
use tracing::{debug, error, instrument};

// ==========================================
// MatchQuery - 匹配条件
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    pub valve_type: ValveType,
    pub series: Option<Series>,
    pub mechanism: Option<Mechanism>,
    pub action_type: ActionType,
    pub required_torque: f64,  // N·m
    pub working_pressure: f64, // bar
    pub safety_factor: f64,
    pub temperature: Option<f64>, // ℃
}

impl MatchQuery {
    /// 最小可接受扭矩 = 需求扭矩 × 安全系数
    pub fn minimum_torque(&self) -> f64 {
        self.required_torque * self.safety_factor
    }

    /// 输入校验
    ///
    /// # 规则
    /// - 数值必须有限
    /// - required_torque >= 0, working_pressure > 0, safety_factor >= 1.0
    pub fn validate(&self) -> EngineResult<()> {
        if !self.required_torque.is_finite() || self.required_torque < 0.0 {
            return Err(SelectionError::InvalidInput(format!(
                "需求扭矩必须 >= 0, 实际 {}",
                self.required_torque
            )));
        }
        if !self.working_pressure.is_finite() || self.working_pressure <= 0.0 {
            return Err(SelectionError::InvalidInput(format!(
                "工作气压必须 > 0, 实际 {}",
                self.working_pressure
            )));
        }
        if !self.safety_factor.is_finite() || self.safety_factor < 1.0 {
            return Err(SelectionError::InvalidInput(format!(
                "安全系数必须 >= 1.0, 实际 {}",
                self.safety_factor
            )));
        }
        if let Some(t) = self.temperature {
            if !t.is_finite() {
                return Err(SelectionError::InvalidInput(format!("工作温度非法: {}", t)));
            }
        }
        Ok(())
    }

    fn catalog_filter(&self) -> CatalogFilter {
        CatalogFilter {
            series: self.series,
            valve_type: Some(self.valve_type),
            body_size: None,
            action_type: Some(self.action_type),
            mechanism: self.mechanism,
            include_unpublished: false,
        }
    }
}

// ==========================================
// 扭矩曲线取值
// ==========================================

/// 工作气压下的扭矩取值结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TorqueLookup {
    Rated(f64),
    AboveEnvelope { max_published: f64 },
}

/// 取 >= 工作气压的最近发布点扭矩
///
/// # 参数
/// - model: 已校验型号(扭矩曲线按气压升序)
/// - working_pressure: 工作气压 (bar)
/// - tolerance: 气压比较容差, 吸收 5.9999999 这类浮点噪声
pub fn rated_torque_at(model: &ActuatorModel, working_pressure: f64, tolerance: f64) -> TorqueLookup {
    model
        .torque_curve
        .iter()
        .find(|point| point.pressure_bar + tolerance >= working_pressure)
        .map(|point| TorqueLookup::Rated(point.torque_nm))
        .unwrap_or(TorqueLookup::AboveEnvelope {
            max_published: model.max_published_pressure(),
        })
}

// ==========================================
// TorqueMatch - 匹配结果
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct TorqueMatch {
    pub model: ActuatorModel,
    pub actual_torque: f64,
    pub minimum_torque: f64,
    pub margin: f64,
}

// ==========================================
// TorqueMatcher - 扭矩/气压匹配器
// ==========================================
pub struct TorqueMatcher<S: CatalogStore> {
    store: Arc<S>,
    pricing: TieredPricingCalculator,
    pressure_tolerance: f64,
}

impl<S: CatalogStore> TorqueMatcher<S> {
    pub fn new(store: Arc<S>, pricing: TieredPricingCalculator, pressure_tolerance: f64) -> Self {
        Self {
            store,
            pricing,
            pressure_tolerance,
        }
    }

    /// 从目录中匹配最小满足型号
    ///
    /// # 返回
    /// - Ok(TorqueMatch): 余量最小的合格型号
    /// - Err(InvalidInput): 输入非法
    /// - Err(OutOfRange): 所有候选型号的发布气压都低于工作气压
    /// - Err(NotFound): 无候选或候选扭矩均不足
    /// - Err(DataIntegrity): 候选记录违反目录不变量
    pub fn match_actuator(&self, query: &MatchQuery) -> EngineResult<TorqueMatch> {
        let mut ranked = self.match_ranked(query)?;
        Ok(ranked.swap_remove(0))
    }

    /// 返回全部合格型号, 按同分规则排序(首项即 match_actuator 的结果)
    ///
    /// 错误语义与 match_actuator 相同; Ok 时列表非空
    #[instrument(skip(self), fields(
        valve_type = %query.valve_type,
        required_torque = query.required_torque,
        working_pressure = query.working_pressure
    ))]
    pub fn match_ranked(&self, query: &MatchQuery) -> EngineResult<Vec<TorqueMatch>> {
        query.validate()?;

        let records = self.store.query(&query.catalog_filter())?;
        let mut candidates = Vec::with_capacity(records.len());
        for record in &records {
            match ActuatorModel::try_from(record) {
                Ok(model) => candidates.push(model),
                Err(violation) => {
                    error!(key = %violation.key, reason = %violation.message, "目录记录校验失败");
                    return Err(violation.into());
                }
            }
        }

        self.rank_candidates(candidates, query)
    }

    /// 在给定候选集合内执行筛选与同分裁决(纯函数)
    pub fn select_best(
        &self,
        candidates: Vec<ActuatorModel>,
        query: &MatchQuery,
    ) -> EngineResult<TorqueMatch> {
        let mut ranked = self.rank_candidates(candidates, query)?;
        Ok(ranked.swap_remove(0))
    }

    /// 筛选合格候选并排序: 余量 → 数量1单价 → 型号编码 → 阀门变体
    pub fn rank_candidates(
        &self,
        candidates: Vec<ActuatorModel>,
        query: &MatchQuery,
    ) -> EngineResult<Vec<TorqueMatch>> {
        query.validate()?;
        let minimum_torque = query.minimum_torque();

        let mut covered: Vec<(ActuatorModel, f64)> = Vec::new();
        let mut max_published: Option<f64> = None;
        let mut out_of_envelope = 0usize;

        for model in candidates {
            if !self.is_operable(&model, query) {
                continue;
            }
            match rated_torque_at(&model, query.working_pressure, self.pressure_tolerance) {
                TorqueLookup::Rated(torque) => covered.push((model, torque)),
                TorqueLookup::AboveEnvelope { max_published: top } => {
                    out_of_envelope += 1;
                    max_published = Some(max_published.map_or(top, |m: f64| m.max(top)));
                }
            }
        }

        if covered.is_empty() {
            if let Some(max_published) = max_published {
                debug!(out_of_envelope, "工作气压超出全部候选型号的发布范围");
                return Err(SelectionError::OutOfRange {
                    working_pressure: query.working_pressure,
                    max_published,
                });
            }
            return Err(SelectionError::NotFound(format!(
                "{} 阀 {} 无可用候选型号",
                query.valve_type, query.action_type
            )));
        }

        let strongest = covered
            .iter()
            .map(|(_, torque)| *torque)
            .fold(f64::MIN, f64::max);

        let mut qualifying: Vec<(ActuatorModel, f64, f64)> = Vec::new();
        for (model, torque) in covered {
            if torque >= minimum_torque {
                let unit_price = self.pricing.price_for(&model, 1)?;
                qualifying.push((model, torque, unit_price));
            }
        }

        if qualifying.is_empty() {
            return Err(SelectionError::NotFound(format!(
                "工作气压 {} bar 下最大额定扭矩 {} N·m < 最小可接受扭矩 {} N·m",
                query.working_pressure, strongest, minimum_torque
            )));
        }

        qualifying.sort_by(|a, b| {
            let margin_a = a.1 - minimum_torque;
            let margin_b = b.1 - minimum_torque;
            margin_a
                .total_cmp(&margin_b)
                .then_with(|| a.2.total_cmp(&b.2))
                .then_with(|| a.0.model_code.cmp(&b.0.model_code))
                .then_with(|| a.0.valve_type.cmp(&b.0.valve_type))
        });

        if let Some((best, actual_torque, _)) = qualifying.first() {
            debug!(
                model_code = %best.model_code,
                actual_torque,
                minimum_torque,
                qualifying = qualifying.len(),
                "扭矩匹配完成"
            );
        }
        Ok(qualifying
            .into_iter()
            .map(|(model, actual_torque, _)| TorqueMatch {
                margin: actual_torque - minimum_torque,
                model,
                actual_torque,
                minimum_torque,
            })
            .collect())
    }

    /// 温度/最低工作气压适用性
    fn is_operable(&self, model: &ActuatorModel, query: &MatchQuery) -> bool {
        if let (Some(temperature), Some(range)) = (query.temperature, model.temperature_range) {
            if !range.contains(temperature) {
                return false;
            }
        }
        if let Some(range) = model.operating_pressure {
            if query.working_pressure + self.pressure_tolerance < range.min_bar {
                return false;
            }
        }
        true
    }
}
