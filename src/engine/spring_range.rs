// ==========================================
// 气动执行器选型报价引擎 - 弹簧范围解析器
// ==========================================
// 职责: 单作用(弹簧复位)需求在同系列、同本体规格内选出 SR 变体
// 输入: 匹配器选中的型号 + 调用方给定的弹簧范围策略
// 红线: 多个弹簧范围并存时必须由策略裁决, 不做隐式默认
// ==========================================

use crate::domain::actuator::ActuatorModel;
use crate::domain::selection::SpringRangePolicy;
use crate::domain::types::ActionType;
use crate::engine::error::{EngineResult, SelectionError};
use crate::engine::torque_matcher::{rated_torque_at, TorqueLookup};
use crate::repository::catalog_store::{CatalogFilter, CatalogStore};
use std::sync::Arc;
use tracing::{debug, error};

/// 空气行程扭矩下限: SR 变体在工作气压下的输出扭矩不得低于该值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorqueFloor {
    pub working_pressure: f64,
    pub minimum_torque: f64,
}

// ==========================================
// SpringRangeResolver - 弹簧范围解析器
// ==========================================
pub struct SpringRangeResolver<S: CatalogStore> {
    store: Arc<S>,
    pressure_tolerance: f64,
}

impl<S: CatalogStore> SpringRangeResolver<S> {
    pub fn new(store: Arc<S>, pressure_tolerance: f64) -> Self {
        Self {
            store,
            pressure_tolerance,
        }
    }

    /// 解析目标作用方式对应的型号
    ///
    /// # 规则
    /// 1. DA → 原样返回
    /// 2. SR 且未给策略 → InvalidInput
    /// 3. SR → 同系列、同本体规格、同阀门变体、spring_range 非空的已发布 SR 记录,
    ///    满足扭矩下限后按策略裁决; 无结果 → NotFound
    pub fn resolve(
        &self,
        matched: &ActuatorModel,
        desired: ActionType,
        policy: Option<&SpringRangePolicy>,
        floor: Option<TorqueFloor>,
    ) -> EngineResult<ActuatorModel> {
        if desired == ActionType::DoubleActing {
            return Ok(matched.clone());
        }

        let policy = policy.ok_or_else(|| {
            SelectionError::InvalidInput(
                "弹簧复位选型必须指定弹簧范围策略 (spring_range_policy)".to_string(),
            )
        })?;

        let filter = CatalogFilter {
            series: Some(matched.series),
            valve_type: matched.valve_type,
            body_size: Some(matched.body_size.clone()),
            action_type: Some(ActionType::SpringReturn),
            mechanism: None,
            include_unpublished: false,
        };

        let mut variants = Vec::new();
        for record in self.store.query(&filter)? {
            // 阀门变体必须一致, 不走通配
            if record.valve_type != matched.valve_type {
                continue;
            }
            let model = ActuatorModel::try_from(&record).map_err(|violation| {
                error!(key = %violation.key, reason = %violation.message, "SR 变体校验失败");
                SelectionError::from(violation)
            })?;
            if let Some(floor) = floor {
                match rated_torque_at(&model, floor.working_pressure, self.pressure_tolerance) {
                    TorqueLookup::Rated(torque) if torque >= floor.minimum_torque => {}
                    _ => continue,
                }
            }
            variants.push(model);
        }

        if variants.is_empty() {
            return Err(SelectionError::NotFound(format!(
                "{} 系列本体 {} 无满足扭矩的 SR 弹簧变体",
                matched.series, matched.body_size
            )));
        }

        let chosen = Self::apply_policy(variants, policy).ok_or_else(|| {
            SelectionError::NotFound(format!(
                "{} 系列本体 {} 无符合策略 {} 的弹簧范围",
                matched.series, matched.body_size, policy
            ))
        })?;

        debug!(
            model_code = %chosen.model_code,
            spring_range = ?chosen.spring_range,
            policy = %policy,
            "弹簧范围解析完成"
        );
        Ok(chosen)
    }

    /// 按策略在候选变体中裁决(纯函数)
    ///
    /// - MinFailSafeTorque(t): fail_safe_torque >= t 中取最小者,
    ///   再按 spring_range、model_code 升序
    /// - Exact(code): spring_range 等于 code 者, 多个时取 model_code 最小
    pub fn apply_policy(
        mut variants: Vec<ActuatorModel>,
        policy: &SpringRangePolicy,
    ) -> Option<ActuatorModel> {
        match policy {
            SpringRangePolicy::MinFailSafeTorque(minimum) => {
                variants.retain(|v| v.fail_safe_torque.map_or(false, |t| t >= *minimum));
                variants.sort_by(|a, b| {
                    let ta = a.fail_safe_torque.unwrap_or(f64::MAX);
                    let tb = b.fail_safe_torque.unwrap_or(f64::MAX);
                    ta.total_cmp(&tb)
                        .then_with(|| a.spring_range.cmp(&b.spring_range))
                        .then_with(|| a.model_code.cmp(&b.model_code))
                });
            }
            SpringRangePolicy::Exact(code) => {
                let code = code.trim();
                variants.retain(|v| v.spring_range.as_deref() == Some(code));
                variants.sort_by(|a, b| a.model_code.cmp(&b.model_code));
            }
        }
        variants.into_iter().next()
    }
}
