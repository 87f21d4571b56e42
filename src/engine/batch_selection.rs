// ==========================================
// 气动执行器选型报价引擎 - 批量选型编排器
// ==========================================
// 用途: 对每个位号需求依次执行 匹配 → 弹簧范围解析 → 定价 → 备件包
// 红线: 行与行相互独立, 单行失败只记入 errors, 不中断批次
// 红线: 输出顺序与输入顺序一致, 不做隐式重排
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::domain::selection::{
    BatchSelectionResult, BatchSummary, RowError, SelectionRequirement,
    SelectionResult, SpringRangePolicy,
};
use crate::domain::actuator::ActuatorModel;
use crate::domain::types::{ActionType, Series, ValveType};
use crate::engine::error::{EngineResult, SelectionError};
use crate::engine::pricing::TieredPricingCalculator;
use crate::engine::spare_parts::SparePartsKitBuilder;
use crate::engine::spring_range::{SpringRangeResolver, TorqueFloor};
use crate::engine::torque_matcher::{
    rated_torque_at, MatchQuery, TorqueLookup, TorqueMatch, TorqueMatcher,
};
use crate::repository::catalog_store::CatalogStore;
use crate::repository::error::RepositoryError;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// BatchOptions - 批次级选项
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOptions {
    /// 行上未指定策略时使用的弹簧范围策略
    pub spring_range_policy: Option<SpringRangePolicy>,
    /// 是否附带备件包及其费用
    pub attach_spare_parts: bool,
}

// ==========================================
// BatchSelector - 批量选型编排器
// ==========================================
pub struct BatchSelector<S: CatalogStore> {
    matcher: TorqueMatcher<S>,
    resolver: SpringRangeResolver<S>,
    pricing: TieredPricingCalculator,
    kit_builder: SparePartsKitBuilder,
    pressure_tolerance: f64,
}

impl<S: CatalogStore> BatchSelector<S> {
    /// 创建新的编排器实例
    ///
    /// # 参数
    /// - store: 目录仓储
    /// - config: 引擎配置(构造时注入)
    pub fn new(store: Arc<S>, config: &EngineConfig) -> Self {
        let pricing = TieredPricingCalculator::new(config);
        Self {
            matcher: TorqueMatcher::new(
                store.clone(),
                pricing.clone(),
                config.pressure_tolerance_bar,
            ),
            resolver: SpringRangeResolver::new(store, config.pressure_tolerance_bar),
            pricing,
            kit_builder: SparePartsKitBuilder::new(config),
            pressure_tolerance: config.pressure_tolerance_bar,
        }
    }

    pub fn pricing(&self) -> &TieredPricingCalculator {
        &self.pricing
    }

    pub fn kit_builder(&self) -> &SparePartsKitBuilder {
        &self.kit_builder
    }

    /// 单行选型
    pub fn select_row(
        &self,
        requirement: &SelectionRequirement,
        options: &BatchOptions,
    ) -> EngineResult<SelectionResult> {
        // ===== 步骤0: 行输入校验 =====
        if requirement.tag_number.trim().is_empty() {
            return Err(SelectionError::InvalidInput("位号为空".to_string()));
        }
        if requirement.quantity < 1 {
            return Err(SelectionError::InvalidInput(format!(
                "数量必须 >= 1, 实际 {}",
                requirement.quantity
            )));
        }
        let valve_type: ValveType = requirement
            .valve_type
            .parse()
            .map_err(SelectionError::InvalidInput)?;
        let policy = requirement
            .spring_range_policy
            .as_ref()
            .or(options.spring_range_policy.as_ref());
        if requirement.action_type == ActionType::SpringReturn && policy.is_none() {
            return Err(SelectionError::InvalidInput(format!(
                "位号 {} 为弹簧复位, 必须指定弹簧范围策略",
                requirement.tag_number
            )));
        }

        // ===== 步骤1: 扭矩/气压匹配 =====
        let query = MatchQuery {
            valve_type,
            series: requirement.series,
            mechanism: requirement.mechanism,
            action_type: requirement.action_type,
            required_torque: requirement.required_torque,
            working_pressure: requirement.working_pressure,
            safety_factor: requirement.safety_factor,
            temperature: requirement.temperature,
        };
        let ranked = self.matcher.match_ranked(&query)?;

        // ===== 步骤2: 弹簧范围解析 =====
        let (matched, model) = self.resolve_variant(ranked, requirement, policy)?;

        let actual_torque =
            match rated_torque_at(&model, requirement.working_pressure, self.pressure_tolerance) {
                TorqueLookup::Rated(torque) => torque,
                TorqueLookup::AboveEnvelope { max_published } => {
                    return Err(SelectionError::OutOfRange {
                        working_pressure: requirement.working_pressure,
                        max_published,
                    })
                }
            };

        // ===== 步骤3: 定价 =====
        let unit_price = self.pricing.price_for(&model, requirement.quantity)?;
        let total_price = self.pricing.round(unit_price * requirement.quantity as f64);

        // ===== 步骤4: 备件包(可选) =====
        let spare_parts = if options.attach_spare_parts {
            match &model.spare_parts {
                Some(kit) => Some(kit.clone()),
                None => Some(self.kit_builder.build_kit(
                    model.series,
                    model.action_type,
                    &model.body_size,
                )?),
            }
        } else {
            None
        };
        let spare_parts_cost = spare_parts
            .as_ref()
            .map(|kit| self.pricing.round(kit.total_price() * requirement.quantity as f64))
            .unwrap_or(0.0);

        Ok(SelectionResult {
            tag_number: requirement.tag_number.clone(),
            stock_sufficient: model.inventory_quantity >= requirement.quantity,
            model_code: model.model_code,
            series: model.series,
            valve_type: model.valve_type,
            body_size: model.body_size,
            action_type: model.action_type,
            spring_range: model.spring_range,
            required_torque: requirement.required_torque,
            minimum_torque: matched.minimum_torque,
            actual_torque,
            torque_margin: actual_torque - matched.minimum_torque,
            unit_price,
            quantity: requirement.quantity,
            total_price,
            spare_parts,
            spare_parts_cost,
        })
    }

    /// 按匹配排序逐个本体规格尝试弹簧范围解析
    ///
    /// 本体规格内没有符合策略的变体时换下一个本体规格; 其余错误直接返回
    fn resolve_variant(
        &self,
        ranked: Vec<TorqueMatch>,
        requirement: &SelectionRequirement,
        policy: Option<&SpringRangePolicy>,
    ) -> EngineResult<(TorqueMatch, ActuatorModel)> {
        let mut tried: Vec<(Series, String, Option<ValveType>)> = Vec::new();
        let mut last_miss = None;

        for matched in ranked {
            let body = (
                matched.model.series,
                matched.model.body_size.clone(),
                matched.model.valve_type,
            );
            if tried.contains(&body) {
                continue;
            }
            tried.push(body);

            let floor = TorqueFloor {
                working_pressure: requirement.working_pressure,
                minimum_torque: matched.minimum_torque,
            };
            match self
                .resolver
                .resolve(&matched.model, requirement.action_type, policy, Some(floor))
            {
                Ok(model) => return Ok((matched, model)),
                Err(SelectionError::NotFound(reason)) => {
                    debug!(
                        tag_number = %requirement.tag_number,
                        body_size = %matched.model.body_size,
                        reason = %reason,
                        "本体规格无可用弹簧变体, 尝试下一规格"
                    );
                    last_miss = Some(SelectionError::NotFound(reason));
                }
                Err(other) => return Err(other),
            }
        }

        Err(last_miss.unwrap_or_else(|| {
            SelectionError::NotFound(format!("位号 {} 无可用候选型号", requirement.tag_number))
        }))
    }

    /// 批量选型(顺序执行)
    ///
    /// # 返回
    /// 部分成功结构: results 与 errors 均保持输入顺序
    #[instrument(skip(self, requirements, options), fields(rows = requirements.len()))]
    pub fn select_batch(
        &self,
        requirements: &[SelectionRequirement],
        options: &BatchOptions,
    ) -> BatchSelectionResult {
        let tags = requirements.iter().map(|r| r.tag_number.clone()).collect();
        let outcomes = requirements
            .iter()
            .map(|requirement| self.select_row(requirement, options))
            .collect();
        self.assemble(tags, outcomes)
    }

    /// 批量选型(上游原始 JSON 行, 顺序执行)
    ///
    /// 行解析失败记为该行 InvalidInput, 其余行照常选型
    #[instrument(skip(self, rows, options), fields(rows = rows.len()))]
    pub fn select_batch_values(
        &self,
        rows: &[serde_json::Value],
        options: &BatchOptions,
    ) -> BatchSelectionResult {
        let (tags, parsed): (Vec<String>, Vec<EngineResult<SelectionRequirement>>) =
            rows.iter().map(parse_row).unzip();
        let outcomes = parsed
            .into_iter()
            .map(|requirement| requirement.and_then(|r| self.select_row(&r, options)))
            .collect();
        self.assemble(tags, outcomes)
    }

    /// 汇总行结果
    fn assemble(
        &self,
        tags: Vec<String>,
        outcomes: Vec<EngineResult<SelectionResult>>,
    ) -> BatchSelectionResult {
        let batch_id = Uuid::new_v4().to_string();
        let total_rows = tags.len();
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for (row_index, (tag_number, outcome)) in tags.into_iter().zip(outcomes).enumerate() {
            match outcome {
                Ok(result) => {
                    debug!(
                        batch_id = %batch_id,
                        tag_number = %result.tag_number,
                        model_code = %result.model_code,
                        total_price = result.total_price,
                        "行选型成功"
                    );
                    results.push(result);
                }
                Err(err) => {
                    if err.is_catalog_fault() {
                        error!(
                            batch_id = %batch_id,
                            tag_number = %tag_number,
                            row_index,
                            error = %err,
                            "目录数据异常导致选型失败"
                        );
                    } else {
                        warn!(
                            batch_id = %batch_id,
                            tag_number = %tag_number,
                            row_index,
                            error = %err,
                            "行选型失败"
                        );
                    }
                    errors.push(RowError {
                        tag_number,
                        row_index,
                        kind: err.kind(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        let grand_total_price = self.pricing.round(
            results
                .iter()
                .map(|r| r.total_price + r.spare_parts_cost)
                .sum(),
        );
        let summary = BatchSummary {
            batch_id,
            total_rows,
            succeeded: results.len(),
            failed: errors.len(),
            grand_total_price,
        };
        info!(
            batch_id = %summary.batch_id,
            total_rows = summary.total_rows,
            succeeded = summary.succeeded,
            failed = summary.failed,
            grand_total_price = summary.grand_total_price,
            "批量选型完成"
        );

        BatchSelectionResult {
            results,
            errors,
            summary,
        }
    }
}

impl<S: CatalogStore + 'static> BatchSelector<S> {
    /// 批量选型(逐行分发到阻塞线程池并行执行)
    ///
    /// 结果与 select_batch 一致, 按输入顺序回收
    pub async fn select_batch_parallel(
        self: Arc<Self>,
        requirements: Vec<SelectionRequirement>,
        options: BatchOptions,
    ) -> BatchSelectionResult {
        let rows = requirements
            .into_iter()
            .map(|requirement| (requirement.tag_number.clone(), Ok(requirement)))
            .collect();
        self.run_parallel(rows, options).await
    }

    /// 并行版 select_batch_values
    pub async fn select_batch_values_parallel(
        self: Arc<Self>,
        rows: Vec<serde_json::Value>,
        options: BatchOptions,
    ) -> BatchSelectionResult {
        let rows = rows.iter().map(parse_row).collect();
        self.run_parallel(rows, options).await
    }

    async fn run_parallel(
        self: Arc<Self>,
        rows: Vec<(String, EngineResult<SelectionRequirement>)>,
        options: BatchOptions,
    ) -> BatchSelectionResult {
        let options = Arc::new(options);
        let mut tags = Vec::with_capacity(rows.len());
        let mut handles = Vec::with_capacity(rows.len());
        for (tag_number, parsed) in rows {
            tags.push(tag_number);
            let selector = self.clone();
            let options = options.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                parsed.and_then(|requirement| selector.select_row(&requirement, &options))
            }));
        }

        let outcomes = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|join_err| {
                    Err(SelectionError::Store(RepositoryError::InternalError(format!(
                        "选型任务异常退出: {}",
                        join_err
                    ))))
                })
            })
            .collect();

        self.assemble(tags, outcomes)
    }
}

/// 解析一行上游 JSON; 位号尽量从原始行中取出, 用于错误定位
fn parse_row(value: &serde_json::Value) -> (String, EngineResult<SelectionRequirement>) {
    let tag_number = value
        .get("tag_number")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();
    let parsed = SelectionRequirement::from_value(value)
        .map_err(|reason| SelectionError::InvalidInput(format!("需求行格式错误: {}", reason)));
    (tag_number, parsed)
}
