// ==========================================
// 目录记录构建器 - 用于集成测试
// ==========================================

use actuator_selection::config::EngineConfig;
use actuator_selection::domain::actuator::{CatalogRecord, TemperatureRange, TorquePoint};
use actuator_selection::domain::types::{
    ActionType, LifecycleStatus, PricingModel, Series, ValveType,
};
use actuator_selection::engine::TieredPricingCalculator;

// ==========================================
// CatalogRecord 构建器
// ==========================================

pub struct CatalogRecordBuilder {
    record: CatalogRecord,
}

impl CatalogRecordBuilder {
    pub fn new(model_code: &str, series: Series) -> Self {
        Self {
            record: CatalogRecord {
                model_code: model_code.to_string(),
                series: Some(series),
                body_size: Some(model_code.to_string()),
                action_type: Some(ActionType::DoubleActing),
                inventory_quantity: Some(10),
                ..Default::default()
            },
        }
    }

    pub fn body_size(mut self, body_size: &str) -> Self {
        self.record.body_size = Some(body_size.to_string());
        self
    }

    pub fn valve(mut self, valve: ValveType) -> Self {
        self.record.valve_type = Some(valve);
        self
    }

    pub fn curve(mut self, points: &[(f64, f64)]) -> Self {
        self.record.torque_curve = points
            .iter()
            .map(|(pressure, torque)| TorquePoint::new(*pressure, *torque))
            .collect();
        self
    }

    pub fn spring_return(mut self, spring_range: &str, fail_safe_torque: f64) -> Self {
        self.record.action_type = Some(ActionType::SpringReturn);
        self.record.spring_range = Some(spring_range.to_string());
        self.record.fail_safe_torque = Some(fail_safe_torque);
        self
    }

    /// 阶梯定价, 阶梯由默认折扣阶梯生成
    pub fn tiered(mut self, base_price: f64) -> Self {
        let tiers = TieredPricingCalculator::new(&EngineConfig::default())
            .build_tiers(base_price)
            .unwrap();
        self.record.pricing_model = Some(PricingModel::Tiered);
        self.record.base_price = Some(base_price);
        self.record.price_tiers = Some(tiers);
        self
    }

    pub fn fixed(mut self, price: f64) -> Self {
        self.record.pricing_model = Some(PricingModel::Fixed);
        self.record.base_price = Some(price);
        self
    }

    /// 历史文档: 无 pricing_model, 只有基准价与温度变体价
    pub fn legacy_price(mut self, base_price: Option<f64>, high_temp_price: Option<f64>) -> Self {
        self.record.pricing_model = None;
        self.record.price_tiers = None;
        self.record.base_price = base_price;
        self.record.high_temp_price = high_temp_price;
        self
    }

    pub fn temperature(mut self, min_c: f64, max_c: f64) -> Self {
        self.record.temperature_range = Some(TemperatureRange { min_c, max_c });
        self
    }

    pub fn inventory(mut self, quantity: u32) -> Self {
        self.record.inventory_quantity = Some(quantity);
        self
    }

    pub fn status(mut self, status: LifecycleStatus) -> Self {
        self.record.status = Some(status);
        self
    }

    pub fn build(self) -> CatalogRecord {
        self.record
    }
}
