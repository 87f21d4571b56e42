// ==========================================
// 气动执行器选型报价引擎 - 备件包生成器
// ==========================================
// 职责: 由 (系列, 作用方式, 本体规格) 派生带价格的维修备件包
// 规则: 系列基础包 = 密封件包价格 + 系列专用件;
//       SR 追加一个弹簧组件, 料号 {series}-SPR-{body_size}
// 红线: 纯函数, 同一输入永远得到同一料号与价格
// ==========================================

use crate::config::engine_config::EngineConfig;
use crate::domain::spare_parts::{SparePart, SparePartsKit};
use crate::domain::types::{ActionType, Series};
use crate::engine::error::{EngineResult, SelectionError};

/// 弹簧组件料号段
pub const SPRING_PART_CODE: &str = "SPR";

/// 生成备件料号: {series}-{code}-{body_size}
pub fn part_number(series: Series, code: &str, body_size: &str) -> String {
    format!("{}-{}-{}", series.as_str(), code, body_size.trim())
}

// ==========================================
// SparePartsKitBuilder - 备件包生成器
// ==========================================
#[derive(Debug, Clone)]
pub struct SparePartsKitBuilder {
    config: EngineConfig,
}

impl SparePartsKitBuilder {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 生成备件包
    ///
    /// # 返回
    /// - Err(InvalidInput): body_size 为空
    /// - Err(DataIntegrity): 配置中缺少该系列的备件表
    pub fn build_kit(
        &self,
        series: Series,
        action_type: ActionType,
        body_size: &str,
    ) -> EngineResult<SparePartsKit> {
        if body_size.trim().is_empty() {
            return Err(SelectionError::InvalidInput(
                "生成备件包需要本体规格 body_size".to_string(),
            ));
        }

        let base = self.config.spare_parts_for(series).ok_or_else(|| {
            SelectionError::DataIntegrity(format!("备件配置缺少 {} 系列", series))
        })?;

        let mut parts: Vec<SparePart> = base
            .other_parts
            .iter()
            .map(|template| SparePart {
                part_name: template.part_name.clone(),
                part_number: part_number(series, &template.code, body_size),
                price: template.price,
            })
            .collect();

        if action_type == ActionType::SpringReturn {
            parts.push(SparePart {
                part_name: self.config.spring_part_name.clone(),
                part_number: part_number(series, SPRING_PART_CODE, body_size),
                price: self.config.spring_kit_price,
            });
        }

        Ok(SparePartsKit {
            seal_kit_price: base.seal_kit_price,
            parts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> SparePartsKitBuilder {
        SparePartsKitBuilder::new(&EngineConfig::default())
    }

    #[test]
    fn test_sr_kit_adds_exactly_one_spring_part() {
        for series in [Series::Sf, Series::At, Series::Gy] {
            let da = builder().build_kit(series, ActionType::DoubleActing, "63").unwrap();
            let sr = builder().build_kit(series, ActionType::SpringReturn, "63").unwrap();
            assert_eq!(sr.parts.len(), da.parts.len() + 1);
            assert_eq!(sr.seal_kit_price, da.seal_kit_price);

            let spring = sr.parts.last().unwrap();
            assert_eq!(spring.part_number, format!("{}-SPR-63", series));
            assert_ne!(spring.price, sr.seal_kit_price);
            assert!(da.find_part(&spring.part_number).is_none());
        }
    }

    #[test]
    fn test_kit_is_deterministic() {
        let a = builder().build_kit(Series::Gy, ActionType::SpringReturn, "GY-52").unwrap();
        let b = builder().build_kit(Series::Gy, ActionType::SpringReturn, "GY-52").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.parts[0].part_number, "GY-BRG-GY-52");
    }

    #[test]
    fn test_kit_total_price() {
        let kit = builder().build_kit(Series::At, ActionType::SpringReturn, "100").unwrap();
        // 120 + 45 + 25 + 350
        assert_eq!(kit.total_price(), 540.0);
    }

    #[test]
    fn test_missing_series_is_data_integrity() {
        let mut config = EngineConfig::default();
        config.spare_parts.retain(|c| c.series != Series::Gy);
        let b = SparePartsKitBuilder::new(&config);
        assert!(matches!(
            b.build_kit(Series::Gy, ActionType::DoubleActing, "52"),
            Err(SelectionError::DataIntegrity(_))
        ));
    }

    #[test]
    fn test_empty_body_size_rejected() {
        assert!(matches!(
            builder().build_kit(Series::At, ActionType::DoubleActing, " "),
            Err(SelectionError::InvalidInput(_))
        ));
    }
}
