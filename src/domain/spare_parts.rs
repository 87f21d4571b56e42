// ==========================================
// 气动执行器选型报价引擎 - 备件包领域模型
// ==========================================
// 职责: 维修备件包结构(密封件包 + 系列专用件 + 弹簧组件)
// ==========================================

use serde::{Deserialize, Serialize};

/// 备件明细
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparePart {
    pub part_name: String,
    pub part_number: String,
    pub price: f64,
}

/// 备件包(归属于单个执行器型号, 由型号派生)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparePartsKit {
    pub seal_kit_price: f64,
    pub parts: Vec<SparePart>,
}

impl SparePartsKit {
    /// 备件包总价 = 密封件包 + 各备件
    pub fn total_price(&self) -> f64 {
        self.seal_kit_price + self.parts.iter().map(|p| p.price).sum::<f64>()
    }

    pub fn find_part(&self, part_number: &str) -> Option<&SparePart> {
        self.parts.iter().find(|p| p.part_number == part_number)
    }
}
