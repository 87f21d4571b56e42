// ==========================================
// 气动执行器选型报价引擎 - 引擎层错误类型
// ==========================================
// 职责: 区分调用方错误(InvalidInput/OutOfRange/NotFound)与目录数据错误(DataIntegrity)
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::actuator::IntegrityViolation;
use crate::domain::selection::FailureKind;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum SelectionError {
    // ===== 调用方错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("工作气压 {working_pressure} bar 超出目录发布范围 (最高 {max_published} bar)")]
    OutOfRange {
        working_pressure: f64,
        max_published: f64,
    },

    #[error("无满足条件的型号: {0}")]
    NotFound(String),

    // ===== 目录数据错误 =====
    #[error("目录数据不一致: {0}")]
    DataIntegrity(String),

    // ===== 仓储错误 =====
    #[error("目录仓储错误: {0}")]
    Store(#[from] RepositoryError),
}

impl SelectionError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SelectionError::InvalidInput(_) => FailureKind::InvalidInput,
            SelectionError::OutOfRange { .. } => FailureKind::OutOfRange,
            SelectionError::NotFound(_) => FailureKind::NotFound,
            SelectionError::DataIntegrity(_) => FailureKind::DataIntegrity,
            SelectionError::Store(_) => FailureKind::Store,
        }
    }

    /// 是否指向目录本身的问题(需要告警)
    pub fn is_catalog_fault(&self) -> bool {
        matches!(self, SelectionError::DataIntegrity(_) | SelectionError::Store(_))
    }
}

impl From<IntegrityViolation> for SelectionError {
    fn from(violation: IntegrityViolation) -> Self {
        SelectionError::DataIntegrity(violation.to_string())
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, SelectionError>;
