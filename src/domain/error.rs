// ==========================================
// 跳伞场载次排班系统 - 领域层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

use super::types::LoadStatus;

/// 领域层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("无效的状态转换: load_id={load_id}, from={from} to={to}")]
    InvalidStatusTransition {
        load_id: String,
        from: LoadStatus,
        to: LoadStatus,
    },

    #[error("载次座位不足: load_id={load_id}, occupied={occupied}, requested={requested}, capacity={capacity}")]
    CapacityExceeded {
        load_id: String,
        occupied: u32,
        requested: u32,
        capacity: u32,
    },

    #[error("载次不可编辑: load_id={load_id}, status={status}")]
    LoadNotEditable { load_id: String, status: LoadStatus },

    #[error("字段解析失败 (field={field}): {value}")]
    Parse { field: String, value: String },
}

/// Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
