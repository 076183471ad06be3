// ==========================================
// 跳伞场载次排班系统 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

use crate::domain::DomainError;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 并发控制错误 =====
    #[error("乐观锁冲突: load_id={load_id}, expected_revision={expected}, actual_revision={actual}")]
    OptimisticLockFailure {
        load_id: String,
        expected: u64,
        actual: u64,
    },

    #[error("存储锁获取失败: {0}")]
    LockError(String),

    // ===== 数据错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error(transparent)]
    Domain(#[from] DomainError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
