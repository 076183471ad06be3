// ==========================================
// 跳伞场载次排班系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为可读的错误消息
// 红线: 所有错误信息必须包含显式原因
// ==========================================

use crate::config::ConfigError;
use crate::domain::DomainError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    // ==========================================
    // 并发控制错误
    // ==========================================
    #[error("乐观锁冲突: {0}")]
    OptimisticLockFailure(String),

    // ==========================================
    // 存储/配置错误
    // ==========================================
    #[error("存储错误: {0}")]
    StoreError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    // ==========================================
    // 执行错误
    // ==========================================
    /// 阻塞规划任务异常退出
    #[error("规划任务执行失败: {0}")]
    WorkerJoin(String),

    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::OptimisticLockFailure {
                load_id,
                expected,
                actual,
            } => ApiError::OptimisticLockFailure(format!(
                "载次{}已被其他操作修改（期望revision={}，实际revision={}）",
                load_id, expected, actual
            )),
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::StoreError(format!("存储锁获取失败: {}", msg))
            }
            RepositoryError::Domain(err) => ApiError::from(err),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 DomainError 转换
// ==========================================
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Parse { .. } => ApiError::InvalidInput(err.to_string()),
            _ => ApiError::BusinessRuleViolation(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::WorkerJoin(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
