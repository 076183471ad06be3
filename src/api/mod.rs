// ==========================================
// 跳伞场载次排班系统 - API 层
// ==========================================
// 职责: 组合存储与引擎, 提供载次优化/审计/自动修复接口
// ==========================================

pub mod error;
pub mod optimize_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use optimize_api::{plan_snapshot, AutoFixOutcome, LoadOptimizeApi, OptimizeOutcome};
