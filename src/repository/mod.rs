// ==========================================
// 跳伞场载次排班系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供规划快照与乐观并发提交, 屏蔽存储细节
// ==========================================

pub mod error;
pub mod load_store;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use load_store::{InMemoryLoadStore, LoadStore, PlanningSnapshot};
