// ==========================================
// 跳伞场载次排班系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod assignment;
pub mod error;
pub mod instructor;
pub mod load;
pub mod period;
pub mod student;
pub mod types;

// 重导出核心类型
pub use assignment::Assignment;
pub use error::{DomainError, DomainResult};
pub use instructor::{Instructor, WeightBand};
pub use load::{Load, LoadAssignment, SEATS_PER_STUDENT};
pub use period::Period;
pub use student::{JumpRequirement, QueuedStudent};
pub use types::{AffLevel, DaysOff, JumpType, LoadStatus, Team, TeamRotation};
