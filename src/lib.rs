// ==========================================
// 跳伞场载次排班系统 - 核心库
// ==========================================
// 职责: 为载次上的学员分配主教练/摄像教练, 兼顾资质、周转与轮换公平
// 系统定位: 决策支持 (冲突为提示, 人工最终控制)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 快照与乐观提交
pub mod repository;

// 引擎层 - 业务规则
pub mod engine;

// 配置层 - 引擎配置
pub mod config;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AffLevel, DaysOff, JumpType, LoadStatus, Team, TeamRotation};

// 领域实体
pub use domain::{Assignment, Instructor, Load, LoadAssignment, Period, QueuedStudent};

// 引擎
pub use engine::{
    AssignmentPlanner, AvailabilityOracle, BalanceCalculator, ConflictDetector,
    QualificationFilter,
};

// API
pub use api::LoadOptimizeApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "跳伞场载次排班系统";
