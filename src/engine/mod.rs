// ==========================================
// 跳伞场载次排班系统 - 引擎层
// ==========================================
// 职责: 平衡分、资质过滤、周转判定、分配规划、冲突检测
// 红线: 引擎只读快照, 不做 I/O; 所有无法满足的情况必须输出原因
// ==========================================

pub mod availability;
pub mod balance;
pub mod conflict;
pub mod fallback;
pub mod pay;
pub mod planner;
pub mod qualification;

// 重导出核心引擎
pub use availability::AvailabilityOracle;
pub use balance::{BalanceCalculator, BalanceTable, EarningsBreakdown};
pub use conflict::{AutoFix, Conflict, ConflictDetector, ConflictKind, Severity};
pub use fallback::{ExhaustiveSearch, SearchOutcome, SearchState};
pub use pay::PayCore;
pub use planner::{
    apply_to_load, AssignmentError, AssignmentErrorKind, AssignmentMap, AssignmentPair,
    AssignmentPlanner, PlanResult, PlanStats, PlanningInput,
};
pub use qualification::{
    FilterOptions, QualificationFilter, QualificationMode, ScheduleContext, UnassignableReason,
};
