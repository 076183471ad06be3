// ==========================================
// 跳伞场载次排班系统 - 教练分配规划器
// ==========================================
// 职责: 约束优先贪心 + 局部修复 + 穷举回退
// 输入: PlanningInput（目标载次快照）
// 输出: PlanResult（学员 -> 教练对, 无法分配原因）
// ==========================================
// 红线: 规划器只读快照, 结果由存储层按版本号乐观提交
// ==========================================

mod context;
mod core;
mod phases;
mod types;

#[cfg(test)]
mod tests;

pub use self::core::AssignmentPlanner;
pub use types::{
    apply_to_load, main_holder, used_instructors, AssignmentError, AssignmentErrorKind,
    AssignmentMap, AssignmentPair, PlanResult, PlanStats, PlanningInput,
};
