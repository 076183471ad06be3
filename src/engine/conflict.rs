// ==========================================
// 跳伞场载次排班系统 - 载次冲突检测引擎
// ==========================================
// 职责: 载次审计（疲劳/周转/容量/体重/打卡/未分配/摄像/角色重复）
// 输入: 载次快照 + 教练名册
// 输出: 冲突报告 + 可选自动修复动作
// ==========================================

mod core;
mod report;

#[cfg(test)]
mod tests;

pub use self::core::ConflictDetector;
pub use report::{AutoFix, Conflict, ConflictKind, Severity};
