// ==========================================
// 跳伞场载次排班系统 - 分配规划数据结构
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::domain::{Assignment, Instructor, Load, LoadAssignment, Period};
use crate::engine::qualification::UnassignableReason;

// ==========================================
// AssignmentMap - 学员 -> 教练对
// ==========================================

/// 学员的教练对（主教练必填, 外部摄像可选）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentPair {
    pub main: String,
    #[serde(default)]
    pub video: Option<String>,
}

impl AssignmentPair {
    pub fn main_only(main: &str) -> Self {
        Self {
            main: main.to_string(),
            video: None,
        }
    }
}

/// 按学员ID排序的分配表（每阶段产出新表, 不原地修改）
pub type AssignmentMap = BTreeMap<String, AssignmentPair>;

/// 分配表中已占用的教练（主教练 + 摄像）
pub fn used_instructors(map: &AssignmentMap) -> HashSet<String> {
    let mut used = HashSet::new();
    for pair in map.values() {
        used.insert(pair.main.clone());
        if let Some(v) = &pair.video {
            used.insert(v.clone());
        }
    }
    used
}

/// 以该教练为主教练的学员
pub fn main_holder<'m>(map: &'m AssignmentMap, instructor_id: &str) -> Option<&'m str> {
    map.iter()
        .find(|(_, pair)| pair.main == instructor_id)
        .map(|(student_id, _)| student_id.as_str())
}

/// 把分配表写回载次
///
/// # 规则
/// - 锁定的指定分配保留主教练; 人工设置的摄像保留, 否则按表写入摄像
/// - 其他学员按表覆盖, 不在表中的清空
/// - 写入的角色标记为规划器分配, 重复规划时不视为人工指定
pub fn apply_to_load(map: &AssignmentMap, load: &mut Load) {
    for a in load.assignments.iter_mut() {
        let pair = map.get(&a.student_id);
        if !a.is_locked_request() {
            a.instructor_id = pair.map(|p| p.main.clone());
            a.main_auto_assigned = a.instructor_id.is_some();
        } else if a.pinned_video().is_some() {
            continue;
        }
        a.video_instructor_id = pair.and_then(|p| p.video.clone());
        a.video_auto_assigned = a.video_instructor_id.is_some();
    }
}

// ==========================================
// PlanningInput - 规划输入快照
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct PlanningInput<'a> {
    /// 目标载次上的学员
    pub students: &'a [LoadAssignment],
    pub instructors: &'a [Instructor],
    /// 结算周期历史
    pub history: &'a [Assignment],
    pub target_load: &'a Load,
    /// 全部载次（含目标载次）
    pub all_loads: &'a [Load],
    pub period: Period,
    /// 当日（未完成载次的轮休判断与排序）
    pub today: NaiveDate,
}

impl<'a> PlanningInput<'a> {
    /// 以目标载次自身的学员作为规划对象
    pub fn for_load(
        target_load: &'a Load,
        all_loads: &'a [Load],
        instructors: &'a [Instructor],
        history: &'a [Assignment],
        period: Period,
        today: NaiveDate,
    ) -> Self {
        Self {
            students: &target_load.assignments,
            instructors,
            history,
            target_load,
            all_loads,
            period,
            today,
        }
    }
}

// ==========================================
// AssignmentError - 无法分配的学员
// ==========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentErrorKind {
    NoClockedInStaff,
    NoCertifiedStaff,
    WeightExceedsAllLimits,
    RestrictedAssignment,
    CycleTimeConflict,
    AllQualifiedCommitted,
    /// 已有主教练, 外部摄像无人可配
    MissingVideo,
    /// 穷举回退超时
    SearchTimeout,
}

impl fmt::Display for AssignmentErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AssignmentErrorKind::NoClockedInStaff => "NO_CLOCKED_IN_STAFF",
            AssignmentErrorKind::NoCertifiedStaff => "NO_CERTIFIED_STAFF",
            AssignmentErrorKind::WeightExceedsAllLimits => "WEIGHT_EXCEEDS_ALL_LIMITS",
            AssignmentErrorKind::RestrictedAssignment => "RESTRICTED_ASSIGNMENT",
            AssignmentErrorKind::CycleTimeConflict => "CYCLE_TIME_CONFLICT",
            AssignmentErrorKind::AllQualifiedCommitted => "ALL_QUALIFIED_COMMITTED",
            AssignmentErrorKind::MissingVideo => "MISSING_VIDEO",
            AssignmentErrorKind::SearchTimeout => "SEARCH_TIMEOUT",
        };
        write!(f, "{}", s)
    }
}

impl From<UnassignableReason> for AssignmentErrorKind {
    fn from(reason: UnassignableReason) -> Self {
        match reason {
            UnassignableReason::NoClockedInStaff => AssignmentErrorKind::NoClockedInStaff,
            UnassignableReason::NoCertifiedStaff => AssignmentErrorKind::NoCertifiedStaff,
            UnassignableReason::WeightExceedsAllLimits => AssignmentErrorKind::WeightExceedsAllLimits,
            UnassignableReason::RestrictedAssignment => AssignmentErrorKind::RestrictedAssignment,
            UnassignableReason::CycleTimeConflict => AssignmentErrorKind::CycleTimeConflict,
            UnassignableReason::AllQualifiedCommitted => AssignmentErrorKind::AllQualifiedCommitted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentError {
    pub student_id: String,
    pub kind: AssignmentErrorKind,
    pub message: String,
}

// ==========================================
// PlanResult - 规划结果
// ==========================================

/// 规划统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStats {
    /// 锁定的指定分配数
    pub locked: usize,
    /// 贪心阶段分配数
    pub greedy_assigned: usize,
    /// 主教练修复数
    pub main_repaired: usize,
    /// 摄像修复数
    pub video_repaired: usize,
    /// 启发式阶段后仍无主教练的学员数
    pub unassigned_after_heuristics: usize,
    pub fallback_ran: bool,
    pub fallback_solved: bool,
    pub fallback_attempts: u64,
    pub fallback_timed_out: bool,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanResult {
    pub assignments: AssignmentMap,
    pub errors: Vec<AssignmentError>,
    pub stats: PlanStats,
}

impl PlanResult {
    /// 错误列表为空是唯一的"完全求解"信号
    pub fn is_fully_solved(&self) -> bool {
        self.errors.is_empty()
    }
}
