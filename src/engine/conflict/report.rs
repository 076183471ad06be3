use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Severity - 冲突级别
// ==========================================
// 排序: error < warning < info（报告按此顺序输出）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// ConflictKind - 冲突类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictKind {
    /// 连续载次疲劳
    ConsecutiveLoadFatigue,
    /// 周转时间不足
    CycleTimeViolation,
    /// 超出容量
    CapacityExceeded,
    /// 恰好满载
    CapacityAtLimit,
    /// 超出体重上限
    WeightLimitExceeded,
    /// 未打卡却已分配
    ClockedOutAssigned,
    /// 学员无主教练
    UnassignedStudent,
    /// 外部摄像无摄像教练
    MissingVideoInstructor,
    /// 同一教练在本载次担任多个角色
    DuplicateRole,
    /// 摄像体重区间不符
    VideoWeightBand,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictKind::ConsecutiveLoadFatigue => "CONSECUTIVE_LOAD_FATIGUE",
            ConflictKind::CycleTimeViolation => "CYCLE_TIME_VIOLATION",
            ConflictKind::CapacityExceeded => "CAPACITY_EXCEEDED",
            ConflictKind::CapacityAtLimit => "CAPACITY_AT_LIMIT",
            ConflictKind::WeightLimitExceeded => "WEIGHT_LIMIT_EXCEEDED",
            ConflictKind::ClockedOutAssigned => "CLOCKED_OUT_ASSIGNED",
            ConflictKind::UnassignedStudent => "UNASSIGNED_STUDENT",
            ConflictKind::MissingVideoInstructor => "MISSING_VIDEO_INSTRUCTOR",
            ConflictKind::DuplicateRole => "DUPLICATE_ROLE",
            ConflictKind::VideoWeightBand => "VIDEO_WEIGHT_BAND",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// AutoFix - 可自动修复动作
// ==========================================
// 红线: 修复动作必须幂等（状态已满足时为空操作）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "instructor_id", rename_all = "snake_case")]
pub enum AutoFix {
    /// 移除最后一名学员
    RemoveLastStudent,
    /// 为未分配学员重新规划
    AutoAssignRemaining,
    /// 从本载次撤下该教练（主教练或摄像）
    UnassignInstructor(String),
    /// 补配摄像教练
    AssignVideoInstructor,
}

impl AutoFix {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutoFix::RemoveLastStudent => "remove_last_student",
            AutoFix::AutoAssignRemaining => "auto_assign_remaining",
            AutoFix::UnassignInstructor(_) => "unassign_instructor",
            AutoFix::AssignVideoInstructor => "assign_video_instructor",
        }
    }
}

// ==========================================
// Conflict - 冲突报告项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,

    pub severity: Severity,

    /// 描述（以冲突类型代码开头）
    pub message: String,

    /// 涉及的载次/教练/学员ID
    pub entity_ids: Vec<String>,

    /// 可选的自动修复
    pub auto_fix: Option<AutoFix>,
}

impl Conflict {
    pub fn new(kind: ConflictKind, severity: Severity, detail: String, entity_ids: Vec<String>) -> Self {
        Self {
            kind,
            severity,
            message: format!("{}: {}", kind, detail),
            entity_ids,
            auto_fix: None,
        }
    }

    pub fn with_fix(mut self, fix: AutoFix) -> Self {
        self.auto_fix = Some(fix);
        self
    }
}
