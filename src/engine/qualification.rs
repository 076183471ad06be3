// ==========================================
// 跳伞场载次排班系统 - 教练资质过滤
// ==========================================
// 职责: 给定学员需求, 返回合法可带飞的教练子集
// 输入: 学员跳伞需求 + 教练名册 + 过滤选项
// 输出: 合格教练列表 / 无合格教练时的原因
// ==========================================
// 检查顺序 (同时作为原因诊断的阶段):
// 1) 归档 2) 打卡 3) 资质 4) 体重 5) 锁定名单/机型 6) 周转时间 7) 已占用
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::config::LoadSchedulingSettings;
use crate::domain::{Instructor, JumpRequirement, JumpType, Load};
use crate::engine::availability::AvailabilityOracle;

// ==========================================
// 过滤选项
// ==========================================

/// 资质模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualificationMode {
    /// 主教练
    #[default]
    Main,
    /// 外部摄像
    Video,
}

/// 调度上下文（提供时启用机型与周转时间检查）
#[derive(Debug, Clone, Copy)]
pub struct ScheduleContext<'a> {
    pub target_load: &'a Load,
    pub all_loads: &'a [Load],
    pub settings: &'a LoadSchedulingSettings,
}

/// 过滤选项
#[derive(Debug, Clone, Default)]
pub struct FilterOptions<'a> {
    /// 显式排除的教练（如已在本载次占用）
    pub excluded: HashSet<String>,
    /// 忽略打卡状态
    pub ignore_clock_status: bool,
    /// 主教练 / 摄像
    pub mode: QualificationMode,
    /// 调度上下文
    pub schedule: Option<ScheduleContext<'a>>,
}

impl<'a> FilterOptions<'a> {
    pub fn main(schedule: Option<ScheduleContext<'a>>) -> Self {
        Self {
            schedule,
            ..Self::default()
        }
    }

    pub fn video(schedule: Option<ScheduleContext<'a>>) -> Self {
        Self {
            mode: QualificationMode::Video,
            schedule,
            ..Self::default()
        }
    }

    pub fn with_excluded(mut self, excluded: HashSet<String>) -> Self {
        self.excluded = excluded;
        self
    }
}

// ==========================================
// 不合格原因
// ==========================================

/// 单个教练的不合格原因（按检查阶段排序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Disqualification {
    Archived,
    ClockedOut,
    NotCertified,
    Overweight,
    Restricted,
    CycleTime,
    Excluded,
}

/// 学员无合格教练的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnassignableReason {
    /// 无已打卡教练
    NoClockedInStaff,
    /// 无具备资质的教练
    NoCertifiedStaff,
    /// 体重超出全部教练上限
    WeightExceedsAllLimits,
    /// 受锁定名单或机型资质限制
    RestrictedAssignment,
    /// 周转时间冲突
    CycleTimeConflict,
    /// 合格教练均已占用
    AllQualifiedCommitted,
}

impl fmt::Display for UnassignableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnassignableReason::NoClockedInStaff => "NO_CLOCKED_IN_STAFF",
            UnassignableReason::NoCertifiedStaff => "NO_CERTIFIED_STAFF",
            UnassignableReason::WeightExceedsAllLimits => "WEIGHT_EXCEEDS_ALL_LIMITS",
            UnassignableReason::RestrictedAssignment => "RESTRICTED_ASSIGNMENT",
            UnassignableReason::CycleTimeConflict => "CYCLE_TIME_CONFLICT",
            UnassignableReason::AllQualifiedCommitted => "ALL_QUALIFIED_COMMITTED",
        };
        write!(f, "{}", s)
    }
}

impl From<Disqualification> for UnassignableReason {
    fn from(d: Disqualification) -> Self {
        match d {
            Disqualification::Archived | Disqualification::ClockedOut => {
                UnassignableReason::NoClockedInStaff
            }
            Disqualification::NotCertified => UnassignableReason::NoCertifiedStaff,
            Disqualification::Overweight => UnassignableReason::WeightExceedsAllLimits,
            Disqualification::Restricted => UnassignableReason::RestrictedAssignment,
            Disqualification::CycleTime => UnassignableReason::CycleTimeConflict,
            Disqualification::Excluded => UnassignableReason::AllQualifiedCommitted,
        }
    }
}

// ==========================================
// QualificationFilter - 纯函数工具类
// ==========================================
pub struct QualificationFilter;

impl QualificationFilter {
    /// 返回合格教练（保持名册顺序）
    pub fn filter_qualified<'i, S>(
        student: &S,
        instructors: &'i [Instructor],
        options: &FilterOptions<'_>,
    ) -> Vec<&'i Instructor>
    where
        S: JumpRequirement + ?Sized,
    {
        instructors
            .iter()
            .filter(|i| Self::check(student, i, options).is_ok())
            .collect()
    }

    /// 单个教练是否合格
    pub fn is_qualified<S>(student: &S, instructor: &Instructor, options: &FilterOptions<'_>) -> bool
    where
        S: JumpRequirement + ?Sized,
    {
        Self::check(student, instructor, options).is_ok()
    }

    /// 按阶段检查单个教练
    pub fn check<S>(
        student: &S,
        instructor: &Instructor,
        options: &FilterOptions<'_>,
    ) -> Result<(), Disqualification>
    where
        S: JumpRequirement + ?Sized,
    {
        // 1. 归档
        if instructor.archived {
            return Err(Disqualification::Archived);
        }

        // 2. 打卡
        if !options.ignore_clock_status && !instructor.clocked_in {
            return Err(Disqualification::ClockedOut);
        }

        match options.mode {
            QualificationMode::Main => {
                // 3. 资质
                let jump_type = student.jump_type();
                if jump_type == JumpType::Video || !instructor.is_certified_for(jump_type) {
                    return Err(Disqualification::NotCertified);
                }

                // 4. 体重
                if let Some(limit) = instructor.weight_limit_for(jump_type) {
                    if student.effective_weight() > limit {
                        return Err(Disqualification::Overweight);
                    }
                }

                // 5. AFF 锁定名单
                if jump_type == JumpType::Aff
                    && instructor.is_aff_locked()
                    && !instructor
                        .aff_locked_students
                        .iter()
                        .any(|s| s == student.student_id())
                {
                    return Err(Disqualification::Restricted);
                }
            }
            QualificationMode::Video => {
                // 3. 摄像资质
                if !instructor.can_video {
                    return Err(Disqualification::NotCertified);
                }

                // 4. 摄像体重区间
                if let Some(band) = instructor.video_weight_band {
                    let combined = instructor.body_weight.saturating_add(student.student_weight());
                    if !band.contains(combined) {
                        return Err(Disqualification::Overweight);
                    }
                }
            }
        }

        if let Some(ctx) = options.schedule {
            // 5. 机型资质
            if !instructor.is_qualified_for_aircraft(&ctx.target_load.aircraft_id) {
                return Err(Disqualification::Restricted);
            }

            // 6. 周转时间
            if !AvailabilityOracle::is_available(
                &instructor.id,
                ctx.target_load,
                ctx.all_loads,
                ctx.settings.instructor_cycle_time_minutes,
                ctx.settings.minutes_between_loads,
            ) {
                return Err(Disqualification::CycleTime);
            }
        }

        // 7. 显式排除
        if options.excluded.contains(&instructor.id) {
            return Err(Disqualification::Excluded);
        }

        Ok(())
    }

    /// 诊断学员无合格教练的原因
    ///
    /// # 规则
    /// 取全部教练中走得最远的检查阶段作为原因
    /// - 有合格教练时返回 None
    /// - 名册为空时返回 NoClockedInStaff
    pub fn diagnose<S>(
        student: &S,
        instructors: &[Instructor],
        options: &FilterOptions<'_>,
    ) -> Option<UnassignableReason>
    where
        S: JumpRequirement + ?Sized,
    {
        let mut furthest: Option<Disqualification> = None;
        for instructor in instructors {
            match Self::check(student, instructor, options) {
                Ok(()) => return None,
                Err(d) => {
                    furthest = Some(furthest.map_or(d, |f| f.max(d)));
                }
            }
        }
        Some(
            furthest
                .map(UnassignableReason::from)
                .unwrap_or(UnassignableReason::NoClockedInStaff),
        )
    }
}
