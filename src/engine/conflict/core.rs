// ==========================================
// 跳伞场载次排班系统 - 载次冲突检测引擎
// ==========================================
// 职责: 审计单个载次, 输出冲突报告（只读）
// 输入: 目标载次 + 全部载次 + 教练名册 + 调度参数
// 输出: Vec<Conflict>, 按 error -> warning -> info 排序
// ==========================================
// 红线: 仅 "超出容量" 与 "ready/departed 载次上的未分配学员" 为 error
// 红线: 冲突为提示, 检测器不修改任何输入
// ==========================================

use std::collections::HashMap;
use tracing::{debug, instrument};

use super::report::{AutoFix, Conflict, ConflictKind, Severity};
use crate::config::{ConflictSettings, LoadSchedulingSettings};
use crate::domain::{Instructor, JumpRequirement, Load, LoadStatus};
use crate::engine::availability::AvailabilityOracle;

// ==========================================
// ConflictDetector - 冲突检测引擎
// ==========================================
pub struct ConflictDetector {
    scheduling: LoadSchedulingSettings,
    settings: ConflictSettings,
}

impl ConflictDetector {
    pub fn new(scheduling: LoadSchedulingSettings, settings: ConflictSettings) -> Self {
        Self {
            scheduling,
            settings,
        }
    }

    /// 审计载次
    ///
    /// # 参数
    /// - `load`: 目标载次
    /// - `all_loads`: 全部载次（疲劳与周转检查）
    /// - `instructors`: 教练名册
    #[instrument(skip(self, load, all_loads, instructors), fields(load_id = %load.id))]
    pub fn detect(&self, load: &Load, all_loads: &[Load], instructors: &[Instructor]) -> Vec<Conflict> {
        let roster: HashMap<&str, &Instructor> =
            instructors.iter().map(|i| (i.id.as_str(), i)).collect();

        let mut conflicts = Vec::new();
        conflicts.extend(self.check_capacity(load));
        conflicts.extend(self.check_unassigned(load));
        conflicts.extend(self.check_fatigue(load, all_loads));
        conflicts.extend(self.check_cycle_time(load, all_loads));
        conflicts.extend(self.check_weight_limits(load, &roster));
        conflicts.extend(self.check_clocked_out(load, &roster));
        conflicts.extend(self.check_missing_video(load));
        conflicts.extend(self.check_duplicate_roles(load));
        conflicts.extend(self.check_video_bands(load, &roster));

        // 稳定排序, 同级保持检查顺序
        conflicts.sort_by_key(|c| c.severity);

        debug!(conflicts = conflicts.len(), "载次冲突检测完成");
        conflicts
    }

    // ==========================================
    // 容量
    // ==========================================

    fn check_capacity(&self, load: &Load) -> Option<Conflict> {
        let occupied = load.occupied_seats();
        if occupied > load.capacity {
            Some(
                Conflict::new(
                    ConflictKind::CapacityExceeded,
                    Severity::Error,
                    format!("载次 {} 占用 {} 座, 超出容量 {}", load.id, occupied, load.capacity),
                    vec![load.id.clone()],
                )
                .with_fix(AutoFix::RemoveLastStudent),
            )
        } else if occupied == load.capacity {
            Some(Conflict::new(
                ConflictKind::CapacityAtLimit,
                Severity::Info,
                format!("载次 {} 已满载 ({} 座)", load.id, occupied),
                vec![load.id.clone()],
            ))
        } else {
            None
        }
    }

    // ==========================================
    // 未分配
    // ==========================================

    fn check_unassigned(&self, load: &Load) -> Vec<Conflict> {
        let severity = match load.status {
            LoadStatus::Ready | LoadStatus::Departed => Severity::Error,
            LoadStatus::Building => Severity::Info,
            LoadStatus::Completed => return Vec::new(),
        };

        load.assignments
            .iter()
            .filter(|a| a.instructor_id.is_none())
            .map(|a| {
                Conflict::new(
                    ConflictKind::UnassignedStudent,
                    severity,
                    format!("学员 {} 在载次 {} ({}) 上无主教练", a.student_name, load.id, load.status),
                    vec![load.id.clone(), a.student_id.clone()],
                )
                .with_fix(AutoFix::AutoAssignRemaining)
            })
            .collect()
    }

    // ==========================================
    // 连续载次疲劳
    // ==========================================

    /// 同机型按位次排序, 统计包含目标载次的连续参与段
    fn check_fatigue(&self, load: &Load, all_loads: &[Load]) -> Vec<Conflict> {
        let threshold = self.settings.fatigue_consecutive_loads as usize;
        if threshold == 0 {
            return Vec::new();
        }

        let mut lane: Vec<&Load> = all_loads
            .iter()
            .filter(|l| l.aircraft_id == load.aircraft_id && l.id != load.id)
            .collect();
        lane.push(load);
        lane.sort_by_key(|l| l.position);
        let Some(index) = lane.iter().position(|l| l.id == load.id) else {
            return Vec::new();
        };

        let mut conflicts = Vec::new();
        for instructor_id in load.instructor_ids() {
            let mut start = index;
            while start > 0 && lane[start - 1].involves_instructor(&instructor_id) {
                start -= 1;
            }
            let mut end = index;
            while end + 1 < lane.len() && lane[end + 1].involves_instructor(&instructor_id) {
                end += 1;
            }
            let run = end - start + 1;
            if run >= threshold {
                let mut ids = vec![instructor_id.clone()];
                ids.extend(lane[start..=end].iter().map(|l| l.id.clone()));
                conflicts.push(Conflict::new(
                    ConflictKind::ConsecutiveLoadFatigue,
                    Severity::Warning,
                    format!("教练 {} 连续 {} 个载次 (阈值 {})", instructor_id, run, threshold),
                    ids,
                ));
            }
        }
        conflicts
    }

    // ==========================================
    // 周转时间
    // ==========================================

    fn check_cycle_time(&self, load: &Load, all_loads: &[Load]) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        for instructor_id in load.instructor_ids() {
            let short_by = AvailabilityOracle::minutes_until_available(
                &instructor_id,
                load,
                all_loads,
                self.scheduling.instructor_cycle_time_minutes,
                self.scheduling.minutes_between_loads,
            );
            if short_by == 0 {
                continue;
            }
            let prior_id = AvailabilityOracle::last_prior_load(&instructor_id, load, all_loads)
                .map(|l| l.id.clone())
                .unwrap_or_default();
            conflicts.push(
                Conflict::new(
                    ConflictKind::CycleTimeViolation,
                    Severity::Warning,
                    format!(
                        "教练 {} 距上一载次 {} 周转不足, 还差 {} 分钟",
                        instructor_id, prior_id, short_by
                    ),
                    vec![instructor_id.clone(), prior_id, load.id.clone()],
                )
                .with_fix(AutoFix::UnassignInstructor(instructor_id.clone())),
            );
        }
        conflicts
    }

    // ==========================================
    // 体重上限
    // ==========================================

    fn check_weight_limits(&self, load: &Load, roster: &HashMap<&str, &Instructor>) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        for a in &load.assignments {
            let Some(instructor) = a.instructor_id.as_deref().and_then(|id| roster.get(id)) else {
                continue;
            };
            let Some(limit) = instructor.weight_limit_for(a.jump_type) else {
                continue;
            };
            let weight = a.effective_weight();
            if weight > limit {
                conflicts.push(
                    Conflict::new(
                        ConflictKind::WeightLimitExceeded,
                        Severity::Warning,
                        format!(
                            "学员 {} 有效体重 {} 磅超出教练 {} 的 {} 上限 {} 磅",
                            a.student_name, weight, instructor.id, a.jump_type, limit
                        ),
                        vec![instructor.id.clone(), a.student_id.clone()],
                    )
                    .with_fix(AutoFix::UnassignInstructor(instructor.id.clone())),
                );
            }
        }
        conflicts
    }

    // ==========================================
    // 未打卡
    // ==========================================

    fn check_clocked_out(&self, load: &Load, roster: &HashMap<&str, &Instructor>) -> Vec<Conflict> {
        load.instructor_ids()
            .into_iter()
            .filter_map(|id| roster.get(id.as_str()).copied())
            .filter(|i| !i.clocked_in)
            .map(|i| {
                Conflict::new(
                    ConflictKind::ClockedOutAssigned,
                    Severity::Warning,
                    format!("教练 {} 未打卡但已分配到载次 {}", i.name, load.id),
                    vec![i.id.clone(), load.id.clone()],
                )
                .with_fix(AutoFix::UnassignInstructor(i.id.clone()))
            })
            .collect()
    }

    // ==========================================
    // 外部摄像
    // ==========================================

    fn check_missing_video(&self, load: &Load) -> Vec<Conflict> {
        load.assignments
            .iter()
            .filter(|a| a.has_outside_video && a.video_instructor_id.is_none())
            .map(|a| {
                Conflict::new(
                    ConflictKind::MissingVideoInstructor,
                    Severity::Warning,
                    format!("学员 {} 需要外部摄像, 未配摄像教练", a.student_name),
                    vec![load.id.clone(), a.student_id.clone()],
                )
                .with_fix(AutoFix::AssignVideoInstructor)
            })
            .collect()
    }

    fn check_video_bands(&self, load: &Load, roster: &HashMap<&str, &Instructor>) -> Vec<Conflict> {
        let mut conflicts = Vec::new();
        for a in &load.assignments {
            let Some(video) = a.video_instructor_id.as_deref().and_then(|id| roster.get(id)) else {
                continue;
            };
            let Some(band) = video.video_weight_band else {
                continue;
            };
            let combined = video.body_weight.saturating_add(a.student_weight);
            if !band.contains(combined) {
                conflicts.push(
                    Conflict::new(
                        ConflictKind::VideoWeightBand,
                        Severity::Warning,
                        format!(
                            "摄像教练 {} 与学员 {} 合计 {} 磅, 不在区间 [{}, {}]",
                            video.id, a.student_name, combined, band.min_lbs, band.max_lbs
                        ),
                        vec![video.id.clone(), a.student_id.clone()],
                    )
                    .with_fix(AutoFix::UnassignInstructor(video.id.clone())),
                );
            }
        }
        conflicts
    }

    // ==========================================
    // 角色重复
    // ==========================================

    fn check_duplicate_roles(&self, load: &Load) -> Vec<Conflict> {
        let mut roles: HashMap<&str, Vec<&str>> = HashMap::new();
        for a in &load.assignments {
            for id in [a.instructor_id.as_deref(), a.video_instructor_id.as_deref()]
                .into_iter()
                .flatten()
            {
                roles.entry(id).or_default().push(a.student_id.as_str());
            }
        }

        let mut duplicated: Vec<(&str, Vec<&str>)> =
            roles.into_iter().filter(|(_, students)| students.len() > 1).collect();
        duplicated.sort_by_key(|(id, _)| *id);

        duplicated
            .into_iter()
            .map(|(id, students)| {
                let mut ids = vec![id.to_string()];
                ids.extend(students.iter().map(|s| s.to_string()));
                Conflict::new(
                    ConflictKind::DuplicateRole,
                    Severity::Warning,
                    format!("教练 {} 在载次 {} 担任 {} 个角色", id, load.id, students.len()),
                    ids,
                )
            })
            .collect()
    }
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(LoadSchedulingSettings::default(), ConflictSettings::default())
    }
}
