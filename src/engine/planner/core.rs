// ==========================================
// 跳伞场载次排班系统 - 教练分配规划器
// ==========================================
// 职责: 为目标载次上的学员分配主教练与外部摄像教练
// 输入: 规划快照 (学员 + 教练名册 + 历史 + 载次)
// 输出: PlanResult { 分配表, 无法分配原因, 统计 }
// ==========================================
// 红线: 同一教练在同一载次只能担任一个角色
// 红线: 锁定指定不可被覆盖
// 红线: 无解以 AssignmentError 表达, 不 panic, 不返回 Err
// ==========================================

use chrono::Datelike;
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{info, instrument, warn};

use super::context::PlanContext;
use super::phases;
use super::types::{
    used_instructors, AssignmentError, AssignmentErrorKind, AssignmentMap, PlanResult,
    PlanStats, PlanningInput,
};
use crate::config::{
    EngineConfig, EngineConfigReader, FairnessSettings, LoadSchedulingSettings, PayRates,
    SearchSettings,
};
use crate::domain::{Load, LoadAssignment};
use crate::engine::balance::{BalanceCalculator, BalanceTable};
use crate::engine::fallback::{ExhaustiveSearch, SearchOutcome};
use crate::engine::qualification::{FilterOptions, QualificationFilter, UnassignableReason};

// ==========================================
// AssignmentPlanner - 分配规划器
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct AssignmentPlanner {
    scheduling: LoadSchedulingSettings,
    pay: PayRates,
    fairness: FairnessSettings,
    search: SearchSettings,
}

impl AssignmentPlanner {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            scheduling: config.scheduling,
            pay: config.pay,
            fairness: config.fairness,
            search: config.search,
        }
    }

    pub fn from_reader(reader: &dyn EngineConfigReader) -> Self {
        Self {
            scheduling: reader.scheduling(),
            pay: reader.pay_rates(),
            fairness: reader.fairness(),
            search: reader.search(),
        }
    }

    /// 规划目标载次的教练分配
    ///
    /// # 流程
    /// 1. 计算平衡分表（排除目标载次自身, 保证重复规划幂等）
    /// 2. 锁定指定 -> 约束优先贪心 -> 主教练修复 -> 摄像修复
    /// 3. 仍有学员无主教练时执行穷举回退
    /// 4. 为未分配/缺摄像的学员生成原因
    #[instrument(skip(self, input), fields(
        load_id = %input.target_load.id,
        students = input.students.len(),
        instructors = input.instructors.len()
    ))]
    pub fn plan(&self, input: &PlanningInput<'_>) -> PlanResult {
        let started = Instant::now();
        let mut stats = PlanStats::default();

        let ctx = self.build_context(input);

        // ===== 启发式阶段 =====
        let locked_map = phases::lock_requests(&ctx);
        stats.locked = locked_map.len();

        let order = ctx.constrained_order();
        let (greedy_map, greedy_assigned) = phases::greedy(&ctx, &order, &locked_map);
        stats.greedy_assigned = greedy_assigned;

        let (main_map, main_repaired) = phases::repair_main(&ctx, &order, &greedy_map);
        stats.main_repaired = main_repaired;

        let (video_map, video_repaired) = phases::repair_video(&ctx, &main_map);
        stats.video_repaired = video_repaired;

        let unassigned = Self::unassigned_students(input.students, &video_map);
        stats.unassigned_after_heuristics = unassigned.len();

        // ===== 穷举回退 =====
        let final_map = if unassigned.is_empty() {
            video_map
        } else {
            stats.fallback_ran = true;
            let candidates: HashMap<String, Vec<String>> = input
                .students
                .iter()
                .map(|s| {
                    let ids = ctx.qualified_main(s).into_iter().map(|i| i.id.clone()).collect();
                    (s.student_id.clone(), ids)
                })
                .collect();
            let locked: HashSet<String> = locked_map.keys().cloned().collect();

            match ExhaustiveSearch::new(&candidates, &locked, self.search).solve(&video_map, &unassigned) {
                SearchOutcome::Solved { map, attempts } => {
                    stats.fallback_solved = true;
                    stats.fallback_attempts = attempts;
                    // 回退中新分配的学员再走一次摄像修复
                    let (map, extra_video) = phases::repair_video(&ctx, &map);
                    stats.video_repaired += extra_video;
                    map
                }
                SearchOutcome::Failed { attempts, timed_out } => {
                    stats.fallback_attempts = attempts;
                    stats.fallback_timed_out = timed_out;
                    video_map
                }
            }
        };

        let errors = self.collect_errors(&ctx, input.students, &final_map, stats.fallback_timed_out);
        stats.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if errors.is_empty() {
            info!(assigned = final_map.len(), elapsed_ms = stats.elapsed_ms, "载次分配完成");
        } else {
            warn!(
                assigned = final_map.len(),
                errors = errors.len(),
                elapsed_ms = stats.elapsed_ms,
                "载次分配存在无法满足的学员"
            );
        }

        PlanResult {
            assignments: final_map,
            errors,
            stats,
        }
    }

    fn build_context<'a>(&self, input: &PlanningInput<'a>) -> PlanContext<'a> {
        let calculator = BalanceCalculator::new(self.pay, self.fairness);
        let pending: Vec<Load> = input
            .all_loads
            .iter()
            .filter(|l| l.id != input.target_load.id)
            .cloned()
            .collect();
        let balances = BalanceTable::compute(
            &calculator,
            input.instructors,
            input.history,
            &input.period,
            &pending,
            input.today,
        );

        let weekday = input.today.weekday();
        let off_today: HashSet<String> = input
            .instructors
            .iter()
            .filter(|i| self.fairness.team_rotation.is_off(i.team, weekday))
            .map(|i| i.id.clone())
            .collect();

        PlanContext::new(
            input.students,
            input.instructors,
            input.target_load,
            input.all_loads,
            self.scheduling,
            balances,
            off_today,
        )
    }

    /// 无主教练的学员（保持输入顺序）
    fn unassigned_students(students: &[LoadAssignment], map: &AssignmentMap) -> Vec<String> {
        students
            .iter()
            .filter(|s| !map.contains_key(&s.student_id))
            .map(|s| s.student_id.clone())
            .collect()
    }

    fn collect_errors(
        &self,
        ctx: &PlanContext<'_>,
        students: &[LoadAssignment],
        map: &AssignmentMap,
        timed_out: bool,
    ) -> Vec<AssignmentError> {
        let used = used_instructors(map);
        let mut errors = Vec::new();

        for s in students {
            match map.get(&s.student_id) {
                None => {
                    let options = FilterOptions::main(Some(ctx.schedule())).with_excluded(used.clone());
                    let reason = QualificationFilter::diagnose(s, ctx.instructors, &options)
                        .unwrap_or(UnassignableReason::AllQualifiedCommitted);
                    let kind = if timed_out {
                        AssignmentErrorKind::SearchTimeout
                    } else {
                        AssignmentErrorKind::from(reason)
                    };
                    warn!(student_id = %s.student_id, kind = %kind, reason = %reason, "学员无法分配主教练");
                    errors.push(AssignmentError {
                        student_id: s.student_id.clone(),
                        kind,
                        message: format!("{}: 学员 {} 无法分配主教练 ({})", kind, s.student_name, reason),
                    });
                }
                Some(pair) if s.has_outside_video && pair.video.is_none() => {
                    warn!(student_id = %s.student_id, "外部摄像无人可配");
                    errors.push(AssignmentError {
                        student_id: s.student_id.clone(),
                        kind: AssignmentErrorKind::MissingVideo,
                        message: format!(
                            "{}: 学员 {} 已分配主教练 {}, 外部摄像无合格空闲教练",
                            AssignmentErrorKind::MissingVideo,
                            s.student_name,
                            pair.main
                        ),
                    });
                }
                Some(_) => {}
            }
        }
        errors
    }
}

impl Default for AssignmentPlanner {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
