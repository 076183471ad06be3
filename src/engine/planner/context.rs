// ==========================================
// 跳伞场载次排班系统 - 规划上下文
// ==========================================
// 职责: 单次规划内共享的只读数据（平衡分表、当日轮休、调度上下文）
// 红线: 规划开始时构建一次, 各阶段只读
// ==========================================

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::config::LoadSchedulingSettings;
use crate::domain::{Instructor, Load, LoadAssignment};
use crate::engine::balance::BalanceTable;
use crate::engine::qualification::{FilterOptions, QualificationFilter, ScheduleContext};

pub(super) struct PlanContext<'a> {
    pub students: &'a [LoadAssignment],
    pub instructors: &'a [Instructor],
    pub target_load: &'a Load,
    pub all_loads: &'a [Load],
    pub scheduling: LoadSchedulingSettings,
    pub balances: BalanceTable,
    off_today: HashSet<String>,
}

impl<'a> PlanContext<'a> {
    pub fn new(
        students: &'a [LoadAssignment],
        instructors: &'a [Instructor],
        target_load: &'a Load,
        all_loads: &'a [Load],
        scheduling: LoadSchedulingSettings,
        balances: BalanceTable,
        off_today: HashSet<String>,
    ) -> Self {
        Self {
            students,
            instructors,
            target_load,
            all_loads,
            scheduling,
            balances,
            off_today,
        }
    }

    pub fn schedule(&self) -> ScheduleContext<'_> {
        ScheduleContext {
            target_load: self.target_load,
            all_loads: self.all_loads,
            settings: &self.scheduling,
        }
    }

    pub fn student(&self, student_id: &str) -> Option<&'a LoadAssignment> {
        self.students.iter().find(|s| s.student_id == student_id)
    }

    pub fn is_locked(&self, student_id: &str) -> bool {
        self.student(student_id)
            .map(LoadAssignment::is_locked_request)
            .unwrap_or(false)
    }

    // ==========================================
    // 排序
    // ==========================================

    /// 教练排序键
    ///
    /// # 规则
    /// 1) 今日非轮休优先 2) 平衡分低优先 3) 打卡早优先（未记录排后） 4) ID
    fn rank_key<'x>(
        &self,
        instructor: &'x Instructor,
    ) -> (bool, i64, bool, Option<DateTime<Utc>>, &'x str) {
        (
            self.off_today.contains(&instructor.id),
            self.balances.get(&instructor.id),
            instructor.clock_in_time.is_none(),
            instructor.clock_in_time,
            instructor.id.as_str(),
        )
    }

    pub fn rank(&self, candidates: &mut [&Instructor]) {
        candidates.sort_by(|a, b| self.rank_key(a).cmp(&self.rank_key(b)));
    }

    // ==========================================
    // 资质查询（不含占用排除, 已排序）
    // ==========================================

    pub fn qualified_main(&self, student: &LoadAssignment) -> Vec<&'a Instructor> {
        let options = FilterOptions::main(Some(self.schedule()));
        let mut found = QualificationFilter::filter_qualified(student, self.instructors, &options);
        self.rank(&mut found);
        found
    }

    pub fn qualified_video(&self, student: &LoadAssignment) -> Vec<&'a Instructor> {
        let options = FilterOptions::video(Some(self.schedule()));
        let mut found = QualificationFilter::filter_qualified(student, self.instructors, &options);
        self.rank(&mut found);
        found
    }

    /// 最优空闲主教练
    pub fn best_free_main(
        &self,
        student: &LoadAssignment,
        used: &HashSet<String>,
    ) -> Option<&'a Instructor> {
        self.qualified_main(student)
            .into_iter()
            .find(|i| !used.contains(&i.id))
    }

    /// 最优空闲摄像教练
    pub fn best_free_video(
        &self,
        student: &LoadAssignment,
        used: &HashSet<String>,
    ) -> Option<&'a Instructor> {
        self.qualified_video(student)
            .into_iter()
            .find(|i| !used.contains(&i.id))
    }

    /// 非锁定学员按合格教练数升序（稳定, 保持输入顺序）
    pub fn constrained_order(&self) -> Vec<&'a LoadAssignment> {
        let mut order: Vec<(&'a LoadAssignment, usize)> = self
            .students
            .iter()
            .filter(|s| !s.is_locked_request())
            .map(|s| (s, self.qualified_main(s).len()))
            .collect();
        order.sort_by_key(|(_, count)| *count);
        order.into_iter().map(|(s, _)| s).collect()
    }
}
