// ==========================================
// 跳伞场载次排班系统 - 平衡分引擎
// ==========================================
// 职责: 计算教练在结算周期内的平衡分（轮换公平性）与收入（薪酬）
// 输入: 历史分配 + 未完成载次 + 轮休排班
// 输出: 平衡分 / 收入
// ==========================================
// 红线: 平衡分与收入不可混用
// - 平衡分: 排除指定(request)、排除漏跳、轮休日乘系数, 计入未完成载次
// - 收入:   计入指定、排除漏跳、不乘系数, 仅历史
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::config::{FairnessSettings, PayRates};
use crate::domain::{Assignment, Instructor, JumpType, Load, LoadStatus, Period};
use crate::engine::pay::PayCore;

// ==========================================
// BalanceCalculator - 平衡分引擎
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct BalanceCalculator {
    rates: PayRates,
    fairness: FairnessSettings,
}

impl BalanceCalculator {
    pub fn new(rates: PayRates, fairness: FairnessSettings) -> Self {
        Self { rates, fairness }
    }

    /// 教练在某天是否轮休
    pub fn is_off_day(&self, instructor: &Instructor, date: NaiveDate) -> bool {
        self.fairness.team_rotation.is_off(instructor.team, date.weekday())
    }

    fn is_off_day_by_id(
        &self,
        instructor_id: &str,
        instructors: &[Instructor],
        date: NaiveDate,
    ) -> bool {
        instructors
            .iter()
            .find(|i| i.id == instructor_id)
            .map(|i| self.is_off_day(i, date))
            .unwrap_or(false)
    }

    // ==========================================
    // 平衡分
    // ==========================================

    /// 计算单个教练的平衡分
    ///
    /// # 规则
    /// 1. 历史记录: 周期内、未删除、非指定
    ///    - 主教练且未漏跳: 计主教练薪酬
    ///    - 摄像教练（仅按 video_instructor_id 匹配）且未漏跳: 计摄像薪酬
    ///    - 记录当天轮休: 乘轮休系数
    /// 2. 未完成载次: 非指定分配同样计入, 轮休按 today 判断
    ///
    /// # 参数
    /// - `instructor_id`: 教练ID
    /// - `history`: 历史分配
    /// - `instructors`: 教练名册（用于查询队伍）
    /// - `period`: 结算周期
    /// - `pending_loads`: 载次列表（completed 状态会被跳过）
    /// - `today`: 当日（用于未完成载次的轮休判断）
    pub fn balance(
        &self,
        instructor_id: &str,
        history: &[Assignment],
        instructors: &[Instructor],
        period: &Period,
        pending_loads: &[Load],
        today: NaiveDate,
    ) -> i64 {
        let multiplier = self.fairness.off_day_multiplier;
        let mut total = 0i64;

        // 1. 历史记录
        for record in history {
            if record.is_deleted || record.is_request || record.is_missed_jump {
                continue;
            }
            if !period.contains(record.timestamp) {
                continue;
            }

            let mut pay = 0i64;
            if record.instructor_id == instructor_id {
                pay += PayCore::main_pay(
                    record.jump_type,
                    record.aff_level,
                    record.weight_tax,
                    record.has_handcam,
                    &self.rates,
                );
            }
            if record.video_instructor_id.as_deref() == Some(instructor_id) {
                pay += PayCore::video_pay(&self.rates);
            }
            if pay == 0 {
                continue;
            }

            let off = self.is_off_day_by_id(instructor_id, instructors, record.timestamp.date_naive());
            total += PayCore::apply_multiplier(pay, off, multiplier);
        }

        // 2. 未完成载次（实时负荷）
        let off_today = self.is_off_day_by_id(instructor_id, instructors, today);
        for load in pending_loads.iter().filter(|l| l.status != LoadStatus::Completed) {
            for a in load.assignments.iter().filter(|a| !a.is_request) {
                let mut pay = 0i64;
                if a.instructor_id.as_deref() == Some(instructor_id) {
                    pay += PayCore::main_pay(
                        a.jump_type,
                        a.aff_level,
                        a.weight_tax,
                        a.has_handcam,
                        &self.rates,
                    );
                }
                if a.video_instructor_id.as_deref() == Some(instructor_id) {
                    pay += PayCore::video_pay(&self.rates);
                }
                if pay > 0 {
                    total += PayCore::apply_multiplier(pay, off_today, multiplier);
                }
            }
        }

        total
    }

    // ==========================================
    // 收入（薪酬）
    // ==========================================

    /// 计算教练周期内总收入
    ///
    /// # 规则
    /// - 计入指定(request)
    /// - 排除漏跳、已删除
    /// - 不乘轮休系数
    pub fn total_earnings(&self, instructor_id: &str, history: &[Assignment], period: &Period) -> i64 {
        self.earnings_breakdown(instructor_id, history, period).total
    }

    /// 收入明细
    pub fn earnings_breakdown(
        &self,
        instructor_id: &str,
        history: &[Assignment],
        period: &Period,
    ) -> EarningsBreakdown {
        let mut breakdown = EarningsBreakdown::default();

        for record in history {
            if record.is_deleted || record.is_missed_jump || !period.contains(record.timestamp) {
                continue;
            }
            if record.instructor_id == instructor_id {
                let pay = PayCore::main_pay(
                    record.jump_type,
                    record.aff_level,
                    record.weight_tax,
                    record.has_handcam,
                    &self.rates,
                );
                match record.jump_type {
                    JumpType::Tandem => {
                        breakdown.tandem_count += 1;
                        breakdown.tandem_total += pay;
                    }
                    JumpType::Aff => {
                        breakdown.aff_count += 1;
                        breakdown.aff_total += pay;
                    }
                    JumpType::Video => {
                        breakdown.video_count += 1;
                        breakdown.video_total += pay;
                    }
                }
                breakdown.total += pay;
            }
            if record.video_instructor_id.as_deref() == Some(instructor_id) {
                let pay = PayCore::video_pay(&self.rates);
                breakdown.video_count += 1;
                breakdown.video_total += pay;
                breakdown.total += pay;
            }
        }

        breakdown
    }
}

// ==========================================
// EarningsBreakdown - 收入明细
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsBreakdown {
    pub tandem_count: u32,
    pub tandem_total: i64,
    pub aff_count: u32,
    pub aff_total: i64,
    pub video_count: u32,
    pub video_total: i64,
    pub total: i64,
}

// ==========================================
// BalanceTable - 单次规划的平衡分查找表
// ==========================================
// 规划开始时一次性计算, 整个规划过程中比较稳定
#[derive(Debug, Clone, Default)]
pub struct BalanceTable {
    balances: HashMap<String, i64>,
}

impl BalanceTable {
    /// 为全部未归档教练计算平衡分
    pub fn compute(
        calculator: &BalanceCalculator,
        instructors: &[Instructor],
        history: &[Assignment],
        period: &Period,
        pending_loads: &[Load],
        today: NaiveDate,
    ) -> Self {
        let balances: HashMap<String, i64> = instructors
            .iter()
            .filter(|i| !i.archived)
            .map(|i| {
                let b = calculator.balance(&i.id, history, instructors, period, pending_loads, today);
                (i.id.clone(), b)
            })
            .collect();

        debug!(instructors = balances.len(), "平衡分查找表计算完成");
        Self { balances }
    }

    pub fn from_map(balances: HashMap<String, i64>) -> Self {
        Self { balances }
    }

    /// 查询平衡分（未知教练按 0）
    pub fn get(&self, instructor_id: &str) -> i64 {
        self.balances.get(instructor_id).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Team;
    use chrono::{TimeZone, Utc};

    fn record(main: &str, video: Option<&str>) -> Assignment {
        Assignment {
            id: "H1".to_string(),
            load_id: None,
            instructor_id: main.to_string(),
            video_instructor_id: video.map(str::to_string),
            student_name: String::new(),
            jump_type: JumpType::Tandem,
            aff_level: None,
            weight_tax: 0,
            has_handcam: false,
            has_outside_video: false,
            is_request: false,
            is_missed_jump: false,
            is_deleted: false,
            timestamp: Utc.with_ymd_and_hms(2026, 10, 7, 12, 0, 0).unwrap(),
        }
    }

    fn period() -> Period {
        let anchor = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        Period::fortnight_containing(anchor, Utc.with_ymd_and_hms(2026, 10, 7, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_video_credit_follows_video_instructor_id() {
        let calc = BalanceCalculator::new(PayRates::default(), FairnessSettings::default());
        let instructors = vec![];
        let today = NaiveDate::from_ymd_opt(2026, 10, 7).unwrap();
        let history = vec![record("I1", Some("I2"))];

        assert_eq!(calc.balance("I2", &history, &instructors, &period(), &[], today), 45);
        assert_eq!(calc.balance("I1", &history, &instructors, &period(), &[], today), 40);
    }

    #[test]
    fn test_deleted_records_ignored() {
        let calc = BalanceCalculator::new(PayRates::default(), FairnessSettings::default());
        let today = NaiveDate::from_ymd_opt(2026, 10, 7).unwrap();
        let mut deleted = record("I1", None);
        deleted.is_deleted = true;

        assert_eq!(calc.balance("I1", &[deleted.clone()], &[], &period(), &[], today), 0);
        assert_eq!(calc.total_earnings("I1", &[deleted], &period()), 0);
    }

    #[test]
    fn test_unknown_instructor_never_off() {
        let calc = BalanceCalculator::new(PayRates::default(), FairnessSettings::default());
        let known = Instructor {
            id: "I9".to_string(),
            name: "I9".to_string(),
            can_tandem: true,
            can_aff: false,
            can_video: false,
            tandem_weight_limit: None,
            aff_weight_limit: None,
            body_weight: 180,
            clocked_in: true,
            clock_in_time: None,
            team: Team::Gold,
            aircraft_ids: None,
            aff_locked_students: vec![],
            video_weight_band: None,
            archived: false,
        };
        let monday = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        assert!(!calc.is_off_day(&known, monday));
        assert!(!calc.is_off_day_by_id("NOBODY", &[known], monday));
    }
}
