// ==========================================
// 跳伞场载次排班系统 - 周转可用性判定
// ==========================================
// 职责: 判断教练在完成前序载次后能否赶上目标载次
// 规则: 间隔分钟 = (目标位次 - 前序位次) × 载次间隔; 间隔 >= 周转时间 即可用
// 红线: 纯函数, 无内部状态; 载次位次/状态变化后必须重新求值
// ==========================================

use crate::domain::Load;

// ==========================================
// AvailabilityOracle - 纯函数工具类
// ==========================================
pub struct AvailabilityOracle;

impl AvailabilityOracle {
    /// 判断教练是否可用于目标载次
    ///
    /// # 参数
    /// - `instructor_id`: 教练ID
    /// - `target_load`: 目标载次（取机型与位次）
    /// - `all_loads`: 全部载次
    /// - `cycle_time_minutes`: 教练周转时间
    /// - `minutes_between_loads`: 相邻载次间隔
    pub fn is_available(
        instructor_id: &str,
        target_load: &Load,
        all_loads: &[Load],
        cycle_time_minutes: u32,
        minutes_between_loads: u32,
    ) -> bool {
        Self::minutes_until_available(
            instructor_id,
            target_load,
            all_loads,
            cycle_time_minutes,
            minutes_between_loads,
        ) == 0
    }

    /// 同机型、位次在目标之前、且教练担任任一角色的最近载次
    pub fn last_prior_load<'a>(
        instructor_id: &str,
        target_load: &Load,
        all_loads: &'a [Load],
    ) -> Option<&'a Load> {
        all_loads
            .iter()
            .filter(|l| l.aircraft_id == target_load.aircraft_id)
            .filter(|l| l.position < target_load.position)
            .filter(|l| l.involves_instructor(instructor_id))
            .max_by_key(|l| l.position)
    }

    /// 距可用还差的分钟数（0 = 已可用）
    pub fn minutes_until_available(
        instructor_id: &str,
        target_load: &Load,
        all_loads: &[Load],
        cycle_time_minutes: u32,
        minutes_between_loads: u32,
    ) -> u32 {
        match Self::last_prior_load(instructor_id, target_load, all_loads) {
            None => 0,
            Some(prior) => {
                let elapsed = (target_load.position - prior.position)
                    .saturating_mul(minutes_between_loads);
                cycle_time_minutes.saturating_sub(elapsed)
            }
        }
    }
}
