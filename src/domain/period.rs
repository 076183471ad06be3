// ==========================================
// 跳伞场载次排班系统 - 结算周期
// ==========================================
// 规则: 两周一个周期, 从锚定日期起连续切分
// ==========================================

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 周期天数
pub const PERIOD_LENGTH_DAYS: i64 = 14;

// ==========================================
// Period - 结算周期 [start, end]
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// 闭区间判断
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// 计算包含 instant 的两周周期
    ///
    /// # 参数
    /// - anchor: 任一周期的起始日期
    /// - instant: 目标时刻
    ///
    /// # 返回
    /// 周期 [起始日 00:00:00, 第14天 23:59:59.999]
    pub fn fortnight_containing(anchor: NaiveDate, instant: DateTime<Utc>) -> Self {
        let days = (instant.date_naive() - anchor).num_days();
        let index = days.div_euclid(PERIOD_LENGTH_DAYS);
        let start_date = anchor + Duration::days(index * PERIOD_LENGTH_DAYS);
        let start = start_date.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = start + Duration::days(PERIOD_LENGTH_DAYS) - Duration::milliseconds(1);
        Self { start, end }
    }
}
