// ==========================================
// 跳伞场载次排班系统 - 单次跳伞计薪纯函数
// ==========================================
// 职责: 计算主教练/摄像教练单次跳伞应计金额
// 红线: 无状态、无副作用、无 I/O 操作
// ==========================================

use crate::config::PayRates;
use crate::domain::types::{AffLevel, JumpType};

// ==========================================
// PayCore - 纯函数工具类
// ==========================================
pub struct PayCore;

impl PayCore {
    /// 主教练单次计薪
    ///
    /// # 规则
    /// - tandem: 基础 + 体重附加单位 × 附加费率 + 手持摄像奖励
    /// - aff: lower/upper 固定费率（缺省按 lower）
    /// - video (纯摄像记录): 摄像固定费率
    pub fn main_pay(
        jump_type: JumpType,
        aff_level: Option<AffLevel>,
        weight_tax: u32,
        has_handcam: bool,
        rates: &PayRates,
    ) -> i64 {
        match jump_type {
            JumpType::Tandem => {
                let mut pay = rates.tandem_base + i64::from(weight_tax) * rates.tandem_weight_tax;
                if has_handcam {
                    pay += rates.tandem_handcam;
                }
                pay
            }
            JumpType::Aff => match aff_level.unwrap_or(AffLevel::Lower) {
                AffLevel::Lower => rates.aff_lower,
                AffLevel::Upper => rates.aff_upper,
            },
            JumpType::Video => rates.video,
        }
    }

    /// 摄像教练单次计薪
    pub fn video_pay(rates: &PayRates) -> i64 {
        rates.video
    }

    /// 应用轮休系数（四舍五入）
    pub fn apply_multiplier(pay: i64, off_day: bool, multiplier: f64) -> i64 {
        if off_day {
            (pay as f64 * multiplier).round() as i64
        } else {
            pay
        }
    }
}
