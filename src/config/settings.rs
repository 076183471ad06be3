// ==========================================
// 跳伞场载次排班系统 - 引擎配置项
// ==========================================
// 职责: 定义引擎所需的全部配置结构及默认值
// 红线: 所有字段都有默认值,缺省配置即可运行
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::TeamRotation;

// ==========================================
// 薪酬常量 (单位: 美元)
// ==========================================
pub mod pay_rates {
    /// 双人伞基础带飞费
    pub const TANDEM_BASE: i64 = 40;
    /// 双人伞每单位体重附加
    pub const TANDEM_WEIGHT_TAX: i64 = 10;
    /// 双人伞手持摄像
    pub const TANDEM_HANDCAM: i64 = 30;
    /// AFF 1-4 级
    pub const AFF_LOWER: i64 = 55;
    /// AFF 5-7 级
    pub const AFF_UPPER: i64 = 45;
    /// 外部摄像
    pub const VIDEO: i64 = 45;
}

/// 轮休日工作的公平系数
pub const OFF_DAY_MULTIPLIER: f64 = 1.2;

// ==========================================
// LoadSchedulingSettings - 载次调度参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadSchedulingSettings {
    /// 教练两次跳伞之间所需的最短时间（分钟）
    pub instructor_cycle_time_minutes: u32,
    /// 相邻载次间隔（分钟）
    pub minutes_between_loads: u32,
    /// 默认载次容量
    pub default_capacity: u32,
}

impl Default for LoadSchedulingSettings {
    fn default() -> Self {
        Self {
            instructor_cycle_time_minutes: 40,
            minutes_between_loads: 20,
            default_capacity: 18,
        }
    }
}

// ==========================================
// PayRates - 薪酬费率
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayRates {
    pub tandem_base: i64,
    pub tandem_weight_tax: i64,
    pub tandem_handcam: i64,
    pub aff_lower: i64,
    pub aff_upper: i64,
    pub video: i64,
}

impl Default for PayRates {
    fn default() -> Self {
        Self {
            tandem_base: pay_rates::TANDEM_BASE,
            tandem_weight_tax: pay_rates::TANDEM_WEIGHT_TAX,
            tandem_handcam: pay_rates::TANDEM_HANDCAM,
            aff_lower: pay_rates::AFF_LOWER,
            aff_upper: pay_rates::AFF_UPPER,
            video: pay_rates::VIDEO,
        }
    }
}

// ==========================================
// FairnessSettings - 平衡分参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FairnessSettings {
    /// 轮休日系数（须 > 1）
    pub off_day_multiplier: f64,
    /// 轮休排班
    pub team_rotation: TeamRotation,
}

impl Default for FairnessSettings {
    fn default() -> Self {
        Self {
            off_day_multiplier: OFF_DAY_MULTIPLIER,
            team_rotation: TeamRotation::default(),
        }
    }
}

// ==========================================
// SearchSettings - 穷举回退搜索边界
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// 最大递归深度
    pub max_depth: usize,
    /// 墙钟超时（毫秒）
    pub timeout_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_depth: 12,
            timeout_ms: 2000,
        }
    }
}

// ==========================================
// ConflictSettings - 冲突检测阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConflictSettings {
    /// 连续载次疲劳阈值
    pub fatigue_consecutive_loads: u32,
}

impl Default for ConflictSettings {
    fn default() -> Self {
        Self {
            fatigue_consecutive_loads: 4,
        }
    }
}

// ==========================================
// EngineConfig - 引擎配置全集
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub scheduling: LoadSchedulingSettings,
    pub pay: PayRates,
    pub fairness: FairnessSettings,
    pub search: SearchSettings,
    pub conflicts: ConflictSettings,
}
