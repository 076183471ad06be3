// ==========================================
// 跳伞场载次排班系统 - 教练领域模型
// ==========================================
// 生命周期: 员工创建/编辑; 每班次打卡切换; 归档(软删除)而非物理删除
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{JumpType, Team};

// ==========================================
// WeightBand - 摄像体重区间
// ==========================================
// 用途: 教练体重 + 学员体重 须落在区间内
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightBand {
    pub min_lbs: u32,
    pub max_lbs: u32,
}

impl WeightBand {
    pub fn contains(&self, combined_lbs: u32) -> bool {
        combined_lbs >= self.min_lbs && combined_lbs <= self.max_lbs
    }
}

// ==========================================
// Instructor - 教练
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    // ===== 身份 =====
    pub id: String,
    pub name: String,

    // ===== 资质 =====
    #[serde(default)]
    pub can_tandem: bool,
    #[serde(default)]
    pub can_aff: bool,
    #[serde(default)]
    pub can_video: bool,

    // ===== 体重限制 (磅, None = 不限) =====
    #[serde(default)]
    pub tandem_weight_limit: Option<u32>,
    #[serde(default)]
    pub aff_weight_limit: Option<u32>,
    pub body_weight: u32,

    // ===== 打卡 =====
    #[serde(default)]
    pub clocked_in: bool,
    #[serde(default)]
    pub clock_in_time: Option<DateTime<Utc>>,

    // ===== 排班 =====
    pub team: Team,

    /// 可执飞机型列表（None 或空 = 全部机型）
    #[serde(default)]
    pub aircraft_ids: Option<Vec<String>>,

    /// AFF 锁定学员名单（非空时只能带名单内学员）
    #[serde(default)]
    pub aff_locked_students: Vec<String>,

    /// 摄像体重区间
    #[serde(default)]
    pub video_weight_band: Option<WeightBand>,

    /// 已归档
    #[serde(default)]
    pub archived: bool,
}

impl Instructor {
    /// 是否具备该跳伞类型的带飞资质
    pub fn is_certified_for(&self, jump_type: JumpType) -> bool {
        match jump_type {
            JumpType::Tandem => self.can_tandem,
            JumpType::Aff => self.can_aff,
            JumpType::Video => self.can_video,
        }
    }

    /// 该类型的体重上限
    pub fn weight_limit_for(&self, jump_type: JumpType) -> Option<u32> {
        match jump_type {
            JumpType::Tandem => self.tandem_weight_limit,
            JumpType::Aff => self.aff_weight_limit,
            JumpType::Video => None,
        }
    }

    /// 是否可执飞该机型
    pub fn is_qualified_for_aircraft(&self, aircraft_id: &str) -> bool {
        match &self.aircraft_ids {
            Some(list) if !list.is_empty() => list.iter().any(|a| a == aircraft_id),
            _ => true,
        }
    }

    pub fn is_aff_locked(&self) -> bool {
        !self.aff_locked_students.is_empty()
    }
}
