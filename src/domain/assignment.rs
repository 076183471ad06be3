// ==========================================
// 跳伞场载次排班系统 - 历史分配记录
// ==========================================
// 红线: 已完成跳伞的不可变记录, 只允许软删除
// 用途: 平衡分/收入计算的唯一输入
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{AffLevel, JumpType};

// ==========================================
// Assignment - 历史分配记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: String,
    #[serde(default)]
    pub load_id: Option<String>,

    // ===== 角色 =====
    pub instructor_id: String,
    #[serde(default)]
    pub video_instructor_id: Option<String>,

    // ===== 跳伞属性 =====
    #[serde(default)]
    pub student_name: String,
    pub jump_type: JumpType,
    #[serde(default)]
    pub aff_level: Option<AffLevel>,
    #[serde(default)]
    pub weight_tax: u32,
    #[serde(default)]
    pub has_handcam: bool,
    #[serde(default)]
    pub has_outside_video: bool,

    // ===== 标记 =====
    #[serde(default)]
    pub is_request: bool,
    #[serde(default)]
    pub is_missed_jump: bool,
    #[serde(default)]
    pub is_deleted: bool,

    pub timestamp: DateTime<Utc>,
}
