// ==========================================
// 跳伞场载次排班系统 - 排队学员领域模型
// ==========================================
// 生命周期: 加入候机队列时创建; 上载次或撤回时移除
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{AffLevel, JumpType};

// ==========================================
// Trait: JumpRequirement
// ==========================================
// 用途: 资质过滤/冲突检测统一读取学员跳伞需求
pub trait JumpRequirement {
    /// 学员ID
    fn student_id(&self) -> &str;

    /// 跳伞类型
    fn jump_type(&self) -> JumpType;

    /// 学员体重（磅）
    fn student_weight(&self) -> u32;

    /// 双人伞体重附加（磅）
    fn weight_tax(&self) -> u32;

    /// 是否需要外部摄像
    fn needs_outside_video(&self) -> bool;

    /// 有效体重
    ///
    /// # 规则
    /// - tandem: 体重 + 体重附加
    /// - 其他: 原始体重
    fn effective_weight(&self) -> u32 {
        match self.jump_type() {
            JumpType::Tandem => self.student_weight().saturating_add(self.weight_tax()),
            _ => self.student_weight(),
        }
    }
}

// ==========================================
// QueuedStudent - 候机学员
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedStudent {
    pub id: String,
    pub name: String,
    pub weight: u32,
    pub jump_type: JumpType,

    // ===== 双人伞附加项 =====
    #[serde(default)]
    pub weight_tax: u32,
    #[serde(default)]
    pub has_handcam: bool,
    #[serde(default)]
    pub has_outside_video: bool,

    // ===== AFF =====
    #[serde(default)]
    pub aff_level: Option<AffLevel>,

    // ===== 分组/指定 =====
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub is_request: bool,
    /// 指定教练（首位为主教练）
    #[serde(default)]
    pub requested_instructor_ids: Vec<String>,

    pub enqueued_at: DateTime<Utc>,
}

impl JumpRequirement for QueuedStudent {
    fn student_id(&self) -> &str {
        &self.id
    }

    fn jump_type(&self) -> JumpType {
        self.jump_type
    }

    fn student_weight(&self) -> u32 {
        self.weight
    }

    fn weight_tax(&self) -> u32 {
        self.weight_tax
    }

    fn needs_outside_video(&self) -> bool {
        self.has_outside_video
    }
}
