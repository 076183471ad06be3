// ==========================================
// 跳伞场载次排班系统 - 载次领域模型
// ==========================================
// 红线: 占用座位 (学员2 + 外部摄像1 + 散跳者各1) 不得超过载次容量
// 红线: 同一教练在同一载次只能担任一个角色 (主教练 XOR 摄像)
// ==========================================
// 生命周期: building/ready 期间持续修改; completed 后只追加历史
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assignment::Assignment;
use super::error::{DomainError, DomainResult};
use super::student::{JumpRequirement, QueuedStudent};
use super::types::{AffLevel, JumpType, LoadStatus};

/// 每名学员占用座位 (学员 + 主教练)
pub const SEATS_PER_STUDENT: u32 = 2;

// ==========================================
// LoadAssignment - 载次内分配
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadAssignment {
    pub id: String,

    // ===== 学员 =====
    pub student_id: String,
    #[serde(default)]
    pub student_name: String,
    pub student_weight: u32,

    // ===== 跳伞属性 (入载时复制) =====
    pub jump_type: JumpType,
    #[serde(default)]
    pub aff_level: Option<AffLevel>,
    #[serde(default)]
    pub weight_tax: u32,
    #[serde(default)]
    pub has_handcam: bool,
    #[serde(default)]
    pub has_outside_video: bool,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub is_request: bool,

    // ===== 教练 =====
    #[serde(default)]
    pub instructor_id: Option<String>,
    #[serde(default)]
    pub video_instructor_id: Option<String>,
    /// 主教练由规划器写入（非人工指定）
    #[serde(default)]
    pub main_auto_assigned: bool,
    /// 摄像教练由规划器写入
    #[serde(default)]
    pub video_auto_assigned: bool,
}

impl LoadAssignment {
    /// 从候机学员生成载次分配（指定教练首位作为主教练）
    pub fn from_queued(student: &QueuedStudent) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            student_weight: student.weight,
            jump_type: student.jump_type,
            aff_level: student.aff_level,
            weight_tax: student.weight_tax,
            has_handcam: student.has_handcam,
            has_outside_video: student.has_outside_video,
            group_id: student.group_id.clone(),
            is_request: student.is_request,
            instructor_id: if student.is_request {
                student.requested_instructor_ids.first().cloned()
            } else {
                None
            },
            video_instructor_id: None,
            main_auto_assigned: false,
            video_auto_assigned: false,
        }
    }

    /// 占用座位数
    pub fn seats(&self) -> u32 {
        SEATS_PER_STUDENT + u32::from(self.has_outside_video)
    }

    /// 锁定的指定分配（指定且主教练由人工设置）
    ///
    /// 规划器写回的主教练不构成锁定, 重复规划时照常参与分配
    pub fn is_locked_request(&self) -> bool {
        self.is_request && self.instructor_id.is_some() && !self.main_auto_assigned
    }

    /// 人工设置的摄像教练（规划器写入的不计）
    pub fn pinned_video(&self) -> Option<&str> {
        if self.video_auto_assigned {
            None
        } else {
            self.video_instructor_id.as_deref()
        }
    }

    /// 撤下教练的全部角色
    pub fn clear_instructor(&mut self, instructor_id: &str) {
        if self.instructor_id.as_deref() == Some(instructor_id) {
            self.instructor_id = None;
            self.main_auto_assigned = false;
        }
        if self.video_instructor_id.as_deref() == Some(instructor_id) {
            self.video_instructor_id = None;
            self.video_auto_assigned = false;
        }
    }

    /// 是否完整（主教练已设置，外部摄像已配摄像教练）
    pub fn is_complete(&self) -> bool {
        self.instructor_id.is_some()
            && (!self.has_outside_video || self.video_instructor_id.is_some())
    }

    /// 教练是否在此分配中担任任一角色
    pub fn involves(&self, instructor_id: &str) -> bool {
        self.instructor_id.as_deref() == Some(instructor_id)
            || self.video_instructor_id.as_deref() == Some(instructor_id)
    }
}

impl JumpRequirement for LoadAssignment {
    fn student_id(&self) -> &str {
        &self.student_id
    }

    fn jump_type(&self) -> JumpType {
        self.jump_type
    }

    fn student_weight(&self) -> u32 {
        self.student_weight
    }

    fn weight_tax(&self) -> u32 {
        self.weight_tax
    }

    fn needs_outside_video(&self) -> bool {
        self.has_outside_video
    }
}

// ==========================================
// Load - 载次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub id: String,
    pub aircraft_id: String,
    /// 排序键（按机型独立编号）
    pub position: u32,
    pub capacity: u32,
    pub status: LoadStatus,
    #[serde(default)]
    pub countdown_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub fun_jumpers: u32,
    #[serde(default)]
    pub assignments: Vec<LoadAssignment>,
}

impl Load {
    pub fn new(id: &str, aircraft_id: &str, position: u32, capacity: u32) -> Self {
        Self {
            id: id.to_string(),
            aircraft_id: aircraft_id.to_string(),
            position,
            capacity,
            status: LoadStatus::Building,
            countdown_started_at: None,
            fun_jumpers: 0,
            assignments: Vec::new(),
        }
    }

    // ==========================================
    // 座位
    // ==========================================

    /// 已占用座位
    pub fn occupied_seats(&self) -> u32 {
        self.assignments.iter().map(LoadAssignment::seats).sum::<u32>() + self.fun_jumpers
    }

    /// 剩余座位
    pub fn available_seats(&self) -> u32 {
        self.capacity.saturating_sub(self.occupied_seats())
    }

    // ==========================================
    // 教练角色查询
    // ==========================================

    /// 教练是否在本载次担任任一角色
    pub fn involves_instructor(&self, instructor_id: &str) -> bool {
        self.assignments.iter().any(|a| a.involves(instructor_id))
    }

    /// 本载次出现的全部教练ID（去重、保序）
    pub fn instructor_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for a in &self.assignments {
            for id in [&a.instructor_id, &a.video_instructor_id].into_iter().flatten() {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        ids
    }

    // ==========================================
    // 生命周期
    // ==========================================

    /// 状态转换
    ///
    /// # 规则
    /// - 进入 ready 时记录倒计时起点
    /// - 退回 building 时清除倒计时
    pub fn transition(&mut self, next: LoadStatus, now: DateTime<Utc>) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                load_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        if self.status == next {
            return Ok(());
        }
        match next {
            LoadStatus::Ready => self.countdown_started_at = Some(now),
            LoadStatus::Building => self.countdown_started_at = None,
            _ => {}
        }
        self.status = next;
        Ok(())
    }

    /// 学员入载
    pub fn add_student(&mut self, student: &QueuedStudent) -> DomainResult<&LoadAssignment> {
        if !self.status.is_editable() {
            return Err(DomainError::LoadNotEditable {
                load_id: self.id.clone(),
                status: self.status,
            });
        }
        let assignment = LoadAssignment::from_queued(student);
        let requested = assignment.seats();
        let occupied = self.occupied_seats();
        if occupied + requested > self.capacity {
            return Err(DomainError::CapacityExceeded {
                load_id: self.id.clone(),
                occupied,
                requested,
                capacity: self.capacity,
            });
        }
        self.assignments.push(assignment);
        Ok(&self.assignments[self.assignments.len() - 1])
    }

    /// 移除最后一名学员
    pub fn remove_last_student(&mut self) -> Option<LoadAssignment> {
        self.assignments.pop()
    }

    /// 完成载次，转为历史记录
    ///
    /// # 返回
    /// (历史记录列表, 未配主教练而未转换的学员ID)
    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<(Vec<Assignment>, Vec<String>)> {
        self.transition(LoadStatus::Completed, now)?;

        let mut records = Vec::new();
        let mut skipped = Vec::new();
        for a in &self.assignments {
            let Some(instructor_id) = a.instructor_id.clone() else {
                skipped.push(a.student_id.clone());
                continue;
            };
            records.push(Assignment {
                id: Uuid::new_v4().to_string(),
                load_id: Some(self.id.clone()),
                instructor_id,
                video_instructor_id: a.video_instructor_id.clone(),
                student_name: a.student_name.clone(),
                jump_type: a.jump_type,
                aff_level: a.aff_level,
                weight_tax: a.weight_tax,
                has_handcam: a.has_handcam,
                has_outside_video: a.has_outside_video,
                is_request: a.is_request,
                is_missed_jump: false,
                is_deleted: false,
                timestamp: now,
            });
        }
        Ok((records, skipped))
    }
}
