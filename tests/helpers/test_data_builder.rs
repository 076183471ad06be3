// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use dz_load_planner::domain::{
    AffLevel, Assignment, Instructor, JumpType, Load, LoadAssignment, LoadStatus, Period, Team,
    WeightBand,
};

// ==========================================
// 日期
// ==========================================

/// 周期锚点（周一）
pub fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 5).unwrap()
}

/// 2026-10-12 周一
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 12).unwrap()
}

/// 2026-10-14 周三
pub fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

/// 当天中午
pub fn noon(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
}

/// 包含测试日期的两周周期 (2026-10-05 ~ 2026-10-18)
pub fn fortnight() -> Period {
    Period::fortnight_containing(anchor(), noon(wednesday()))
}

// ==========================================
// Instructor 构建器
// ==========================================

pub struct InstructorBuilder {
    instructor: Instructor,
}

impl InstructorBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            instructor: Instructor {
                id: id.to_string(),
                name: format!("Instructor {}", id),
                can_tandem: true,
                can_aff: true,
                can_video: false,
                tandem_weight_limit: Some(230),
                aff_weight_limit: None,
                body_weight: 180,
                clocked_in: true,
                clock_in_time: None,
                team: Team::Blue,
                aircraft_ids: None,
                aff_locked_students: vec![],
                video_weight_band: None,
                archived: false,
            },
        }
    }

    pub fn team(mut self, team: Team) -> Self {
        self.instructor.team = team;
        self
    }

    pub fn video(mut self) -> Self {
        self.instructor.can_video = true;
        self
    }

    pub fn video_only(mut self) -> Self {
        self.instructor.can_video = true;
        self.instructor.can_tandem = false;
        self.instructor.can_aff = false;
        self
    }

    pub fn video_band(mut self, min_lbs: u32, max_lbs: u32) -> Self {
        self.instructor.video_weight_band = Some(WeightBand { min_lbs, max_lbs });
        self
    }

    pub fn tandem_limit(mut self, limit: u32) -> Self {
        self.instructor.tandem_weight_limit = Some(limit);
        self
    }

    pub fn aff_locked(mut self, students: &[&str]) -> Self {
        self.instructor.aff_locked_students = students.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn clocked_out(mut self) -> Self {
        self.instructor.clocked_in = false;
        self
    }

    pub fn clock_in(mut self, at: DateTime<Utc>) -> Self {
        self.instructor.clock_in_time = Some(at);
        self
    }

    pub fn aircraft(mut self, aircraft_ids: &[&str]) -> Self {
        self.instructor.aircraft_ids = Some(aircraft_ids.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn build(self) -> Instructor {
        self.instructor
    }
}

// ==========================================
// LoadAssignment 构建器
// ==========================================

pub struct StudentBuilder {
    assignment: LoadAssignment,
}

impl StudentBuilder {
    fn new(id: &str, jump_type: JumpType, weight: u32) -> Self {
        Self {
            assignment: LoadAssignment {
                id: format!("LA-{}", id),
                student_id: id.to_string(),
                student_name: format!("Student {}", id),
                student_weight: weight,
                jump_type,
                aff_level: None,
                weight_tax: 0,
                has_handcam: false,
                has_outside_video: false,
                group_id: None,
                is_request: false,
                instructor_id: None,
                video_instructor_id: None,
                main_auto_assigned: false,
                video_auto_assigned: false,
            },
        }
    }

    pub fn tandem(id: &str, weight: u32) -> Self {
        Self::new(id, JumpType::Tandem, weight)
    }

    pub fn aff(id: &str, weight: u32) -> Self {
        let mut b = Self::new(id, JumpType::Aff, weight);
        b.assignment.aff_level = Some(AffLevel::Lower);
        b
    }

    pub fn outside_video(mut self) -> Self {
        self.assignment.has_outside_video = true;
        self
    }

    pub fn weight_tax(mut self, tax: u32) -> Self {
        self.assignment.weight_tax = tax;
        self
    }

    pub fn request(mut self, instructor_id: &str) -> Self {
        self.assignment.is_request = true;
        self.assignment.instructor_id = Some(instructor_id.to_string());
        self
    }

    /// 人工设置的外部摄像教练
    pub fn video_instructor(mut self, instructor_id: &str) -> Self {
        self.assignment.has_outside_video = true;
        self.assignment.video_instructor_id = Some(instructor_id.to_string());
        self
    }

    /// 仅标记为指定（未设置主教练）
    pub fn requested(mut self) -> Self {
        self.assignment.is_request = true;
        self
    }

    pub fn main(mut self, instructor_id: &str) -> Self {
        self.assignment.instructor_id = Some(instructor_id.to_string());
        self
    }

    pub fn build(self) -> LoadAssignment {
        self.assignment
    }
}

// ==========================================
// Load 构建
// ==========================================

pub fn load(id: &str, aircraft_id: &str, position: u32, students: Vec<LoadAssignment>) -> Load {
    let mut l = Load::new(id, aircraft_id, position, 18);
    l.assignments = students;
    l
}

pub fn load_with_status(
    id: &str,
    position: u32,
    status: LoadStatus,
    students: Vec<LoadAssignment>,
) -> Load {
    let mut l = load(id, "KA", position, students);
    l.status = status;
    l
}

// ==========================================
// 历史记录构建器
// ==========================================

pub struct HistoryBuilder {
    record: Assignment,
}

impl HistoryBuilder {
    pub fn tandem(instructor_id: &str, date: NaiveDate) -> Self {
        Self {
            record: Assignment {
                id: format!("H-{}-{}", instructor_id, date),
                load_id: None,
                instructor_id: instructor_id.to_string(),
                video_instructor_id: None,
                student_name: "History Student".to_string(),
                jump_type: JumpType::Tandem,
                aff_level: None,
                weight_tax: 0,
                has_handcam: false,
                has_outside_video: false,
                is_request: false,
                is_missed_jump: false,
                is_deleted: false,
                timestamp: noon(date),
            },
        }
    }

    pub fn aff(instructor_id: &str, date: NaiveDate, level: AffLevel) -> Self {
        let mut b = Self::tandem(instructor_id, date);
        b.record.jump_type = JumpType::Aff;
        b.record.aff_level = Some(level);
        b
    }

    pub fn video_by(mut self, video_instructor_id: &str) -> Self {
        self.record.has_outside_video = true;
        self.record.video_instructor_id = Some(video_instructor_id.to_string());
        self
    }

    pub fn request(mut self) -> Self {
        self.record.is_request = true;
        self
    }

    pub fn missed(mut self) -> Self {
        self.record.is_missed_jump = true;
        self
    }

    pub fn handcam(mut self) -> Self {
        self.record.has_handcam = true;
        self
    }

    pub fn build(self) -> Assignment {
        self.record
    }
}

/// 同一天 n 条双人伞记录（每条计 40）
pub fn tandem_records(instructor_id: &str, count: usize) -> Vec<Assignment> {
    (0..count)
        .map(|n| {
            let mut r = HistoryBuilder::tandem(instructor_id, wednesday()).build();
            r.id = format!("H-{}-{}", instructor_id, n);
            r
        })
        .collect()
}
