use super::*;
use crate::config::{ConflictSettings, LoadSchedulingSettings};
use crate::domain::{Instructor, JumpType, Load, LoadAssignment, LoadStatus, Team, WeightBand};

// ==========================================
// 测试辅助函数
// ==========================================

fn instructor(id: &str) -> Instructor {
    Instructor {
        id: id.to_string(),
        name: id.to_string(),
        can_tandem: true,
        can_aff: true,
        can_video: true,
        tandem_weight_limit: Some(230),
        aff_weight_limit: Some(250),
        body_weight: 180,
        clocked_in: true,
        clock_in_time: None,
        team: Team::Blue,
        aircraft_ids: None,
        aff_locked_students: vec![],
        video_weight_band: None,
        archived: false,
    }
}

fn assignment(student_id: &str, main: Option<&str>) -> LoadAssignment {
    LoadAssignment {
        id: format!("LA-{}", student_id),
        student_id: student_id.to_string(),
        student_name: student_id.to_string(),
        student_weight: 170,
        jump_type: JumpType::Tandem,
        aff_level: None,
        weight_tax: 0,
        has_handcam: false,
        has_outside_video: false,
        group_id: None,
        is_request: false,
        instructor_id: main.map(str::to_string),
        video_instructor_id: None,
        main_auto_assigned: false,
        video_auto_assigned: false,
    }
}

fn load(id: &str, position: u32, assignments: Vec<LoadAssignment>) -> Load {
    let mut l = Load::new(id, "KA", position, 18);
    l.assignments = assignments;
    l
}

fn detector() -> ConflictDetector {
    ConflictDetector::default()
}

fn kinds(conflicts: &[Conflict]) -> Vec<ConflictKind> {
    conflicts.iter().map(|c| c.kind).collect()
}

// ==========================================
// 容量
// ==========================================

#[test]
fn test_capacity_within_limit_has_no_conflict() {
    // 3 名学员 (6 座) + 1 名散跳者 = 7 座 / 18
    let mut l = load(
        "L1",
        1,
        vec![assignment("S1", Some("A")), assignment("S2", Some("B")), assignment("S3", Some("C"))],
    );
    l.fun_jumpers = 1;
    let instructors = vec![instructor("A"), instructor("B"), instructor("C")];

    let conflicts = detector().detect(&l, &[l.clone()], &instructors);
    assert!(!kinds(&conflicts).contains(&ConflictKind::CapacityExceeded));
    assert!(!kinds(&conflicts).contains(&ConflictKind::CapacityAtLimit));
}

#[test]
fn test_capacity_at_limit_is_info_and_over_is_error() {
    let mut l = load("L1", 1, vec![assignment("S1", Some("A"))]);
    l.fun_jumpers = 16;
    let instructors = vec![instructor("A")];

    let conflicts = detector().detect(&l, &[l.clone()], &instructors);
    let at_limit: Vec<_> = conflicts
        .iter()
        .filter(|c| c.kind == ConflictKind::CapacityAtLimit)
        .collect();
    assert_eq!(at_limit.len(), 1);
    assert_eq!(at_limit[0].severity, Severity::Info);

    l.fun_jumpers = 17;
    let conflicts = detector().detect(&l, &[l.clone()], &instructors);
    assert_eq!(conflicts[0].kind, ConflictKind::CapacityExceeded);
    assert_eq!(conflicts[0].severity, Severity::Error);
    assert_eq!(conflicts[0].auto_fix, Some(AutoFix::RemoveLastStudent));
}

// ==========================================
// 未分配
// ==========================================

#[test]
fn test_unassigned_on_ready_load_is_error() {
    let mut l = load("L1", 1, vec![assignment("S1", None)]);
    l.status = LoadStatus::Ready;

    let conflicts = detector().detect(&l, &[l.clone()], &[]);
    assert_eq!(conflicts[0].kind, ConflictKind::UnassignedStudent);
    assert_eq!(conflicts[0].severity, Severity::Error);
    assert_eq!(conflicts[0].auto_fix, Some(AutoFix::AutoAssignRemaining));

    l.status = LoadStatus::Building;
    let conflicts = detector().detect(&l, &[l.clone()], &[]);
    assert_eq!(conflicts[0].severity, Severity::Info);
}

// ==========================================
// 疲劳与周转
// ==========================================

#[test]
fn test_fatigue_after_four_consecutive_loads() {
    let loads: Vec<Load> = (1..=4)
        .map(|p| load(&format!("L{}", p), p, vec![assignment(&format!("S{}", p), Some("A"))]))
        .collect();
    let settings = LoadSchedulingSettings {
        instructor_cycle_time_minutes: 0,
        ..LoadSchedulingSettings::default()
    };
    let detector = ConflictDetector::new(settings, ConflictSettings::default());

    let conflicts = detector.detect(&loads[3], &loads, &[instructor("A")]);
    let fatigue: Vec<_> = conflicts
        .iter()
        .filter(|c| c.kind == ConflictKind::ConsecutiveLoadFatigue)
        .collect();
    assert_eq!(fatigue.len(), 1);
    assert_eq!(fatigue[0].entity_ids, vec!["A", "L1", "L2", "L3", "L4"]);

    // 三连不触发
    let conflicts = detector.detect(&loads[2], &loads[..3], &[instructor("A")]);
    assert!(!kinds(&conflicts).contains(&ConflictKind::ConsecutiveLoadFatigue));
}

#[test]
fn test_cycle_time_violation_names_prior_load() {
    let prior = load("L1", 1, vec![assignment("S1", Some("A"))]);
    let target = load("L2", 2, vec![assignment("S2", Some("A"))]);
    let loads = vec![prior, target.clone()];

    let conflicts = detector().detect(&target, &loads, &[instructor("A")]);
    let cycle: Vec<_> = conflicts
        .iter()
        .filter(|c| c.kind == ConflictKind::CycleTimeViolation)
        .collect();
    assert_eq!(cycle.len(), 1);
    assert_eq!(cycle[0].severity, Severity::Warning);
    assert!(cycle[0].message.contains("20"));
    assert_eq!(cycle[0].auto_fix, Some(AutoFix::UnassignInstructor("A".to_string())));
}

// ==========================================
// 教练状态
// ==========================================

#[test]
fn test_weight_and_clock_conflicts() {
    let mut heavy = assignment("S1", Some("A"));
    heavy.student_weight = 220;
    heavy.weight_tax = 20;
    let mut a = instructor("A");
    a.clocked_in = false;
    let l = load("L1", 1, vec![heavy]);

    let conflicts = detector().detect(&l, &[l.clone()], &[a]);
    let k = kinds(&conflicts);
    assert!(k.contains(&ConflictKind::WeightLimitExceeded));
    assert!(k.contains(&ConflictKind::ClockedOutAssigned));
    assert!(conflicts.iter().all(|c| c.severity != Severity::Error));
}

#[test]
fn test_video_checks() {
    let mut needs_video = assignment("S1", Some("A"));
    needs_video.has_outside_video = true;
    let mut dup = assignment("S2", Some("B"));
    dup.has_outside_video = true;
    dup.video_instructor_id = Some("A".to_string());
    let mut v = instructor("A");
    v.video_weight_band = Some(WeightBand { min_lbs: 300, max_lbs: 340 });
    let l = load("L1", 1, vec![needs_video, dup]);

    let conflicts = detector().detect(&l, &[l.clone()], &[v, instructor("B")]);
    let k = kinds(&conflicts);
    assert!(k.contains(&ConflictKind::MissingVideoInstructor));
    assert!(k.contains(&ConflictKind::DuplicateRole));
    // 180 + 170 = 350 > 340
    assert!(k.contains(&ConflictKind::VideoWeightBand));
}

#[test]
fn test_sorted_by_severity() {
    let mut l = load("L1", 1, vec![assignment("S1", None), assignment("S2", Some("A"))]);
    l.fun_jumpers = 14;
    l.status = LoadStatus::Ready;
    let mut a = instructor("A");
    a.clocked_in = false;

    let conflicts = detector().detect(&l, &[l.clone()], &[a]);
    let severities: Vec<Severity> = conflicts.iter().map(|c| c.severity).collect();
    let mut sorted = severities.clone();
    sorted.sort();
    assert_eq!(severities, sorted);
    assert_eq!(severities[0], Severity::Error);
}

#[test]
fn test_auto_fix_ids() {
    assert_eq!(AutoFix::RemoveLastStudent.as_str(), "remove_last_student");
    assert_eq!(AutoFix::UnassignInstructor("A".into()).as_str(), "unassign_instructor");
}
