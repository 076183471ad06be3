use super::*;
use crate::config::{EngineConfig, SearchSettings};
use crate::domain::{Assignment, Instructor, JumpType, Load, LoadAssignment, Period, Team};
use chrono::{NaiveDate, TimeZone, Utc};
use std::collections::HashSet;

// ==========================================
// 测试辅助函数
// ==========================================

/// 2026-10-14 为周三（默认红队 mon-tue 轮休, 不影响蓝队）
fn wednesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

fn period() -> Period {
    Period::fortnight_containing(
        NaiveDate::from_ymd_opt(2026, 10, 5).unwrap(),
        Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap(),
    )
}

fn instructor(id: &str) -> Instructor {
    Instructor {
        id: id.to_string(),
        name: id.to_string(),
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
    }
}

fn aff_locked(id: &str, roster: &[&str]) -> Instructor {
    let mut i = instructor(id);
    i.aff_locked_students = roster.iter().map(|s| s.to_string()).collect();
    i
}

fn student(id: &str, jump_type: JumpType, weight: u32) -> LoadAssignment {
    LoadAssignment {
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
    }
}

/// 周期内的双人伞历史（每条计 40）
fn tandem_history(instructor_id: &str, count: usize) -> Vec<Assignment> {
    (0..count)
        .map(|n| Assignment {
            id: format!("H-{}-{}", instructor_id, n),
            load_id: None,
            instructor_id: instructor_id.to_string(),
            video_instructor_id: None,
            student_name: String::new(),
            jump_type: JumpType::Tandem,
            aff_level: None,
            weight_tax: 0,
            has_handcam: false,
            has_outside_video: false,
            is_request: false,
            is_missed_jump: false,
            is_deleted: false,
            timestamp: Utc.with_ymd_and_hms(2026, 10, 8, 10, 0, 0).unwrap(),
        })
        .collect()
}

fn target_with(students: Vec<LoadAssignment>) -> Load {
    let mut load = Load::new("L1", "KA", 1, 18);
    load.assignments = students;
    load
}

fn plan(load: &Load, instructors: &[Instructor], history: &[Assignment]) -> PlanResult {
    let loads = vec![load.clone()];
    let input = PlanningInput::for_load(load, &loads, instructors, history, period(), wednesday());
    AssignmentPlanner::new(&EngineConfig::default()).plan(&input)
}

fn assert_no_double_booking(map: &AssignmentMap) {
    let mut seen = HashSet::new();
    for pair in map.values() {
        assert!(seen.insert(pair.main.clone()), "double booked {}", pair.main);
        if let Some(v) = &pair.video {
            assert!(seen.insert(v.clone()), "double booked {}", v);
        }
    }
}

// ==========================================
// 排序规则
// ==========================================

#[test]
fn test_lowest_balance_wins() {
    let instructors = vec![instructor("A"), instructor("B")];
    let history = tandem_history("A", 2);
    let load = target_with(vec![student("S1", JumpType::Tandem, 170)]);

    let result = plan(&load, &instructors, &history);
    assert_eq!(result.assignments["S1"].main, "B");
    assert!(result.is_fully_solved());
}

#[test]
fn test_off_day_instructor_ranked_last() {
    let mut red = instructor("A");
    red.team = Team::Red;
    let instructors = vec![red, instructor("B")];
    // B 平衡分更高, 但 A 周一轮休
    let history = tandem_history("B", 3);
    let load = target_with(vec![student("S1", JumpType::Tandem, 170)]);
    let loads = vec![load.clone()];
    let monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();

    let input = PlanningInput::for_load(&load, &loads, &instructors, &history, period(), monday);
    let result = AssignmentPlanner::default().plan(&input);
    assert_eq!(result.assignments["S1"].main, "B");
}

#[test]
fn test_earlier_clock_in_breaks_balance_tie() {
    let mut a = instructor("A");
    a.clock_in_time = Some(Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap());
    let mut b = instructor("B");
    b.clock_in_time = Some(Utc.with_ymd_and_hms(2026, 10, 14, 8, 0, 0).unwrap());
    let c = instructor("C");
    let instructors = vec![c, a, b];
    let load = target_with(vec![
        student("S1", JumpType::Tandem, 170),
        student("S2", JumpType::Tandem, 170),
        student("S3", JumpType::Tandem, 170),
    ]);

    let result = plan(&load, &instructors, &[]);
    assert_eq!(result.assignments["S1"].main, "B");
    assert_eq!(result.assignments["S2"].main, "A");
    // 未记录打卡时间排最后
    assert_eq!(result.assignments["S3"].main, "C");
}

// ==========================================
// 指定分配
// ==========================================

#[test]
fn test_locked_request_is_never_overridden() {
    let instructors = vec![instructor("A"), instructor("B")];
    let mut requested = student("S2", JumpType::Tandem, 170);
    requested.is_request = true;
    requested.instructor_id = Some("A".to_string());
    let load = target_with(vec![student("S1", JumpType::Tandem, 170), requested]);
    // A 平衡分最低, 但已被 S2 指定
    let history = tandem_history("B", 1);

    let result = plan(&load, &instructors, &history);
    assert_eq!(result.assignments["S2"].main, "A");
    assert_eq!(result.assignments["S1"].main, "B");
    assert_eq!(result.stats.locked, 1);
}

#[test]
fn test_locked_request_keeps_preset_video() {
    let mut v = instructor("V");
    v.can_video = true;
    let mut w = instructor("W");
    w.can_video = true;
    let instructors = vec![instructor("A"), v, w];
    // W 平衡分更低, 但 V 已人工设置为摄像
    let history = tandem_history("V", 2);

    let mut requested = student("S1", JumpType::Tandem, 170);
    requested.is_request = true;
    requested.has_outside_video = true;
    requested.instructor_id = Some("A".to_string());
    requested.video_instructor_id = Some("V".to_string());
    let mut load = target_with(vec![requested]);

    let result = plan(&load, &instructors, &history);
    assert!(result.is_fully_solved(), "{:?}", result.errors);
    assert_eq!(result.assignments["S1"].main, "A");
    assert_eq!(result.assignments["S1"].video.as_deref(), Some("V"));
    assert_eq!(result.stats.video_repaired, 0);

    apply_to_load(&result.assignments, &mut load);
    let written = &load.assignments[0];
    assert_eq!(written.instructor_id.as_deref(), Some("A"));
    assert_eq!(written.video_instructor_id.as_deref(), Some("V"));
    assert!(!written.video_auto_assigned);
    assert!(written.is_locked_request());
}

#[test]
fn test_replanning_request_without_preset_main_is_idempotent() {
    // AFF 锁定名单: A -> S1,S2,S3  B -> S2,S3  C -> S1; 平衡分 A < B < C
    // S1 为指定但未设置主教练, 首轮经交换落在 C
    let instructors = vec![
        aff_locked("A", &["S1", "S2", "S3"]),
        aff_locked("B", &["S2", "S3"]),
        aff_locked("C", &["S1"]),
    ];
    let mut history = tandem_history("B", 1);
    history.extend(tandem_history("C", 2));

    let mut s1 = student("S1", JumpType::Aff, 170);
    s1.is_request = true;
    let mut load = target_with(vec![
        s1,
        student("S2", JumpType::Aff, 170),
        student("S3", JumpType::Aff, 170),
    ]);

    let first = plan(&load, &instructors, &history);
    assert_eq!(first.stats.locked, 0);
    assert_eq!(first.assignments["S1"].main, "C");
    assert_eq!(first.assignments["S2"].main, "B");
    assert_eq!(first.assignments["S3"].main, "A");

    apply_to_load(&first.assignments, &mut load);
    assert!(load.assignments[0].main_auto_assigned);
    assert!(!load.assignments[0].is_locked_request());

    let second = plan(&load, &instructors, &history);
    assert_eq!(second.stats.locked, 0);
    assert_eq!(first.assignments, second.assignments);
    assert_eq!(first.errors, second.errors);
}

#[test]
fn test_planner_written_video_on_locked_request_is_replanned() {
    let mut v = instructor("V");
    v.can_video = true;
    let mut w = instructor("W");
    w.can_video = true;
    let instructors = vec![instructor("A"), v, w];
    let history = tandem_history("V", 2);

    let mut requested = student("S1", JumpType::Tandem, 170);
    requested.is_request = true;
    requested.has_outside_video = true;
    requested.instructor_id = Some("A".to_string());
    let mut load = target_with(vec![requested]);

    let first = plan(&load, &instructors, &history);
    assert_eq!(first.assignments["S1"].video.as_deref(), Some("W"));
    apply_to_load(&first.assignments, &mut load);
    assert!(load.assignments[0].video_auto_assigned);
    assert!(load.assignments[0].pinned_video().is_none());

    // W 平衡分上升后, 规划器写入的摄像可被重新分配
    let mut heavier = history.clone();
    heavier.extend(tandem_history("W", 3));
    let second = plan(&load, &instructors, &heavier);
    assert_eq!(second.assignments["S1"].main, "A");
    assert_eq!(second.assignments["S1"].video.as_deref(), Some("V"));
}

// ==========================================
// 修复阶段
// ==========================================

#[test]
fn test_main_repair_swaps_holder_to_free_alternative() {
    // 贪心: S1=A, S2=B, S3 无空闲; 修复: S2 -> D, S3 = B
    let instructors = vec![
        aff_locked("A", &["S1", "S3"]),
        aff_locked("B", &["S1", "S2", "S3"]),
        aff_locked("D", &["S2"]),
    ];
    let mut history = tandem_history("B", 1);
    history.extend(tandem_history("D", 2));
    let load = target_with(vec![
        student("S1", JumpType::Aff, 170),
        student("S2", JumpType::Aff, 170),
        student("S3", JumpType::Aff, 170),
    ]);

    let result = plan(&load, &instructors, &history);
    assert!(result.is_fully_solved(), "{:?}", result.errors);
    assert_eq!(result.assignments["S1"].main, "A");
    assert_eq!(result.assignments["S2"].main, "D");
    assert_eq!(result.assignments["S3"].main, "B");
    assert_eq!(result.stats.main_repaired, 1);
    assert!(!result.stats.fallback_ran);
}

#[test]
fn test_video_repair_demotes_main_to_video() {
    // V: 唯一摄像; 贪心先给 S2 配 V 作主教练, S1 缺摄像
    let mut v = instructor("V");
    v.can_video = true;
    let mut a = instructor("A");
    a.can_aff = false;
    a.tandem_weight_limit = Some(300);
    let mut c = instructor("C");
    c.tandem_weight_limit = Some(300);
    let instructors = vec![v, a, c];

    let mut history = tandem_history("A", 1);
    history.extend(tandem_history("C", 2));

    let mut s1 = student("S1", JumpType::Tandem, 240);
    s1.has_outside_video = true;
    let load = target_with(vec![student("S2", JumpType::Aff, 170), s1]);

    let result = plan(&load, &instructors, &history);
    assert!(result.is_fully_solved(), "{:?}", result.errors);
    assert_eq!(result.assignments["S1"].main, "A");
    assert_eq!(result.assignments["S1"].video.as_deref(), Some("V"));
    assert_eq!(result.assignments["S2"].main, "C");
    assert_eq!(result.stats.video_repaired, 1);
    assert_no_double_booking(&result.assignments);
}

// ==========================================
// 无法分配
// ==========================================

#[test]
fn test_weight_exceeds_all_limits_reported() {
    let instructors = vec![instructor("A"), instructor("B")];
    let load = target_with(vec![student("S1", JumpType::Tandem, 260)]);

    let result = plan(&load, &instructors, &[]);
    assert!(result.assignments.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, AssignmentErrorKind::WeightExceedsAllLimits);
    assert!(result.errors[0].message.starts_with("WEIGHT_EXCEEDS_ALL_LIMITS"));
}

#[test]
fn test_more_students_than_staff_reports_committed() {
    let instructors = vec![instructor("A")];
    let load = target_with(vec![
        student("S1", JumpType::Tandem, 170),
        student("S2", JumpType::Tandem, 170),
    ]);

    let result = plan(&load, &instructors, &[]);
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, AssignmentErrorKind::AllQualifiedCommitted);
    assert!(result.stats.fallback_ran);
    assert!(!result.stats.fallback_solved);
}

#[test]
fn test_missing_video_reported_with_main_kept() {
    let instructors = vec![instructor("A"), instructor("B")];
    let mut s1 = student("S1", JumpType::Tandem, 170);
    s1.has_outside_video = true;
    let load = target_with(vec![s1]);

    let result = plan(&load, &instructors, &[]);
    assert_eq!(result.assignments["S1"].main, "A");
    assert!(result.assignments["S1"].video.is_none());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, AssignmentErrorKind::MissingVideo);
}

#[test]
fn test_cycle_time_excludes_recent_jumper() {
    let instructors = vec![instructor("A"), instructor("B")];
    let mut prior = Load::new("L0", "KA", 1, 18);
    let mut p = student("P1", JumpType::Tandem, 170);
    p.instructor_id = Some("A".to_string());
    prior.assignments.push(p);

    let mut target = Load::new("L1", "KA", 2, 18);
    target.assignments.push(student("S1", JumpType::Tandem, 170));
    let loads = vec![prior, target.clone()];

    // A 在上一载次, 间隔 20 < 40
    let input = PlanningInput::for_load(&target, &loads, &instructors, &[], period(), wednesday());
    let result = AssignmentPlanner::default().plan(&input);
    assert_eq!(result.assignments["S1"].main, "B");
    assert!(result.is_fully_solved());

    let only_a = vec![instructor("A")];
    let input = PlanningInput::for_load(&target, &loads, &only_a, &[], period(), wednesday());
    let result = AssignmentPlanner::default().plan(&input);
    assert!(result.assignments.is_empty());
    assert_eq!(result.errors[0].kind, AssignmentErrorKind::CycleTimeConflict);
}

#[test]
fn test_apply_to_load_keeps_locked_main() {
    let mut requested = student("S1", JumpType::Tandem, 170);
    requested.is_request = true;
    requested.instructor_id = Some("A".to_string());
    let mut stale = student("S2", JumpType::Tandem, 170);
    stale.instructor_id = Some("Z".to_string());
    let mut load = target_with(vec![requested, stale]);

    let mut map = AssignmentMap::new();
    map.insert("S1".to_string(), AssignmentPair::main_only("B"));

    apply_to_load(&map, &mut load);
    assert_eq!(load.assignments[0].instructor_id.as_deref(), Some("A"));
    assert!(load.assignments[1].instructor_id.is_none());
}

// ==========================================
// 回退超时
// ==========================================

#[test]
fn test_fallback_timeout_reported_distinctly() {
    let config = EngineConfig {
        search: SearchSettings {
            timeout_ms: 0,
            ..SearchSettings::default()
        },
        ..EngineConfig::default()
    };
    let instructors = vec![instructor("A")];
    let load = target_with(vec![
        student("S1", JumpType::Tandem, 170),
        student("S2", JumpType::Tandem, 170),
        student("S3", JumpType::Tandem, 170),
    ]);
    let loads = vec![load.clone()];
    let input = PlanningInput::for_load(&load, &loads, &instructors, &[], period(), wednesday());

    let result = AssignmentPlanner::new(&config).plan(&input);
    assert!(result.stats.fallback_ran);
    assert!(result.stats.fallback_timed_out);
    assert!(!result.stats.fallback_solved);
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.errors.len(), 2);
    for error in &result.errors {
        assert_eq!(error.kind, AssignmentErrorKind::SearchTimeout);
        assert!(error.message.starts_with("SEARCH_TIMEOUT"));
    }
}
