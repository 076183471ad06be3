// ==========================================
// 跳伞场载次排班系统 - 规划阶段
// ==========================================
// 阶段严格有序, 每阶段读取上一阶段的分配表并产出新表
// 1) 锁定指定 2) 约束优先贪心 3) 主教练修复 4) 摄像修复
// 红线: 锁定指定的主教练在任何阶段都不被替换
// ==========================================

use tracing::{debug, warn};

use super::context::PlanContext;
use super::types::{main_holder, used_instructors, AssignmentMap, AssignmentPair};
use crate::domain::LoadAssignment;

// ==========================================
// 阶段1: 锁定指定
// ==========================================

/// 指定且人工设置主教练的学员原样接收（含人工设置的摄像）
pub(super) fn lock_requests(ctx: &PlanContext<'_>) -> AssignmentMap {
    let mut map = AssignmentMap::new();
    for s in ctx.students.iter().filter(|s| s.is_locked_request()) {
        let Some(main) = s.instructor_id.clone() else {
            continue;
        };
        if map.values().any(|p| p.main == main || p.video.as_deref() == Some(main.as_str())) {
            warn!(student_id = %s.student_id, instructor_id = %main, "指定教练已被其他指定占用");
        }
        map.insert(
            s.student_id.clone(),
            AssignmentPair {
                main,
                video: s.pinned_video().map(str::to_string),
            },
        );
    }
    debug!(locked = map.len(), "阶段1 锁定指定完成");
    map
}

// ==========================================
// 阶段2: 约束优先贪心
// ==========================================

/// 按合格教练数升序逐个选取最优空闲教练
///
/// # 返回
/// (新分配表, 本阶段分配的学员数)
pub(super) fn greedy(
    ctx: &PlanContext<'_>,
    order: &[&LoadAssignment],
    previous: &AssignmentMap,
) -> (AssignmentMap, usize) {
    let mut map = previous.clone();
    let mut assigned = 0usize;

    for s in order {
        if map.contains_key(&s.student_id) {
            continue;
        }
        let mut used = used_instructors(&map);
        let Some(main) = ctx.best_free_main(s, &used) else {
            debug!(student_id = %s.student_id, "贪心阶段无空闲合格教练");
            continue;
        };
        used.insert(main.id.clone());

        let video = if s.has_outside_video {
            ctx.best_free_video(s, &used).map(|v| v.id.clone())
        } else {
            None
        };

        map.insert(
            s.student_id.clone(),
            AssignmentPair {
                main: main.id.clone(),
                video,
            },
        );
        assigned += 1;
    }

    debug!(assigned, "阶段2 贪心分配完成");
    (map, assigned)
}

// ==========================================
// 阶段3: 主教练修复
// ==========================================

/// 为无主教练的学员补位
///
/// # 规则
/// 按排序遍历合格教练:
/// - 空闲: 直接分配
/// - 为其他非锁定学员的主教练, 且该学员另有空闲合格教练: 交换（被换学员保留摄像）
pub(super) fn repair_main(
    ctx: &PlanContext<'_>,
    order: &[&LoadAssignment],
    previous: &AssignmentMap,
) -> (AssignmentMap, usize) {
    let mut map = previous.clone();
    let mut repaired = 0usize;

    for s in order {
        if map.contains_key(&s.student_id) {
            continue;
        }
        let used = used_instructors(&map);

        for candidate in ctx.qualified_main(s) {
            if !used.contains(&candidate.id) {
                map.insert(s.student_id.clone(), AssignmentPair::main_only(&candidate.id));
                repaired += 1;
                break;
            }

            let Some(holder_id) = main_holder(&map, &candidate.id).map(str::to_string) else {
                continue;
            };
            if ctx.is_locked(&holder_id) {
                continue;
            }
            let Some(holder) = ctx.student(&holder_id) else {
                continue;
            };
            let Some(alternative) = ctx.best_free_main(holder, &used) else {
                continue;
            };

            debug!(
                student_id = %s.student_id,
                displaced = %holder_id,
                instructor_id = %candidate.id,
                alternative = %alternative.id,
                "主教练交换"
            );
            if let Some(pair) = map.get_mut(&holder_id) {
                pair.main = alternative.id.clone();
            }
            map.insert(s.student_id.clone(), AssignmentPair::main_only(&candidate.id));
            repaired += 1;
            break;
        }
    }

    debug!(repaired, "阶段3 主教练修复完成");
    (map, repaired)
}

// ==========================================
// 阶段4: 摄像修复
// ==========================================

/// 为缺少摄像的学员补位
///
/// # 规则
/// 按排序遍历摄像合格教练:
/// - 空闲: 直接分配
/// - 为其他非锁定学员的主教练, 且该学员另有空闲主教练: 降为此处摄像, 替补升为彼处主教练
pub(super) fn repair_video(
    ctx: &PlanContext<'_>,
    previous: &AssignmentMap,
) -> (AssignmentMap, usize) {
    let mut map = previous.clone();
    let mut repaired = 0usize;

    for s in ctx.students.iter().filter(|s| s.has_outside_video) {
        let main = match map.get(&s.student_id) {
            Some(pair) if pair.video.is_none() => pair.main.clone(),
            _ => continue,
        };
        let used = used_instructors(&map);

        for candidate in ctx.qualified_video(s) {
            if candidate.id == main {
                continue;
            }
            if !used.contains(&candidate.id) {
                if let Some(pair) = map.get_mut(&s.student_id) {
                    pair.video = Some(candidate.id.clone());
                }
                repaired += 1;
                break;
            }

            let Some(holder_id) = main_holder(&map, &candidate.id).map(str::to_string) else {
                continue;
            };
            if ctx.is_locked(&holder_id) {
                continue;
            }
            let Some(holder) = ctx.student(&holder_id) else {
                continue;
            };
            let Some(alternative) = ctx.best_free_main(holder, &used) else {
                continue;
            };

            debug!(
                student_id = %s.student_id,
                instructor_id = %candidate.id,
                promoted = %alternative.id,
                "主教练降为摄像"
            );
            if let Some(pair) = map.get_mut(&holder_id) {
                pair.main = alternative.id.clone();
            }
            if let Some(pair) = map.get_mut(&s.student_id) {
                pair.video = Some(candidate.id.clone());
            }
            repaired += 1;
            break;
        }
    }

    debug!(repaired, "阶段4 摄像修复完成");
    (map, repaired)
}
