// ==========================================
// 跳伞场载次排班系统 - 载次优化 API
// ==========================================
// 职责: 载次自动分配、冲突审计、自动修复
// 流程: 重新读取快照 -> 阻塞线程运行规划器 -> 按版本号乐观提交
// 红线: 规划器不持有存储; 并发写入由存储的版本号仲裁
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::config::EngineConfigReader;
use crate::domain::{DomainError, Load};
use crate::engine::conflict::{AutoFix, Conflict, ConflictDetector};
use crate::engine::planner::{AssignmentPlanner, PlanResult, PlanningInput};
use crate::repository::{LoadStore, PlanningSnapshot};

// ==========================================
// 返回类型
// ==========================================

/// 优化结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeOutcome {
    pub load_id: String,
    pub plan: PlanResult,
    /// 提交后的版本号
    pub revision: u64,
}

/// 自动修复结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoFixOutcome {
    pub load_id: String,
    pub fix: AutoFix,
    /// false = 状态已满足, 未做任何修改
    pub applied: bool,
    pub revision: u64,
    /// 修复动作触发重新规划时的规划结果
    pub plan: Option<PlanResult>,
}

/// 对快照的目标载次运行规划器
pub fn plan_snapshot(planner: &AssignmentPlanner, snapshot: &PlanningSnapshot) -> ApiResult<PlanResult> {
    let target = target_load(snapshot)?;
    let input = PlanningInput::for_load(
        target,
        &snapshot.loads,
        &snapshot.instructors,
        &snapshot.history,
        snapshot.period,
        snapshot.today,
    );
    Ok(planner.plan(&input))
}

fn target_load(snapshot: &PlanningSnapshot) -> ApiResult<&Load> {
    snapshot.target_load().ok_or_else(|| {
        ApiError::NotFound(format!("Load(id={})不存在", snapshot.target_load_id))
    })
}

fn ensure_editable(load: &Load) -> ApiResult<()> {
    if load.status.is_editable() {
        Ok(())
    } else {
        Err(DomainError::LoadNotEditable {
            load_id: load.id.clone(),
            status: load.status,
        }
        .into())
    }
}

// ==========================================
// LoadOptimizeApi - 载次优化 API
// ==========================================
pub struct LoadOptimizeApi {
    store: Arc<dyn LoadStore>,
    config: Arc<dyn EngineConfigReader>,
}

impl LoadOptimizeApi {
    pub fn new(store: Arc<dyn LoadStore>, config: Arc<dyn EngineConfigReader>) -> Self {
        Self { store, config }
    }

    /// 自动分配载次
    ///
    /// # 返回
    /// - Ok(OptimizeOutcome): 规划结果 + 新版本号（存在无法分配的学员时同样提交）
    /// - Err(OptimisticLockFailure): 规划期间载次被其他操作修改
    #[instrument(skip(self), fields(load_id = %load_id))]
    pub async fn optimize_load(&self, load_id: &str) -> ApiResult<OptimizeOutcome> {
        let snapshot = self.store.snapshot(load_id).await?;
        ensure_editable(target_load(&snapshot)?)?;
        let expected_revision = snapshot.revision;

        let planner = AssignmentPlanner::from_reader(self.config.as_ref());
        let plan = tokio::task::spawn_blocking(move || plan_snapshot(&planner, &snapshot)).await??;

        let revision = self
            .store
            .commit_assignments(load_id, expected_revision, &plan.assignments)
            .await?;

        info!(
            revision,
            assigned = plan.assignments.len(),
            errors = plan.errors.len(),
            "载次自动分配已提交"
        );
        Ok(OptimizeOutcome {
            load_id: load_id.to_string(),
            plan,
            revision,
        })
    }

    /// 审计载次冲突（只读）
    #[instrument(skip(self), fields(load_id = %load_id))]
    pub async fn audit_load(&self, load_id: &str) -> ApiResult<Vec<Conflict>> {
        let snapshot = self.store.snapshot(load_id).await?;
        let target = target_load(&snapshot)?;

        let detector = ConflictDetector::new(self.config.scheduling(), self.config.conflicts());
        Ok(detector.detect(target, &snapshot.loads, &snapshot.instructors))
    }

    /// 执行自动修复
    ///
    /// # 规则
    /// - RemoveLastStudent: 仅在超出容量时移除
    /// - UnassignInstructor: 教练不在本载次时为空操作
    /// - AutoAssignRemaining / AssignVideoInstructor: 重新规划（幂等）
    #[instrument(skip(self), fields(load_id = %load_id, fix = %fix.as_str()))]
    pub async fn apply_auto_fix(&self, load_id: &str, fix: &AutoFix) -> ApiResult<AutoFixOutcome> {
        match fix {
            AutoFix::AutoAssignRemaining | AutoFix::AssignVideoInstructor => {
                let outcome = self.optimize_load(load_id).await?;
                Ok(AutoFixOutcome {
                    load_id: load_id.to_string(),
                    fix: fix.clone(),
                    applied: true,
                    revision: outcome.revision,
                    plan: Some(outcome.plan),
                })
            }
            AutoFix::RemoveLastStudent => {
                let snapshot = self.store.snapshot(load_id).await?;
                let mut load = target_load(&snapshot)?.clone();
                if load.occupied_seats() <= load.capacity {
                    return Ok(self.unchanged(load_id, fix, snapshot.revision));
                }
                ensure_editable(&load)?;
                if let Some(removed) = load.remove_last_student() {
                    warn!(student_id = %removed.student_id, "超出容量, 移除最后一名学员");
                }
                let revision = self.store.commit_load(load, snapshot.revision).await?;
                Ok(self.changed(load_id, fix, revision))
            }
            AutoFix::UnassignInstructor(instructor_id) => {
                let snapshot = self.store.snapshot(load_id).await?;
                let mut load = target_load(&snapshot)?.clone();
                if !load.involves_instructor(instructor_id) {
                    return Ok(self.unchanged(load_id, fix, snapshot.revision));
                }
                ensure_editable(&load)?;
                for a in load.assignments.iter_mut() {
                    a.clear_instructor(instructor_id);
                }
                let revision = self.store.commit_load(load, snapshot.revision).await?;
                info!(instructor_id = %instructor_id, revision, "教练已从载次撤下");
                Ok(self.changed(load_id, fix, revision))
            }
        }
    }

    fn unchanged(&self, load_id: &str, fix: &AutoFix, revision: u64) -> AutoFixOutcome {
        AutoFixOutcome {
            load_id: load_id.to_string(),
            fix: fix.clone(),
            applied: false,
            revision,
            plan: None,
        }
    }

    fn changed(&self, load_id: &str, fix: &AutoFix, revision: u64) -> AutoFixOutcome {
        AutoFixOutcome {
            applied: true,
            ..self.unchanged(load_id, fix, revision)
        }
    }
}
