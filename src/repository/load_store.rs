// ==========================================
// 跳伞场载次排班系统 - 载次存储 Trait 与内存实现
// ==========================================
// 职责: 提供规划快照读取 + 单载次乐观并发提交
// 红线: Repository 不含业务规则, 只做读取/版本校验/写入
// ==========================================
// 并发: 每个载次独立 revision; 提交时 expected_revision 不一致即拒绝
// ==========================================

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::error::{RepositoryError, RepositoryResult};
use crate::domain::{Assignment, Instructor, Load, Period, QueuedStudent};
use crate::engine::planner::{apply_to_load, AssignmentMap};

// ==========================================
// PlanningSnapshot - 规划快照
// ==========================================
// 用途: 规划/审计所需的全部输入（一次读取, 引擎只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningSnapshot {
    pub target_load_id: String,
    /// 目标载次的版本号
    #[serde(default)]
    pub revision: u64,
    pub loads: Vec<Load>,
    pub instructors: Vec<Instructor>,
    #[serde(default)]
    pub history: Vec<Assignment>,
    #[serde(default)]
    pub queue: Vec<QueuedStudent>,
    pub period: Period,
    pub today: NaiveDate,
}

impl PlanningSnapshot {
    pub fn target_load(&self) -> Option<&Load> {
        self.loads.iter().find(|l| l.id == self.target_load_id)
    }
}

// ==========================================
// LoadStore Trait
// ==========================================
// 实现者: InMemoryLoadStore
#[async_trait]
pub trait LoadStore: Send + Sync {
    /// 读取以 load_id 为目标的规划快照
    async fn snapshot(&self, load_id: &str) -> RepositoryResult<PlanningSnapshot>;

    /// 按分配表写回载次（乐观并发）
    ///
    /// # 返回
    /// - Ok(u64): 新版本号
    /// - Err(OptimisticLockFailure): 版本号不匹配
    async fn commit_assignments(
        &self,
        load_id: &str,
        expected_revision: u64,
        map: &AssignmentMap,
    ) -> RepositoryResult<u64>;

    /// 整体替换载次（乐观并发）
    async fn commit_load(&self, load: Load, expected_revision: u64) -> RepositoryResult<u64>;
}

// ==========================================
// InMemoryLoadStore - 内存实现
// ==========================================

#[derive(Debug)]
struct StoreState {
    loads: Vec<Load>,
    revisions: HashMap<String, u64>,
    instructors: Vec<Instructor>,
    history: Vec<Assignment>,
    queue: Vec<QueuedStudent>,
    period: Period,
    today: NaiveDate,
}

impl StoreState {
    fn load_index(&self, load_id: &str) -> RepositoryResult<usize> {
        self.loads
            .iter()
            .position(|l| l.id == load_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Load".to_string(),
                id: load_id.to_string(),
            })
    }

    fn check_revision(&self, load_id: &str, expected: u64) -> RepositoryResult<()> {
        let actual = self.revisions.get(load_id).copied().unwrap_or(0);
        if actual != expected {
            return Err(RepositoryError::OptimisticLockFailure {
                load_id: load_id.to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn bump(&mut self, load_id: &str) -> u64 {
        let revision = self.revisions.entry(load_id.to_string()).or_insert(0);
        *revision += 1;
        *revision
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryLoadStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryLoadStore {
    pub fn new(
        loads: Vec<Load>,
        instructors: Vec<Instructor>,
        history: Vec<Assignment>,
        period: Period,
        today: NaiveDate,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState {
                loads,
                revisions: HashMap::new(),
                instructors,
                history,
                queue: Vec::new(),
                period,
                today,
            })),
        }
    }

    /// 从快照构建（目标载次沿用快照的版本号）
    pub fn from_snapshot(snapshot: PlanningSnapshot) -> Self {
        let mut revisions = HashMap::new();
        revisions.insert(snapshot.target_load_id.clone(), snapshot.revision);
        Self {
            state: Arc::new(Mutex::new(StoreState {
                loads: snapshot.loads,
                revisions,
                instructors: snapshot.instructors,
                history: snapshot.history,
                queue: snapshot.queue,
                period: snapshot.period,
                today: snapshot.today,
            })),
        }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 当前版本号
    pub fn revision(&self, load_id: &str) -> RepositoryResult<u64> {
        let state = self.lock()?;
        state.load_index(load_id)?;
        Ok(state.revisions.get(load_id).copied().unwrap_or(0))
    }

    /// 读取单个载次
    pub fn load(&self, load_id: &str) -> RepositoryResult<Load> {
        let state = self.lock()?;
        let index = state.load_index(load_id)?;
        Ok(state.loads[index].clone())
    }

    /// 替换教练名册（打卡变化等）
    pub fn replace_instructors(&self, instructors: Vec<Instructor>) -> RepositoryResult<()> {
        self.lock()?.instructors = instructors;
        Ok(())
    }

    /// 追加历史记录（载次完成后）
    pub fn append_history(&self, records: Vec<Assignment>) -> RepositoryResult<()> {
        self.lock()?.history.extend(records);
        Ok(())
    }

    pub fn set_queue(&self, queue: Vec<QueuedStudent>) -> RepositoryResult<()> {
        self.lock()?.queue = queue;
        Ok(())
    }
}

#[async_trait]
impl LoadStore for InMemoryLoadStore {
    async fn snapshot(&self, load_id: &str) -> RepositoryResult<PlanningSnapshot> {
        let state = self.lock()?;
        state.load_index(load_id)?;
        Ok(PlanningSnapshot {
            target_load_id: load_id.to_string(),
            revision: state.revisions.get(load_id).copied().unwrap_or(0),
            loads: state.loads.clone(),
            instructors: state.instructors.clone(),
            history: state.history.clone(),
            queue: state.queue.clone(),
            period: state.period,
            today: state.today,
        })
    }

    async fn commit_assignments(
        &self,
        load_id: &str,
        expected_revision: u64,
        map: &AssignmentMap,
    ) -> RepositoryResult<u64> {
        let mut state = self.lock()?;
        let index = state.load_index(load_id)?;
        state.check_revision(load_id, expected_revision)?;

        apply_to_load(map, &mut state.loads[index]);
        let revision = state.bump(load_id);
        debug!(load_id, revision, students = map.len(), "分配表已提交");
        Ok(revision)
    }

    async fn commit_load(&self, load: Load, expected_revision: u64) -> RepositoryResult<u64> {
        let mut state = self.lock()?;
        let index = state.load_index(&load.id)?;
        state.check_revision(&load.id, expected_revision)?;

        let load_id = load.id.clone();
        state.loads[index] = load;
        let revision = state.bump(&load_id);
        debug!(load_id = %load_id, revision, "载次已提交");
        Ok(revision)
    }
}
