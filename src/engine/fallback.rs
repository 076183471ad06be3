// ==========================================
// 跳伞场载次排班系统 - 穷举回退搜索
// ==========================================
// 职责: 启发式阶段后仍有学员无主教练时, 回溯搜索可行分配
// 输入: 当前分配表 + 每名学员的合格教练（已排序） + 锁定学员
// 输出: Solved(新分配表) / Failed { 尝试次数, 是否超时 }
// ==========================================
// 红线: 不修改输入; 锁定学员的主教练不可被替换
// 红线: 同一条交换链中同一教练只能被抢占一次（防止循环）
// 边界: 递归深度上限 + 墙钟超时（在递归内检查）
// ==========================================

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::SearchSettings;
use crate::engine::planner::{main_holder, used_instructors, AssignmentMap, AssignmentPair};

// ==========================================
// SearchOutcome - 搜索结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved { map: AssignmentMap, attempts: u64 },
    Failed { attempts: u64, timed_out: bool },
}

// ==========================================
// SearchState - 单条搜索路径的状态副本
// ==========================================
#[derive(Debug, Clone)]
pub struct SearchState {
    /// 当前分配表
    pub map: AssignmentMap,
    /// 已占用教练（主教练 + 摄像）
    pub used: HashSet<String>,
    /// 本路径上被抢占过的教练
    pub chain: Vec<String>,
    /// 被抢占学员暂存的摄像教练
    pub parked_video: HashMap<String, Option<String>>,
    /// 待分配学员（栈顶先处理）
    pub worklist: Vec<String>,
    /// 已做出的分配步数
    pub depth: usize,
}

impl SearchState {
    pub fn new(map: AssignmentMap, unassigned: &[String]) -> Self {
        let used = used_instructors(&map);
        Self {
            map,
            used,
            chain: Vec::new(),
            parked_video: HashMap::new(),
            worklist: unassigned.iter().rev().cloned().collect(),
            depth: 0,
        }
    }

    /// 学员取得主教练（恢复其暂存的摄像）
    fn seat(&mut self, student_id: &str, instructor_id: &str) {
        let video = self.parked_video.remove(student_id).flatten();
        self.used.insert(instructor_id.to_string());
        self.map.insert(
            student_id.to_string(),
            AssignmentPair {
                main: instructor_id.to_string(),
                video,
            },
        );
        self.depth += 1;
    }

    /// 抢占 holder 的主教练, holder 重新进入待分配
    fn displace(&mut self, holder_id: &str, instructor_id: &str) {
        if let Some(pair) = self.map.remove(holder_id) {
            self.parked_video.insert(holder_id.to_string(), pair.video);
        }
        self.chain.push(instructor_id.to_string());
        self.worklist.push(holder_id.to_string());
    }
}

/// 搜索预算（跨路径共享）
#[derive(Debug)]
struct SearchBudget {
    deadline: Instant,
    max_depth: usize,
    attempts: u64,
    timed_out: bool,
}

impl SearchBudget {
    fn expired(&mut self) -> bool {
        if !self.timed_out && Instant::now() >= self.deadline {
            self.timed_out = true;
        }
        self.timed_out
    }
}

// ==========================================
// ExhaustiveSearch - 回溯搜索
// ==========================================
pub struct ExhaustiveSearch<'c> {
    /// 学员ID -> 合格主教练ID（按优先级排序, 不含占用排除）
    candidates: &'c HashMap<String, Vec<String>>,
    /// 锁定学员（其主教练不可被抢占）
    locked: &'c HashSet<String>,
    settings: SearchSettings,
}

impl<'c> ExhaustiveSearch<'c> {
    pub fn new(
        candidates: &'c HashMap<String, Vec<String>>,
        locked: &'c HashSet<String>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            candidates,
            locked,
            settings,
        }
    }

    /// 为 unassigned 中的学员搜索主教练
    ///
    /// # 参数
    /// - `map`: 启发式阶段产出的分配表（不会被修改）
    /// - `unassigned`: 无主教练的学员（按处理顺序）
    pub fn solve(&self, map: &AssignmentMap, unassigned: &[String]) -> SearchOutcome {
        let mut budget = SearchBudget {
            deadline: Instant::now() + Duration::from_millis(self.settings.timeout_ms),
            max_depth: self.settings.max_depth,
            attempts: 0,
            timed_out: false,
        };

        let state = SearchState::new(map.clone(), unassigned);
        let outcome = match self.search(state, &mut budget) {
            Some(solved) => SearchOutcome::Solved {
                map: solved,
                attempts: budget.attempts,
            },
            None => SearchOutcome::Failed {
                attempts: budget.attempts,
                timed_out: budget.timed_out,
            },
        };

        match &outcome {
            SearchOutcome::Solved { attempts, .. } => {
                debug!(attempts, "穷举回退求解成功");
            }
            SearchOutcome::Failed { attempts, timed_out } => {
                warn!(attempts, timed_out, "穷举回退未找到可行解");
            }
        }
        outcome
    }

    fn search(&self, mut state: SearchState, budget: &mut SearchBudget) -> Option<AssignmentMap> {
        let Some(student_id) = state.worklist.pop() else {
            return Some(state.map);
        };
        if budget.expired() || state.depth >= budget.max_depth {
            return None;
        }
        let candidates = self.candidates.get(&student_id)?;

        for instructor_id in candidates {
            budget.attempts += 1;
            if budget.expired() {
                return None;
            }

            // 空闲: 直接分配
            if !state.used.contains(instructor_id) {
                let mut next = state.clone();
                next.seat(&student_id, instructor_id);
                if let Some(solved) = self.search(next, budget) {
                    return Some(solved);
                }
                continue;
            }

            // 已占用: 仅可抢占非锁定学员的主教练, 且本链未抢占过
            if state.chain.contains(instructor_id) {
                continue;
            }
            let Some(holder_id) = main_holder(&state.map, instructor_id).map(str::to_string) else {
                continue;
            };
            if self.locked.contains(&holder_id) {
                continue;
            }

            let mut next = state.clone();
            next.displace(&holder_id, instructor_id);
            next.seat(&student_id, instructor_id);
            if let Some(solved) = self.search(next, budget) {
                return Some(solved);
            }
        }

        None
    }
}
