// ==========================================
// 跳伞场载次排班系统 - 配置管理器
// ==========================================
// 职责: 配置加载、环境变量覆写、校验
// 来源: JSON 文件/字符串 + DZ_* 环境变量
// ==========================================

use crate::config::config_reader::EngineConfigReader;
use crate::config::settings::{
    ConflictSettings, EngineConfig, FairnessSettings, LoadSchedulingSettings, PayRates,
    SearchSettings,
};
use std::path::Path;
use thiserror::Error;

// ==========================================
// 环境变量键
// ==========================================
pub mod config_keys {
    pub const CYCLE_TIME_MINUTES: &str = "DZ_CYCLE_TIME_MINUTES";
    pub const MINUTES_BETWEEN_LOADS: &str = "DZ_MINUTES_BETWEEN_LOADS";
    pub const DEFAULT_CAPACITY: &str = "DZ_DEFAULT_CAPACITY";
    pub const SEARCH_TIMEOUT_MS: &str = "DZ_SEARCH_TIMEOUT_MS";
    pub const SEARCH_MAX_DEPTH: &str = "DZ_SEARCH_MAX_DEPTH";
    pub const TEAM_OFF: &str = "DZ_TEAM_OFF";
    pub const DAYS_OFF: &str = "DZ_DAYS_OFF";
    pub const OFF_DAY_MULTIPLIER: &str = "DZ_OFF_DAY_MULTIPLIER";
}

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置值无效 (key={key}): {message}")]
    InvalidValue { key: String, message: String },
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: EngineConfig,
}

impl ConfigManager {
    /// 使用默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从已有配置创建（会做校验）
    pub fn from_config(config: EngineConfig) -> Result<Self, ConfigError> {
        let manager = Self { config };
        manager.validate()?;
        Ok(manager)
    }

    /// 从 JSON 字符串加载（缺省字段取默认值）
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(raw)?;
        Self::from_config(config)
    }

    /// 从 JSON 文件加载
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "加载引擎配置文件");
        Self::from_json_str(&raw)
    }

    /// 应用 DZ_* 环境变量覆写
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// 应用覆写（lookup 返回 None 表示不覆写）
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cfg = &mut self.config;

        if let Some(v) = lookup(config_keys::CYCLE_TIME_MINUTES) {
            cfg.scheduling.instructor_cycle_time_minutes =
                parse_value(config_keys::CYCLE_TIME_MINUTES, &v)?;
        }
        if let Some(v) = lookup(config_keys::MINUTES_BETWEEN_LOADS) {
            cfg.scheduling.minutes_between_loads =
                parse_value(config_keys::MINUTES_BETWEEN_LOADS, &v)?;
        }
        if let Some(v) = lookup(config_keys::DEFAULT_CAPACITY) {
            cfg.scheduling.default_capacity = parse_value(config_keys::DEFAULT_CAPACITY, &v)?;
        }
        if let Some(v) = lookup(config_keys::SEARCH_TIMEOUT_MS) {
            cfg.search.timeout_ms = parse_value(config_keys::SEARCH_TIMEOUT_MS, &v)?;
        }
        if let Some(v) = lookup(config_keys::SEARCH_MAX_DEPTH) {
            cfg.search.max_depth = parse_value(config_keys::SEARCH_MAX_DEPTH, &v)?;
        }
        if let Some(v) = lookup(config_keys::OFF_DAY_MULTIPLIER) {
            cfg.fairness.off_day_multiplier = parse_value(config_keys::OFF_DAY_MULTIPLIER, &v)?;
        }
        if let Some(v) = lookup(config_keys::TEAM_OFF) {
            cfg.fairness.team_rotation.team_off =
                v.parse().map_err(|e| invalid(config_keys::TEAM_OFF, e))?;
        }
        if let Some(v) = lookup(config_keys::DAYS_OFF) {
            cfg.fairness.team_rotation.days_off =
                v.parse().map_err(|e| invalid(config_keys::DAYS_OFF, e))?;
        }

        self.validate()?;
        Ok(self)
    }

    /// 校验配置
    ///
    /// # 验证规则
    /// 1. 载次间隔 > 0
    /// 2. 默认容量 >= 2（至少容纳一名学员）
    /// 3. 轮休系数 > 1 且为有限值
    /// 4. 搜索深度 >= 1, 超时 >= 1ms
    /// 5. 疲劳阈值 >= 2
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cfg = &self.config;

        if cfg.scheduling.minutes_between_loads == 0 {
            return Err(invalid("scheduling.minutes_between_loads", "必须大于 0"));
        }
        if cfg.scheduling.default_capacity < 2 {
            return Err(invalid("scheduling.default_capacity", "至少为 2"));
        }
        let m = cfg.fairness.off_day_multiplier;
        if !m.is_finite() || m <= 1.0 {
            return Err(invalid(
                "fairness.off_day_multiplier",
                format!("须为大于 1 的有限值, 当前 {}", m),
            ));
        }
        if cfg.search.max_depth == 0 {
            return Err(invalid("search.max_depth", "至少为 1"));
        }
        if cfg.search.timeout_ms == 0 {
            return Err(invalid("search.timeout_ms", "至少为 1"));
        }
        if cfg.conflicts.fatigue_consecutive_loads < 2 {
            return Err(invalid("conflicts.fatigue_consecutive_loads", "至少为 2"));
        }
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 配置快照（JSON），用于随规划结果一起记录
    pub fn config_snapshot(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(&self.config)?)
    }
}

fn invalid(key: &str, message: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| invalid(key, e))
}

// ==========================================
// EngineConfigReader Trait 实现
// ==========================================
impl EngineConfigReader for ConfigManager {
    fn scheduling(&self) -> LoadSchedulingSettings {
        self.config.scheduling
    }

    fn pay_rates(&self) -> PayRates {
        self.config.pay
    }

    fn fairness(&self) -> FairnessSettings {
        self.config.fairness
    }

    fn search(&self) -> SearchSettings {
        self.config.search
    }

    fn conflicts(&self) -> ConflictSettings {
        self.config.conflicts
    }
}
