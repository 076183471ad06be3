// ==========================================
// 跳伞场载次排班系统 - 配置层
// ==========================================
// 职责: 引擎配置管理, 支持 JSON 加载 + 环境变量覆写
// ==========================================

pub mod config_manager;
pub mod config_reader;
pub mod settings;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigError, ConfigManager};
pub use config_reader::EngineConfigReader;
pub use settings::{
    pay_rates, ConflictSettings, EngineConfig, FairnessSettings, LoadSchedulingSettings,
    PayRates, SearchSettings, OFF_DAY_MULTIPLIER,
};
