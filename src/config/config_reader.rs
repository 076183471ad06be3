// ==========================================
// 跳伞场载次排班系统 - 引擎配置读取 Trait
// ==========================================
// 职责: 定义引擎/API 所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::settings::{
    ConflictSettings, FairnessSettings, LoadSchedulingSettings, PayRates, SearchSettings,
};

// ==========================================
// EngineConfigReader Trait
// ==========================================
// 实现者: ConfigManager（JSON + 环境变量）
pub trait EngineConfigReader: Send + Sync {
    /// 载次调度参数（周转时间、载次间隔、默认容量）
    fn scheduling(&self) -> LoadSchedulingSettings;

    /// 薪酬费率
    fn pay_rates(&self) -> PayRates;

    /// 平衡分参数（轮休系数、轮休排班）
    fn fairness(&self) -> FairnessSettings;

    /// 穷举回退搜索边界
    fn search(&self) -> SearchSettings;

    /// 冲突检测阈值
    fn conflicts(&self) -> ConflictSettings;
}
